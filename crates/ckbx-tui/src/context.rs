//! Application-wide context shared by pages: loading indicator and toasts.

use std::time::{Duration, Instant};

/// Capabilities a page may use on the enclosing application.
///
/// Every `show_loading` must be paired with exactly one later `hide_loading`.
pub trait AppContext {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn toast_message(&mut self, text: &str, duration_ms: u64);
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub expires_at: Instant,
}

/// Context used by the terminal application.
///
/// The loading indicator is a count of outstanding requests, so overlapping
/// fetches keep it on until the last one settles.
#[derive(Debug, Default)]
pub struct UiContext {
    pending: usize,
    toast: Option<Toast>,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any request is still outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    /// Number of outstanding requests.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// The toast currently on screen.
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Drop the toast once its duration has elapsed.
    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }
}

impl AppContext for UiContext {
    fn show_loading(&mut self) {
        self.pending += 1;
    }

    fn hide_loading(&mut self) {
        if self.pending == 0 {
            tracing::warn!("hide_loading called with no outstanding request");
            return;
        }
        self.pending -= 1;
    }

    fn toast_message(&mut self, text: &str, duration_ms: u64) {
        self.toast = Some(Toast {
            text: text.to_string(),
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_counts_outstanding_requests() {
        let mut ctx = UiContext::new();
        assert!(!ctx.is_loading());

        ctx.show_loading();
        ctx.show_loading();
        assert_eq!(ctx.pending(), 2);

        ctx.hide_loading();
        assert!(ctx.is_loading());
        ctx.hide_loading();
        assert!(!ctx.is_loading());
    }

    #[test]
    fn test_unpaired_hide_saturates() {
        let mut ctx = UiContext::new();
        ctx.hide_loading();
        assert_eq!(ctx.pending(), 0);
        ctx.show_loading();
        assert!(ctx.is_loading());
    }

    #[test]
    fn test_toast_expires() {
        let mut ctx = UiContext::new();
        ctx.toast_message("Copied", 3000);
        assert_eq!(ctx.toast().map(|t| t.text.as_str()), Some("Copied"));

        ctx.expire_toast(Instant::now());
        assert!(ctx.toast().is_some());

        ctx.expire_toast(Instant::now() + Duration::from_secs(4));
        assert!(ctx.toast().is_none());
    }

    #[test]
    fn test_new_toast_replaces_old() {
        let mut ctx = UiContext::new();
        ctx.toast_message("first", 1000);
        ctx.toast_message("second", 1000);
        assert_eq!(ctx.toast().map(|t| t.text.as_str()), Some("second"));
    }
}
