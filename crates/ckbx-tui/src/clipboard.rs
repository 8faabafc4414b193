//! System clipboard access.

use arboard::Clipboard;

/// How long the copy confirmation stays on screen.
pub const COPIED_TOAST_MS: u64 = 3000;

/// Put `text` on the system clipboard.
pub fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard = Clipboard::new().map_err(|e| format!("Clipboard unavailable: {}", e))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| format!("Failed to copy: {}", e))
}
