//! Application state and logic.

use crate::action::{Action, FetchRequest};
use crate::clipboard::{self, COPIED_TOAST_MS};
use crate::context::{AppContext, UiContext};
use crate::location::{History, Location, Route};
use crate::log_buffer::LogBuffer;
use crate::page::AddressPage;
use crate::theme::{Palette, Theme};
use ckbx_core::Network;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use std::time::Instant;

/// Spinner frames for the loading indicator.
const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Lines of the log panel kept visible when scrolled all the way up.
const LOG_PANEL_LINES: usize = 3;

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing an address to open.
    EnteringAddress,
    /// Typing a page number to jump to.
    JumpingToPage,
}

/// Main application state.
pub struct App {
    /// Current theme.
    pub theme: Theme,
    /// Color palette for current theme.
    pub palette: Palette,
    /// Network the API client talks to.
    pub network: Network,
    /// Navigation history; its current entry is the location on screen.
    pub history: History,
    /// Route of the current location.
    pub route: Route,
    /// Mounted address page, if the route is an address.
    pub page: Option<AddressPage>,
    /// Loading indicator and toast.
    pub context: UiContext,
    pub input_mode: InputMode,
    /// Text typed in the current prompt.
    pub input: String,
    /// Validation error for the address prompt.
    pub validation_error: Option<String>,
    /// Selected row of the transaction table.
    pub tx_table_state: TableState,
    pub showing_help: bool,
    pub should_quit: bool,
    /// Log buffer for displaying logs in the UI.
    pub log_buffer: LogBuffer,
    /// Log scroll offset from the newest entry.
    pub log_scroll: usize,
    /// Tick counter for loading spinner animation.
    pub spinner_tick: usize,
    toast_fetch_errors: bool,
}

impl App {
    /// Create a new application instance showing `start`.
    pub fn new(network: Network, start: Location, log_buffer: LogBuffer, theme: Theme) -> Self {
        Self {
            theme,
            palette: theme.palette(),
            network,
            history: History::new(start),
            // Resolved on the first sync.
            route: Route::Home,
            page: None,
            context: UiContext::new(),
            input_mode: InputMode::default(),
            input: String::new(),
            validation_error: None,
            tx_table_state: TableState::default(),
            showing_help: false,
            should_quit: false,
            log_buffer,
            log_scroll: 0,
            spinner_tick: 0,
            toast_fetch_errors: false,
        }
    }

    /// Report failed fetches through toasts too.
    pub fn with_error_toasts(mut self, enabled: bool) -> Self {
        self.toast_fetch_errors = enabled;
        self
    }

    /// The location on screen.
    pub fn location(&self) -> &Location {
        self.history.current()
    }

    /// Bring the page in line with the current location.
    ///
    /// Remounts the page when the route changes and returns the fetches the
    /// page wants issued. Must run after every action.
    pub fn sync_location(&mut self) -> Vec<FetchRequest> {
        let location = self.history.current().clone();
        let route = Route::resolve(&location.path);

        if route != self.route {
            tracing::debug!("Route changed to {:?}", route);
            self.page = match &route {
                Route::Address(address) => Some(
                    AddressPage::mount(address, &location).with_error_toasts(self.toast_fetch_errors),
                ),
                Route::Home | Route::NotFound => None,
            };
            self.route = route;
            self.tx_table_state.select(None);
        }

        match self.page.as_mut() {
            Some(page) => page.sync_location(&location, &mut self.context),
            None => Vec::new(),
        }
    }

    /// Apply an action and return the fetches it leads to.
    pub fn handle_action(&mut self, action: Action) -> Vec<FetchRequest> {
        match action {
            Action::Navigate(href) => {
                self.history.push(Location::parse(&href));
            }
            Action::Back => {
                if !self.history.back() {
                    tracing::debug!("Already at the oldest location");
                }
            }
            Action::Forward => {
                if !self.history.forward() {
                    tracing::debug!("Already at the newest location");
                }
            }
            Action::ChangePagination { page, size } => {
                if let Some(address_page) = self.page.as_mut() {
                    address_page.change_pagination(page, size, &mut self.history);
                }
            }
            Action::AddressLoaded { generation, result } => match self.page.as_mut() {
                Some(page) => page.apply_address(generation, result, &mut self.context),
                // The page that issued it is gone; still release the indicator.
                None => self.context.hide_loading(),
            },
            Action::TransactionsLoaded { generation, result } => {
                match self.page.as_mut() {
                    Some(page) => page.apply_transactions(generation, result, &mut self.context),
                    None => self.context.hide_loading(),
                }
                self.clamp_selection();
            }
            Action::CopyAddress => {
                if let Some(page) = &self.page {
                    let address = page.address().to_string();
                    self.report_copy(&address, clipboard::copy_text(&address));
                }
            }
            Action::Quit => {
                self.should_quit = true;
            }
        }
        self.sync_location()
    }

    fn report_copy(&mut self, address: &str, result: Result<(), String>) {
        match result {
            Ok(()) => {
                tracing::info!("Copied {} to clipboard", address);
                self.context.toast_message("Copied", COPIED_TOAST_MS);
            }
            Err(e) => {
                tracing::warn!("{}", e);
                self.context.toast_message(&e, COPIED_TOAST_MS);
            }
        }
    }

    /// Handle tick events for animations and expiry.
    pub fn tick(&mut self) {
        self.context.expire_toast(Instant::now());
        if self.context.is_loading() {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    /// Get the current spinner character for loading animation.
    pub fn spinner_char(&self) -> char {
        SPINNER_CHARS[self.spinner_tick % SPINNER_CHARS.len()]
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EnteringAddress => self.handle_address_key(key),
            InputMode::JumpingToPage => self.handle_jump_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.showing_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.showing_help = false;
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Char('?') => self.showing_help = true,
            KeyCode::Char('/') | KeyCode::Char('a') => {
                self.input_mode = InputMode::EnteringAddress;
                self.input.clear();
                self.validation_error = None;
            }
            KeyCode::Char('b') | KeyCode::Backspace => return Some(Action::Back),
            KeyCode::Char('f') => return Some(Action::Forward),
            KeyCode::Char('[') => self.scroll_logs_up(),
            KeyCode::Char(']') => self.scroll_logs_down(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            _ => return self.handle_page_key(key),
        }
        None
    }

    /// Keys that only mean something on an address page.
    fn handle_page_key(&mut self, key: KeyEvent) -> Option<Action> {
        let page = self.page.as_ref()?;
        let target = match key.code {
            KeyCode::Right | KeyCode::Char('n') => page.step(1),
            KeyCode::Left | KeyCode::Char('p') => page.step(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => page.resize(true),
            KeyCode::Char('-') => page.resize(false),
            KeyCode::Char('g') => {
                self.input_mode = InputMode::JumpingToPage;
                self.input.clear();
                return None;
            }
            KeyCode::Char('c') => return Some(Action::CopyAddress),
            _ => None,
        };
        target.map(|p| Action::ChangePagination {
            page: p.page_number,
            size: p.page_size,
        })
    }

    fn handle_address_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => match self.validate_address_input() {
                Ok(address) => {
                    self.input_mode = InputMode::Normal;
                    self.input.clear();
                    self.validation_error = None;
                    return Some(Action::Navigate(Location::address(&address, None).href()));
                }
                Err(e) => {
                    // Stay in the prompt so the address can be corrected.
                    self.validation_error = Some(e);
                }
            },
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
                self.validation_error = None;
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.validation_error = None;
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.validation_error = None;
            }
            _ => {}
        }
        None
    }

    fn handle_jump_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let requested = self.input.trim().parse::<u32>().ok();
                self.input.clear();
                let target = self.page.as_ref().zip(requested).and_then(|(p, n)| p.jump_to(n))?;
                return Some(Action::ChangePagination {
                    page: target.page_number,
                    size: target.page_size,
                });
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < 9 => {
                self.input.push(c);
            }
            _ => {}
        }
        None
    }

    /// Check the typed address and return it trimmed.
    fn validate_address_input(&self) -> Result<String, String> {
        let input = self.input.trim();
        if input.is_empty() {
            return Err("Please enter an address".to_string());
        }
        if input.chars().any(|c| !c.is_ascii_alphanumeric()) {
            return Err("Address may only contain letters and digits".to_string());
        }
        let prefix = self.network.address_prefix();
        if !input.starts_with(prefix) {
            return Err(format!(
                "{} addresses start with '{}'",
                self.network, prefix
            ));
        }
        if input.len() <= prefix.len() + 1 {
            return Err("Address is too short".to_string());
        }
        Ok(input.to_string())
    }

    /// Scroll logs up (older messages).
    pub fn scroll_logs_up(&mut self) {
        let log_count = self.log_buffer.len();
        if log_count > LOG_PANEL_LINES {
            self.log_scroll = (self.log_scroll + 1).min(log_count - LOG_PANEL_LINES);
        }
    }

    /// Scroll logs down (newer messages).
    pub fn scroll_logs_down(&mut self) {
        self.log_scroll = self.log_scroll.saturating_sub(1);
    }

    fn transaction_count(&self) -> usize {
        self.page.as_ref().map_or(0, |p| p.transactions().len())
    }

    /// Move selection down in the transaction table.
    pub fn select_next(&mut self) {
        let len = self.transaction_count();
        if len == 0 {
            return;
        }
        let i = match self.tx_table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.tx_table_state.select(Some(i));
    }

    /// Move selection up in the transaction table.
    pub fn select_previous(&mut self) {
        let len = self.transaction_count();
        if len == 0 {
            return;
        }
        let i = match self.tx_table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.tx_table_state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        let len = self.transaction_count();
        match self.tx_table_state.selected() {
            Some(_) if len == 0 => self.tx_table_state.select(None),
            Some(i) if i >= len => self.tx_table_state.select(Some(len - 1)),
            _ => {}
        }
    }
}
