//! Application-level state.

use std::time::Instant;

use super::{Form, Notification};
use crate::router::Route;

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the market filter.
    Search,
    /// Typing a `:` command.
    Command,
    /// Typing into the open form.
    Form,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Screen currently shown.
    pub route: Route,
    /// Screens to return to with `back`.
    pub history: Vec<Route>,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Open form, if any.
    pub form: Option<Form>,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification and when it appeared.
    pub notification: Option<Notification>,
    pub notification_since: Option<Instant>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Current command input.
    pub input_buffer: String,
    /// Cursor position in input buffer, in chars.
    pub cursor_position: usize,
}

impl AppState {
    /// Check if in an input mode.
    pub fn is_editing(&self) -> bool {
        self.input_mode != InputMode::Normal
    }

    /// Move to `route`, remembering where we came from.
    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            let previous = std::mem::replace(&mut self.route, route);
            self.history.push(previous);
            if self.history.len() > 32 {
                self.history.remove(0);
            }
        }
    }

    /// Replace the current route without recording history.
    pub fn redirect(&mut self, route: Route) {
        self.route = route;
    }

    /// Return to the previous screen. Returns `false` if there is none.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(route) => {
                self.route = route;
                true
            }
            None => false,
        }
    }

    pub fn open_form(&mut self, form: Form) {
        self.form = Some(form);
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        if self.input_mode == InputMode::Form {
            self.input_mode = InputMode::Normal;
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
        self.notification_since = Some(Instant::now());
    }

    /// Drop the notification once its time is up.
    pub fn expire_notification(&mut self, now: Instant) {
        let expired = match (&self.notification, self.notification_since) {
            (Some(n), Some(since)) => now.duration_since(since).as_secs() >= n.duration_secs,
            _ => false,
        };
        if expired {
            self.notification = None;
            self.notification_since = None;
        }
    }

    /// Clear the input buffer.
    pub fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    /// Add a character at the cursor.
    pub fn push_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.input_buffer.insert(idx, c);
        self.cursor_position += 1;
    }

    /// Remove the character before the cursor.
    pub fn pop_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index();
            self.input_buffer.remove(idx);
        }
    }

    /// Move cursor left.
    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn cursor_right(&mut self) {
        if self.cursor_position < self.input_buffer.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn byte_index(&self) -> usize {
        self.input_buffer
            .char_indices()
            .nth(self.cursor_position)
            .map_or(self.input_buffer.len(), |(i, _)| i)
    }
}
