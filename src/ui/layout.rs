//! Layout management for the TUI.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

use crate::config::UiConfig;

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top). Zero height when hidden.
    pub status_area: Rect,
    /// Tab bar area.
    pub tab_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Key hints or the line being typed (bottom). Zero height when hidden.
    pub footer_area: Rect,
    /// Notification area (overlaid, top right of the main area).
    pub notification_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    ///
    /// The footer is shown when hints are enabled or while `typing`.
    pub fn new(area: Rect, ui: &UiConfig, typing: bool) -> Self {
        let status_height = u16::from(ui.show_status_bar);
        let footer_height = u16::from(ui.show_help_bar || typing);

        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(status_height),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(footer_height),
            ])
            .split(area);

        let main_area = chunks[2];
        let width = main_area.width.min(56);
        let notification_area = Rect {
            x: main_area.x + main_area.width.saturating_sub(width),
            y: main_area.y,
            width,
            height: main_area.height.min(3),
        };

        Self {
            status_area: chunks[0],
            tab_area: chunks[1],
            main_area,
            footer_area: chunks[3],
            notification_area,
        }
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A popup of fixed `width` x `height` centered in `area`, shrunk to fit.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bars_take_no_space() {
        let ui = UiConfig {
            show_status_bar: false,
            show_help_bar: false,
            ..UiConfig::default()
        };
        let layout = Layout::new(Rect::new(0, 0, 80, 24), &ui, false);
        assert_eq!(layout.status_area.height, 0);
        assert_eq!(layout.footer_area.height, 0);
        assert_eq!(layout.main_area.height, 23);

        let layout = Layout::new(Rect::new(0, 0, 80, 24), &ui, true);
        assert_eq!(layout.footer_area.height, 1);
    }

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let layout = Layout::new(Rect::new(0, 0, 10, 2), &UiConfig::default(), false);
        assert!(layout.notification_area.width <= 10);
        let popup = centered_fixed(40, 10, Rect::new(0, 0, 10, 4));
        assert_eq!((popup.width, popup.height), (10, 4));
    }
}
