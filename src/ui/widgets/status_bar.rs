//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::session::SessionStatus;
use crate::state::{InputMode, Store};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        if area.height == 0 {
            return;
        }
        let session = store.session.session();

        let session_status = match &session.status {
            SessionStatus::Authenticated => {
                let name = session
                    .user
                    .as_ref()
                    .map(|u| u.first_name().to_string())
                    .unwrap_or_else(|| "Signed in".to_string());
                Span::styled(format!("● {name}"), Style::default().fg(Color::Green))
            }
            SessionStatus::AwaitingTwoFactor { .. } => {
                Span::styled("◐ Awaiting code", Style::default().fg(Color::Yellow))
            }
            SessionStatus::Anonymous => {
                Span::styled("○ Signed out", Style::default().fg(Color::Red))
            }
        };

        let mode = match store.app.input_mode {
            InputMode::Normal => "NORMAL",
            InputMode::Search => "SEARCH",
            InputMode::Command => "COMMAND",
            InputMode::Form => "INPUT",
        };

        let loading = if store.is_loading() {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let left = Line::from(vec![
            Span::styled(
                " ◆ cointerm ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            session_status,
            Span::raw(" | "),
            Span::styled(format!(" {mode} "), Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::styled(store.app.route.path(), Style::default().fg(Color::White)),
            loading,
        ]);

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));
        let padding = (area.width as usize).saturating_sub(left.width() + help_hint.width());

        let mut spans = left.spans;
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(paragraph, area);
    }
}
