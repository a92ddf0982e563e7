//! Profile screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{panel, render_loading};
use crate::state::Store;

pub struct Profile;

impl Profile {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let session = store.session.session();
        let label = |s: &'static str| {
            Span::styled(format!("{s:<12}"), Style::default().fg(Color::DarkGray))
        };

        let lines = match &session.user {
            Some(user) => {
                let (two_factor, color) = if user.two_factor_enabled {
                    ("Enabled", Color::Green)
                } else {
                    ("Disabled", Color::Yellow)
                };
                vec![
                    Line::from(Span::styled(
                        user.full_name.clone(),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                    Line::from(vec![label("Email"), Span::raw(user.email.clone())]),
                    Line::from(vec![label("Role"), Span::raw(user.role.to_string())]),
                    Line::from(vec![label("User ID"), Span::raw(user.id.to_string())]),
                    Line::from(vec![
                        label("Two-factor"),
                        Span::styled(two_factor, Style::default().fg(color)),
                    ]),
                ]
            }
            None => vec![Line::from(Span::styled(
                session
                    .error
                    .clone()
                    .unwrap_or_else(|| "Profile not loaded".to_string()),
                Style::default().fg(Color::DarkGray),
            ))],
        };

        frame.render_widget(Paragraph::new(lines).block(panel("Profile")), area);
        if session.is_loading {
            render_loading(frame, area);
        }
    }
}
