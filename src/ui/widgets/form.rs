//! Form rendering for sign-in, trade and wallet forms.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::state::{Form, FormKind, OrderType};

/// Draws a [`Form`] as stacked input boxes.
pub struct FormView;

impl FormView {
    /// Rows a form needs: three per field plus status and border lines.
    pub fn height(form: &Form) -> u16 {
        form.fields.len() as u16 * 3 + 4
    }

    /// Render `form` into `area`.
    ///
    /// `error` falls back to the form's own validation error; `busy` shows a
    /// progress line instead.
    pub fn render(frame: &mut Frame, area: Rect, form: &Form, error: Option<&str>, busy: bool) {
        frame.render_widget(Clear, area);

        let accent = match &form.kind {
            FormKind::Trade {
                side: OrderType::Sell,
                ..
            } => Color::Red,
            FormKind::Trade { .. } => Color::Green,
            _ => Color::Cyan,
        };
        let block = Block::default()
            .title(format!(" {} ", form.kind.title()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        for (i, field) in form.fields.iter().enumerate() {
            let y = inner.y + i as u16 * 3;
            if y + 3 > inner.y + inner.height {
                break;
            }
            let field_area = Rect {
                x: inner.x + 1,
                y,
                width: inner.width.saturating_sub(2),
                height: 3,
            };

            let focused = i == form.focus;
            let border = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let input = Paragraph::new(field.display_value()).block(
                Block::default()
                    .title(format!(" {} ", field.label))
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            frame.render_widget(input, field_area);

            if focused {
                let offset = field.value.chars().count() as u16;
                frame.set_cursor_position(Position::new(
                    field_area.x + 1 + offset.min(field_area.width.saturating_sub(3)),
                    field_area.y + 1,
                ));
            }
        }

        let status_y = inner.y + form.fields.len() as u16 * 3;
        if status_y < inner.y + inner.height {
            let status = if busy {
                Line::from(Span::styled(
                    "Working...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::ITALIC),
                ))
            } else if let Some(message) = error.or(form.error.as_deref()) {
                Line::from(Span::styled(
                    format!("✗ {message}"),
                    Style::default().fg(Color::Red),
                ))
            } else {
                Line::from("")
            };
            frame.render_widget(
                Paragraph::new(status),
                Rect {
                    x: inner.x + 1,
                    y: status_y,
                    width: inner.width.saturating_sub(2),
                    height: 1,
                },
            );
        }
    }
}
