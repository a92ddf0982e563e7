//! Tab bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::config::KeyBindings;
use crate::router::Route;
use crate::state::Store;

/// Tab bar widget.
pub struct TabBar;

impl TabBar {
    /// Render the tab bar. Signed-out users only see the screen title.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, keys: &KeyBindings) {
        let route = &store.app.route;

        if !store.session.session().is_authenticated() {
            let line = Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    route.title(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let shortcuts = [
            &keys.dashboard,
            &keys.market,
            &keys.wallet,
            &keys.orders,
            &keys.watchlist,
            &keys.profile,
        ];
        let active = route.tab_index();

        let mut spans = vec![Span::raw(" ")];
        for (i, (tab, key)) in Route::TABS.iter().zip(shortcuts).enumerate() {
            let name_style = if active == Some(i) {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(Color::White)
            };

            spans.push(Span::styled(
                format!("[{key}] "),
                Style::default().fg(Color::DarkGray),
            ));
            spans.push(Span::styled(tab.title(), name_style));
            spans.push(Span::raw("  "));
        }

        // Detail screens show where they are after the tabs.
        if matches!(route, Route::CoinDetail(_) | Route::Trading(_)) {
            spans.push(Span::styled(
                format!("› {}", route.path()),
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
