//! Help panel and footer hints.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;
use crate::router::Route;
use crate::state::{InputMode, Store};

fn heading(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn entry(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<10}"), Style::default().fg(Color::Cyan)),
        Span::raw(description.to_string()),
    ])
}

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let screens = format!(
            "{}-{}",
            keys.dashboard.as_str(),
            keys.profile.as_str()
        );
        let move_keys = format!("{}/↓ {}/↑", keys.down, keys.up);
        let page_keys = format!("{}/{}", keys.left, keys.right);
        let trade_keys = format!("{}/{}", keys.buy, keys.sell);
        let wallet_keys = format!("{}/{}", keys.deposit, keys.withdraw);

        let help_text = vec![
            heading("Navigation"),
            Line::from(""),
            entry(&move_keys, "Move selection"),
            entry("PgUp/PgDn", "Move a page"),
            entry("Home/End", "Go to top/bottom"),
            entry("Tab", "Next screen"),
            entry(&screens, "Dashboard, Market, Wallet, Orders, Watchlist, Profile"),
            entry(&keys.select, "Open coin / order detail"),
            entry(&keys.back, "Back"),
            Line::from(""),
            heading("Market"),
            Line::from(""),
            entry(&keys.search, "Filter loaded coins"),
            entry(&keys.cycle_sort, "Cycle sort order"),
            entry(&page_keys, "Previous/next page (chart window on coin detail)"),
            entry(&keys.toggle_watchlist, "Add/remove from watchlist"),
            entry(&trade_keys, "Buy/sell selected coin"),
            Line::from(""),
            heading("Wallet & Orders"),
            Line::from(""),
            entry(&wallet_keys, "Deposit/withdraw"),
            entry(&page_keys, "Switch order filter"),
            Line::from(""),
            heading("General"),
            Line::from(""),
            entry(&keys.command, "Command (goto /path, search <term>, logout, q)"),
            entry(&keys.refresh, "Refresh data"),
            entry(&keys.logout, "Sign out"),
            entry(&keys.help, "Toggle help"),
            entry(&keys.quit, "Quit"),
        ];

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}

/// Bottom line: the search or command being typed, else hints for the screen.
pub struct Footer;

impl Footer {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, keys: &KeyBindings) {
        if area.height == 0 {
            return;
        }

        match store.app.input_mode {
            InputMode::Command => {
                let prefix = keys.command.as_str();
                let line = Line::from(vec![
                    Span::styled(prefix.to_string(), Style::default().fg(Color::Yellow)),
                    Span::raw(store.app.input_buffer.clone()),
                ]);
                frame.render_widget(Paragraph::new(line), area);
                let offset = (prefix.chars().count() + store.app.cursor_position) as u16;
                frame.set_cursor_position(Position::new(
                    area.x + offset.min(area.width.saturating_sub(1)),
                    area.y,
                ));
            }
            InputMode::Search => {
                let line = Line::from(vec![
                    Span::styled(keys.search.clone(), Style::default().fg(Color::Yellow)),
                    Span::raw(store.markets.search.clone()),
                    Span::styled(
                        "   Enter keep filter · Esc clear",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]);
                frame.render_widget(Paragraph::new(line), area);
                let offset =
                    (keys.search.chars().count() + store.markets.search.chars().count()) as u16;
                frame.set_cursor_position(Position::new(
                    area.x + offset.min(area.width.saturating_sub(1)),
                    area.y,
                ));
            }
            InputMode::Normal | InputMode::Form => {
                let hints = Self::hints(&store.app.route, keys);
                let mut spans = Vec::with_capacity(hints.len() * 2);
                for (key, what) in hints {
                    spans.push(Span::styled(format!(" {key} "), Style::default().fg(Color::Cyan)));
                    spans.push(Span::styled(
                        format!("{what} "),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                frame.render_widget(Paragraph::new(Line::from(spans)), area);
            }
        }
    }

    fn hints(route: &Route, keys: &KeyBindings) -> Vec<(String, &'static str)> {
        let k = |s: &String| s.clone();
        match route {
            Route::Login => vec![
                ("Enter".into(), "sign in"),
                ("Tab".into(), "next field"),
                ("Ctrl+n".into(), "create account"),
            ],
            Route::Signup => vec![
                ("Enter".into(), "create account"),
                ("Tab".into(), "next field"),
                ("Esc".into(), "back to sign in"),
            ],
            Route::TwoFactor => vec![
                ("Enter".into(), "verify"),
                ("Esc".into(), "back to sign in"),
            ],
            Route::Market => vec![
                (k(&keys.search), "filter"),
                (k(&keys.cycle_sort), "sort"),
                (format!("{}/{}", keys.left, keys.right), "page"),
                (k(&keys.toggle_watchlist), "watch"),
                (k(&keys.buy), "buy"),
                (k(&keys.select), "details"),
            ],
            Route::CoinDetail(_) => vec![
                (format!("{}/{}", keys.left, keys.right), "chart window"),
                (k(&keys.toggle_watchlist), "watch"),
                (k(&keys.buy), "buy"),
                (k(&keys.sell), "sell"),
                (k(&keys.back), "back"),
            ],
            Route::Trading(_) => vec![
                ("Enter".into(), "place order"),
                ("Tab".into(), "buy/sell"),
                ("Esc".into(), "back"),
            ],
            Route::Wallet => vec![
                (k(&keys.deposit), "deposit"),
                (k(&keys.withdraw), "withdraw"),
                (k(&keys.refresh), "refresh"),
            ],
            Route::Orders => vec![
                (format!("{}/{}", keys.left, keys.right), "filter"),
                (k(&keys.select), "details"),
                (k(&keys.refresh), "refresh"),
            ],
            Route::Watchlist => vec![
                (k(&keys.select), "details"),
                (k(&keys.toggle_watchlist), "remove"),
            ],
            Route::Dashboard | Route::Profile | Route::NotFound(_) => vec![
                (k(&keys.select), "open"),
                (k(&keys.command), "command"),
                (k(&keys.help), "help"),
                (k(&keys.quit), "quit"),
            ],
        }
    }
}
