//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

mod layout;
mod widgets;

pub use layout::{Layout, centered_fixed, centered_rect};

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::config::Config;
use crate::router::Route;
use crate::state::{InputMode, Store};
use widgets::{
    CoinDetail, Dashboard, Footer, FormView, HelpPanel, MarketList, OrderList, Profile, StatusBar,
    TabBar, Trading, WalletView, WatchlistView,
};

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, store: &Store, config: &Config) {
        let typing = matches!(store.app.input_mode, InputMode::Command | InputMode::Search);
        let layout = Layout::new(frame.area(), &config.ui, typing);

        StatusBar::render(frame, layout.status_area, store);
        TabBar::render(frame, layout.tab_area, store, &config.keybindings);

        let main = layout.main_area;
        match &store.app.route {
            Route::Login | Route::Signup | Route::TwoFactor => {
                Self::render_auth(frame, main, store)
            }
            Route::Dashboard => {
                Dashboard::render(frame, main, store, config.ui.dashboard_recent_orders)
            }
            Route::Market => MarketList::render(frame, main, store),
            Route::CoinDetail(coin_id) => CoinDetail::render(frame, main, store, coin_id),
            Route::Trading(coin_id) => Trading::render(frame, main, store, coin_id),
            Route::Wallet => WalletView::render(frame, main, store),
            Route::Orders => OrderList::render(frame, main, store),
            Route::Watchlist => WatchlistView::render(frame, main, store),
            Route::Profile => Profile::render(frame, main, store),
            Route::NotFound(path) => Self::render_not_found(frame, main, path),
        }

        // Deposit and withdraw forms float over their screen.
        if let Some(form) = store.app.form.as_ref().filter(|f| f.kind.is_modal()) {
            let popup = centered_fixed(50, FormView::height(form), main);
            FormView::render(frame, popup, form, None, false);
        }

        Footer::render(frame, layout.footer_area, store, &config.keybindings);

        if store.app.show_help {
            let full = frame.area();
            HelpPanel::render(frame, full, &config.keybindings);
        }

        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error);
        } else if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }
    }

    /// Sign-in, sign-up and two-factor forms, centered.
    fn render_auth(frame: &mut Frame, area: Rect, store: &Store) {
        let session = store.session.session();
        let Some(form) = store.app.form.as_ref() else {
            return;
        };

        let popup = centered_fixed(52, FormView::height(form), area);
        FormView::render(
            frame,
            popup,
            form,
            session.error.as_deref(),
            session.is_loading,
        );

        if store.app.route == Route::TwoFactor {
            let below = Rect {
                y: popup.y + popup.height,
                height: 1,
                ..popup
            };
            if below.y < area.y + area.height {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        "Enter the 6-digit code from your authenticator or email.",
                        Style::default().fg(Color::DarkGray),
                    )),
                    below,
                );
            }
        }
    }

    fn render_not_found(frame: &mut Frame, area: Rect, path: &str) {
        let lines = vec![
            Line::from(Span::styled(
                "404",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Nothing lives at {path}")),
            Line::from(Span::styled(
                "Press Esc to go back or 1 for the dashboard.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let block = Block::default()
            .title(" Not Found ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(Paragraph::new(lines).block(block), centered_rect(60, 40, area));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MemoryCredentials, MockAuthGateway};
    use crate::session::SessionStore;
    use crate::state::{Action, Coin, FormKind};
    use ratatui::{Terminal, backend::TestBackend};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn store() -> Store {
        let (tx, _rx) = mpsc::unbounded_channel();
        Store::new(
            tx,
            SessionStore::new(
                Arc::new(MockAuthGateway::new()),
                Arc::new(MemoryCredentials::new()),
            ),
        )
    }

    fn screen(store: &Store) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| Ui::render(frame, store, &Config::default()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_login_screen() {
        let mut store = store();
        store.app.redirect(Route::Login);
        store.reduce(Action::OpenForm(FormKind::Login));

        let text = screen(&store);
        assert!(text.contains("Sign In"));
        assert!(text.contains("Signed out"));
        assert!(text.contains("Email"));
    }

    #[test]
    fn test_market_screen_lists_coins() {
        let mut store = store();
        store.app.redirect(Route::Market);
        store.markets.coins = vec![Coin {
            id: "bitcoin".into(),
            name: "Bitcoin".into(),
            symbol: "btc".into(),
            current_price: dec!(64000),
            ..Coin::default()
        }];
        store.watchlist.toggle("bitcoin");

        let text = screen(&store);
        assert!(text.contains("Bitcoin"));
        assert!(text.contains("$64,000.00"));
        assert!(text.contains("★"));
    }

    #[test]
    fn test_not_found_screen() {
        let mut store = store();
        store.app.redirect(Route::NotFound("/nowhere".into()));
        let text = screen(&store);
        assert!(text.contains("Nothing lives at /nowhere"));
    }

    #[test]
    fn test_help_overlay() {
        let mut store = store();
        store.reduce(Action::ToggleHelp);
        let text = screen(&store);
        assert!(text.contains("Move selection"));
    }
}
