//! TUI widgets.

mod coin_detail;
mod dashboard;
mod form;
mod help;
mod market_list;
mod notifications;
mod order_list;
mod profile;
mod status_bar;
mod tab_bar;
mod trading;
mod wallet;
mod watchlist;

pub use coin_detail::CoinDetail;
pub use dashboard::Dashboard;
pub use form::FormView;
pub use help::{Footer, HelpPanel};
pub use market_list::MarketList;
pub use notifications::{render_error, render_loading, render_notification};
pub use order_list::OrderList;
pub use profile::Profile;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;
pub use trading::Trading;
pub use wallet::WalletView;
pub use watchlist::WatchlistView;

use ratatui::{
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, TableState},
};
use rust_decimal::Decimal;

/// Bordered block with the screen title.
fn panel(title: impl Into<String>) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title.into()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Green for gains, red for losses.
fn change_style(change: Decimal) -> Style {
    if change.is_sign_negative() && !change.is_zero() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    }
}

/// Table state pointing at `index`, or nothing for an empty table.
fn selection(index: usize, len: usize) -> TableState {
    let mut state = TableState::default();
    if len > 0 {
        state.select(Some(index.min(len - 1)));
    }
    state
}

/// Shorten to `max_len` characters with an ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
