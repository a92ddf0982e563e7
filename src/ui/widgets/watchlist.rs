//! Watchlist screen.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table},
};

use super::{change_style, header_style, panel, render_loading, selection, truncate};
use crate::format;
use crate::state::Store;

/// Watched coins joined with whatever market data is loaded.
pub struct WatchlistView;

impl WatchlistView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let watchlist = &store.watchlist;

        if watchlist.is_empty() && !watchlist.loading {
            let hint = Paragraph::new(Span::styled(
                "Your watchlist is empty. Press w on a coin to add it.",
                Style::default().fg(Color::DarkGray),
            ))
            .block(panel("Watchlist"));
            frame.render_widget(hint, area);
            return;
        }

        let header = Row::new(
            ["Coin", "Price", "24h", "Market Cap"]
                .into_iter()
                .map(|h| Cell::from(h).style(header_style())),
        )
        .bottom_margin(1);

        let rows = watchlist.coin_ids().map(|coin_id| match store.find_coin(coin_id) {
            Some(coin) => Row::new(vec![
                Cell::from(format!(
                    "{} {}",
                    truncate(&coin.name, 22),
                    coin.symbol.to_uppercase()
                )),
                Cell::from(format::price(coin.current_price)),
                Cell::from(format::percentage(coin.price_change_percentage_24h))
                    .style(change_style(coin.price_change_percentage_24h)),
                Cell::from(format::compact(coin.market_cap)),
            ]),
            None => Row::new(vec![
                Cell::from(coin_id.to_string()),
                Cell::from("-").style(Style::default().fg(Color::DarkGray)),
                Cell::from(""),
                Cell::from(""),
            ]),
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(14),
                Constraint::Length(9),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .block(panel(format!("Watchlist ({})", watchlist.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("★ ");

        let mut state = selection(watchlist.selected_index, watchlist.len());
        frame.render_stateful_widget(table, area, &mut state);

        if watchlist.loading {
            render_loading(frame, area);
        }
    }
}
