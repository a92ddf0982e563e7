//! Dashboard: balance, movers, top coins and recent activity.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::{change_style, header_style, panel, render_loading, selection, truncate};
use crate::format;
use crate::state::{Coin, Store};

/// Dashboard widget.
pub struct Dashboard;

impl Dashboard {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, recent_orders: usize) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(6)])
            .split(area);
        let cards = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(rows[0]);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let greeting = match &store.session.session().user {
            Some(user) => format!("Welcome back, {}", user.first_name()),
            None => "Welcome back".to_string(),
        };
        let balance = Paragraph::new(vec![
            Line::from(Span::styled(
                format::currency(store.wallet.balance()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} open orders", store.orders.open_count()),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(panel(greeting));
        frame.render_widget(balance, cards[0]);

        Self::render_mover(frame, cards[1], "Top gainer", store.dashboard.top_gainer());
        Self::render_mover(frame, cards[2], "Top loser", store.dashboard.top_loser());

        Self::render_top_coins(frame, body[0], store);

        let activity = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(body[1]);
        Self::render_recent_orders(frame, activity[0], store, recent_orders);
        Self::render_recent_transactions(frame, activity[1], store, recent_orders);

        if store.dashboard.loading {
            render_loading(frame, rows[1]);
        }
    }

    fn render_mover(frame: &mut Frame, area: Rect, title: &str, coin: Option<&Coin>) {
        let lines = match coin {
            Some(coin) => vec![
                Line::from(vec![
                    Span::raw(truncate(&coin.name, 18)),
                    Span::styled(
                        format!(" {}", coin.symbol.to_uppercase()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(vec![
                    Span::raw(format::price(coin.current_price)),
                    Span::raw("  "),
                    Span::styled(
                        format::percentage(coin.price_change_percentage_24h),
                        change_style(coin.price_change_percentage_24h),
                    ),
                ]),
            ],
            None => vec![Line::from(Span::styled(
                "-",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        frame.render_widget(Paragraph::new(lines).block(panel(title)), area);
    }

    fn render_top_coins(frame: &mut Frame, area: Rect, store: &Store) {
        let coins = &store.dashboard.top_coins;
        let header = Row::new(
            ["#", "Coin", "Price", "24h", "Market Cap"]
                .into_iter()
                .map(|h| Cell::from(h).style(header_style())),
        )
        .bottom_margin(1);

        let rows = coins.iter().map(|coin| {
            Row::new(vec![
                Cell::from(
                    coin.market_cap_rank
                        .map(|r| r.to_string())
                        .unwrap_or_default(),
                )
                .style(Style::default().fg(Color::DarkGray)),
                Cell::from(truncate(&coin.name, 20)),
                Cell::from(format::price(coin.current_price)),
                Cell::from(format::percentage(coin.price_change_percentage_24h))
                    .style(change_style(coin.price_change_percentage_24h)),
                Cell::from(format::compact(coin.market_cap)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(14),
                Constraint::Length(14),
                Constraint::Length(9),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .block(panel(format!("Top {} coins", coins.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = selection(store.dashboard.selected_index, coins.len());
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_recent_orders(frame: &mut Frame, area: Rect, store: &Store, limit: usize) {
        let rows = store.orders.orders.iter().take(limit).map(|order| {
            Row::new(vec![
                Cell::from(order.order_type.to_string()).style(match order.order_type {
                    crate::state::OrderType::Buy => Style::default().fg(Color::Green),
                    crate::state::OrderType::Sell => Style::default().fg(Color::Red),
                }),
                Cell::from(truncate(&order.coin_id, 14)),
                Cell::from(format::crypto(order.quantity, "")),
                Cell::from(format::currency(order.total())),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(12),
                Constraint::Length(12),
            ],
        )
        .block(panel("Recent orders"));
        frame.render_widget(table, area);
    }

    fn render_recent_transactions(frame: &mut Frame, area: Rect, store: &Store, limit: usize) {
        let rows = store.wallet.transactions.iter().take(limit).map(|tx| {
            let sign = if tx.transaction_type.is_credit() { "+" } else { "-" };
            let style = if tx.transaction_type.is_credit() {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Red)
            };
            Row::new(vec![
                Cell::from(tx.transaction_type.to_string()),
                Cell::from(format!("{sign}{}", format::currency(tx.amount.abs()))).style(style),
                Cell::from(format::optional_date(tx.created_at))
                    .style(Style::default().fg(Color::DarkGray)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Min(12),
            ],
        )
        .block(panel("Recent transactions"));
        frame.render_widget(table, area);
    }
}
