//! Trading screen: the coin's price next to the buy/sell form.

use std::str::FromStr;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use rust_decimal::Decimal;

use super::{FormView, change_style, panel};
use crate::format;
use crate::state::{FormKind, Store};

pub struct Trading;

impl Trading {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, coin_id: &str) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let price = Self::unit_price(store, coin_id);
        let coin = store.find_coin(coin_id);

        let mut lines = vec![Line::from(Span::styled(
            match coin {
                Some(c) => format!("{} {}", c.name, c.symbol.to_uppercase()),
                None => coin_id.to_string(),
            },
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Price     ", Style::default().fg(Color::DarkGray)),
            Span::raw(price.map(format::price).unwrap_or_else(|| "-".into())),
        ]));
        if let Some(coin) = coin {
            lines.push(Line::from(vec![
                Span::styled("24h       ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format::percentage(coin.price_change_percentage_24h),
                    change_style(coin.price_change_percentage_24h),
                ),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("Balance   ", Style::default().fg(Color::DarkGray)),
            Span::raw(format::currency(store.wallet.balance())),
        ]));

        let form = store
            .app
            .form
            .as_ref()
            .filter(|f| matches!(f.kind, FormKind::Trade { .. }));

        if let (Some(form), Some(price)) = (form, price) {
            if let Ok(quantity) = Decimal::from_str(form.value(0).trim()) {
                lines.push(Line::from(""));
                lines.push(Line::from(vec![
                    Span::styled("Estimate  ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format::currency(quantity * price),
                        Style::default().fg(Color::Yellow),
                    ),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines).block(panel("Trade")), chunks[0]);

        match form {
            Some(form) => {
                let height = FormView::height(form).min(chunks[1].height);
                let form_area = Rect {
                    height,
                    ..chunks[1]
                };
                FormView::render(frame, form_area, form, None, false);
            }
            None => {
                let hint = Paragraph::new(Span::styled(
                    "Press b to buy or x to sell.",
                    Style::default().fg(Color::DarkGray),
                ))
                .block(panel("Order"));
                frame.render_widget(hint, chunks[1]);
            }
        }
    }

    /// Latest known price: market data first, else the last chart point.
    fn unit_price(store: &Store, coin_id: &str) -> Option<Decimal> {
        if let Some(coin) = store.find_coin(coin_id) {
            return Some(coin.current_price);
        }
        if store.coin.coin_id.as_deref() != Some(coin_id) {
            return None;
        }
        let (_, last) = store.coin.chart.as_ref()?.prices.last()?;
        Decimal::try_from(*last).ok()
    }
}
