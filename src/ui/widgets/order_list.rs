//! Order list widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
};

use super::super::layout::centered_fixed;
use super::{header_style, panel, render_loading, selection, truncate};
use crate::format;
use crate::state::{Order, OrderFilter, OrderStatus, OrderType, Store};

fn side_style(side: OrderType) -> Style {
    match side {
        OrderType::Buy => Style::default().fg(Color::Green),
        OrderType::Sell => Style::default().fg(Color::Red),
    }
}

fn status_style(status: OrderStatus) -> Style {
    match status {
        OrderStatus::Pending => Style::default().fg(Color::Yellow),
        OrderStatus::Completed => Style::default().fg(Color::Blue),
        OrderStatus::Failed | OrderStatus::Cancelled => Style::default().fg(Color::Red),
        OrderStatus::Unknown => Style::default().fg(Color::DarkGray),
    }
}

/// Order list widget.
pub struct OrderList;

impl OrderList {
    /// Render the order list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let selected_tab = OrderFilter::ALL
            .iter()
            .position(|f| *f == store.orders.filter)
            .unwrap_or(0);
        let tabs = Tabs::new(OrderFilter::ALL.iter().map(|f| f.label()))
            .select(selected_tab)
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        frame.render_widget(tabs, chunks[0]);

        let orders = store.orders.visible_orders();

        let header_cells = ["ID", "Date", "Coin", "Side", "Quantity", "Price", "Total", "Status"]
            .into_iter()
            .map(|h| Cell::from(h).style(header_style()));
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows = orders.iter().map(|order| {
            let cells = vec![
                Cell::from(order.id.to_string()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(format::optional_date(order.created_at)),
                Cell::from(truncate(&order.coin_id, 18)),
                Cell::from(order.order_type.to_string()).style(side_style(order.order_type)),
                Cell::from(format::crypto(order.quantity, "")),
                Cell::from(format::price(order.price)),
                Cell::from(format::currency(order.total())),
                Cell::from(order.status.to_string()).style(status_style(order.status)),
            ];

            Row::new(cells).height(1)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Length(13),
                Constraint::Min(12),
                Constraint::Length(5),
                Constraint::Length(14),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(panel(format!(
            "Orders ({} open)",
            store.orders.open_count()
        )))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = selection(store.orders.selected_index, orders.len());
        frame.render_stateful_widget(table, chunks[1], &mut state);

        if store.orders.loading {
            render_loading(frame, chunks[1]);
        }

        if let Some(order) = &store.orders.detail {
            Self::render_detail(frame, area, order);
        }
    }

    /// Popup for an order fetched by id.
    fn render_detail(frame: &mut Frame, area: Rect, order: &Order) {
        let popup = centered_fixed(48, 11, area);
        frame.render_widget(Clear, popup);

        let label = |s: &'static str| {
            Span::styled(format!("{s:<10}"), Style::default().fg(Color::DarkGray))
        };
        let lines = vec![
            Line::from(vec![label("Coin"), Span::raw(order.coin_id.clone())]),
            Line::from(vec![
                label("Side"),
                Span::styled(order.order_type.to_string(), side_style(order.order_type)),
            ]),
            Line::from(vec![label("Quantity"), Span::raw(format::crypto(order.quantity, ""))]),
            Line::from(vec![label("Price"), Span::raw(format::price(order.price))]),
            Line::from(vec![label("Total"), Span::raw(format::currency(order.total()))]),
            Line::from(vec![
                label("Status"),
                Span::styled(order.status.to_string(), status_style(order.status)),
            ]),
            Line::from(vec![label("Placed"), Span::raw(format::optional_date(order.created_at))]),
            Line::from(""),
            Line::from(Span::styled("Esc to close", Style::default().fg(Color::DarkGray))),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(format!(" Order #{} ", order.id))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
        frame.render_widget(paragraph, popup);
    }
}
