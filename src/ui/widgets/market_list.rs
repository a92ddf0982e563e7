//! Market list widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, List, ListItem, Row, Table},
};

use super::{change_style, header_style, panel, render_loading, selection, truncate};
use crate::format;
use crate::state::Store;

/// Market list widget.
pub struct MarketList;

impl MarketList {
    /// Render the market list, with remote search results beside it when present.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let markets = &store.markets;

        let (table_area, results_area) = if markets.remote_query.is_some() {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        let coins = markets.visible_coins();

        let header_cells = ["", "#", "Coin", "Price", "24h", "Market Cap", "Volume"]
            .into_iter()
            .map(|h| Cell::from(h).style(header_style()));
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows = coins.iter().map(|coin| {
            let star = if store.watchlist.contains(&coin.id) {
                Span::styled("★", Style::default().fg(Color::Yellow))
            } else {
                Span::raw(" ")
            };
            let rank = coin
                .market_cap_rank
                .map(|r| r.to_string())
                .unwrap_or_default();

            let cells = vec![
                Cell::from(star),
                Cell::from(rank).style(Style::default().fg(Color::DarkGray)),
                Cell::from(Line::from(vec![
                    Span::raw(truncate(&coin.name, 24)),
                    Span::styled(
                        format!(" {}", coin.symbol.to_uppercase()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])),
                Cell::from(format::price(coin.current_price)),
                Cell::from(format::percentage(coin.price_change_percentage_24h))
                    .style(change_style(coin.price_change_percentage_24h)),
                Cell::from(format::compact(coin.market_cap)),
                Cell::from(format::compact(coin.total_volume)),
            ];

            Row::new(cells).height(1)
        });

        let mut title = format!(
            "Market · page {} · {} · sort: {}",
            markets.page,
            coins.len(),
            markets.sort.label()
        );
        if !markets.search.is_empty() {
            title.push_str(&format!(" · filter: \"{}\"", markets.search));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(14),
                Constraint::Length(9),
                Constraint::Length(11),
                Constraint::Length(11),
            ],
        )
        .header(header)
        .block(panel(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = selection(markets.selected_index, coins.len());
        frame.render_stateful_widget(table, table_area, &mut state);

        if coins.is_empty() && !markets.loading {
            let message = if markets.coins.is_empty() {
                "No coins loaded"
            } else {
                "No coins match the filter"
            };
            Self::render_empty(frame, table_area, message);
        }

        if markets.loading {
            render_loading(frame, table_area);
        }

        if let Some(results_area) = results_area {
            Self::render_search_results(frame, results_area, store);
        }
    }

    fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
        if area.height < 5 || area.width < 4 {
            return;
        }
        let inner = Rect {
            x: area.x + 2,
            y: area.y + 3,
            width: area.width - 4,
            height: 1,
        };
        frame.render_widget(
            Line::from(Span::styled(
                message.to_string(),
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
    }

    fn render_search_results(frame: &mut Frame, area: Rect, store: &Store) {
        let markets = &store.markets;
        let query = markets.remote_query.as_deref().unwrap_or_default();

        let items: Vec<ListItem> = if markets.search_results.is_empty() {
            vec![ListItem::new(Span::styled(
                "No matches",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            markets
                .search_results
                .iter()
                .map(|hit| {
                    let rank = hit
                        .market_cap_rank
                        .map(|r| format!("#{r:<5}"))
                        .unwrap_or_else(|| "      ".to_string());
                    ListItem::new(Line::from(vec![
                        Span::styled(rank, Style::default().fg(Color::DarkGray)),
                        Span::raw(truncate(&hit.name, 20)),
                        Span::styled(
                            format!(" {}", hit.symbol.to_uppercase()),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::styled(
                            format!("  /coin/{}", hit.id),
                            Style::default().fg(Color::Cyan),
                        ),
                    ]))
                })
                .collect()
        };

        let list = List::new(items).block(panel(format!("Search: {query}")));
        frame.render_widget(list, area);
    }
}
