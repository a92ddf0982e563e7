//! Coin detail screen: key figures and a price chart.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph},
};
use rust_decimal::Decimal;

use super::{change_style, panel, render_loading};
use crate::format;
use crate::state::{CHART_DAYS, ChartData, Coin, Store};

/// Coin detail widget.
pub struct CoinDetail;

impl CoinDetail {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, coin_id: &str) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(6)])
            .split(area);

        let watched = store.watchlist.contains(coin_id);
        Self::render_summary(frame, chunks[0], store.find_coin(coin_id), coin_id, watched);
        Self::render_chart(frame, chunks[1], store);
    }

    fn render_summary(
        frame: &mut Frame,
        area: Rect,
        coin: Option<&Coin>,
        coin_id: &str,
        watched: bool,
    ) {
        let star = if watched { " ★" } else { "" };
        let Some(coin) = coin else {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Market data for this coin is not loaded; the chart still works.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(panel(format!("{coin_id}{star}")));
            frame.render_widget(paragraph, area);
            return;
        };

        let label = |s: &'static str| Span::styled(s, Style::default().fg(Color::DarkGray));
        let supply = |v: Option<Decimal>| v.map(format::number).unwrap_or_else(|| "-".into());

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format::price(coin.current_price),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    format!(
                        "{} ({})",
                        format::percentage(coin.price_change_percentage_24h),
                        format::price(coin.price_change_24h)
                    ),
                    change_style(coin.price_change_percentage_24h),
                ),
            ]),
            Line::from(vec![
                label("Market cap "),
                Span::raw(format::compact(coin.market_cap)),
                label("   Rank "),
                Span::raw(
                    coin.market_cap_rank
                        .map(|r| format!("#{r}"))
                        .unwrap_or_else(|| "-".into()),
                ),
                label("   Volume "),
                Span::raw(format::compact(coin.total_volume)),
            ]),
            Line::from(vec![
                label("24h high "),
                Span::raw(format::price(coin.high_24h)),
                label("   24h low "),
                Span::raw(format::price(coin.low_24h)),
            ]),
            Line::from(vec![
                label("All-time high "),
                Span::raw(format::price(coin.ath)),
                label("   All-time low "),
                Span::raw(format::price(coin.atl)),
            ]),
            Line::from(vec![
                label("Circulating "),
                Span::raw(supply(coin.circulating_supply)),
                label("   Max "),
                Span::raw(supply(coin.max_supply)),
            ]),
        ];

        let title = format!("{} {}{star}", coin.name, coin.symbol.to_uppercase());
        frame.render_widget(Paragraph::new(lines).block(panel(title)), area);
    }

    fn render_chart(frame: &mut Frame, area: Rect, store: &Store) {
        let detail = &store.coin;
        let windows: Vec<String> = CHART_DAYS
            .iter()
            .map(|d| {
                if *d == detail.days {
                    format!("[{}]", window_label(*d))
                } else {
                    window_label(*d)
                }
            })
            .collect();
        let title = format!("Price · {}", windows.join(" "));

        let Some(chart) = detail.chart.as_ref().filter(|c| !c.prices.is_empty()) else {
            let message = if detail.loading {
                ""
            } else {
                "No chart data"
            };
            frame.render_widget(
                Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
                    .block(panel(title)),
                area,
            );
            if detail.loading {
                render_loading(frame, area);
            }
            return;
        };

        let (Some(x_bounds), Some(y_bounds)) = (chart.time_bounds(), chart.price_bounds()) else {
            return;
        };

        let color = match chart.change_percent() {
            Some(change) if change < 0.0 => Color::Red,
            _ => Color::Green,
        };

        let dataset = Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&chart.prices);

        let chart_widget = Chart::new(vec![dataset])
            .block(panel(format!("{title}{}", change_suffix(chart))))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(x_bounds)
                    .labels(vec![
                        Span::raw(axis_time(x_bounds[0], detail.days)),
                        Span::raw(axis_time(x_bounds[1], detail.days)),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::DarkGray))
                    .bounds(y_bounds)
                    .labels(vec![
                        Span::raw(axis_price(y_bounds[0])),
                        Span::raw(axis_price((y_bounds[0] + y_bounds[1]) / 2.0)),
                        Span::raw(axis_price(y_bounds[1])),
                    ]),
            );

        frame.render_widget(chart_widget, area);
        if detail.loading {
            render_loading(frame, area);
        }
    }
}

fn window_label(days: u32) -> String {
    match days {
        1 => "24h".to_string(),
        365 => "1y".to_string(),
        d => format!("{d}d"),
    }
}

fn change_suffix(chart: &ChartData) -> String {
    chart
        .change_percent()
        .map(|c| format!(" · {c:+.2}%"))
        .unwrap_or_default()
}

fn axis_price(value: f64) -> String {
    Decimal::try_from(value)
        .map(format::price)
        .unwrap_or_else(|_| format!("{value:.2}"))
}

/// Axis label for an epoch-millisecond timestamp; hours for a one-day window.
fn axis_time(epoch_ms: f64, days: u32) -> String {
    let Some(at) = DateTime::<Utc>::from_timestamp_millis(epoch_ms as i64) else {
        return String::new();
    };
    if days <= 1 {
        at.format("%H:%M").to_string()
    } else {
        format::date(at)
    }
}
