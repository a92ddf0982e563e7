//! Wallet screen: balance, transaction history and withdrawals.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::{header_style, panel, render_loading, selection, truncate};
use crate::format;
use crate::state::{Store, WithdrawalStatus};

/// Wallet widget.
pub struct WalletView;

impl WalletView {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let wallet = &store.wallet;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(6)])
            .split(area);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(rows[1]);

        let updated = wallet
            .last_updated
            .map(|at| format!("updated {}", format::relative_time(at, chrono::Utc::now())))
            .unwrap_or_default();
        let summary = Paragraph::new(vec![
            Line::from(vec![
                Span::styled(
                    format::currency(wallet.balance()),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "   {} pending withdrawal",
                        format::currency(wallet.pending_withdrawals())
                    ),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(Span::styled(updated, Style::default().fg(Color::DarkGray))),
        ])
        .block(panel(match &wallet.wallet {
            Some(w) => format!("Wallet #{}", w.id),
            None => "Wallet".to_string(),
        }));
        frame.render_widget(summary, rows[0]);

        let header = Row::new(
            ["Date", "Type", "Amount", "Description"]
                .into_iter()
                .map(|h| Cell::from(h).style(header_style())),
        )
        .bottom_margin(1);
        let tx_rows = wallet.transactions.iter().map(|tx| {
            let (sign, color) = if tx.transaction_type.is_credit() {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };
            Row::new(vec![
                Cell::from(format::optional_date(tx.created_at)),
                Cell::from(tx.transaction_type.to_string()),
                Cell::from(format!("{sign}{}", format::currency(tx.amount.abs())))
                    .style(Style::default().fg(color)),
                Cell::from(truncate(&tx.description, 40)),
            ])
        });
        let transactions = Table::new(
            tx_rows,
            [
                Constraint::Length(13),
                Constraint::Length(11),
                Constraint::Length(14),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(panel(format!("Transactions ({})", wallet.transactions.len())))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");
        let mut state = selection(wallet.selected_index, wallet.transactions.len());
        frame.render_stateful_widget(transactions, body[0], &mut state);

        let withdrawal_rows = wallet.withdrawals.iter().map(|w| {
            let color = match w.status {
                WithdrawalStatus::Pending => Color::Yellow,
                WithdrawalStatus::Completed => Color::Green,
                WithdrawalStatus::Rejected => Color::Red,
                WithdrawalStatus::Unknown => Color::DarkGray,
            };
            Row::new(vec![
                Cell::from(format::optional_date(w.created_at)),
                Cell::from(format::currency(w.amount)),
                Cell::from(w.status.to_string()).style(Style::default().fg(color)),
            ])
        });
        let withdrawals = Table::new(
            withdrawal_rows,
            [
                Constraint::Length(13),
                Constraint::Length(13),
                Constraint::Min(9),
            ],
        )
        .block(panel("Withdrawals"));
        frame.render_widget(withdrawals, body[1]);

        if wallet.loading {
            render_loading(frame, rows[1]);
        }
    }
}
