//! Wallet, transaction and withdrawal state.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::{decimal_or_zero, timestamp};

/// The user's fiat wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Wallet {
    pub id: u64,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    #[default]
    Deposit,
    Withdrawal,
    Purchase,
    Sale,
    #[serde(other)]
    Other,
}

impl TransactionType {
    /// Whether the transaction adds to the balance.
    pub fn is_credit(self) -> bool {
        matches!(self, Self::Deposit | Self::Sale)
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Withdrawal => write!(f, "Withdrawal"),
            Self::Purchase => write!(f, "Purchase"),
            Self::Sale => write!(f, "Sale"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A movement on the wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletTransaction {
    pub id: u64,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub amount: Decimal,
    #[serde(alias = "type", alias = "purpose")]
    pub transaction_type: TransactionType,
    pub description: String,
    #[serde(alias = "date", deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    #[default]
    Pending,
    Completed,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Rejected => write!(f, "Rejected"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A withdrawal request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Withdrawal {
    pub id: u64,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub amount: Decimal,
    pub status: WithdrawalStatus,
    #[serde(alias = "date", deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Everything the wallet screen shows.
#[derive(Debug, Default)]
pub struct WalletState {
    pub wallet: Option<Wallet>,
    pub transactions: Vec<WalletTransaction>,
    pub withdrawals: Vec<Withdrawal>,
    pub selected_index: usize,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl WalletState {
    pub fn balance(&self) -> Decimal {
        self.wallet.as_ref().map(|w| w.balance).unwrap_or_default()
    }

    pub fn pending_withdrawals(&self) -> Decimal {
        self.withdrawals
            .iter()
            .filter(|w| w.status == WithdrawalStatus::Pending)
            .map(|w| w.amount)
            .sum()
    }

    /// Record a submitted withdrawal at the top of the list.
    pub fn record_withdrawal(&mut self, withdrawal: Withdrawal) {
        self.withdrawals.retain(|w| w.id != withdrawal.id);
        self.withdrawals.insert(0, withdrawal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transaction_wire_format() {
        let tx: WalletTransaction = serde_json::from_str(
            r#"{"id":4,"amount":250.75,"type":"DEPOSIT","description":"Top up","date":"2024-02-10"}"#,
        )
        .unwrap();
        assert_eq!(tx.transaction_type, TransactionType::Deposit);
        assert!(tx.transaction_type.is_credit());
        assert_eq!(tx.amount, dec!(250.75));
        assert!(tx.created_at.is_some());

        let odd: WalletTransaction =
            serde_json::from_str(r#"{"id":5,"transactionType":"WALLET_TRANSFER"}"#).unwrap();
        assert_eq!(odd.transaction_type, TransactionType::Other);
    }

    #[test]
    fn test_balance_and_pending() {
        let mut state = WalletState::default();
        assert_eq!(state.balance(), Decimal::ZERO);

        state.wallet = Some(Wallet {
            id: 1,
            balance: dec!(1000),
        });
        state.withdrawals = vec![
            Withdrawal {
                id: 1,
                amount: dec!(100),
                status: WithdrawalStatus::Pending,
                created_at: None,
            },
            Withdrawal {
                id: 2,
                amount: dec!(50),
                status: WithdrawalStatus::Completed,
                created_at: None,
            },
        ];
        assert_eq!(state.balance(), dec!(1000));
        assert_eq!(state.pending_withdrawals(), dec!(100));

        state.record_withdrawal(Withdrawal {
            id: 3,
            amount: dec!(20),
            ..Withdrawal::default()
        });
        assert_eq!(state.withdrawals[0].id, 3);
        assert_eq!(state.pending_withdrawals(), dec!(120));
    }
}
