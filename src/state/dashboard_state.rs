//! Dashboard state.

use chrono::{DateTime, Utc};

use super::{Coin, Order, Wallet, WalletTransaction};

/// Results of the dashboard's concurrent fetches. A `None` part failed.
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub top_coins: Option<Vec<Coin>>,
    pub wallet: Option<Wallet>,
    pub transactions: Option<Vec<WalletTransaction>>,
    pub orders: Option<Vec<Order>>,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub top_coins: Vec<Coin>,
    pub selected_index: usize,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn selected_coin(&self) -> Option<&Coin> {
        self.top_coins.get(self.selected_index)
    }

    /// The biggest 24h gainer among the top coins.
    pub fn top_gainer(&self) -> Option<&Coin> {
        self.top_coins
            .iter()
            .max_by(|a, b| a.price_change_percentage_24h.cmp(&b.price_change_percentage_24h))
    }

    pub fn top_loser(&self) -> Option<&Coin> {
        self.top_coins
            .iter()
            .min_by(|a, b| a.price_change_percentage_24h.cmp(&b.price_change_percentage_24h))
    }
}
