//! Watchlist membership with optimistic updates.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry as returned by `/api/watchlist`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatchListItem {
    pub id: u64,
    pub coin_id: String,
}

/// A local change that has not been confirmed by the backend yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistChange {
    Added(String),
    Removed(String),
}

impl WatchlistChange {
    pub fn coin_id(&self) -> &str {
        match self {
            Self::Added(id) | Self::Removed(id) => id,
        }
    }
}

#[derive(Debug, Default)]
pub struct WatchlistState {
    coin_ids: BTreeSet<String>,
    pub selected_index: usize,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl WatchlistState {
    pub fn contains(&self, coin_id: &str) -> bool {
        self.coin_ids.contains(coin_id)
    }

    /// Watched coin ids in sorted order.
    pub fn coin_ids(&self) -> impl Iterator<Item = &str> {
        self.coin_ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.coin_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coin_ids.is_empty()
    }

    pub fn selected_coin_id(&self) -> Option<&str> {
        self.coin_ids().nth(self.selected_index)
    }

    /// Replace membership with the backend's view.
    pub fn set_items(&mut self, items: Vec<WatchListItem>) {
        self.coin_ids = items.into_iter().map(|item| item.coin_id).collect();
        self.loading = false;
        self.last_updated = Some(Utc::now());
        self.clamp_selection();
    }

    /// Flip membership of `coin_id` locally and return what changed.
    pub fn toggle(&mut self, coin_id: &str) -> WatchlistChange {
        if self.coin_ids.remove(coin_id) {
            self.clamp_selection();
            WatchlistChange::Removed(coin_id.to_string())
        } else {
            self.coin_ids.insert(coin_id.to_string());
            WatchlistChange::Added(coin_id.to_string())
        }
    }

    /// Undo a change the backend refused.
    pub fn rollback(&mut self, change: &WatchlistChange) {
        match change {
            WatchlistChange::Added(id) => {
                self.coin_ids.remove(id);
            }
            WatchlistChange::Removed(id) => {
                self.coin_ids.insert(id.clone());
            }
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.coin_ids.len().saturating_sub(1));
    }
}
