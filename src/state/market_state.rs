//! Market-related state.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire::{decimal_or_zero, timestamp};
use crate::api::SearchHit;

/// A coin as listed by `/api/assets`.
///
/// The backend relays market data in snake_case; camelCase is accepted too.
/// Missing or null numbers read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coin {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    #[serde(alias = "currentPrice", deserialize_with = "decimal_or_zero")]
    pub current_price: Decimal,
    #[serde(alias = "marketCap", deserialize_with = "decimal_or_zero")]
    pub market_cap: Decimal,
    #[serde(alias = "marketCapRank")]
    pub market_cap_rank: Option<u32>,
    #[serde(alias = "totalVolume", deserialize_with = "decimal_or_zero")]
    pub total_volume: Decimal,
    #[serde(alias = "high24h", deserialize_with = "decimal_or_zero")]
    pub high_24h: Decimal,
    #[serde(alias = "low24h", deserialize_with = "decimal_or_zero")]
    pub low_24h: Decimal,
    #[serde(alias = "priceChange24h", deserialize_with = "decimal_or_zero")]
    pub price_change_24h: Decimal,
    #[serde(alias = "priceChangePercentage24h", deserialize_with = "decimal_or_zero")]
    pub price_change_percentage_24h: Decimal,
    #[serde(alias = "circulatingSupply")]
    pub circulating_supply: Option<Decimal>,
    #[serde(alias = "totalSupply")]
    pub total_supply: Option<Decimal>,
    #[serde(alias = "maxSupply")]
    pub max_supply: Option<Decimal>,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub ath: Decimal,
    #[serde(deserialize_with = "decimal_or_zero")]
    pub atl: Decimal,
    #[serde(alias = "lastUpdated", deserialize_with = "timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Coin {
    /// Case-insensitive substring match on name or symbol. `needle` must be lowercase.
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.symbol.to_lowercase().contains(needle)
    }

    pub fn is_up(&self) -> bool {
        self.price_change_percentage_24h >= Decimal::ZERO
    }
}

/// Ordering applied to the market table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    ChangeAsc,
    ChangeDesc,
    MarketCapAsc,
    #[default]
    MarketCapDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::MarketCapDesc,
        SortKey::MarketCapAsc,
        SortKey::PriceDesc,
        SortKey::PriceAsc,
        SortKey::ChangeDesc,
        SortKey::ChangeAsc,
        SortKey::NameAsc,
        SortKey::NameDesc,
    ];

    pub fn compare(self, a: &Coin, b: &Coin) -> Ordering {
        match self {
            Self::PriceAsc => a.current_price.cmp(&b.current_price),
            Self::PriceDesc => b.current_price.cmp(&a.current_price),
            Self::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::NameDesc => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
            Self::ChangeAsc => a
                .price_change_percentage_24h
                .cmp(&b.price_change_percentage_24h),
            Self::ChangeDesc => b
                .price_change_percentage_24h
                .cmp(&a.price_change_percentage_24h),
            Self::MarketCapAsc => a.market_cap.cmp(&b.market_cap),
            Self::MarketCapDesc => b.market_cap.cmp(&a.market_cap),
        }
    }

    /// The next key in the cycle.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PriceAsc => "Price ↑",
            Self::PriceDesc => "Price ↓",
            Self::NameAsc => "Name A-Z",
            Self::NameDesc => "Name Z-A",
            Self::ChangeAsc => "24h ↑",
            Self::ChangeDesc => "24h ↓",
            Self::MarketCapAsc => "Market Cap ↑",
            Self::MarketCapDesc => "Market Cap ↓",
        }
    }
}

/// State for the market browser.
#[derive(Debug)]
pub struct MarketState {
    /// Coins of the loaded page, in backend order.
    pub coins: Vec<Coin>,
    /// 1-based page number.
    pub page: u32,
    /// Local filter typed with `/`.
    pub search: String,
    pub sort: SortKey,
    /// Index into [`MarketState::visible_coins`].
    pub selected_index: usize,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    /// Results of the last remote search, with the query that produced them.
    pub search_results: Vec<SearchHit>,
    pub remote_query: Option<String>,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            coins: Vec::new(),
            page: 1,
            search: String::new(),
            sort: SortKey::default(),
            selected_index: 0,
            loading: false,
            last_updated: None,
            search_results: Vec::new(),
            remote_query: None,
        }
    }
}

impl MarketState {
    /// Loaded coins filtered by the search text and ordered by the sort key.
    ///
    /// Always derived from the full page; `coins` itself is never reordered.
    pub fn visible_coins(&self) -> Vec<&Coin> {
        let needle = self.search.trim().to_lowercase();
        let mut coins: Vec<&Coin> = self
            .coins
            .iter()
            .filter(|c| needle.is_empty() || c.matches(&needle))
            .collect();
        coins.sort_by(|a, b| self.sort.compare(a, b));
        coins
    }

    pub fn selected_coin(&self) -> Option<&Coin> {
        self.visible_coins().get(self.selected_index).copied()
    }

    pub fn set_coins(&mut self, coins: Vec<Coin>) {
        self.coins = coins;
        self.loading = false;
        self.last_updated = Some(Utc::now());
        self.clamp_selection();
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.selected_index = 0;
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.selected_index = 0;
    }

    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
        self.selected_index = 0;
    }

    /// Returns `false` when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.selected_index = 0;
        true
    }

    pub fn clamp_selection(&mut self) {
        let max = self.visible_coins().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
    }
}
