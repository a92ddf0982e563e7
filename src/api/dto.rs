//! Wire types exchanged with the backend that have no home in `state`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::state::OrderType;

/// Response body of every `/auth/*` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthResponse {
    pub status: bool,
    pub message: String,
    pub two_factor_auth_enabled: bool,
    pub session: Option<String>,
    pub jwt: Option<String>,
}

impl AuthResponse {
    /// Whether the backend wants a one-time code before issuing a token.
    pub fn requires_two_factor(&self) -> bool {
        self.two_factor_auth_enabled
    }
}

/// `POST /auth/signin` body.
#[derive(Debug, Clone, Serialize)]
pub struct SigninRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /auth/signup` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for deposits and withdrawals.
#[derive(Debug, Clone, Serialize)]
pub struct AmountRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// `POST /api/watchlist` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistRequest<'a> {
    pub coin_id: &'a str,
}

/// `POST /api/orders/pay` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub coin_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub order_type: OrderType,
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|m| !m.trim().is_empty())
    }
}

/// One entry of `GET /api/assets/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(alias = "marketCapRank")]
    pub market_cap_rank: Option<u32>,
}

/// Search responses come either as a bare list or wrapped in `{ coins: [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum SearchResponse {
    Wrapped { coins: Vec<SearchHit> },
    Bare(Vec<SearchHit>),
}

impl From<SearchResponse> for Vec<SearchHit> {
    fn from(resp: SearchResponse) -> Self {
        match resp {
            SearchResponse::Wrapped { coins } => coins,
            SearchResponse::Bare(coins) => coins,
        }
    }
}
