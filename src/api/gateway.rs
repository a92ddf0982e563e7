//! Service traits the rest of the application programs against.
//!
//! [`super::ApiClient`] is the production implementation; tests use the
//! generated `MockAuthGateway` / `MockTradingApi`.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::dto::{AuthResponse, CreateOrderRequest, SearchHit};
use crate::error::Result;
use crate::session::User;
use crate::state::{ChartData, Coin, Order, Wallet, WalletTransaction, WatchListItem, Withdrawal};

/// The backend's authentication endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /auth/signin`.
    async fn signin(&self, email: &str, password: &str) -> Result<AuthResponse>;

    /// `POST /auth/signup`.
    async fn signup(&self, full_name: &str, email: &str, password: &str) -> Result<AuthResponse>;

    /// `POST /auth/twofactor/otp/{code}?id={session_id}`.
    async fn verify_otp(&self, code: &str, session_id: &str) -> Result<AuthResponse>;

    /// `GET /api/users/profile`.
    async fn current_user(&self) -> Result<User>;
}

/// Market, wallet, order and watchlist endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradingApi: Send + Sync {
    /// `GET /api/assets`.
    async fn all_coins(&self) -> Result<Vec<Coin>>;

    /// `GET /api/assets/coins?page=`.
    async fn coins_page(&self, page: u32) -> Result<Vec<Coin>>;

    /// `GET /api/assets/top50coin`.
    async fn top_coins(&self) -> Result<Vec<Coin>>;

    /// `GET /api/assets/{id}/chart?days=`.
    async fn market_chart(&self, coin_id: &str, days: u32) -> Result<ChartData>;

    /// `GET /api/assets/search?q=`.
    async fn search_coins(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// `GET /api/wallet`.
    async fn wallet(&self) -> Result<Wallet>;

    /// `GET /api/wallet/transactions`.
    async fn wallet_transactions(&self) -> Result<Vec<WalletTransaction>>;

    /// `POST /api/wallet/deposit`.
    async fn deposit(&self, amount: Decimal) -> Result<Wallet>;

    /// `POST /api/withdrawals`.
    async fn withdraw(&self, amount: Decimal) -> Result<Withdrawal>;

    /// `GET /api/withdrawals`.
    async fn withdrawals(&self) -> Result<Vec<Withdrawal>>;

    /// `POST /api/orders/pay`.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order>;

    /// `GET /api/orders/{id}`.
    async fn order(&self, order_id: u64) -> Result<Order>;

    /// `GET /api/orders`.
    async fn orders(&self) -> Result<Vec<Order>>;

    /// `GET /api/watchlist`.
    async fn watchlist(&self) -> Result<Vec<WatchListItem>>;

    /// `POST /api/watchlist`.
    async fn add_to_watchlist(&self, coin_id: &str) -> Result<WatchListItem>;

    /// `DELETE /api/watchlist/{coinId}`.
    async fn remove_from_watchlist(&self, coin_id: &str) -> Result<()>;
}
