//! HTTP client for the trading backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::credentials::CredentialHolder;
use super::dto::{
    AmountRequest, AuthResponse, CreateOrderRequest, ErrorBody, SearchHit, SearchResponse,
    SigninRequest, SignupRequest, WatchlistRequest,
};
use super::gateway::{AuthGateway, TradingApi};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::session::User;
use crate::state::{ChartData, Coin, Order, Wallet, WalletTransaction, WatchListItem, Withdrawal};

/// Builder for creating an API client.
pub struct ApiClientBuilder {
    config: ApiConfig,
    credentials: Option<Arc<dyn CredentialHolder>>,
}

impl ApiClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
            credentials: None,
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Point the client at a different backend.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set where the bearer token is read from and written to.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialHolder>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Build the API client.
    pub fn build(self) -> Result<ApiClient> {
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(super::MemoryCredentials::new()));
        ApiClient::new(self.config, credentials)
    }
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// REST client for the backend.
///
/// Attaches `Authorization: Bearer <token>` whenever the credential holder
/// has a token. A 401 outside `/auth/*` clears the holder and surfaces as
/// [`Error::Unauthorized`].
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: Arc<dyn CredentialHolder>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.credentials.has_token())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialHolder>) -> Result<Self> {
        if config.base_url.starts_with("http://") && !config.is_local() {
            tracing::warn!(base_url = %config.base_url, "Backend URL is not using TLS");
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The credential holder shared with the session store.
    pub fn credentials(&self) -> Arc<dyn CredentialHolder> {
        Arc::clone(&self.credentials)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match self.credentials.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        self.decode(path, response).await
    }

    async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path).query(query).send().await?;
        self.decode(path, response).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path).json(body).send().await?;
        self.decode(path, response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path).send().await?;
        self.check(path, response).await.map(|_| ())
    }

    async fn decode<T: DeserializeOwned>(&self, path: &str, response: Response) -> Result<T> {
        let response = self.check(path, response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Map non-success statuses to errors.
    async fn check(&self, path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED && !path.starts_with("/auth/") {
            tracing::warn!(path, "Credential rejected, clearing stored token");
            self.credentials.clear();
            return Err(Error::Unauthorized);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        tracing::warn!(path, status = status.as_u16(), %message, "Request failed");
        Err(Error::api(status.as_u16(), message))
    }
}

#[async_trait]
impl AuthGateway for ApiClient {
    #[tracing::instrument(skip(self, password))]
    async fn signin(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.post("/auth/signin", &SigninRequest { email, password })
            .await
    }

    #[tracing::instrument(skip(self, password))]
    async fn signup(&self, full_name: &str, email: &str, password: &str) -> Result<AuthResponse> {
        self.post(
            "/auth/signup",
            &SignupRequest {
                full_name,
                email,
                password,
            },
        )
        .await
    }

    #[tracing::instrument(skip(self, code))]
    async fn verify_otp(&self, code: &str, session_id: &str) -> Result<AuthResponse> {
        let path = format!("/auth/twofactor/otp/{code}");
        let response = self
            .request(Method::POST, &path)
            .query(&[("id", session_id)])
            .send()
            .await?;
        self.decode(&path, response).await
    }

    async fn current_user(&self) -> Result<User> {
        self.get("/api/users/profile").await
    }
}

#[async_trait]
impl TradingApi for ApiClient {
    async fn all_coins(&self) -> Result<Vec<Coin>> {
        self.get("/api/assets").await
    }

    async fn coins_page(&self, page: u32) -> Result<Vec<Coin>> {
        self.get_with("/api/assets/coins", &[("page", page)]).await
    }

    async fn top_coins(&self) -> Result<Vec<Coin>> {
        self.get("/api/assets/top50coin").await
    }

    async fn market_chart(&self, coin_id: &str, days: u32) -> Result<ChartData> {
        self.get_with(&format!("/api/assets/{coin_id}/chart"), &[("days", days)])
            .await
    }

    async fn search_coins(&self, query: &str) -> Result<Vec<SearchHit>> {
        let response: SearchResponse = self
            .get_with("/api/assets/search", &[("q", query)])
            .await?;
        Ok(response.into())
    }

    async fn wallet(&self) -> Result<Wallet> {
        self.get("/api/wallet").await
    }

    async fn wallet_transactions(&self) -> Result<Vec<WalletTransaction>> {
        self.get("/api/wallet/transactions").await
    }

    #[tracing::instrument(skip(self))]
    async fn deposit(&self, amount: Decimal) -> Result<Wallet> {
        self.post("/api/wallet/deposit", &AmountRequest { amount })
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn withdraw(&self, amount: Decimal) -> Result<Withdrawal> {
        self.post("/api/withdrawals", &AmountRequest { amount }).await
    }

    async fn withdrawals(&self) -> Result<Vec<Withdrawal>> {
        self.get("/api/withdrawals").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order> {
        self.post("/api/orders/pay", &request).await
    }

    async fn order(&self, order_id: u64) -> Result<Order> {
        self.get(&format!("/api/orders/{order_id}")).await
    }

    async fn orders(&self) -> Result<Vec<Order>> {
        self.get("/api/orders").await
    }

    async fn watchlist(&self) -> Result<Vec<WatchListItem>> {
        self.get("/api/watchlist").await
    }

    async fn add_to_watchlist(&self, coin_id: &str) -> Result<WatchListItem> {
        self.post("/api/watchlist", &WatchlistRequest { coin_id })
            .await
    }

    async fn remove_from_watchlist(&self, coin_id: &str) -> Result<()> {
        self.delete(&format!("/api/watchlist/{coin_id}")).await
    }
}
