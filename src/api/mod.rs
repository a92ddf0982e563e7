//! Backend API integration.
//!
//! This module provides the REST client, the service traits the rest of
//! the application depends on, and bearer-token storage.

mod client;
mod credentials;
mod dto;
mod gateway;

pub use client::{ApiClient, ApiClientBuilder};
pub use credentials::{CredentialHolder, FileCredentials, MemoryCredentials};
pub use dto::{AuthResponse, CreateOrderRequest, SearchHit};
pub use gateway::{AuthGateway, TradingApi};

#[cfg(test)]
pub use gateway::{MockAuthGateway, MockTradingApi};
