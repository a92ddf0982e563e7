//! # cointerm - a terminal client for a crypto trading platform
//!
//! Browse markets, follow coins, trade and manage a wallet against the
//! platform's REST backend, all from the terminal. Built with ratatui.
//!
//! ## Architecture
//!
//! - **App**: lifecycle, route resolution and side effects
//! - **Session**: authentication state and the route guard
//! - **Router**: the route table and path parsing
//! - **API**: HTTP client, DTOs and bearer credentials
//! - **State**: the synchronous store and its reducers
//! - **Events**: input handling and key bindings
//! - **UI**: layout and widgets
//! - **Config**: settings files and environment overrides

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod format;
pub mod router;
pub mod session;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
