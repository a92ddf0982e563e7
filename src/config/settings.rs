//! Configuration settings for cointerm.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// UI configuration.
    pub ui: UiConfig,
    /// Key bindings.
    pub keybindings: KeyBindings,
}

impl Config {
    /// Load configuration from the default location.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from a TOML file layered under `COINTERM__*`
    /// environment variables. A missing file yields the defaults.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        let settings = config::Config::builder()
            .add_source(
                config::File::from(config_path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(super::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = settings.try_deserialize()?;
        tracing::debug!(
            path = %config_path.display(),
            base_url = %loaded.api.base_url,
            "Configuration loaded"
        );
        Ok(loaded)
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

fn default_config_path() -> PathBuf {
    super::config_dir()
        .map(|p| p.join("config.toml"))
        .unwrap_or_else(|_| PathBuf::from("config.toml"))
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend base URL (auth endpoints live under `/auth`, data under `/api`).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Keep the bearer token on disk between runs.
    pub persist_credentials: bool,
    /// Override for the token file location.
    pub credentials_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5454".to_string(),
            timeout_secs: 30,
            persist_credentials: true,
            credentials_path: None,
        }
    }
}

impl ApiConfig {
    /// Where the bearer token is stored when persistence is enabled.
    pub fn token_path(&self) -> crate::Result<PathBuf> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => super::data_dir().map(|dir| dir.join("token")),
        }
    }

    /// Whether the base URL points at the local machine.
    pub fn is_local(&self) -> bool {
        let host = self
            .base_url
            .split("://")
            .nth(1)
            .unwrap_or(&self.base_url);
        host.starts_with("localhost") || host.starts_with("127.0.0.1")
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Tick rate in milliseconds for UI updates.
    pub tick_rate_ms: u64,
    /// Enable mouse support.
    pub mouse_support: bool,
    /// Show status bar.
    pub show_status_bar: bool,
    /// Show help bar.
    pub show_help_bar: bool,
    /// Rows per visible page of the market table.
    pub coins_per_page: usize,
    /// Initial chart window in days on the coin detail screen.
    pub chart_days: u32,
    /// How many recent orders the dashboard shows.
    pub dashboard_recent_orders: usize,
    /// How long notifications stay on screen.
    pub notification_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            mouse_support: true,
            show_status_bar: true,
            show_help_bar: true,
            coins_per_page: 10,
            chart_days: 7,
            dashboard_recent_orders: 5,
            notification_secs: 4,
        }
    }
}

/// Key bindings configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    /// Quit the application.
    pub quit: String,
    /// Show help.
    pub help: String,
    /// Navigate up.
    pub up: String,
    /// Navigate down.
    pub down: String,
    /// Previous page / option.
    pub left: String,
    /// Next page / option.
    pub right: String,
    /// Select/confirm.
    pub select: String,
    /// Cancel/back.
    pub back: String,
    /// Refresh data.
    pub refresh: String,
    /// Focus the market search box.
    pub search: String,
    /// Open the command line.
    pub command: String,
    /// Toggle the selected coin in the watchlist.
    pub toggle_watchlist: String,
    /// Cycle the market sort order.
    pub cycle_sort: String,
    /// Open the buy form.
    pub buy: String,
    /// Open the sell form.
    pub sell: String,
    /// Open the deposit form.
    pub deposit: String,
    /// Open the withdraw form.
    pub withdraw: String,
    /// Sign out.
    pub logout: String,
    /// Switch to dashboard.
    pub dashboard: String,
    /// Switch to market.
    pub market: String,
    /// Switch to wallet.
    pub wallet: String,
    /// Switch to orders.
    pub orders: String,
    /// Switch to watchlist.
    pub watchlist: String,
    /// Switch to profile.
    pub profile: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            help: "?".to_string(),
            up: "k".to_string(),
            down: "j".to_string(),
            left: "h".to_string(),
            right: "l".to_string(),
            select: "Enter".to_string(),
            back: "Esc".to_string(),
            refresh: "r".to_string(),
            search: "/".to_string(),
            command: ":".to_string(),
            toggle_watchlist: "w".to_string(),
            cycle_sort: "s".to_string(),
            buy: "b".to_string(),
            sell: "x".to_string(),
            deposit: "d".to_string(),
            withdraw: "t".to_string(),
            logout: "Ctrl+l".to_string(),
            dashboard: "1".to_string(),
            market: "2".to_string(),
            wallet: "3".to_string(),
            orders: "4".to_string(),
            watchlist: "5".to_string(),
            profile: "6".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5454");
        assert_eq!(config.ui.coins_per_page, 10);
        assert_eq!(config.keybindings.market, "2");
        assert!(config.api.is_local());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.ui.chart_days, 7);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://trade.example.com\"\n\n[ui]\nchart_days = 30\n",
        )
        .unwrap();

        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.api.base_url, "https://trade.example.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.chart_days, 30);
        assert_eq!(config.ui.coins_per_page, 10);
        assert!(!config.api.is_local());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.keybindings.quit = "Ctrl+q".to_string();
        config.save(Some(path.clone())).unwrap();

        let reloaded: Config = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.keybindings.quit, "Ctrl+q");
    }

    #[test]
    fn test_token_path_override() {
        let api = ApiConfig {
            credentials_path: Some(PathBuf::from("/tmp/cointerm-token")),
            ..ApiConfig::default()
        };
        assert_eq!(api.token_path().unwrap(), PathBuf::from("/tmp/cointerm-token"));
    }
}
