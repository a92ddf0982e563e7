//! Screens and the paths that address them.

use std::fmt;

/// Who may view a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Requires an authenticated session.
    Protected,
    /// Only meaningful while signed out.
    AnonymousOnly,
    Public,
}

/// A screen of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    Login,
    Signup,
    TwoFactor,
    #[default]
    Dashboard,
    Market,
    CoinDetail(String),
    Trading(String),
    Wallet,
    Orders,
    Watchlist,
    Profile,
    NotFound(String),
}

impl Route {
    /// Screens reachable from the tab bar, in display order.
    pub const TABS: [Route; 6] = [
        Route::Dashboard,
        Route::Market,
        Route::Wallet,
        Route::Orders,
        Route::Watchlist,
        Route::Profile,
    ];

    /// Resolve a path. Unknown paths become [`Route::NotFound`].
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };

        let segments: Vec<&str> = normalized
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Self::Dashboard,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["two-factor"] => Self::TwoFactor,
            ["market"] => Self::Market,
            ["coin", id] => Self::CoinDetail((*id).to_string()),
            ["trade", id] => Self::Trading((*id).to_string()),
            ["wallet"] => Self::Wallet,
            ["orders"] => Self::Orders,
            ["watchlist"] => Self::Watchlist,
            ["profile"] => Self::Profile,
            _ => Self::NotFound(trimmed.to_string()),
        }
    }

    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".into(),
            Self::Signup => "/signup".into(),
            Self::TwoFactor => "/two-factor".into(),
            Self::Dashboard => "/dashboard".into(),
            Self::Market => "/market".into(),
            Self::CoinDetail(id) => format!("/coin/{id}"),
            Self::Trading(id) => format!("/trade/{id}"),
            Self::Wallet => "/wallet".into(),
            Self::Orders => "/orders".into(),
            Self::Watchlist => "/watchlist".into(),
            Self::Profile => "/profile".into(),
            Self::NotFound(path) => path.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Signup => "Sign Up",
            Self::TwoFactor => "Two-Factor",
            Self::Dashboard => "Dashboard",
            Self::Market => "Market",
            Self::CoinDetail(_) => "Coin",
            Self::Trading(_) => "Trade",
            Self::Wallet => "Wallet",
            Self::Orders => "Orders",
            Self::Watchlist => "Watchlist",
            Self::Profile => "Profile",
            Self::NotFound(_) => "Not Found",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Signup | Self::TwoFactor => Access::AnonymousOnly,
            Self::NotFound(_) => Access::Public,
            _ => Access::Protected,
        }
    }

    /// Position in [`Route::TABS`]; detail screens highlight their parent.
    pub fn tab_index(&self) -> Option<usize> {
        match self {
            Self::CoinDetail(_) | Self::Trading(_) => {
                Self::TABS.iter().position(|r| *r == Self::Market)
            }
            other => Self::TABS.iter().position(|r| r == other),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/two-factor"), Route::TwoFactor);
        assert_eq!(Route::parse("/market/"), Route::Market);
        assert_eq!(
            Route::parse("/coin/bitcoin"),
            Route::CoinDetail("bitcoin".into())
        );
        assert_eq!(
            Route::parse("/trade/ethereum"),
            Route::Trading("ethereum".into())
        );
    }

    #[test]
    fn test_parse_unknown_path() {
        assert_eq!(
            Route::parse("/nowhere"),
            Route::NotFound("/nowhere".into())
        );
        assert_eq!(
            Route::parse("/coin"),
            Route::NotFound("/coin".into())
        );
        assert_eq!(
            Route::parse("/coin/a/b"),
            Route::NotFound("/coin/a/b".into())
        );
    }

    #[test]
    fn test_path_is_inverse_of_parse() {
        let routes = [
            Route::Login,
            Route::Signup,
            Route::TwoFactor,
            Route::Dashboard,
            Route::Market,
            Route::CoinDetail("solana".into()),
            Route::Trading("solana".into()),
            Route::Wallet,
            Route::Orders,
            Route::Watchlist,
            Route::Profile,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_access_levels() {
        assert_eq!(Route::Login.access(), Access::AnonymousOnly);
        assert_eq!(Route::Wallet.access(), Access::Protected);
        assert_eq!(Route::CoinDetail("x".into()).access(), Access::Protected);
        assert_eq!(Route::NotFound("/x".into()).access(), Access::Public);
    }

    #[test]
    fn test_tab_index() {
        assert_eq!(Route::Dashboard.tab_index(), Some(0));
        assert_eq!(Route::Trading("btc".into()).tab_index(), Some(1));
        assert_eq!(Route::Login.tab_index(), None);
    }
}
