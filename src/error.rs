//! Error types for the cointerm application.

use thiserror::Error;

/// The main error type for cointerm.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/TUI related errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Transport-level HTTP failures (connect, timeout, body decode).
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the backend.
    #[error("Request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend rejected our credential (HTTP 401).
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid input or state
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Navigation to a path no screen handles
    #[error("Page not found: {0}")]
    NotFound(String),

    /// Generic application error
    #[error("{0}")]
    Application(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Create a new terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new application error.
    pub fn application(msg: impl Into<String>) -> Self {
        Self::Application(msg.into())
    }

    /// Create an API error from a status code and backend message.
    pub fn api(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: msg.into(),
        }
    }

    /// Whether this error means the credential is no longer accepted.
    ///
    /// A 401 from the sign-in endpoints is a rejected login, not an expired
    /// session, and arrives as [`Error::Api`] instead.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// The message shown to the user for this error.
    ///
    /// Backend and validation messages are shown verbatim; everything else
    /// uses the `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Auth(msg) | Self::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::api(401, "Invalid password").is_unauthorized());
        assert!(!Error::api(500, "boom").is_unauthorized());
        assert!(!Error::invalid_input("bad").is_unauthorized());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            Error::api(400, "Invalid password").user_message(),
            "Invalid password"
        );
        assert_eq!(Error::api(500, "").user_message(), "Request failed (500): ");
        assert_eq!(
            Error::invalid_input("Amount must be positive").user_message(),
            "Amount must be positive"
        );
        assert_eq!(
            Error::NotFound("/nope".into()).user_message(),
            "Page not found: /nope"
        );
    }
}
