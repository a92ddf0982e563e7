//! Session data and its transition function.

use serde::{Deserialize, Serialize};

/// Role assigned to an account by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    #[serde(rename = "ROLE_CUSTOMER")]
    Customer,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "Customer"),
            Self::Admin => write!(f, "Admin"),
            Self::Other => write!(f, "Unknown"),
        }
    }
}

/// The signed-in account, as last reported by `GET /api/users/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "UserWire")]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub two_factor_enabled: bool,
}

impl User {
    /// First word of the full name, or the email's local part.
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .or_else(|| self.email.split('@').next())
            .unwrap_or("User")
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UserWire {
    id: u64,
    full_name: String,
    email: String,
    role: UserRole,
    two_factor_auth: Option<TwoFactorWire>,
    two_factor_enabled: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct TwoFactorWire {
    #[serde(alias = "isEnabled")]
    enabled: bool,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        let two_factor_enabled = wire
            .two_factor_enabled
            .or(wire.two_factor_auth.map(|tfa| tfa.enabled))
            .unwrap_or(false);

        Self {
            id: wire.id,
            full_name: wire.full_name,
            email: wire.email,
            role: wire.role,
            two_factor_enabled,
        }
    }
}

/// Where the client is in the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Anonymous,
    /// Credentials accepted; a one-time code must be paired with this id.
    AwaitingTwoFactor { session_id: String },
    Authenticated,
}

/// Inputs to [`Session::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A backend call began.
    Started,
    /// A token was issued.
    Authenticated,
    /// Login needs a one-time code for this challenge.
    TwoFactorChallenge(String),
    UserLoaded(User),
    UserLoadFailed(String),
    /// A backend call failed; the status is left alone.
    Failed(String),
    /// Rejected locally, no backend call was made.
    ValidationFailed(String),
    LoggedOut,
    /// The backend stopped accepting the token.
    Expired,
}

/// The client's belief about who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub user: Option<User>,
    pub status: SessionStatus,
    pub is_loading: bool,
    pub error: Option<String>,
    /// The backend rejected the credential; cleared by the next attempt.
    pub expired: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn two_factor_required(&self) -> bool {
        matches!(self.status, SessionStatus::AwaitingTwoFactor { .. })
    }

    /// The pending two-factor challenge id.
    pub fn session_id(&self) -> Option<&str> {
        match &self.status {
            SessionStatus::AwaitingTwoFactor { session_id } => Some(session_id),
            _ => None,
        }
    }

    /// Apply one transition.
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Started => {
                self.is_loading = true;
                self.error = None;
                self.expired = false;
            }
            SessionEvent::Authenticated => {
                self.status = SessionStatus::Authenticated;
                self.is_loading = false;
            }
            SessionEvent::TwoFactorChallenge(session_id) => {
                self.status = SessionStatus::AwaitingTwoFactor { session_id };
                self.is_loading = false;
            }
            SessionEvent::UserLoaded(user) => {
                self.user = Some(user);
                self.status = SessionStatus::Authenticated;
                self.is_loading = false;
            }
            SessionEvent::UserLoadFailed(message) => {
                self.user = None;
                if self.is_authenticated() {
                    self.status = SessionStatus::Anonymous;
                }
                self.is_loading = false;
                self.error = Some(message);
            }
            SessionEvent::Failed(message) | SessionEvent::ValidationFailed(message) => {
                self.is_loading = false;
                self.error = Some(message);
            }
            SessionEvent::LoggedOut => *self = Self::default(),
            SessionEvent::Expired => {
                *self = Self {
                    error: Some(crate::Error::Unauthorized.to_string()),
                    expired: true,
                    ..Self::default()
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> User {
        User {
            id: 7,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            role: UserRole::Customer,
            two_factor_enabled: false,
        }
    }

    fn assert_invariants(session: &Session) {
        if session.two_factor_required() {
            assert!(session.session_id().is_some());
            assert!(!session.is_authenticated());
        }
        if session.is_authenticated() {
            assert!(!session.two_factor_required());
        }
    }

    #[test]
    fn test_initial_session() {
        let session = Session::default();
        assert_eq!(session.status, SessionStatus::Anonymous);
        assert!(!session.is_loading);
        assert!(session.user.is_none());
        assert!(session.error.is_none());
        assert_invariants(&session);
    }

    #[test]
    fn test_challenge_then_authenticate() {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        assert!(session.is_loading);

        session.apply(SessionEvent::TwoFactorChallenge("otp-1".into()));
        assert_eq!(session.session_id(), Some("otp-1"));
        assert!(!session.is_loading);
        assert_invariants(&session);

        session.apply(SessionEvent::Authenticated);
        assert!(session.is_authenticated());
        assert_eq!(session.session_id(), None);
        assert_invariants(&session);
    }

    #[test]
    fn test_failure_keeps_status() {
        let mut session = Session::default();
        session.apply(SessionEvent::TwoFactorChallenge("otp-1".into()));
        session.apply(SessionEvent::Started);
        session.apply(SessionEvent::Failed("Invalid OTP".into()));

        assert_eq!(session.session_id(), Some("otp-1"));
        assert_eq!(session.error.as_deref(), Some("Invalid OTP"));
        assert!(!session.is_loading);
    }

    #[test]
    fn test_user_load_failure_signs_out_authenticated_session() {
        let mut session = Session::default();
        session.apply(SessionEvent::UserLoaded(user()));
        assert!(session.is_authenticated());

        session.apply(SessionEvent::UserLoadFailed("Token expired".into()));
        assert_eq!(session.status, SessionStatus::Anonymous);
        assert!(session.user.is_none());
        assert_eq!(session.error.as_deref(), Some("Token expired"));
    }

    #[test]
    fn test_user_load_failure_keeps_pending_challenge() {
        let mut session = Session::default();
        session.apply(SessionEvent::TwoFactorChallenge("otp-9".into()));
        session.apply(SessionEvent::UserLoadFailed("no token".into()));
        assert_eq!(session.session_id(), Some("otp-9"));
        assert_invariants(&session);
    }

    #[test]
    fn test_logout_and_expiry_reset() {
        let mut session = Session::default();
        session.apply(SessionEvent::UserLoaded(user()));
        session.apply(SessionEvent::LoggedOut);
        assert_eq!(session, Session::default());

        session.apply(SessionEvent::UserLoaded(user()));
        session.apply(SessionEvent::Expired);
        assert_eq!(session.status, SessionStatus::Anonymous);
        assert!(session.user.is_none());
        assert!(session.expired);

        session.apply(SessionEvent::Started);
        assert!(!session.expired);
        assert!(session.error.is_some());
    }

    #[test]
    fn test_user_wire_shapes() {
        let nested: User = serde_json::from_str(
            r#"{"id":3,"fullName":"Grace Hopper","email":"grace@example.com","role":"ROLE_ADMIN","twoFactorAuth":{"enabled":true}}"#,
        )
        .unwrap();
        assert_eq!(nested.role, UserRole::Admin);
        assert!(nested.two_factor_enabled);
        assert_eq!(nested.first_name(), "Grace");

        let flat: User = serde_json::from_str(
            r#"{"id":4,"fullName":"","email":"x@example.com","role":"ROLE_SUPPORT","twoFactorEnabled":false}"#,
        )
        .unwrap();
        assert_eq!(flat.role, UserRole::Other);
        assert!(!flat.two_factor_enabled);
        assert_eq!(flat.first_name(), "x");
    }
}
