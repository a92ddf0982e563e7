//! The session store: sign-in actions on top of [`Session::apply`].

use std::sync::Arc;

use super::state::{Session, SessionEvent};
use crate::api::{AuthGateway, AuthResponse, CredentialHolder};
use crate::error::Error;

/// Message recorded when a two-factor step is attempted without a challenge.
pub const MISSING_CHALLENGE: &str = "Session ID is missing";

/// Owns the [`Session`] and performs the backend calls that move it.
///
/// None of the actions return errors: every failure ends up in
/// [`Session::error`] and the state machine stays consistent.
pub struct SessionStore {
    session: Session,
    gateway: Arc<dyn AuthGateway>,
    credentials: Arc<dyn CredentialHolder>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl SessionStore {
    /// Create a store in the anonymous state.
    pub fn new(gateway: Arc<dyn AuthGateway>, credentials: Arc<dyn CredentialHolder>) -> Self {
        Self {
            session: Session::default(),
            gateway,
            credentials,
        }
    }

    /// Current session snapshot.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn apply(&mut self, event: SessionEvent) {
        tracing::debug!(?event, "Session transition");
        self.session.apply(event);
    }

    /// Sign in with email and password.
    pub async fn login(&mut self, email: &str, password: &str) {
        self.apply(SessionEvent::Started);

        match self.gateway.signin(email, password).await {
            Ok(response) if response.requires_two_factor() => match response.session {
                Some(session_id) => {
                    tracing::info!("Two-factor challenge issued");
                    self.apply(SessionEvent::TwoFactorChallenge(session_id));
                }
                None => self.apply(SessionEvent::Failed(
                    "Two-factor session is missing".to_string(),
                )),
            },
            Ok(response) => self.complete(response).await,
            Err(e) => self.fail("Failed to login", &e),
        }
    }

    /// Register a new account and sign in with it.
    pub async fn signup(&mut self, full_name: &str, email: &str, password: &str) {
        self.apply(SessionEvent::Started);

        match self.gateway.signup(full_name, email, password).await {
            Ok(response) => self.complete(response).await,
            Err(e) => self.fail("Failed to signup", &e),
        }
    }

    /// Answer the pending two-factor challenge with a one-time code.
    pub async fn verify_two_factor(&mut self, code: &str) {
        let Some(session_id) = self.session.session_id().map(str::to_owned) else {
            self.apply(SessionEvent::ValidationFailed(MISSING_CHALLENGE.to_string()));
            return;
        };

        self.apply(SessionEvent::Started);

        match self.gateway.verify_otp(code, &session_id).await {
            Ok(response) => self.complete(response).await,
            Err(e) => self.fail("Failed to verify OTP", &e),
        }
    }

    /// Refresh the cached user. Safe to call repeatedly.
    pub async fn fetch_current_user(&mut self) {
        self.apply(SessionEvent::Started);

        match self.gateway.current_user().await {
            Ok(user) => {
                tracing::info!(user_id = user.id, "Current user loaded");
                self.apply(SessionEvent::UserLoaded(user));
            }
            Err(e) if e.is_unauthorized() => {
                tracing::warn!("Credential rejected while loading the current user");
                self.expire();
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch current user");
                self.apply(SessionEvent::UserLoadFailed(e.user_message()));
            }
        }
    }

    /// Resume a session from a stored token, if there is one.
    pub async fn restore(&mut self) {
        if self.credentials.has_token() {
            tracing::info!("Resuming stored session");
            self.fetch_current_user().await;
        }
    }

    /// Forget the credential and return to anonymous. Purely local.
    pub fn logout(&mut self) {
        self.credentials.clear();
        self.apply(SessionEvent::LoggedOut);
        tracing::info!("Signed out");
    }

    /// The backend rejected the credential; drop everything.
    pub fn expire(&mut self) {
        self.credentials.clear();
        self.apply(SessionEvent::Expired);
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.session.error = error;
    }

    pub fn clear_error(&mut self) {
        self.set_error(None);
    }

    /// Store the issued token, mark the session authenticated and load the user.
    async fn complete(&mut self, response: AuthResponse) {
        if let Some(jwt) = response.jwt.as_deref() {
            if let Err(e) = self.credentials.set_token(jwt) {
                tracing::warn!(error = %e, "Could not store credential");
            }
        }

        self.apply(SessionEvent::Authenticated);
        self.fetch_current_user().await;
    }

    fn fail(&mut self, fallback: &str, error: &Error) {
        tracing::warn!(error = %error, "{fallback}");
        let message = match error.user_message() {
            m if m.is_empty() => fallback.to_string(),
            m => m,
        };
        self.apply(SessionEvent::Failed(message));
    }
}
