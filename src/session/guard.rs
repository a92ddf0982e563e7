//! Decides whether a route may be shown for the current session.

use super::state::Session;
use crate::router::{Access, Route};

/// Outcome of [`guard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    /// A session call is in flight; show a spinner and decide later.
    Loading,
}

/// Resolve `route` against `session`.
pub fn guard(session: &Session, route: &Route) -> Navigation {
    if session.is_loading {
        return Navigation::Loading;
    }

    match route.access() {
        Access::Protected if !session.is_authenticated() => Navigation::Redirect(Route::Login),
        Access::AnonymousOnly if session.is_authenticated() => {
            Navigation::Redirect(Route::Dashboard)
        }
        _ if *route == Route::TwoFactor && !session.two_factor_required() => {
            Navigation::Redirect(Route::Login)
        }
        _ => Navigation::Render(route.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionEvent, SessionStatus};
    use pretty_assertions::assert_eq;

    fn authenticated() -> Session {
        Session {
            status: SessionStatus::Authenticated,
            ..Session::default()
        }
    }

    #[test]
    fn test_loading_defers() {
        let mut session = Session::default();
        session.apply(SessionEvent::Started);
        assert_eq!(guard(&session, &Route::Wallet), Navigation::Loading);
        assert_eq!(guard(&session, &Route::Login), Navigation::Loading);
    }

    #[test]
    fn test_protected_requires_login() {
        let anon = Session::default();
        assert_eq!(
            guard(&anon, &Route::Dashboard),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            guard(&anon, &Route::CoinDetail("bitcoin".into())),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            guard(&authenticated(), &Route::Wallet),
            Navigation::Render(Route::Wallet)
        );
    }

    #[test]
    fn test_anonymous_only_bounces_signed_in_users() {
        assert_eq!(
            guard(&authenticated(), &Route::Login),
            Navigation::Redirect(Route::Dashboard)
        );
        assert_eq!(
            guard(&Session::default(), &Route::Signup),
            Navigation::Render(Route::Signup)
        );
    }

    #[test]
    fn test_two_factor_needs_challenge() {
        assert_eq!(
            guard(&Session::default(), &Route::TwoFactor),
            Navigation::Redirect(Route::Login)
        );

        let mut session = Session::default();
        session.apply(SessionEvent::TwoFactorChallenge("otp-1".into()));
        assert_eq!(
            guard(&session, &Route::TwoFactor),
            Navigation::Render(Route::TwoFactor)
        );
        assert_eq!(
            guard(&session, &Route::Orders),
            Navigation::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_not_found_is_public() {
        let route = Route::NotFound("/nope".into());
        assert_eq!(
            guard(&Session::default(), &route),
            Navigation::Render(route.clone())
        );
        assert_eq!(guard(&authenticated(), &route), Navigation::Render(route));
    }
}
