//! Route guard decisions.
//!
//! [`decide`] is a pure function of the session state, the role a view
//! requires and the requested path. The extractors in
//! [`crate::middleware::auth`] call it after the session has been read, so
//! no decision is made on partially loaded state.

use axum::http::{HeaderMap, Method, Uri, header};
use url::Url;

use gharkakaam_core::UserType;

use crate::models::SessionState;

/// Path of the login view.
pub const LOGIN_PATH: &str = "/auth/login";

/// Where users land after login when no usable return path was given.
pub const DEFAULT_RETURN_PATH: &str = "/dashboard";

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the view.
    Allow,
    /// Not logged in: send to login, then back to `return_to` if known.
    RedirectToLogin { return_to: Option<String> },
    /// Logged in with the wrong role: send home.
    RedirectHome,
}

impl GuardDecision {
    /// Redirect target for a non-`Allow` decision.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin { return_to } => Some(login_url(return_to.as_deref())),
            Self::RedirectHome => Some("/".to_string()),
        }
    }
}

/// Decide whether a view requiring `required` may be shown.
///
/// `target` is where login should return to, see [`return_path`].
#[must_use]
pub fn decide(
    state: &SessionState,
    required: Option<UserType>,
    target: Option<&str>,
) -> GuardDecision {
    match state.role() {
        None => GuardDecision::RedirectToLogin {
            return_to: target.map(ToString::to_string),
        },
        Some(role) if role.can_view(required) => GuardDecision::Allow,
        Some(_) => GuardDecision::RedirectHome,
    }
}

/// Login URL that returns to `return_to` afterwards.
#[must_use]
pub fn login_url(return_to: Option<&str>) -> String {
    match return_to.filter(|path| is_local_path(path)) {
        Some(path) => format!("{LOGIN_PATH}?next={}", urlencoding::encode(path)),
        None => LOGIN_PATH.to_string(),
    }
}

/// Where login should send the user back to after this request.
///
/// `GET` and `HEAD` return to the request itself. Other methods only have a
/// handler for that method, so they return to the page the form was posted
/// from (the `Referer` path), or nowhere.
#[must_use]
pub fn return_path(method: &Method, uri: &Uri, headers: &HeaderMap) -> Option<String> {
    if *method == Method::GET || *method == Method::HEAD {
        return Some(
            uri.path_and_query()
                .map_or_else(|| uri.path().to_string(), ToString::to_string),
        );
    }

    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let path = match Url::parse(referer) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        },
        Err(_) => referer.to_string(),
    };
    is_local_path(&path).then_some(path)
}

/// Post-login destination: `next` when it is a local path, else the dashboard.
#[must_use]
pub fn safe_return_path(next: Option<&str>) -> &str {
    next.filter(|path| is_local_path(path))
        .unwrap_or(DEFAULT_RETURN_PATH)
}

/// A path on this site: starts with `/` but not `//` or `/\`.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

// =============================================================================
// Role markers
// =============================================================================

/// Type-level role requirement for [`RequireRole`](crate::middleware::RequireRole).
pub trait RoleMarker: Send + Sync + 'static {
    /// The required role.
    const ROLE: UserType;
}

/// Customer-only views.
pub enum Customer {}

/// Provider-only views.
pub enum Provider {}

/// Admin-only views.
pub enum Admin {}

impl RoleMarker for Customer {
    const ROLE: UserType = UserType::Customer;
}

impl RoleMarker for Provider {
    const ROLE: UserType = UserType::Provider;
}

impl RoleMarker for Admin {
    const ROLE: UserType = UserType::Admin;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{AccessToken, User};

    fn state(role: Option<UserType>) -> SessionState {
        role.map_or_else(SessionState::default, |role| {
            let user: User = serde_json::from_value(serde_json::json!({
                "id": 1,
                "name": "Test",
                "email": "t@example.com",
                "user_type": role.as_str()
            }))
            .unwrap();
            SessionState::new(Some(AccessToken::new("t")), Some(user))
        })
    }

    #[test]
    fn test_unauthenticated_goes_to_login_with_target() {
        let decision = decide(&state(None), None, Some("/bookings?status=pending"));
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                return_to: Some("/bookings?status=pending".to_string())
            }
        );
        assert_eq!(
            decision.location().unwrap(),
            "/auth/login?next=%2Fbookings%3Fstatus%3Dpending"
        );
    }

    #[test]
    fn test_unauthenticated_with_role_requirement_still_goes_to_login() {
        assert!(matches!(
            decide(&state(None), Some(UserType::Provider), Some("/provider/profile")),
            GuardDecision::RedirectToLogin { .. }
        ));
    }

    #[test]
    fn test_wrong_role_goes_home() {
        let decision = decide(
            &state(Some(UserType::Customer)),
            Some(UserType::Provider),
            Some("/provider/profile"),
        );
        assert_eq!(decision, GuardDecision::RedirectHome);
        assert_eq!(decision.location().unwrap(), "/");
    }

    #[test]
    fn test_allow() {
        for role in UserType::ALL {
            assert_eq!(decide(&state(Some(role)), None, Some("/dashboard")), GuardDecision::Allow);
            assert_eq!(
                decide(&state(Some(role)), Some(role), Some("/x")),
                GuardDecision::Allow
            );
        }
    }

    #[test]
    fn test_half_written_session_is_unauthenticated() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "T", "email": "t@example.com"
        }))
        .unwrap();
        let state = SessionState::new(None, Some(user));
        assert!(matches!(
            decide(&state, None, Some("/dashboard")),
            GuardDecision::RedirectToLogin { .. }
        ));
    }

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path(Some("/bookings/4")), "/bookings/4");
        assert_eq!(safe_return_path(Some("//evil.example")), "/dashboard");
        assert_eq!(safe_return_path(Some("/\\evil.example")), "/dashboard");
        assert_eq!(safe_return_path(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_return_path(Some("")), "/dashboard");
        assert_eq!(safe_return_path(None), "/dashboard");
    }

    #[test]
    fn test_login_url_without_return_path() {
        assert_eq!(login_url(None), "/auth/login");
        assert_eq!(login_url(Some("https://evil.example")), "/auth/login");
        assert_eq!(
            decide(&state(None), None, None).location().unwrap(),
            "/auth/login"
        );
    }

    #[test]
    fn test_return_path_for_get_keeps_query() {
        let uri: Uri = "/bookings?status=pending".parse().unwrap();
        assert_eq!(
            return_path(&Method::GET, &uri, &HeaderMap::new()).as_deref(),
            Some("/bookings?status=pending")
        );
    }

    #[test]
    fn test_return_path_for_post_uses_referer_path() {
        let uri: Uri = "/bookings/1/status".parse().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            "http://localhost:3000/bookings/1?tab=notes".parse().unwrap(),
        );
        assert_eq!(
            return_path(&Method::POST, &uri, &headers).as_deref(),
            Some("/bookings/1?tab=notes")
        );

        headers.insert(header::REFERER, "javascript:alert(1)".parse().unwrap());
        assert_eq!(return_path(&Method::POST, &uri, &headers), None);

        assert_eq!(return_path(&Method::POST, &uri, &HeaderMap::new()), None);
    }
}
