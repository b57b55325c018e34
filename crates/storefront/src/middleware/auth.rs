//! Authentication extractors (route guards).
//!
//! Each extractor awaits the session read, asks [`guard::decide`] and either
//! yields the current user or rejects with a redirect.

use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use gharkakaam_core::UserType;

use crate::guard::{self, GuardDecision, RoleMarker};
use crate::htmx;
use crate::models::{CurrentUser, SessionState};

/// Extractor that requires an authenticated user of any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireAuth(current): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", current.user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires an authenticated user with role `R`.
///
/// # Example
///
/// ```rust,ignore
/// async fn provider_profile(RequireRole(current, _): RequireRole<Provider>) -> impl IntoResponse {
///     ...
/// }
/// ```
pub struct RequireRole<R: RoleMarker>(pub CurrentUser, pub PhantomData<R>);

/// Extractor that optionally gets the current user.
pub struct OptionalAuth(pub Option<CurrentUser>);

/// Rejection from a guard extractor.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect elsewhere (login or home).
    Redirect { location: String, htmx: bool },
    /// Session layer missing or store unreadable.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect { location, htmx } => htmx::redirect(&location, htmx),
            Self::SessionUnavailable => {
                tracing::error!("Session unavailable in auth extractor");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Read the session state from the request.
async fn load_state(parts: &Parts) -> Result<SessionState, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::SessionUnavailable)?;

    SessionState::load(session).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read session");
        AuthRejection::SessionUnavailable
    })
}

/// Run the guard for `required` and return the current user on `Allow`.
async fn guard_request(
    parts: &Parts,
    required: Option<UserType>,
) -> Result<CurrentUser, AuthRejection> {
    let state = load_state(parts).await?;
    // Nested routers strip their prefix from `parts.uri`.
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map_or(&parts.uri, |original| &original.0);
    let target = guard::return_path(&parts.method, uri, &parts.headers);

    let decision = guard::decide(&state, required, target.as_deref());
    match (decision.location(), state.current_user()) {
        (None, Some(current)) => Ok(current),
        (Some(location), _) => {
            if decision == GuardDecision::RedirectHome {
                tracing::debug!(path = %uri.path(), ?required, "Role mismatch, redirecting home");
            }
            Err(AuthRejection::Redirect {
                location,
                htmx: htmx::is_htmx(&parts.headers),
            })
        }
        // Allow always comes with a user.
        (None, None) => Err(AuthRejection::Redirect {
            location: guard::login_url(target.as_deref()),
            htmx: htmx::is_htmx(&parts.headers),
        }),
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard_request(parts, None).await.map(Self)
    }
}

impl<S, R> FromRequestParts<S> for RequireRole<R>
where
    S: Send + Sync,
    R: RoleMarker,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        guard_request(parts, Some(R::ROLE))
            .await
            .map(|current| Self(current, PhantomData))
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let current = load_state(parts)
            .await
            .ok()
            .and_then(|state| state.current_user());

        Ok(Self(current))
    }
}
