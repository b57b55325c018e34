//! Global handling of a token the backend no longer accepts.
//!
//! Handlers return [`AppError::SessionExpired`](crate::error::AppError) (or
//! let an upstream 401 propagate); the error response carries a
//! [`SessionExpiredMarker`]. This middleware clears the session once and
//! turns the redirect into an `HX-Redirect` for HTMX requests.

use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

use crate::error::SessionExpiredMarker;
use crate::guard::{login_url, return_path};
use crate::htmx;
use crate::models::Flash;
use crate::services::auth;

/// Clear the session when a handler reports that the backend rejected it.
pub async fn session_expiry_middleware(request: Request, next: Next) -> Response {
    let session = request.extensions().get::<Session>().cloned();
    let is_htmx = htmx::is_htmx(request.headers());
    let path = request.uri().path().to_string();
    let return_to = return_path(request.method(), request.uri(), request.headers());

    let response = next.run(request).await;
    if response.extensions().get::<SessionExpiredMarker>().is_none() {
        return response;
    }

    if let Some(session) = session {
        if let Err(e) = auth::clear(&session).await {
            tracing::error!(error = %e, "Failed to clear expired session");
        }
        if let Err(e) = Flash::info("Your session has expired. Please log in again.")
            .push(&session)
            .await
        {
            tracing::warn!(error = %e, "Failed to store session-expired notice");
        }
    }
    crate::error::clear_sentry_user();
    tracing::info!(path = %path, "Cleared session after backend rejected token");

    htmx::redirect(&login_url(return_to.as_deref()), is_htmx)
}
