//! HTMX request detection and redirects.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST: &str = "hx-request";

/// Response header telling HTMX to do a full-page navigation.
pub const HX_REDIRECT: &str = "hx-redirect";

/// Response header replacing the browser URL after a swap.
pub const HX_PUSH_URL: &str = "hx-push-url";

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|v| v.as_bytes() == b"true")
}

/// Redirect that works for both full-page and HTMX requests.
///
/// HTMX follows a plain 3xx transparently and swaps the target page into
/// the fragment slot, so HTMX requests get `HX-Redirect` instead.
#[must_use]
pub fn redirect(location: &str, htmx: bool) -> Response {
    if htmx {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                let mut response = StatusCode::OK.into_response();
                response.headers_mut().insert(HX_REDIRECT, value);
                response
            }
            Err(_) => Redirect::to("/").into_response(),
        }
    } else {
        Redirect::to(location).into_response()
    }
}
