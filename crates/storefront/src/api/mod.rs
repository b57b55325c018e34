//! Client for the GharKaKaam REST backend.
//!
//! # Architecture
//!
//! - One shared `reqwest::Client` with a per-request timeout
//! - Every path is joined onto a fixed base URL (default `http://localhost:5000/api/`)
//! - Calls are grouped the way the backend groups its routes: `auth`,
//!   `services`, `bookings`, `reviews`
//! - The backend is the source of truth. No caching, no retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use gharkakaam_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! // Public call
//! let categories = client.services(None).categories().await?;
//!
//! // Authenticated call
//! let page = client.bookings(Some(&current.token)).list(&BookingQuery::default()).await?;
//! ```

mod auth;
mod bookings;
mod reviews;
mod services;

pub use auth::{AuthApi, AuthResponse};
pub use bookings::BookingsApi;
pub use reviews::ReviewsApi;
pub use services::ServicesApi;

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ApiConfig;
use crate::models::{AccessToken, QueryParams};

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token missing, expired or rejected (401).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend (429).
    #[error("Rate limited by backend")]
    RateLimited,

    /// Request rejected by the backend (any other 4xx).
    #[error("Rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    /// Backend failure (5xx).
    #[error("Backend error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message suitable for an inline notice.
    ///
    /// Backend validation messages are shown as-is; everything else gets a
    /// generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } | Self::NotFound(message) => message.clone(),
            Self::Unauthorized => "Please log in again.".to_string(),
            Self::RateLimited => "Too many requests. Please try again shortly.".to_string(),
            Self::Server { .. } | Self::Http(_) | Self::Decode(_) | Self::Url(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Error body the backend sends on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract the human-readable message from an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

/// Map a non-success status to an [`ApiError`].
fn status_error(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(error_message(status, body)),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        s if s.is_server_error() => ApiError::Server {
            status,
            message: error_message(status, body),
        },
        _ => ApiError::Rejected {
            status,
            message: error_message(status, body),
        },
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the GharKaKaam REST backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("gharkakaam-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL every path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// `auth/*` calls.
    #[must_use]
    pub const fn auth<'a>(&'a self, token: Option<&'a AccessToken>) -> AuthApi<'a> {
        AuthApi::new(Call::new(self, token))
    }

    /// `services/*` calls.
    #[must_use]
    pub const fn services<'a>(&'a self, token: Option<&'a AccessToken>) -> ServicesApi<'a> {
        ServicesApi::new(Call::new(self, token))
    }

    /// `bookings/*` calls.
    #[must_use]
    pub const fn bookings<'a>(&'a self, token: Option<&'a AccessToken>) -> BookingsApi<'a> {
        BookingsApi::new(Call::new(self, token))
    }

    /// `reviews/*` calls.
    #[must_use]
    pub const fn reviews<'a>(&'a self, token: Option<&'a AccessToken>) -> ReviewsApi<'a> {
        ReviewsApi::new(Call::new(self, token))
    }

    /// Check the backend is reachable (used by the readiness probe).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend health endpoint does not answer 2xx.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = Call::new(self, None)
            .send(Method::GET, "health", &[], None::<&()>)
            .await?;
        Ok(())
    }
}

/// A single backend call scope: client plus optional bearer token.
#[derive(Clone, Copy)]
pub(crate) struct Call<'a> {
    client: &'a ApiClient,
    token: Option<&'a AccessToken>,
}

impl<'a> Call<'a> {
    const fn new(client: &'a ApiClient, token: Option<&'a AccessToken>) -> Self {
        Self { client, token }
    }

    fn url(&self, path: &str, query: &[(&'static str, String)]) -> Result<Url, ApiError> {
        let mut url = self.client.inner.base_url.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::GET, path, &[], None::<&()>).await
    }

    pub(crate) async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: QueryParams,
    {
        self.send(Method::GET, path, &query.query_pairs(), None::<&()>)
            .await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(Method::DELETE, path, &[], None::<&()>).await
    }

    /// Execute a request and decode the JSON response.
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.url(path, query)?;
        let mut request = self
            .client
            .inner
            .client
            .request(method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = self.token {
            request = request.bearer_auth(token.expose());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path, error = %e, "Backend request failed");
            ApiError::Http(e)
        })?;

        let status = response.status();
        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                %method,
                path,
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(status_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                %method,
                path,
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Decode(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, r#"{"error": "Provider not found"}"#),
            ApiError::NotFound(m) if m == "Provider not found"
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, r#"{"error": "Rating must be between 1 and 5"}"#),
            ApiError::Rejected { status, message }
                if status == StatusCode::BAD_REQUEST && message == "Rating must be between 1 and 5"
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, "<html>nope</html>"),
            ApiError::Rejected { message, .. } if message == "Forbidden"
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "boom"}"#),
            ApiError::Server { message, .. } if message == "boom"
        ));
    }

    #[test]
    fn test_user_message_hides_server_details() {
        let err = ApiError::Server {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "psycopg2.OperationalError".to_string(),
        };
        assert!(!err.user_message().contains("psycopg2"));

        let err = ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: "Provider profile already exists".to_string(),
        };
        assert_eq!(err.user_message(), "Provider profile already exists");
    }
}
