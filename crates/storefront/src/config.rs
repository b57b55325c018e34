//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `GHARKAKAAM_API_URL` - REST backend base URL (default: http://localhost:5000/api)
//! - `GHARKAKAAM_API_TIMEOUT_SECS` - Per-request timeout for backend calls (default: 15)
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CONTENT_DIR` - Markdown content directory (default: crates/storefront/content)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `SUPPORT_PHONE` - Support phone number shown on the contact page
//! - `SUPPORT_EMAIL` - Support email address
//! - `SUPPORT_WHATSAPP` - Support WhatsApp number (digits, with country code)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_API_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// REST backend configuration
    pub api: ApiConfig,
    /// Support contact details rendered on public pages
    pub support: SupportContact,
    /// Directory holding markdown content pages
    pub content_dir: PathBuf,
    /// Directory holding static assets
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

/// REST backend configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (e.g. `http://localhost:5000/api`)
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Support contact details.
#[derive(Debug, Clone)]
pub struct SupportContact {
    /// Display phone number (e.g. `+91 98765 43210`)
    pub phone: String,
    /// Support email address
    pub email: String,
    /// WhatsApp number, digits with country code (e.g. `919876543210`)
    pub whatsapp: String,
}

impl Default for SupportContact {
    fn default() -> Self {
        Self {
            phone: "+91 98765 43210".to_string(),
            email: "support@gharkakaam.com".to_string(),
            whatsapp: "919876543210".to_string(),
        }
    }
}

impl SupportContact {
    /// `tel:` link for the support phone number.
    #[must_use]
    pub fn tel_link(&self) -> String {
        crate::links::tel_link(&self.phone)
    }

    /// `mailto:` link for the support email.
    #[must_use]
    pub fn mailto_link(&self) -> String {
        format!("mailto:{}", self.email)
    }

    /// WhatsApp chat link for the support number.
    #[must_use]
    pub fn whatsapp_link(&self) -> String {
        format!("https://wa.me/{}", self.whatsapp)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_string(), e.to_string())
        })?;

        let defaults = SupportContact::default();
        let support = SupportContact {
            phone: get_env_or_default("SUPPORT_PHONE", &defaults.phone),
            email: get_env_or_default("SUPPORT_EMAIL", &defaults.email),
            whatsapp: get_env_or_default("SUPPORT_WHATSAPP", &defaults.whatsapp),
        };

        Ok(Self {
            host,
            port,
            base_url,
            api: ApiConfig::from_env()?,
            support,
            content_dir: get_env_or_default("STOREFRONT_CONTENT_DIR", "crates/storefront/content")
                .into(),
            static_dir: get_env_or_default("STOREFRONT_STATIC_DIR", "crates/storefront/static")
                .into(),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the storefront is served over HTTPS (controls secure cookies).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_env_or_default("GHARKAKAAM_API_URL", DEFAULT_API_URL);
        let timeout_secs: u64 = parse_env(
            "GHARKAKAAM_API_TIMEOUT_SECS",
            &DEFAULT_API_TIMEOUT_SECS.to_string(),
        )?;

        Ok(Self {
            base_url: parse_api_url(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar("GHARKAKAAM_API_URL".to_string(), e))?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse the backend base URL, normalizing it to end with `/` so that
/// relative joins keep the `/api` prefix.
///
/// # Errors
///
/// Returns a description of the problem if the URL is invalid or not HTTP(S).
pub fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme: {}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig {
                base_url: parse_api_url("http://localhost:5000/api").unwrap(),
                timeout: Duration::from_secs(15),
            },
            support: SupportContact::default(),
            content_dir: "content".into(),
            static_dir: "static".into(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_https() {
        let mut config = test_config();
        assert!(!config.is_https());
        config.base_url = "https://gharkakaam.com".to_string();
        assert!(config.is_https());
    }

    #[test]
    fn test_parse_api_url_appends_slash() {
        let url = parse_api_url("http://localhost:5000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/");
        assert_eq!(
            url.join("services/providers").unwrap().as_str(),
            "http://localhost:5000/api/services/providers"
        );
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        assert!(parse_api_url("ftp://example.com/api").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_support_links() {
        let support = SupportContact::default();
        assert_eq!(support.tel_link(), "tel:+919876543210");
        assert_eq!(support.mailto_link(), "mailto:support@gharkakaam.com");
        assert_eq!(support.whatsapp_link(), "https://wa.me/919876543210");
    }
}
