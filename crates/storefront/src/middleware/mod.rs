//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame deny, etc.)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Session expiry (clear the session after an upstream 401)
//! 7. Rate limiting on auth and form POSTs (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_expiry;

pub use auth::{AuthRejection, OptionalAuth, RequireAuth, RequireRole};
pub use rate_limit::{auth_rate_limiter, form_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use session_expiry::session_expiry_middleware;
