//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                             - Home page
//! GET  /about, /privacy, /terms      - Markdown content pages
//! GET  /contact                      - Contact page
//! POST /contact                      - Contact form (rate limited)
//! GET  /become-a-provider            - Provider application page
//! POST /become-a-provider            - Provider application (rate limited)
//! GET  /health                       - Liveness
//! GET  /health/ready                 - Readiness (pings the backend)
//!
//! # Services
//! GET  /services                     - Search and browse providers
//! GET  /services/results             - Results fragment (HTMX)
//! GET  /services/providers/{id}      - Provider detail with reviews
//! POST /services/providers/{id}/book - Request a booking (customer, rate limited)
//!
//! # Auth
//! GET  /auth/login                   - Login page
//! POST /auth/login                   - Login action (rate limited)
//! GET  /auth/register                - Register page
//! POST /auth/register                - Register action (rate limited)
//! POST /auth/logout                  - Logout action
//!
//! # Logged in
//! GET  /dashboard                    - Dashboard
//! GET  /bookings                     - Booking list with status filter
//! GET  /bookings/{id}                - Booking detail
//! POST /bookings/{id}/status         - Lifecycle action
//! POST /bookings/{id}/review         - Review a completed booking
//! POST /reviews/{id}                 - Edit own review (customer)
//! POST /reviews/{id}/delete          - Delete own review (customer)
//! GET  /account/profile              - Account profile
//! POST /account/profile              - Save account profile
//! GET  /provider/profile             - Service profile editor (provider)
//! POST /provider/profile             - Create or update service profile
//! ```

pub mod account;
pub mod apply;
pub mod auth;
pub mod bookings;
pub mod contact;
pub mod dashboard;
pub mod home;
pub mod pages;
pub mod provider;
pub mod reviews;
pub mod services;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::middleware::{auth_rate_limiter, form_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(auth_rate_limiter())),
        )
        .route(
            "/register",
            get(auth::register_page).merge(post(auth::register).layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the services routes router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::index))
        .route("/results", get(services::results))
        .route("/providers/{id}", get(services::provider))
        .route(
            "/providers/{id}/book",
            post(services::book).layer(form_rate_limiter()),
        )
}

/// Create the bookings routes router.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::index))
        .route("/{id}", get(bookings::show))
        .route("/{id}/status", post(bookings::update_status))
        .route("/{id}/review", post(bookings::review))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public pages
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/privacy", get(pages::privacy))
        .route("/terms", get(pages::terms))
        .route(
            "/contact",
            get(contact::show).merge(post(contact::submit).layer(form_rate_limiter())),
        )
        .route(
            apply::APPLY_PATH,
            get(apply::show).merge(post(apply::submit).layer(form_rate_limiter())),
        )
        .nest("/services", service_routes())
        .nest("/auth", auth_routes())
        // Logged-in views
        .route("/dashboard", get(dashboard::show))
        .nest("/bookings", booking_routes())
        .route("/reviews/{id}", post(reviews::update))
        .route("/reviews/{id}/delete", post(reviews::delete))
        .route(
            "/account/profile",
            get(account::show).post(account::update),
        )
        .route(
            "/provider/profile",
            get(provider::show).post(provider::save),
        )
        // Health checks
        .route("/health", get(health))
        .route("/health/ready", get(ready))
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe: the backend must answer.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.api().ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::warn!(error = %e, "Backend not reachable");
            (StatusCode::SERVICE_UNAVAILABLE, "backend unavailable")
        }
    }
}
