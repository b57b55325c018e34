//! Dashboard for logged-in users.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::api::ApiError;
use crate::error::AppError;
use crate::filters;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::models::{Booking, BookingQuery, ServiceProvider, User};
use crate::routes::bookings::BookingRow;
use crate::services::dashboard::{DashboardStats, find_provider_profile};
use crate::state::AppState;

/// Recent bookings shown on the dashboard.
const RECENT_BOOKINGS: u32 = 10;

/// Notice shown when the bookings fetch fails.
pub const DASHBOARD_LOAD_ERROR: &str = "Failed to load dashboard data";

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub user: User,
    pub bookings: Vec<BookingRow>,
    pub error: Option<String>,
    pub stats: Option<DashboardStats>,
    pub profile: Option<ServiceProvider>,
}

/// Display the dashboard.
///
/// Providers also get aggregate figures computed from their profile and the
/// fetched bookings. A failed profile lookup only hides the figures.
#[instrument(skip_all, fields(user_id = %current.id()))]
pub async fn show(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    layout: Layout,
) -> Result<impl IntoResponse, AppError> {
    let query = BookingQuery {
        per_page: RECENT_BOOKINGS,
        ..BookingQuery::default()
    };
    let (bookings, error): (Vec<Booking>, _) = match state
        .api()
        .bookings(Some(&current.token))
        .list(&query)
        .await
    {
        Ok(page) => (page.bookings, None),
        Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch dashboard bookings");
            (Vec::new(), Some(DASHBOARD_LOAD_ERROR.to_string()))
        }
    };

    let role = current.role();
    let profile = if role.is_provider() {
        match find_provider_profile(state.api(), &current.token, current.id(), &bookings).await {
            Ok(profile) => profile,
            Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
            Err(e) => {
                tracing::warn!(error = %e, "Provider profile lookup failed");
                None
            }
        }
    } else {
        None
    };
    let stats = profile
        .as_ref()
        .map(|provider| DashboardStats::compute(provider, &bookings));

    Ok(DashboardTemplate {
        layout,
        bookings: bookings.iter().map(|b| BookingRow::new(b, role)).collect(),
        user: current.user,
        error,
        stats,
        profile,
    })
}
