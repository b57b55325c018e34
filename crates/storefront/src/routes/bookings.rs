//! Booking list, detail, lifecycle actions and reviews of completed bookings.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gharkakaam_core::{BookingAction, BookingId, BookingStatus, UserType};

use crate::api::ApiError;
use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::models::{
    Booking, BookingQuery, CreateReviewRequest, CurrentUser, Flash, PageInfo, StatusUpdateRequest,
};
use crate::state::AppState;

/// Bookings per page on the full list.
const BOOKINGS_PER_PAGE: u32 = 10;

// =============================================================================
// View models
// =============================================================================

/// A booking as one row of a list.
#[derive(Debug, Clone)]
pub struct BookingRow {
    pub id: BookingId,
    pub title: String,
    /// The other party: the customer for providers, the provider otherwise.
    pub counterparty: String,
    pub service_date: NaiveDateTime,
    pub status: BookingStatus,
    pub price: Option<String>,
}

impl BookingRow {
    /// Build a row as seen by a viewer with `role`.
    #[must_use]
    pub fn new(booking: &Booking, role: UserType) -> Self {
        Self {
            id: booking.id,
            title: booking.service_title().to_string(),
            counterparty: booking.counterparty_name(role).to_string(),
            service_date: booking.service_date,
            status: booking.status,
            price: booking.display_price().map(|p| p.display()),
        }
    }
}

/// Status filter on the bookings list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingFilters {
    pub status: String,
    pub page: u32,
}

impl BookingFilters {
    /// Selected status; empty, `all` and unknown values mean every status.
    #[must_use]
    pub fn status(&self) -> Option<BookingStatus> {
        self.status.trim().parse().ok()
    }

    /// Backend query for these filters.
    #[must_use]
    pub fn to_query(&self) -> BookingQuery {
        BookingQuery {
            page: self.page.max(1),
            per_page: BOOKINGS_PER_PAGE,
            status: self.status(),
        }
    }

    /// Link to `page` of the list with the current status filter.
    #[must_use]
    pub fn page_href(&self, page: u32) -> String {
        match self.status() {
            Some(status) => format!("/bookings?status={status}&page={page}"),
            None => format!("/bookings?page={page}"),
        }
    }

    /// Whether the "All" tab is selected.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.status().is_none()
    }

    /// Whether `status` is the selected tab.
    #[must_use]
    pub fn is_status(&self, status: &BookingStatus) -> bool {
        self.status() == Some(*status)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Bookings list page.
#[derive(Template, WebTemplate)]
#[template(path = "bookings/index.html")]
pub struct BookingsTemplate {
    pub layout: Layout,
    pub filters: BookingFilters,
    pub statuses: &'static [BookingStatus],
    pub bookings: Vec<BookingRow>,
    pub page: PageInfo,
    pub error: Option<String>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

/// Booking detail page.
#[derive(Template, WebTemplate)]
#[template(path = "bookings/show.html")]
pub struct BookingTemplate {
    pub layout: Layout,
    pub booking: Booking,
    pub counterparty: String,
    pub counterparty_label: &'static str,
    pub price: Option<String>,
    pub actions: Vec<BookingAction>,
    pub can_review: bool,
}

impl BookingTemplate {
    /// Whether `action` needs the final price field.
    #[must_use]
    pub fn asks_final_price(&self, action: &BookingAction) -> bool {
        *action == BookingAction::Complete
    }

    /// Whether `action` is destructive and styled as such.
    #[must_use]
    pub fn is_cancel(&self, action: &BookingAction) -> bool {
        *action == BookingAction::Cancel
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the current user's bookings.
#[instrument(skip_all, fields(user_id = %current.id()))]
pub async fn index(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    layout: Layout,
    Query(filters): Query<BookingFilters>,
) -> Result<impl IntoResponse, AppError> {
    let role = current.role();
    let result = state
        .api()
        .bookings(Some(&current.token))
        .list(&filters.to_query())
        .await;

    let (bookings, page, error) = match result {
        Ok(page) => (
            page.bookings
                .iter()
                .map(|b| BookingRow::new(b, role))
                .collect(),
            page.page,
            None,
        ),
        Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch bookings");
            (
                Vec::new(),
                PageInfo::default(),
                Some("Failed to load bookings".to_string()),
            )
        }
    };

    Ok(BookingsTemplate {
        layout,
        prev_href: page.previous().map(|p| filters.page_href(p)),
        next_href: page.next().map(|p| filters.page_href(p)),
        filters,
        statuses: &BookingStatus::ALL,
        bookings,
        page,
        error,
    })
}

/// Display one booking with the actions open to the viewer.
///
/// # Errors
///
/// Returns 404 when the backend doesn't know the booking.
#[instrument(skip_all, fields(booking_id = id))]
pub async fn show(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    layout: Layout,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state
        .api()
        .bookings(Some(&current.token))
        .get(BookingId::new(id))
        .await?;

    let role = current.role();
    Ok(BookingTemplate {
        layout,
        counterparty: booking.counterparty_name(role).to_string(),
        counterparty_label: if role.is_provider() {
            "Customer"
        } else {
            "Provider"
        },
        price: booking.display_price().map(|p| p.display()),
        actions: booking.actions_for(current.id(), role),
        can_review: booking.is_reviewable_by(current.id()),
        booking,
    })
}

/// Lifecycle action form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusForm {
    pub action: String,
    pub notes: String,
    pub final_price: String,
}

impl StatusForm {
    /// Resolve the requested action against those `available`.
    fn action(&self, available: &[BookingAction]) -> Option<BookingAction> {
        available
            .iter()
            .copied()
            .find(|action| action.as_str() == self.action.trim())
    }

    /// Build the backend request for `action`.
    fn to_request(&self, action: BookingAction) -> Result<StatusUpdateRequest, String> {
        let final_price = match self.final_price.trim() {
            "" => None,
            _ if action != BookingAction::Complete => None,
            raw => Some(
                raw.parse::<Decimal>()
                    .ok()
                    .filter(|p| p.is_sign_positive())
                    .ok_or_else(|| "Please enter the final price as a number.".to_string())?,
            ),
        };

        Ok(StatusUpdateRequest {
            status: action.target(),
            notes: Some(self.notes.trim())
                .filter(|n| !n.is_empty())
                .map(String::from),
            final_price,
        })
    }
}

/// Flash an API failure, or hand a rejected token to the session-expiry
/// middleware.
async fn flash_api_error(session: &Session, error: ApiError) -> Result<(), AppError> {
    if matches!(error, ApiError::Unauthorized) {
        return Err(AppError::SessionExpired);
    }
    Flash::error(error.user_message()).push(session).await?;
    Ok(())
}

/// Apply a lifecycle action to a booking.
///
/// The action must be one the lifecycle offers the viewer for the booking's
/// current status; anything else is refused without calling the backend.
///
/// # Errors
///
/// Returns `AppError` if the booking can't be loaded or the session can't
/// hold the notice.
#[instrument(skip_all, fields(booking_id = id, action = %form.action))]
pub async fn update_status(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    let booking_id = BookingId::new(id);
    let detail = format!("/bookings/{booking_id}");
    let api = state.api().bookings(Some(&current.token));

    let booking = api.get(booking_id).await?;
    let available = booking.actions_for(current.id(), current.role());

    let Some(action) = form.action(&available) else {
        tracing::warn!(status = %booking.status, "Refused unavailable booking action");
        Flash::error("That action isn't available for this booking.")
            .push(&session)
            .await?;
        return Ok(Redirect::to(&detail).into_response());
    };

    let request = match form.to_request(action) {
        Ok(request) => request,
        Err(message) => {
            Flash::error(message).push(&session).await?;
            return Ok(Redirect::to(&detail).into_response());
        }
    };

    match api.update_status(booking_id, &request).await {
        Ok(updated) => {
            tracing::info!(status = %updated.status, "Booking status updated");
            Flash::success(format!("Booking is now {}.", updated.status.label().to_lowercase()))
                .push(&session)
                .await?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Status update rejected");
            flash_api_error(&session, e).await?;
        }
    }
    Ok(Redirect::to(&detail).into_response())
}

/// Review form, shared by create and edit.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub rating: String,
    pub comment: String,
    /// Local path to return to after an edit or delete.
    pub next: String,
}

impl ReviewForm {
    /// Rating from 1 to 5.
    ///
    /// # Errors
    ///
    /// Returns a message when the rating is missing or out of range.
    pub fn rating(&self) -> Result<u8, String> {
        self.rating
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| "Please choose a rating from 1 to 5 stars.".to_string())
    }

    /// Trimmed comment, `None` when blank.
    #[must_use]
    pub fn comment(&self) -> Option<String> {
        Some(self.comment.trim())
            .filter(|c| !c.is_empty())
            .map(String::from)
    }
}

/// Review a completed booking (customer who made it only).
///
/// # Errors
///
/// Returns `AppError` if the booking can't be loaded or the session can't
/// hold the notice.
#[instrument(skip_all, fields(booking_id = id))]
pub async fn review(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let booking_id = BookingId::new(id);
    let detail = format!("/bookings/{booking_id}");

    let booking = state
        .api()
        .bookings(Some(&current.token))
        .get(booking_id)
        .await?;
    if !booking.is_reviewable_by(current.id()) {
        Flash::error("Only the customer can review a completed booking.")
            .push(&session)
            .await?;
        return Ok(Redirect::to(&detail).into_response());
    }

    let rating = match form.rating() {
        Ok(rating) => rating,
        Err(message) => {
            Flash::error(message).push(&session).await?;
            return Ok(Redirect::to(&detail).into_response());
        }
    };

    let request = CreateReviewRequest {
        booking_id,
        rating,
        comment: form.comment(),
    };
    match state.api().reviews(Some(&current.token)).create(&request).await {
        Ok(review) => {
            record_review(&current, "Review posted");
            tracing::info!(review_id = %review.id, "Review created");
            Flash::success("Thanks for your review!").push(&session).await?;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Review rejected");
            flash_api_error(&session, e).await?;
        }
    }
    Ok(Redirect::to(&detail).into_response())
}

pub(crate) fn record_review(current: &CurrentUser, message: &str) {
    let user_id = current.id().to_string();
    add_breadcrumb("review", message, Some(&[("user_id", user_id.as_str())]));
}
