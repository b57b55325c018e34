//! Services browse/search, provider detail and booking requests.
//!
//! Filter state lives in the query string. The filter form issues one HTMX
//! request to `/services/results` per change with `hx-sync="this:replace"`,
//! so a newer request aborts the one in flight. Each fragment carries the
//! signature of the filters it was rendered for.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderValue,
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tower_sessions::Session;
use tracing::instrument;

use gharkakaam_core::{CategoryId, ProviderId, UserId};

use crate::api::ApiError;
use crate::error::AppError;
use crate::filters;
use crate::guard::Customer;
use crate::htmx::HX_PUSH_URL;
use crate::layout::Layout;
use crate::links::whatsapp_link;
use crate::middleware::{OptionalAuth, RequireRole};
use crate::models::{
    CreateBookingRequest, Flash, PageInfo, PageQuery, ProviderQuery, Review, ServiceCategory,
    ServiceProvider,
};
use crate::state::AppState;

/// Cities offered in the location filter.
pub const LOCATIONS: [&str; 6] = ["Mumbai", "Delhi", "Bangalore", "Pune", "Chennai", "Hyderabad"];

/// Providers per results page.
pub const PROVIDERS_PER_PAGE: u32 = 12;

/// Reviews per page on the provider detail view.
const REVIEWS_PER_PAGE: u32 = 5;

/// Filter value meaning "no filter".
const ALL: &str = "all";

/// Duration choices on the booking form, in minutes.
pub const DURATION_OPTIONS: [(u32, &str); 5] = [
    (60, "1 hour"),
    (120, "2 hours"),
    (180, "3 hours"),
    (240, "4 hours"),
    (480, "Full day (8 hours)"),
];

// =============================================================================
// Filters
// =============================================================================

/// Filters from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceFilters {
    pub search: String,
    pub location: String,
    pub category: String,
    #[serde(deserialize_with = "lenient_page")]
    pub page: u32,
}

/// Page number from a query string; anything unparseable means page 1.
fn lenient_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or(1))
}

fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL)
}

impl ServiceFilters {
    /// Backend query for these filters.
    #[must_use]
    pub fn to_query(&self) -> ProviderQuery {
        ProviderQuery {
            page: self.page.max(1),
            per_page: PROVIDERS_PER_PAGE,
            category_id: self.category_id(),
            location: (!is_unset(&self.location)).then(|| self.location.trim().to_string()),
            search: Some(self.search.trim())
                .filter(|s| !s.is_empty())
                .map(String::from),
            min_rating: None,
        }
    }

    /// Selected category, if the value is a backend category ID.
    fn category_id(&self) -> Option<CategoryId> {
        if is_unset(&self.category) {
            return None;
        }
        self.category.trim().parse::<i64>().ok().map(CategoryId::new)
    }

    /// Normalized query string identifying these filters.
    #[must_use]
    pub fn signature(&self) -> String {
        self.query_string(self.page.max(1))
    }

    fn query_string(&self, page: u32) -> String {
        let query = self.to_query();
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        if let Some(search) = &query.search {
            serializer.append_pair("search", search);
        }
        if let Some(location) = &query.location {
            serializer.append_pair("location", location);
        }
        if let Some(category_id) = query.category_id {
            serializer.append_pair("category", &category_id.to_string());
        }
        if page > 1 {
            serializer.append_pair("page", &page.to_string());
        }
        serializer.finish()
    }

    /// Link to `page` of the full services view with these filters.
    #[must_use]
    pub fn page_href(&self, page: u32) -> String {
        let query = self.query_string(page);
        if query.is_empty() {
            "/services".to_string()
        } else {
            format!("/services?{query}")
        }
    }

    /// Whether `location` is the selected city.
    #[must_use]
    pub fn is_location(&self, location: &str) -> bool {
        self.location.trim().eq_ignore_ascii_case(location)
    }

    /// Whether `category` is the selected category.
    #[must_use]
    pub fn is_category(&self, category: &ServiceCategory) -> bool {
        self.category_id() == Some(category.id)
    }
}

// =============================================================================
// View models
// =============================================================================

/// A provider as shown on a results card or the detail view.
#[derive(Debug, Clone)]
pub struct ProviderCard {
    pub id: ProviderId,
    pub name: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub location: Option<String>,
    pub rating: String,
    pub total_reviews: u32,
    pub total_bookings: u32,
    pub experience_years: Option<u32>,
    pub price_range: Option<String>,
    pub specialties: Vec<String>,
    pub whatsapp: Option<String>,
    pub is_verified: bool,
}

impl From<&ServiceProvider> for ProviderCard {
    fn from(provider: &ServiceProvider) -> Self {
        let name = provider.display_name().to_string();
        let location = provider
            .service_area
            .clone()
            .filter(|area| !area.trim().is_empty())
            .or_else(|| provider.user.as_ref().and_then(|u| u.location.clone()));

        Self {
            id: provider.id,
            whatsapp: provider
                .phone()
                .and_then(|phone| whatsapp_link(phone, &name, &provider.service_title)),
            name,
            title: provider.service_title.clone(),
            category: provider.category_name().to_string(),
            description: provider.description.clone(),
            location,
            rating: provider.rating_display(),
            total_reviews: provider.total_reviews,
            total_bookings: provider.total_bookings,
            experience_years: provider.experience_years,
            price_range: provider.price_range(),
            specialties: provider.specialties().to_vec(),
            is_verified: provider.user.as_ref().is_some_and(|u| u.is_verified),
        }
    }
}

/// One rendered page of search results.
#[derive(Debug, Clone, Default)]
pub struct ProviderResults {
    pub providers: Vec<ProviderCard>,
    pub page: PageInfo,
    /// Notice when the fetch failed.
    pub error: Option<String>,
    /// Filters this page was rendered for.
    pub signature: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl ProviderResults {
    fn empty(filters: &ServiceFilters) -> Self {
        Self {
            signature: filters.signature(),
            ..Self::default()
        }
    }
}

/// Fetch one page of providers for `filters`.
///
/// A failure is logged and rendered as a notice over an empty result set.
async fn fetch_results(state: &AppState, filters: &ServiceFilters) -> ProviderResults {
    let query = filters.to_query();
    match state.api().services(None).providers(&query).await {
        Ok(page) => ProviderResults {
            providers: page.providers.iter().map(ProviderCard::from).collect(),
            prev_href: page.page.previous().map(|p| filters.page_href(p)),
            next_href: page.page.next().map(|p| filters.page_href(p)),
            page: page.page,
            error: None,
            signature: filters.signature(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch service providers");
            ProviderResults {
                error: Some("Failed to load service providers".to_string()),
                ..ProviderResults::empty(filters)
            }
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Full services page.
#[derive(Template, WebTemplate)]
#[template(path = "services/index.html")]
pub struct ServicesTemplate {
    pub layout: Layout,
    pub filters: ServiceFilters,
    pub categories: Vec<ServiceCategory>,
    pub categories_error: Option<String>,
    pub locations: &'static [&'static str],
    pub results: ProviderResults,
}

/// Results fragment swapped in by HTMX.
#[derive(Template, WebTemplate)]
#[template(path = "services/results.html")]
pub struct ServiceResultsTemplate {
    pub results: ProviderResults,
}

/// Provider detail page.
#[derive(Template, WebTemplate)]
#[template(path = "services/provider.html")]
pub struct ProviderTemplate {
    pub layout: Layout,
    pub provider: ProviderCard,
    pub reviews: Vec<Review>,
    pub reviews_page: PageInfo,
    pub reviews_error: Option<String>,
    pub can_book: bool,
    pub durations: &'static [(u32, &'static str)],
    /// Logged-in user, for edit controls on their own reviews.
    pub viewer: Option<UserId>,
}

impl ProviderTemplate {
    /// Whether the viewer wrote `review`.
    #[must_use]
    pub fn is_own(&self, review: &Review) -> bool {
        self.viewer.is_some_and(|id| review.is_written_by(id))
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the services page.
///
/// Issues one categories fetch and one providers fetch.
#[instrument(skip(state, layout))]
pub async fn index(
    State(state): State<AppState>,
    layout: Layout,
    Query(filters): Query<ServiceFilters>,
) -> impl IntoResponse {
    let (categories, categories_error) = match state.api().services(None).categories().await {
        Ok(categories) => (categories, None),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch categories");
            (Vec::new(), Some("Failed to load categories".to_string()))
        }
    };

    let results = fetch_results(&state, &filters).await;

    ServicesTemplate {
        layout,
        filters,
        categories,
        categories_error,
        locations: &LOCATIONS,
        results,
    }
}

/// Render the results fragment for the current filters.
///
/// Pushes the matching full-page URL so the filters survive a reload.
#[instrument(skip(state))]
pub async fn results(
    State(state): State<AppState>,
    Query(filters): Query<ServiceFilters>,
) -> Response {
    let results = fetch_results(&state, &filters).await;
    let push_url = filters.page_href(filters.page.max(1));

    let mut response = ServiceResultsTemplate { results }.into_response();
    if let Ok(value) = HeaderValue::from_str(&push_url) {
        response.headers_mut().insert(HX_PUSH_URL, value);
    }
    response
}

/// Reviews page selector on the provider view.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewPageParam {
    #[serde(deserialize_with = "lenient_page")]
    pub page: u32,
}

/// Display one provider with their reviews.
///
/// # Errors
///
/// Returns 404 if the backend doesn't know the provider.
#[instrument(skip(state, layout, auth))]
pub async fn provider(
    State(state): State<AppState>,
    layout: Layout,
    auth: OptionalAuth,
    Path(id): Path<i64>,
    Query(params): Query<ReviewPageParam>,
) -> Result<impl IntoResponse, AppError> {
    let id = ProviderId::new(id);
    let token = auth.0.as_ref().map(|current| &current.token);

    let provider = state.api().services(token).provider(id).await?;

    let query = PageQuery {
        page: params.page.max(1),
        per_page: REVIEWS_PER_PAGE,
    };
    let (reviews, reviews_page, reviews_error) =
        match state.api().reviews(token).for_provider(id, &query).await {
            Ok(page) => (page.reviews, page.page, None),
            Err(e) => {
                tracing::warn!(error = %e, provider_id = %id, "Failed to fetch reviews");
                (
                    Vec::new(),
                    PageInfo::default(),
                    Some("Failed to load reviews".to_string()),
                )
            }
        };

    let can_book = layout.is_customer();
    let viewer = layout.user.as_ref().map(|user| user.id);

    Ok(ProviderTemplate {
        layout,
        provider: ProviderCard::from(&provider),
        reviews,
        reviews_page,
        reviews_error,
        can_book,
        durations: &DURATION_OPTIONS,
        viewer,
    })
}

/// Booking request form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    /// `datetime-local` value, e.g. `2024-03-09T14:30`.
    pub service_date: String,
    pub service_address: String,
    pub service_duration: String,
    pub special_requirements: String,
    pub estimated_price: String,
}

impl BookingForm {
    /// Build the backend request, or a message naming the first bad field.
    fn to_request(&self, provider_id: ProviderId) -> Result<CreateBookingRequest, String> {
        let date = self.service_date.trim();
        if date.is_empty() {
            return Err("Please choose a date and time.".to_string());
        }
        let service_date = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M")
            .or_else(|_| NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|_| "Please choose a valid date and time.".to_string())?;

        let address = self.service_address.trim();
        if address.is_empty() {
            return Err("Please enter the service address.".to_string());
        }

        let duration = self.service_duration.trim();
        let service_duration = if duration.is_empty() {
            None
        } else {
            Some(
                duration
                    .parse::<u32>()
                    .ok()
                    .filter(|m| DURATION_OPTIONS.iter().any(|(value, _)| value == m))
                    .ok_or_else(|| "Please choose a duration from the list.".to_string())?,
            )
        };

        let price = self.estimated_price.trim();
        let estimated_price = if price.is_empty() {
            None
        } else {
            Some(
                price
                    .parse::<Decimal>()
                    .ok()
                    .filter(|p| p.is_sign_positive())
                    .ok_or_else(|| "Please enter the estimated price as a number.".to_string())?,
            )
        };

        Ok(CreateBookingRequest {
            provider_id,
            service_date: service_date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            service_address: address.to_string(),
            service_duration,
            special_requirements: Some(self.special_requirements.trim())
                .filter(|s| !s.is_empty())
                .map(String::from),
            estimated_price,
        })
    }
}

/// Request a booking with a provider (customers only).
///
/// # Errors
///
/// Returns `AppError` if the session rejects the notice or the backend
/// rejects the token.
#[instrument(skip_all, fields(provider_id = id, user_id = %current.id()))]
pub async fn book(
    State(state): State<AppState>,
    session: Session,
    RequireRole(current, _): RequireRole<Customer>,
    Path(id): Path<i64>,
    Form(form): Form<BookingForm>,
) -> Result<Response, AppError> {
    let provider_id = ProviderId::new(id);
    let back = format!("/services/providers/{provider_id}#book");

    let request = match form.to_request(provider_id) {
        Ok(request) => request,
        Err(message) => {
            Flash::error(message).push(&session).await?;
            return Ok(Redirect::to(&back).into_response());
        }
    };

    match state
        .api()
        .bookings(Some(&current.token))
        .create(&request)
        .await
    {
        Ok(booking) => {
            tracing::info!(booking_id = %booking.id, %provider_id, "Booking requested");
            Flash::success("Booking request sent. The provider will confirm shortly.")
                .push(&session)
                .await?;
            Ok(Redirect::to(&format!("/bookings/{}", booking.id)).into_response())
        }
        Err(ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!(error = %e, %provider_id, "Booking rejected");
            Flash::error(e.user_message()).push(&session).await?;
            Ok(Redirect::to(&back).into_response())
        }
    }
}
