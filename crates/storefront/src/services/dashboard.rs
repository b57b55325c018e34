//! Dashboard figures.

use rust_decimal::Decimal;

use gharkakaam_core::{BookingStatus, Price, UserId};

use crate::api::{ApiClient, ApiError};
use crate::models::{AccessToken, Booking, ProviderQuery, ServiceProvider};

/// Page size used when scanning providers for the current user's profile.
const PROVIDER_SCAN_PAGE_SIZE: u32 = 100;

/// Aggregate figures shown to providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    /// Lifetime bookings recorded on the provider profile.
    pub total_bookings: u32,
    /// Completed bookings among those fetched.
    pub completed_bookings: usize,
    /// Sum of final prices over completed bookings.
    pub total_earnings: Price,
    /// Provider rating.
    pub average_rating: Decimal,
}

impl DashboardStats {
    /// Compute the figures from the provider profile and fetched bookings.
    ///
    /// Completed bookings without a final price count towards
    /// `completed_bookings` but add nothing to `total_earnings`.
    #[must_use]
    pub fn compute(provider: &ServiceProvider, bookings: &[Booking]) -> Self {
        let completed: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .collect();

        Self {
            total_bookings: provider.total_bookings,
            completed_bookings: completed.len(),
            total_earnings: completed.iter().filter_map(|b| b.final_price).sum(),
            average_rating: provider.rating,
        }
    }

    /// Rating rendered to one decimal place.
    #[must_use]
    pub fn rating_display(&self) -> String {
        crate::models::service::rating_display(self.average_rating)
    }
}

/// Find the provider profile owned by `user_id`.
///
/// Checks the providers embedded in `bookings` first and only falls back to
/// scanning `services/providers` when none of them match.
///
/// # Errors
///
/// Returns an error if the fallback scan fails.
#[tracing::instrument(skip(api, token, bookings))]
pub async fn find_provider_profile(
    api: &ApiClient,
    token: &AccessToken,
    user_id: UserId,
    bookings: &[Booking],
) -> Result<Option<ServiceProvider>, ApiError> {
    if let Some(provider) = bookings
        .iter()
        .filter_map(|b| b.provider.as_ref())
        .find(|p| p.user_id == user_id)
    {
        return Ok(Some(provider.clone()));
    }

    let query = ProviderQuery {
        per_page: PROVIDER_SCAN_PAGE_SIZE,
        ..ProviderQuery::default()
    };
    let page = api.services(Some(token)).providers(&query).await?;
    Ok(page.providers.into_iter().find(|p| p.user_id == user_id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::booking::tests::booking_json;
    use crate::models::service::tests::provider_json;

    fn provider() -> ServiceProvider {
        serde_json::from_value(provider_json(5, 9, None)).unwrap()
    }

    fn booking(id: i64, status: &str, final_price: Option<f64>) -> Booking {
        serde_json::from_value(booking_json(id, status, final_price)).unwrap()
    }

    #[test]
    fn test_three_booking_example() {
        let bookings = vec![
            booking(1, "completed", Some(500.0)),
            booking(2, "completed", Some(300.0)),
            booking(3, "pending", None),
        ];
        let stats = DashboardStats::compute(&provider(), &bookings);

        assert_eq!(stats.completed_bookings, 2);
        assert_eq!(stats.total_earnings, Price::from_rupees(800));
        assert_eq!(stats.total_earnings.display(), "₹800");
        assert_eq!(stats.total_bookings, 20);
        assert_eq!(stats.rating_display(), "4.7");
    }

    #[test]
    fn test_completed_without_final_price_adds_nothing() {
        let bookings = vec![
            booking(1, "completed", None),
            booking(2, "cancelled", Some(900.0)),
        ];
        let stats = DashboardStats::compute(&provider(), &bookings);

        assert_eq!(stats.completed_bookings, 1);
        assert_eq!(stats.total_earnings, Price::ZERO);
    }

    #[test]
    fn test_empty_bookings() {
        let stats = DashboardStats::compute(&provider(), &[]);
        assert_eq!(stats.completed_bookings, 0);
        assert_eq!(stats.total_earnings.display(), "₹0");
    }

    #[test]
    fn test_rating_of_x_point_x5_rounds_up() {
        let mut provider = provider();
        provider.rating = Decimal::new(425, 2);
        let stats = DashboardStats::compute(&provider, &[]);
        assert_eq!(stats.rating_display(), "4.3");
    }
}
