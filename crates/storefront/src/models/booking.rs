//! Bookings and reviews.

use chrono::NaiveDateTime;
use serde::Deserialize;

use gharkakaam_core::{BookingAction, BookingId, BookingStatus, Price, ProviderId, ReviewId, UserId, UserType};

use super::{PageInfo, ServiceProvider, User};

/// A customer's booking of a provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    #[serde(default)]
    pub customer: Option<User>,
    #[serde(default)]
    pub provider: Option<ServiceProvider>,
    pub service_date: NaiveDateTime,
    /// Duration in minutes.
    #[serde(default)]
    pub service_duration: Option<u32>,
    #[serde(default)]
    pub service_address: String,
    #[serde(default)]
    pub special_requirements: Option<String>,
    #[serde(default)]
    pub estimated_price: Option<Price>,
    #[serde(default)]
    pub final_price: Option<Price>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Booking {
    /// Provider's service title or an empty string.
    #[must_use]
    pub fn service_title(&self) -> &str {
        self.provider
            .as_ref()
            .map_or("", |provider| provider.service_title.as_str())
    }

    /// Name of the other party from the viewer's point of view.
    #[must_use]
    pub fn counterparty_name(&self, viewer: UserType) -> &str {
        if viewer.is_provider() {
            self.customer.as_ref().map_or("", |c| c.name.as_str())
        } else {
            self.provider
                .as_ref()
                .map_or("", ServiceProvider::display_name)
        }
    }

    /// Whether `user_id` is the provider on this booking.
    #[must_use]
    pub fn is_provided_by(&self, user_id: UserId) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|provider| provider.user_id == user_id)
    }

    /// Whether `user_id` is the customer on this booking.
    #[must_use]
    pub fn is_booked_by(&self, user_id: UserId) -> bool {
        self.customer.as_ref().is_some_and(|c| c.id == user_id)
    }

    /// Lifecycle actions the viewer may take on this booking.
    ///
    /// Requires the viewer to be a party to the booking in the matching role.
    #[must_use]
    pub fn actions_for(&self, user_id: UserId, role: UserType) -> Vec<BookingAction> {
        let is_party = match role {
            UserType::Provider => self.is_provided_by(user_id),
            UserType::Customer => self.is_booked_by(user_id),
            UserType::Admin => false,
        };
        if is_party {
            BookingAction::available(self.status, role)
        } else {
            Vec::new()
        }
    }

    /// Whether the customer may leave a review.
    #[must_use]
    pub fn is_reviewable_by(&self, user_id: UserId) -> bool {
        self.status == BookingStatus::Completed && self.is_booked_by(user_id)
    }

    /// Price to show: the final price when set, otherwise the estimate.
    #[must_use]
    pub const fn display_price(&self) -> Option<Price> {
        match self.final_price {
            Some(price) => Some(price),
            None => self.estimated_price,
        }
    }
}

/// `GET bookings` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingPage {
    #[serde(default)]
    pub bookings: Vec<Booking>,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// A customer's review of a completed booking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    #[serde(default)]
    pub customer: Option<User>,
    pub provider_id: ProviderId,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Review {
    /// Reviewer's name, or "Customer" when the backend omits it.
    #[must_use]
    pub fn reviewer_name(&self) -> &str {
        self.customer.as_ref().map_or("Customer", |c| c.name.as_str())
    }

    /// Whether `user_id` wrote this review.
    #[must_use]
    pub fn is_written_by(&self, user_id: UserId) -> bool {
        self.customer.as_ref().is_some_and(|c| c.id == user_id)
    }

    /// Star string, e.g. `★★★★☆`.
    #[must_use]
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

/// `GET reviews/provider/{id}` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(flatten)]
    pub page: PageInfo,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::models::service::tests::provider_json;

    pub(crate) fn booking_json(
        id: i64,
        status: &str,
        final_price: Option<f64>,
    ) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "customer": {"id": 1, "name": "Ravi Kumar", "email": "ravi@example.com", "user_type": "customer"},
            "provider": provider_json(5, 9, Some("9876543210")),
            "service_date": "2024-06-01T10:00:00",
            "service_duration": 120,
            "service_address": "12 MG Road",
            "special_requirements": "",
            "estimated_price": 400.0,
            "final_price": final_price,
            "status": status,
            "payment_status": "pending",
            "notes": null,
            "created_at": "2024-05-20T08:00:00"
        })
    }

    #[test]
    fn test_deserializes_booking() {
        let booking: Booking =
            serde_json::from_value(booking_json(3, "in_progress", None)).unwrap();
        assert_eq!(booking.status, BookingStatus::InProgress);
        assert_eq!(booking.service_title(), "Home Cook");
        assert_eq!(booking.counterparty_name(UserType::Provider), "Ravi Kumar");
        assert_eq!(booking.counterparty_name(UserType::Customer), "Sunita Devi");
        assert_eq!(booking.display_price(), Some(Price::from_rupees(400)));
    }

    #[test]
    fn test_actions_require_party_membership() {
        let booking: Booking = serde_json::from_value(booking_json(3, "pending", None)).unwrap();

        assert_eq!(
            booking.actions_for(UserId::new(9), UserType::Provider),
            vec![BookingAction::Confirm, BookingAction::Cancel]
        );
        assert_eq!(
            booking.actions_for(UserId::new(1), UserType::Customer),
            vec![BookingAction::Cancel]
        );
        assert!(booking.actions_for(UserId::new(42), UserType::Provider).is_empty());
        assert!(booking.actions_for(UserId::new(1), UserType::Admin).is_empty());
    }

    #[test]
    fn test_reviewable_only_when_completed_by_customer() {
        let done: Booking =
            serde_json::from_value(booking_json(3, "completed", Some(500.0))).unwrap();
        assert!(done.is_reviewable_by(UserId::new(1)));
        assert!(!done.is_reviewable_by(UserId::new(9)));

        let pending: Booking = serde_json::from_value(booking_json(4, "pending", None)).unwrap();
        assert!(!pending.is_reviewable_by(UserId::new(1)));
    }

    #[test]
    fn test_review_stars() {
        let review: Review = serde_json::from_value(serde_json::json!({
            "id": 1,
            "booking_id": 3,
            "customer": null,
            "provider_id": 5,
            "rating": 4,
            "comment": "Great food"
        }))
        .unwrap();
        assert_eq!(review.stars(), "★★★★☆");
        assert_eq!(review.reviewer_name(), "Customer");
    }
}
