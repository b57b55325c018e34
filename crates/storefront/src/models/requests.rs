//! Request payloads and list queries sent to the backend.
//!
//! Money goes out as JSON numbers, which is what the backend parses.

use rust_decimal::Decimal;
use serde::Serialize;

use gharkakaam_core::{BookingId, BookingStatus, CategoryId, ProviderId, UserType};

/// Query-string parameters for a list endpoint.
pub trait QueryParams {
    /// Parameters in the order they are appended to the URL.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// `POST auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST auth/register` body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// `PUT auth/profile` body. The role is never sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

/// Filters for `GET services/providers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub page: u32,
    pub per_page: u32,
    pub category_id: Option<CategoryId>,
    pub location: Option<String>,
    pub search: Option<String>,
    pub min_rating: Option<Decimal>,
}

impl Default for ProviderQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 12,
            category_id: None,
            location: None,
            search: None,
            min_rating: None,
        }
    }
}

impl QueryParams for ProviderQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        if let Some(location) = &self.location {
            pairs.push(("location", location.clone()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(min_rating) = self.min_rating {
            pairs.push(("min_rating", min_rating.to_string()));
        }
        pairs
    }
}

/// Filters for `GET bookings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingQuery {
    pub page: u32,
    pub per_page: u32,
    pub status: Option<BookingStatus>,
}

impl Default for BookingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
            status: None,
        }
    }
}

impl QueryParams for BookingQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// Plain pagination for `GET reviews/provider/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl QueryParams for PageQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

/// `POST services/providers` and `PUT services/providers/{id}` body.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderProfileRequest {
    pub category_id: CategoryId,
    pub service_title: String,
    pub description: String,
    pub specialties: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_years: Option<u32>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_range_min: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_range_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_area: Option<String>,
}

/// `POST bookings` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBookingRequest {
    pub provider_id: ProviderId,
    /// ISO-8601 local date-time, e.g. `2024-06-01T10:00:00`.
    pub service_date: String,
    pub service_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub estimated_price: Option<Decimal>,
}

/// `PUT bookings/{id}/status` body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdateRequest {
    pub status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub final_price: Option<Decimal>,
}

/// `POST reviews` body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReviewRequest {
    pub booking_id: BookingId,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// `PUT reviews/{id}` body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_query_forwards_only_set_filters() {
        let query = ProviderQuery::default();
        assert_eq!(
            query.query_pairs(),
            vec![("page", "1".to_string()), ("per_page", "12".to_string())]
        );

        let query = ProviderQuery {
            page: 2,
            category_id: Some(CategoryId::new(4)),
            location: Some("Indore".to_string()),
            search: Some("cook".to_string()),
            ..ProviderQuery::default()
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("per_page", "12".to_string()),
                ("category_id", "4".to_string()),
                ("location", "Indore".to_string()),
                ("search", "cook".to_string()),
            ]
        );
    }

    #[test]
    fn test_booking_query_status() {
        let query = BookingQuery {
            status: Some(BookingStatus::InProgress),
            ..BookingQuery::default()
        };
        assert!(query.query_pairs().contains(&("status", "in_progress".to_string())));
    }

    #[test]
    fn test_money_serializes_as_number() {
        let body = StatusUpdateRequest {
            status: BookingStatus::Completed,
            notes: None,
            final_price: Some(Decimal::new(49950, 2)),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["final_price"], serde_json::json!(499.5));
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn test_profile_update_omits_role() {
        let body = UpdateProfileRequest {
            name: Some("Asha".to_string()),
            ..UpdateProfileRequest::default()
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Asha"}));
    }
}
