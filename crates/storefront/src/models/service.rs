//! Service categories and provider profiles.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use gharkakaam_core::{CategoryId, Price, ProviderId, UserId};

use super::{PageInfo, User};

/// A category of services (plumbing, cooking, tutoring...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceCategory {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

/// A provider's public service profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceProvider {
    pub id: ProviderId,
    pub user_id: UserId,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub category: Option<ServiceCategory>,
    pub service_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub price_range_min: Option<Price>,
    #[serde(default)]
    pub price_range_max: Option<Price>,
    #[serde(default)]
    pub price_unit: Option<String>,
    #[serde(default)]
    pub availability: serde_json::Value,
    #[serde(default)]
    pub service_area: Option<String>,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub total_bookings: u32,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl ServiceProvider {
    /// Name of the user behind the profile.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.user
            .as_ref()
            .map_or(self.service_title.as_str(), |user| user.name.as_str())
    }

    /// Contact phone of the user behind the profile, if any.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.phone.as_deref())
            .filter(|phone| !phone.trim().is_empty())
    }

    /// Category name or an empty string.
    #[must_use]
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map_or("", |c| c.name.as_str())
    }

    /// Specialties, empty when the backend sent `null`.
    #[must_use]
    pub fn specialties(&self) -> &[String] {
        self.specialties.as_deref().unwrap_or_default()
    }

    /// Price range, e.g. `₹300 - ₹800 per visit`.
    ///
    /// Returns `None` when neither bound is set.
    #[must_use]
    pub fn price_range(&self) -> Option<String> {
        let range = match (self.price_range_min, self.price_range_max) {
            (Some(min), Some(max)) if min == max => min.display(),
            (Some(min), Some(max)) => format!("{} - {}", min.display(), max.display()),
            (Some(min), None) => format!("From {}", min.display()),
            (None, Some(max)) => format!("Up to {}", max.display()),
            (None, None) => return None,
        };
        Some(match self.price_unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{range} {unit}"),
            _ => range,
        })
    }

    /// Rating rendered to one decimal place.
    #[must_use]
    pub fn rating_display(&self) -> String {
        rating_display(self.rating)
    }
}

/// A rating to one decimal place, halves rounded up (`4.25` shows `4.3`).
#[must_use]
pub fn rating_display(rating: Decimal) -> String {
    format!(
        "{:.1}",
        rating.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// `GET services/providers` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderPage {
    #[serde(default)]
    pub providers: Vec<ServiceProvider>,
    #[serde(flatten)]
    pub page: PageInfo,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn provider_json(id: i64, user_id: i64, phone: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "user_id": user_id,
            "user": {
                "id": user_id,
                "name": "Sunita Devi",
                "email": "sunita@example.com",
                "phone": phone,
                "user_type": "provider"
            },
            "category": {"id": 3, "name": "Cooking", "is_active": true},
            "service_title": "Home Cook",
            "description": "North Indian meals",
            "specialties": ["Dal", "Roti"],
            "experience_years": 6,
            "price_range_min": 300.0,
            "price_range_max": 800.0,
            "price_unit": "per meal",
            "availability": {"mon": "9-5"},
            "service_area": "Indore",
            "rating": 4.67,
            "total_reviews": 12,
            "total_bookings": 20,
            "is_approved": true,
            "is_active": true,
            "created_at": "2024-01-02T03:04:05"
        })
    }

    #[test]
    fn test_deserializes_provider() {
        let provider: ServiceProvider =
            serde_json::from_value(provider_json(5, 9, Some("98765 43210"))).unwrap();
        assert_eq!(provider.display_name(), "Sunita Devi");
        assert_eq!(provider.phone(), Some("98765 43210"));
        assert_eq!(provider.category_name(), "Cooking");
        assert_eq!(provider.price_range().unwrap(), "₹300 - ₹800 per meal");
        assert_eq!(provider.rating_display(), "4.7");
    }

    #[test]
    fn test_null_relations_are_tolerated() {
        let provider: ServiceProvider = serde_json::from_value(serde_json::json!({
            "id": 1,
            "user_id": 2,
            "user": null,
            "category": null,
            "service_title": "Tutor",
            "specialties": null,
            "price_range_min": null,
            "price_range_max": null
        }))
        .unwrap();
        assert_eq!(provider.display_name(), "Tutor");
        assert_eq!(provider.phone(), None);
        assert!(provider.specialties().is_empty());
        assert_eq!(provider.price_range(), None);
        assert_eq!(provider.rating_display(), "0.0");
    }

    #[test]
    fn test_rating_midpoint_rounds_up() {
        assert_eq!(rating_display(Decimal::new(425, 2)), "4.3");
        assert_eq!(rating_display(Decimal::new(435, 2)), "4.4");
        assert_eq!(rating_display(Decimal::new(424, 2)), "4.2");
        assert_eq!(rating_display(Decimal::from(5)), "5.0");
    }

    #[test]
    fn test_provider_page_envelope() {
        let page: ProviderPage = serde_json::from_value(serde_json::json!({
            "providers": [provider_json(1, 2, None)],
            "total": 1,
            "pages": 1,
            "current_page": 1
        }))
        .unwrap();
        assert_eq!(page.providers.len(), 1);
        assert_eq!(page.page.total, 1);
    }
}
