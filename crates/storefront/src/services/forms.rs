//! Form validation: contact, provider application and service profile.
//!
//! The contact and application forms have no delivery backend. A valid
//! submission is recorded as a structured log event plus a Sentry
//! breadcrumb; an invalid one is rejected before anything is recorded.

use rust_decimal::Decimal;
use serde::Deserialize;

use gharkakaam_core::{CategoryId, Email};

use crate::error::add_breadcrumb;
use crate::models::{ProviderProfileRequest, ServiceProvider};

/// Categories offered on the provider application form.
pub const APPLICATION_CATEGORIES: [&str; 8] = [
    "Home Cooking & Catering",
    "Beauty Services",
    "Tutoring & Education",
    "Tailoring & Embroidery",
    "Cleaning Services",
    "Childcare",
    "Elderly Care",
    "Other",
];

/// Experience ranges offered on the provider application form.
pub const EXPERIENCE_OPTIONS: [&str; 4] = ["1-2 years", "3-5 years", "6-10 years", "10+ years"];

/// "I am a..." options on the contact form, as `(value, label)`.
pub const CONTACT_ROLES: [(&str, &str); 3] = [
    ("customer", "Customer"),
    ("provider", "Service Provider"),
    ("other", "Other"),
];

/// A validation failure on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All validation failures of one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    fn require(&mut self, field: &'static str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.0.push(FieldError {
                field,
                message: format!("{label} is required."),
            });
        }
    }

    fn email(&mut self, value: &str) -> Option<Email> {
        if value.trim().is_empty() {
            self.require("email", "Email", value);
            return None;
        }
        match Email::parse(value) {
            Ok(email) => Some(email),
            Err(e) => {
                self.0.push(FieldError {
                    field: "email",
                    message: format!("Please enter a valid email address ({e})."),
                });
                None
            }
        }
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether the submission passed validation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failures in form order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` failed validation.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// First failure message for `field`.
    #[must_use]
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn trimmed_option(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

// =============================================================================
// Contact form
// =============================================================================

/// Raw contact form input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub user_type: String,
}

/// A validated contact message.
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub user_type: &'static str,
}

impl ContactForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every failing field when a required field is empty or the
    /// email is malformed.
    pub fn validate(&self) -> Result<ContactSubmission, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("name", "Name", &self.name);
        let email = errors.email(&self.email);
        errors.require("subject", "Subject", &self.subject);
        errors.require("message", "Message", &self.message);

        let user_type = CONTACT_ROLES
            .iter()
            .map(|(value, _)| *value)
            .find(|value| *value == self.user_type)
            .unwrap_or("customer");

        match email {
            Some(email) if errors.is_empty() => Ok(ContactSubmission {
                name: self.name.trim().to_string(),
                email,
                phone: trimmed_option(&self.phone),
                subject: self.subject.trim().to_string(),
                message: self.message.trim().to_string(),
                user_type,
            }),
            _ => Err(errors),
        }
    }
}

impl ContactSubmission {
    /// Record the submission.
    pub fn record(&self) {
        tracing::info!(
            email = %self.email,
            user_type = self.user_type,
            subject = %self.subject,
            has_phone = self.phone.is_some(),
            message_len = self.message.len(),
            "Contact message received"
        );
        add_breadcrumb(
            "form",
            "Contact message submitted",
            Some(&[("user_type", self.user_type), ("subject", self.subject.as_str())]),
        );
    }
}

// =============================================================================
// Provider application form
// =============================================================================

/// Raw provider application input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub category: String,
    pub experience: String,
    pub description: String,
    pub specialties: String,
    pub pricing: String,
}

/// A validated provider application.
#[derive(Debug, Clone)]
pub struct ProviderApplication {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub location: String,
    pub category: String,
    pub experience: Option<String>,
    pub description: String,
    pub specialties: Vec<String>,
    pub pricing: Option<String>,
}

impl ApplicationForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns every failing field when a required field is empty, the email
    /// is malformed, or a select holds a value the form never offers.
    pub fn validate(&self) -> Result<ProviderApplication, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("name", "Name", &self.name);
        let email = errors.email(&self.email);
        errors.require("phone", "Phone", &self.phone);
        errors.require("location", "Location", &self.location);
        if self.category.trim().is_empty() {
            errors.require("category", "Service category", &self.category);
        } else if !APPLICATION_CATEGORIES.contains(&self.category.as_str()) {
            errors.push("category", "Please select a service category.");
        }
        let experience = trimmed_option(&self.experience);
        if experience
            .as_deref()
            .is_some_and(|e| !EXPERIENCE_OPTIONS.contains(&e))
        {
            errors.push("experience", "Please select your experience.");
        }
        errors.require("description", "Description", &self.description);

        match email {
            Some(email) if errors.is_empty() => Ok(ProviderApplication {
                name: self.name.trim().to_string(),
                email,
                phone: self.phone.trim().to_string(),
                location: self.location.trim().to_string(),
                category: self.category.clone(),
                experience,
                description: self.description.trim().to_string(),
                specialties: self
                    .specialties
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
                pricing: trimmed_option(&self.pricing),
            }),
            _ => Err(errors),
        }
    }
}

impl ProviderApplication {
    /// Record the application.
    pub fn record(&self) {
        tracing::info!(
            email = %self.email,
            category = %self.category,
            location = %self.location,
            experience = self.experience.as_deref().unwrap_or("unspecified"),
            specialties = self.specialties.len(),
            "Provider application received"
        );
        add_breadcrumb(
            "form",
            "Provider application submitted",
            Some(&[
                ("category", self.category.as_str()),
                ("location", self.location.as_str()),
            ]),
        );
    }
}

// =============================================================================
// Service profile
// =============================================================================

/// Pricing units offered on the service profile form.
pub const PRICE_UNITS: [&str; 5] = ["per hour", "per visit", "per session", "per meal", "per month"];

/// Raw service profile input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderProfileForm {
    pub category_id: String,
    pub service_title: String,
    pub description: String,
    pub specialties: String,
    pub experience_years: String,
    pub price_range_min: String,
    pub price_range_max: String,
    pub price_unit: String,
    pub service_area: String,
}

impl ProviderProfileForm {
    /// Prefill from an existing profile.
    #[must_use]
    pub fn from_provider(provider: &ServiceProvider) -> Self {
        let price = |p: Option<gharkakaam_core::Price>| {
            p.map(|p| p.amount().normalize().to_string()).unwrap_or_default()
        };
        Self {
            category_id: provider
                .category
                .as_ref()
                .map(|c| c.id.to_string())
                .unwrap_or_default(),
            service_title: provider.service_title.clone(),
            description: provider.description.clone(),
            specialties: provider.specialties().join(", "),
            experience_years: provider
                .experience_years
                .map(|y| y.to_string())
                .unwrap_or_default(),
            price_range_min: price(provider.price_range_min),
            price_range_max: price(provider.price_range_max),
            price_unit: provider.price_unit.clone().unwrap_or_default(),
            service_area: provider.service_area.clone().unwrap_or_default(),
        }
    }

    /// Validate the form into a backend request.
    ///
    /// # Errors
    ///
    /// Returns every failing field when category, title or description is
    /// missing, a number doesn't parse, or the price range is inverted.
    pub fn validate(&self) -> Result<ProviderProfileRequest, FormErrors> {
        let mut errors = FormErrors::default();

        let category_id = match self.category_id.trim() {
            "" => {
                errors.require("category_id", "Service category", "");
                None
            }
            raw => match raw.parse::<i64>() {
                Ok(id) => Some(CategoryId::new(id)),
                Err(_) => {
                    errors.push("category_id", "Please select a service category.");
                    None
                }
            },
        };
        errors.require("service_title", "Service title", &self.service_title);
        errors.require("description", "Description", &self.description);

        let experience_years = match self.experience_years.trim() {
            "" => None,
            raw => raw.parse::<u32>().map_or_else(
                |_| {
                    errors.push("experience_years", "Experience must be a whole number of years.");
                    None
                },
                Some,
            ),
        };
        let price_range_min = parse_price(&mut errors, "price_range_min", &self.price_range_min);
        let price_range_max = parse_price(&mut errors, "price_range_max", &self.price_range_max);
        if let (Some(min), Some(max)) = (price_range_min, price_range_max)
            && min > max
        {
            errors.push("price_range_max", "Maximum price must not be below the minimum.");
        }

        match category_id {
            Some(category_id) if errors.is_empty() => Ok(ProviderProfileRequest {
                category_id,
                service_title: self.service_title.trim().to_string(),
                description: self.description.trim().to_string(),
                specialties: self
                    .specialties
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
                experience_years,
                price_range_min,
                price_range_max,
                price_unit: trimmed_option(&self.price_unit),
                service_area: trimmed_option(&self.service_area),
            }),
            _ => Err(errors),
        }
    }
}

fn parse_price(errors: &mut FormErrors, field: &'static str, raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<Decimal>() {
        Ok(price) if price.is_sign_positive() => Some(price),
        _ => {
            errors.push(field, "Prices must be positive numbers.");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contact() -> ContactForm {
        ContactForm {
            name: "Ravi".to_string(),
            email: "Ravi@Example.com".to_string(),
            phone: String::new(),
            subject: "Booking help".to_string(),
            message: "How do I cancel?".to_string(),
            user_type: "customer".to_string(),
        }
    }

    fn application() -> ApplicationForm {
        ApplicationForm {
            name: "Sunita".to_string(),
            email: "sunita@example.com".to_string(),
            phone: "9876543210".to_string(),
            location: "Indore".to_string(),
            category: "Home Cooking & Catering".to_string(),
            experience: "3-5 years".to_string(),
            description: "Home-style meals".to_string(),
            specialties: "Dal, Roti, , Sabzi".to_string(),
            pricing: "₹500-1000/meal".to_string(),
        }
    }

    #[test]
    fn test_contact_valid() {
        let submission = contact().validate().unwrap();
        assert_eq!(submission.email.as_str(), "ravi@example.com");
        assert_eq!(submission.phone, None);
        assert_eq!(submission.user_type, "customer");
    }

    #[test]
    fn test_contact_required_fields() {
        let form = ContactForm {
            subject: "  ".to_string(),
            message: String::new(),
            ..contact()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("subject"));
        assert!(errors.has("message"));
        assert!(!errors.has("name"));
        assert!(!errors.has("phone"));
        assert_eq!(errors.message("subject"), Some("Subject is required."));
        assert_eq!(errors.message("name"), None);
    }

    #[test]
    fn test_contact_rejects_malformed_email() {
        let form = ContactForm {
            email: "not-an-email".to_string(),
            ..contact()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert!(errors.has("email"));
    }

    #[test]
    fn test_contact_unknown_role_defaults_to_customer() {
        let form = ContactForm {
            user_type: "admin".to_string(),
            ..contact()
        };
        assert_eq!(form.validate().unwrap().user_type, "customer");
    }

    #[test]
    fn test_application_valid() {
        let app = application().validate().unwrap();
        assert_eq!(app.specialties, vec!["Dal", "Roti", "Sabzi"]);
        assert_eq!(app.experience.as_deref(), Some("3-5 years"));
    }

    #[test]
    fn test_application_required_fields() {
        let form = ApplicationForm {
            phone: String::new(),
            location: String::new(),
            category: String::new(),
            description: String::new(),
            experience: String::new(),
            specialties: String::new(),
            pricing: String::new(),
            ..application()
        };
        let errors = form.validate().unwrap_err();
        for field in ["phone", "location", "category", "description"] {
            assert!(errors.has(field), "{field} should be required");
        }
        assert!(!errors.has("experience"));
        assert!(!errors.has("specialties"));
        assert!(!errors.has("pricing"));
    }

    #[test]
    fn test_application_rejects_unknown_category() {
        let form = ApplicationForm {
            category: "Plumbing".to_string(),
            ..application()
        };
        assert!(form.validate().unwrap_err().has("category"));
    }

    #[test]
    fn test_profile_form_requires_core_fields() {
        let errors = ProviderProfileForm::default().validate().unwrap_err();
        assert!(errors.has("category_id"));
        assert!(errors.has("service_title"));
        assert!(errors.has("description"));
    }

    #[test]
    fn test_profile_form_builds_request() {
        let form = ProviderProfileForm {
            category_id: "3".to_string(),
            service_title: " Home Cook ".to_string(),
            description: "North Indian meals".to_string(),
            specialties: "Dal, Roti, ".to_string(),
            experience_years: "6".to_string(),
            price_range_min: "300".to_string(),
            price_range_max: "800".to_string(),
            price_unit: "per meal".to_string(),
            service_area: String::new(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.category_id, CategoryId::new(3));
        assert_eq!(request.service_title, "Home Cook");
        assert_eq!(request.specialties, vec!["Dal", "Roti"]);
        assert_eq!(request.price_range_max, Some(Decimal::new(800, 0)));
        assert_eq!(request.service_area, None);

        let inverted = ProviderProfileForm {
            price_range_min: "900".to_string(),
            ..form
        };
        assert!(inverted.validate().unwrap_err().has("price_range_max"));
    }
}
