//! Contact form route handlers.
//!
//! `GET /contact` renders the form; `POST /contact` validates it, records a
//! valid message and redirects back with a confirmation notice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::layout::Layout;
use crate::models::Flash;
use crate::services::forms::{CONTACT_ROLES, ContactForm, FormErrors};

/// Confirmation shown after a successful submission.
pub const CONTACT_CONFIRMATION: &str =
    "Thank you for your message! We will get back to you within 24 hours.";

/// A frequently asked question.
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

const FAQS: [Faq; 6] = [
    Faq {
        question: "How do I book a service?",
        answer: "Browse our services, select a provider, and contact them directly via WhatsApp to discuss your requirements and schedule.",
    },
    Faq {
        question: "Are all service providers verified?",
        answer: "Yes, every service provider goes through our comprehensive verification process including background checks and skill assessment.",
    },
    Faq {
        question: "How do I become a service provider?",
        answer: "Fill out our application form, complete the verification process, and once approved, create your profile to start receiving bookings.",
    },
    Faq {
        question: "What if I'm not satisfied with a service?",
        answer: "Contact our support team immediately. We take all complaints seriously and work to resolve issues quickly and fairly.",
    },
    Faq {
        question: "How are payments handled?",
        answer: "Payments are made directly between customers and service providers. We provide guidelines for safe payment practices.",
    },
    Faq {
        question: "Is there a booking fee?",
        answer: "No, there are no booking fees for customers. Service providers pay a small commission only when they receive bookings.",
    },
];

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub form: ContactForm,
    pub errors: FormErrors,
    pub roles: &'static [(&'static str, &'static str)],
    pub faqs: &'static [Faq],
}

impl ContactTemplate {
    fn new(layout: Layout, form: ContactForm, errors: FormErrors) -> Self {
        Self {
            layout,
            form,
            errors,
            roles: &CONTACT_ROLES,
            faqs: &FAQS,
        }
    }

    /// Whether `value` is the chosen "I am a..." option.
    fn is_selected_role(&self, value: &str) -> bool {
        self.form.user_type == value
    }
}

/// Display the contact page with a blank form.
#[instrument(skip(layout))]
pub async fn show(layout: Layout) -> impl IntoResponse {
    ContactTemplate::new(
        layout,
        ContactForm {
            user_type: "customer".to_string(),
            ..ContactForm::default()
        },
        FormErrors::default(),
    )
}

/// Handle a contact form submission.
///
/// Invalid input re-renders the form with 400 and the entered values.
///
/// # Errors
///
/// Returns an error if the confirmation notice cannot be stored.
#[instrument(skip_all)]
pub async fn submit(
    session: Session,
    layout: Layout,
    Form(form): Form<ContactForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(submission) => {
            submission.record();
            Flash::success(CONTACT_CONFIRMATION).push(&session).await?;
            Ok(Redirect::to("/contact").into_response())
        }
        Err(errors) => {
            tracing::debug!(fields = errors.errors().len(), "Contact form rejected");
            Ok((
                StatusCode::BAD_REQUEST,
                ContactTemplate::new(layout, form, errors),
            )
                .into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_errors_and_keeps_values() {
        let form = ContactForm {
            name: "Ravi".to_string(),
            email: "bad".to_string(),
            ..ContactForm::default()
        };
        let errors = form.validate().unwrap_err();
        let html = ContactTemplate::new(Layout::default(), form, errors)
            .render()
            .unwrap();

        assert!(html.contains("value=\"Ravi\""));
        assert!(html.contains("Subject is required."));
        assert!(html.contains("Please enter a valid email address"));
    }
}
