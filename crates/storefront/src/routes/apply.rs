//! "Become a Provider" application form.

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
use crate::routes::home::Feature;
use crate::services::forms::{
    APPLICATION_CATEGORIES, ApplicationForm, EXPERIENCE_OPTIONS, FormErrors,
};

/// Path of the application page.
pub const APPLY_PATH: &str = "/become-a-provider";

/// Confirmation shown after a successful application.
pub const APPLICATION_CONFIRMATION: &str =
    "Thank you for your application! We will review and contact you within 24 hours.";

const BENEFITS: [Feature; 4] = [
    Feature {
        title: "Grow Your Business",
        description: "Reach thousands of potential customers in your area",
    },
    Feature {
        title: "Safe Platform",
        description: "Verified customers and secure payment processing",
    },
    Feature {
        title: "Easy Communication",
        description: "Connect with customers directly through WhatsApp",
    },
    Feature {
        title: "Build Reputation",
        description: "Earn reviews and build your professional profile",
    },
];

const STEPS: [Feature; 4] = [
    Feature {
        title: "Apply Online",
        description: "Fill out our simple application form with your details and experience",
    },
    Feature {
        title: "Verification Process",
        description: "We verify your identity, skills, and background for safety",
    },
    Feature {
        title: "Profile Creation",
        description: "Create your professional profile with photos and service details",
    },
    Feature {
        title: "Start Earning",
        description: "Begin receiving bookings and grow your business",
    },
];

/// Application page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/apply.html")]
pub struct ApplyTemplate {
    pub layout: Layout,
    pub form: ApplicationForm,
    pub errors: FormErrors,
    pub categories: &'static [&'static str],
    pub experience_options: &'static [&'static str],
    pub benefits: &'static [Feature],
    pub steps: &'static [Feature],
}

impl ApplyTemplate {
    fn new(layout: Layout, form: ApplicationForm, errors: FormErrors) -> Self {
        Self {
            layout,
            form,
            errors,
            categories: &APPLICATION_CATEGORIES,
            experience_options: &EXPERIENCE_OPTIONS,
            benefits: &BENEFITS,
            steps: &STEPS,
        }
    }

    fn is_selected_category(&self, value: &str) -> bool {
        self.form.category == value
    }

    fn is_selected_experience(&self, value: &str) -> bool {
        self.form.experience == value
    }
}

/// Display the application page with a blank form.
#[instrument(skip(layout))]
pub async fn show(layout: Layout) -> impl IntoResponse {
    ApplyTemplate::new(layout, ApplicationForm::default(), FormErrors::default())
}

/// Handle an application submission.
///
/// # Errors
///
/// Returns an error if the confirmation notice cannot be stored.
#[instrument(skip_all)]
pub async fn submit(
    session: Session,
    layout: Layout,
    Form(form): Form<ApplicationForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(application) => {
            application.record();
            Flash::success(APPLICATION_CONFIRMATION)
                .push(&session)
                .await?;
            Ok(Redirect::to(APPLY_PATH).into_response())
        }
        Err(errors) => Ok((
            StatusCode::BAD_REQUEST,
            ApplyTemplate::new(layout, form, errors),
        )
            .into_response()),
    }
}
