//! Authentication route handlers.
//!
//! Login, registration and logout against the backend's token auth. Session
//! writes go through [`AuthService`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use gharkakaam_core::UserType;

use crate::error::AppError;
use crate::filters;
use crate::guard::safe_return_path;
use crate::layout::Layout;
use crate::middleware::OptionalAuth;
use crate::models::Flash;
use crate::routes::services::LOCATIONS;
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

/// Roles open to self-registration.
const REGISTRATION_ROLES: [UserType; 2] = [UserType::Customer, UserType::Provider];

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: String,
}

/// Registration form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: String,
    pub location: String,
}

impl RegisterForm {
    fn user_type(&self) -> UserType {
        match self.user_type.parse() {
            Ok(UserType::Provider) => UserType::Provider,
            _ => UserType::Customer,
        }
    }

    fn to_registration(&self) -> Registration {
        Registration {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            password: self.password.clone(),
            user_type: self.user_type(),
            location: Some(self.location.clone()),
        }
    }
}

// =============================================================================
// Query Types
// =============================================================================

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: String,
    /// Preselected role on the registration page.
    pub role: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub next: String,
    pub error: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub form: RegisterForm,
    pub roles: &'static [UserType],
    pub locations: &'static [&'static str],
    pub error: Option<String>,
}

impl RegisterTemplate {
    fn new(layout: Layout, form: RegisterForm, error: Option<String>) -> Self {
        Self {
            layout,
            form,
            roles: &REGISTRATION_ROLES,
            locations: &LOCATIONS,
            error,
        }
    }

    /// Whether `role` is the selected account type.
    #[must_use]
    pub fn is_selected_role(&self, role: &UserType) -> bool {
        self.form.user_type() == *role
    }

    /// Whether `location` is the selected city.
    #[must_use]
    pub fn is_selected_location(&self, location: &str) -> bool {
        self.form.location == location
    }
}

fn auth_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Api(api) if !matches!(api, crate::api::ApiError::Rejected { .. }) => {
            StatusCode::BAD_GATEWAY
        }
        AuthError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
///
/// Logged-in users go straight to their return path.
pub async fn login_page(
    OptionalAuth(current): OptionalAuth,
    layout: Layout,
    Query(query): Query<NextQuery>,
) -> Response {
    if current.is_some() {
        return Redirect::to(safe_return_path(Some(&query.next))).into_response();
    }
    LoginTemplate {
        layout,
        email: String::new(),
        next: query.next,
        error: None,
    }
    .into_response()
}

/// Handle login form submission.
///
/// On success, continues to `next` when it is a local path, otherwise to the
/// dashboard.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.api())
        .login(&session, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            Flash::success(format!("Welcome back, {}!", user.first_name()))
                .push(&session)
                .await?;
            Ok(Redirect::to(safe_return_path(Some(&form.next))).into_response())
        }
        Err(AuthError::Session(e)) => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let page = LoginTemplate {
                layout,
                email: form.email,
                next: form.next,
                error: Some(e.user_message()),
            };
            Ok((auth_status(&e), page).into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(current): OptionalAuth,
    layout: Layout,
    Query(query): Query<NextQuery>,
) -> Response {
    if current.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let form = RegisterForm {
        user_type: query.role,
        ..RegisterForm::default()
    };
    RegisterTemplate::new(layout, form, None).into_response()
}

/// Handle registration form submission.
///
/// A successful registration is logged in immediately.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.api())
        .register(&session, form.to_registration())
        .await
    {
        Ok(user) => {
            let welcome = if user.user_type.is_provider() {
                "Welcome to GharKaKaam! Set up your service profile to start receiving bookings."
            } else {
                "Welcome to GharKaKaam! Find trusted help for your home."
            };
            Flash::success(welcome).push(&session).await?;
            let next = if user.user_type.is_provider() {
                "/provider/profile"
            } else {
                "/dashboard"
            };
            Ok(Redirect::to(next).into_response())
        }
        Err(AuthError::Session(e)) => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Registration failed");
            let status = auth_status(&e);
            let form = RegisterForm {
                password: String::new(),
                ..form
            };
            let page = RegisterTemplate::new(layout, form, Some(e.user_message()));
            Ok((status, page).into_response())
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    AuthService::new(state.api()).logout(&session).await?;
    Flash::info("You have been logged out.").push(&session).await?;
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn test_registration_role_defaults_to_customer() {
        let form = |role: &str| RegisterForm {
            user_type: role.to_string(),
            ..RegisterForm::default()
        };
        assert_eq!(form("provider").user_type(), UserType::Provider);
        assert_eq!(form("customer").user_type(), UserType::Customer);
        assert_eq!(form("admin").user_type(), UserType::Customer);
        assert_eq!(form("").user_type(), UserType::Customer);
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            auth_status(&AuthError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            auth_status(&AuthError::MissingField("phone")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            auth_status(&AuthError::Api(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message: "Email already registered".to_string(),
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            auth_status(&AuthError::Api(ApiError::RateLimited)),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_register_page_keeps_input_but_not_password() {
        let form = RegisterForm {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            user_type: "provider".to_string(),
            location: "Pune".to_string(),
            ..RegisterForm::default()
        };
        let html = RegisterTemplate::new(Layout::default(), form, Some("Email already registered".to_string()))
            .render()
            .unwrap();
        assert!(html.contains(r#"value="asha@example.com""#));
        assert!(html.contains(r#"<option value="Pune" selected>"#));
        assert!(html.contains(r#"value="provider" checked"#));
        assert!(html.contains("Email already registered"));
    }
}
