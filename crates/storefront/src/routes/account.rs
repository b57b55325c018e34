//! Account profile page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::AppError;
use crate::filters;
use crate::layout::Layout;
use crate::middleware::RequireAuth;
use crate::models::{Flash, UpdateProfileRequest, User};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Profile form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub location: String,
    pub profile_image: String,
}

impl ProfileForm {
    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone_or_empty().to_string(),
            location: user.location_or_empty().to_string(),
            profile_image: user.profile_image.clone().unwrap_or_default(),
        }
    }

    /// Build the update, or a message when the name is blank.
    ///
    /// Blank optional fields are sent as empty strings so they can be cleared.
    fn to_request(&self) -> Result<UpdateProfileRequest, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please fill in your name.".to_string());
        }
        let image = self.profile_image.trim();
        if !image.is_empty() && url::Url::parse(image).is_err() {
            return Err("Profile image must be a full URL.".to_string());
        }
        Ok(UpdateProfileRequest {
            name: Some(name.to_string()),
            phone: Some(self.phone.trim().to_string()),
            location: Some(self.location.trim().to_string()),
            profile_image: Some(image.to_string()),
        })
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub user: User,
    pub form: ProfileForm,
    pub error: Option<String>,
}

/// Display the profile form.
///
/// Re-reads the user from the backend first so the page and the session
/// snapshot reflect changes made elsewhere.
#[instrument(skip_all, fields(user_id = %current.id()))]
pub async fn show(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    mut layout: Layout,
) -> Result<impl IntoResponse, AppError> {
    let user = match AuthService::new(state.api()).refresh(&session).await {
        Ok(user) => user,
        Err(AuthError::Api(ApiError::Unauthorized)) => return Err(AppError::SessionExpired),
        Err(e @ AuthError::Session(_)) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Profile refresh failed, showing cached user");
            current.user
        }
    };
    layout.user = Some(user.clone());

    Ok(ProfileTemplate {
        layout,
        form: ProfileForm::from_user(&user),
        user,
        error: None,
    })
}

/// Save the profile and refresh the session's user snapshot.
#[instrument(skip_all, fields(user_id = %current.id()))]
pub async fn update(
    RequireAuth(current): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    let request = match form.to_request() {
        Ok(request) => request,
        Err(message) => {
            let page = ProfileTemplate {
                layout,
                user: current.user,
                form,
                error: Some(message),
            };
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };

    match AuthService::new(state.api())
        .update_profile(&session, &request)
        .await
    {
        Ok(_) => {
            Flash::success("Your profile has been updated.")
                .push(&session)
                .await?;
            Ok(Redirect::to("/account/profile").into_response())
        }
        Err(e @ (AuthError::Session(_) | AuthError::NotAuthenticated)) => Err(e.into()),
        Err(AuthError::Api(ApiError::Unauthorized)) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!(error = %e, "Profile update rejected");
            let page = ProfileTemplate {
                layout,
                user: current.user,
                form,
                error: Some(e.user_message()),
            };
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_form_validation() {
        let form = ProfileForm {
            name: "  Asha Verma ".to_string(),
            phone: String::new(),
            location: "Pune".to_string(),
            profile_image: String::new(),
        };
        let request = form.to_request().unwrap();
        assert_eq!(request.name.as_deref(), Some("Asha Verma"));
        assert_eq!(request.phone.as_deref(), Some(""));

        let blank = ProfileForm::default();
        assert!(blank.to_request().is_err());

        let bad_image = ProfileForm {
            profile_image: "me.png".to_string(),
            ..form
        };
        assert!(bad_image.to_request().is_err());
    }
}
