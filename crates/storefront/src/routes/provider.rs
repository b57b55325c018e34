//! Provider service profile editor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::ApiError;
use crate::error::AppError;
use crate::filters;
use crate::guard::Provider;
use crate::layout::Layout;
use crate::middleware::RequireRole;
use crate::models::{CurrentUser, Flash, ServiceCategory, ServiceProvider};
use crate::services::dashboard::find_provider_profile;
use crate::services::forms::{FormErrors, PRICE_UNITS, ProviderProfileForm};
use crate::state::AppState;

/// Profile editor template.
#[derive(Template, WebTemplate)]
#[template(path = "provider/profile.html")]
pub struct ProviderProfileTemplate {
    pub layout: Layout,
    pub form: ProviderProfileForm,
    pub errors: FormErrors,
    pub categories: Vec<ServiceCategory>,
    pub price_units: &'static [&'static str],
    /// Existing profile, `None` while creating.
    pub profile: Option<ServiceProvider>,
    pub notice: Option<String>,
}

impl ProviderProfileTemplate {
    /// Whether `category` is the selected one.
    #[must_use]
    pub fn is_selected_category(&self, category: &ServiceCategory) -> bool {
        self.form.category_id.trim() == category.id.to_string()
    }

    /// Whether `unit` is the selected pricing unit.
    #[must_use]
    pub fn is_selected_unit(&self, unit: &str) -> bool {
        self.form.price_unit == unit
    }
}

/// Categories and the existing profile, or a notice when either fetch fails.
struct EditorData {
    categories: Vec<ServiceCategory>,
    profile: Option<ServiceProvider>,
    notice: Option<String>,
}

async fn load_editor(state: &AppState, current: &CurrentUser) -> Result<EditorData, AppError> {
    let mut notice = None;
    let categories = match state.api().services(None).categories().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch categories");
            notice = Some("Failed to load categories".to_string());
            Vec::new()
        }
    };
    let profile = match find_provider_profile(state.api(), &current.token, current.id(), &[]).await
    {
        Ok(profile) => profile,
        Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up provider profile");
            notice = Some("Failed to load your service profile".to_string());
            None
        }
    };
    Ok(EditorData {
        categories,
        profile,
        notice,
    })
}

/// Display the profile editor, prefilled when a profile exists.
#[instrument(skip_all, fields(user_id = %current.id()))]
pub async fn show(
    RequireRole(current, _): RequireRole<Provider>,
    State(state): State<AppState>,
    layout: Layout,
) -> Result<impl IntoResponse, AppError> {
    let data = load_editor(&state, &current).await?;
    Ok(ProviderProfileTemplate {
        layout,
        form: data
            .profile
            .as_ref()
            .map(ProviderProfileForm::from_provider)
            .unwrap_or_default(),
        errors: FormErrors::default(),
        categories: data.categories,
        price_units: &PRICE_UNITS,
        profile: data.profile,
        notice: data.notice,
    })
}

/// Create the profile, or update the existing one.
#[instrument(skip_all, fields(user_id = %current.id()))]
pub async fn save(
    RequireRole(current, _): RequireRole<Provider>,
    State(state): State<AppState>,
    session: Session,
    layout: Layout,
    Form(form): Form<ProviderProfileForm>,
) -> Result<Response, AppError> {
    let data = load_editor(&state, &current).await?;

    let (status, errors, notice) = match form.validate() {
        Err(errors) => (StatusCode::BAD_REQUEST, errors, data.notice),
        Ok(request) => {
            let api = state.api().services(Some(&current.token));
            let result = match &data.profile {
                Some(profile) => api.update_provider(profile.id, &request).await,
                None => api.create_provider(&request).await,
            };
            match result {
                Ok(saved) => {
                    tracing::info!(provider_id = %saved.id, "Service profile saved");
                    let message = if data.profile.is_some() {
                        "Your service profile has been updated."
                    } else {
                        "Your service profile has been created. It will be listed once approved."
                    };
                    Flash::success(message).push(&session).await?;
                    return Ok(Redirect::to("/provider/profile").into_response());
                }
                Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
                Err(e) => {
                    tracing::warn!(error = %e, "Service profile rejected");
                    (
                        StatusCode::BAD_REQUEST,
                        FormErrors::default(),
                        Some(e.user_message()),
                    )
                }
            }
        }
    };

    let page = ProviderProfileTemplate {
        layout,
        form,
        errors,
        categories: data.categories,
        price_units: &PRICE_UNITS,
        profile: data.profile,
        notice,
    };
    Ok((status, page).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::service::tests::provider_json;

    #[test]
    fn test_editor_prefills_existing_profile() {
        let provider: ServiceProvider =
            serde_json::from_value(provider_json(5, 9, None)).unwrap();
        let category = provider.category.clone().unwrap();
        let html = ProviderProfileTemplate {
            layout: Layout::default(),
            form: ProviderProfileForm::from_provider(&provider),
            errors: FormErrors::default(),
            categories: vec![category],
            price_units: &PRICE_UNITS,
            profile: Some(provider),
            notice: None,
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"<option value="3" selected>"#));
        assert!(html.contains(r#"<option value="per meal" selected>"#));
        assert!(html.contains(r#"value="Dal, Roti""#));
        assert!(html.contains(r#"value="300""#));
        assert!(html.contains("Update profile"));
    }
}
