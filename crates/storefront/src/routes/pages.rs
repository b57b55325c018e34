//! Static content page route handlers.
//!
//! Serves the markdown pages from the content store: about, privacy, terms.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use chrono::NaiveDate;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::layout::Layout;
use crate::state::AppState;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/content.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub title: String,
    pub description: String,
    pub updated_at: Option<NaiveDate>,
    pub content_html: String,
}

/// Serve a content page by slug.
fn serve_content_page(
    state: &AppState,
    layout: Layout,
    slug: &str,
) -> Result<ContentPageTemplate, AppError> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    Ok(ContentPageTemplate {
        layout,
        title: page.meta.title.clone(),
        description: page.meta.description.clone().unwrap_or_default(),
        updated_at: page.meta.updated_at,
        content_html: page.content_html.clone(),
    })
}

/// Display the About page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, layout))]
pub async fn about(
    State(state): State<AppState>,
    layout: Layout,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, layout, "about")
}

/// Display the Privacy Policy page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, layout))]
pub async fn privacy(
    State(state): State<AppState>,
    layout: Layout,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, layout, "privacy")
}

/// Display the Terms of Service page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, layout))]
pub async fn terms(
    State(state): State<AppState>,
    layout: Layout,
) -> Result<impl IntoResponse, AppError> {
    serve_content_page(&state, layout, "terms")
}
