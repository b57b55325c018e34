//! Editing and deleting a customer's own reviews.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use gharkakaam_core::ReviewId;

use crate::api::ApiError;
use crate::error::AppError;
use crate::guard::{Customer, safe_return_path};
use crate::middleware::RequireRole;
use crate::models::{Flash, UpdateReviewRequest};
use crate::routes::bookings::{ReviewForm, record_review};
use crate::state::AppState;

fn return_path(form: &ReviewForm) -> String {
    safe_return_path(Some(form.next.as_str())).to_string()
}

/// Edit a review.
///
/// # Errors
///
/// Returns `AppError` if the session can't hold the notice or the backend
/// rejects the token.
#[instrument(skip_all, fields(review_id = id))]
pub async fn update(
    RequireRole(current, _): RequireRole<Customer>,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let back = return_path(&form);
    let rating = match form.rating() {
        Ok(rating) => rating,
        Err(message) => {
            Flash::error(message).push(&session).await?;
            return Ok(Redirect::to(&back).into_response());
        }
    };

    let request = UpdateReviewRequest {
        rating: Some(rating),
        comment: Some(form.comment.trim().to_string()),
    };
    match state
        .api()
        .reviews(Some(&current.token))
        .update(ReviewId::new(id), &request)
        .await
    {
        Ok(_) => {
            record_review(&current, "Review edited");
            Flash::success("Your review has been updated.")
                .push(&session)
                .await?;
        }
        Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!(error = %e, "Review update rejected");
            Flash::error(e.user_message()).push(&session).await?;
        }
    }
    Ok(Redirect::to(&back).into_response())
}

/// Delete a review.
///
/// # Errors
///
/// Returns `AppError` if the session can't hold the notice or the backend
/// rejects the token.
#[instrument(skip_all, fields(review_id = id))]
pub async fn delete(
    RequireRole(current, _): RequireRole<Customer>,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<ReviewForm>,
) -> Result<Response, AppError> {
    let back = return_path(&form);
    match state
        .api()
        .reviews(Some(&current.token))
        .delete(ReviewId::new(id))
        .await
    {
        Ok(()) => {
            record_review(&current, "Review deleted");
            Flash::success("Your review has been deleted.")
                .push(&session)
                .await?;
        }
        Err(ApiError::Unauthorized) => return Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!(error = %e, "Review delete rejected");
            Flash::error(e.user_message()).push(&session).await?;
        }
    }
    Ok(Redirect::to(&back).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_path_stays_local() {
        let form = |next: &str| ReviewForm {
            next: next.to_string(),
            ..ReviewForm::default()
        };
        assert_eq!(return_path(&form("/services/providers/5")), "/services/providers/5");
        assert_eq!(return_path(&form("https://evil.example")), "/dashboard");
        assert_eq!(return_path(&form("")), "/dashboard");
    }
}
