//! `reviews/*` endpoints.

use serde::Deserialize;
use serde::de::IgnoredAny;
use tracing::instrument;

use gharkakaam_core::{ProviderId, ReviewId};

use super::{ApiError, Call};
use crate::models::{CreateReviewRequest, PageQuery, Review, ReviewPage, UpdateReviewRequest};

#[derive(Deserialize)]
struct ReviewEnvelope {
    review: Review,
}

/// Review calls.
pub struct ReviewsApi<'a> {
    call: Call<'a>,
}

impl<'a> ReviewsApi<'a> {
    pub(crate) const fn new(call: Call<'a>) -> Self {
        Self { call }
    }

    /// Reviews of a provider, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn for_provider(
        &self,
        provider_id: ProviderId,
        query: &PageQuery,
    ) -> Result<ReviewPage, ApiError> {
        self.call
            .get_with(&format!("reviews/provider/{provider_id}"), query)
            .await
    }

    /// Review a completed booking.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the booking is not completed or already reviewed.
    #[instrument(skip(self, request), fields(booking_id = %request.booking_id))]
    pub async fn create(&self, request: &CreateReviewRequest) -> Result<Review, ApiError> {
        let envelope: ReviewEnvelope = self.call.post("reviews/", request).await?;
        Ok(envelope.review)
    }

    /// Edit a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the review belongs to someone else.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: ReviewId,
        request: &UpdateReviewRequest,
    ) -> Result<Review, ApiError> {
        let envelope: ReviewEnvelope = self.call.put(&format!("reviews/{id}"), request).await?;
        Ok(envelope.review)
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns an error if the review belongs to someone else.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ReviewId) -> Result<(), ApiError> {
        let _: IgnoredAny = self.call.delete(&format!("reviews/{id}")).await?;
        Ok(())
    }
}
