//! `bookings/*` endpoints.

use serde::Deserialize;
use tracing::instrument;

use gharkakaam_core::BookingId;

use super::{ApiError, Call};
use crate::models::{Booking, BookingPage, BookingQuery, CreateBookingRequest, StatusUpdateRequest};

#[derive(Deserialize)]
struct BookingEnvelope {
    booking: Booking,
}

/// Booking calls. All require a token.
pub struct BookingsApi<'a> {
    call: Call<'a>,
}

impl<'a> BookingsApi<'a> {
    pub(crate) const fn new(call: Call<'a>) -> Self {
        Self { call }
    }

    /// Bookings where the current user is customer or provider, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &BookingQuery) -> Result<BookingPage, ApiError> {
        // Trailing slash matches the backend's blueprint root.
        self.call.get_with("bookings/", query).await
    }

    /// A single booking.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` or `ApiError::Rejected` (403) for
    /// bookings the user is not party to.
    #[instrument(skip(self))]
    pub async fn get(&self, id: BookingId) -> Result<Booking, ApiError> {
        let envelope: BookingEnvelope = self.call.get(&format!("bookings/{id}")).await?;
        Ok(envelope.booking)
    }

    /// Request a booking (customers only).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if a required field is missing.
    #[instrument(skip(self, request), fields(provider_id = %request.provider_id))]
    pub async fn create(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError> {
        let envelope: BookingEnvelope = self.call.post("bookings/", request).await?;
        Ok(envelope.booking)
    }

    /// Move a booking through its lifecycle.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the backend refuses the transition.
    #[instrument(skip(self, request), fields(status = %request.status))]
    pub async fn update_status(
        &self,
        id: BookingId,
        request: &StatusUpdateRequest,
    ) -> Result<Booking, ApiError> {
        let envelope: BookingEnvelope = self
            .call
            .put(&format!("bookings/{id}/status"), request)
            .await?;
        Ok(envelope.booking)
    }
}
