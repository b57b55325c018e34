//! `services/*` endpoints: categories and provider profiles.

use serde::Deserialize;
use tracing::instrument;

use gharkakaam_core::ProviderId;

use super::{ApiError, Call};
use crate::models::{ProviderPage, ProviderProfileRequest, ProviderQuery, ServiceCategory, ServiceProvider};

#[derive(Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Vec<ServiceCategory>,
}

#[derive(Deserialize)]
struct ProviderEnvelope {
    provider: ServiceProvider,
}

/// Catalog calls.
pub struct ServicesApi<'a> {
    call: Call<'a>,
}

impl<'a> ServicesApi<'a> {
    pub(crate) const fn new(call: Call<'a>) -> Self {
        Self { call }
    }

    /// All active service categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<ServiceCategory>, ApiError> {
        let envelope: CategoriesEnvelope = self.call.get("services/categories").await?;
        Ok(envelope.categories)
    }

    /// One page of approved providers matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn providers(&self, query: &ProviderQuery) -> Result<ProviderPage, ApiError> {
        self.call.get_with("services/providers", query).await
    }

    /// A single provider profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if no such provider exists.
    #[instrument(skip(self))]
    pub async fn provider(&self, id: ProviderId) -> Result<ServiceProvider, ApiError> {
        let envelope: ProviderEnvelope = self
            .call
            .get(&format!("services/providers/{id}"))
            .await?;
        Ok(envelope.provider)
    }

    /// Create the current user's provider profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if a profile already exists.
    #[instrument(skip(self, request))]
    pub async fn create_provider(
        &self,
        request: &ProviderProfileRequest,
    ) -> Result<ServiceProvider, ApiError> {
        let envelope: ProviderEnvelope = self.call.post("services/providers", request).await?;
        Ok(envelope.provider)
    }

    /// Update an existing provider profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile belongs to another user.
    #[instrument(skip(self, request))]
    pub async fn update_provider(
        &self,
        id: ProviderId,
        request: &ProviderProfileRequest,
    ) -> Result<ServiceProvider, ApiError> {
        let envelope: ProviderEnvelope = self
            .call
            .put(&format!("services/providers/{id}"), request)
            .await?;
        Ok(envelope.provider)
    }
}
