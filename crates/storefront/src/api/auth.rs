//! `auth/*` endpoints.

use serde::Deserialize;
use tracing::instrument;

use super::{ApiError, Call};
use crate::models::{LoginRequest, RegisterRequest, UpdateProfileRequest, User};

/// Response to a successful login or registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

/// Authentication calls.
pub struct AuthApi<'a> {
    call: Call<'a>,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(call: Call<'a>) -> Self {
        Self { call }
    }

    /// Create an account. The backend logs the new user in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the email is taken or a field is invalid.
    #[instrument(skip(self, request), fields(email = %request.email, user_type = %request.user_type))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.call.post("auth/register", request).await
    }

    /// Exchange credentials for an access token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.call.post("auth/login", request).await
    }

    /// Fetch the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is no longer valid.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.call.get("auth/profile").await?;
        Ok(envelope.user)
    }

    /// Update the current user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the update.
    #[instrument(skip(self, request))]
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.call.put("auth/profile", request).await?;
        Ok(envelope.user)
    }
}
