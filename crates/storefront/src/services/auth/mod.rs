//! Authentication service.
//!
//! The only code that writes the authentication keys of the session. Login
//! and registration store the token and user snapshot together; logout
//! removes them together.

mod error;

pub use error::AuthError;

use tower_sessions::Session;
use tracing::instrument;

use gharkakaam_core::{Email, UserType};

use crate::api::{ApiClient, ApiError, AuthResponse};
use crate::models::session::keys;
use crate::models::{AccessToken, LoginRequest, RegisterRequest, UpdateProfileRequest, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: UserType,
    pub location: Option<String>,
}

/// Authentication service.
///
/// Handles login, registration, logout, and keeping the cached user
/// snapshot in step with the backend.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Log in with email and password.
    ///
    /// Cycles the session ID before storing the token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the
    /// credentials.
    #[instrument(skip(self, session, password))]
    pub async fn login(
        &self,
        session: &Session,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let request = LoginRequest {
            email: email.into_inner(),
            password: password.to_string(),
        };
        let response = self
            .api
            .auth(None)
            .login(&request)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized => AuthError::InvalidCredentials,
                other => AuthError::Api(other),
            })?;

        establish(session, response).await
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns a validation error before calling the backend, or
    /// `AuthError::Api` if the backend rejects the registration.
    #[instrument(skip(self, session, registration), fields(user_type = %registration.user_type))]
    pub async fn register(
        &self,
        session: &Session,
        registration: Registration,
    ) -> Result<User, AuthError> {
        if registration.name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if registration.phone.trim().is_empty() {
            return Err(AuthError::MissingField("phone"));
        }
        let email = Email::parse(&registration.email)?;
        validate_password(&registration.password)?;

        let request = RegisterRequest {
            name: registration.name.trim().to_string(),
            email: email.into_inner(),
            phone: registration.phone.trim().to_string(),
            password: registration.password,
            user_type: registration.user_type,
            location: registration
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        };
        let response = self.api.auth(None).register(&request).await?;

        establish(session, response).await
    }

    /// Log out. Safe to call when already logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    #[instrument(skip(self, session))]
    pub async fn logout(&self, session: &Session) -> Result<(), AuthError> {
        clear(session).await?;
        crate::error::clear_sentry_user();
        Ok(())
    }

    /// Re-fetch the user from the backend and replace the cached snapshot.
    ///
    /// A rejected token logs the session out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if no token is stored, or
    /// `AuthError::Api(ApiError::Unauthorized)` after clearing an expired
    /// session.
    #[instrument(skip(self, session))]
    pub async fn refresh(&self, session: &Session) -> Result<User, AuthError> {
        let token = stored_token(session)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        match self.api.auth(Some(&token)).profile().await {
            Ok(user) => {
                session.insert(keys::USER, &user).await?;
                Ok(user)
            }
            Err(ApiError::Unauthorized) => {
                clear(session).await?;
                Err(AuthError::Api(ApiError::Unauthorized))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Update the profile and merge the result into the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if no token is stored, or
    /// `AuthError::Api` if the backend rejects the update.
    #[instrument(skip(self, session, update))]
    pub async fn update_profile(
        &self,
        session: &Session,
        update: &UpdateProfileRequest,
    ) -> Result<User, AuthError> {
        let token = stored_token(session)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        let user = self.api.auth(Some(&token)).update_profile(update).await?;
        session.insert(keys::USER, &user).await?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}

/// Persist a fresh login.
async fn establish(session: &Session, response: AuthResponse) -> Result<User, AuthError> {
    // Prevent session fixation
    session.cycle_id().await?;
    session
        .insert(keys::ACCESS_TOKEN, &response.access_token)
        .await?;
    session.insert(keys::USER, &response.user).await?;

    crate::error::set_sentry_user(&response.user.id.to_string(), Some(&response.user.email));
    tracing::info!(
        user_id = %response.user.id,
        user_type = %response.user.user_type,
        "User logged in"
    );
    Ok(response.user)
}

/// Remove both authentication keys and any pending notice.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove_value(keys::ACCESS_TOKEN).await?;
    session.remove_value(keys::USER).await?;
    session.remove_value(keys::FLASH).await?;
    Ok(())
}

async fn stored_token(session: &Session) -> Result<Option<AccessToken>, AuthError> {
    Ok(session
        .get::<String>(keys::ACCESS_TOKEN)
        .await?
        .map(AccessToken::new))
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    Ok(())
}
