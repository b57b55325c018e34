//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] gharkakaam_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// A required registration field is empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No token in the session.
    #[error("not logged in")]
    NotAuthenticated,

    /// Backend call failed.
    #[error("backend error: {0}")]
    Api(#[from] ApiError),

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AuthError {
    /// Message for the form notice.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => format!("Please enter a valid email address ({e})."),
            Self::InvalidCredentials => "Invalid email or password.".to_string(),
            Self::WeakPassword(reason) => reason.clone(),
            Self::MissingField(field) => format!("Please fill in your {field}."),
            Self::NotAuthenticated => "Please log in to continue.".to_string(),
            Self::Api(e) => e.user_message(),
            Self::Session(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}
