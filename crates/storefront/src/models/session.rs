//! Session-related types.
//!
//! The session holds the backend access token and a snapshot of the logged-in
//! user. Both are written together on login and removed together on logout.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use gharkakaam_core::{UserId, UserType};

use super::User;

/// Session keys for authentication data.
pub mod keys {
    /// Bearer token issued by the backend.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Cached [`User`](crate::models::User) snapshot.
    pub const USER: &str = "user";

    /// One-shot notice shown on the next rendered page.
    pub const FLASH: &str = "flash";
}

/// Backend access token, redacted in debug output.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Raw token for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// The authenticated user for the current request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Cached user snapshot.
    pub user: User,
    /// Token to call the backend on the user's behalf.
    pub token: AccessToken,
}

impl CurrentUser {
    /// Backend user ID.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.user.id
    }

    /// Role the user registered with.
    #[must_use]
    pub const fn role(&self) -> UserType {
        self.user.user_type
    }
}

/// Authentication state as read from the session.
///
/// `is_authenticated` holds only when both the token and the user snapshot
/// are present. A half-written session counts as logged out.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    token: Option<AccessToken>,
}

impl SessionState {
    /// Build the state from the two stored values.
    #[must_use]
    pub fn new(token: Option<AccessToken>, user: Option<User>) -> Self {
        let is_authenticated = token.is_some() && user.is_some();
        Self {
            user,
            is_authenticated,
            token,
        }
    }

    /// Read the state from the session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        let token = session
            .get::<String>(keys::ACCESS_TOKEN)
            .await?
            .map(AccessToken::new);
        // An undecodable snapshot (e.g. from an older release) counts as absent.
        let user = session.get::<User>(keys::USER).await.ok().flatten();
        Ok(Self::new(token, user))
    }

    /// The authenticated user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        if !self.is_authenticated {
            return None;
        }
        match (&self.user, &self.token) {
            (Some(user), Some(token)) => Some(CurrentUser {
                user: user.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }

    /// Role of the authenticated user.
    #[must_use]
    pub fn role(&self) -> Option<UserType> {
        self.current_user().map(|current| current.role())
    }
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

impl FlashKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A one-shot notice carried across a redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    /// Success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    /// Error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Info,
            message: message.into(),
        }
    }

    /// Store the notice for the next page. Replaces any pending notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn push(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::FLASH, self).await
    }

    /// Remove and return the pending notice.
    ///
    /// Store failures are treated as "no notice".
    pub async fn take(session: &Session) -> Option<Self> {
        session.remove::<Self>(keys::FLASH).await.ok().flatten()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Meera",
            "email": "meera@example.com",
            "user_type": "provider"
        }))
        .unwrap()
    }

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn test_authenticated_requires_both_keys() {
        assert!(!SessionState::new(None, None).is_authenticated);
        assert!(!SessionState::new(Some(AccessToken::new("t")), None).is_authenticated);
        assert!(!SessionState::new(None, Some(user())).is_authenticated);

        let state = SessionState::new(Some(AccessToken::new("t")), Some(user()));
        assert!(state.is_authenticated);
        assert_eq!(state.role(), Some(UserType::Provider));
        assert_eq!(state.current_user().unwrap().id(), UserId::new(3));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
        assert_eq!(token.expose(), "super-secret");
    }

    #[tokio::test]
    async fn test_load_reads_both_keys() {
        let session = session();
        assert!(!SessionState::load(&session).await.unwrap().is_authenticated);

        session.insert(keys::ACCESS_TOKEN, "abc").await.unwrap();
        session.insert(keys::USER, user()).await.unwrap();

        let state = SessionState::load(&session).await.unwrap();
        assert!(state.is_authenticated);
        assert_eq!(state.current_user().unwrap().token.expose(), "abc");
    }

    #[tokio::test]
    async fn test_flash_is_one_shot() {
        let session = session();
        Flash::success("Saved").push(&session).await.unwrap();
        Flash::error("Replaced").push(&session).await.unwrap();

        assert_eq!(Flash::take(&session).await, Some(Flash::error("Replaced")));
        assert_eq!(Flash::take(&session).await, None);
    }
}
