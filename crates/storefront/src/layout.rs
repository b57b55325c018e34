//! Shared page chrome: navigation user, pending notice, support contacts.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use tower_sessions::Session;

use gharkakaam_core::UserType;

use crate::config::SupportContact;
use crate::models::{Flash, SessionState, User};
use crate::state::AppState;

/// Data every full page renders in `base.html`.
///
/// Extracting it takes the pending flash notice out of the session, so only
/// extract it on paths that render a page.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// Logged-in user, if any.
    pub user: Option<User>,
    /// One-shot notice from the previous request.
    pub flash: Option<Flash>,
    /// Support contacts for the footer.
    pub support: SupportContact,
    /// Request path, for highlighting the active nav link.
    pub path: String,
}

impl Layout {
    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Role of the logged-in user.
    #[must_use]
    pub fn role(&self) -> Option<UserType> {
        self.user.as_ref().map(|u| u.user_type)
    }

    /// Whether the logged-in user may see a section gated on `required`.
    #[must_use]
    pub fn can_view(&self, required: Option<UserType>) -> bool {
        self.role().is_some_and(|role| role.can_view(required))
    }

    /// Whether the logged-in user is a provider.
    #[must_use]
    pub fn is_provider(&self) -> bool {
        self.role() == Some(UserType::Provider)
    }

    /// Whether the logged-in user is a customer.
    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.role() == Some(UserType::Customer)
    }

    /// Whether `prefix` is the active section.
    #[must_use]
    pub fn is_active(&self, prefix: &str) -> bool {
        if prefix == "/" {
            self.path == "/"
        } else {
            self.path.starts_with(prefix)
        }
    }

    /// Replace the pending notice with one raised during this request.
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

impl FromRequestParts<AppState> for Layout {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.0.path())
            .to_string();

        let (user, flash) = match parts.extensions.get::<Session>() {
            Some(session) => {
                let user = SessionState::load(session)
                    .await
                    .ok()
                    .filter(|s| s.is_authenticated)
                    .and_then(|s| s.user);
                (user, Flash::take(session).await)
            }
            None => (None, None),
        };

        Ok(Self {
            user,
            flash,
            support: state.config().support.clone(),
            path,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn layout(role: Option<&str>) -> Layout {
        Layout {
            user: role.map(|r| {
                serde_json::from_value(serde_json::json!({
                    "id": 1, "name": "Asha", "email": "asha@example.com", "user_type": r
                }))
                .unwrap()
            }),
            path: "/services/providers/4".to_string(),
            ..Layout::default()
        }
    }

    #[test]
    fn test_roles() {
        let anon = layout(None);
        assert!(!anon.is_authenticated());
        assert!(!anon.can_view(None));

        let provider = layout(Some("provider"));
        assert!(provider.is_provider());
        assert!(!provider.is_customer());
        assert!(provider.can_view(Some(UserType::Provider)));
        assert!(!provider.can_view(Some(UserType::Customer)));
    }

    #[test]
    fn test_is_active() {
        let page = layout(None);
        assert!(page.is_active("/services"));
        assert!(!page.is_active("/"));
        assert!(!page.is_active("/bookings"));
    }
}
