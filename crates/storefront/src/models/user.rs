//! User account as returned by the backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use gharkakaam_core::{UserId, UserType};

/// A registered user.
///
/// Also stored in the session as the cached user snapshot, so it
/// round-trips through `serde_json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

const fn active_by_default() -> bool {
    true
}

impl User {
    /// First word of the user's name, used in greetings.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// Phone number or an empty string.
    #[must_use]
    pub fn phone_or_empty(&self) -> &str {
        self.phone.as_deref().unwrap_or_default()
    }

    /// Location or an empty string.
    #[must_use]
    pub fn location_or_empty(&self) -> &str {
        self.location.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_backend_shape() {
        let user: User = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "Asha Verma",
                "email": "asha@example.com",
                "phone": "9876543210",
                "user_type": "provider",
                "location": null,
                "is_verified": true,
                "is_active": true,
                "profile_image": null,
                "created_at": "2024-03-01T09:30:00.123456"
            }"#,
        )
        .unwrap();

        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.user_type, UserType::Provider);
        assert_eq!(user.first_name(), "Asha");
        assert_eq!(user.location_or_empty(), "");
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_session_snapshot_round_trips() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "name": "Ravi", "email": "ravi@example.com"}"#)
                .unwrap();
        let stored = serde_json::to_value(&user).unwrap();
        let restored: User = serde_json::from_value(stored).unwrap();
        assert_eq!(restored, user);
        assert!(restored.is_active);
        assert_eq!(restored.user_type, UserType::Customer);
    }
}
