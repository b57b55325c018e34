//! User roles and the capability check shared by guards and views.

use serde::{Deserialize, Serialize};

/// The role a user registered with.
///
/// Assigned by the backend at registration and never changed by the
/// storefront. It decides which views and actions are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    /// Books services.
    #[default]
    Customer,
    /// Offers services.
    Provider,
    /// Platform administrator.
    Admin,
}

/// Error returned when a string does not name a [`UserType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid user type: {0}")]
pub struct UserTypeParseError(pub String);

impl UserType {
    /// Every role, in display order.
    pub const ALL: [Self; 3] = [Self::Customer, Self::Provider, Self::Admin];

    /// Wire value used by the backend (`customer`, `provider`, `admin`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Provider => "provider",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Provider => "Service Provider",
            Self::Admin => "Administrator",
        }
    }

    /// Whether a user with this role may see a view that requires `required`.
    ///
    /// A view without a required role is open to every authenticated user.
    /// Role requirements are exact matches: admins do not inherit provider or
    /// customer views.
    ///
    /// ```
    /// use gharkakaam_core::UserType;
    ///
    /// assert!(UserType::Customer.can_view(None));
    /// assert!(UserType::Provider.can_view(Some(UserType::Provider)));
    /// assert!(!UserType::Admin.can_view(Some(UserType::Provider)));
    /// ```
    #[must_use]
    pub fn can_view(self, required: Option<Self>) -> bool {
        required.is_none_or(|role| role == self)
    }

    /// Whether this is the provider role.
    #[must_use]
    pub const fn is_provider(self) -> bool {
        matches!(self, Self::Provider)
    }

    /// Whether this is the customer role.
    #[must_use]
    pub const fn is_customer(self) -> bool {
        matches!(self, Self::Customer)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = UserTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "provider" => Ok(Self::Provider),
            "admin" => Ok(Self::Admin),
            _ => Err(UserTypeParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_can_view_without_requirement() {
        for role in UserType::ALL {
            assert!(role.can_view(None));
        }
    }

    #[test]
    fn test_can_view_requires_exact_role() {
        for role in UserType::ALL {
            for required in UserType::ALL {
                assert_eq!(role.can_view(Some(required)), role == required);
            }
        }
    }

    #[test]
    fn test_round_trips_wire_names() {
        for role in UserType::ALL {
            assert_eq!(role.as_str().parse::<UserType>().unwrap(), role);
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
        assert!("superuser".parse::<UserType>().is_err());
    }
}
