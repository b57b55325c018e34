//! Booking lifecycle.
//!
//! ```text
//! pending -> confirmed -> in_progress -> completed
//!    \           \             \
//!     +-----------+-------------+--> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. The backend is authoritative;
//! these rules decide which actions the storefront offers and pre-checks
//! before forwarding a status change.

use serde::{Deserialize, Serialize};

use crate::UserType;

/// Booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Badge label, e.g. `IN PROGRESS`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::InProgress => "IN PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The next status on the happy path, if any.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::InProgress),
            Self::InProgress => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    /// Whether moving from `self` to `next` follows the lifecycle.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::Cancelled || self.successor() == Some(next)
    }

    /// Every status reachable from `self` in one step.
    #[must_use]
    pub fn next_steps(self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("invalid booking status: {s}"))
    }
}

/// A status change a user can request on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Confirm,
    Start,
    Complete,
    Cancel,
}

impl BookingAction {
    /// Status the booking ends up in.
    #[must_use]
    pub const fn target(self) -> BookingStatus {
        match self {
            Self::Confirm => BookingStatus::Confirmed,
            Self::Start => BookingStatus::InProgress,
            Self::Complete => BookingStatus::Completed,
            Self::Cancel => BookingStatus::Cancelled,
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confirm => "Confirm booking",
            Self::Start => "Start service",
            Self::Complete => "Mark completed",
            Self::Cancel => "Cancel booking",
        }
    }

    /// Form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }

    /// Whether `role` may request this action at all.
    ///
    /// Providers drive the booking forward; either side may cancel.
    #[must_use]
    pub const fn permitted_for(self, role: UserType) -> bool {
        match self {
            Self::Confirm | Self::Start | Self::Complete => matches!(role, UserType::Provider),
            Self::Cancel => matches!(role, UserType::Provider | UserType::Customer),
        }
    }

    /// Actions `role` may take on a booking currently in `status`.
    #[must_use]
    pub fn available(status: BookingStatus, role: UserType) -> Vec<Self> {
        [Self::Confirm, Self::Start, Self::Complete, Self::Cancel]
            .into_iter()
            .filter(|action| action.permitted_for(role) && status.can_transition_to(action.target()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_no_skipping_or_going_back() {
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
        assert!(!BookingStatus::Confirmed.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::InProgress));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for status in BookingStatus::ALL {
            assert_eq!(
                status.can_transition_to(BookingStatus::Cancelled),
                !status.is_terminal()
            );
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for next in BookingStatus::ALL {
            assert!(!BookingStatus::Completed.can_transition_to(next));
            assert!(!BookingStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_next_steps() {
        assert_eq!(
            BookingStatus::Pending.next_steps(),
            vec![BookingStatus::Confirmed, BookingStatus::Cancelled]
        );
        assert!(BookingStatus::Completed.next_steps().is_empty());
    }

    #[test]
    fn test_wire_names() {
        let status: BookingStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, BookingStatus::InProgress);
        assert_eq!("cancelled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
        assert!("done".parse::<BookingStatus>().is_err());
        assert_eq!(BookingStatus::InProgress.label(), "IN PROGRESS");
    }

    #[test]
    fn test_available_actions_by_role() {
        assert_eq!(
            BookingAction::available(BookingStatus::Pending, UserType::Provider),
            vec![BookingAction::Confirm, BookingAction::Cancel]
        );
        assert_eq!(
            BookingAction::available(BookingStatus::InProgress, UserType::Provider),
            vec![BookingAction::Complete, BookingAction::Cancel]
        );
        assert_eq!(
            BookingAction::available(BookingStatus::Confirmed, UserType::Customer),
            vec![BookingAction::Cancel]
        );
        assert!(BookingAction::available(BookingStatus::Completed, UserType::Provider).is_empty());
        assert!(BookingAction::available(BookingStatus::Pending, UserType::Admin).is_empty());
    }
}
