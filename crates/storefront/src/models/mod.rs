//! Domain models for the storefront.
//!
//! Wire types mirror the JSON the REST backend emits. Nullable columns are
//! `Option` with `#[serde(default)]` so a missing key and `null` read the same.

pub mod booking;
pub mod requests;
pub mod service;
pub mod session;
pub mod user;

pub use booking::{Booking, BookingPage, Review, ReviewPage};
pub use requests::*;
pub use service::{ProviderPage, ServiceCategory, ServiceProvider};
pub use session::{AccessToken, CurrentUser, Flash, FlashKind, SessionState};
pub use user::User;

use serde::Deserialize;

/// Pagination fields shared by every list envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageInfo {
    /// Total matching items across all pages.
    #[serde(default)]
    pub total: u32,
    /// Number of pages.
    #[serde(default)]
    pub pages: u32,
    /// Page this envelope holds (1-based).
    #[serde(default = "first_page")]
    pub current_page: u32,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            total: 0,
            pages: 0,
            current_page: 1,
        }
    }
}

impl PageInfo {
    /// Previous page number, if there is one.
    #[must_use]
    pub const fn previous(&self) -> Option<u32> {
        if self.current_page > 1 {
            Some(self.current_page - 1)
        } else {
            None
        }
    }

    /// Next page number, if there is one.
    #[must_use]
    pub const fn next(&self) -> Option<u32> {
        if self.current_page < self.pages {
            Some(self.current_page + 1)
        } else {
            None
        }
    }

    /// Whether pagination controls should be shown.
    #[must_use]
    pub const fn has_multiple_pages(&self) -> bool {
        self.pages > 1
    }
}

const fn first_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation() {
        let page = PageInfo {
            total: 30,
            pages: 3,
            current_page: 2,
        };
        assert_eq!(page.previous(), Some(1));
        assert_eq!(page.next(), Some(3));
        assert!(page.has_multiple_pages());

        let single = PageInfo {
            total: 4,
            pages: 1,
            current_page: 1,
        };
        assert_eq!(single.previous(), None);
        assert_eq!(single.next(), None);
        assert!(!single.has_multiple_pages());
    }
}
