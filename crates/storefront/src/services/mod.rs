//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Login, registration, logout and profile refresh (session writes)
//! - `dashboard` - Provider profile lookup and dashboard figures
//! - `forms` - Contact and provider-application submissions

pub mod auth;
pub mod dashboard;
pub mod forms;
