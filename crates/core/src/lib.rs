//! GharKaKaam Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront and its tests:
//! - Type-safe IDs for backend entities
//! - User roles and the role capability check used by route guards
//! - The booking lifecycle (statuses and legal transitions)
//! - Validated email addresses and rupee prices
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no templates. The remote REST backend owns every entity; these
//! types describe the snapshots the storefront renders.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, roles, statuses, emails, and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
