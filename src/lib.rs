//! ISO Profiles - directory service for user-submitted matrimonial profiles
//!
//! Profiles are submitted through a multi-step form, stored in PostgreSQL and
//! listed with filters and sort orders taken from the query string. Saved and
//! seen bookkeeping stays on the client; see [`crate::core::overlay`].

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ProfileFilter, SortOrder};
pub use crate::models::{CreateProfileRequest, ListingQuery, NewProfile, Profile};
pub use crate::services::{ProfileStore, StoreError};
