//! Shared types for the koda storefront backend
//!
//! Common types used across service crates: the unified error system,
//! catalog and sync-queue models, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
