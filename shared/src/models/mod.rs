//! Data models
//!
//! Shared between the sync service and the storefront backend (via API).
//! Product IDs are `String` (storefront-assigned), sync job IDs are `i64`
//! (BIGSERIAL).

pub mod product;
pub mod sync_job;

// Re-exports
pub use product::*;
pub use sync_job::*;
