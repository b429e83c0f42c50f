//! Database access layer
//!
//! Two tables: `products` (catalog rows mirrored to the provider) and
//! `sync_queue` (the reconciliation job log). The queue processor is the
//! only writer of `sync_status` and the `stripe_*` references.

pub mod products;
pub mod sync_queue;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
