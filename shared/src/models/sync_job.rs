//! Sync queue job model

use serde::{Deserialize, Serialize};

/// Maximum automatic retries before a job is parked as failed
pub const MAX_RETRY_COUNT: i32 = 5;

/// One catalog-to-provider reconciliation action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: i64,
    /// Weak reference — the product row may be gone before the job runs
    pub product_id: String,
    pub operation: SyncOperation,
    pub status: SyncJobStatus,
    pub retry_count: i32,
    pub error_message: Option<String>,
    /// Carries `stripe_product_id` for delete jobs whose product row is
    /// already gone
    pub metadata: serde_json::Value,
    pub created_at: i64,
    pub processed_at: Option<i64>,
    /// Earliest epoch millis at which the job may be claimed
    pub next_attempt_at: i64,
    /// Epoch millis of the last claim, for stale-claim recovery
    pub claimed_at: Option<i64>,
}

impl SyncJob {
    /// Provider product id carried in job metadata (delete jobs)
    pub fn metadata_stripe_product_id(&self) -> Option<&str> {
        self.metadata
            .get("stripe_product_id")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Operation a sync job performs against the provider catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
}

impl SyncOperation {
    /// DB column representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Parse the DB column representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Lifecycle state of a sync job
///
/// Transitions are monotonic: `pending|retrying → processing →
/// {completed | retrying | failed}`. A job failed at the retry cap needs a
/// manual re-enqueue to move again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    Pending,
    Processing,
    Completed,
    Retrying,
    Failed,
}

impl SyncJobStatus {
    /// DB column representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Retrying => "retrying",
            Self::Failed => "failed",
        }
    }

    /// Parse the DB column representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "retrying" => Some(Self::Retrying),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Terminal states receive no further automatic transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_roundtrip() {
        for op in [
            SyncOperation::Create,
            SyncOperation::Update,
            SyncOperation::Delete,
        ] {
            assert_eq!(SyncOperation::parse(op.as_db()), Some(op));
        }
        assert_eq!(SyncOperation::parse("upsert"), None);
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            SyncJobStatus::Pending,
            SyncJobStatus::Processing,
            SyncJobStatus::Completed,
            SyncJobStatus::Retrying,
            SyncJobStatus::Failed,
        ] {
            assert_eq!(SyncJobStatus::parse(status.as_db()), Some(status));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(SyncJobStatus::Completed.is_terminal());
        assert!(SyncJobStatus::Failed.is_terminal());
        assert!(!SyncJobStatus::Pending.is_terminal());
        assert!(!SyncJobStatus::Processing.is_terminal());
        assert!(!SyncJobStatus::Retrying.is_terminal());
    }

    #[test]
    fn test_metadata_stripe_product_id() {
        let mut job = SyncJob {
            id: 1,
            product_id: "kuju-karp".into(),
            operation: SyncOperation::Delete,
            status: SyncJobStatus::Pending,
            retry_count: 0,
            error_message: None,
            metadata: serde_json::json!({ "stripe_product_id": "prod_123" }),
            created_at: 0,
            processed_at: None,
            next_attempt_at: 0,
            claimed_at: None,
        };
        assert_eq!(job.metadata_stripe_product_id(), Some("prod_123"));

        job.metadata = serde_json::json!({});
        assert_eq!(job.metadata_stripe_product_id(), None);

        job.metadata = serde_json::json!({ "stripe_product_id": "" });
        assert_eq!(job.metadata_stripe_product_id(), None);
    }
}
