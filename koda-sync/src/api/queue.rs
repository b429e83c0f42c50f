//! POST /api/sync/queue — queue processor invocation API
//!
//! One endpoint, action-dispatched: `process_queue`, `queue_all_products`,
//! `get_queue_stats`, `cleanup_queue`. Every response carries a `success`
//! flag plus the action's counts and per-item results.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::sync_queue::QueueStats;
use crate::error::ServiceError;
use crate::queue::{self, BatchSummary, EnqueueSummary};
use crate::state::AppState;

/// Queue API request body, dispatched on `action`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SyncActionRequest {
    ProcessQueue {
        batch_size: Option<u32>,
    },
    QueueAllProducts,
    GetQueueStats,
    CleanupQueue {
        older_than_days: Option<u32>,
    },
}

#[derive(Debug, Serialize)]
struct ProcessResponse {
    success: bool,
    processed: usize,
    successful: usize,
    failed: usize,
    results: Vec<queue::JobResult>,
}

impl From<BatchSummary> for ProcessResponse {
    fn from(summary: BatchSummary) -> Self {
        Self {
            success: true,
            processed: summary.processed,
            successful: summary.successful,
            failed: summary.failed,
            results: summary.results,
        }
    }
}

#[derive(Debug, Serialize)]
struct EnqueueResponse {
    success: bool,
    queued: u64,
    skipped: u64,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    success: bool,
    stats: QueueStats,
}

#[derive(Debug, Serialize)]
struct CleanupResponse {
    success: bool,
    removed: u64,
}

/// Handle one queue API action
pub async fn handle_action(
    State(state): State<AppState>,
    Json(request): Json<SyncActionRequest>,
) -> Result<Response, ServiceError> {
    match request {
        SyncActionRequest::ProcessQueue { batch_size } => {
            let batch_size = batch_size.unwrap_or(state.queue_batch_size);
            let summary = queue::process_queue(&state, batch_size).await?;
            Ok(Json(ProcessResponse::from(summary)).into_response())
        }
        SyncActionRequest::QueueAllProducts => {
            let EnqueueSummary { queued, skipped } = queue::queue_all_products(&state).await?;
            Ok(Json(EnqueueResponse {
                success: true,
                queued,
                skipped,
            })
            .into_response())
        }
        SyncActionRequest::GetQueueStats => {
            let stats = queue::queue_stats(&state).await?;
            Ok(Json(StatsResponse {
                success: true,
                stats,
            })
            .into_response())
        }
        SyncActionRequest::CleanupQueue { older_than_days } => {
            let days = older_than_days.unwrap_or(queue::DEFAULT_CLEANUP_DAYS);
            let removed = queue::cleanup_queue(&state, days).await?;
            Ok(Json(CleanupResponse {
                success: true,
                removed,
            })
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_process_queue_with_batch_size() {
        let req: SyncActionRequest =
            serde_json::from_str(r#"{"action":"process_queue","batch_size":25}"#).unwrap();
        assert!(matches!(
            req,
            SyncActionRequest::ProcessQueue {
                batch_size: Some(25)
            }
        ));
    }

    #[test]
    fn test_parse_process_queue_default_batch() {
        let req: SyncActionRequest =
            serde_json::from_str(r#"{"action":"process_queue"}"#).unwrap();
        assert!(matches!(
            req,
            SyncActionRequest::ProcessQueue { batch_size: None }
        ));
    }

    #[test]
    fn test_parse_queue_all_products() {
        let req: SyncActionRequest =
            serde_json::from_str(r#"{"action":"queue_all_products"}"#).unwrap();
        assert!(matches!(req, SyncActionRequest::QueueAllProducts));
    }

    #[test]
    fn test_parse_get_queue_stats() {
        let req: SyncActionRequest =
            serde_json::from_str(r#"{"action":"get_queue_stats"}"#).unwrap();
        assert!(matches!(req, SyncActionRequest::GetQueueStats));
    }

    #[test]
    fn test_parse_cleanup_queue() {
        let req: SyncActionRequest =
            serde_json::from_str(r#"{"action":"cleanup_queue","older_than_days":30}"#).unwrap();
        assert!(matches!(
            req,
            SyncActionRequest::CleanupQueue {
                older_than_days: Some(30)
            }
        ));
    }

    #[test]
    fn test_parse_unknown_action_rejected() {
        let result =
            serde_json::from_str::<SyncActionRequest>(r#"{"action":"drop_everything"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_batch_summary_serializes_zero_processed() {
        let response = ProcessResponse::from(BatchSummary::default());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["processed"], 0);
        assert_eq!(json["results"].as_array().unwrap().len(), 0);
    }
}
