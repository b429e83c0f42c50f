//! Queue processor — batch reconciliation of catalog products against the
//! payment provider
//!
//! Each invocation claims a batch atomically, works through it serially
//! with a fixed inter-job pause, and records every outcome on both the job
//! row and the product row. One job's provider failure never aborts the
//! batch.

pub mod backoff;
pub mod ops;

use serde::Serialize;
use shared::models::sync_job::{SyncJobStatus, SyncOperation};
use std::time::Duration;

use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// Fixed pause between provider calls within a batch
const INTER_JOB_DELAY_MS: u64 = 200;
/// A processing claim older than this belongs to a dead invocation and may
/// be reclaimed
const STALE_CLAIM_MS: i64 = 10 * 60 * 1000;
/// Hard cap on the requested batch size
pub const MAX_BATCH_SIZE: u32 = 100;
/// Default age cutoff for cleanup of completed jobs
pub const DEFAULT_CLEANUP_DAYS: u32 = 7;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Per-job outcome reported to the caller
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub job_id: i64,
    pub product_id: String,
    pub operation: SyncOperation,
    pub success: bool,
    pub status: SyncJobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch invocation summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<JobResult>,
}

/// Claim and work through one batch of runnable jobs, oldest first.
///
/// An empty queue is a successful zero-processed run.
pub async fn process_queue(
    state: &AppState,
    batch_size: u32,
) -> Result<BatchSummary, ServiceError> {
    let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
    let now = shared::util::now_millis();

    let jobs = db::sync_queue::claim_batch(&state.pool, batch_size as i64, now, STALE_CLAIM_MS)
        .await?;
    if jobs.is_empty() {
        tracing::debug!("Sync queue empty, nothing to process");
        return Ok(BatchSummary::default());
    }

    tracing::info!(claimed = jobs.len(), "Processing sync queue batch");
    let mut summary = BatchSummary::default();

    for (idx, job) in jobs.iter().enumerate() {
        if idx > 0 {
            tokio::time::sleep(Duration::from_millis(INTER_JOB_DELAY_MS)).await;
        }

        let result = match ops::run_job(state, job).await {
            Ok(outcome) => {
                let now = shared::util::now_millis();
                let ids = outcome
                    .provider_ids
                    .as_ref()
                    .map(|(p, pr)| (p.as_str(), pr.as_str()));
                db::sync_queue::complete_job(&state.pool, job, ids, now).await?;
                tracing::info!(
                    job_id = job.id,
                    product_id = %job.product_id,
                    operation = job.operation.as_db(),
                    detail = outcome.detail,
                    "Sync job completed"
                );
                summary.successful += 1;
                JobResult {
                    job_id: job.id,
                    product_id: job.product_id.clone(),
                    operation: job.operation,
                    success: true,
                    status: SyncJobStatus::Completed,
                    detail: Some(outcome.detail),
                    error: None,
                }
            }
            Err(e) => {
                let message = e.to_string();
                let now = shared::util::now_millis();
                let next_attempt_at = now + backoff::delay_with_jitter_ms(job.retry_count + 1);
                let status =
                    db::sync_queue::fail_job(&state.pool, job, &message, now, next_attempt_at)
                        .await?;
                tracing::warn!(
                    job_id = job.id,
                    product_id = %job.product_id,
                    operation = job.operation.as_db(),
                    retry_count = job.retry_count + 1,
                    status = status.as_db(),
                    "Sync job failed: {message}"
                );
                summary.failed += 1;
                JobResult {
                    job_id: job.id,
                    product_id: job.product_id.clone(),
                    operation: job.operation,
                    success: false,
                    status,
                    detail: None,
                    error: Some(message),
                }
            }
        };

        summary.processed += 1;
        summary.results.push(result);
    }

    tracing::info!(
        processed = summary.processed,
        successful = summary.successful,
        failed = summary.failed,
        "Sync queue batch finished"
    );
    Ok(summary)
}

/// Enqueue result
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnqueueSummary {
    pub queued: u64,
    /// Out-of-sync products that already had an open job
    pub skipped: u64,
}

/// Queue every out-of-sync product: `create` when a provider id is missing,
/// `update` otherwise. Idempotent — re-running before the queue drains
/// skips products with an open job.
pub async fn queue_all_products(state: &AppState) -> Result<EnqueueSummary, ServiceError> {
    let now = shared::util::now_millis();
    let out_of_sync = db::products::list_out_of_sync(&state.pool).await?;
    let total = out_of_sync.len() as u64;

    let mut create_ids = Vec::new();
    let mut update_ids = Vec::new();
    for product in out_of_sync {
        if product.needs_create() {
            create_ids.push(product.id);
        } else {
            update_ids.push(product.id);
        }
    }

    let queued = db::sync_queue::enqueue_batch(&state.pool, &create_ids, SyncOperation::Create, now)
        .await?
        + db::sync_queue::enqueue_batch(&state.pool, &update_ids, SyncOperation::Update, now)
            .await?;
    let skipped = total - queued;

    tracing::info!(queued, skipped, "Queued out-of-sync products");
    Ok(EnqueueSummary { queued, skipped })
}

/// Queue depth per status, for the admin sync display
pub async fn queue_stats(state: &AppState) -> Result<db::sync_queue::QueueStats, ServiceError> {
    let now = shared::util::now_millis();
    Ok(db::sync_queue::stats(&state.pool, now).await?)
}

/// Remove completed jobs older than `older_than_days`; failed jobs stay
pub async fn cleanup_queue(state: &AppState, older_than_days: u32) -> Result<u64, ServiceError> {
    let cutoff = shared::util::now_millis() - i64::from(older_than_days) * MILLIS_PER_DAY;
    let removed = db::sync_queue::cleanup_completed(&state.pool, cutoff).await?;
    tracing::info!(removed, older_than_days, "Cleaned up completed sync jobs");
    Ok(removed)
}
