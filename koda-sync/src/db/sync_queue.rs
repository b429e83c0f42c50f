//! Sync queue database operations
//!
//! Claiming is an atomic conditional update over `FOR UPDATE SKIP LOCKED`,
//! so overlapping processor invocations never pick up the same job. Outcome
//! writes pair the job row and the product row in one transaction.

use serde::Serialize;
use shared::models::sync_job::{MAX_RETRY_COUNT, SyncJob, SyncJobStatus, SyncOperation};
use sqlx::PgPool;

use super::BoxError;

#[derive(Debug, Clone, sqlx::FromRow)]
struct SyncJobRow {
    id: i64,
    product_id: String,
    operation_type: String,
    status: String,
    retry_count: i32,
    error_message: Option<String>,
    metadata: serde_json::Value,
    created_at: i64,
    processed_at: Option<i64>,
    next_attempt_at: i64,
    claimed_at: Option<i64>,
}

impl TryFrom<SyncJobRow> for SyncJob {
    type Error = BoxError;

    fn try_from(row: SyncJobRow) -> Result<Self, Self::Error> {
        let operation = SyncOperation::parse(&row.operation_type)
            .ok_or_else(|| format!("unknown operation_type {:?}", row.operation_type))?;
        let status = SyncJobStatus::parse(&row.status)
            .ok_or_else(|| format!("unknown status {:?}", row.status))?;
        Ok(SyncJob {
            id: row.id,
            product_id: row.product_id,
            operation,
            status,
            retry_count: row.retry_count,
            error_message: row.error_message,
            metadata: row.metadata,
            created_at: row.created_at,
            processed_at: row.processed_at,
            next_attempt_at: row.next_attempt_at,
            claimed_at: row.claimed_at,
        })
    }
}

const JOB_COLUMNS: &str = "id, product_id, operation_type, status, retry_count, \
     error_message, metadata, created_at, processed_at, next_attempt_at, claimed_at";

/// Atomically claim up to `limit` runnable jobs, marking them processing.
///
/// Runnable: `pending`/`retrying` with `next_attempt_at` due and retries
/// left, or a `processing` row whose claim is older than `stale_after_ms`
/// (its invocation died mid-batch). Oldest first. `SKIP LOCKED` keeps
/// concurrent invocations from double-claiming.
pub async fn claim_batch(
    pool: &PgPool,
    limit: i64,
    now: i64,
    stale_after_ms: i64,
) -> Result<Vec<SyncJob>, BoxError> {
    let rows: Vec<SyncJobRow> = sqlx::query_as(&format!(
        "UPDATE sync_queue SET status = 'processing', claimed_at = $3 \
         WHERE id IN ( \
             SELECT id FROM sync_queue \
             WHERE retry_count < $2 \
               AND ((status IN ('pending', 'retrying') AND next_attempt_at <= $3) \
                 OR (status = 'processing' AND claimed_at <= $4)) \
             ORDER BY created_at \
             LIMIT $1 \
             FOR UPDATE SKIP LOCKED \
         ) \
         RETURNING {JOB_COLUMNS}"
    ))
    .bind(limit)
    .bind(MAX_RETRY_COUNT)
    .bind(now)
    .bind(now - stale_after_ms)
    .fetch_all(pool)
    .await?;

    let mut jobs = Vec::with_capacity(rows.len());
    for row in rows {
        let row_id = row.id;
        match SyncJob::try_from(row) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                // Park the malformed row so it never blocks the queue
                tracing::warn!(job_id = row_id, "Unreadable sync job, marking failed: {e}");
                sqlx::query(
                    "UPDATE sync_queue SET status = 'failed', error_message = $2, \
                     processed_at = $3 WHERE id = $1",
                )
                .bind(row_id)
                .bind(e.to_string())
                .bind(now)
                .execute(pool)
                .await?;
            }
        }
    }

    // RETURNING does not preserve the subquery order
    jobs.sort_by_key(|j| (j.created_at, j.id));
    Ok(jobs)
}

/// Mark a job completed; when provider ids are present, stamp them on the
/// product row together with `sync_status = 'synced'` in the same
/// transaction.
pub async fn complete_job(
    pool: &PgPool,
    job: &SyncJob,
    provider_ids: Option<(&str, &str)>,
    now: i64,
) -> Result<(), BoxError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE sync_queue SET status = 'completed', processed_at = $2, \
         error_message = NULL WHERE id = $1",
    )
    .bind(job.id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if let Some((stripe_product_id, stripe_price_id)) = provider_ids {
        sqlx::query(
            "UPDATE products SET stripe_product_id = $2, stripe_price_id = $3, \
             sync_status = 'synced', last_synced_at = $4 WHERE id = $1",
        )
        .bind(&job.product_id)
        .bind(stripe_product_id)
        .bind(stripe_price_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Record a job failure: bump the retry counter, park the job as `failed`
/// once the budget is spent (marking the product failed in the same
/// transaction), otherwise schedule the retry at `next_attempt_at`.
///
/// Returns the status the job ended up in.
pub async fn fail_job(
    pool: &PgPool,
    job: &SyncJob,
    error: &str,
    now: i64,
    next_attempt_at: i64,
) -> Result<SyncJobStatus, BoxError> {
    let new_count = job.retry_count + 1;
    let exhausted = new_count >= MAX_RETRY_COUNT;

    let mut tx = pool.begin().await?;

    if exhausted {
        sqlx::query(
            "UPDATE sync_queue SET status = 'failed', retry_count = $2, \
             error_message = $3, processed_at = $4 WHERE id = $1",
        )
        .bind(job.id)
        .bind(new_count)
        .bind(error)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE products SET sync_status = 'failed' WHERE id = $1")
            .bind(&job.product_id)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query(
            "UPDATE sync_queue SET status = 'retrying', retry_count = $2, \
             error_message = $3, next_attempt_at = $4 WHERE id = $1",
        )
        .bind(job.id)
        .bind(new_count)
        .bind(error)
        .bind(next_attempt_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(if exhausted {
        SyncJobStatus::Failed
    } else {
        SyncJobStatus::Retrying
    })
}

/// Insert one pending job per (product, operation), skipping products that
/// already have an open job for that operation (partial unique index).
///
/// Returns the number of rows actually inserted.
pub async fn enqueue_batch(
    pool: &PgPool,
    product_ids: &[String],
    operation: SyncOperation,
    now: i64,
) -> Result<u64, BoxError> {
    if product_ids.is_empty() {
        return Ok(0);
    }

    let operations: Vec<String> = product_ids
        .iter()
        .map(|_| operation.as_db().to_string())
        .collect();
    let result = sqlx::query(
        "INSERT INTO sync_queue (product_id, operation_type, status, created_at, next_attempt_at) \
         SELECT u.product_id, u.operation_type, 'pending', $3, $3 \
         FROM UNNEST($1::text[], $2::text[]) AS u(product_id, operation_type) \
         ON CONFLICT (product_id, operation_type) \
            WHERE status IN ('pending', 'processing', 'retrying') \
         DO NOTHING",
    )
    .bind(product_ids)
    .bind(&operations)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Queue depth per status, for the admin sync display
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub completed: i64,
    pub retrying: i64,
    pub failed: i64,
    pub total: i64,
    /// Age of the oldest pending job in millis, if any
    pub oldest_pending_age_ms: Option<i64>,
}

/// Aggregate queue counts per status plus the oldest pending age
pub async fn stats(pool: &PgPool, now: i64) -> Result<QueueStats, BoxError> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM sync_queue GROUP BY status")
            .fetch_all(pool)
            .await?;

    let mut stats = QueueStats::default();
    for (status, count) in rows {
        stats.total += count;
        match status.as_str() {
            "pending" => stats.pending = count,
            "processing" => stats.processing = count,
            "completed" => stats.completed = count,
            "retrying" => stats.retrying = count,
            "failed" => stats.failed = count,
            other => tracing::warn!(status = other, count, "Unknown status in sync queue"),
        }
    }

    let oldest: Option<(i64,)> = sqlx::query_as(
        "SELECT MIN(created_at) FROM sync_queue WHERE status = 'pending' HAVING MIN(created_at) IS NOT NULL",
    )
    .fetch_optional(pool)
    .await?;
    stats.oldest_pending_age_ms = oldest.map(|(created_at,)| now - created_at);

    Ok(stats)
}

/// Drop completed jobs older than the cutoff. Failed jobs stay — they are
/// the manual-intervention ledger.
pub async fn cleanup_completed(pool: &PgPool, cutoff: i64) -> Result<u64, BoxError> {
    let result =
        sqlx::query("DELETE FROM sync_queue WHERE status = 'completed' AND processed_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}
