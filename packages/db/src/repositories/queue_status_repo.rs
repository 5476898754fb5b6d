//! Queue status repository.

use portal_core::{QueueId, QueueState, QueueStatus, RawQueueStatusRow};

use super::keep_valid;
use crate::query::{Direction, RowQuery};
use crate::{DbError, get_db};

/// Columns selected for a raw status row. Leaves out the record id.
const STATUS_COLUMNS: &str = "queue_id, state, current_serving_number, next_number, last_updated";

/// Repository for queue status snapshots.
pub struct QueueStatusRepository;

impl QueueStatusRepository {
    /// Insert or overwrite the snapshot for a queue.
    pub async fn upsert(status: &QueueStatus) -> Result<QueueStatus, DbError> {
        let db = get_db()?;

        let query = format!(
            "UPSERT type::thing('queue_status', $queue_id) CONTENT {{ \
                queue_id: $queue_id, \
                state: $state, \
                current_serving_number: $current_serving_number, \
                next_number: $next_number, \
                last_updated: <datetime>$last_updated \
            }} RETURN {}",
            STATUS_COLUMNS
        );

        let mut result = db
            .query(&query)
            .bind(("queue_id", status.queue_id.to_string()))
            .bind(("state", status.state.to_string()))
            .bind(("current_serving_number", i64::from(status.current_serving_number)))
            .bind(("next_number", i64::from(status.next_number)))
            .bind(("last_updated", status.last_updated.to_rfc3339()))
            .await?;

        let records: Vec<RawQueueStatusRow> = result.take(0)?;

        let row = records
            .into_iter()
            .next()
            .ok_or_else(|| DbError::Query("Failed to upsert queue status".into()))?;
        Ok(QueueStatus::try_from(row)?)
    }

    /// Get the snapshot for one queue.
    pub async fn get(queue_id: QueueId) -> Result<QueueStatus, DbError> {
        let db = get_db()?;

        let mut result = db
            .query(format!(
                "SELECT {} FROM type::thing('queue_status', $queue_id)",
                STATUS_COLUMNS
            ))
            .bind(("queue_id", queue_id.to_string()))
            .await?;

        let records: Vec<RawQueueStatusRow> = result.take(0)?;

        let row = records
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound(format!("Queue status not found: {}", queue_id)))?;
        Ok(QueueStatus::try_from(row)?)
    }

    /// List snapshots matching a generic query. Malformed rows are skipped.
    pub async fn list(query: RowQuery) -> Result<Vec<QueueStatus>, DbError> {
        let db = get_db()?;
        let (statement, bindings) = query.build("queue_status", STATUS_COLUMNS)?;

        let mut request = db.query(&statement);
        for binding in bindings {
            request = request.bind(binding);
        }

        let mut response = request.await?;
        let records: Vec<RawQueueStatusRow> = response.take(0)?;

        Ok(keep_valid("queue_status", records))
    }

    /// List every snapshot, ordered by queue ID.
    pub async fn list_all() -> Result<Vec<QueueStatus>, DbError> {
        Self::list(RowQuery::new().order_by("queue_id", Direction::Ascending)).await
    }

    /// List snapshots in a given state.
    pub async fn list_by_state(state: QueueState) -> Result<Vec<QueueStatus>, DbError> {
        Self::list(
            RowQuery::new()
                .eq("state", state.as_str())
                .order_by("queue_id", Direction::Ascending),
        )
        .await
    }

    /// Fetch snapshots for a set of queues. Unknown queues are simply absent.
    pub async fn list_for_queues(queue_ids: &[QueueId]) -> Result<Vec<QueueStatus>, DbError> {
        if queue_ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = get_db()?;
        let ids: Vec<String> = queue_ids.iter().map(|id| id.to_string()).collect();

        let mut result = db
            .query(format!(
                "SELECT {} FROM queue_status WHERE queue_id IN $ids",
                STATUS_COLUMNS
            ))
            .bind(("ids", ids))
            .await?;

        let records: Vec<RawQueueStatusRow> = result.take(0)?;

        Ok(keep_valid("queue_status", records))
    }

    /// Delete the snapshot for a queue.
    pub async fn delete(queue_id: QueueId) -> Result<(), DbError> {
        let db = get_db()?;

        db.query("DELETE type::thing('queue_status', $queue_id)")
            .bind(("queue_id", queue_id.to_string()))
            .await?
            .check()?;

        Ok(())
    }
}
