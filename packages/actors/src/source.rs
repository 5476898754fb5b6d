//! Snapshot sources the watcher polls.

use portal_core::{QueueId, QueueStatus};
use std::future::Future;
use std::pin::Pin;

/// Error from a snapshot fetch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("query failed: {0}")]
    Query(String),
}

impl From<db::DbError> for SourceError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotInitialized | db::DbError::Connection(_) => {
                SourceError::Unavailable(e.to_string())
            }
            other => SourceError::Query(other.to_string()),
        }
    }
}

/// Result type for snapshot fetches.
pub type SourceResult = Result<Vec<QueueStatus>, SourceError>;

/// Future type for async snapshot fetches.
pub type SourceFuture = Pin<Box<dyn Future<Output = SourceResult> + Send>>;

/// Something that can read the latest snapshots for a set of queues.
///
/// Queues the source knows nothing about are left out of the result.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self, queue_ids: Vec<QueueId>) -> SourceFuture;
}

/// Reads snapshots from the portal database.
#[derive(Debug, Default, Clone, Copy)]
pub struct DbSnapshotSource;

impl SnapshotSource for DbSnapshotSource {
    fn fetch(&self, queue_ids: Vec<QueueId>) -> SourceFuture {
        Box::pin(async move {
            let statuses =
                db::repositories::QueueStatusRepository::list_for_queues(&queue_ids).await?;
            Ok(statuses)
        })
    }
}

/// A closure-backed source.
pub struct FnSource<F>
where
    F: Fn(Vec<QueueId>) -> SourceFuture + Send + Sync + 'static,
{
    fetch: F,
}

impl<F> FnSource<F>
where
    F: Fn(Vec<QueueId>) -> SourceFuture + Send + Sync + 'static,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> SnapshotSource for FnSource<F>
where
    F: Fn(Vec<QueueId>) -> SourceFuture + Send + Sync + 'static,
{
    fn fetch(&self, queue_ids: Vec<QueueId>) -> SourceFuture {
        (self.fetch)(queue_ids)
    }
}
