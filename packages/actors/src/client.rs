//! Request/reply helpers for talking to a running watcher.

use portal_core::{Appointment, AppointmentProgress, PortalEvent, QueueId, QueueStatus};
use ractor::ActorRef;

use crate::messages::{WatcherError, WatcherMessage};

fn send_failed(e: impl std::fmt::Display) -> WatcherError {
    WatcherError::Actor(format!("Failed to send message: {}", e))
}

fn no_reply() -> WatcherError {
    WatcherError::Actor("Failed to receive response".into())
}

/// Refresh now and wait until the response has been applied.
///
/// Returns the resulting `SnapshotRefreshed` or `RefreshFailed` event, or
/// `None` when a newer queue set made the response stale.
pub async fn refresh(
    watcher: &ActorRef<WatcherMessage>,
) -> Result<Option<PortalEvent>, WatcherError> {
    let (tx, rx) = ractor::concurrency::oneshot();
    watcher
        .send_message(WatcherMessage::Refresh {
            reply: Some(tx.into()),
        })
        .map_err(send_failed)?;

    rx.await.map_err(|_| no_reply())
}

/// Change the queues a watcher polls.
pub fn watch(
    watcher: &ActorRef<WatcherMessage>,
    queue_ids: Vec<QueueId>,
) -> Result<(), WatcherError> {
    watcher
        .send_message(WatcherMessage::Watch { queue_ids })
        .map_err(send_failed)
}

/// Project appointments against the watcher's cached snapshots.
pub async fn project(
    watcher: &ActorRef<WatcherMessage>,
    appointments: Vec<Appointment>,
) -> Result<Vec<AppointmentProgress>, WatcherError> {
    let (tx, rx) = ractor::concurrency::oneshot();
    watcher
        .send_message(WatcherMessage::Project {
            appointments,
            reply: tx.into(),
        })
        .map_err(send_failed)?;

    rx.await.map_err(|_| no_reply())
}

/// The cached snapshot for one queue, if any.
pub async fn cached_status(
    watcher: &ActorRef<WatcherMessage>,
    queue_id: QueueId,
) -> Result<Option<QueueStatus>, WatcherError> {
    let (tx, rx) = ractor::concurrency::oneshot();
    watcher
        .send_message(WatcherMessage::GetStatus {
            queue_id,
            reply: tx.into(),
        })
        .map_err(send_failed)?;

    rx.await.map_err(|_| no_reply())
}

/// Every cached snapshot, ordered by queue ID.
pub async fn cached_statuses(
    watcher: &ActorRef<WatcherMessage>,
) -> Result<Vec<QueueStatus>, WatcherError> {
    let (tx, rx) = ractor::concurrency::oneshot();
    watcher
        .send_message(WatcherMessage::ListStatuses { reply: tx.into() })
        .map_err(send_failed)?;

    rx.await.map_err(|_| no_reply())
}
