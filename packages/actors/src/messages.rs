//! Message types for actor communication.

use portal_core::{Appointment, AppointmentProgress, PortalEvent, QueueId, QueueStatus};
use ractor::RpcReplyPort;

use crate::source::SourceResult;

/// Messages for the QueueWatcher.
#[derive(Debug)]
pub enum WatcherMessage {
    /// Timer tick: stop if the view has gone quiet.
    Tick,

    /// Fetch now. The reply carries the event recorded when this refresh's
    /// response was applied, or `None` if it was discarded as stale.
    Refresh {
        reply: Option<RpcReplyPort<Option<PortalEvent>>>,
    },

    /// A fetch finished.
    SnapshotLoaded {
        generation: u64,
        result: SourceResult,
        reply: Option<RpcReplyPort<Option<PortalEvent>>>,
    },

    /// Replace the set of visible queues.
    Watch { queue_ids: Vec<QueueId> },

    /// Project appointments against the cached snapshots.
    Project {
        appointments: Vec<Appointment>,
        reply: RpcReplyPort<Vec<AppointmentProgress>>,
    },

    /// Get the cached snapshot for one queue.
    GetStatus {
        queue_id: QueueId,
        reply: RpcReplyPort<Option<QueueStatus>>,
    },

    /// List every cached snapshot.
    ListStatuses { reply: RpcReplyPort<Vec<QueueStatus>> },
}

/// Error type for watcher operations.
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Failed to spawn watcher: {0}")]
    Spawn(String),

    #[error("Watcher not found: {0}")]
    NotFound(String),

    #[error("Actor error: {0}")]
    Actor(String),
}
