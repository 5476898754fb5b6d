//! Event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::QueueId;

/// Notifications emitted by queue watchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PortalEvent {
    /// A refresh landed and replaced the watcher's snapshots.
    SnapshotRefreshed {
        watcher: String,
        queues: Vec<QueueId>,
        timestamp: DateTime<Utc>,
    },
    /// A refresh failed. Views keep rendering booking positions.
    RefreshFailed {
        watcher: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
    /// A watcher was torn down.
    WatcherStopped {
        watcher: String,
        timestamp: DateTime<Utc>,
    },
}

impl PortalEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PortalEvent::SnapshotRefreshed { timestamp, .. } => *timestamp,
            PortalEvent::RefreshFailed { timestamp, .. } => *timestamp,
            PortalEvent::WatcherStopped { timestamp, .. } => *timestamp,
        }
    }

    /// Name of the watcher that emitted the event.
    pub fn watcher(&self) -> &str {
        match self {
            PortalEvent::SnapshotRefreshed { watcher, .. } => watcher,
            PortalEvent::RefreshFailed { watcher, .. } => watcher,
            PortalEvent::WatcherStopped { watcher, .. } => watcher,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            PortalEvent::SnapshotRefreshed {
                watcher, queues, ..
            } => format!("Watcher {} refreshed {} queue(s)", watcher, queues.len()),
            PortalEvent::RefreshFailed { watcher, error, .. } => {
                format!("Watcher {} refresh failed: {}", watcher, error)
            }
            PortalEvent::WatcherStopped { watcher, .. } => format!("Watcher {} stopped", watcher),
        }
    }
}
