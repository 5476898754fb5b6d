//! Service queue types as reported by the backend.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a service queue (one per clinic counter or desk).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueId(pub Ulid);

impl QueueId {
    /// Create a new unique queue ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a queue ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for QueueId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational state of a service queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    /// Tickets are being called.
    #[default]
    Active,
    /// Temporarily halted; counters are frozen.
    Paused,
    /// Closed for the day.
    Closed,
}

impl QueueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueState::Active => "active",
            QueueState::Paused => "paused",
            QueueState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for QueueState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a queue state string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown queue state: {0}")]
pub struct UnknownQueueState(pub String);

impl FromStr for QueueState {
    type Err = UnknownQueueState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(QueueState::Active),
            "paused" => Ok(QueueState::Paused),
            "closed" => Ok(QueueState::Closed),
            _ => Err(UnknownQueueState(s.to_string())),
        }
    }
}

/// A point-in-time snapshot of a queue's cursor.
///
/// The backend owns and advances these counters; the portal only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    /// The queue this snapshot describes.
    pub queue_id: QueueId,
    /// Current operational state.
    pub state: QueueState,
    /// Ticket number currently being served.
    pub current_serving_number: u32,
    /// Next ticket number the backend will issue.
    pub next_number: u32,
    /// When the backend last touched the counters.
    pub last_updated: DateTime<Utc>,
}

impl QueueStatus {
    /// Create an active snapshot with both counters at zero.
    pub fn new(queue_id: QueueId) -> Self {
        Self {
            queue_id,
            state: QueueState::Active,
            current_serving_number: 0,
            next_number: 0,
            last_updated: Utc::now(),
        }
    }

    /// Set the queue state.
    pub fn with_state(mut self, state: QueueState) -> Self {
        self.state = state;
        self
    }

    /// Set the current-serving and next-number counters.
    pub fn with_counters(mut self, current_serving_number: u32, next_number: u32) -> Self {
        self.current_serving_number = current_serving_number;
        self.next_number = next_number;
        self
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, QueueState::Active)
    }

    /// Tickets issued but not yet called.
    pub fn waiting(&self) -> u32 {
        self.next_number
            .saturating_sub(self.current_serving_number)
            .saturating_sub(1)
    }
}
