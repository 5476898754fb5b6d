//! Core domain types for the city portal's queue tracking.
//!
//! This crate contains shared types used across all packages:
//! - QueueStatus and Ticket, the backend-owned inputs
//! - QueueProgress and the projection that derives it
//! - SnapshotCache, the per-view store of the latest snapshots
//! - Raw row validation at the backend boundary
//! - Events for real-time updates

mod appointment;
mod events;
mod progress;
mod queue;
pub mod rows;
mod snapshot;

pub use appointment::{Appointment, AppointmentId, Ticket};
pub use events::PortalEvent;
pub use progress::{
    AppointmentProgress, DEFAULT_MINUTES_PER_PATIENT, ProgressPolicy, ProgressReport, QueueProgress,
    compute_progress,
};
pub use queue::{QueueId, QueueState, QueueStatus, UnknownQueueState};
pub use rows::{RawAppointmentRow, RawQueueStatusRow, RowError, validate_rows};
pub use snapshot::SnapshotCache;
