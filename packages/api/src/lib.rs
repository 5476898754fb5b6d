//! Server API functions for the city portal.
//!
//! This crate contains all shared fullstack server functions for:
//! - My Appointments (list, live queue progress, manual refresh, release)
//! - Queue status snapshots for the admin board

mod appointments;
mod queues;

#[cfg(feature = "server")]
mod init;

// Re-export all server functions
pub use appointments::*;
pub use queues::*;

#[cfg(feature = "server")]
pub use init::*;

// Re-export core types for convenience
pub use portal_core::{
    Appointment, AppointmentId, AppointmentProgress, ProgressReport, QueueId, QueueProgress,
    QueueState, QueueStatus, Ticket,
};
