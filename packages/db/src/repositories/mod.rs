//! Repository implementations for database operations.

mod appointment_repo;
mod queue_status_repo;

pub use appointment_repo::AppointmentRepository;
pub use queue_status_repo::QueueStatusRepository;

use portal_core::{RowError, validate_rows};

/// Validate rows read from `table`, logging and dropping malformed ones.
fn keep_valid<R, T>(table: &str, rows: Vec<R>) -> Vec<T>
where
    T: TryFrom<R, Error = RowError>,
{
    let (accepted, rejected) = validate_rows(rows);
    for error in &rejected {
        tracing::warn!("Skipping malformed {} row: {}", table, error);
    }
    accepted
}
