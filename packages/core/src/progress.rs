//! Queue position projection.
//!
//! Turns a user's [`Ticket`] and the latest [`QueueStatus`] snapshot into the
//! [`QueueProgress`] view model. The projection is total: a missing snapshot
//! falls back to the position recorded at booking time.

use serde::{Deserialize, Serialize};

use crate::{Appointment, PortalEvent, QueueStatus, Ticket};

/// Assumed service time per patient ahead, in minutes.
///
/// A fixed estimate rather than a measured rate. Override it through
/// [`ProgressPolicy`].
pub const DEFAULT_MINUTES_PER_PATIENT: u32 = 15;

/// Derived progress of a ticket through its queue. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueProgress {
    /// Ticket number currently being served (0 when no live data).
    pub current_serving: u32,
    /// Patients still ahead of the ticket holder.
    pub patients_ahead: u32,
    /// `patients_ahead` times the per-patient estimate.
    pub estimated_wait_minutes: u32,
    /// Fraction in `[0, 1]` of the way from the start of the queue to the ticket.
    pub progress_fraction: f64,
    /// Whether the queue is currently calling tickets.
    pub is_active: bool,
}

impl QueueProgress {
    /// Progress fraction as a whole percentage, for progress bars.
    pub fn percent(&self) -> u8 {
        (self.progress_fraction.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Policy knobs for the projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressPolicy {
    /// Minutes assumed per patient ahead.
    pub minutes_per_patient: u32,
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            minutes_per_patient: DEFAULT_MINUTES_PER_PATIENT,
        }
    }
}

impl ProgressPolicy {
    /// Create a policy with a custom per-patient estimate.
    pub fn with_minutes_per_patient(minutes_per_patient: u32) -> Self {
        Self {
            minutes_per_patient,
        }
    }

    /// Project `ticket` against an optional live snapshot.
    pub fn compute(&self, ticket: &Ticket, status: Option<&QueueStatus>) -> QueueProgress {
        let Some(status) = status else {
            return QueueProgress {
                current_serving: 0,
                patients_ahead: ticket.position_at_booking.saturating_sub(1),
                estimated_wait_minutes: 0,
                progress_fraction: 0.0,
                is_active: false,
            };
        };

        let current_serving = status.current_serving_number;
        let own = ticket.own_ticket_number;
        let patients_ahead = own.saturating_sub(current_serving);
        let is_active = status.is_active();

        let progress_fraction = if is_active && own > 0 {
            (f64::from(current_serving) / f64::from(own)).min(1.0)
        } else {
            0.0
        };

        QueueProgress {
            current_serving,
            patients_ahead,
            estimated_wait_minutes: patients_ahead.saturating_mul(self.minutes_per_patient),
            progress_fraction,
            is_active,
        }
    }
}

/// Project `ticket` using the default policy.
pub fn compute_progress(ticket: &Ticket, status: Option<&QueueStatus>) -> QueueProgress {
    ProgressPolicy::default().compute(ticket, status)
}

/// An appointment paired with its projected progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentProgress {
    pub appointment: Appointment,
    pub progress: QueueProgress,
}

/// Result of one view refresh: each appointment's progress plus whether the
/// snapshot fetch behind it failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub items: Vec<AppointmentProgress>,
    /// Set when the fetch failed. The items then show booking positions.
    pub refresh_error: Option<String>,
}

impl ProgressReport {
    /// Build a report from the event the refresh produced, if any.
    pub fn new(items: Vec<AppointmentProgress>, outcome: Option<&PortalEvent>) -> Self {
        let refresh_error = match outcome {
            Some(PortalEvent::RefreshFailed { error, .. }) => Some(error.clone()),
            _ => None,
        };
        Self {
            items,
            refresh_error,
        }
    }
}
