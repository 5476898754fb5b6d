//! Appointment and ticket types for a user's bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::QueueId;

/// Unique identifier for an appointment, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppointmentId(pub Ulid);

impl AppointmentId {
    /// Create a new unique appointment ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse an appointment ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for AppointmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's place in a service queue, fixed at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    /// The queue the ticket was issued for.
    pub queue_id: QueueId,
    /// Sequential number assigned at booking. Always positive once validated.
    pub own_ticket_number: u32,
    /// Position in line recorded at booking. Always positive once validated.
    pub position_at_booking: u32,
}

impl Ticket {
    pub fn new(queue_id: QueueId, own_ticket_number: u32, position_at_booking: u32) -> Self {
        Self {
            queue_id,
            own_ticket_number,
            position_at_booking,
        }
    }
}

/// A booked appointment as listed in the "My Appointments" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Unique identifier for this appointment.
    pub id: AppointmentId,
    /// Identifier issued by the hosted auth provider.
    pub user_id: String,
    /// Display name of the clinic or desk.
    pub service_name: String,
    /// Queue ticket for this booking.
    pub ticket: Ticket,
    /// When the booking was made.
    pub booked_at: DateTime<Utc>,
}

impl Appointment {
    /// Create a new appointment booked now.
    pub fn new(user_id: impl Into<String>, service_name: impl Into<String>, ticket: Ticket) -> Self {
        Self {
            id: AppointmentId::new(),
            user_id: user_id.into(),
            service_name: service_name.into(),
            ticket,
            booked_at: Utc::now(),
        }
    }

    /// Override the booking timestamp.
    pub fn with_booked_at(mut self, booked_at: DateTime<Utc>) -> Self {
        self.booked_at = booked_at;
        self
    }

    pub fn queue_id(&self) -> QueueId {
        self.ticket.queue_id
    }
}
