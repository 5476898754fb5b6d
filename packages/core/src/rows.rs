//! Loosely-typed backend rows and their validation into domain records.
//!
//! The backend hands back records with nullable fields and signed integers.
//! Rows are checked here, once, so the projection only ever sees well-formed
//! [`QueueStatus`] and [`Appointment`] values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Appointment, AppointmentId, QueueId, QueueState, QueueStatus, Ticket};

/// Reasons a backend row is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid {field}: {value}")]
    InvalidId { field: &'static str, value: String },
    #[error("unknown queue state: {0}")]
    UnknownState(String),
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: i64 },
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, RowError> {
    value.ok_or(RowError::MissingField(field))
}

fn non_negative(value: i64, field: &'static str) -> Result<u32, RowError> {
    if value < 0 {
        return Err(RowError::Negative { field, value });
    }
    u32::try_from(value).map_err(|_| RowError::OutOfRange { field, value })
}

fn positive(value: i64, field: &'static str) -> Result<u32, RowError> {
    if value <= 0 {
        return Err(RowError::NotPositive { field, value });
    }
    u32::try_from(value).map_err(|_| RowError::OutOfRange { field, value })
}

fn queue_id(value: String) -> Result<QueueId, RowError> {
    QueueId::parse(&value).map_err(|_| RowError::InvalidId {
        field: "queue_id",
        value,
    })
}

/// A `queue_status` row as it comes off the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawQueueStatusRow {
    pub queue_id: Option<String>,
    pub state: Option<String>,
    pub current_serving_number: Option<i64>,
    pub next_number: Option<i64>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl TryFrom<RawQueueStatusRow> for QueueStatus {
    type Error = RowError;

    fn try_from(row: RawQueueStatusRow) -> Result<Self, Self::Error> {
        let queue_id = queue_id(require(row.queue_id, "queue_id")?)?;
        let state = require(row.state, "state")?;
        let state: QueueState = state.parse().map_err(|_| RowError::UnknownState(state))?;

        Ok(QueueStatus {
            queue_id,
            state,
            current_serving_number: non_negative(
                require(row.current_serving_number, "current_serving_number")?,
                "current_serving_number",
            )?,
            next_number: non_negative(require(row.next_number, "next_number")?, "next_number")?,
            last_updated: require(row.last_updated, "last_updated")?,
        })
    }
}

impl From<&QueueStatus> for RawQueueStatusRow {
    fn from(status: &QueueStatus) -> Self {
        Self {
            queue_id: Some(status.queue_id.to_string()),
            state: Some(status.state.to_string()),
            current_serving_number: Some(i64::from(status.current_serving_number)),
            next_number: Some(i64::from(status.next_number)),
            last_updated: Some(status.last_updated),
        }
    }
}

/// An `appointment` row as it comes off the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAppointmentRow {
    pub appointment_id: Option<String>,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub queue_id: Option<String>,
    pub own_ticket_number: Option<i64>,
    pub position_at_booking: Option<i64>,
    pub booked_at: Option<DateTime<Utc>>,
}

impl TryFrom<RawAppointmentRow> for Appointment {
    type Error = RowError;

    fn try_from(row: RawAppointmentRow) -> Result<Self, Self::Error> {
        let raw_id = require(row.appointment_id, "appointment_id")?;
        let id = AppointmentId::parse(&raw_id).map_err(|_| RowError::InvalidId {
            field: "appointment_id",
            value: raw_id,
        })?;

        let ticket = Ticket {
            queue_id: queue_id(require(row.queue_id, "queue_id")?)?,
            own_ticket_number: positive(
                require(row.own_ticket_number, "own_ticket_number")?,
                "own_ticket_number",
            )?,
            position_at_booking: positive(
                require(row.position_at_booking, "position_at_booking")?,
                "position_at_booking",
            )?,
        };

        Ok(Appointment {
            id,
            user_id: require(row.user_id, "user_id")?,
            service_name: row.service_name.unwrap_or_default(),
            ticket,
            booked_at: require(row.booked_at, "booked_at")?,
        })
    }
}

impl From<&Appointment> for RawAppointmentRow {
    fn from(appointment: &Appointment) -> Self {
        Self {
            appointment_id: Some(appointment.id.to_string()),
            user_id: Some(appointment.user_id.clone()),
            service_name: Some(appointment.service_name.clone()),
            queue_id: Some(appointment.ticket.queue_id.to_string()),
            own_ticket_number: Some(i64::from(appointment.ticket.own_ticket_number)),
            position_at_booking: Some(i64::from(appointment.ticket.position_at_booking)),
            booked_at: Some(appointment.booked_at),
        }
    }
}

/// Validate a batch of rows, splitting accepted records from rejections.
pub fn validate_rows<R, T>(rows: Vec<R>) -> (Vec<T>, Vec<RowError>)
where
    T: TryFrom<R, Error = RowError>,
{
    let mut accepted = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for row in rows {
        match T::try_from(row) {
            Ok(record) => accepted.push(record),
            Err(e) => rejected.push(e),
        }
    }
    (accepted, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_row(value: serde_json::Value) -> RawQueueStatusRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn well_formed_status_row_is_accepted() {
        let id = QueueId::new();
        let row = status_row(json!({
            "queue_id": id.to_string(),
            "state": "Active",
            "current_serving_number": 3,
            "next_number": 8,
            "last_updated": "2026-01-05T09:30:00Z",
        }));

        let status = QueueStatus::try_from(row).unwrap();
        assert_eq!(status.queue_id, id);
        assert_eq!(status.state, QueueState::Active);
        assert_eq!(status.current_serving_number, 3);
        assert_eq!(status.next_number, 8);
    }

    #[test]
    fn status_row_rejections() {
        let id = QueueId::new().to_string();
        let base = || {
            json!({
                "queue_id": id,
                "state": "active",
                "current_serving_number": 1,
                "next_number": 2,
                "last_updated": "2026-01-05T09:30:00Z",
            })
        };

        let mut missing = base();
        missing.as_object_mut().unwrap().remove("next_number");
        assert_eq!(
            QueueStatus::try_from(status_row(missing)),
            Err(RowError::MissingField("next_number"))
        );

        let mut negative = base();
        negative["current_serving_number"] = json!(-1);
        assert_eq!(
            QueueStatus::try_from(status_row(negative)),
            Err(RowError::Negative {
                field: "current_serving_number",
                value: -1
            })
        );

        let mut unknown = base();
        unknown["state"] = json!("draining");
        assert_eq!(
            QueueStatus::try_from(status_row(unknown)),
            Err(RowError::UnknownState("draining".into()))
        );

        let mut bad_id = base();
        bad_id["queue_id"] = json!("clinic-7");
        assert!(matches!(
            QueueStatus::try_from(status_row(bad_id)),
            Err(RowError::InvalidId { field: "queue_id", .. })
        ));

        let mut huge = base();
        huge["next_number"] = json!(i64::from(u32::MAX) + 1);
        assert!(matches!(
            QueueStatus::try_from(status_row(huge)),
            Err(RowError::OutOfRange { field: "next_number", .. })
        ));
    }

    #[test]
    fn appointment_row_requires_positive_ticket() {
        let appointment = Appointment::new("user-9", "Eye clinic", Ticket::new(QueueId::new(), 12, 4));
        let mut row = RawAppointmentRow::from(&appointment);
        assert_eq!(Appointment::try_from(row.clone()).unwrap(), appointment);

        row.own_ticket_number = Some(0);
        assert_eq!(
            Appointment::try_from(row.clone()),
            Err(RowError::NotPositive {
                field: "own_ticket_number",
                value: 0
            })
        );

        row.own_ticket_number = Some(12);
        row.position_at_booking = None;
        assert_eq!(
            Appointment::try_from(row),
            Err(RowError::MissingField("position_at_booking"))
        );
    }

    #[test]
    fn validate_rows_splits_good_from_bad() {
        let good = RawQueueStatusRow::from(&QueueStatus::new(QueueId::new()));
        let bad = RawQueueStatusRow::default();

        let (accepted, rejected): (Vec<QueueStatus>, _) = validate_rows(vec![good, bad]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected, vec![RowError::MissingField("queue_id")]);
    }
}
