//! Appointment repository for CRUD operations.

use portal_core::{Appointment, AppointmentId, RawAppointmentRow};

use super::keep_valid;
use crate::query::{Direction, RowQuery};
use crate::{DbError, get_db};

const APPOINTMENT_COLUMNS: &str = "appointment_id, user_id, service_name, queue_id, \
    own_ticket_number, position_at_booking, booked_at";

/// Repository for appointment persistence operations.
pub struct AppointmentRepository;

impl AppointmentRepository {
    /// Create a new appointment in the database.
    pub async fn create(appointment: &Appointment) -> Result<Appointment, DbError> {
        let db = get_db()?;

        let query = format!(
            "CREATE type::thing('appointment', $appointment_id) CONTENT {{ \
                appointment_id: $appointment_id, \
                user_id: $user_id, \
                service_name: $service_name, \
                queue_id: $queue_id, \
                own_ticket_number: $own_ticket_number, \
                position_at_booking: $position_at_booking, \
                booked_at: <datetime>$booked_at \
            }} RETURN {}",
            APPOINTMENT_COLUMNS
        );

        let mut result = db
            .query(&query)
            .bind(("appointment_id", appointment.id.to_string()))
            .bind(("user_id", appointment.user_id.clone()))
            .bind(("service_name", appointment.service_name.clone()))
            .bind(("queue_id", appointment.ticket.queue_id.to_string()))
            .bind((
                "own_ticket_number",
                i64::from(appointment.ticket.own_ticket_number),
            ))
            .bind((
                "position_at_booking",
                i64::from(appointment.ticket.position_at_booking),
            ))
            .bind(("booked_at", appointment.booked_at.to_rfc3339()))
            .await?;

        let records: Vec<RawAppointmentRow> = result.take(0)?;

        let row = records
            .into_iter()
            .next()
            .ok_or_else(|| DbError::Query("Failed to create appointment".into()))?;
        Ok(Appointment::try_from(row)?)
    }

    /// Get an appointment by ID.
    pub async fn get(id: AppointmentId) -> Result<Appointment, DbError> {
        let db = get_db()?;

        let mut result = db
            .query(format!(
                "SELECT {} FROM type::thing('appointment', $appointment_id)",
                APPOINTMENT_COLUMNS
            ))
            .bind(("appointment_id", id.to_string()))
            .await?;

        let records: Vec<RawAppointmentRow> = result.take(0)?;

        let row = records
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound(format!("Appointment not found: {}", id)))?;
        Ok(Appointment::try_from(row)?)
    }

    /// List appointments matching a generic query. Malformed rows are skipped.
    pub async fn list(query: RowQuery) -> Result<Vec<Appointment>, DbError> {
        let db = get_db()?;
        let (statement, bindings) = query.build("appointment", APPOINTMENT_COLUMNS)?;

        let mut request = db.query(&statement);
        for binding in bindings {
            request = request.bind(binding);
        }

        let mut response = request.await?;
        let records: Vec<RawAppointmentRow> = response.take(0)?;

        Ok(keep_valid("appointment", records))
    }

    /// A user's appointments, newest booking first.
    pub async fn list_for_user(user_id: &str) -> Result<Vec<Appointment>, DbError> {
        Self::list(
            RowQuery::new()
                .eq("user_id", user_id)
                .order_by("booked_at", Direction::Descending),
        )
        .await
    }

    /// Delete an appointment.
    pub async fn delete(id: AppointmentId) -> Result<(), DbError> {
        let db = get_db()?;

        db.query("DELETE type::thing('appointment', $appointment_id)")
            .bind(("appointment_id", id.to_string()))
            .await?
            .check()?;

        Ok(())
    }
}
