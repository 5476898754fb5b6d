//! Database schema definitions using SurrealQL.

use crate::{DbError, get_db};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema() -> Result<(), DbError> {
    let db = get_db()?;

    tracing::info!("Initializing database schema...");

    // Queue snapshots written by the external queue service
    db.query(QUEUE_STATUS_SCHEMA).await?;

    // Appointments booked by users
    db.query(APPOINTMENT_SCHEMA).await?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Queue status table schema.
///
/// Columns are loosely typed on purpose; rows are validated when read.
const QUEUE_STATUS_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS queue_status SCHEMALESS;

DEFINE FIELD IF NOT EXISTS queue_id ON queue_status TYPE option<string>;
DEFINE FIELD IF NOT EXISTS state ON queue_status TYPE option<string>;
DEFINE FIELD IF NOT EXISTS current_serving_number ON queue_status TYPE option<int>;
DEFINE FIELD IF NOT EXISTS next_number ON queue_status TYPE option<int>;
DEFINE FIELD IF NOT EXISTS last_updated ON queue_status TYPE option<datetime>;

DEFINE INDEX IF NOT EXISTS queue_status_queue ON queue_status FIELDS queue_id UNIQUE;
DEFINE INDEX IF NOT EXISTS queue_status_state ON queue_status FIELDS state;
"#;

/// Appointment table schema.
const APPOINTMENT_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS appointment SCHEMALESS;

DEFINE FIELD IF NOT EXISTS appointment_id ON appointment TYPE option<string>;
DEFINE FIELD IF NOT EXISTS user_id ON appointment TYPE option<string>;
DEFINE FIELD IF NOT EXISTS service_name ON appointment TYPE option<string>;
DEFINE FIELD IF NOT EXISTS queue_id ON appointment TYPE option<string>;
DEFINE FIELD IF NOT EXISTS own_ticket_number ON appointment TYPE option<int>;
DEFINE FIELD IF NOT EXISTS position_at_booking ON appointment TYPE option<int>;
DEFINE FIELD IF NOT EXISTS booked_at ON appointment TYPE option<datetime>;

-- My Appointments lists by user, newest first
DEFINE INDEX IF NOT EXISTS appointment_user ON appointment FIELDS user_id;
DEFINE INDEX IF NOT EXISTS appointment_user_booked ON appointment FIELDS user_id, booked_at;
DEFINE INDEX IF NOT EXISTS appointment_queue ON appointment FIELDS queue_id;
"#;
