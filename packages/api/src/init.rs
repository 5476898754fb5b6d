//! Server initialization for the city portal.

use actors::global_watchers;
use db::repositories::{AppointmentRepository, QueueStatusRepository};
use db::{DbConfig, DbError, init as init_db};
use portal_core::{Appointment, PortalEvent, QueueId, QueueStatus, Ticket};
use tokio::sync::OnceCell;
use tokio::sync::broadcast::{self, error::RecvError};

/// User whose appointments are seeded into an empty in-memory database.
pub const DEMO_USER: &str = "demo";

static INITIALIZED: OnceCell<()> = OnceCell::const_new();

/// Initialize the portal backend.
///
/// This should be called once at server startup before handling requests.
/// Demo data is only seeded into an empty in-memory store.
pub async fn init_portal() -> Result<(), DbError> {
    tracing::info!("Initializing city portal...");

    let config = DbConfig::from_env();
    let throwaway = config.is_memory();
    init_db(config).await?;

    if throwaway && QueueStatusRepository::list_all().await?.is_empty() {
        tracing::info!("Seeding demo queues...");
        seed_demo().await?;
    }

    tokio::spawn(log_watcher_events(global_watchers().subscribe()));

    tracing::info!("City portal initialized");
    Ok(())
}

/// Log what the queue watchers report until the registry goes away.
async fn log_watcher_events(mut rx: broadcast::Receiver<PortalEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => tracing::debug!("{}", event.description()),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Watcher event log skipped {} event(s)", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

/// Run [`init_portal`] once; later calls wait for the first to finish.
pub async fn ensure_initialized() -> Result<(), DbError> {
    INITIALIZED.get_or_try_init(init_portal).await?;
    Ok(())
}

async fn seed_demo() -> Result<(), DbError> {
    let vaccination = QueueId::new();
    let lab = QueueId::new();

    QueueStatusRepository::upsert(&QueueStatus::new(vaccination).with_counters(12, 21)).await?;
    QueueStatusRepository::upsert(&QueueStatus::new(lab).with_counters(4, 9)).await?;

    for appointment in [
        Appointment::new(DEMO_USER, "Vaccination", Ticket::new(vaccination, 17, 6)),
        Appointment::new(DEMO_USER, "Blood test", Ticket::new(lab, 6, 3)),
    ] {
        let created = AppointmentRepository::create(&appointment).await?;
        tracing::info!("Created demo appointment: {}", created.id);
    }

    Ok(())
}
