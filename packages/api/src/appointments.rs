//! My Appointments server functions.
//!
//! Each open My Appointments page is backed by one queue watcher, named after
//! the user. The page refreshes through it every 30 seconds; a watcher that
//! stops hearing from its page stops itself.

use dioxus::prelude::*;
use portal_core::{Appointment, AppointmentProgress, ProgressReport};

/// List the user's appointments, newest first.
#[get("/api/appointments/:user_id")]
pub async fn list_my_appointments(user_id: String) -> Result<Vec<Appointment>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

        server::load_appointments(&user_id).await
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Queue progress for each of the user's appointments, without fetching anew.
///
/// Projects from the page's watcher when one is running, otherwise from a
/// single read of the current snapshots. Never starts a watcher.
#[get("/api/appointments/:user_id/progress")]
pub async fn my_queue_progress(
    user_id: String,
) -> Result<Vec<AppointmentProgress>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use actors::{client, global_watchers};

        crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

        let appointments = server::load_appointments(&user_id).await?;
        match global_watchers().get(&user_id) {
            Some(watcher) => client::project(&watcher, appointments)
                .await
                .map_err(server::watcher_error),
            None => Ok(server::project_once(&appointments).await),
        }
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Re-fetch the user's queue snapshots and return the new projection.
///
/// Called by the page on every refresh tick and on manual refresh. A failed
/// fetch is reported in `refresh_error` and the items fall back to booking
/// positions.
#[post("/api/appointments/:user_id/refresh")]
pub async fn refresh_my_queues(user_id: String) -> Result<ProgressReport, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use actors::client;

        crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

        let appointments = server::load_appointments(&user_id).await?;
        let Some(watcher) = server::watch_appointments(&user_id, &appointments).await? else {
            return Ok(ProgressReport::default());
        };

        let outcome = client::refresh(&watcher)
            .await
            .map_err(server::watcher_error)?;
        let items = client::project(&watcher, appointments)
            .await
            .map_err(server::watcher_error)?;

        Ok(ProgressReport::new(items, outcome.as_ref()))
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Stop the user's watcher when their page goes away.
#[post("/api/appointments/:user_id/release")]
pub async fn release_queue_watch(user_id: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use actors::{WatcherError, global_watchers};

        match global_watchers().stop(&user_id).await {
            Ok(()) | Err(WatcherError::NotFound(_)) => Ok(()),
            Err(e) => Err(server::watcher_error(e)),
        }
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actors::{
        ActorRef, DbSnapshotSource, SnapshotSource, WatcherArgs, WatcherConfig, WatcherError,
        WatcherMessage, global_watchers,
    };
    use db::repositories::AppointmentRepository;
    use dioxus::prelude::ServerFnError;
    use portal_core::{Appointment, AppointmentProgress, QueueId, SnapshotCache};

    pub fn watcher_error(e: WatcherError) -> ServerFnError {
        ServerFnError::new(format!("Queue watcher error: {}", e))
    }

    pub async fn load_appointments(user_id: &str) -> Result<Vec<Appointment>, ServerFnError> {
        AppointmentRepository::list_for_user(user_id)
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to load appointments: {}", e)))
    }

    /// Distinct queues in booking order.
    fn queue_ids(appointments: &[Appointment]) -> Vec<QueueId> {
        let mut ids: Vec<QueueId> = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let id = appointment.queue_id();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Get or start the user's watcher and point it at their appointment
    /// queues. Users without appointments get no watcher.
    pub async fn watch_appointments(
        user_id: &str,
        appointments: &[Appointment],
    ) -> Result<Option<ActorRef<WatcherMessage>>, ServerFnError> {
        global_watchers()
            .watch(user_id, queue_ids(appointments), || {
                WatcherArgs::new(user_id, Arc::new(DbSnapshotSource))
                    .with_config(WatcherConfig::from_env())
            })
            .await
            .map_err(watcher_error)
    }

    /// Project against one direct read of the snapshots. A failed read counts
    /// as no snapshot.
    pub async fn project_once(appointments: &[Appointment]) -> Vec<AppointmentProgress> {
        let ids = queue_ids(appointments);
        let statuses = if ids.is_empty() {
            Vec::new()
        } else {
            DbSnapshotSource.fetch(ids).await.unwrap_or_else(|e| {
                tracing::warn!("Queue snapshot read failed: {}", e);
                Vec::new()
            })
        };

        let mut cache = SnapshotCache::new();
        let generation = cache.begin();
        cache.apply(generation, statuses);
        cache.project(appointments, &WatcherConfig::from_env().policy)
    }
}
