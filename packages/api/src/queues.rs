//! Queue status server functions.

use dioxus::prelude::*;
use portal_core::QueueStatus;

/// List every queue snapshot, for the admin queue board.
#[get("/api/queues")]
pub async fn list_queue_statuses() -> Result<Vec<QueueStatus>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::QueueStatusRepository;

        crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

        QueueStatusRepository::list_all()
            .await
            .map_err(|e| ServerFnError::new(format!("Failed to load queues: {}", e)))
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Get one queue's snapshot.
#[get("/api/queues/:id")]
pub async fn get_queue_status(id: String) -> Result<Option<QueueStatus>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::DbError;
        use db::repositories::QueueStatusRepository;
        use portal_core::QueueId;

        crate::ensure_initialized()
            .await
            .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

        let queue_id = QueueId::parse(&id)
            .map_err(|e| ServerFnError::new(format!("Invalid queue ID: {}", e)))?;

        match QueueStatusRepository::get(queue_id).await {
            Ok(status) => Ok(Some(status)),
            Err(DbError::NotFound(_)) => Ok(None),
            Err(e) => Err(ServerFnError::new(format!("Failed to load queue: {}", e))),
        }
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
