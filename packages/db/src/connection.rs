//! Database connection management with lazy initialization.

use std::sync::LazyLock;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Global database instance using lazy initialization.
static DB: LazyLock<OnceCell<Surreal<Any>>> = LazyLock::new(OnceCell::new);

/// Database connection wrapper.
pub type Database = Surreal<Any>;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection endpoint, e.g. "mem://" or "file://path"
    pub endpoint: String,
    /// Namespace to use
    pub namespace: String,
    /// Database name to use
    pub database: String,
    /// Optional root credentials for authentication
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "city_portal".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }
}

impl DbConfig {
    /// Create a config for in-memory testing.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a config for file-based persistence (requires the rocksdb feature).
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            endpoint: format!("file://{}", path.into()),
            ..Default::default()
        }
    }

    /// Build a config from the environment.
    ///
    /// `PORTAL_DB_ENDPOINT` wins when set; otherwise a Railway deployment gets
    /// file-based storage and local development stays in memory.
    /// `PORTAL_DB_USER`/`PORTAL_DB_PASS` supply root credentials.
    pub fn from_env() -> Self {
        let mut config = if let Ok(endpoint) = std::env::var("PORTAL_DB_ENDPOINT") {
            Self {
                endpoint,
                ..Default::default()
            }
        } else if std::env::var("RAILWAY_ENVIRONMENT").is_ok() {
            Self::file("./data/surrealdb")
        } else {
            Self::memory()
        };

        if let Ok(namespace) = std::env::var("PORTAL_DB_NAMESPACE") {
            config = config.with_namespace(namespace);
        }
        if let (Ok(user), Ok(pass)) = (
            std::env::var("PORTAL_DB_USER"),
            std::env::var("PORTAL_DB_PASS"),
        ) {
            config = config.with_credentials(user, pass);
        }
        config
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Whether this config points at a throwaway in-memory store.
    pub fn is_memory(&self) -> bool {
        self.endpoint.starts_with("mem://") || self.endpoint == "memory"
    }

    /// Set root credentials for authentication.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database not initialized - call init_db first")]
    NotInitialized,
    #[error("Connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid row: {0}")]
    InvalidRow(#[from] portal_core::RowError),
}

/// Initialize the database connection.
///
/// This should be called once at application startup before any database operations.
pub async fn init_db(config: DbConfig) -> Result<&'static Database, DbError> {
    DB.get_or_try_init(|| async {
        tracing::info!("Connecting to database: {}", config.endpoint);

        let db = connect(&config.endpoint).await?;

        // Authenticate if credentials provided
        if let Some((username, password)) = &config.credentials {
            db.signin(Root {
                username,
                password,
            })
            .await?;
        }

        // Select namespace and database
        db.use_ns(&config.namespace).use_db(&config.database).await?;

        tracing::info!(
            "Connected to database: {}/{}",
            config.namespace,
            config.database
        );

        Ok(db)
    })
    .await
}

/// Get the database connection.
pub fn get_db() -> Result<&'static Database, DbError> {
    DB.get().ok_or(DbError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mem_endpoints_are_memory() {
        assert!(DbConfig::memory().is_memory());
        assert!(DbConfig::default().with_namespace("scratch").is_memory());
        assert!(!DbConfig::file("./data/surrealdb").is_memory());

        let remote = DbConfig {
            endpoint: "ws://db.internal:8000".to_string(),
            ..Default::default()
        };
        assert!(!remote.is_memory());
    }
}
