use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::store::Store;
use crate::config::DatabaseConfig;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the store the server runs against.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Postgres when `database.url` is set, otherwise a process-local store.
    pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        let Some(url) = config.url.as_deref() else {
            warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            return Ok(Arc::new(MemoryStore::new()));
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        let store = PgStore::new(pool);
        store.ensure_schema().await?;

        info!(
            "Connected to PostgreSQL (max_connections={})",
            config.max_connections
        );
        Ok(Arc::new(store))
    }

    /// Pings the store to ensure connectivity
    pub async fn health_check(store: &dyn Store) -> Result<(), DatabaseError> {
        store.health_check().await
    }
}
