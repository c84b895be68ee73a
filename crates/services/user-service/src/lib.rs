//! User Service Library
//!
//! User storage (PostgreSQL or in-memory), migrations and the user
//! management service.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use common::{AppResult, DatabaseConfig};
use sea_orm::DbErr;
use tracing::{info, warn};

use crate::config::{StorageBackend, UserServiceConfig};
use crate::infra::Database;
use crate::repository::{seed, MemoryUserStore, UserRepository, UserStore};

/// Repository selected at startup.
pub struct Storage {
    pub repository: Arc<dyn UserRepository>,
    /// Backend actually in use (after any fallback)
    pub backend: StorageBackend,
}

/// Open the configured store.
///
/// A PostgreSQL connection failure falls back to the in-memory store so the
/// API stays usable without a database. Sample users are inserted into an
/// empty store when `seed_sample_data` is set.
pub async fn connect_storage(config: &UserServiceConfig) -> AppResult<Storage> {
    let (repository, backend): (Arc<dyn UserRepository>, _) = match config.storage {
        StorageBackend::Memory => (Arc::new(MemoryUserStore::new()), StorageBackend::Memory),
        StorageBackend::Postgres => match Database::connect(&config.database).await {
            Ok(db) => (
                Arc::new(UserStore::new(db.get_connection())),
                StorageBackend::Postgres,
            ),
            Err(e) => {
                warn!("Failed to connect to database: {}", e);
                warn!("Falling back to in-memory storage");
                (Arc::new(MemoryUserStore::new()), StorageBackend::Memory)
            }
        },
    };

    if config.seed_sample_data {
        seed::seed_if_empty(repository.as_ref()).await?;
    }

    info!(backend = %backend, "User storage ready");
    Ok(Storage {
        repository,
        backend,
    })
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &DatabaseConfig, action: MigrateAction) -> Result<(), DbErr> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
