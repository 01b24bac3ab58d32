//! Report Service Library
//!
//! Persists developer, project, report and task rows as one atomic unit of
//! work and reads any of them back by id. Used by the `report-service` CLI
//! and embeddable by other binaries.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::{AppError, AppResult};

use crate::config::ReportServiceConfig;
use crate::infra::{Database, Persistence};
use crate::service::ReportManager;

/// Connect the pool, apply pending migrations and build the service.
pub async fn connect(config: &ReportServiceConfig) -> AppResult<(Database, ReportManager<Persistence>)> {
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| AppError::from_db("connect", e))?;

    let uow = Persistence::new(db.get_connection()).with_write_timeout(config.write_timeout);
    let service = ReportManager::new(Arc::new(uow));

    Ok((db, service))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &ReportServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database)
        .await
        .map_err(|e| AppError::from_db("connect", e))?;

    let result = match action {
        MigrateAction::Up => db.run_migrations().await.map(|_| {
            info!("Migrations applied successfully");
        }),
        MigrateAction::Down => db.rollback_migration().await.map(|_| {
            info!("Rolled back last migration");
        }),
        MigrateAction::Status => db.migration_status().await.map(|status| {
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }),
        MigrateAction::Fresh => db.fresh_migrations().await.map(|_| {
            info!("Database reset and migrations applied");
        }),
    };
    result.map_err(|e| AppError::from_db("migrate", e))?;

    db.close().await.map_err(|e| AppError::from_db("close", e))
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
