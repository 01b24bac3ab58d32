//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}
//!
//! Tables are created parents first so every foreign key has a target.

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_developers_table;
mod m20240101_000002_create_projects_table;
mod m20240101_000003_create_reports_table;
mod m20240101_000004_create_tasks_table;
mod m20240102_000001_create_records_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_developers_table::Migration),
            Box::new(m20240101_000002_create_projects_table::Migration),
            Box::new(m20240101_000003_create_reports_table::Migration),
            Box::new(m20240101_000004_create_tasks_table::Migration),
            Box::new(m20240102_000001_create_records_table::Migration),
        ]
    }
}
