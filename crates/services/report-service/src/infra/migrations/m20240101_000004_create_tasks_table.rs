//! Migration: Create tasks table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_projects_table::Projects;
use super::m20240101_000003_create_reports_table::Reports;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tasks::ReportId).integer().not_null())
                    .col(ColumnDef::new(Tasks::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Tasks::Name).text().not_null())
                    .col(ColumnDef::new(Tasks::DeveloperNote).text().null())
                    .col(ColumnDef::new(Tasks::EstimatePlaned).integer().not_null())
                    .col(ColumnDef::new(Tasks::EstimateProgress).integer().not_null())
                    .col(ColumnDef::new(Tasks::StartTimestamp).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Tasks::EndTimestamp).timestamp_with_time_zone().not_null())
                    .col(
                        ColumnDef::new(Tasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Tasks::StartTimestamp).lte(Expr::col(Tasks::EndTimestamp)))
                    .check(
                        Expr::col(Tasks::EstimatePlaned)
                            .gte(0)
                            .and(Expr::col(Tasks::EstimateProgress).gte(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_report_id")
                            .from(Tasks::Table, Tasks::ReportId)
                            .to(Reports::Table, Reports::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tasks_project_id")
                            .from(Tasks::Table, Tasks::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tasks_report_id")
                    .table(Tasks::Table)
                    .col(Tasks::ReportId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    ReportId,
    ProjectId,
    Name,
    DeveloperNote,
    EstimatePlaned,
    EstimateProgress,
    StartTimestamp,
    EndTimestamp,
    CreatedAt,
}
