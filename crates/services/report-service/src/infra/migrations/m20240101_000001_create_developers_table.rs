//! Migration: Create developers table.

use domain::MAX_NAME_LENGTH;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Developers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Developers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Developers::Firstname).string_len(MAX_NAME_LENGTH as u32).not_null())
                    .col(ColumnDef::new(Developers::LastName).string_len(MAX_NAME_LENGTH as u32).not_null())
                    .col(
                        ColumnDef::new(Developers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Developers::ModifiedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Soft delete marker, NULL = active
                    .col(ColumnDef::new(Developers::DeletedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Developers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Developers {
    Table,
    Id,
    Firstname,
    LastName,
    CreatedAt,
    ModifiedAt,
    DeletedAt,
}
