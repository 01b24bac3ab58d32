//! Task database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Task;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub report_id: i32,
    pub project_id: i32,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub developer_note: Option<String>,
    #[sea_orm(column_name = "estimate_planed")]
    pub estimate_planned: i32,
    pub estimate_progress: i32,
    pub start_timestamp: DateTimeUtc,
    pub end_timestamp: DateTimeUtc,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::report::Entity",
        from = "Column::ReportId",
        to = "super::report::Column::Id",
        on_delete = "Cascade"
    )]
    Report,
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id",
        on_delete = "Cascade"
    )]
    Project,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Task {
    fn from(model: Model) -> Self {
        Task {
            id: model.id,
            report_id: model.report_id,
            project_id: model.project_id,
            name: model.name,
            developer_note: model.developer_note,
            estimate_planned: model.estimate_planned,
            estimate_progress: model.estimate_progress,
            start_timestamp: model.start_timestamp,
            end_timestamp: model.end_timestamp,
            created_at: model.created_at,
        }
    }
}
