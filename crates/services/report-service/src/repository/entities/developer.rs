//! Developer database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Developer;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "developers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "firstname")]
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTimeUtc,
    pub modified_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::report::Entity")]
    Report,
}

impl Related<super::report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Report.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Developer {
    fn from(model: Model) -> Self {
        Developer {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            created_at: model.created_at,
            modified_at: model.modified_at,
            deleted_at: model.deleted_at,
        }
    }
}
