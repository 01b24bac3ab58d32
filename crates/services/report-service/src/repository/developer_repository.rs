//! Developer repository.
//!
//! Works against anything implementing [`ConnectionTrait`], so the same code
//! serves pooled reads and statements inside a unit of work.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use super::entities::developer::{ActiveModel, Entity as DeveloperEntity};
use common::{AppError, AppResult};
use domain::{Developer, NewDeveloper};

pub struct DeveloperRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> DeveloperRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Insert a developer; id and timestamps come back from the database.
    pub async fn insert(&self, developer: &NewDeveloper) -> AppResult<Developer> {
        let active_model = ActiveModel {
            first_name: Set(developer.first_name.clone()),
            last_name: Set(developer.last_name.clone()),
            ..Default::default()
        };

        let model = active_model
            .insert(self.conn)
            .await
            .map_err(|e| AppError::from_db("insert developer", e))?;

        Ok(Developer::from(model))
    }

    /// Find developer by ID, soft-deleted rows included
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Developer>> {
        let result = DeveloperEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(|e| AppError::from_db("select developer", e))?;

        Ok(result.map(Developer::from))
    }

    // TODO: patch and soft delete once the editable fields and the cascade
    // rules for dependent reports are decided; `deleted_at` is read-only until then.
}
