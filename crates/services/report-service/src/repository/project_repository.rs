//! Project repository.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use super::entities::project::{ActiveModel, Entity as ProjectEntity};
use common::{AppError, AppResult};
use domain::{NewProject, Project};

pub struct ProjectRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> ProjectRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, project: &NewProject) -> AppResult<Project> {
        let active_model = ActiveModel {
            name: Set(project.name.clone()),
            description: Set(project.description.clone()),
            ..Default::default()
        };

        let model = active_model
            .insert(self.conn)
            .await
            .map_err(|e| AppError::from_db("insert project", e))?;

        Ok(Project::from(model))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Project>> {
        let result = ProjectEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(|e| AppError::from_db("select project", e))?;

        Ok(result.map(Project::from))
    }
}
