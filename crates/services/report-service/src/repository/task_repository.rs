//! Task repository.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use super::entities::task::{ActiveModel, Entity as TaskEntity};
use common::{AppError, AppResult};
use domain::{NewTask, Task};

pub struct TaskRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> TaskRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Insert a task under an existing report and project.
    pub async fn insert(&self, report_id: i32, project_id: i32, task: &NewTask) -> AppResult<Task> {
        let active_model = ActiveModel {
            report_id: Set(report_id),
            project_id: Set(project_id),
            name: Set(task.name.clone()),
            developer_note: Set(task.developer_note.clone()),
            estimate_planned: Set(task.estimate_planned),
            estimate_progress: Set(task.estimate_progress),
            start_timestamp: Set(task.start_timestamp),
            end_timestamp: Set(task.end_timestamp),
            ..Default::default()
        };

        let model = active_model
            .insert(self.conn)
            .await
            .map_err(|e| AppError::from_db("insert task", e))?;

        Ok(Task::from(model))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Task>> {
        let result = TaskEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(|e| AppError::from_db("select task", e))?;

        Ok(result.map(Task::from))
    }
}
