//! Report repository.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use super::entities::report::{ActiveModel, Entity as ReportEntity};
use common::{AppError, AppResult};
use domain::Report;

pub struct ReportRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> ReportRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Insert a report owned by `developer_id`.
    ///
    /// The developer row must already be visible on this connection.
    pub async fn insert(&self, developer_id: i32) -> AppResult<Report> {
        let active_model = ActiveModel {
            developer_id: Set(developer_id),
            ..Default::default()
        };

        let model = active_model
            .insert(self.conn)
            .await
            .map_err(|e| AppError::from_db("insert report", e))?;

        Ok(Report::from(model))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Report>> {
        let result = ReportEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(|e| AppError::from_db("select report", e))?;

        Ok(result.map(Report::from))
    }
}
