//! Record repository for opaque string payloads.

use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};

use super::entities::record::{ActiveModel, Entity as RecordEntity};
use common::{AppError, AppResult};
use domain::{NewRecord, Record};

pub struct RecordRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> RecordRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, record: &NewRecord) -> AppResult<Record> {
        let active_model = ActiveModel {
            data: Set(record.data.clone()),
            ..Default::default()
        };

        let model = active_model
            .insert(self.conn)
            .await
            .map_err(|e| AppError::from_db("insert record", e))?;

        Ok(Record::from(model))
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Record>> {
        let result = RecordEntity::find_by_id(id)
            .one(self.conn)
            .await
            .map_err(|e| AppError::from_db("select record", e))?;

        Ok(result.map(Record::from))
    }
}
