//! Entity reader - point lookups by id on the connection pool.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::{
    DeveloperRepository, ProjectRepository, RecordRepository, ReportRepository, TaskRepository,
};
use common::AppResult;
use domain::{Developer, Project, Record, Report, Task};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read side for dependency injection.
///
/// A missing row is `Ok(None)`; the service layer turns it into `NotFound`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EntityReader: Send + Sync {
    async fn developer(&self, id: i32) -> AppResult<Option<Developer>>;

    async fn project(&self, id: i32) -> AppResult<Option<Project>>;

    async fn report(&self, id: i32) -> AppResult<Option<Report>>;

    async fn task(&self, id: i32) -> AppResult<Option<Task>>;

    async fn record(&self, id: i32) -> AppResult<Option<Record>>;
}

/// Concrete implementation of EntityReader
pub struct EntityStore {
    db: Arc<DatabaseConnection>,
}

impl EntityStore {
    /// Create new reader instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntityReader for EntityStore {
    async fn developer(&self, id: i32) -> AppResult<Option<Developer>> {
        DeveloperRepository::new(self.db.as_ref()).find_by_id(id).await
    }

    async fn project(&self, id: i32) -> AppResult<Option<Project>> {
        ProjectRepository::new(self.db.as_ref()).find_by_id(id).await
    }

    async fn report(&self, id: i32) -> AppResult<Option<Report>> {
        ReportRepository::new(self.db.as_ref()).find_by_id(id).await
    }

    async fn task(&self, id: i32) -> AppResult<Option<Task>> {
        TaskRepository::new(self.db.as_ref()).find_by_id(id).await
    }

    async fn record(&self, id: i32) -> AppResult<Option<Record>> {
        RecordRepository::new(self.db.as_ref()).find_by_id(id).await
    }
}
