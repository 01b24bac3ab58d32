//! Repository layer for data access.

pub mod entities;
mod developer_repository;
mod entity_reader;
mod project_repository;
mod record_repository;
mod report_repository;
mod task_repository;

pub use developer_repository::DeveloperRepository;
pub use entity_reader::{EntityReader, EntityStore};
pub use project_repository::ProjectRepository;
pub use record_repository::RecordRepository;
pub use report_repository::ReportRepository;
pub use task_repository::TaskRepository;

#[cfg(any(test, feature = "test-utils"))]
pub use entity_reader::MockEntityReader;
