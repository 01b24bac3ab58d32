//! Task domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{DomainError, DomainResult};

/// Task domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub report_id: i32,
    pub project_id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_note: Option<String>,
    /// Planned estimate in minutes
    pub estimate_planned: i32,
    /// Progress against the estimate in minutes
    pub estimate_progress: i32,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Wall-clock time covered by the task
    pub fn duration(&self) -> chrono::Duration {
        self.end_timestamp - self.start_timestamp
    }
}

/// Task creation data transfer object.
///
/// Report and project references are assigned by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewTask {
    #[validate(length(min = 1, message = "Task name cannot be empty"))]
    pub name: String,
    pub developer_note: Option<String>,
    pub estimate_planned: i32,
    pub estimate_progress: i32,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
}

impl NewTask {
    /// Check the name and the time window.
    ///
    /// A task may start and end at the same instant, but never end before it
    /// starts.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        self.validate()?;
        if self.start_timestamp > self.end_timestamp {
            return Err(DomainError::validation(format!(
                "Task end ({}) is before its start ({})",
                self.end_timestamp, self.start_timestamp
            )));
        }
        Ok(())
    }
}
