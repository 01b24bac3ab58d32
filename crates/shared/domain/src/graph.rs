//! Entity graphs written as one unit, and the kind-tagged read side.
//!
//! Insertion follows the foreign-key dependency order:
//!
//! ```text
//! Developer ──< Report ──< Task >── Project
//! ```
//!
//! Developer and Project are roots; Report needs the developer id; Task needs
//! both the report id and the project id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{KIND_DEVELOPER, KIND_PROJECT, KIND_RECORD, KIND_REPORT, KIND_TASK};
use crate::developer::{Developer, NewDeveloper};
use crate::error::{DomainError, DomainResult};
use crate::project::{NewProject, Project};
use crate::record::Record;
use crate::report::{NewReport, Report};
use crate::task::{NewTask, Task};

/// A report with its project and task, for a developer that is either written
/// in the same unit or already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub project: NewProject,
    #[serde(default)]
    pub report: NewReport,
    pub task: NewTask,
}

impl ReportDraft {
    pub fn ensure_valid(&self) -> DomainResult<()> {
        self.project.ensure_valid()?;
        self.task.ensure_valid()
    }
}

/// The full four-entity graph accepted by the writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGraph {
    pub developer: NewDeveloper,
    pub project: NewProject,
    #[serde(default)]
    pub report: NewReport,
    pub task: NewTask,
}

impl EntityGraph {
    pub fn new(developer: NewDeveloper, project: NewProject, task: NewTask) -> Self {
        Self {
            developer,
            project,
            report: NewReport,
            task,
        }
    }

    /// Validate every node; the first failure wins.
    pub fn ensure_valid(&self) -> DomainResult<()> {
        self.developer.ensure_valid()?;
        self.project.ensure_valid()?;
        self.task.ensure_valid()
    }

    /// Split off the developer so the rest can be written against its id.
    pub fn into_parts(self) -> (NewDeveloper, ReportDraft) {
        (
            self.developer,
            ReportDraft {
                project: self.project,
                report: self.report,
                task: self.task,
            },
        )
    }
}

/// Rows stored for a [`ReportDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenReport {
    pub project: Project,
    pub report: Report,
    pub task: Task,
}

/// Rows stored for an [`EntityGraph`], with their assigned ids and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenGraph {
    pub developer: Developer,
    pub project: Project,
    pub report: Report,
    pub task: Task,
}

impl WrittenGraph {
    pub fn from_parts(developer: Developer, written: WrittenReport) -> Self {
        Self {
            developer,
            project: written.project,
            report: written.report,
            task: written.task,
        }
    }

    /// Id of the leaf row, which depends on every other row in the graph
    pub fn task_id(&self) -> i32 {
        self.task.id
    }
}

/// Kinds of entity the reader can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Developer,
    Project,
    Report,
    Task,
    Record,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Developer => KIND_DEVELOPER,
            EntityKind::Project => KIND_PROJECT,
            EntityKind::Report => KIND_REPORT,
            EntityKind::Task => KIND_TASK,
            EntityKind::Record => KIND_RECORD,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            KIND_DEVELOPER => Ok(EntityKind::Developer),
            KIND_PROJECT => Ok(EntityKind::Project),
            KIND_REPORT => Ok(EntityKind::Report),
            KIND_TASK => Ok(EntityKind::Task),
            KIND_RECORD => Ok(EntityKind::Record),
            other => Err(DomainError::UnknownKind(other.to_string())),
        }
    }
}

/// One stored row, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "lowercase")]
pub enum Entity {
    Developer(Developer),
    Project(Project),
    Report(Report),
    Task(Task),
    Record(Record),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Developer(_) => EntityKind::Developer,
            Entity::Project(_) => EntityKind::Project,
            Entity::Report(_) => EntityKind::Report,
            Entity::Task(_) => EntityKind::Task,
            Entity::Record(_) => EntityKind::Record,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Entity::Developer(row) => row.id,
            Entity::Project(row) => row.id,
            Entity::Report(row) => row.id,
            Entity::Task(row) => row.id,
            Entity::Record(row) => row.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn graph() -> EntityGraph {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        EntityGraph::new(
            NewDeveloper::new("John", "Doe"),
            NewProject::new("Website", "landing page"),
            NewTask {
                name: "Fix header".to_string(),
                developer_note: Some("sticky on mobile".to_string()),
                estimate_planned: 60,
                estimate_progress: 30,
                start_timestamp: start,
                end_timestamp: start + Duration::hours(1),
            },
        )
    }

    #[test]
    fn valid_graph_passes() {
        assert!(graph().ensure_valid().is_ok());
    }

    #[test]
    fn empty_first_name_is_rejected() {
        let mut g = graph();
        g.developer.first_name = String::new();
        assert_eq!(
            g.ensure_valid(),
            Err(DomainError::validation("First name must be 1-64 characters"))
        );
    }

    #[test]
    fn overlong_project_name_is_rejected() {
        let mut g = graph();
        g.project.name = "x".repeat(crate::MAX_NAME_LENGTH as usize + 1);
        assert_eq!(
            g.ensure_valid(),
            Err(DomainError::validation("Project name must be 1-64 characters"))
        );
    }

    #[test]
    fn name_at_column_limit_is_accepted() {
        let mut g = graph();
        g.developer.last_name = "y".repeat(crate::MAX_NAME_LENGTH as usize);
        assert!(g.ensure_valid().is_ok());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut g = graph();
        g.task.end_timestamp = g.task.start_timestamp - Duration::hours(1);
        assert!(matches!(g.ensure_valid(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn into_parts_keeps_payload() {
        let g = graph();
        let (developer, draft) = g.clone().into_parts();
        assert_eq!(developer, g.developer);
        assert_eq!(draft.project, g.project);
        assert_eq!(draft.task, g.task);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Task".parse::<EntityKind>(), Ok(EntityKind::Task));
        assert_eq!("record".parse::<EntityKind>(), Ok(EntityKind::Record));
        assert_eq!(
            "invoice".parse::<EntityKind>(),
            Err(DomainError::UnknownKind("invoice".to_string()))
        );
    }

    #[test]
    fn entity_serializes_with_kind_tag() {
        let entity = Entity::Record(Record {
            id: 7,
            data: "payload".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "record");
        assert_eq!(json["row"]["id"], 7);
        assert_eq!(entity.kind(), EntityKind::Record);
    }
}
