//! Domain layer - Report entities and their input types.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the stored rows, the data transfer objects used to create them, and the
//! validation that runs before anything reaches the database.

pub mod constants;
pub mod developer;
pub mod error;
pub mod graph;
pub mod project;
pub mod record;
pub mod report;
pub mod task;

pub use constants::*;
pub use developer::{Developer, NewDeveloper};
pub use error::{DomainError, DomainResult};
pub use graph::{Entity, EntityGraph, EntityKind, ReportDraft, WrittenGraph, WrittenReport};
pub use project::{NewProject, Project};
pub use record::{NewRecord, Record};
pub use report::{NewReport, Report};
pub use task::{NewTask, Task};
