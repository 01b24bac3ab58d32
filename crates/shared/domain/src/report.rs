//! Report domain entity.
//!
//! A report carries no payload of its own; it groups the tasks a developer
//! logged at one point in time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i32,
    pub developer_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Report creation marker.
///
/// The developer reference is filled in by the writer once the developer row
/// exists, so callers never supply it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReport;
