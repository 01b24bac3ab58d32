//! Record domain entity: an opaque string payload stored on its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i32,
    pub data: String,
    pub created_at: DateTime<Utc>,
}

/// Record creation data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub data: String,
}

impl NewRecord {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}
