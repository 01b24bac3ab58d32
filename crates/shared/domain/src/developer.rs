//! Developer domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::MAX_NAME_LENGTH;
use crate::error::DomainResult;

/// Developer domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Developer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Soft delete timestamp (None = active, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Developer {
    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Developer creation data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewDeveloper {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "First name must be 1-64 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = MAX_NAME_LENGTH, message = "Last name must be 1-64 characters"))]
    pub last_name: String,
}

impl NewDeveloper {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Check field limits before anything is written
    pub fn ensure_valid(&self) -> DomainResult<()> {
        self.validate()?;
        Ok(())
    }
}
