//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod developer;
pub mod project;
pub mod record;
pub mod report;
pub mod task;
