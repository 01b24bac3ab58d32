//! Unified error handling for the report store.
//!
//! Every failure reaching a caller is one of a small set of kinds, so callers
//! can branch on "does not exist", "rejected by the schema", "try again later"
//! and "bad input" without parsing messages.

use domain::{DomainError, EntityKind};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("{0} not found")]
    NotFound(String),

    /// Unique, foreign-key or check constraint rejected a write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    // Validation
    #[error("{0}")]
    Invalid(String),

    // Storage engine reachability
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Caller cancelled the operation; any open transaction was rolled back
    #[error("Operation cancelled")]
    Cancelled,

    // Internal
    #[error("{step} failed: {message}")]
    Internal { step: &'static str, message: String },
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            AppError::Invalid(_) => "INVALID",
            AppError::Unavailable(_) => "UNAVAILABLE",
            AppError::Cancelled => "CANCELLED",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether repeating the whole unit of work may succeed.
    ///
    /// Nothing in this crate retries on its own; this only tells the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Unavailable(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Invalid(msg),
            other @ DomainError::UnknownKind(_) => AppError::Invalid(other.to_string()),
        }
    }
}

// =============================================================================
// Database Error Conversion (SeaORM)
// =============================================================================

#[cfg(feature = "database")]
impl AppError {
    /// Classify a SeaORM error raised while running `step`.
    pub fn from_db(step: &'static str, err: sea_orm::DbErr) -> Self {
        use sea_orm::{DbErr, RuntimeErr, SqlErr};

        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return AppError::ConstraintViolation(format!("{}: {}", step, msg));
            }
            _ => {}
        }

        match &err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
                return AppError::Unavailable(format!("{}: {}", step, err));
            }
            DbErr::RecordNotFound(msg) => return AppError::NotFound(msg.clone()),
            DbErr::Exec(RuntimeErr::SqlxError(e)) | DbErr::Query(RuntimeErr::SqlxError(e)) => {
                if let Some(classified) = classify_sqlx(step, e) {
                    return classified;
                }
            }
            _ => {}
        }

        tracing::error!(step, error = ?err, "Database error");
        AppError::Internal {
            step,
            message: err.to_string(),
        }
    }
}

/// Driver-level classification for errors SeaORM passes through untouched.
#[cfg(feature = "database")]
fn classify_sqlx(step: &'static str, err: &sea_orm::sqlx::Error) -> Option<AppError> {
    use sea_orm::sqlx::Error;

    match err {
        Error::Io(_) | Error::PoolTimedOut | Error::PoolClosed | Error::WorkerCrashed => {
            Some(AppError::Unavailable(format!("{}: {}", step, err)))
        }
        // SQLSTATE class 23: integrity constraint violation
        Error::Database(db) if db.code().is_some_and(|code| code.starts_with("23")) => Some(
            AppError::ConstraintViolation(format!("{}: {}", step, db.message())),
        ),
        _ => None,
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, kind: EntityKind, id: i32) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, kind: EntityKind, id: i32) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(kind, id))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(kind: EntityKind, id: i32) -> Self {
        AppError::NotFound(format!("{} {}", kind, id))
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        AppError::Unavailable(msg.into())
    }

    pub fn internal(step: &'static str, msg: impl Into<String>) -> Self {
        AppError::Internal {
            step,
            message: msg.into(),
        }
    }
}
