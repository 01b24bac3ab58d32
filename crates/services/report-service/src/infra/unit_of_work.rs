//! Unit of Work pattern implementation.
//!
//! Manages the transaction lifecycle and hands out repositories bound to the
//! open transaction. Every statement issued through a [`TransactionContext`]
//! commits together or not at all.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use tokio_util::sync::CancellationToken;

use crate::repository::{
    DeveloperRepository, EntityReader, EntityStore, ProjectRepository, RecordRepository,
    ReportRepository, TaskRepository,
};
use common::{AppError, AppResult};

/// Boxed body of a transaction, borrowing the transaction for `'a`.
pub type TransactionFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not object safe due to generic methods.
/// For testing, mock at the reader level or use the SeaORM mock connection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get the pooled entity reader
    fn reader(&self) -> Arc<dyn EntityReader>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a transaction that `cancel` can abort.
    ///
    /// On cancellation the in-flight statement is dropped, the transaction is
    /// rolled back and [`AppError::Cancelled`] is returned.
    async fn transaction_until<F, T>(&self, cancel: CancellationToken, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// All repository operations performed through this context are part
/// of the same database transaction.
#[derive(Clone, Copy)]
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn developers(&self) -> DeveloperRepository<'a, DatabaseTransaction> {
        DeveloperRepository::new(self.txn)
    }

    pub fn projects(&self) -> ProjectRepository<'a, DatabaseTransaction> {
        ProjectRepository::new(self.txn)
    }

    pub fn reports(&self) -> ReportRepository<'a, DatabaseTransaction> {
        ReportRepository::new(self.txn)
    }

    pub fn tasks(&self) -> TaskRepository<'a, DatabaseTransaction> {
        TaskRepository::new(self.txn)
    }

    pub fn records(&self) -> RecordRepository<'a, DatabaseTransaction> {
        RecordRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: Arc<DatabaseConnection>,
    reader: Arc<EntityStore>,
    write_timeout: Option<Duration>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let reader = Arc::new(EntityStore::new(Arc::clone(&db)));
        Self {
            db,
            reader,
            write_timeout: None,
        }
    }

    /// Bound every transaction by `timeout`; expiry rolls back and reports
    /// the storage as unavailable.
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Internal transaction execution with configurable isolation level
    async fn execute_transaction<F, T>(
        &self,
        isolation: IsolationLevel,
        cancel: CancellationToken,
        f: F,
    ) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await
            .map_err(|e| AppError::from_db("begin", e))?;

        // The body borrows `txn`; it is dropped at the end of this block, so a
        // cancelled or timed-out body never outlives the transaction.
        let outcome = {
            let body = f(TransactionContext::new(&txn));
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(AppError::Cancelled),
                _ = expiry(self.write_timeout) => {
                    Err(AppError::unavailable("transaction deadline exceeded"))
                }
                result = body => result,
            }
        };

        match outcome {
            Ok(result) => {
                txn.commit()
                    .await
                    .map_err(|e| AppError::from_db("commit", e))?;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(code = e.code(), error = %e, "Rolling back transaction");
                // Dropping an open transaction also rolls back, so a failed
                // explicit rollback still leaves nothing committed.
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Resolves once `timeout` has elapsed, or never.
async fn expiry(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending::<()>().await,
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn reader(&self) -> Arc<dyn EntityReader> {
        self.reader.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, CancellationToken::new(), f)
            .await
    }

    async fn transaction_until<F, T>(&self, cancel: CancellationToken, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, cancel, f)
            .await
    }
}

/// Simpler API for executing transactional operations.
///
/// This helper macro reduces boilerplate when using transactions.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
