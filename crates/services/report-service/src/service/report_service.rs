//! Report service - writes entity graphs atomically and reads rows back.
//!
//! Every write runs as one unit of work. The four-entity graph is inserted in
//! foreign-key dependency order (Developer, Project, Report, Task), each
//! child receiving the ids its parents were just assigned.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use common::{AppResult, OptionExt};
use domain::{
    Developer, Entity, EntityGraph, EntityKind, NewDeveloper, NewProject, NewRecord, Project,
    Record, Report, ReportDraft, Task, WrittenGraph, WrittenReport,
};

use crate::infra::{TransactionContext, UnitOfWork};
use crate::with_transaction;

/// Report service trait for dependency injection.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Write developer, project, report and task as one unit.
    async fn write_graph(&self, graph: EntityGraph) -> AppResult<WrittenGraph>;

    /// Same as [`ReportService::write_graph`], aborted when `cancel` fires.
    async fn write_graph_cancellable(
        &self,
        graph: EntityGraph,
        cancel: CancellationToken,
    ) -> AppResult<WrittenGraph>;

    /// Write project, report and task for an existing developer as one unit.
    async fn write_report(&self, developer_id: i32, draft: ReportDraft) -> AppResult<WrittenReport>;

    /// Create a lone developer
    async fn create_developer(&self, developer: NewDeveloper) -> AppResult<Developer>;

    /// Create a lone project
    async fn create_project(&self, project: NewProject) -> AppResult<Project>;

    /// Store an opaque payload
    async fn save_record(&self, record: NewRecord) -> AppResult<Record>;

    /// Fetch any entity by kind and id; a missing row is `NotFound`.
    async fn get_by_id(&self, kind: EntityKind, id: i32) -> AppResult<Entity>;

    async fn get_developer(&self, id: i32) -> AppResult<Developer>;

    async fn get_project(&self, id: i32) -> AppResult<Project>;

    async fn get_report(&self, id: i32) -> AppResult<Report>;

    async fn get_task(&self, id: i32) -> AppResult<Task>;

    async fn get_record(&self, id: i32) -> AppResult<Record>;
}

/// Concrete implementation of ReportService using Unit of Work.
pub struct ReportManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ReportManager<U> {
    /// Create new report service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Insert project, report and task for `developer_id` on the open transaction.
async fn insert_report(
    ctx: TransactionContext<'_>,
    developer_id: i32,
    draft: &ReportDraft,
) -> AppResult<WrittenReport> {
    let project = ctx.projects().insert(&draft.project).await?;
    tracing::debug!(project_id = project.id, "Project inserted");

    let report = ctx.reports().insert(developer_id).await?;
    tracing::debug!(report_id = report.id, developer_id, "Report inserted");

    let task = ctx.tasks().insert(report.id, project.id, &draft.task).await?;
    tracing::debug!(task_id = task.id, report_id = report.id, project_id = project.id, "Task inserted");

    Ok(WrittenReport {
        project,
        report,
        task,
    })
}

/// Insert the whole graph, developer first.
async fn insert_graph(
    ctx: TransactionContext<'_>,
    new_developer: NewDeveloper,
    draft: ReportDraft,
) -> AppResult<WrittenGraph> {
    let developer = ctx.developers().insert(&new_developer).await?;
    tracing::debug!(developer_id = developer.id, "Developer inserted");

    let written = insert_report(ctx, developer.id, &draft).await?;
    Ok(WrittenGraph::from_parts(developer, written))
}

#[async_trait]
impl<U: UnitOfWork> ReportService for ReportManager<U> {
    async fn write_graph(&self, graph: EntityGraph) -> AppResult<WrittenGraph> {
        self.write_graph_cancellable(graph, CancellationToken::new())
            .await
    }

    async fn write_graph_cancellable(
        &self,
        graph: EntityGraph,
        cancel: CancellationToken,
    ) -> AppResult<WrittenGraph> {
        // Fail fast: nothing is sent to the database for invalid input
        graph.ensure_valid()?;
        let (new_developer, draft) = graph.into_parts();

        let result = self
            .uow
            .transaction_until(cancel, move |ctx| {
                Box::pin(insert_graph(ctx, new_developer, draft))
            })
            .await;

        match &result {
            Ok(written) => tracing::info!(
                developer_id = written.developer.id,
                project_id = written.project.id,
                report_id = written.report.id,
                task_id = written.task_id(),
                "Entity graph written"
            ),
            Err(e) => tracing::warn!(code = e.code(), error = %e, "Entity graph not written"),
        }

        result
    }

    async fn write_report(&self, developer_id: i32, draft: ReportDraft) -> AppResult<WrittenReport> {
        draft.ensure_valid()?;

        let result = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.developers()
                        .find_by_id(developer_id)
                        .await?
                        .ok_or_not_found(EntityKind::Developer, developer_id)?;

                    insert_report(ctx, developer_id, &draft).await
                })
            })
            .await;

        if let Ok(written) = &result {
            tracing::info!(
                developer_id,
                report_id = written.report.id,
                task_id = written.task.id,
                "Report written"
            );
        }

        result
    }

    async fn create_developer(&self, developer: NewDeveloper) -> AppResult<Developer> {
        developer.ensure_valid()?;
        with_transaction!(self.uow, |ctx| ctx.developers().insert(&developer).await)
    }

    async fn create_project(&self, project: NewProject) -> AppResult<Project> {
        project.ensure_valid()?;
        with_transaction!(self.uow, |ctx| ctx.projects().insert(&project).await)
    }

    async fn save_record(&self, record: NewRecord) -> AppResult<Record> {
        let saved = with_transaction!(self.uow, |ctx| ctx.records().insert(&record).await)?;
        tracing::info!(record_id = saved.id, "Record saved");
        Ok(saved)
    }

    async fn get_by_id(&self, kind: EntityKind, id: i32) -> AppResult<Entity> {
        match kind {
            EntityKind::Developer => self.get_developer(id).await.map(Entity::Developer),
            EntityKind::Project => self.get_project(id).await.map(Entity::Project),
            EntityKind::Report => self.get_report(id).await.map(Entity::Report),
            EntityKind::Task => self.get_task(id).await.map(Entity::Task),
            EntityKind::Record => self.get_record(id).await.map(Entity::Record),
        }
    }

    async fn get_developer(&self, id: i32) -> AppResult<Developer> {
        self.uow
            .reader()
            .developer(id)
            .await?
            .ok_or_not_found(EntityKind::Developer, id)
    }

    async fn get_project(&self, id: i32) -> AppResult<Project> {
        self.uow
            .reader()
            .project(id)
            .await?
            .ok_or_not_found(EntityKind::Project, id)
    }

    async fn get_report(&self, id: i32) -> AppResult<Report> {
        self.uow
            .reader()
            .report(id)
            .await?
            .ok_or_not_found(EntityKind::Report, id)
    }

    async fn get_task(&self, id: i32) -> AppResult<Task> {
        self.uow
            .reader()
            .task(id)
            .await?
            .ok_or_not_found(EntityKind::Task, id)
    }

    async fn get_record(&self, id: i32) -> AppResult<Record> {
        self.uow
            .reader()
            .record(id)
            .await?
            .ok_or_not_found(EntityKind::Record, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use common::AppError;
    use domain::NewTask;
    use mockall::predicate::eq;

    use crate::infra::TransactionFuture;
    use crate::repository::{EntityReader, MockEntityReader};

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn sample_graph() -> EntityGraph {
        EntityGraph::new(
            NewDeveloper::new("John", "Doe"),
            NewProject::new("Website", "landing page"),
            NewTask {
                name: "Fix header".to_string(),
                developer_note: None,
                estimate_planned: 60,
                estimate_progress: 30,
                start_timestamp: ts(),
                end_timestamp: ts() + Duration::hours(1),
            },
        )
    }

    /// Unit of work whose reads come from a mock and whose transactions
    /// always fail, so reaching the database shows up as `Internal`.
    struct TestUnitOfWork {
        reader: Arc<MockEntityReader>,
    }

    impl TestUnitOfWork {
        fn new(reader: MockEntityReader) -> Self {
            Self {
                reader: Arc::new(reader),
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn reader(&self) -> Arc<dyn EntityReader> {
            self.reader.clone()
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("begin", "transactions not supported in test mock"))
        }

        async fn transaction_until<F, T>(&self, _cancel: CancellationToken, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(TransactionContext<'a>) -> TransactionFuture<'a, T> + Send,
            T: Send,
        {
            Err(AppError::internal("begin", "transactions not supported in test mock"))
        }
    }

    fn with_reader(reader: MockEntityReader) -> ReportManager<TestUnitOfWork> {
        ReportManager::new(Arc::new(TestUnitOfWork::new(reader)))
    }

    mod reader {
        use super::*;

        fn stored_task(id: i32) -> Task {
            Task {
                id,
                report_id: 3,
                project_id: 2,
                name: "Fix header".to_string(),
                developer_note: None,
                estimate_planned: 60,
                estimate_progress: 30,
                start_timestamp: ts(),
                end_timestamp: ts() + Duration::hours(1),
                created_at: ts(),
            }
        }

        #[tokio::test]
        async fn test_get_task_success() {
            let mut reader = MockEntityReader::new();
            reader
                .expect_task()
                .with(eq(4))
                .returning(|id| Ok(Some(stored_task(id))));

            let task = with_reader(reader).get_task(4).await.unwrap();

            assert_eq!(task.id, 4);
            assert_eq!(task.report_id, 3);
        }

        #[tokio::test]
        async fn test_get_by_id_missing_is_not_found() {
            let mut reader = MockEntityReader::new();
            reader.expect_developer().returning(|_| Ok(None));

            let err = with_reader(reader)
                .get_by_id(EntityKind::Developer, 404)
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::NotFound(msg) if msg == "developer 404"));
        }

        #[tokio::test]
        async fn test_get_by_id_dispatches_on_kind() {
            let mut reader = MockEntityReader::new();
            reader.expect_record().with(eq(7)).returning(|id| {
                Ok(Some(Record {
                    id,
                    data: "payload".to_string(),
                    created_at: ts(),
                }))
            });

            let entity = with_reader(reader)
                .get_by_id(EntityKind::Record, 7)
                .await
                .unwrap();

            assert_eq!(entity.kind(), EntityKind::Record);
            assert_eq!(entity.id(), 7);
        }

        #[tokio::test]
        async fn test_reader_failure_is_not_reported_as_not_found() {
            let mut reader = MockEntityReader::new();
            reader
                .expect_project()
                .returning(|_| Err(AppError::unavailable("select project: connection reset")));

            let err = with_reader(reader).get_project(1).await.unwrap_err();

            assert!(matches!(err, AppError::Unavailable(_)));
        }

        #[tokio::test]
        async fn test_invalid_graph_never_opens_transaction() {
            let mut graph = sample_graph();
            graph.task.end_timestamp = graph.task.start_timestamp - Duration::hours(1);

            let err = with_reader(MockEntityReader::new())
                .write_graph(graph)
                .await
                .unwrap_err();

            // The test unit of work answers `Internal` to any transaction
            assert!(matches!(err, AppError::Invalid(_)));
        }

        #[tokio::test]
        async fn test_invalid_draft_never_opens_transaction() {
            let (_, mut draft) = sample_graph().into_parts();
            draft.project.name = String::new();

            let err = with_reader(MockEntityReader::new())
                .write_report(1, draft)
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::Invalid(_)));
        }
    }

    mod persistence {
        use super::*;
        use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr, Transaction};

        use crate::infra::Persistence;
        use crate::repository::entities::{developer, project, record, report, task};

        fn developer_row(id: i32) -> developer::Model {
            developer::Model {
                id,
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                created_at: ts(),
                modified_at: ts(),
                deleted_at: None,
            }
        }

        fn project_row(id: i32) -> project::Model {
            project::Model {
                id,
                name: "Website".to_string(),
                description: "landing page".to_string(),
                created_at: ts(),
                modified_at: ts(),
            }
        }

        fn report_row(id: i32, developer_id: i32) -> report::Model {
            report::Model {
                id,
                developer_id,
                created_at: ts(),
            }
        }

        fn task_row(id: i32, report_id: i32, project_id: i32) -> task::Model {
            task::Model {
                id,
                report_id,
                project_id,
                name: "Fix header".to_string(),
                developer_note: None,
                estimate_planned: 60,
                estimate_progress: 30,
                start_timestamp: ts(),
                end_timestamp: ts() + Duration::hours(1),
                created_at: ts(),
            }
        }

        /// Report service over a mock connection it shares with the test.
        struct MockStore {
            db: Arc<DatabaseConnection>,
            service: ReportManager<Persistence>,
        }

        impl MockStore {
            fn new(db: DatabaseConnection) -> Self {
                let db = Arc::new(db);
                let service = ReportManager::new(Arc::new(Persistence::new(Arc::clone(&db))));
                Self { db, service }
            }

            /// Drop the service and take back the statements it issued.
            fn transaction_log(self) -> Vec<Transaction> {
                let Self { db, service } = self;
                drop(service);
                Arc::try_unwrap(db)
                    .ok()
                    .expect("connection still shared after dropping the service")
                    .into_transaction_log()
            }

            fn statement_log(self) -> String {
                format!("{:?}", self.transaction_log())
            }
        }

        #[tokio::test]
        async fn test_write_graph_inserts_in_dependency_order() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([vec![developer_row(1)]])
                    .append_query_results([vec![project_row(2)]])
                    .append_query_results([vec![report_row(3, 1)]])
                    .append_query_results([vec![task_row(4, 3, 2)]])
                    .into_connection(),
            );

            let written = store.service.write_graph(sample_graph()).await.unwrap();

            assert_eq!(written.task_id(), 4);
            assert_eq!(written.report.developer_id, written.developer.id);
            assert_eq!(written.task.report_id, written.report.id);
            assert_eq!(written.task.project_id, written.project.id);

            let log = store.statement_log();
            let position = |table: &str| {
                log.find(table)
                    .unwrap_or_else(|| panic!("no statement touched {}", table))
            };
            assert!(position("developers") < position("projects"));
            assert!(position("projects") < position("reports"));
            assert!(position("reports") < position("tasks"));
            assert!(log.contains("COMMIT"));
            assert!(!log.contains("ROLLBACK"));
        }

        #[tokio::test]
        async fn test_failed_step_rolls_back_whole_graph() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([vec![developer_row(1)]])
                    .append_query_results([vec![project_row(2)]])
                    .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                        "simulated failure".to_string(),
                    ))])
                    .into_connection(),
            );

            let err = store.service.write_graph(sample_graph()).await.unwrap_err();

            assert!(matches!(err, AppError::Internal { step: "insert report", .. }));
            let log = store.statement_log();
            assert!(!log.contains("COMMIT"));
            assert!(!log.contains("tasks"));
        }

        #[tokio::test]
        async fn test_lost_connection_is_unavailable() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_errors([DbErr::Conn(RuntimeErr::Internal(
                        "connection reset by peer".to_string(),
                    ))])
                    .into_connection(),
            );

            let err = store.service.write_graph(sample_graph()).await.unwrap_err();

            assert!(err.is_retryable());
            assert!(!store.statement_log().contains("COMMIT"));
        }

        #[tokio::test]
        async fn test_cancelled_write_commits_nothing() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([vec![developer_row(1)]])
                    .into_connection(),
            );
            let cancel = CancellationToken::new();
            cancel.cancel();

            let err = store
                .service
                .write_graph_cancellable(sample_graph(), cancel)
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::Cancelled));
            let log = store.statement_log();
            assert!(!log.contains("INSERT"));
            assert!(!log.contains("COMMIT"));
        }

        #[tokio::test]
        async fn test_inverted_window_writes_nothing() {
            let store =
                MockStore::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
            let mut graph = sample_graph();
            graph.task.end_timestamp = graph.task.start_timestamp - Duration::hours(1);

            let err = store.service.write_graph(graph).await.unwrap_err();

            assert!(matches!(err, AppError::Invalid(_)));
            assert!(store.transaction_log().is_empty());
        }

        #[tokio::test]
        async fn test_write_report_for_missing_developer() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<developer::Model>::new()])
                    .into_connection(),
            );
            let (_, draft) = sample_graph().into_parts();

            let err = store.service.write_report(99, draft).await.unwrap_err();

            assert!(err.is_not_found());
            let log = store.statement_log();
            assert!(!log.contains("INSERT"));
            assert!(!log.contains("COMMIT"));
        }

        #[tokio::test]
        async fn test_write_report_reuses_existing_developer() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([vec![developer_row(1)]])
                    .append_query_results([vec![project_row(5)]])
                    .append_query_results([vec![report_row(6, 1)]])
                    .append_query_results([vec![task_row(7, 6, 5)]])
                    .into_connection(),
            );
            let (_, draft) = sample_graph().into_parts();

            let written = store.service.write_report(1, draft).await.unwrap();

            assert_eq!(written.report.developer_id, 1);
            assert_eq!(written.task.report_id, written.report.id);
            assert!(!store.statement_log().contains("INSERT INTO \\\"developers\\\""));
        }

        #[tokio::test]
        async fn test_get_by_id_unknown_task_is_not_found() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([Vec::<task::Model>::new()])
                    .into_connection(),
            );

            let err = store
                .service
                .get_by_id(EntityKind::Task, 12345)
                .await
                .unwrap_err();

            assert!(matches!(err, AppError::NotFound(_)));
        }

        #[tokio::test]
        async fn test_save_record_commits() {
            let store = MockStore::new(
                MockDatabase::new(DatabaseBackend::Postgres)
                    .append_query_results([vec![record::Model {
                        id: 1,
                        data: "hello".to_string(),
                        created_at: ts(),
                    }]])
                    .into_connection(),
            );

            let saved = store
                .service
                .save_record(NewRecord::new("hello"))
                .await
                .unwrap();

            assert_eq!(saved.id, 1);
            assert_eq!(saved.data, "hello");
            assert!(store.statement_log().contains("COMMIT"));
        }
    }
}
