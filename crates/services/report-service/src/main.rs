//! Report Service - operator CLI for the report store.

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{AppError, AppResult};
use domain::{EntityGraph, EntityKind, NewDeveloper, NewProject, NewRecord, NewTask};
use report_service_lib::config::ReportServiceConfig;
use report_service_lib::service::ReportService;
use report_service_lib::MigrateAction;

#[derive(Parser, Debug)]
#[command(name = "report-service")]
#[command(author, version, about = "Developer report store", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    #[command(flatten)]
    Store(StoreCommands),
}

/// Commands that need a connected, migrated store
#[derive(Subcommand, Debug)]
enum StoreCommands {
    /// Write developer, project, report and task in one transaction
    WriteGraph(WriteGraphArgs),
    /// Print one row as JSON
    Get {
        /// developer, project, report, task or record
        kind: EntityKind,
        id: i32,
    },
    /// Opaque record commands
    Record {
        #[command(subcommand)]
        action: RecordCommands,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand, Debug)]
enum RecordCommands {
    /// Store a payload
    Save { data: String },
    /// Print a stored record
    Get { id: i32 },
}

#[derive(Args, Debug)]
struct WriteGraphArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    project: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Task name
    #[arg(long)]
    task: String,
    #[arg(long)]
    note: Option<String>,
    /// Planned estimate in minutes
    #[arg(long, default_value_t = 0)]
    planned: i32,
    /// Progress in minutes
    #[arg(long, default_value_t = 0)]
    progress: i32,
    /// RFC 3339 start time, defaults to now
    #[arg(long)]
    start: Option<DateTime<Utc>>,
    /// RFC 3339 end time, defaults to one hour after start
    #[arg(long)]
    end: Option<DateTime<Utc>>,
}

impl WriteGraphArgs {
    fn into_graph(self) -> AppResult<EntityGraph> {
        let start = self.start.unwrap_or_else(Utc::now);
        let end = match self.end {
            Some(end) => end,
            None => start.checked_add_signed(Duration::hours(1)).ok_or_else(|| {
                AppError::Invalid(format!("No default end one hour after {}", start))
            })?,
        };

        Ok(EntityGraph::new(
            NewDeveloper::new(self.first_name, self.last_name),
            NewProject::new(self.project, self.description),
            NewTask {
                name: self.task,
                developer_note: self.note,
                estimate_planned: self.planned,
                estimate_progress: self.progress,
                start_timestamp: start,
                end_timestamp: end,
            },
        ))
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ReportServiceConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    if let Err(e) = run(cli.command, config).await {
        tracing::error!(code = e.code(), "Command failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: ReportServiceConfig) -> AppResult<()> {
    match command {
        Commands::Migrate { action } => {
            let action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            report_service_lib::run_migrations(&config, action).await
        }
        Commands::Store(command) => run_store(command, &config).await,
    }
}

async fn run_store(command: StoreCommands, config: &ReportServiceConfig) -> AppResult<()> {
    let (db, service) = report_service_lib::connect(config).await?;

    let result = match command {
        StoreCommands::WriteGraph(args) => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupted, rolling back");
                    on_interrupt.cancel();
                }
            });

            match args.into_graph() {
                Ok(graph) => service
                    .write_graph_cancellable(graph, cancel)
                    .await
                    .and_then(|written| print_json(&written)),
                Err(e) => Err(e),
            }
        }
        StoreCommands::Get { kind, id } => service
            .get_by_id(kind, id)
            .await
            .and_then(|entity| print_json(&entity)),
        StoreCommands::Record { action } => match action {
            RecordCommands::Save { data } => service
                .save_record(NewRecord::new(data))
                .await
                .and_then(|record| print_json(&record)),
            RecordCommands::Get { id } => service
                .get_record(id)
                .await
                .and_then(|record| print_json(&record)),
        },
    };

    // Release the service's pool handles so the close below is final
    drop(service);
    if let Err(e) = db.close().await {
        tracing::warn!("Closing connection pool failed: {}", e);
    }
    result
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::internal("encode", e.to_string()))?;
    println!("{}", json);
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
