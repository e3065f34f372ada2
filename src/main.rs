use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use seat_allocator::allocation::{AllocationOrchestrator, run_scheduled};
use seat_allocator::api::{AppState, create_router};
use seat_allocator::config::ConfigLoader;
use seat_allocator::error::EngineError;
use seat_allocator::store::{InMemoryStore, StoreError, StoreSnapshot};
use seat_allocator::telemetry::{self, TelemetryError};
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "seat-allocator",
    about = "Allocate office seats and work-from-home days",
    version
)]
struct Cli {
    /// Directory holding scoring.yaml, wfh_limits.yaml and runtime.yaml
    #[arg(
        long,
        global = true,
        env = "SEAT_ALLOCATOR_CONFIG",
        default_value = "./config/default"
    )]
    config: PathBuf,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Allocate one branch of one company and print the report
    Allocate(AllocateArgs),
    /// Allocate every company and print the summary
    Schedule(ScheduleArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// JSON snapshot to load into the in-memory store
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AllocateArgs {
    /// JSON snapshot to load into the in-memory store
    #[arg(long)]
    data: PathBuf,
    /// Company to allocate
    #[arg(long)]
    company: String,
    /// Branch whose seats are assigned
    #[arg(long)]
    branch: String,
    /// Allocation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Save the updated store back to the snapshot file
    #[arg(long)]
    write_back: bool,
}

#[derive(Args, Debug)]
struct ScheduleArgs {
    /// JSON snapshot to load into the in-memory store
    #[arg(long)]
    data: PathBuf,
    /// Allocation date (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Save the updated store back to the snapshot file
    #[arg(long)]
    write_back: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to render output: {0}")]
    Json(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();
    let loader = ConfigLoader::load(&cli.config)?;
    telemetry::init(loader.runtime())?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(loader, args).await,
        Command::Allocate(args) => run_allocate(loader, args).await,
        Command::Schedule(args) => run_schedule(loader, args).await,
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn open_store(data: Option<&Path>) -> Result<Arc<InMemoryStore>, CliError> {
    let snapshot = match data {
        Some(path) => StoreSnapshot::load(path)?,
        None => StoreSnapshot::default(),
    };
    Ok(Arc::new(InMemoryStore::from_snapshot(snapshot)))
}

fn save_store(store: &InMemoryStore, path: &Path) -> Result<(), CliError> {
    store.snapshot()?.save(path)?;
    info!(path = %path.display(), "Snapshot written back");
    Ok(())
}

async fn run_server(mut loader: ConfigLoader, mut args: ServeArgs) -> Result<(), CliError> {
    let runtime = loader.config_mut().runtime_mut();
    if let Some(host) = args.host.take() {
        runtime.server.host = host;
    }
    if let Some(port) = args.port.take() {
        runtime.server.port = port;
    }

    let addr = loader.runtime().server.socket_addr()?;
    let store = open_store(args.data.as_deref())?;
    let orchestrator = AllocationOrchestrator::new(store, loader.config().clone());
    let app = create_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "seat allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_allocate(loader: ConfigLoader, args: AllocateArgs) -> Result<(), CliError> {
    let store = open_store(Some(args.data.as_path()))?;
    let orchestrator = AllocationOrchestrator::new(store.clone(), loader.config().clone());
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let company = args.company.clone();
    let branch = args.branch.clone();
    let result = tokio::task::spawn_blocking(move || orchestrator.run_branch(&company, &branch, date))
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    // Partial writes still changed the store; persist them so a re-run
    // starts from what actually happened.
    if args.write_back {
        save_store(&store, &args.data)?;
    }

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

async fn run_schedule(loader: ConfigLoader, args: ScheduleArgs) -> Result<(), CliError> {
    let store = open_store(Some(args.data.as_path()))?;
    let orchestrator = AllocationOrchestrator::new(store.clone(), loader.config().clone());
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    let summary = run_scheduled(orchestrator, date).await?;

    if args.write_back {
        save_store(&store, &args.data)?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
