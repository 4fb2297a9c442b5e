//! LogPulse CLI
//!
//! Command-line interface for the LogPulse request-log metrics service.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use logpulse::api::HttpServer;
use logpulse::models::{EntriesPage, EntriesParams, OverviewSnapshot};
use logpulse::service::MetricsService;
use logpulse::source::LogFileSource;
use logpulse::{telemetry, Config};

/// LogPulse - Metrics from HTTP request logs
#[derive(Parser)]
#[command(name = "logpulse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LOGPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Request log to read (overrides the configured source path)
    #[arg(long, global = true, env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (for commands that support it)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the metrics HTTP API
    Serve {
        /// Host to bind
        #[arg(long, env = "LOGPULSE_HTTP_HOST")]
        host: Option<String>,

        /// HTTP API port
        #[arg(long, env = "LOGPULSE_HTTP_PORT")]
        http_port: Option<u16>,
    },

    /// Print the aggregate overview of the request log
    Overview,

    /// Print the most recent request log entries
    Entries {
        /// Maximum number of entries (most recent are kept)
        #[arg(long)]
        limit: Option<i64>,

        /// Exact HTTP method (GET, POST, ...)
        #[arg(long)]
        method: Option<String>,

        /// Case-insensitive path substring
        #[arg(long)]
        path_contains: Option<String>,

        /// Lowest status code, inclusive
        #[arg(long)]
        status_min: Option<i64>,

        /// Highest status code, inclusive
        #[arg(long)]
        status_max: Option<i64>,
    },

    /// Report how many log lines parse
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// How long a finished command waits for stuck blocking reads before exiting
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> ExitCode {
    // .env is optional, and must be loaded before clap reads `env = ...` args
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = runtime.block_on(run(cli));

    // A read that timed out may still be parked on a blocking thread (FIFO,
    // stalled mount); do not wait on it forever.
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    code
}

async fn run(cli: Cli) -> ExitCode {
    // Load configuration
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = cli.log_file.clone() {
        config.source.path = path;
    }

    // Initialize logging
    let _log_guard = telemetry::init_logging(&config.logging, cli.verbose);

    // Execute command
    let result = match cli.command {
        Commands::Serve { host, http_port } => run_serve(config, host, http_port).await,
        Commands::Overview => run_overview(&config, cli.format).await,
        Commands::Entries {
            limit,
            method,
            path_contains,
            status_min,
            status_max,
        } => {
            let params = EntriesParams {
                limit,
                method,
                path_contains,
                status_min,
                status_max,
            };
            run_entries(&config, &params, cli.format).await
        }
        Commands::Check => run_check(&config, cli.format).await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn log_source(config: &Config) -> LogFileSource {
    LogFileSource::new(&config.source.path, config.source.read_timeout)
}

fn metrics_service(config: &Config) -> MetricsService {
    MetricsService::new(Arc::new(log_source(config)), config.query.clone())
}

async fn run_serve(
    mut config: Config,
    host: Option<String>,
    http_port: Option<u16>,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = http_port {
        config.server.http_port = port;
    }

    let prometheus = if config.telemetry.prometheus {
        Some(telemetry::init_metrics()?)
    } else {
        None
    };

    let addr = config.http_addr();
    info!(
        log_file = %config.source.path.display(),
        "Starting LogPulse metrics API on {}", addr
    );

    let server = HttpServer::new(metrics_service(&config), prometheus);
    server
        .serve(&addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Ctrl+C received, shutting down...");
        })
        .await?;

    Ok(())
}

async fn run_overview(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let snapshot = metrics_service(config).overview().await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print_overview(&snapshot),
    }
    Ok(())
}

async fn run_entries(
    config: &Config,
    params: &EntriesParams,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let page = metrics_service(config).entries(params).await?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Text => print_entries(&page),
    }
    Ok(())
}

async fn run_check(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let source = log_source(config);
    let report = source.read_report().await?;
    let parsed = report.events.len();

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "path": source.path().display().to_string(),
                "lines": report.lines_total,
                "parsed": parsed,
                "rejected": report.lines_rejected,
            })
        ),
        OutputFormat::Text => {
            println!("Log file: {}", source.path().display());
            println!("  Lines:    {}", report.lines_total);
            println!("  Parsed:   {parsed}");
            println!("  Rejected: {}", report.lines_rejected);
        }
    }
    Ok(())
}

fn print_overview(snapshot: &OverviewSnapshot) {
    println!("Total requests:   {}", snapshot.total_requests);
    println!("Avg response (s): {:.6}", snapshot.avg_response_time_seconds);
    println!(
        "Latency (s):      p50 {:.6}  p95 {:.6}  p99 {:.6}  max {:.6}",
        snapshot.latency.p50, snapshot.latency.p95, snapshot.latency.p99, snapshot.latency.max
    );
    println!(
        "Errors:           4xx {}  5xx {}  rate {:.6}",
        snapshot.errors.count_4xx, snapshot.errors.count_5xx, snapshot.errors.error_rate
    );

    if snapshot.top_endpoints.is_empty() {
        return;
    }
    println!();
    println!("{:>8}  PATH", "COUNT");
    for endpoint in snapshot.top_endpoints.iter() {
        println!("{:>8}  {}", endpoint.count, endpoint.path);
    }
}

fn print_entries(page: &EntriesPage) {
    for entry in &page.entries {
        println!(
            "{}  {:<7} {:>3}  {:>10.3}s  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            entry.method,
            entry.status,
            entry.latency_seconds,
            entry.path
        );
    }
    println!("{} entries", page.count);
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "logpulse", &mut io::stdout());
}
