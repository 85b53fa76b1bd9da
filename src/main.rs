//! CLI entry point for the deal chart job.
//!
//! With no arguments the job runs once; `schedule` keeps it running on a
//! fixed interval.

use anyhow::Result;
use clap::{Parser, Subcommand};
use deal_chart::config::PipelineConfig;
use deal_chart::infra::store::S3ObjectStore;
use deal_chart::pipeline::{run_once, run_scheduled};
use deal_chart::render::PlottersRenderer;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "deal_chart")]
#[command(about = "Charts the top agents' closed deals from CSVs in S3", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the job once and exit (the default)
    Run,
    /// Run the job immediately and then every 30 minutes
    Schedule,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/deal_chart.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("deal_chart.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::default();

    let aws_config = aws_config::load_from_env().await;
    let store = S3ObjectStore::new(&aws_config, &config.bucket);
    let renderer = PlottersRenderer::default();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let outcome = run_once(&store, &renderer, &config).await?;
            info!(?outcome, "Run finished");
        }
        Commands::Schedule => {
            run_scheduled(&store, &renderer, &config).await?;
        }
    }

    Ok(())
}
