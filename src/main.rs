//! CLI entry point for the climate rater.
//!
//! Each subcommand answers one read-only query over a climate data export and
//! prints the JSON body to stdout (or writes it to `--output`).

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use climate_rater::analyzers::analyzer::{analyze_trends, summarize};
use climate_rater::analyzers::weights::QualityWeights;
use climate_rater::catalog;
use climate_rater::fetch::BasicClient;
use climate_rater::fetch::auth::ApiKey;
use climate_rater::filters::{self, FilterDescriptor, FilterParams};
use climate_rater::model::ClimateRow;
use climate_rater::output::{emit, write_rows_csv};
use climate_rater::responses::{ClimateListing, DataResponse};
use climate_rater::store::{ClimateStore, CsvStore, HttpCsvStore};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "climate_rater")]
#[command(about = "Filter, summarize and analyze climate observations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// CSV export path or http(s) URL; defaults to $CLIMATE_DATA_SOURCE
    #[arg(short, long, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List filtered readings ordered by date (CSV when --output ends in .csv)
    Climate {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterParams,
    },
    /// List the locations present in the data
    Locations {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the metrics present in the data with their units
    Metrics {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Quality-weighted summary statistics per metric
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterParams,
    },
    /// Trend, anomalies and seasonality per metric
    Trends {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filters: FilterParams,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/climate_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("climate_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Climate { source, filters: params } => {
            let filter = filters::resolve(&params)?;
            let rows = load(&source, &filter).await?;
            info!(rows = rows.len(), "Climate query complete");

            match source.output.as_deref() {
                Some(path) if path.extension() == Some(OsStr::new("csv")) => {
                    write_rows_csv(path, &rows)?
                }
                path => emit(path, &ClimateListing::new(rows))?,
            }
        }
        Commands::Locations { source } => {
            let rows = load(&source, &FilterDescriptor::default()).await?;
            emit(source.output.as_deref(), &DataResponse::new(catalog::locations(&rows)))?;
        }
        Commands::Metrics { source } => {
            let rows = load(&source, &FilterDescriptor::default()).await?;
            emit(source.output.as_deref(), &DataResponse::new(catalog::metrics(&rows)))?;
        }
        Commands::Summary { source, filters: params } => {
            let filter = filters::resolve(&params)?;
            let rows = load(&source, &filter).await?;
            let summary = summarize(&rows, &QualityWeights::default());
            emit(source.output.as_deref(), &DataResponse::new(summary))?;
        }
        Commands::Trends { source, filters: params } => {
            let filter = filters::resolve(&params)?;
            let rows = load(&source, &filter).await?;
            let trends = analyze_trends(&rows);
            emit(source.output.as_deref(), &DataResponse::new(trends))?;
        }
    }

    Ok(())
}

/// Picks a store for the configured source and fetches the filtered rows.
async fn load(args: &SourceArgs, filter: &FilterDescriptor) -> Result<Vec<ClimateRow>> {
    let source = match &args.source {
        Some(s) => s.clone(),
        None => std::env::var("CLIMATE_DATA_SOURCE")
            .context("No --source given and CLIMATE_DATA_SOURCE is not set")?,
    };

    let store = open_store(&source)?;
    store.fetch_rows(filter).await
}

/// Files are read directly; http(s) sources are downloaded, with a bearer
/// token from `CLIMATE_DATA_TOKEN` when set.
fn open_store(source: &str) -> Result<Box<dyn ClimateStore>> {
    if !source.starts_with("http") {
        return Ok(Box::new(CsvStore::new(source)));
    }

    let client = BasicClient::new()?;
    match std::env::var("CLIMATE_DATA_TOKEN") {
        Ok(token) => Ok(Box::new(HttpCsvStore::new(ApiKey::bearer(client, &token)?, source))),
        Err(_) => Ok(Box::new(HttpCsvStore::new(client, source))),
    }
}
