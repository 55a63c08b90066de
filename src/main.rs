//! CLI entry point for the lapwise ingestion tool.
//!
//! Provides subcommands for building season lap datasets, listing a season's
//! events, validating a saved lap table and showing the circuit registry.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lapwise::analyzers::analyzer::analyze;
use lapwise::analyzers::writetos3::upload_file_to_s3;
use lapwise::build_season;
use lapwise::config::ProviderConfig;
use lapwise::output::{print_json, save_dataset};
use lapwise::registry::circuits;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "lapwise")]
#[command(about = "Ingest, clean and enrich per-lap race telemetry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the lap dataset for one or more seasons and save it
    Ingest {
        /// Seasons to ingest
        #[arg(short, long, num_args = 1.., default_values_t = [2023, 2024])]
        years: Vec<i32>,

        /// Provider base URL or directory (overrides LAPWISE_SOURCE)
        #[arg(short, long)]
        source: Option<String>,

        /// Directory to write laps, circuits and summaries to
        #[arg(short, long, default_value = "data")]
        output_dir: PathBuf,

        /// Gzip compress output files
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Optional: S3 bucket to upload the written files to
        #[arg(long)]
        s3_bucket: Option<String>,
    },
    /// List a season's events and whether they are ingested
    ListEvents {
        #[arg(short, long)]
        year: i32,

        /// Provider base URL or directory (overrides LAPWISE_SOURCE)
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Print a data quality report for a saved lap table
    Validate {
        /// Lap table written by `ingest` (.csv or .csv.gz)
        #[arg(short, long, default_value = "data/laps.csv")]
        input: PathBuf,
    },
    /// Show the circuit metadata registry
    Tracks,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/lapwise.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("lapwise.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            years,
            source,
            output_dir,
            gzip,
            s3_bucket,
        } => {
            ingest(&years, source, &output_dir, gzip, s3_bucket).await?;
        }
        Commands::ListEvents { year, source } => {
            let provider = ProviderConfig::resolve(source).provider()?;
            let schedule = provider.schedule(year).await?;

            info!(season = year, total = schedule.len(), "Schedule fetched");
            for event in &schedule {
                info!(
                    event = %event.name,
                    format = ?event.format,
                    ingested = event.is_conventional(),
                    "Event"
                );
            }
        }
        Commands::Validate { input } => {
            let report = analyze(&input)?;

            info!(
                total_laps = report.total_laps,
                races = report.races,
                drivers = report.drivers,
                tracks = report.tracks,
                "Dataset"
            );
            info!(
                missing_lap_times = report.missing_lap_times,
                outlier_laps = report.outlier_laps,
                outlier_pct = format!("{:.1}", report.outlier_pct),
                safety_car_laps = report.safety_car_laps,
                safety_car_pct = format!("{:.1}", report.safety_car_pct),
                "Data quality"
            );
            if let Some(times) = &report.lap_times {
                info!(
                    fastest = format!("{:.1}", times.fastest),
                    average = format!("{:.1}", times.average),
                    slowest = format!("{:.1}", times.slowest),
                    stddev = format!("{:.1}", times.stddev),
                    "Lap times (non-outlier)"
                );
            }
            for entry in &report.compounds {
                info!(compound = %entry.compound, laps = entry.laps, "Compound");
            }
            for season in &report.seasons {
                info!(season = season.season, laps = season.laps, races = season.races, "Season");
            }
            debug!("Full report follows");
            print_json(&report)?;
        }
        Commands::Tracks => {
            for row in circuits() {
                info!(
                    track_id = row.track_id,
                    pit_loss_time = row.pit_loss_time,
                    track_length_km = row.track_length_km,
                    "Circuit"
                );
            }
        }
    }

    Ok(())
}

/// Builds the season dataset, saves it and optionally uploads the files.
#[tracing::instrument(skip(source, s3_bucket), fields(output_dir = %output_dir.display()))]
async fn ingest(
    years: &[i32],
    source: Option<String>,
    output_dir: &Path,
    gzip: bool,
    s3_bucket: Option<String>,
) -> Result<()> {
    let config = ProviderConfig::resolve(source);
    info!(source = %config.source, auth = config.api_key.is_some(), "Provider configured");
    let provider = config.provider()?;

    let Some(dataset) = build_season(provider.as_ref(), years).await else {
        error!("No data downloaded; abort.");
        return Ok(());
    };

    for skipped in &dataset.skipped {
        info!(
            season = skipped.season,
            event = %skipped.event_name,
            reason = ?skipped.reason,
            "Skipped session"
        );
    }

    let paths = save_dataset(output_dir, &dataset, gzip)?;
    for path in &paths {
        info!(path = %path.display(), "Written");
    }

    if let Some(bucket) = s3_bucket.filter(|b| !b.is_empty()) {
        let config = aws_config::load_from_env().await;
        let s3 = aws_sdk_s3::Client::new(&config);
        info!(bucket = %bucket, gzip, "S3 upload enabled");

        for path in &paths {
            upload_file_to_s3(&s3, &bucket, "laps", path).await?;
        }
    }

    info!(laps = dataset.len(), "Pipeline done");
    Ok(())
}
