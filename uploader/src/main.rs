//! pelanor-metrics CLI - Upload CSV usage data as Pelanor custom metrics
//!
//! ```bash
//! pelanor-metrics dimensional              # tenant_env_usage.csv -> tenant_usage, environment_usage
//! pelanor-metrics plain                    # dau_timeseries.csv -> Daily Active Users
//! pelanor-metrics plain --dry-run          # Print the payload instead of sending it
//! ```
//!
//! `PELANOR_API_TOKEN` must be set (directly or via `.env`) unless `--dry-run`
//! is given. Set `RUST_LOG=debug` for request diagnostics on stderr.

use clap::{Parser, Subcommand};
use pelanor_metrics::transform::{DAU_CSV_FILE, DAU_METRIC_NAME, USAGE_CSV_FILE};
use pelanor_metrics::{
    build_dimensional_payloads, build_plain_payload, run_dimensional, run_plain,
    DimensionSpec, DimensionalOptions, MetricsClient, PlainOptions, UploaderConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pelanor-metrics")]
#[command(about = "Upload CSV usage data to Pelanor as custom metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload tenant_usage and environment_usage dimensional metrics
    Dimensional {
        /// Input CSV file (timestamp, value_mb, tenant, environment)
        #[arg(short, long, default_value = USAGE_CSV_FILE)]
        input: PathBuf,

        /// CSV delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Print payloads as JSON instead of uploading
        #[arg(long)]
        dry_run: bool,
    },

    /// Upload a plain time series (Daily Active Users)
    Plain {
        /// Input CSV file (timestamp, value)
        #[arg(short, long, default_value = DAU_CSV_FILE)]
        input: PathBuf,

        /// Metric name
        #[arg(short, long, default_value = DAU_METRIC_NAME)]
        metric_name: String,

        /// CSV delimiter
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Print the payload as JSON instead of uploading
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dimensional {
            input,
            delimiter,
            dry_run,
        } => {
            let options = DimensionalOptions {
                csv_path: input,
                delimiter,
                dimensions: DimensionSpec::defaults(),
            };
            cmd_dimensional(&options, dry_run).await
        }

        Commands::Plain {
            input,
            metric_name,
            delimiter,
            dry_run,
        } => {
            let options = PlainOptions {
                csv_path: input,
                delimiter,
                metric_name,
            };
            cmd_plain(&options, dry_run).await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Token first: a missing token aborts before the CSV is opened.
fn connect() -> Result<MetricsClient, Box<dyn std::error::Error>> {
    let config = UploaderConfig::from_env()?;
    tracing::debug!(?config, "loaded configuration");
    Ok(MetricsClient::new(config)?)
}

async fn cmd_dimensional(
    options: &DimensionalOptions,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if dry_run {
        let payloads = build_dimensional_payloads(options)?;
        println!("{}", serde_json::to_string_pretty(&payloads)?);
        return Ok(());
    }

    let client = connect()?;
    let reports = run_dimensional(&client, options).await?;

    let created = reports.iter().filter(|r| r.outcome.is_created()).count();
    eprintln!("\n✨ Done! {}/{} metrics created", created, reports.len());
    Ok(())
}

async fn cmd_plain(options: &PlainOptions, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    if dry_run {
        let payload = build_plain_payload(options)?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let client = connect()?;
    run_plain(&client, options).await?;

    eprintln!("\n✨ Done!");
    Ok(())
}
