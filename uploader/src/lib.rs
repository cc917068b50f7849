//! # pelanor-metrics - CSV usage data to Pelanor custom metrics
//!
//! Reads usage exports from CSV and uploads them to the Pelanor custom
//! metrics API, either as dimensional metrics (one series per tenant,
//! environment, ...) or as a plain series.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│  Transform  │────▶│  Pelanor    │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (group/flat)│     │  API (POST) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pelanor_metrics::{run_plain, MetricsClient, PlainOptions, UploaderConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = MetricsClient::new(UploaderConfig::from_env().unwrap()).unwrap();
//!     let report = run_plain(&client, &PlainOptions::default()).await.unwrap();
//!     println!("{}", report.status_line());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per layer
//! - [`config`] - Token and endpoint configuration
//! - [`models`] - API payload types
//! - [`parser`] - CSV reading with encoding detection
//! - [`transform`] - Grouping, flat series, and pipeline
//! - [`client`] - Custom metrics API client
//! - [`logs`] - Operator status lines

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// HTTP
pub mod client;

// Output
pub mod logs;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::UploaderConfig;

pub use error::{ConfigError, CsvError, PipelineError, UploadError};

pub use models::{MetricData, MetricPayload, PropertyKind, PropertyValueBlock, TimeseriesPoint};

pub use parser::{read_csv_file, parse_bytes, parse_csv, CsvTable, Row};

pub use transform::{
    build_series,
    group_rows,
    read_points,
    regroup,
    build_dimensional_payloads,
    build_plain_payload,
    run_dimensional,
    run_plain,
    DimensionSpec,
    DimensionalOptions,
    MetricReport,
    PlainOptions,
};

pub use client::{MetricsClient, UploadOutcome};
