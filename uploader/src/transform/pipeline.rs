//! End-to-end runs: read CSV → build payload(s) → upload → report.
//!
//! # Example
//!
//! ```rust,ignore
//! use pelanor_metrics::{run_dimensional, DimensionalOptions, MetricsClient, UploaderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetricsClient::new(UploaderConfig::from_env()?)?;
//!     let reports = run_dimensional(&client, &DimensionalOptions::default()).await?;
//!     println!("{} metrics sent", reports.len());
//!     Ok(())
//! }
//! ```
//!
//! The caller builds the [`MetricsClient`] (and therefore validates the API
//! token) before any file is touched. All payloads of a run are built before
//! the first request, so a malformed CSV sends nothing. A rejected metric
//! does not stop the remaining ones.

use std::path::PathBuf;

use crate::client::{MetricsClient, UploadOutcome};
use crate::error::{CsvResult, PipelineResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::MetricPayload;
use crate::parser::{read_csv_file, DEFAULT_DELIMITER};

use super::grouper::{group_rows, USAGE_VALUE_COLUMN};
use super::points::rows_to_points;

/// Default input for dimensional metrics.
pub const USAGE_CSV_FILE: &str = "tenant_env_usage.csv";

/// Default input for the plain metric.
pub const DAU_CSV_FILE: &str = "dau_timeseries.csv";

/// Default plain metric name.
pub const DAU_METRIC_NAME: &str = "Daily Active Users";

/// One dimensional metric to derive from the usage CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSpec {
    /// Metric name sent to the API
    pub metric_name: String,
    /// CSV column to group by
    pub column: String,
    /// Dimension name sent as `property_kind`
    pub dimension_name: String,
}

impl DimensionSpec {
    pub fn new(
        metric_name: impl Into<String>,
        column: impl Into<String>,
        dimension_name: impl Into<String>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            column: column.into(),
            dimension_name: dimension_name.into(),
        }
    }

    /// `tenant_usage` by tenant, then `environment_usage` by environment.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("tenant_usage", "tenant", "Tenants"),
            Self::new("environment_usage", "environment", "Environment"),
        ]
    }
}

/// Options for [`run_dimensional`]
#[derive(Debug, Clone)]
pub struct DimensionalOptions {
    pub csv_path: PathBuf,
    pub delimiter: char,
    /// Metrics to build, posted in this order
    pub dimensions: Vec<DimensionSpec>,
}

impl Default for DimensionalOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(USAGE_CSV_FILE),
            delimiter: DEFAULT_DELIMITER,
            dimensions: DimensionSpec::defaults(),
        }
    }
}

/// Options for [`run_plain`]
#[derive(Debug, Clone)]
pub struct PlainOptions {
    pub csv_path: PathBuf,
    pub delimiter: char,
    pub metric_name: String,
}

impl Default for PlainOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DAU_CSV_FILE),
            delimiter: DEFAULT_DELIMITER,
            metric_name: DAU_METRIC_NAME.to_string(),
        }
    }
}

/// Result of uploading one metric
#[derive(Debug, Clone, PartialEq)]
pub struct MetricReport {
    pub metric_name: String,
    pub dimension: Option<String>,
    pub outcome: UploadOutcome,
}

impl MetricReport {
    /// Operator-facing summary, e.g. `tenant_usage (Tenants) created – id abc`.
    pub fn status_line(&self) -> String {
        let label = match &self.dimension {
            Some(dim) => format!("{} ({})", self.metric_name, dim),
            None => self.metric_name.clone(),
        };

        match &self.outcome {
            UploadOutcome::Created { id } => format!(
                "{} created – id {}",
                label,
                id.as_deref().unwrap_or("<none>")
            ),
            UploadOutcome::Rejected { status, body } => {
                format!("{} failed – {} {}", self.metric_name, status, body)
            }
        }
    }

    fn log(&self) {
        match self.outcome {
            UploadOutcome::Created { .. } => log_success(self.status_line()),
            UploadOutcome::Rejected { .. } => log_error(self.status_line()),
        }
    }
}

/// Read the usage CSV once and build one payload per [`DimensionSpec`].
pub fn build_dimensional_payloads(options: &DimensionalOptions) -> CsvResult<Vec<MetricPayload>> {
    let table = read_csv_file(&options.csv_path, options.delimiter)?;

    options
        .dimensions
        .iter()
        .map(|dim| -> CsvResult<MetricPayload> {
            let series = group_rows(&table.rows, &dim.column, USAGE_VALUE_COLUMN)?;
            Ok(MetricPayload::dimensional(
                &dim.metric_name,
                &dim.dimension_name,
                series,
            ))
        })
        .collect()
}

/// Read the DAU CSV and build the plain payload.
pub fn build_plain_payload(options: &PlainOptions) -> CsvResult<MetricPayload> {
    let table = read_csv_file(&options.csv_path, options.delimiter)?;
    let points = rows_to_points(&table.rows)?;
    Ok(MetricPayload::plain(&options.metric_name, points))
}

/// Build and upload every dimensional metric.
pub async fn run_dimensional(
    client: &MetricsClient,
    options: &DimensionalOptions,
) -> PipelineResult<Vec<MetricReport>> {
    log_info(format!("📖 Reading {}", options.csv_path.display()));
    let payloads = build_dimensional_payloads(options)?;

    let mut reports = Vec::with_capacity(payloads.len());
    for payload in &payloads {
        reports.push(upload(client, payload).await?);
    }
    Ok(reports)
}

/// Build and upload the plain metric.
pub async fn run_plain(client: &MetricsClient, options: &PlainOptions) -> PipelineResult<MetricReport> {
    log_info(format!("📖 Reading {}", options.csv_path.display()));
    let payload = build_plain_payload(options)?;
    upload(client, &payload).await
}

async fn upload(client: &MetricsClient, payload: &MetricPayload) -> PipelineResult<MetricReport> {
    log_info_indent(
        format!(
            "Posting {} ({} points) to {}",
            payload.metric_name,
            payload.point_count(),
            client.url()
        ),
        1,
    );
    if payload.point_count() == 0 {
        log_warning(format!("{} has no points; sending an empty series", payload.metric_name));
    }

    let outcome = client.post_metric(payload).await?;
    let report = MetricReport {
        metric_name: payload.metric_name.clone(),
        dimension: payload.dimension_name().map(str::to_string),
        outcome,
    };
    report.log();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dimensions() {
        let dims = DimensionSpec::defaults();
        assert_eq!(dims[0], DimensionSpec::new("tenant_usage", "tenant", "Tenants"));
        assert_eq!(
            dims[1],
            DimensionSpec::new("environment_usage", "environment", "Environment")
        );
    }

    #[test]
    fn test_status_line_created() {
        let report = MetricReport {
            metric_name: "tenant_usage".into(),
            dimension: Some("Tenants".into()),
            outcome: UploadOutcome::Created { id: Some("abc".into()) },
        };
        assert_eq!(report.status_line(), "tenant_usage (Tenants) created – id abc");
    }

    #[test]
    fn test_status_line_rejected() {
        let report = MetricReport {
            metric_name: "Daily Active Users".into(),
            dimension: None,
            outcome: UploadOutcome::Rejected { status: 500, body: "server error".into() },
        };
        assert_eq!(report.status_line(), "Daily Active Users failed – 500 server error");
    }
}
