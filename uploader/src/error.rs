//! Error types for the custom metrics uploader.
//!
//! One error type per layer:
//!
//! - [`ConfigError`] - Missing or invalid configuration
//! - [`CsvError`] - CSV reading and row parsing errors
//! - [`UploadError`] - Fatal errors talking to the metrics API
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! A rejected upload (non-2xx status) is *not* an error: it is reported
//! through [`crate::client::UploadOutcome::Rejected`] and the run continues.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required API token is not set (or is empty).
    #[error("{0} missing; set it in .env or env vars")]
    MissingToken(&'static str),
}

// =============================================================================
// CSV Errors
// =============================================================================

/// Errors while reading a CSV file or turning its rows into points.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Cannot read file '{}': {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV (unbalanced quotes, bad UTF-8 after decoding, ...).
    #[error("Invalid CSV format: {0}")]
    ParseError(String),

    /// A column needed for the metric is absent from a row.
    #[error("Line {line}: missing column '{column}'")]
    MissingColumn { line: usize, column: String },

    /// A value could not be parsed as a number.
    #[error("Line {line}, column '{column}' (value '{value}'): {message}")]
    InvalidValue {
        line: usize,
        column: String,
        value: String,
        message: String,
    },
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        CsvError::ParseError(err.to_string())
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Fatal errors from the metrics API client.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    /// The API accepted the metric but the body was not JSON.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run_dimensional`]
/// and [`crate::transform::pipeline::run_plain`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Upload error.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
