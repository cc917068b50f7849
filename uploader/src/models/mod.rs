//! Payload models for the Pelanor custom metrics API.
//!
//! - [`TimeseriesPoint`] - One `(timestamp, value)` sample
//! - [`PropertyValueBlock`] - The series for one value of a dimension
//! - [`MetricData`] - `Plain` or `Dimensional` metric body
//! - [`MetricPayload`] - The full request body
//!
//! The serde layout matches the API exactly:
//!
//! ```json
//! {
//!   "metric_name": "tenant_usage",
//!   "metric_data": {
//!     "Dimensional": {
//!       "data": [
//!         { "property_value": "acme", "timeseries_point": [
//!             { "timestamp": "2024-05-01", "value": 10.0 } ] }
//!       ],
//!       "property_kind": { "Dimension": "Tenants" }
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Points and blocks
// =============================================================================

/// A single sample. Timestamps are passed through verbatim.
///
/// Dimensional metrics carry `f64` values, plain metrics carry `i64` values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeseriesPoint<V> {
    pub timestamp: String,
    pub value: V,
}

impl<V> TimeseriesPoint<V> {
    pub fn new(timestamp: impl Into<String>, value: V) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// All points sharing one value of the grouping column, in row order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyValueBlock {
    pub property_value: String,
    pub timeseries_point: Vec<TimeseriesPoint<f64>>,
}

impl PropertyValueBlock {
    pub fn new(property_value: impl Into<String>) -> Self {
        Self {
            property_value: property_value.into(),
            timeseries_point: Vec::new(),
        }
    }

    /// Number of points in this block.
    pub fn len(&self) -> usize {
        self.timeseries_point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeseries_point.is_empty()
    }
}

// =============================================================================
// Metric body
// =============================================================================

/// How a dimensional metric is partitioned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PropertyKind {
    /// Named dimension, e.g. `"Tenants"` or `"Environment"`.
    Dimension(String),
}

/// Body of a metric: one flat series, or one series per dimension value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MetricData {
    Plain {
        data: Vec<TimeseriesPoint<i64>>,
    },
    Dimensional {
        data: Vec<PropertyValueBlock>,
        property_kind: PropertyKind,
    },
}

/// Request body for `POST /custom-metrics`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPayload {
    pub metric_name: String,
    pub metric_data: MetricData,
}

impl MetricPayload {
    /// Assemble a plain metric.
    pub fn plain(metric_name: impl Into<String>, points: Vec<TimeseriesPoint<i64>>) -> Self {
        Self {
            metric_name: metric_name.into(),
            metric_data: MetricData::Plain { data: points },
        }
    }

    /// Assemble a dimensional metric partitioned by `dimension_name`.
    pub fn dimensional(
        metric_name: impl Into<String>,
        dimension_name: impl Into<String>,
        series: Vec<PropertyValueBlock>,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            metric_data: MetricData::Dimensional {
                data: series,
                property_kind: PropertyKind::Dimension(dimension_name.into()),
            },
        }
    }

    /// Dimension name, for dimensional metrics.
    pub fn dimension_name(&self) -> Option<&str> {
        match &self.metric_data {
            MetricData::Dimensional {
                property_kind: PropertyKind::Dimension(name),
                ..
            } => Some(name),
            MetricData::Plain { .. } => None,
        }
    }

    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        match &self.metric_data {
            MetricData::Plain { data } => data.len(),
            MetricData::Dimensional { data, .. } => data.iter().map(|b| b.len()).sum(),
        }
    }
}
