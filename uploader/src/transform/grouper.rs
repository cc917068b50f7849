//! Group CSV rows into per-dimension time series.
//!
//! Each row contributes one point to the block keyed by its value in the
//! grouping column:
//!
//! ```text
//! CSV Input (flat rows)              →  Dimensional series
//! ┌─────────────────────────────┐      ┌──────────────────────────┐
//! │ t1, 10, tenantA, prod       │      │ tenantA: [(t1,10),(t3,5)]│
//! │ t2, 20, tenantB, prod       │  →   ├──────────────────────────┤
//! │ t3,  5, tenantA, prod       │      │ tenantB: [(t2,20)]       │
//! └─────────────────────────────┘      └──────────────────────────┘
//! ```
//!
//! Blocks come out in first-seen key order and points keep row order.
//! Duplicate timestamps within a block are kept as separate points.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::{PropertyValueBlock, TimeseriesPoint};
use crate::parser::{read_csv_file, Row, DEFAULT_DELIMITER};

/// Column holding the sample timestamp.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Column holding the usage value for dimensional metrics.
pub const USAGE_VALUE_COLUMN: &str = "value_mb";

/// Read `csv_path` and group its rows by `column`.
///
/// Values are read from [`USAGE_VALUE_COLUMN`] as floats.
pub fn build_series<P: AsRef<Path>>(
    csv_path: P,
    column: &str,
) -> CsvResult<Vec<PropertyValueBlock>> {
    build_series_with_delimiter(csv_path, column, DEFAULT_DELIMITER)
}

/// Same as [`build_series`] with an explicit delimiter.
pub fn build_series_with_delimiter<P: AsRef<Path>>(
    csv_path: P,
    column: &str,
    delimiter: char,
) -> CsvResult<Vec<PropertyValueBlock>> {
    let table = read_csv_file(csv_path, delimiter)?;
    group_rows(&table.rows, column, USAGE_VALUE_COLUMN)
}

/// Group already-parsed rows by `column`, reading values from `value_column`.
///
/// `NaN` and infinities are rejected: JSON has no encoding for them.
pub fn group_rows(
    rows: &[Row],
    column: &str,
    value_column: &str,
) -> CsvResult<Vec<PropertyValueBlock>> {
    let mut grouper = SeriesGrouper::default();

    for row in rows {
        let key = row.require(column)?;
        let point = TimeseriesPoint::new(
            row.require(TIMESTAMP_COLUMN)?,
            finite_value(row, value_column)?,
        );
        grouper.push(key, point);
    }

    let blocks = grouper.finish();
    tracing::debug!(column, rows = rows.len(), groups = blocks.len(), "grouped rows");
    Ok(blocks)
}

fn finite_value(row: &Row, column: &str) -> CsvResult<f64> {
    let value = row.parse::<f64>(column)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CsvError::InvalidValue {
            line: row.line,
            column: column.to_string(),
            value: row.get(column).unwrap_or_default().to_string(),
            message: "value must be a finite number".to_string(),
        })
    }
}

/// Flatten blocks and group them again by `property_value`.
///
/// Grouping is idempotent: the result equals the input whenever the input
/// came from [`group_rows`].
pub fn regroup(blocks: &[PropertyValueBlock]) -> Vec<PropertyValueBlock> {
    let mut grouper = SeriesGrouper::default();

    for block in blocks {
        for point in &block.timeseries_point {
            grouper.push(&block.property_value, point.clone());
        }
    }

    grouper.finish()
}

/// Insertion-ordered accumulator: key -> index into `blocks`.
#[derive(Default)]
struct SeriesGrouper {
    index: HashMap<String, usize>,
    blocks: Vec<PropertyValueBlock>,
}

impl SeriesGrouper {
    fn push(&mut self, key: &str, point: TimeseriesPoint<f64>) {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.blocks.push(PropertyValueBlock::new(key));
                self.index.insert(key.to_string(), self.blocks.len() - 1);
                self.blocks.len() - 1
            }
        };
        self.blocks[idx].timeseries_point.push(point);
    }

    fn finish(self) -> Vec<PropertyValueBlock> {
        self.blocks
    }
}
