//! Read a flat `(timestamp, value)` series for plain metrics.

use std::path::Path;

use crate::error::CsvResult;
use crate::models::TimeseriesPoint;
use crate::parser::{read_csv_file, Row, DEFAULT_DELIMITER};

use super::grouper::TIMESTAMP_COLUMN;

/// Column holding the count for plain metrics.
pub const COUNT_VALUE_COLUMN: &str = "value";

/// Read timestamp/value pairs from `path`, one point per row.
pub fn read_points<P: AsRef<Path>>(path: P) -> CsvResult<Vec<TimeseriesPoint<i64>>> {
    read_points_with_delimiter(path, DEFAULT_DELIMITER)
}

/// Same as [`read_points`] with an explicit delimiter.
pub fn read_points_with_delimiter<P: AsRef<Path>>(
    path: P,
    delimiter: char,
) -> CsvResult<Vec<TimeseriesPoint<i64>>> {
    let table = read_csv_file(path, delimiter)?;
    rows_to_points(&table.rows)
}

/// Convert rows to integer points, preserving row order.
pub fn rows_to_points(rows: &[Row]) -> CsvResult<Vec<TimeseriesPoint<i64>>> {
    rows.iter()
        .map(|row| -> CsvResult<TimeseriesPoint<i64>> {
            Ok(TimeseriesPoint::new(
                row.require(TIMESTAMP_COLUMN)?,
                row.parse::<i64>(COUNT_VALUE_COLUMN)?,
            ))
        })
        .collect()
}
