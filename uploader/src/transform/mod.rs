//! Transformation module.
//!
//! This module turns CSV rows into metric payloads:
//! - Grouper: rows to per-dimension series
//! - Points: rows to a flat series
//! - Pipeline: read, build, upload, report

pub mod grouper;
pub mod pipeline;
pub mod points;

pub use grouper::{build_series, group_rows, regroup};
pub use pipeline::*;
pub use points::read_points;
