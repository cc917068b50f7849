//! CSV reader with encoding auto-detection.
//!
//! Turns a CSV file into [`Row`]s keyed by header name. No metric-specific
//! logic here; see [`crate::transform`] for that.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CsvError, CsvResult};

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// One data row: column name -> raw string value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based line in the source file (header is line 1).
    pub line: usize,
    values: HashMap<String, String>,
}

impl Row {
    pub fn new(line: usize, values: HashMap<String, String>) -> Self {
        Self { line, values }
    }

    /// Raw value of `column`, if the row has it.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Raw value of `column`, or [`CsvError::MissingColumn`].
    pub fn require(&self, column: &str) -> CsvResult<&str> {
        self.get(column).ok_or_else(|| CsvError::MissingColumn {
            line: self.line,
            column: column.to_string(),
        })
    }

    /// Parse `column` as a number.
    pub fn parse<T>(&self, column: &str) -> CsvResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.require(column)?;
        raw.trim().parse::<T>().map_err(|e| CsvError::InvalidValue {
            line: self.line,
            column: column.to_string(),
            value: raw.to_string(),
            message: e.to_string(),
        })
    }
}

/// Result of reading a file, with metadata
#[derive(Debug, Clone)]
pub struct CsvTable {
    /// Column headers
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<Row>,
    /// Detected encoding
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding label.
///
/// Latin-1 is read as Windows-1252 (its superset). Unknown labels fall back
/// to Windows-1252 as well.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let codec = match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => encoding_rs::UTF_8,
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::WINDOWS_1252,
        label => encoding_rs::Encoding::for_label(label.as_bytes())
            .unwrap_or(encoding_rs::WINDOWS_1252),
    };
    codec.decode(bytes).0.into_owned()
}

/// Parse CSV text with an explicit delimiter.
///
/// The first record is the header. Blank lines are skipped and header names
/// are trimmed; field values are kept verbatim. Rows shorter than the header
/// simply lack the trailing columns. Empty input yields no headers and no rows.
pub fn parse_csv(content: &str, delimiter: char) -> CsvResult<(Vec<String>, Vec<Row>)> {
    if content.trim().is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_byte(delimiter)?)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        let values = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();

        rows.push(Row::new(line, values));
    }

    Ok((headers, rows))
}

/// Read a CSV file, auto-detecting its encoding.
pub fn read_csv_file<P: AsRef<Path>>(path: P, delimiter: char) -> CsvResult<CsvTable> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| CsvError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    parse_bytes(&bytes, delimiter)
}

/// Parse CSV bytes, auto-detecting their encoding.
pub fn parse_bytes(bytes: &[u8], delimiter: char) -> CsvResult<CsvTable> {
    // Valid UTF-8 is taken as-is; detection only runs on legacy exports.
    let (encoding, content) = match std::str::from_utf8(bytes) {
        Ok(text) => ("utf-8".to_string(), text.to_string()),
        Err(_) => {
            let encoding = detect_encoding(bytes);
            let content = decode_content(bytes, &encoding);
            (encoding, content)
        }
    };
    let (headers, rows) = parse_csv(&content, delimiter)?;

    tracing::debug!(
        encoding = %encoding,
        columns = ?headers,
        rows = rows.len(),
        "parsed CSV"
    );

    Ok(CsvTable {
        headers,
        rows,
        encoding,
    })
}

fn delimiter_byte(delimiter: char) -> CsvResult<u8> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(CsvError::ParseError(format!(
            "delimiter '{}' is not a single-byte character",
            delimiter
        )))
    }
}
