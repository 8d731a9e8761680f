use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;
use crate::models::pv_forecast::{METRIC_COLUMNS, PvForecastEntry, TIME_COLUMN};

/// Timestamp format used by CBase, naive strings interpreted as UTC
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum ForecastCsvError {
    #[error("missing column in forecast document: {0}")]
    MissingColumn(String),
    #[error("invalid timestamp '{0}' in forecast document")]
    InvalidTimestamp(String),
    #[error("invalid value '{value}' in column {column}")]
    InvalidValue { column: String, value: String },
    #[error("csv document error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parses a raw CBase csv document into forecast entries, preserving row order.
///
/// Headers are matched case-insensitively against the expected column set.
/// A missing column, an unparseable timestamp or a metric token that is
/// neither numeric nor `NA` fails the whole document.
///
/// # Arguments
///
/// * 'raw' - the csv document as returned by the provider
pub fn parse_forecast_csv(raw: &str) -> Result<Vec<PvForecastEntry>, ForecastCsvError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader.headers()?.clone();

    let time_idx = find_column(&headers, TIME_COLUMN)?;
    let mut metric_idx = [0usize; 21];
    for (i, column) in METRIC_COLUMNS.iter().enumerate() {
        metric_idx[i] = find_column(&headers, column)?;
    }

    let mut entries: Vec<PvForecastEntry> = Vec::new();
    for row in reader.records() {
        let record = row?;

        let time = parse_timestamp(record.get(time_idx).unwrap_or(""))?;

        let mut metrics = [None; 21];
        for (i, idx) in metric_idx.iter().enumerate() {
            metrics[i] = parse_metric(METRIC_COLUMNS[i], record.get(*idx).unwrap_or(""))?;
        }

        entries.push(PvForecastEntry::from_columns(time, metrics));
    }

    Ok(entries)
}

/// Returns the position of a named column, matched case-insensitively
///
/// # Arguments
///
/// * 'headers' - the header record of the document
/// * 'name' - the column to look for
fn find_column(headers: &StringRecord, name: &str) -> Result<usize, ForecastCsvError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| ForecastCsvError::MissingColumn(name.to_string()))
}

/// Parses a timestamp cell as naive UTC
///
/// # Arguments
///
/// * 'value' - the cell content
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ForecastCsvError> {
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|_| ForecastCsvError::InvalidTimestamp(value.to_string()))
}

/// Parses a metric cell, where the literal token `NA` (any casing) means
/// "no value" rather than a failure
///
/// # Arguments
///
/// * 'column' - the column name, used in error reporting
/// * 'value' - the cell content
fn parse_metric(column: &str, value: &str) -> Result<Option<f32>, ForecastCsvError> {
    if value.eq_ignore_ascii_case("NA") {
        return Ok(None);
    }

    value.parse::<f32>().map(Some).map_err(|_| ForecastCsvError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    })
}
