use crate::types::metric::Metric;
use thiserror::Error;

/// Failure of a single aggregation pass. Any of these discards the whole pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    #[error("Invalid hour window ({start}, {end}) for parameter '{parameter}' on day {day}")]
    InvalidWindow {
        parameter: String,
        day: usize,
        start: i64,
        end: i64,
    },

    #[error("Hour window ({start}, {end}) for parameter '{parameter}' on day {day} exceeds the {available} available samples")]
    WindowOutOfRange {
        parameter: String,
        day: usize,
        start: i64,
        end: i64,
        available: usize,
    },

    #[error("No hour window given for day {0}")]
    MissingWindow(usize),

    #[error("No hourly series for parameter '{0}'")]
    MissingSeries(String),

    #[error("Metric '{metric}' of parameter '{parameter}' is not an aggregation")]
    UnsupportedMetric { parameter: String, metric: Metric },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Timestamp {0} is out of the representable range")]
    InvalidTimestamp(f64),

    #[error("Failed to parse ISO-8601 timestamp '{0}'")]
    InvalidIsoTimestamp(String, #[source] chrono::ParseError),

    #[error("Daily field '{field}' has no value for day {day}")]
    MissingDailyValue { field: &'static str, day: usize },

    #[error("Hourly series '{0}' is missing from the payload")]
    MissingSeries(String),

    #[error("Malformed series length for '{parameter}': expected {expected} samples ({days} days), found {found}")]
    MalformedSeriesLength {
        parameter: String,
        days: usize,
        expected: usize,
        found: usize,
    },

    #[error("Aggregation pass '{label}' failed")]
    Aggregation {
        label: String,
        #[source]
        source: AggregationError,
    },

    #[error("Column '{column}' has {found} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}
