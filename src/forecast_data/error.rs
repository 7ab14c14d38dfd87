use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Failed to read forecast file '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Forecast JSON is malformed or misses a required section")]
    Json(#[from] serde_json::Error),

    #[error("Forecast payload has an empty 'timezone'")]
    EmptyTimezone,

    #[error("Hourly section misses parameters: {}", .0.join(", "))]
    MissingHourlyParams(Vec<String>),

    #[error("Daily field '{field}' has {found} entries, expected {expected}")]
    DailyLengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
}
