use crate::forecast_data::error::PayloadError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String, #[source] chrono::ParseError),

    #[error("A start and an end date are required unless the default window is used")]
    MissingDate,

    #[error("Start date {start} is more than 3 months before {today}")]
    StartTooEarly { start: NaiveDate, today: NaiveDate },

    #[error("End date {end} is more than 15 days after {today}")]
    EndTooLate { end: NaiveDate, today: NaiveDate },

    #[error("Start date {start} must be before end date {end}")]
    StartNotBeforeEnd { start: NaiveDate, end: NaiveDate },

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode forecast response from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error(transparent)]
    InvalidPayload(#[from] PayloadError),
}
