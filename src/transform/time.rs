//! Conversion of unix timestamps into local ISO-8601 strings or UTC hours.

use crate::transform::error::TransformError;
use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;

/// A way of rendering epoch-second values, picked by type.
///
/// [`LocalDateTime`] yields ISO-8601 strings in a named IANA zone and [`UtcHour`]
/// yields the hour-of-day of each value read as UTC. Both accept whole (`i64`) or
/// fractional (`f64`) seconds.
pub trait Normalization<T> {
    type Output;

    fn apply(&self, timestamps: &[T]) -> Result<Self::Output, TransformError>;
}

/// ISO-8601 string in the named IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalDateTime<'a>(pub &'a str);

/// Hour-of-day (0–23) of the value read as UTC epoch seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtcHour;

impl Normalization<i64> for LocalDateTime<'_> {
    type Output = Vec<String>;

    fn apply(&self, timestamps: &[i64]) -> Result<Vec<String>, TransformError> {
        to_local_iso(timestamps, self.0)
    }
}

impl Normalization<f64> for LocalDateTime<'_> {
    type Output = Vec<String>;

    fn apply(&self, timestamps: &[f64]) -> Result<Vec<String>, TransformError> {
        let tz = parse_timezone(self.0)?;
        timestamps
            .iter()
            .map(|&ts| epoch_to_utc(ts).map(|utc| render_local(utc, tz)))
            .collect()
    }
}

impl Normalization<f64> for UtcHour {
    type Output = Vec<i64>;

    fn apply(&self, values: &[f64]) -> Result<Vec<i64>, TransformError> {
        utc_hour_of_day(values)
    }
}

impl Normalization<i64> for UtcHour {
    type Output = Vec<i64>;

    fn apply(&self, values: &[i64]) -> Result<Vec<i64>, TransformError> {
        Ok(values.iter().map(|&ts| ts.div_euclid(3600).rem_euclid(24)).collect())
    }
}

/// Normalizes epoch-second values according to `mode`.
///
/// `UtcHour` is also used on durations: a duration in seconds read as an offset
/// from the epoch yields `floor(duration / 3600) mod 24`, i.e. the duration
/// truncated to whole hours. 16h59m59s gives 16, never 17.
///
/// # Errors
///
/// * [`TransformError::UnknownTimezone`] if the timezone name is not an IANA zone.
/// * [`TransformError::InvalidTimestamp`] if a value is not finite or out of range.
///
/// # Examples
///
/// ```
/// use forecast_etl::{normalize, LocalDateTime, UtcHour};
///
/// let iso = normalize(&[1746378000_i64], LocalDateTime("Asia/Novosibirsk")).unwrap();
/// assert_eq!(iso, vec!["2025-05-05T00:00:00+07:00"]);
///
/// let hours = normalize(&[16.0 * 3600.0 + 3599.0], UtcHour).unwrap();
/// assert_eq!(hours, vec![16]);
/// ```
pub fn normalize<T, M>(timestamps: &[T], mode: M) -> Result<M::Output, TransformError>
where
    M: Normalization<T>,
{
    mode.apply(timestamps)
}

/// Renders whole-second unix timestamps as ISO-8601 strings in `timezone`.
///
/// # Examples
///
/// ```
/// use forecast_etl::to_local_iso;
///
/// let iso = to_local_iso(&[1746452000], "Asia/Novosibirsk").unwrap();
/// assert_eq!(iso, vec!["2025-05-05T20:33:20+07:00"]);
/// ```
pub fn to_local_iso(timestamps: &[i64], timezone: &str) -> Result<Vec<String>, TransformError> {
    let tz = parse_timezone(timezone)?;
    timestamps
        .iter()
        .map(|&ts| {
            DateTime::from_timestamp(ts, 0)
                .map(|utc| render_local(utc, tz))
                .ok_or(TransformError::InvalidTimestamp(ts as f64))
        })
        .collect()
}

/// Hour-of-day of each value read as UTC epoch seconds.
pub fn utc_hour_of_day(values: &[f64]) -> Result<Vec<i64>, TransformError> {
    values
        .iter()
        .map(|&value| epoch_to_utc(value).map(|utc| i64::from(utc.hour())))
        .collect()
}

fn parse_timezone(timezone: &str) -> Result<Tz, TransformError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| TransformError::UnknownTimezone(timezone.to_string()))
}

fn render_local(utc: DateTime<Utc>, tz: Tz) -> String {
    utc.with_timezone(&tz)
        .to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn epoch_to_utc(value: f64) -> Result<DateTime<Utc>, TransformError> {
    if !value.is_finite() {
        return Err(TransformError::InvalidTimestamp(value));
    }
    let secs = value.floor();
    let nanos = ((value - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos).ok_or(TransformError::InvalidTimestamp(value))
}
