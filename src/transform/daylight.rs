//! Per-day daylight windows derived from the local sunset hour and the
//! truncated daylight duration.

use crate::transform::error::TransformError;
use chrono::{DateTime, Timelike};

/// A half-open hour range `[start, end)` within one day's 24 samples.
///
/// Bounds are signed: a derived daylight window can start before midnight,
/// which the aggregator rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HourWindow {
    pub start: i64,
    pub end: i64,
}

impl HourWindow {
    /// The whole day, `[0, 24)`.
    pub const FULL_DAY: HourWindow = HourWindow { start: 0, end: 24 };

    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// `0 <= start <= 24`, `0 <= end <= 24` and `start < end`.
    pub fn is_valid(&self) -> bool {
        (0..=24).contains(&self.start) && (0..=24).contains(&self.end) && self.start < self.end
    }
}

/// Derives each day's daylight window.
///
/// The window ends at the hour component of the local sunset and starts
/// `daylight_hours` earlier. Sunrise is not used: because daylight hours are
/// truncated, `sunset - daylight_hours` keeps the window length equal to the
/// reported daylight hours. No clamping or wraparound is applied, so
/// `daylight_hours > end` produces a negative start.
///
/// # Errors
///
/// * [`TransformError::MissingDailyValue`] if either input has fewer than `days_count` entries.
/// * [`TransformError::InvalidIsoTimestamp`] if a sunset string is not ISO-8601.
pub fn derive_intervals(
    sunset_iso: &[String],
    daylight_hours: &[i64],
    days_count: usize,
) -> Result<Vec<HourWindow>, TransformError> {
    (0..days_count)
        .map(|day| {
            let sunset = sunset_iso.get(day).ok_or(TransformError::MissingDailyValue {
                field: "sunset_iso",
                day,
            })?;
            let hours = *daylight_hours
                .get(day)
                .ok_or(TransformError::MissingDailyValue {
                    field: "daylight_hours",
                    day,
                })?;
            let end = local_hour(sunset)?;
            Ok(HourWindow::new(end - hours, end))
        })
        .collect()
}

fn local_hour(iso: &str) -> Result<i64, TransformError> {
    DateTime::parse_from_rfc3339(iso)
        .map(|dt| i64::from(dt.hour()))
        .map_err(|e| TransformError::InvalidIsoTimestamp(iso.to_string(), e))
}
