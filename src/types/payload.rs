//! Typed view of a raw forecast response (`timeformat=unixtime`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A raw forecast payload: one timezone, per-day sun data and flat per-hour series.
///
/// Every hourly series is day-major: entries `24 * d .. 24 * (d + 1)` belong to
/// local day `d`. Unknown top-level keys (latitude, elevation, units, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    /// IANA timezone the forecast days are expressed in (e.g. `Asia/Novosibirsk`).
    pub timezone: String,
    pub daily: DailyData,
    pub hourly: HourlyData,
}

/// The `daily` section. All vectors have one entry per forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyData {
    pub time: Vec<i64>,
    pub sunrise: Vec<i64>,
    pub sunset: Vec<i64>,
    /// Seconds of daylight, usually fractional.
    pub daylight_duration: Vec<f64>,
}

/// The `hourly` section: the shared `time` axis plus one series per parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyData {
    pub time: Vec<i64>,
    /// Parameter name → one sample per hour, `None` where the API reported `null`.
    #[serde(flatten)]
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}

impl ForecastPayload {
    /// Number of forecast days, taken from the daily time axis.
    pub fn days_count(&self) -> usize {
        self.daily.time.len()
    }
}

impl HourlyData {
    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(Vec::as_slice)
    }
}
