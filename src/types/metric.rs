//! Defines the metric tags attached to forecast parameters.

use std::fmt;
use std::str::FromStr;

/// A metric tag: either an aggregation operator or a target physical unit.
///
/// Tags are configured per parameter in a [`crate::ParameterRegistry`] and select
/// which output columns are produced for that parameter.
///
/// # Examples
///
/// ```
/// use forecast_etl::Metric;
///
/// assert_eq!(Metric::Celsius.to_string(), "celsius");
/// assert_eq!("m_per_s".parse::<Metric>(), Ok(Metric::MetersPerSecond));
/// assert!(Metric::Total.is_aggregation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Arithmetic mean over an hour window.
    Avg,
    /// Sum over an hour window.
    Total,
    /// Hourly values converted from knots to meters per second.
    MetersPerSecond,
    /// Hourly values converted from degrees Fahrenheit to degrees Celsius.
    Celsius,
    /// Hourly values converted from inches to millimeters.
    Millimeters,
}

impl Metric {
    /// All tags in the order the pipeline processes them.
    pub const ALL: [Metric; 5] = [
        Metric::Avg,
        Metric::Total,
        Metric::MetersPerSecond,
        Metric::Celsius,
        Metric::Millimeters,
    ];

    /// The tag as it appears in output column names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Avg => "avg",
            Metric::Total => "total",
            Metric::MetersPerSecond => "m_per_s",
            Metric::Celsius => "celsius",
            Metric::Millimeters => "mm",
        }
    }

    /// Whether the tag names a windowed aggregation rather than a unit conversion.
    pub fn is_aggregation(&self) -> bool {
        matches!(self, Metric::Avg | Metric::Total)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a string is not one of the known metric tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown metric tag '{0}'")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}
