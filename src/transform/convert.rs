//! Hour-by-hour unit conversion of day-chunked series.

use crate::registry::SelectedParameter;
use crate::transform::{ChunkedSeries, ConvertedColumns};
use crate::types::metric::Metric;
use crate::utils::round_half_even;
use log::warn;
use std::collections::HashMap;

/// A pure conversion of one sample into the target unit.
pub type Converter = fn(f64) -> f64;

/// Knots to meters per second. The factor is `0.514`, not the exact `0.514444…`.
pub fn knots_to_meters_per_second(knots: f64) -> f64 {
    knots * 0.514
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn inches_to_millimeters(inches: f64) -> f64 {
    inches * 25.4
}

/// Maps unit tags to their [`Converter`]s.
///
/// # Examples
///
/// ```
/// use forecast_etl::{ConversionTable, Metric};
///
/// let table = ConversionTable::default();
/// let to_celsius = table.get(Metric::Celsius).unwrap();
/// assert_eq!(to_celsius(212.0), 100.0);
/// assert!(table.get(Metric::Avg).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ConversionTable {
    converters: HashMap<Metric, Converter>,
}

impl ConversionTable {
    /// An empty table: every conversion is reported as unknown.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Returns the table with `converter` registered for `metric`.
    pub fn with(mut self, metric: Metric, converter: Converter) -> Self {
        self.converters.insert(metric, converter);
        self
    }

    pub fn get(&self, metric: Metric) -> Option<Converter> {
        self.converters.get(&metric).copied()
    }
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self::empty()
            .with(Metric::MetersPerSecond, knots_to_meters_per_second)
            .with(Metric::Celsius, fahrenheit_to_celsius)
            .with(Metric::Millimeters, inches_to_millimeters)
    }
}

/// Converts every hourly sample of every day for each parameter.
///
/// Missing samples become `0` before conversion; results are rounded to the
/// parameter's precision. Columns are named `{parameter}_{metric}`.
///
/// A parameter whose tag has no converter, or that has no chunked series, is
/// skipped with a warning; the remaining columns are still returned.
pub fn convert(
    params: &[SelectedParameter],
    chunked: &ChunkedSeries,
    table: &ConversionTable,
) -> ConvertedColumns {
    let mut columns = ConvertedColumns::with_capacity(params.len());

    for param in params {
        let Some(converter) = table.get(param.metric) else {
            warn!(
                "Unknown unit '{}' for parameter '{}'; column skipped",
                param.metric, param.name
            );
            continue;
        };
        let Some(days) = chunked.get(&param.name) else {
            warn!("No hourly series for parameter '{}'; column skipped", param.name);
            continue;
        };

        let converted = days
            .iter()
            .map(|hours| {
                hours
                    .iter()
                    .map(|v| round_half_even(converter(v.unwrap_or(0.0)), param.precision))
                    .collect()
            })
            .collect();

        columns.push((format!("{}_{}", param.name, param.metric), converted));
    }

    columns
}
