//! The flat, per-day output table of a transformation.

use polars::prelude::*;
use serde_json::{Map, Value};

/// Values of one output column. Every variant holds one entry per forecast day.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Aggregated values (`avg_*`, `total_*`).
    Float(Vec<f64>),
    /// Whole numbers such as `daylight_hours`.
    Integer(Vec<i64>),
    /// Local ISO-8601 timestamps (`sunrise_iso`, `sunset_iso`).
    Text(Vec<String>),
    /// Converted hourly values: one vector of hourly samples per day.
    HourlyFloat(Vec<Vec<f64>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Float(v) => v.len(),
            ColumnValues::Integer(v) => v.len(),
            ColumnValues::Text(v) => v.len(),
            ColumnValues::HourlyFloat(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The entry for `day` as a JSON value, `None` if out of range.
    pub fn value_at(&self, day: usize) -> Option<Value> {
        match self {
            ColumnValues::Float(v) => v.get(day).map(|x| float_value(*x)),
            ColumnValues::Integer(v) => v.get(day).map(|x| Value::from(*x)),
            ColumnValues::Text(v) => v.get(day).map(|s| Value::from(s.as_str())),
            ColumnValues::HourlyFloat(v) => v
                .get(day)
                .map(|hours| Value::Array(hours.iter().map(|x| float_value(*x)).collect())),
        }
    }

    pub(crate) fn to_series(&self, name: &str) -> Series {
        let name = PlSmallStr::from(name);
        match self {
            ColumnValues::Float(v) => Series::new(name, v),
            ColumnValues::Integer(v) => Series::new(name, v),
            ColumnValues::Text(v) => Series::new(name, v),
            ColumnValues::HourlyFloat(v) => {
                let days: Vec<Series> = v
                    .iter()
                    .map(|hours| Series::new("".into(), hours))
                    .collect();
                Series::new(name, days)
            }
        }
    }
}

// NaN/inf have no JSON representation.
fn float_value(x: f64) -> Value {
    serde_json::Number::from_f64(x)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// A mapping from column name to [`ColumnValues`], row-aligned by forecast day.
///
/// Row `i` of every column describes day `i` of the forecast. Column order is
/// the order in which the pipeline produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastTable {
    columns: Vec<(String, ColumnValues)>,
}

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, replacing an existing column with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, values: ColumnValues) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = values,
            None => self.columns.push((name, values)),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ColumnValues)> {
        self.columns.iter().map(|(name, values)| (name.as_str(), values))
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (forecast days). Taken from the first column; all columns
    /// of a table returned by the pipeline have the same length.
    pub fn days_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, values)| values.len())
    }

    /// Returns the name and length of the first column whose length differs from `expected`.
    pub(crate) fn find_misaligned(&self, expected: usize) -> Option<(&str, usize)> {
        self.columns
            .iter()
            .find(|(_, values)| values.len() != expected)
            .map(|(name, values)| (name.as_str(), values.len()))
    }

    /// Row-major view: one JSON object per day, keyed by column name.
    ///
    /// This is the record shape handed to persistence layers.
    pub fn rows(&self) -> Vec<Map<String, Value>> {
        (0..self.days_count())
            .map(|day| {
                self.columns
                    .iter()
                    .filter_map(|(name, values)| {
                        values.value_at(day).map(|value| (name.clone(), value))
                    })
                    .collect()
            })
            .collect()
    }

    /// The `(sunrise_iso, sunset_iso)` pair identifying a day for idempotent upserts.
    pub fn upsert_key(&self, day: usize) -> Option<(&str, &str)> {
        let sunrise = self.text_at("sunrise_iso", day)?;
        let sunset = self.text_at("sunset_iso", day)?;
        Some((sunrise, sunset))
    }

    fn text_at(&self, column: &str, day: usize) -> Option<&str> {
        match self.column(column)? {
            ColumnValues::Text(values) => values.get(day).map(String::as_str),
            _ => None,
        }
    }

    /// Converts the table to a polars [`DataFrame`]. Hourly columns become
    /// `List(Float64)` columns.
    ///
    /// # Errors
    ///
    /// Returns a [`PolarsError`] if the columns don't have equal lengths.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|(name, values)| Column::from(values.to_series(name)))
            .collect();
        DataFrame::new(columns)
    }
}
