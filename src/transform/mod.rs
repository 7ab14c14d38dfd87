pub mod aggregate;
pub mod chunk;
pub mod convert;
pub mod daylight;
pub mod error;
pub mod pipeline;
pub mod time;

use std::collections::HashMap;

/// Hourly series split into days: parameter name → one 24-sample vector per day.
pub type ChunkedSeries = HashMap<String, Vec<Vec<Option<f64>>>>;

/// Ordered per-day columns produced by one aggregation pass.
pub type ColumnSet = Vec<(String, Vec<f64>)>;

/// Ordered per-day, per-hour columns produced by the unit converter.
pub type ConvertedColumns = Vec<(String, Vec<Vec<f64>>)>;
