//! CSV export of transformed forecast tables.

use crate::types::table::{ColumnValues, ForecastTable};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::info;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build DataFrame for export")]
    DataFrame(#[from] PolarsError),

    #[error("I/O error writing CSV file '{0}'")]
    CsvWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing CSV file '{0}'")]
    CsvWritePolars(PathBuf, #[source] PolarsError),

    #[error("Unknown user timezone '{0}'")]
    UnknownTimezone(String),
}

/// Current wall-clock time in `user_timezone`, used to stamp export file names.
pub fn local_now(user_timezone: &str) -> Result<NaiveDateTime, ExportError> {
    let tz: Tz = user_timezone
        .parse()
        .map_err(|_| ExportError::UnknownTimezone(user_timezone.to_string()))?;
    Ok(Utc::now().with_timezone(&tz).naive_local())
}

/// File name for an export made at `timestamp` (user-local wall clock).
pub fn csv_file_name(timestamp: NaiveDateTime) -> String {
    format!("open-meteo {}.csv", timestamp.format("%Y-%m-%d %H-%M-%S"))
}

/// Writes `table` to `output_dir` as `open-meteo {YYYY-MM-DD HH-MM-SS}.csv` and
/// returns the path of the new file.
///
/// Hourly columns are written as bracketed lists (`[10.0, 10.5, ...]`), one per day.
pub fn write_csv(
    table: &ForecastTable,
    output_dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    let path = output_dir.join(csv_file_name(timestamp));
    let mut df = csv_frame(table)?;

    let mut file = std::fs::File::create(&path)
        .map_err(|e| ExportError::CsvWriteIo(path.clone(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| ExportError::CsvWritePolars(path.clone(), e))?;

    info!("Saved {} rows to {}", df.height(), path.display());
    Ok(path)
}

fn csv_frame(table: &ForecastTable) -> PolarsResult<DataFrame> {
    let columns: Vec<Column> = table
        .columns()
        .map(|(name, values)| {
            let series = match values {
                ColumnValues::HourlyFloat(days) => {
                    let rendered: Vec<String> =
                        days.iter().map(|hours| format!("{:?}", hours)).collect();
                    Series::new(PlSmallStr::from(name), rendered)
                }
                other => other.to_series(name),
            };
            Column::from(series)
        })
        .collect();
    DataFrame::new(columns)
}
