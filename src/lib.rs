#![doc = include_str!("../README.md")]

mod client;
mod db;
mod error;
mod etl;
mod export;
mod forecast_data;
mod registry;
mod transform;
mod types;
mod utils;

pub use error::ForecastEtlError;
pub use etl::*;

pub use client::error::ClientError;
pub use client::forecast_client::ForecastClient;
pub use client::request::*;

pub use db::config::{DbConfig, DEFAULT_PORT, DEFAULT_TABLE};
pub use db::error::DbError;
pub use db::upsert::{save_to_db, upsert_into, UPSERT_KEY};

pub use export::{csv_file_name, local_now, write_csv, ExportError};

pub use forecast_data::error::PayloadError;
pub use forecast_data::validate::REQUIRED_HOURLY_PARAMS;

pub use registry::*;

pub use transform::aggregate::aggregate;
pub use transform::chunk::{chunk, HOURS_PER_DAY};
pub use transform::convert::*;
pub use transform::daylight::{derive_intervals, HourWindow};
pub use transform::error::{AggregationError, TransformError};
pub use transform::pipeline::*;
pub use transform::time::*;
pub use transform::{ChunkedSeries, ColumnSet, ConvertedColumns};

pub use types::metric::{Metric, UnknownMetric};
pub use types::payload::{DailyData, ForecastPayload, HourlyData};
pub use types::table::{ColumnValues, ForecastTable};
