//! Sequences the transformation stages over one forecast payload.

use crate::registry::{choose_params, ParameterRegistry};
use crate::transform::aggregate::aggregate;
use crate::transform::chunk::{chunk, HOURS_PER_DAY};
use crate::transform::convert::{convert, ConversionTable};
use crate::transform::daylight::{derive_intervals, HourWindow};
use crate::transform::error::TransformError;
use crate::transform::time::{normalize, LocalDateTime, UtcHour};
use crate::transform::ChunkedSeries;
use crate::types::metric::Metric;
use crate::types::payload::ForecastPayload;
use crate::types::table::{ColumnValues, ForecastTable};
use bon::bon;
use log::info;

/// Label of the full-day aggregation columns.
pub const FULL_DAY_LABEL: &str = "24h";
/// Label of the daylight-window aggregation columns.
pub const DAYLIGHT_LABEL: &str = "daylight";

const AGGREGATIONS: [Metric; 2] = [Metric::Avg, Metric::Total];
const CONVERSIONS: [Metric; 3] = [Metric::MetersPerSecond, Metric::Celsius, Metric::Millimeters];

/// Turns a [`ForecastPayload`] into a [`ForecastTable`] with one row per day.
///
/// The transformer holds only immutable configuration; every call to
/// [`ForecastTransformer::transform`] is independent.
///
/// # Examples
///
/// ```
/// use forecast_etl::{ForecastTransformer, Metric, ParameterRegistry, ParameterSpec};
///
/// // Default configuration: the open-meteo parameters and unit conversions.
/// let transformer = ForecastTransformer::builder().build();
///
/// // A narrower registry, e.g. only temperatures.
/// let temperatures = ForecastTransformer::builder()
///     .registry(ParameterRegistry::new(vec![ParameterSpec::new(
///         "temperature_2m",
///         &[Metric::Avg, Metric::Celsius],
///         2,
///     )]))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ForecastTransformer {
    registry: ParameterRegistry,
    conversions: ConversionTable,
}

#[bon]
impl ForecastTransformer {
    /// Creates a transformer.
    ///
    /// # Arguments
    ///
    /// * `.registry(ParameterRegistry)`: Optional. Hourly parameters to aggregate and
    ///   convert. Defaults to [`ParameterRegistry::open_meteo`].
    /// * `.conversions(ConversionTable)`: Optional. Unit converters per tag. Defaults to
    ///   [`ConversionTable::default`] (knots → m/s, °F → °C, inch → mm).
    #[builder]
    pub fn new(
        registry: Option<ParameterRegistry>,
        conversions: Option<ConversionTable>,
    ) -> Self {
        Self {
            registry: registry.unwrap_or_default(),
            conversions: conversions.unwrap_or_default(),
        }
    }

    /// Runs the whole pipeline.
    ///
    /// 1. Renders `sunrise`/`sunset` as local ISO strings in the payload's timezone and
    ///    truncates `daylight_duration` to whole hours.
    /// 2. Splits each configured hourly series into 24-sample days.
    /// 3. Derives each day's daylight window from sunset and daylight hours.
    /// 4. Aggregates `avg`/`total` parameters over the full day (`*_24h`) and the
    ///    daylight window (`*_daylight`).
    /// 5. Converts `m_per_s`/`celsius`/`mm` parameters hour by hour.
    /// 6. Merges everything with `daylight_hours`, `sunset_iso` and `sunrise_iso`.
    ///
    /// The payload is assumed to be structurally valid (see [`ForecastPayload::validate`]).
    ///
    /// # Errors
    ///
    /// No partial table is ever returned. Notable failures:
    ///
    /// * [`TransformError::UnknownTimezone`] for a timezone that is not an IANA name.
    /// * [`TransformError::MalformedSeriesLength`] if a configured hourly series is not
    ///   exactly `days * 24` samples long.
    /// * [`TransformError::Aggregation`] if a day's daylight window is invalid (for
    ///   instance daylight hours exceeding the sunset hour) or any other aggregation
    ///   pass fails.
    /// * [`TransformError::ColumnLengthMismatch`] if the merged columns don't all have
    ///   one entry per day.
    pub fn transform(&self, payload: &ForecastPayload) -> Result<ForecastTable, TransformError> {
        let timezone = payload.timezone.as_str();
        let days_count = payload.days_count();

        let daily = &payload.daily;
        check_daily_len("sunrise", daily.sunrise.len(), days_count)?;
        check_daily_len("sunset", daily.sunset.len(), days_count)?;
        check_daily_len("daylight_duration", daily.daylight_duration.len(), days_count)?;

        let sunrise_iso = normalize(&daily.sunrise, LocalDateTime(timezone))?;
        let sunset_iso = normalize(&daily.sunset, LocalDateTime(timezone))?;
        let daylight_hours = normalize(&daily.daylight_duration, UtcHour)?;
        info!("Daily fields normalized for {} days in {}", days_count, timezone);

        let chunked = self.chunk_hourly(payload, days_count)?;
        info!("Hourly series split into {} days", days_count);

        let daylight_windows = derive_intervals(&sunset_iso, &daylight_hours, days_count)?;

        let mut table = ForecastTable::new();
        let passes: [(&str, Option<&[HourWindow]>); 2] = [
            (FULL_DAY_LABEL, None),
            (DAYLIGHT_LABEL, Some(daylight_windows.as_slice())),
        ];
        for (label, bounds) in passes {
            for metric in AGGREGATIONS {
                let params = choose_params(&self.registry, metric);
                let columns = aggregate(&params, &chunked, days_count, label, bounds).map_err(
                    |source| TransformError::Aggregation {
                        label: label.to_string(),
                        source,
                    },
                )?;
                for (name, values) in columns {
                    table.insert(name, ColumnValues::Float(values));
                }
            }
            info!("Hourly aggregation '{}' done", label);
        }

        for metric in CONVERSIONS {
            let params = choose_params(&self.registry, metric);
            for (name, values) in convert(&params, &chunked, &self.conversions) {
                table.insert(name, ColumnValues::HourlyFloat(values));
            }
        }
        info!("Hourly unit conversion done");

        table.insert("daylight_hours", ColumnValues::Integer(daylight_hours));
        table.insert("sunset_iso", ColumnValues::Text(sunset_iso));
        table.insert("sunrise_iso", ColumnValues::Text(sunrise_iso));

        if let Some((column, found)) = table.find_misaligned(days_count) {
            return Err(TransformError::ColumnLengthMismatch {
                column: column.to_string(),
                expected: days_count,
                found,
            });
        }

        info!(
            "Forecast transformed: {} rows, {} columns",
            days_count,
            table.width()
        );
        Ok(table)
    }

    fn chunk_hourly(
        &self,
        payload: &ForecastPayload,
        days_count: usize,
    ) -> Result<ChunkedSeries, TransformError> {
        let expected = days_count * HOURS_PER_DAY;
        self.registry
            .names()
            .map(|name| {
                let series = payload
                    .hourly
                    .get(name)
                    .ok_or_else(|| TransformError::MissingSeries(name.to_string()))?;
                if series.len() != expected {
                    return Err(TransformError::MalformedSeriesLength {
                        parameter: name.to_string(),
                        days: days_count,
                        expected,
                        found: series.len(),
                    });
                }
                Ok((name.to_string(), chunk(series, HOURS_PER_DAY)))
            })
            .collect()
    }
}

impl Default for ForecastTransformer {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Transforms `payload` with the default registry and conversions.
pub fn transform_forecast(payload: &ForecastPayload) -> Result<ForecastTable, TransformError> {
    ForecastTransformer::default().transform(payload)
}

fn check_daily_len(field: &'static str, len: usize, days_count: usize) -> Result<(), TransformError> {
    if len < days_count {
        return Err(TransformError::MissingDailyValue { field, day: len });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast_data::validate::REQUIRED_HOURLY_PARAMS;
    use crate::registry::ParameterSpec;
    use crate::transform::error::AggregationError;
    use crate::types::payload::{DailyData, HourlyData};
    use std::collections::BTreeMap;

    const DAY: i64 = 86_400;
    // 2025-05-05T00:00:00+07:00
    const FIRST_MIDNIGHT: i64 = 1_746_378_000;
    // 2025-05-05T05:02:52+07:00
    const FIRST_SUNRISE: i64 = 1_746_396_172;
    // 2025-05-05T20:33:20+07:00
    const FIRST_SUNSET: i64 = 1_746_452_000;

    /// Two-day Novosibirsk payload: every hourly series is constant `fill`,
    /// 17.5 hours of daylight ending at 20:33 local time.
    fn payload(days: usize, fill: f64) -> ForecastPayload {
        let days_i = days as i64;
        ForecastPayload {
            timezone: "Asia/Novosibirsk".to_string(),
            daily: DailyData {
                time: (0..days_i).map(|d| FIRST_MIDNIGHT + d * DAY).collect(),
                sunrise: (0..days_i).map(|d| FIRST_SUNRISE + d * DAY).collect(),
                sunset: (0..days_i).map(|d| FIRST_SUNSET + d * DAY).collect(),
                daylight_duration: vec![17.0 * 3600.0 + 1800.0; days],
            },
            hourly: HourlyData {
                time: (0..days_i * 24).map(|h| FIRST_MIDNIGHT + h * 3600).collect(),
                series: REQUIRED_HOURLY_PARAMS
                    .iter()
                    .map(|name| (name.to_string(), vec![Some(fill); days * 24]))
                    .collect::<BTreeMap<_, _>>(),
            },
        }
    }

    fn floats<'a>(table: &'a ForecastTable, name: &str) -> &'a [f64] {
        match table.column(name) {
            Some(ColumnValues::Float(values)) => values,
            other => panic!("Expected float column '{}', got {:?}", name, other),
        }
    }

    #[test]
    fn test_end_to_end_constant_temperature() -> Result<(), Box<dyn std::error::Error>> {
        let mut payload = payload(2, 50.0);
        payload
            .hourly
            .series
            .insert("rain".to_string(), vec![Some(0.0); 48]);

        let table = transform_forecast(&payload)?;

        assert_eq!(table.days_count(), 2);
        assert_eq!(floats(&table, "avg_temperature_2m_24h"), &[50.0, 50.0]);
        assert_eq!(floats(&table, "total_rain_24h"), &[0.0, 0.0]);
        assert_eq!(floats(&table, "total_rain_daylight"), &[0.0, 0.0]);
        match table.column("temperature_2m_celsius") {
            Some(ColumnValues::HourlyFloat(days)) => {
                assert_eq!(days.len(), 2);
                assert!(days.iter().all(|hours| hours.len() == 24));
                assert!(days.iter().flatten().all(|c| *c == 10.0));
            }
            other => panic!("Unexpected celsius column {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_every_column_has_one_entry_per_day() -> Result<(), Box<dyn std::error::Error>> {
        let table = transform_forecast(&payload(3, 1.0))?;

        // 9 avg + 3 total parameters, twice; 2 + 6 + 3 conversions; 3 daily fields.
        assert_eq!(table.width(), 24 + 11 + 3);
        for (name, values) in table.columns() {
            assert_eq!(values.len(), 3, "column '{}' is misaligned", name);
        }
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names.first(), Some(&"avg_temperature_2m_24h"));
        assert_eq!(names[9], "total_rain_24h");
        assert_eq!(names[12], "avg_temperature_2m_daylight");
        assert_eq!(names[24], "wind_speed_10m_m_per_s");
        assert_eq!(names[26], "temperature_2m_celsius");
        assert_eq!(names[32], "rain_mm");
        assert_eq!(&names[35..], &["daylight_hours", "sunset_iso", "sunrise_iso"]);
        Ok(())
    }

    #[test]
    fn test_daily_fields() -> Result<(), Box<dyn std::error::Error>> {
        let table = transform_forecast(&payload(2, 0.0))?;
        assert_eq!(
            table.column("daylight_hours"),
            Some(&ColumnValues::Integer(vec![17, 17]))
        );
        assert_eq!(
            table.upsert_key(1),
            Some(("2025-05-06T05:02:52+07:00", "2025-05-06T20:33:20+07:00"))
        );
        Ok(())
    }

    #[test]
    fn test_daylight_window_uses_sunset_hour() -> Result<(), Box<dyn std::error::Error>> {
        let mut payload = payload(1, 0.0);
        // Hour-of-day as the value: daylight window is [3, 20).
        let ramp: Vec<Option<f64>> = (0..24).map(|h| Some(h as f64)).collect();
        payload.hourly.series.insert("visibility".to_string(), ramp.clone());
        payload.hourly.series.insert("showers".to_string(), ramp);

        let table = transform_forecast(&payload)?;
        assert_eq!(floats(&table, "avg_visibility_24h"), &[11.5]);
        assert_eq!(floats(&table, "avg_visibility_daylight"), &[11.0]);
        assert_eq!(floats(&table, "total_showers_24h"), &[276.0]);
        assert_eq!(floats(&table, "total_showers_daylight"), &[187.0]);
        Ok(())
    }

    #[test]
    fn test_daylight_longer_than_sunset_hour_fails_transform() {
        let mut payload = payload(1, 0.0);
        payload.timezone = "UTC".to_string();
        // Sunset at 05:30 UTC with 17 hours of daylight: window would start at -12.
        payload.daily.sunset = vec![FIRST_MIDNIGHT + 12 * 3600 + 1800];
        payload.daily.daylight_duration = vec![17.0 * 3600.0];

        match transform_forecast(&payload) {
            Err(TransformError::Aggregation { label, source }) => {
                assert_eq!(label, DAYLIGHT_LABEL);
                assert!(matches!(
                    source,
                    AggregationError::InvalidWindow {
                        start: -12,
                        end: 5,
                        day: 0,
                        ..
                    }
                ));
            }
            other => panic!("Expected aggregation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_series_length_is_checked_up_front() {
        let mut payload = payload(2, 1.0);
        payload
            .hourly
            .series
            .insert("snowfall".to_string(), vec![Some(0.0); 40]);

        match transform_forecast(&payload) {
            Err(TransformError::MalformedSeriesLength {
                parameter,
                days,
                expected,
                found,
            }) => {
                assert_eq!(parameter, "snowfall");
                assert_eq!(days, 2);
                assert_eq!(expected, 48);
                assert_eq!(found, 40);
            }
            other => panic!("Expected MalformedSeriesLength, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_configured_series() {
        let mut payload = payload(1, 1.0);
        payload.hourly.series.remove("dew_point_2m");
        assert!(matches!(
            transform_forecast(&payload),
            Err(TransformError::MissingSeries(name)) if name == "dew_point_2m"
        ));
    }

    #[test]
    fn test_unknown_timezone() {
        let mut payload = payload(1, 1.0);
        payload.timezone = "Atlantis/Capital".to_string();
        assert!(matches!(
            transform_forecast(&payload),
            Err(TransformError::UnknownTimezone(_))
        ));
    }

    #[test]
    fn test_short_daily_section() {
        let mut payload = payload(2, 1.0);
        payload.daily.sunrise.pop();
        assert!(matches!(
            transform_forecast(&payload),
            Err(TransformError::MissingDailyValue {
                field: "sunrise",
                day: 1
            })
        ));
    }

    #[test]
    fn test_synthetic_registry_and_conversions() -> Result<(), Box<dyn std::error::Error>> {
        let transformer = ForecastTransformer::builder()
            .registry(ParameterRegistry::new(vec![ParameterSpec::new(
                "temperature_2m",
                &[Metric::Celsius, Metric::Total],
                1,
            )]))
            .conversions(ConversionTable::empty())
            .build();

        let table = transformer.transform(&payload(1, 2.0))?;
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(
            names,
            vec![
                "total_temperature_2m_24h",
                "total_temperature_2m_daylight",
                "daylight_hours",
                "sunset_iso",
                "sunrise_iso",
            ]
        );
        assert_eq!(floats(&table, "total_temperature_2m_24h"), &[48.0]);
        assert_eq!(floats(&table, "total_temperature_2m_daylight"), &[34.0]);
        Ok(())
    }

    #[test]
    fn test_transform_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
        let transformer = ForecastTransformer::default();
        let payload = payload(2, 3.25);
        assert_eq!(transformer.transform(&payload)?, transformer.transform(&payload)?);
        Ok(())
    }
}
