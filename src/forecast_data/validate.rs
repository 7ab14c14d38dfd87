//! Structural checks run on a payload before it is transformed.

use crate::forecast_data::error::PayloadError;
use crate::types::payload::ForecastPayload;
use log::info;

/// Hourly keys requested from the forecast API. A payload missing any of them
/// is rejected before transformation.
pub const REQUIRED_HOURLY_PARAMS: [&str; 18] = [
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "temperature_80m",
    "temperature_120m",
    "wind_speed_10m",
    "wind_speed_80m",
    "wind_direction_10m",
    "wind_direction_80m",
    "visibility",
    "evapotranspiration",
    "weather_code",
    "soil_temperature_0cm",
    "soil_temperature_6cm",
    "rain",
    "showers",
    "snowfall",
];

impl ForecastPayload {
    /// Confirms the payload has the shape the transformation expects.
    ///
    /// Deserialisation already guarantees the `timezone`, `daily` and `hourly`
    /// sections and their `time`/`sunrise`/`sunset`/`daylight_duration` keys exist
    /// and hold arrays. This adds the checks serde can't express: a non-empty
    /// timezone, every parameter in [`REQUIRED_HOURLY_PARAMS`], and daily arrays
    /// of equal length.
    ///
    /// # Errors
    ///
    /// * [`PayloadError::EmptyTimezone`] if `timezone` is blank.
    /// * [`PayloadError::MissingHourlyParams`] listing every absent hourly key.
    /// * [`PayloadError::DailyLengthMismatch`] if a daily array is not as long as `daily.time`.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.timezone.trim().is_empty() {
            return Err(PayloadError::EmptyTimezone);
        }

        let missing: Vec<String> = REQUIRED_HOURLY_PARAMS
            .iter()
            .copied()
            .filter(|name| !self.hourly.series.contains_key(*name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PayloadError::MissingHourlyParams(missing));
        }

        let expected = self.days_count();
        let daily_lengths = [
            ("sunrise", self.daily.sunrise.len()),
            ("sunset", self.daily.sunset.len()),
            ("daylight_duration", self.daily.daylight_duration.len()),
        ];
        for (field, found) in daily_lengths {
            if found != expected {
                return Err(PayloadError::DailyLengthMismatch {
                    field,
                    expected,
                    found,
                });
            }
        }

        info!("Forecast payload validated: {} days", expected);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::payload::{DailyData, HourlyData};
    use std::collections::BTreeMap;

    fn payload_with(series: &[&str]) -> ForecastPayload {
        ForecastPayload {
            timezone: "Asia/Novosibirsk".to_string(),
            daily: DailyData {
                time: vec![1_746_378_000],
                sunrise: vec![1_746_396_000],
                sunset: vec![1_746_452_000],
                daylight_duration: vec![56_000.0],
            },
            hourly: HourlyData {
                time: (0..24).map(|h| 1_746_378_000 + h * 3600).collect(),
                series: series
                    .iter()
                    .map(|name| (name.to_string(), vec![Some(0.0); 24]))
                    .collect::<BTreeMap<_, _>>(),
            },
        }
    }

    #[test]
    fn test_complete_payload_is_valid() {
        let payload = payload_with(&REQUIRED_HOURLY_PARAMS);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_missing_hourly_params_are_listed() {
        let present: Vec<&str> = REQUIRED_HOURLY_PARAMS
            .iter()
            .copied()
            .filter(|name| *name != "rain" && *name != "visibility")
            .collect();
        match payload_with(&present).validate() {
            Err(PayloadError::MissingHourlyParams(missing)) => {
                assert_eq!(missing, vec!["visibility".to_string(), "rain".to_string()]);
            }
            other => panic!("Expected MissingHourlyParams, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_hourly_section_lists_every_param() {
        match payload_with(&["wind_direction_100m"]).validate() {
            Err(PayloadError::MissingHourlyParams(missing)) => {
                let expected: Vec<String> =
                    REQUIRED_HOURLY_PARAMS.iter().map(|name| name.to_string()).collect();
                assert_eq!(missing, expected);
            }
            other => panic!("Expected MissingHourlyParams, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_timezone_is_rejected() {
        let mut payload = payload_with(&REQUIRED_HOURLY_PARAMS);
        payload.timezone = "  ".to_string();
        assert!(matches!(
            payload.validate(),
            Err(PayloadError::EmptyTimezone)
        ));
    }

    #[test]
    fn test_daily_length_mismatch() {
        let mut payload = payload_with(&REQUIRED_HOURLY_PARAMS);
        payload.daily.sunset.push(1_746_538_000);
        match payload.validate() {
            Err(PayloadError::DailyLengthMismatch {
                field,
                expected,
                found,
            }) => {
                assert_eq!(field, "sunset");
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("Expected DailyLengthMismatch, got {:?}", other),
        }
    }
}
