//! Windowed averages and totals over day-chunked hourly series.

use crate::registry::SelectedParameter;
use crate::transform::daylight::HourWindow;
use crate::transform::error::AggregationError;
use crate::transform::{ChunkedSeries, ColumnSet};
use crate::types::metric::Metric;
use crate::utils::round_half_even;
use log::warn;

/// Aggregates every parameter over one hour window per day.
///
/// For each parameter and day the day's samples are sliced to `[start, end)`,
/// missing samples count as `0` (they stay in the denominator of an average),
/// and the mean (`avg`) or sum (`total`) is rounded to the parameter's precision.
/// Columns are named `{metric}_{parameter}_{label}`, in the order of `params`.
///
/// `bounds` holds one window per day; `None` aggregates the full day.
///
/// # Errors
///
/// The pass is all-or-nothing. Any of these discards every column computed so far:
///
/// * [`AggregationError::InvalidWindow`] if a day's window violates
///   `0 <= start < end <= 24` (also logged as a warning).
/// * [`AggregationError::WindowOutOfRange`] if a day chunk is missing or shorter than `end`.
/// * [`AggregationError::MissingWindow`] if `bounds` has no window for a day.
/// * [`AggregationError::MissingSeries`] if a parameter has no chunked series.
/// * [`AggregationError::UnsupportedMetric`] for conversion tags.
pub fn aggregate(
    params: &[SelectedParameter],
    chunked: &ChunkedSeries,
    days_count: usize,
    label: &str,
    bounds: Option<&[HourWindow]>,
) -> Result<ColumnSet, AggregationError> {
    let mut columns = ColumnSet::with_capacity(params.len());

    for param in params {
        if !param.metric.is_aggregation() {
            return Err(AggregationError::UnsupportedMetric {
                parameter: param.name.clone(),
                metric: param.metric,
            });
        }
        let days = chunked
            .get(&param.name)
            .ok_or_else(|| AggregationError::MissingSeries(param.name.clone()))?;

        let mut values = Vec::with_capacity(days_count);
        for day in 0..days_count {
            let window = match bounds {
                Some(bounds) => bounds
                    .get(day)
                    .copied()
                    .ok_or(AggregationError::MissingWindow(day))?,
                None => HourWindow::FULL_DAY,
            };

            if !window.is_valid() {
                warn!(
                    "Invalid hour window ({}, {}) for '{}' on day {}; discarding the '{}' pass",
                    window.start, window.end, param.name, day, label
                );
                return Err(AggregationError::InvalidWindow {
                    parameter: param.name.clone(),
                    day,
                    start: window.start,
                    end: window.end,
                });
            }

            let samples = slice_window(days, day, window).ok_or_else(|| {
                warn!(
                    "Hour window ({}, {}) for '{}' on day {} is out of range; discarding the '{}' pass",
                    window.start, window.end, param.name, day, label
                );
                AggregationError::WindowOutOfRange {
                    parameter: param.name.clone(),
                    day,
                    start: window.start,
                    end: window.end,
                    available: days.get(day).map_or(0, Vec::len),
                }
            })?;

            values.push(round_half_even(
                reduce(samples, param.metric),
                param.precision,
            ));
        }

        columns.push((format!("{}_{}_{}", param.metric, param.name, label), values));
    }

    Ok(columns)
}

fn slice_window(days: &[Vec<Option<f64>>], day: usize, window: HourWindow) -> Option<&[Option<f64>]> {
    let start = usize::try_from(window.start).ok()?;
    let end = usize::try_from(window.end).ok()?;
    days.get(day)?.get(start..end)
}

fn reduce(samples: &[Option<f64>], metric: Metric) -> f64 {
    let total: f64 = samples.iter().map(|v| v.unwrap_or(0.0)).sum();
    match metric {
        Metric::Avg => total / samples.len() as f64,
        _ => total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::chunk::{chunk, HOURS_PER_DAY};

    fn selected(name: &str, metric: Metric, precision: u32) -> SelectedParameter {
        SelectedParameter {
            name: name.to_string(),
            metric,
            precision,
        }
    }

    fn chunked(name: &str, hourly: Vec<Option<f64>>) -> ChunkedSeries {
        let mut series = ChunkedSeries::new();
        series.insert(name.to_string(), chunk(&hourly, HOURS_PER_DAY));
        series
    }

    fn ramp(days: usize) -> Vec<Option<f64>> {
        (0..days * HOURS_PER_DAY).map(|h| Some((h % 24) as f64)).collect()
    }

    #[test]
    fn test_full_day_avg_and_total() {
        let series = chunked("t", ramp(2));
        let avg = aggregate(&[selected("t", Metric::Avg, 2)], &series, 2, "24h", None).unwrap();
        assert_eq!(avg, vec![("avg_t_24h".to_string(), vec![11.5, 11.5])]);

        let total = aggregate(&[selected("t", Metric::Total, 1)], &series, 2, "24h", None).unwrap();
        assert_eq!(total, vec![("total_t_24h".to_string(), vec![276.0, 276.0])]);
    }

    #[test]
    fn test_daylight_window_slice() {
        let series = chunked("t", ramp(1));
        let bounds = [HourWindow::new(3, 20)];
        let columns = aggregate(
            &[selected("t", Metric::Avg, 2), selected("t", Metric::Total, 0)],
            &series,
            1,
            "daylight",
            Some(&bounds),
        )
        .unwrap();
        // hours 3..=19
        assert_eq!(columns[0], ("avg_t_daylight".to_string(), vec![11.0]));
        assert_eq!(columns[1], ("total_t_daylight".to_string(), vec![187.0]));
    }

    #[test]
    fn test_missing_sample_counts_as_zero() {
        let mut hourly = vec![Some(2.0); HOURS_PER_DAY];
        hourly[5] = None;
        let series = chunked("rain", hourly);

        let avg = aggregate(&[selected("rain", Metric::Avg, 3)], &series, 1, "24h", None).unwrap();
        assert_eq!(avg[0].1, vec![1.917]);
        let total =
            aggregate(&[selected("rain", Metric::Total, 3)], &series, 1, "24h", None).unwrap();
        assert_eq!(total[0].1, vec![46.0]);
    }

    #[test]
    fn test_negative_start_aborts_whole_pass() {
        let mut series = chunked("a", ramp(2));
        series.insert("b".to_string(), chunk(&ramp(2), HOURS_PER_DAY));
        // Day 0 is fine, day 1 starts before midnight.
        let bounds = [HourWindow::new(3, 20), HourWindow::new(-12, 5)];
        let err = aggregate(
            &[selected("a", Metric::Avg, 2), selected("b", Metric::Avg, 2)],
            &series,
            2,
            "daylight",
            Some(&bounds),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AggregationError::InvalidWindow {
                parameter: "a".to_string(),
                day: 1,
                start: -12,
                end: 5,
            }
        );
    }

    #[test]
    fn test_empty_window_is_invalid() {
        let series = chunked("a", ramp(1));
        let bounds = [HourWindow::new(7, 7)];
        assert!(matches!(
            aggregate(&[selected("a", Metric::Total, 2)], &series, 1, "daylight", Some(&bounds)),
            Err(AggregationError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_short_final_chunk_is_out_of_range() {
        let series = chunked("a", vec![Some(1.0); 30]);
        let err = aggregate(&[selected("a", Metric::Avg, 2)], &series, 2, "24h", None).unwrap_err();
        assert_eq!(
            err,
            AggregationError::WindowOutOfRange {
                parameter: "a".to_string(),
                day: 1,
                start: 0,
                end: 24,
                available: 6,
            }
        );
    }

    #[test]
    fn test_missing_series_and_conversion_metric() {
        let series = chunked("a", ramp(1));
        assert_eq!(
            aggregate(&[selected("zzz", Metric::Avg, 2)], &series, 1, "24h", None),
            Err(AggregationError::MissingSeries("zzz".to_string()))
        );
        assert!(matches!(
            aggregate(&[selected("a", Metric::Celsius, 2)], &series, 1, "24h", None),
            Err(AggregationError::UnsupportedMetric { .. })
        ));
    }

    #[test]
    fn test_bounds_shorter_than_days() {
        let series = chunked("a", ramp(2));
        let bounds = [HourWindow::FULL_DAY];
        assert_eq!(
            aggregate(&[selected("a", Metric::Avg, 2)], &series, 2, "daylight", Some(&bounds)),
            Err(AggregationError::MissingWindow(1))
        );
    }

    #[test]
    fn test_no_params_gives_no_columns() {
        let columns = aggregate(&[], &ChunkedSeries::new(), 3, "24h", None).unwrap();
        assert!(columns.is_empty());
    }
}
