//! Static configuration of the hourly forecast parameters the pipeline aggregates
//! and converts, and selection of parameters by metric tag.

use crate::types::metric::Metric;

/// Configuration of a single hourly parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Key of the parameter in the payload's `hourly` section (e.g. `temperature_2m`).
    pub name: String,
    /// Metric tags the parameter supports, in output order.
    pub metrics: Vec<Metric>,
    /// Number of decimal places every aggregated or converted value is rounded to.
    pub precision: u32,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, metrics: &[Metric], precision: u32) -> Self {
        Self {
            name: name.into(),
            metrics: metrics.to_vec(),
            precision,
        }
    }
}

/// A parameter rewritten for one pass of the pipeline: a single metric tag plus
/// the parameter's rounding precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedParameter {
    pub name: String,
    pub metric: Metric,
    pub precision: u32,
}

/// Ordered, immutable set of [`ParameterSpec`]s.
///
/// Registration order drives the order of the output columns. The registry is
/// passed explicitly to the pipeline, so tests can use synthetic registries.
///
/// # Examples
///
/// ```
/// use forecast_etl::{choose_params, Metric, ParameterRegistry, ParameterSpec};
///
/// let registry = ParameterRegistry::new(vec![
///     ParameterSpec::new("temperature_2m", &[Metric::Avg, Metric::Celsius], 2),
///     ParameterSpec::new("rain", &[Metric::Total, Metric::Millimeters], 3),
/// ]);
///
/// let totals = choose_params(&registry, Metric::Total);
/// assert_eq!(totals.len(), 1);
/// assert_eq!(totals[0].name, "rain");
/// assert_eq!(totals[0].precision, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRegistry {
    params: Vec<ParameterSpec>,
}

impl ParameterRegistry {
    pub fn new(params: Vec<ParameterSpec>) -> Self {
        Self { params }
    }

    /// The hourly parameters requested from the open-meteo forecast API.
    ///
    /// Relative humidity is rounded to whole percent.
    pub fn open_meteo() -> Self {
        use crate::types::metric::Metric::{Avg, Celsius, MetersPerSecond, Millimeters, Total};

        Self::new(vec![
            ParameterSpec::new("temperature_2m", &[Avg, Celsius], 2),
            ParameterSpec::new("relative_humidity_2m", &[Avg], 0),
            ParameterSpec::new("dew_point_2m", &[Avg], 2),
            ParameterSpec::new("apparent_temperature", &[Avg, Celsius], 2),
            ParameterSpec::new("temperature_80m", &[Avg, Celsius], 2),
            ParameterSpec::new("temperature_120m", &[Avg, Celsius], 2),
            ParameterSpec::new("wind_speed_10m", &[Avg, MetersPerSecond], 2),
            ParameterSpec::new("wind_speed_80m", &[Avg, MetersPerSecond], 2),
            ParameterSpec::new("visibility", &[Avg], 3),
            ParameterSpec::new("soil_temperature_0cm", &[Celsius], 2),
            ParameterSpec::new("soil_temperature_6cm", &[Celsius], 2),
            ParameterSpec::new("rain", &[Total, Millimeters], 3),
            ParameterSpec::new("showers", &[Total, Millimeters], 3),
            ParameterSpec::new("snowfall", &[Total, Millimeters], 3),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.params.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

impl Default for ParameterRegistry {
    fn default() -> Self {
        Self::open_meteo()
    }
}

/// Returns the parameters of `registry` that carry `metric`, each rewritten to
/// `(metric, precision)`. Registry order is preserved.
pub fn choose_params(registry: &ParameterRegistry, metric: Metric) -> Vec<SelectedParameter> {
    registry
        .iter()
        .filter(|spec| spec.metrics.contains(&metric))
        .map(|spec| SelectedParameter {
            name: spec.name.clone(),
            metric,
            precision: spec.precision,
        })
        .collect()
}
