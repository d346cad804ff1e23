//! Reduction of `(label, value)` pairs to a single KPI scalar.

use serde::Deserialize;

/// Reduction applied to the valid values of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// Final valid value.
    #[default]
    Last,
    /// Sum of valid values.
    Sum,
    /// Arithmetic mean of valid values.
    Avg,
    /// Smallest valid value.
    Min,
    /// Largest valid value.
    Max,
}

/// Rows feeding the headline KPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiScope {
    /// Every row supplied by the host.
    #[default]
    Full,
    /// Only the trend window.
    Window,
}

/// Keep only present, non-NaN values.
pub(crate) fn valid_values<I>(values: I) -> impl Iterator<Item = f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|value| !value.is_nan())
}

/// Reduce plain values with `mode`, `None` when the list is empty.
pub(crate) fn reduce(values: &[f64], mode: AggregationMode) -> Option<f64> {
    let last = *values.last()?;
    let value = match mode {
        AggregationMode::Last => last,
        AggregationMode::Sum => values.iter().sum(),
        AggregationMode::Avg => values.iter().sum::<f64>() / values.len() as f64,
        AggregationMode::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregationMode::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    Some(value)
}

/// Aggregate the valid values of `pairs`.
///
/// Missing and NaN values are dropped before reducing. `Last` therefore
/// yields the last *valid* value: trailing gaps do not count.
pub fn aggregate<L>(pairs: &[(L, Option<f64>)], mode: AggregationMode) -> Option<f64> {
    let values: Vec<f64> = valid_values(pairs.iter().map(|(_, value)| *value)).collect();
    reduce(&values, mode)
}
