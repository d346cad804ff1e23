//! Period-over-period comparison of the most recent points.
//!
//! The current window is the final `points` rows. The previous window has the
//! same size and sits `offset` windows earlier, so with `offset = 1` the two
//! windows are adjacent. Both windows clamp at the start of the series; a
//! window without a single valid value makes the whole delta unavailable.

use serde::Deserialize;

use crate::aggregate::{AggregationMode, reduce, valid_values};
use crate::datasource::Row;
use crate::format::NumberFormatter;

/// Default window size in points.
pub const DEFAULT_DELTA_POINTS: usize = 1;
/// Default offset in windows.
pub const DEFAULT_DELTA_OFFSET: usize = 1;
/// Default decimals for percentage deltas.
pub const DEFAULT_DELTA_DECIMALS: usize = 1;

/// Reduction applied to each delta window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaAggregation {
    /// Final valid value of the window.
    #[default]
    Last,
    /// Sum of the window.
    Sum,
    /// Mean of the window.
    Avg,
}

impl From<DeltaAggregation> for AggregationMode {
    fn from(value: DeltaAggregation) -> Self {
        match value {
            DeltaAggregation::Last => Self::Last,
            DeltaAggregation::Sum => Self::Sum,
            DeltaAggregation::Avg => Self::Avg,
        }
    }
}

/// How the delta is shown next to the KPI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaDisplayMode {
    /// Relative change in percent.
    #[default]
    Percent,
    /// Absolute difference, formatted like the KPI value.
    Absolute,
}

/// Validated delta settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaConfig {
    /// Points per window, at least 1.
    pub points: usize,
    /// Distance between the windows, in windows, at least 1.
    pub offset: usize,
    /// Reduction per window.
    pub aggregation: DeltaAggregation,
    /// Decimals of the percentage text.
    pub decimals: usize,
    /// Percent or absolute display.
    pub display: DeltaDisplayMode,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_DELTA_POINTS,
            offset: DEFAULT_DELTA_OFFSET,
            aggregation: DeltaAggregation::default(),
            decimals: DEFAULT_DELTA_DECIMALS,
            display: DeltaDisplayMode::default(),
        }
    }
}

/// Aggregated values of the two delta windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaWindows {
    /// Current window aggregate.
    pub curr: f64,
    /// Previous window aggregate.
    pub prev: f64,
}

/// Index bounds (inclusive) of both windows for a series of `len` rows.
fn window_bounds(len: usize, points: usize, offset: usize) -> Option<((usize, usize), (usize, usize))> {
    let end = len.checked_sub(1)?;
    let take = points.max(1);
    let shift = offset.max(1).saturating_mul(take);
    let start_curr = (end + 1).saturating_sub(take);
    let prev_end = (start_curr + take - 1).saturating_sub(shift);
    let prev_start = (prev_end + 1).saturating_sub(take);
    Some(((start_curr, end), (prev_start, prev_end)))
}

/// Compare the last `points` rows against the window `offset` windows earlier.
///
/// `points` and `offset` are floored and clamped to at least 1. Returns
/// `None` for an empty series or when either window has no valid value.
pub fn compute_delta(
    rows: &[Row],
    points: f64,
    aggregation: DeltaAggregation,
    offset: f64,
) -> Option<DeltaWindows> {
    compute_delta_windows(rows, floor_at_least_one(points), aggregation, floor_at_least_one(offset))
}

/// Same as [`compute_delta`] with already validated counts.
pub fn compute_delta_windows(
    rows: &[Row],
    points: usize,
    aggregation: DeltaAggregation,
    offset: usize,
) -> Option<DeltaWindows> {
    let ((curr_start, curr_end), (prev_start, prev_end)) = window_bounds(rows.len(), points, offset)?;
    let collect = |start: usize, end: usize| -> Vec<f64> {
        valid_values(rows[start..=end].iter().map(|row| row.value)).collect()
    };
    let curr_values = collect(curr_start, curr_end);
    let prev_values = collect(prev_start, prev_end);
    let mode = AggregationMode::from(aggregation);
    Some(DeltaWindows {
        curr: reduce(&curr_values, mode)?,
        prev: reduce(&prev_values, mode)?,
    })
}

fn floor_at_least_one(value: f64) -> usize {
    if value.is_finite() && value >= 1.0 {
        value.floor() as usize
    } else {
        1
    }
}

/// Delta with the derived difference and relative change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaSummary {
    /// Current window aggregate.
    pub curr: f64,
    /// Previous window aggregate.
    pub prev: f64,
    /// `curr - prev`.
    pub diff: f64,
    /// `diff / |prev| * 100`, absent when `prev` is zero.
    pub pct: Option<f64>,
}

impl From<DeltaWindows> for DeltaSummary {
    fn from(windows: DeltaWindows) -> Self {
        let diff = windows.curr - windows.prev;
        let pct = (windows.prev != 0.0).then(|| diff / windows.prev.abs() * 100.0);
        Self {
            curr: windows.curr,
            prev: windows.prev,
            diff,
            pct,
        }
    }
}

/// Direction of change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaDirection {
    /// Increase.
    Up,
    /// Decrease.
    Down,
    /// No change.
    Flat,
}

impl DeltaDirection {
    /// Classify a signed change.
    pub fn of(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    /// Glyph shown before the delta text.
    pub fn glyph(self) -> char {
        match self {
            Self::Up => '▲',
            Self::Down => '▼',
            Self::Flat => '■',
        }
    }
}

/// Ready-to-render delta indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaDisplay {
    /// Direction of change.
    pub direction: DeltaDirection,
    /// Formatted magnitude, e.g. `33.3%`.
    pub text: String,
}

impl DeltaDisplay {
    /// Build the indicator, `None` when percent mode has no usable base.
    pub fn new(summary: &DeltaSummary, config: &DeltaConfig, formatter: &NumberFormatter) -> Option<Self> {
        match config.display {
            DeltaDisplayMode::Percent => {
                let pct = summary.pct?;
                Some(Self {
                    direction: DeltaDirection::of(pct),
                    text: format_percent(pct, config.decimals),
                })
            }
            DeltaDisplayMode::Absolute => Some(Self {
                direction: DeltaDirection::of(summary.diff),
                text: formatter.format(Some(summary.diff)),
            }),
        }
    }

    /// Glyph and text joined, e.g. `▲ 33.3%`.
    pub fn label(&self) -> String {
        format!("{} {}", self.direction.glyph(), self.text)
    }
}

fn format_percent(pct: f64, decimals: usize) -> String {
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (pct * factor).round() / factor;
    format!("{rounded:.decimals$}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rows(values: &[Option<f64>]) -> Vec<Row> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| Row::new(format!("d{index}"), index as f64, *value))
            .collect()
    }

    fn series(len: usize) -> Vec<Row> {
        rows(&(0..len).map(|index| Some(index as f64)).collect::<Vec<_>>())
    }

    #[test]
    fn ten_points_three_per_window() {
        assert_eq!(window_bounds(10, 3, 1), Some(((7, 9), (4, 6))));
        let mut values = vec![Some(0.0); 10];
        for (index, value) in [(4, 8.0), (5, 9.0), (6, 10.0), (7, 11.0), (8, 12.0), (9, 13.0)] {
            values[index] = Some(value);
        }
        let delta = compute_delta(&rows(&values), 3.0, DeltaAggregation::Avg, 1.0).unwrap();
        assert_relative_eq!(delta.curr, 12.0);
        assert_relative_eq!(delta.prev, 9.0);

        let summary = DeltaSummary::from(delta);
        assert_relative_eq!(summary.diff, 3.0);
        let display = DeltaDisplay::new(&summary, &DeltaConfig::default(), &NumberFormatter::default()).unwrap();
        assert_eq!(display.text, "33.3%");
        assert_eq!(display.direction, DeltaDirection::Up);
        assert_eq!(display.label(), "▲ 33.3%");
    }

    #[test]
    fn halves_split_exactly() {
        for n in 1..8 {
            assert_eq!(window_bounds(2 * n, n, 1), Some(((n, 2 * n - 1), (0, n - 1))));
        }
        let delta = compute_delta(&series(8), 4.0, DeltaAggregation::Sum, 1.0).unwrap();
        assert_eq!(delta.curr, 4.0 + 5.0 + 6.0 + 7.0);
        assert_eq!(delta.prev, 0.0 + 1.0 + 2.0 + 3.0);
    }

    #[test]
    fn offset_skips_whole_windows() {
        assert_eq!(window_bounds(10, 2, 2), Some(((8, 9), (4, 5))));
        let delta = compute_delta(&series(10), 2.0, DeltaAggregation::Last, 2.0).unwrap();
        assert_eq!(delta.curr, 9.0);
        assert_eq!(delta.prev, 5.0);
    }

    #[test]
    fn default_compares_last_two_points() {
        let delta = compute_delta(&series(5), 1.0, DeltaAggregation::Last, 1.0).unwrap();
        assert_eq!((delta.curr, delta.prev), (4.0, 3.0));
    }

    #[test]
    fn windows_clamp_at_series_start() {
        assert_eq!(window_bounds(2, 5, 3), Some(((0, 1), (0, 0))));
        assert!(compute_delta(&series(2), 5.0, DeltaAggregation::Sum, 3.0).is_some());
    }

    #[test]
    fn empty_window_means_no_delta() {
        assert!(compute_delta(&[], 1.0, DeltaAggregation::Last, 1.0).is_none());
        let gaps = rows(&[None, None, Some(1.0), Some(2.0)]);
        assert!(compute_delta(&gaps, 2.0, DeltaAggregation::Sum, 1.0).is_none());
    }

    #[test]
    fn zero_previous_suppresses_percent_only() {
        let summary = DeltaSummary::from(DeltaWindows { curr: 5.0, prev: 0.0 });
        assert_eq!(summary.pct, None);
        let formatter = NumberFormatter::default();
        assert!(DeltaDisplay::new(&summary, &DeltaConfig::default(), &formatter).is_none());

        let absolute = DeltaConfig {
            display: DeltaDisplayMode::Absolute,
            ..DeltaConfig::default()
        };
        let display = DeltaDisplay::new(&summary, &absolute, &formatter).unwrap();
        assert_eq!(display.direction, DeltaDirection::Up);
        assert_eq!(display.text, "5");
    }

    #[test]
    fn negative_base_uses_magnitude() {
        let summary = DeltaSummary::from(DeltaWindows { curr: -5.0, prev: -10.0 });
        assert_relative_eq!(summary.pct.unwrap(), 50.0);
    }

    #[test]
    fn flat_change_uses_square_glyph() {
        let summary = DeltaSummary::from(DeltaWindows { curr: 2.0, prev: 2.0 });
        let display = DeltaDisplay::new(&summary, &DeltaConfig::default(), &NumberFormatter::default()).unwrap();
        assert_eq!(display.label(), "■ 0.0%");
    }
}
