//! Trend-window selection over sorted rows.

use std::borrow::Cow;

use serde::Deserialize;

use super::Row;

/// Default point count for [`WindowSpec::LastNPoints`].
pub const DEFAULT_WINDOW_POINTS: usize = 60;
/// Default day count for [`WindowSpec::LastNDays`].
pub const DEFAULT_WINDOW_DAYS: usize = 180;

/// Window mode as named in the host option map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowMode {
    /// Use every row.
    #[default]
    All,
    /// Keep the last N rows.
    LastNPoints,
    /// Keep rows within N ordinal units of the last row.
    LastNDays,
}

/// Policy selecting the trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowSpec {
    /// Every row.
    #[default]
    All,
    /// The last `n` rows, `n >= 1`.
    LastNPoints(usize),
    /// Rows whose ordinal is at least `last - n`, `n >= 1`.
    LastNDays(usize),
}

impl WindowSpec {
    /// Build a point window from a raw count, flooring and clamping to 1.
    pub fn last_n_points(n: f64) -> Self {
        Self::LastNPoints(floor_count(n))
    }

    /// Build a day window from a raw count, flooring and clamping to 1.
    pub fn last_n_days(n: f64) -> Self {
        Self::LastNDays(floor_count(n))
    }

    /// Resolve a host mode and its sizes into a window.
    pub fn from_mode(mode: WindowMode, points: f64, days: f64) -> Self {
        match mode {
            WindowMode::All => Self::All,
            WindowMode::LastNPoints => Self::last_n_points(points),
            WindowMode::LastNDays => Self::last_n_days(days),
        }
    }
}

fn floor_count(n: f64) -> usize {
    if n.is_finite() && n >= 1.0 {
        n.floor() as usize
    } else {
        1
    }
}

/// Select the trend window from rows sorted by ordinal.
///
/// Point windows borrow a tail of `rows`. A day window borrows its tail too,
/// unless rows with a non-finite ordinal fall inside it: those are left out
/// and the window is collected. When a day window would be empty (or the
/// last ordinal is not finite) all rows are returned.
pub fn filter(rows: &[Row], spec: WindowSpec) -> Cow<'_, [Row]> {
    if rows.is_empty() {
        return Cow::Borrowed(rows);
    }
    match spec {
        WindowSpec::All => Cow::Borrowed(rows),
        WindowSpec::LastNPoints(n) => {
            let n = n.max(1);
            Cow::Borrowed(&rows[rows.len().saturating_sub(n)..])
        }
        WindowSpec::LastNDays(days) => last_n_days(rows, days.max(1)),
    }
}

fn last_n_days(rows: &[Row], days: usize) -> Cow<'_, [Row]> {
    let Some(end) = rows.last().map(|row| row.date_ordinal) else {
        return Cow::Borrowed(rows);
    };
    if !end.is_finite() {
        return Cow::Borrowed(rows);
    }
    let threshold = end - days as f64;
    let mut start = rows.len();
    for (index, row) in rows.iter().enumerate().rev() {
        let ordinal = row.date_ordinal;
        if !ordinal.is_finite() {
            continue;
        }
        if ordinal >= threshold {
            start = index;
        } else {
            break;
        }
    }
    if start == rows.len() {
        return Cow::Borrowed(rows);
    }
    let tail = &rows[start..];
    if tail.iter().all(|row| row.date_ordinal.is_finite()) {
        Cow::Borrowed(tail)
    } else {
        Cow::Owned(
            tail.iter()
                .filter(|row| row.date_ordinal.is_finite())
                .cloned()
                .collect(),
        )
    }
}
