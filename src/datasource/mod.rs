//! Host-supplied rows and their normalized form.
//!
//! The host hands over a tabular result set of `(date, measure)` cells. The
//! row model turns it into typed [`Row`]s sorted by date ordinal; everything
//! downstream works on those rows or on `(label, value)` pairs derived from
//! them.

pub mod window;

pub use window::{WindowSpec, filter};

use serde::Deserialize;

/// One cell of the host result set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Cell {
    /// Display text of the cell.
    pub text: Option<String>,
    /// Numeric representation; missing or non-numeric cells carry `None`.
    pub number: Option<f64>,
}

impl Cell {
    /// Create a cell with both text and number.
    pub fn new(text: impl Into<String>, number: f64) -> Self {
        Self {
            text: Some(text.into()),
            number: Some(number),
        }
    }

    /// Create a numeric cell without display text.
    pub fn number(number: f64) -> Self {
        Self {
            text: None,
            number: Some(number),
        }
    }
}

/// A `(dimension, measure)` record as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TabularRow {
    /// Date dimension cell.
    pub dimension: Option<Cell>,
    /// Measure cell.
    pub measure: Option<Cell>,
}

impl TabularRow {
    /// Build a row from a date label, its ordinal and a measure value.
    pub fn new(label: impl Into<String>, ordinal: f64, value: f64) -> Self {
        Self {
            dimension: Some(Cell::new(label, ordinal)),
            measure: Some(Cell::number(value)),
        }
    }
}

/// One normalized observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Date label shown to users.
    pub date_text: String,
    /// Numeric date, usually a day serial; may be non-finite.
    pub date_ordinal: f64,
    /// Measure value, `None` when missing or not a finite number.
    pub value: Option<f64>,
}

impl Row {
    /// Create a row.
    pub fn new(date_text: impl Into<String>, date_ordinal: f64, value: Option<f64>) -> Self {
        Self {
            date_text: date_text.into(),
            date_ordinal,
            value: value.filter(|value| value.is_finite()),
        }
    }

    /// Ordinal used for sorting; non-finite ordinals sort as 0.
    pub fn sort_key(&self) -> f64 {
        if self.date_ordinal.is_finite() {
            self.date_ordinal
        } else {
            0.0
        }
    }

    /// View the row as a `(label, value)` pair.
    pub fn pair(&self) -> (&str, Option<f64>) {
        (self.date_text.as_str(), self.value)
    }
}

/// Normalize host rows into [`Row`]s sorted ascending by date ordinal.
///
/// The sort is stable, so rows with equal (or non-finite) ordinals keep
/// their input order. Malformed rows are kept with a missing value.
pub fn normalize(rows: &[TabularRow]) -> Vec<Row> {
    let mut out: Vec<Row> = rows
        .iter()
        .map(|row| {
            let dimension = row.dimension.as_ref();
            Row::new(
                dimension
                    .and_then(|cell| cell.text.clone())
                    .unwrap_or_default(),
                dimension.and_then(|cell| cell.number).unwrap_or(f64::NAN),
                row.measure.as_ref().and_then(|cell| cell.number),
            )
        })
        .collect();
    out.sort_by(|a, b| a.sort_key().total_cmp(&b.sort_key()));
    out
}

/// Collect `(label, value)` pairs for a row slice.
pub fn pairs(rows: &[Row]) -> Vec<(&str, Option<f64>)> {
    rows.iter().map(Row::pair).collect()
}
