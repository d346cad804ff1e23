//! Mapping from `(index, value)` pairs into sparkline pixel space.

use crate::geom::{PlotArea, ScaledPoint};
use crate::view::{VALUE_PADDING_FRACTION, ValueRange};

/// Transform from series positions and values into pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    area: PlotArea,
    range: ValueRange,
    count: usize,
}

impl Transform {
    /// Create a transform for `count` points spanning `range`.
    ///
    /// `range` is used as given; [`Transform::for_values`] derives a padded one.
    pub fn new(area: PlotArea, range: ValueRange, count: usize) -> Self {
        Self { area, range, count }
    }

    /// Create a transform whose range covers `values` plus padding.
    pub fn for_values<I>(area: PlotArea, values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let count = values.len();
        let range = ValueRange::from_values(values).padded(VALUE_PADDING_FRACTION);
        Self::new(area, range, count)
    }

    /// Access the plot area.
    pub fn area(&self) -> PlotArea {
        self.area
    }

    /// Access the value range.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Horizontal position of the point at `index`.
    pub fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            return self.area.width / 2.0;
        }
        index as f64 / (self.count - 1) as f64 * self.area.width
    }

    /// Vertical position of `value`; `None` for non-finite values.
    pub fn y(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let height = self.area.inner_height();
        let y = match self.range.normalize(value) {
            Some(norm) => self.area.top_pad + height * (1.0 - norm),
            None => self.area.top_pad + height / 2.0,
        };
        Some(y)
    }

    /// Map one observation.
    pub fn point(&self, index: usize, value: Option<f64>) -> ScaledPoint {
        let x = self.x(index);
        match value.and_then(|value| self.y(value)) {
            Some(y) => ScaledPoint::new(x, y),
            None => ScaledPoint::missing(x),
        }
    }
}

/// Scale `(label, value)` pairs into pixel space.
///
/// The output has one point per pair, in order. Missing values keep their x
/// position with no y. Constant and single-point series sit on the vertical
/// midpoint of the value band.
pub fn scale<L>(pairs: &[(L, Option<f64>)], area: PlotArea) -> Vec<ScaledPoint> {
    let transform = Transform::for_values(area, pairs.iter().map(|(_, value)| *value));
    pairs
        .iter()
        .enumerate()
        .map(|(index, (_, value))| transform.point(index, *value))
        .collect()
}
