//! Value ranges and host viewport sizes.

/// Fraction of the value span added above and below the data.
pub const VALUE_PADDING_FRACTION: f64 = 0.1;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl ValueRange {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Range covering every finite value, collapsed to `0..=0` when there is none.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut range: Option<Self> = None;
        for value in values.into_iter().flatten().filter(|value| value.is_finite()) {
            range = Some(match range {
                None => Self::new(value, value),
                Some(mut existing) => {
                    existing.expand_to_include(value);
                    existing
                }
            });
        }
        range.unwrap_or(Self::new(0.0, 0.0))
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether every value maps onto the same point.
    pub fn is_collapsed(&self) -> bool {
        let span = self.span();
        span.is_nan() || span <= 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Add `frac` of the span on both sides; collapsed ranges stay as they are.
    pub fn padded(&self, frac: f64) -> Self {
        if self.is_collapsed() {
            return *self;
        }
        let padding = self.span() * frac;
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Position of `value` inside the range, 0 at `min` and 1 at `max`.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if self.is_collapsed() || !value.is_finite() {
            return None;
        }
        Some((value - self.min) / self.span())
    }
}

/// Host container size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport from a container size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size rounded to whole pixels, used to ignore sub-pixel churn.
    pub fn whole_pixels(&self) -> (i64, i64) {
        (round_px(self.width), round_px(self.height))
    }
}

fn round_px(value: f64) -> i64 {
    if value.is_finite() { value.round() as i64 } else { 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_collapse_to_zero() {
        let range = ValueRange::from_values([None, Some(f64::NAN)]);
        assert_eq!(range, ValueRange::new(0.0, 0.0));
        assert!(range.is_collapsed());
    }

    #[test]
    fn nan_bounds_count_as_collapsed() {
        assert!(ValueRange::new(f64::NAN, 1.0).is_collapsed());
        assert!(ValueRange::new(3.0, 3.0).is_collapsed());
        assert!(!ValueRange::new(1.0, 2.0).is_collapsed());
    }

    #[test]
    fn padding_adds_ten_percent_each_side() {
        let range = ValueRange::from_values([Some(10.0), Some(20.0)]).padded(VALUE_PADDING_FRACTION);
        assert!((range.min - 9.0).abs() < 1e-9);
        assert!((range.max - 21.0).abs() < 1e-9);
    }

    #[test]
    fn collapsed_range_ignores_padding() {
        let range = ValueRange::from_values([Some(5.0), Some(5.0)]).padded(VALUE_PADDING_FRACTION);
        assert_eq!(range, ValueRange::new(5.0, 5.0));
        assert!(range.normalize(5.0).is_none());
    }

    #[test]
    fn whole_pixels_rounds() {
        assert_eq!(Viewport::new(199.6, 80.2).whole_pixels(), (200, 80));
    }
}
