//! Geometric primitives used by the sparkline pipeline.
//!
//! Everything here lives in pixel space: x grows to the right and y grows
//! downward, with the origin at the top-left of the sparkline box.

/// A point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in pixels.
    pub x: f64,
    /// Y value in pixels.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A sparkline vertex; `y` is `None` for a missing observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledPoint {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels, absent for missing values.
    pub y: Option<f64>,
}

impl ScaledPoint {
    /// Create a point with a known vertical position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y: Some(y) }
    }

    /// Create a placeholder for a missing observation.
    pub fn missing(x: f64) -> Self {
        Self { x, y: None }
    }

    /// Resolve into a screen point when the observation is present.
    pub fn screen(&self) -> Option<ScreenPoint> {
        self.y.map(|y| ScreenPoint::new(self.x, y))
    }
}

/// Pixel box the sparkline is drawn into.
///
/// `top_pad` and `bottom_pad` are carved out of `height`, so plotted values
/// occupy `top_pad..=top_pad + inner_height()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    /// Total width in pixels.
    pub width: f64,
    /// Total height in pixels, padding included.
    pub height: f64,
    /// Empty band above the highest value.
    pub top_pad: f64,
    /// Empty band below the lowest value.
    pub bottom_pad: f64,
}

impl PlotArea {
    /// Create a plot area, clamping negative paddings to zero.
    pub fn new(width: f64, height: f64, top_pad: f64, bottom_pad: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            top_pad: top_pad.max(0.0),
            bottom_pad: bottom_pad.max(0.0),
        }
    }

    /// Height available to values once padding is removed.
    pub fn inner_height(&self) -> f64 {
        (self.height - self.top_pad - self.bottom_pad).max(0.0)
    }

    /// Y coordinate of the bottom of the value band, used as area baseline.
    pub fn baseline(&self) -> f64 {
        self.top_pad + self.inner_height()
    }

    /// Check whether the area can hold a drawing.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
