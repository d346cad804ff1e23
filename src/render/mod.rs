//! Sparkline geometry assembly.
//!
//! The types here are backend-agnostic: paths render to SVG `d` strings and
//! markers carry pixel positions, so any drawing layer can consume them.

pub mod annotate;
pub mod path;

use serde::Deserialize;
use tracing::trace;

use crate::format::NumberFormatter;
use crate::geom::{PlotArea, ScaledPoint, ScreenPoint};
use crate::interaction::hit_test;
use crate::transform::scale;

pub use annotate::{Marker, MarkerKind, area_path, min_max_markers};
pub use path::{Path, PathCommand, build_path};

/// Default padding above and below the value band, in pixels.
pub const DEFAULT_PLOT_PAD: f64 = 8.0;
/// Default configured pulse radius, in pixels.
pub const DEFAULT_PULSE_RADIUS: f64 = 1.8;

/// Sparkline fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparklineMode {
    /// Stroke only.
    #[default]
    Line,
    /// Stroke plus filled area down to the baseline.
    Area,
}

/// Corner style of the sparkline path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corners {
    /// Straight segments.
    #[default]
    Sharp,
    /// Quadratic curves through segment midpoints.
    Smooth,
}

/// Validated sparkline settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineConfig {
    /// Fill mode.
    pub mode: SparklineMode,
    /// Corner style.
    pub corners: Corners,
    /// Produce min/max markers.
    pub show_min_max: bool,
    /// Allow tooltip hit-testing.
    pub show_tooltip: bool,
    /// Configured pulse radius.
    pub pulse_radius: f64,
    /// Padding above the value band.
    pub top_pad: f64,
    /// Padding below the value band.
    pub bottom_pad: f64,
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self {
            mode: SparklineMode::default(),
            corners: Corners::default(),
            show_min_max: true,
            show_tooltip: true,
            pulse_radius: DEFAULT_PULSE_RADIUS,
            top_pad: DEFAULT_PLOT_PAD,
            bottom_pad: DEFAULT_PLOT_PAD,
        }
    }
}

impl SparklineConfig {
    /// Radius of the drawn min/max markers.
    pub fn marker_radius(&self) -> f64 {
        (self.pulse_radius * 0.7).max(1.2)
    }

    /// Plot area for a sparkline of the given size.
    pub fn plot_area(&self, width: f64, height: f64) -> PlotArea {
        PlotArea::new(width, height, self.top_pad, self.bottom_pad)
    }
}

/// Tooltip content for a hovered point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Index into the series.
    pub index: usize,
    /// Anchor position.
    pub position: ScreenPoint,
    /// Text in the form `label • value`.
    pub text: String,
}

/// Complete sparkline geometry for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparkline {
    area: PlotArea,
    pairs: Vec<(String, Option<f64>)>,
    points: Vec<ScaledPoint>,
    line: Path,
    fill: Option<Path>,
    markers: Vec<Marker>,
    marker_radius: f64,
    show_tooltip: bool,
}

impl Sparkline {
    /// Plot area the geometry was built for.
    pub fn area(&self) -> PlotArea {
        self.area
    }

    /// Source observations, in order.
    pub fn pairs(&self) -> &[(String, Option<f64>)] {
        &self.pairs
    }

    /// Scaled points, one per observation.
    pub fn points(&self) -> &[ScaledPoint] {
        &self.points
    }

    /// Stroke path.
    pub fn line(&self) -> &Path {
        &self.line
    }

    /// Area path, present in area mode.
    pub fn fill(&self) -> Option<&Path> {
        self.fill.as_ref()
    }

    /// Min/max markers.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Radius of the markers.
    pub fn marker_radius(&self) -> f64 {
        self.marker_radius
    }

    /// Tooltip for a pointer at `pointer_x` pixels from the left edge.
    ///
    /// Returns `None` when tooltips are disabled or the nearest point has no
    /// value.
    pub fn hit_test(&self, pointer_x: f64, formatter: &NumberFormatter) -> Option<Tooltip> {
        if !self.show_tooltip {
            return None;
        }
        let hit = hit_test(&self.pairs, &self.points, pointer_x, self.area.width)?;
        Some(Tooltip {
            index: hit.index,
            position: hit.position,
            text: format!("{} • {}", hit.label, formatter.format(Some(hit.value))),
        })
    }
}

/// Build sparkline geometry for `pairs` inside `area`.
///
/// Returns `None` when the area has no drawable size.
pub fn build_sparkline(
    pairs: &[(&str, Option<f64>)],
    area: PlotArea,
    config: &SparklineConfig,
) -> Option<Sparkline> {
    if !area.is_valid() {
        trace!(width = area.width, height = area.height, "sparkline area is empty");
        return None;
    }
    let points = scale(pairs, area);
    let line = build_path(&points, config.corners == Corners::Smooth);
    let fill = match config.mode {
        SparklineMode::Area => area_path(&line, &points, area.baseline()),
        SparklineMode::Line => None,
    };
    let markers = if config.show_min_max {
        min_max_markers(pairs, &points)
    } else {
        Vec::new()
    };
    Some(Sparkline {
        area,
        pairs: pairs
            .iter()
            .map(|(label, value)| ((*label).to_string(), *value))
            .collect(),
        points,
        line,
        fill,
        markers,
        marker_radius: config.marker_radius(),
        show_tooltip: config.show_tooltip,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pairs() -> Vec<(&'static str, Option<f64>)> {
        vec![("Jan", Some(10.0)), ("Feb", Some(30.0)), ("Mar", Some(20.0))]
    }

    #[test]
    fn line_mode_has_no_fill() {
        let config = SparklineConfig::default();
        let area = config.plot_area(100.0, 40.0);
        let sparkline = build_sparkline(&pairs(), area, &config).unwrap();
        assert_eq!(sparkline.points().len(), 3);
        assert!(sparkline.fill().is_none());
        assert_eq!(sparkline.line().commands().len(), 3);
        assert_eq!(sparkline.markers().len(), 2);
    }

    #[test]
    fn area_mode_closes_on_baseline() {
        let config = SparklineConfig {
            mode: SparklineMode::Area,
            ..SparklineConfig::default()
        };
        let sparkline = build_sparkline(&pairs(), config.plot_area(100.0, 40.0), &config).unwrap();
        let fill = sparkline.fill().unwrap();
        assert!(fill.to_svg().ends_with("L100,32 L0,32 Z"));
    }

    #[test]
    fn markers_can_be_disabled() {
        let config = SparklineConfig {
            show_min_max: false,
            ..SparklineConfig::default()
        };
        let sparkline = build_sparkline(&pairs(), config.plot_area(100.0, 40.0), &config).unwrap();
        assert!(sparkline.markers().is_empty());
    }

    #[test]
    fn marker_radius_has_floor() {
        assert_relative_eq!(SparklineConfig::default().marker_radius(), 1.26, epsilon = 1e-9);
        let small = SparklineConfig {
            pulse_radius: 1.0,
            ..SparklineConfig::default()
        };
        assert_relative_eq!(small.marker_radius(), 1.2);
    }

    #[test]
    fn empty_area_yields_nothing() {
        let config = SparklineConfig::default();
        assert!(build_sparkline(&pairs(), config.plot_area(0.0, 40.0), &config).is_none());
        assert!(build_sparkline(&pairs(), config.plot_area(100.0, 0.0), &config).is_none());
    }

    #[test]
    fn tooltip_text_joins_label_and_value() {
        let config = SparklineConfig::default();
        let sparkline = build_sparkline(&pairs(), config.plot_area(100.0, 40.0), &config).unwrap();
        let tooltip = sparkline.hit_test(52.0, &NumberFormatter::default()).unwrap();
        assert_eq!(tooltip.index, 1);
        assert_eq!(tooltip.text, "Feb • 30");
    }

    #[test]
    fn tooltip_can_be_disabled() {
        let config = SparklineConfig {
            show_tooltip: false,
            ..SparklineConfig::default()
        };
        let sparkline = build_sparkline(&pairs(), config.plot_area(100.0, 40.0), &config).unwrap();
        assert!(sparkline.hit_test(50.0, &NumberFormatter::default()).is_none());
    }
}
