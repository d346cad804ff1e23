//! Card entry point: rows in, render-ready frame out.

use tracing::debug;

use crate::aggregate::{KpiScope, aggregate};
use crate::animation::{AnimationGeneration, CounterAnimation};
use crate::config::CardConfig;
use crate::datasource::{Row, TabularRow, WindowSpec, filter, normalize, pairs};
use crate::delta::{DeltaDisplay, DeltaSummary, compute_delta_windows};
use crate::format::{NativeFormat, NumberFormatter};
use crate::interaction::ButtonSlot;
use crate::render::{Sparkline, build_sparkline};
use crate::style::Color;
use crate::view::Viewport;

/// Message shown when the host supplies no rows.
pub const EMPTY_STATE_MESSAGE: &str = "No data available";

/// Everything a drawing layer needs for one card render.
#[derive(Debug, Clone, PartialEq)]
pub struct CardFrame {
    /// Headline value.
    pub kpi_value: Option<f64>,
    /// Formatted headline.
    pub kpi_text: String,
    /// Period-over-period comparison.
    pub delta: Option<DeltaSummary>,
    /// Delta indicator ready for display.
    pub delta_display: Option<DeltaDisplay>,
    /// Color of the delta indicator.
    pub delta_color: Option<Color>,
    /// First and last date labels of the trend window.
    pub labels: Option<(String, String)>,
    /// Trend window actually applied.
    pub window: WindowSpec,
    /// Sparkline geometry.
    pub sparkline: Option<Sparkline>,
    /// Placeholder message replacing the card content.
    pub empty_state: Option<String>,
}

impl CardFrame {
    fn empty(window: WindowSpec) -> Self {
        Self {
            kpi_value: None,
            kpi_text: crate::format::MISSING.to_string(),
            delta: None,
            delta_display: None,
            delta_color: None,
            labels: None,
            window,
            sparkline: None,
            empty_state: Some(EMPTY_STATE_MESSAGE.to_string()),
        }
    }
}

/// Check that the host supplied something to draw.
///
/// Returns the empty-state message otherwise.
pub fn validate_rows(rows: &[TabularRow]) -> Option<&'static str> {
    rows.is_empty().then_some(EMPTY_STATE_MESSAGE)
}

/// KPI card with validated configuration.
#[derive(Debug, Clone, Default)]
pub struct KpiCard {
    config: CardConfig,
    formatter: NumberFormatter,
}

impl KpiCard {
    /// Create a card with the given configuration and no native formatting.
    pub fn new(config: CardConfig) -> Self {
        let formatter = NumberFormatter::new(config.format.clone());
        Self { config, formatter }
    }

    /// Start building a card with custom configuration.
    pub fn builder() -> KpiCardBuilder {
        KpiCardBuilder::default()
    }

    /// Access the configuration.
    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Access the number formatter.
    pub fn formatter(&self) -> &NumberFormatter {
        &self.formatter
    }

    /// Render `rows` into a frame for a sparkline of `viewport` size.
    pub fn render(&self, rows: &[TabularRow], viewport: Viewport) -> CardFrame {
        self.render_with_selection(rows, viewport, None)
    }

    /// Render with a quick-button selection held by the host.
    pub fn render_with_selection(
        &self,
        rows: &[TabularRow],
        viewport: Viewport,
        held: Option<ButtonSlot>,
    ) -> CardFrame {
        let window_spec = self.config.effective_window(held);
        if validate_rows(rows).is_some() {
            debug!(?window_spec, "no rows, rendering empty state");
            return CardFrame::empty(window_spec);
        }

        let rows = normalize(rows);
        let window = filter(&rows, window_spec);
        debug!(
            rows = rows.len(),
            window = window.len(),
            ?window_spec,
            aggregation = ?self.config.kpi_aggregation,
            scope = ?self.config.kpi_scope,
            "rendering card"
        );

        let kpi_rows: &[Row] = match self.config.kpi_scope {
            KpiScope::Full => rows.as_slice(),
            KpiScope::Window => &window,
        };
        let kpi_value = aggregate(&pairs(kpi_rows), self.config.kpi_aggregation);

        let (delta, delta_display) = self.delta(&rows);
        let delta_color = delta_display
            .as_ref()
            .map(|display| self.config.theme.delta_color(display.direction));

        let window_pairs = pairs(&window);
        let labels = self.config.show_labels.then(|| window_labels(&window));
        let area = self.config.sparkline.plot_area(viewport.width, viewport.height);
        let sparkline = build_sparkline(&window_pairs, area, &self.config.sparkline);

        CardFrame {
            kpi_value,
            kpi_text: self.formatter.format(kpi_value),
            delta,
            delta_display,
            delta_color,
            labels,
            window: window_spec,
            sparkline,
            empty_state: None,
        }
    }

    fn delta(&self, rows: &[Row]) -> (Option<DeltaSummary>, Option<DeltaDisplay>) {
        let Some(config) = &self.config.delta else {
            return (None, None);
        };
        let Some(windows) = compute_delta_windows(rows, config.points, config.aggregation, config.offset)
        else {
            debug!(rows = rows.len(), points = config.points, offset = config.offset, "insufficient data for delta");
            return (None, None);
        };
        let summary = DeltaSummary::from(windows);
        let display = DeltaDisplay::new(&summary, config, &self.formatter);
        (Some(summary), display)
    }

    /// Counter animation for the headline of `frame`.
    ///
    /// Starting it invalidates any counter previously started from
    /// `generation`. Returns `None` when animation is disabled.
    pub fn counter(&self, frame: &CardFrame, generation: &AnimationGeneration) -> Option<CounterAnimation> {
        if !self.config.animation.enabled {
            return None;
        }
        Some(CounterAnimation::new(
            generation.begin(),
            frame.kpi_value,
            self.config.animation.duration_ms,
            self.formatter.clone(),
        ))
    }
}

fn window_labels(window: &[Row]) -> (String, String) {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => (first.date_text.clone(), last.date_text.clone()),
        _ => (String::new(), String::new()),
    }
}

/// Builder for [`KpiCard`].
#[derive(Debug, Default)]
pub struct KpiCardBuilder {
    config: CardConfig,
    native: NativeFormat,
}

impl KpiCardBuilder {
    /// Use a validated configuration.
    pub fn config(mut self, config: CardConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a host-native number formatter.
    pub fn native_format(mut self, native: NativeFormat) -> Self {
        self.native = native;
        self
    }

    /// Build the card.
    pub fn build(self) -> KpiCard {
        let formatter = NumberFormatter::new(self.config.format.clone()).with_native(self.native);
        KpiCard {
            config: self.config,
            formatter,
        }
    }
}

/// Last container size seen by the host, in whole pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportCache {
    last: Option<(i64, i64)>,
}

impl ViewportCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `viewport` and report whether a re-render is needed.
    ///
    /// Sizes that round to the same whole pixels count as unchanged.
    pub fn update(&mut self, viewport: Viewport) -> bool {
        let size = viewport.whole_pixels();
        if self.last == Some(size) {
            return false;
        }
        self.last = Some(size);
        true
    }

    /// Forget the recorded size.
    pub fn clear(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregationMode;
    use crate::delta::DeltaDirection;
    use crate::render::MarkerKind;
    use approx::assert_relative_eq;

    fn rows(values: &[f64]) -> Vec<TabularRow> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| TabularRow::new(format!("d{index}"), index as f64, *value))
            .collect()
    }

    fn viewport() -> Viewport {
        Viewport::new(200.0, 40.0)
    }

    #[test]
    fn renders_last_value_and_delta() {
        let card = KpiCard::default();
        let frame = card.render(&rows(&[10.0, 20.0, 15.0]), viewport());
        assert_eq!(frame.kpi_value, Some(15.0));
        assert_eq!(frame.kpi_text, "15");
        let delta = frame.delta.unwrap();
        assert_eq!((delta.curr, delta.prev), (15.0, 20.0));
        let display = frame.delta_display.unwrap();
        assert_eq!(display.label(), "▼ -25.0%");
        assert_eq!(frame.delta_color, Some(card.config().theme.delta_down));
        assert_eq!(frame.labels, Some(("d0".to_string(), "d2".to_string())));
        assert!(frame.empty_state.is_none());
    }

    #[test]
    fn single_row_is_centered() {
        let frame = KpiCard::default().render(&rows(&[42.0]), viewport());
        let sparkline = frame.sparkline.unwrap();
        let point = sparkline.points()[0];
        assert_relative_eq!(point.x, 100.0);
        assert_relative_eq!(point.y.unwrap(), 20.0);
        assert_eq!(sparkline.line().to_svg(), "M100,20");
    }

    #[test]
    fn constant_series_has_no_nan() {
        let frame = KpiCard::default().render(&rows(&[5.0; 5]), viewport());
        let sparkline = frame.sparkline.unwrap();
        for point in sparkline.points() {
            assert!(point.x.is_finite());
            assert_relative_eq!(point.y.unwrap(), 20.0);
        }
        let svg = sparkline.line().to_svg();
        assert!(!svg.contains("NaN") && !svg.contains("inf"));
        assert_eq!(sparkline.markers().len(), 2);
        assert_eq!(sparkline.markers()[0].kind, MarkerKind::Min);
        assert_eq!(frame.delta_display.unwrap().direction, DeltaDirection::Flat);
    }

    #[test]
    fn empty_rows_render_empty_state() {
        let frame = KpiCard::default().render(&[], viewport());
        assert_eq!(frame.empty_state.as_deref(), Some(EMPTY_STATE_MESSAGE));
        assert_eq!(frame.kpi_text, "-");
        assert!(frame.sparkline.is_none());
        assert_eq!(validate_rows(&[]), Some("No data available"));
    }

    #[test]
    fn window_scope_limits_kpi_rows() {
        let mut config = CardConfig {
            kpi_aggregation: AggregationMode::Sum,
            quick_buttons: None,
            window: WindowSpec::LastNPoints(2),
            ..CardConfig::default()
        };
        let data = rows(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(KpiCard::new(config.clone()).render(&data, viewport()).kpi_value, Some(10.0));

        config.kpi_scope = KpiScope::Window;
        let frame = KpiCard::new(config).render(&data, viewport());
        assert_eq!(frame.kpi_value, Some(7.0));
        assert_eq!(frame.sparkline.unwrap().points().len(), 2);
        assert_eq!(frame.labels, Some(("d2".to_string(), "d3".to_string())));
    }

    #[test]
    fn quick_selection_overrides_window() {
        let card = KpiCard::default();
        let data = rows(&(0..100).map(f64::from).collect::<Vec<_>>());
        assert_eq!(card.render(&data, viewport()).window, WindowSpec::LastNPoints(60));
        let frame = card.render_with_selection(&data, viewport(), Some(ButtonSlot::Button1));
        assert_eq!(frame.window, WindowSpec::LastNPoints(12));
        assert_eq!(frame.sparkline.unwrap().points().len(), 12);
    }

    #[test]
    fn rows_are_sorted_before_use() {
        let data = vec![
            TabularRow::new("b", 2.0, 20.0),
            TabularRow::new("a", 1.0, 10.0),
            TabularRow::new("c", 3.0, 30.0),
        ];
        let frame = KpiCard::default().render(&data, viewport());
        assert_eq!(frame.kpi_value, Some(30.0));
        assert_eq!(frame.labels, Some(("a".to_string(), "c".to_string())));
    }

    #[test]
    fn hidden_labels_and_delta() {
        let config = CardConfig {
            show_labels: false,
            delta: None,
            ..CardConfig::default()
        };
        let frame = KpiCard::new(config).render(&rows(&[1.0, 2.0]), viewport());
        assert!(frame.labels.is_none());
        assert!(frame.delta.is_none());
        assert!(frame.delta_color.is_none());
    }

    #[test]
    fn zero_size_viewport_has_no_sparkline() {
        let frame = KpiCard::default().render(&rows(&[1.0, 2.0]), Viewport::new(0.0, 0.0));
        assert!(frame.sparkline.is_none());
        assert_eq!(frame.kpi_value, Some(2.0));
    }

    #[test]
    fn builder_attaches_native_format() {
        let card = KpiCard::builder()
            .native_format(NativeFormat::host(|value, _| Some(format!("<{value}>"))))
            .config(CardConfig::from_json(r##"{"numberFormat": "#,##0"}"##).unwrap())
            .build();
        let frame = card.render(&rows(&[7.0]), viewport());
        assert_eq!(frame.kpi_text, "<7>");
    }

    #[test]
    fn counter_follows_config() {
        let card = KpiCard::default();
        let frame = card.render(&rows(&[3.0, 4.0]), viewport());
        let generation = AnimationGeneration::new();
        let counter = card.counter(&frame, &generation).unwrap();
        assert_eq!(counter.frame(5000.0).unwrap().text, frame.kpi_text);

        let mut config = CardConfig::default();
        config.animation.enabled = false;
        assert!(KpiCard::new(config).counter(&frame, &generation).is_none());
    }

    #[test]
    fn viewport_cache_ignores_subpixel_changes() {
        let mut cache = ViewportCache::new();
        assert!(cache.update(Viewport::new(200.2, 40.0)));
        assert!(!cache.update(Viewport::new(199.9, 40.3)));
        assert!(cache.update(Viewport::new(201.0, 40.0)));
        cache.clear();
        assert!(cache.update(Viewport::new(201.0, 40.0)));
    }
}
