//! Host option map and its validated, per-stage form.
//!
//! [`CardOptions`] mirrors the flat property bag a host stores for a card
//! (camelCase keys, every key optional). [`CardOptions::validate`] checks
//! each value once and produces a [`CardConfig`] whose fields feed the
//! individual pipeline stages directly.

use serde::Deserialize;

use crate::aggregate::{AggregationMode, KpiScope};
use crate::animation::{AnimationConfig, DEFAULT_VALUE_ANIMATION_MS};
use crate::datasource::window::{DEFAULT_WINDOW_DAYS, DEFAULT_WINDOW_POINTS, WindowMode};
use crate::datasource::WindowSpec;
use crate::delta::{
    DEFAULT_DELTA_DECIMALS, DEFAULT_DELTA_OFFSET, DEFAULT_DELTA_POINTS, DeltaAggregation,
    DeltaConfig, DeltaDisplayMode,
};
use crate::error::{ConfigError, Result};
use crate::format::FormatConfig;
use crate::interaction::{ButtonSlot, QuickButton, QuickButtons};
use crate::render::{Corners, DEFAULT_PLOT_PAD, DEFAULT_PULSE_RADIUS, SparklineConfig, SparklineMode};
use crate::style::{Color, LineStyle, Theme};

/// Largest accepted decimal count.
pub const MAX_DECIMALS: usize = 20;

const CUSTOM: &str = "custom";
const PREFIXES: [&str; 7] = ["", "₺", "$", "€", "£", "¥", "₹"];
const SUFFIXES: [&str; 5] = ["", "%", "K", "M", "B"];

/// Raw card options as stored by the host.
///
/// Each field reads the camelCase host key named in its doc. Keys the card
/// does not use are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardOptions {
    /// `trendWindowMode`: which rows feed the sparkline.
    pub trend_window_mode: WindowMode,
    /// `trendWindowPoints`: row count for a point window.
    pub trend_window_points: f64,
    /// `trendWindowDays`: ordinal span for a day window.
    pub trend_window_days: f64,

    /// `kpiAgg`: reduction producing the headline.
    pub kpi_agg: AggregationMode,
    /// `kpiScope`: rows the headline is computed over.
    pub kpi_scope: KpiScope,

    /// `showDelta`: compute the period-over-period delta.
    pub show_delta: bool,
    /// `deltaPoints`: rows per delta window.
    pub delta_points: f64,
    /// `deltaOffset`: how many windows back the comparison sits.
    pub delta_offset: f64,
    /// `deltaAgg`: reduction applied to each delta window.
    pub delta_agg: DeltaAggregation,
    /// `deltaDecimals`: decimals of the delta percentage.
    pub delta_decimals: f64,
    /// `deltaDisplay`: show the percentage or the absolute change.
    pub delta_display: DeltaDisplayMode,

    /// `trendMode`: line or area sparkline.
    pub trend_mode: SparklineMode,
    /// `trendCorners`: sharp or smooth path.
    pub trend_corners: Corners,
    /// `showMinMax`: draw min/max markers.
    pub show_min_max: bool,
    /// `showTooltip`: enable pointer tooltips.
    pub show_tooltip: bool,
    /// `showLabelDates`: show first and last window dates.
    pub show_label_dates: bool,
    /// `pulseRadius`: marker pulse radius in pixels.
    pub pulse_radius: f64,
    /// `topPadPx`: padding above the sparkline.
    pub top_pad_px: f64,
    /// `bottomPadPx`: padding below the sparkline.
    pub bottom_pad_px: f64,

    /// `valuePrefix`: currency prefix, or `custom`.
    pub value_prefix: String,
    /// `valuePrefixCustom`: prefix used when `valuePrefix` is `custom`.
    pub value_prefix_custom: String,
    /// `valueSuffix`: unit suffix, or `custom`.
    pub value_suffix: String,
    /// `valueSuffixCustom`: suffix used when `valueSuffix` is `custom`.
    pub value_suffix_custom: String,
    /// `numberFormat`: host number format pattern.
    pub number_format: Option<String>,
    /// `shortFormat`: scale large values to K/M/B.
    pub short_format: bool,
    /// `scaledDecimals`: decimals of scaled values.
    pub scaled_decimals: f64,
    /// `plainDecimals`: fixed decimals of unscaled values.
    pub plain_decimals: Option<f64>,
    /// `percentDecimals`: decimals of percent values.
    pub percent_decimals: f64,

    /// `lineColor`: sparkline stroke color.
    pub line_color: String,
    /// `lineWidth`: sparkline stroke width.
    pub line_width: f64,
    /// `areaColor`: area fill color.
    pub area_color: String,
    /// `areaOpacity`: area fill opacity.
    pub area_opacity: f64,
    /// `deltaUpColor`: color of a rising delta.
    pub delta_up_color: String,
    /// `deltaDownColor`: color of a falling delta.
    pub delta_down_color: String,
    /// `deltaNeutralColor`: color of a flat delta.
    pub delta_neutral_color: String,
    /// `pulseMinColor`: min marker color.
    pub pulse_min_color: String,
    /// `pulseMaxColor`: max marker color.
    pub pulse_max_color: String,

    /// `showQuickButtons`: show the quick window buttons.
    pub show_quick_buttons: bool,
    /// `button1Value`: point count of the first button.
    pub button1_value: f64,
    /// `button1Label`: label of the first button.
    pub button1_label: String,
    /// `button2Value`: point count of the second button.
    pub button2_value: f64,
    /// `button2Label`: label of the second button.
    pub button2_label: String,
    /// `button3Value`: point count of the third button.
    pub button3_value: f64,
    /// `button3Label`: label of the third button.
    pub button3_label: String,
    /// `defaultButton`: button active when nothing is selected.
    pub default_button: ButtonSlot,
    /// `currentSelectedButton`: selection persisted by the host.
    pub current_selected_button: Option<ButtonSlot>,

    /// `animateValue`: animate the headline counter.
    pub animate_value: bool,
    /// `valueAnimDuration`: counter animation length in milliseconds.
    pub value_anim_duration: f64,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            trend_window_mode: WindowMode::LastNPoints,
            trend_window_points: DEFAULT_WINDOW_POINTS as f64,
            trend_window_days: DEFAULT_WINDOW_DAYS as f64,
            kpi_agg: AggregationMode::default(),
            kpi_scope: KpiScope::default(),
            show_delta: true,
            delta_points: DEFAULT_DELTA_POINTS as f64,
            delta_offset: DEFAULT_DELTA_OFFSET as f64,
            delta_agg: DeltaAggregation::default(),
            delta_decimals: DEFAULT_DELTA_DECIMALS as f64,
            delta_display: DeltaDisplayMode::default(),
            trend_mode: SparklineMode::default(),
            trend_corners: Corners::default(),
            show_min_max: true,
            show_tooltip: true,
            show_label_dates: true,
            pulse_radius: DEFAULT_PULSE_RADIUS,
            top_pad_px: DEFAULT_PLOT_PAD,
            bottom_pad_px: DEFAULT_PLOT_PAD,
            value_prefix: String::new(),
            value_prefix_custom: String::new(),
            value_suffix: String::new(),
            value_suffix_custom: String::new(),
            number_format: None,
            short_format: true,
            scaled_decimals: 1.0,
            plain_decimals: None,
            percent_decimals: 0.0,
            line_color: "#3f51b5".to_string(),
            line_width: 1.5,
            area_color: "#3f51b5".to_string(),
            area_opacity: 0.2,
            delta_up_color: "#16a34a".to_string(),
            delta_down_color: "#dc2626".to_string(),
            delta_neutral_color: "#9ca3af".to_string(),
            pulse_min_color: "#dc2626".to_string(),
            pulse_max_color: "#16a34a".to_string(),
            show_quick_buttons: true,
            button1_value: 12.0,
            button1_label: "12P".to_string(),
            button2_value: 60.0,
            button2_label: "60P".to_string(),
            button3_value: 365.0,
            button3_label: "1Y".to_string(),
            default_button: ButtonSlot::default(),
            current_selected_button: None,
            animate_value: true,
            value_anim_duration: DEFAULT_VALUE_ANIMATION_MS as f64,
        }
    }
}

/// Validated configuration, one section per pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    /// Trend window policy.
    pub window: WindowSpec,
    /// Headline reduction.
    pub kpi_aggregation: AggregationMode,
    /// Rows feeding the headline.
    pub kpi_scope: KpiScope,
    /// Delta settings, `None` when the delta is hidden.
    pub delta: Option<DeltaConfig>,
    /// Number formatting.
    pub format: FormatConfig,
    /// Sparkline geometry.
    pub sparkline: SparklineConfig,
    /// Emit start/end date labels.
    pub show_labels: bool,
    /// Quick trend buttons, `None` when hidden.
    pub quick_buttons: Option<QuickButtons>,
    /// KPI counter animation.
    pub animation: AnimationConfig,
    /// Colors.
    pub theme: Theme,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            window: WindowSpec::LastNPoints(DEFAULT_WINDOW_POINTS),
            kpi_aggregation: AggregationMode::default(),
            kpi_scope: KpiScope::default(),
            delta: Some(DeltaConfig::default()),
            format: FormatConfig::default(),
            sparkline: SparklineConfig::default(),
            show_labels: true,
            quick_buttons: Some(QuickButtons::default()),
            animation: AnimationConfig::default(),
            theme: Theme::default(),
        }
    }
}

impl CardConfig {
    /// Parse and validate a JSON option map.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: CardOptions = serde_json::from_str(json)?;
        options.validate()
    }

    /// Trend window after applying the active quick button, if any.
    pub fn effective_window(&self, held: Option<ButtonSlot>) -> WindowSpec {
        match &self.quick_buttons {
            Some(buttons) => buttons.window(held),
            None => self.window,
        }
    }
}

impl CardOptions {
    /// Check every option and build the typed configuration.
    pub fn validate(&self) -> Result<CardConfig> {
        let window = match self.trend_window_mode {
            WindowMode::All => WindowSpec::All,
            WindowMode::LastNPoints => {
                WindowSpec::LastNPoints(count("trendWindowPoints", self.trend_window_points)?)
            }
            WindowMode::LastNDays => {
                WindowSpec::LastNDays(count("trendWindowDays", self.trend_window_days)?)
            }
        };

        let delta = if self.show_delta {
            Some(DeltaConfig {
                points: count("deltaPoints", self.delta_points)?,
                offset: count("deltaOffset", self.delta_offset)?,
                aggregation: self.delta_agg,
                decimals: decimals("deltaDecimals", self.delta_decimals)?,
                display: self.delta_display,
            })
        } else {
            None
        };

        let format = FormatConfig {
            pattern: self.number_format.clone().filter(|pattern| !pattern.is_empty()),
            short_format: self.short_format,
            scaled_decimals: decimals("scaledDecimals", self.scaled_decimals)?,
            plain_decimals: self
                .plain_decimals
                .map(|value| decimals("plainDecimals", value))
                .transpose()?,
            percent_decimals: decimals("percentDecimals", self.percent_decimals)?,
            prefix: affix("valuePrefix", &self.value_prefix, &self.value_prefix_custom, &PREFIXES)?,
            suffix: affix("valueSuffix", &self.value_suffix, &self.value_suffix_custom, &SUFFIXES)?,
        };

        let sparkline = SparklineConfig {
            mode: self.trend_mode,
            corners: self.trend_corners,
            show_min_max: self.show_min_max,
            show_tooltip: self.show_tooltip,
            pulse_radius: non_negative("pulseRadius", self.pulse_radius)?,
            top_pad: non_negative("topPadPx", self.top_pad_px)?,
            bottom_pad: non_negative("bottomPadPx", self.bottom_pad_px)?,
        };

        let quick_buttons = if self.show_quick_buttons {
            let buttons = [
                QuickButton::new(count("button1Value", self.button1_value)?, &self.button1_label),
                QuickButton::new(count("button2Value", self.button2_value)?, &self.button2_label),
                QuickButton::new(count("button3Value", self.button3_value)?, &self.button3_label),
            ];
            Some(QuickButtons::new(buttons, self.default_button).with_current(self.current_selected_button))
        } else {
            None
        };

        let animation = AnimationConfig {
            enabled: self.animate_value,
            duration_ms: non_negative("valueAnimDuration", self.value_anim_duration)?.round() as u64,
        };

        if !(0.0..=1.0).contains(&self.area_opacity) {
            return Err(ConfigError::invalid("areaOpacity", format!("{} is outside 0..=1", self.area_opacity)));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(ConfigError::invalid("lineWidth", format!("{} is not a positive width", self.line_width)));
        }
        let theme = Theme {
            line: LineStyle {
                color: color("lineColor", &self.line_color)?,
                width: self.line_width as f32,
            },
            area: color("areaColor", &self.area_color)?.with_alpha(self.area_opacity as f32),
            delta_up: color("deltaUpColor", &self.delta_up_color)?,
            delta_down: color("deltaDownColor", &self.delta_down_color)?,
            delta_neutral: color("deltaNeutralColor", &self.delta_neutral_color)?,
            pulse_min: color("pulseMinColor", &self.pulse_min_color)?,
            pulse_max: color("pulseMaxColor", &self.pulse_max_color)?,
        };

        Ok(CardConfig {
            window,
            kpi_aggregation: self.kpi_agg,
            kpi_scope: self.kpi_scope,
            delta,
            format,
            sparkline,
            show_labels: self.show_label_dates,
            quick_buttons,
            animation,
            theme,
        })
    }
}

/// Positive count, floored and clamped to at least 1.
fn count(option: &'static str, value: f64) -> Result<usize> {
    if value.is_finite() && value > 0.0 {
        Ok((value.floor() as usize).max(1))
    } else {
        Err(ConfigError::invalid(option, format!("{value} is not a positive count")))
    }
}

fn decimals(option: &'static str, value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value <= MAX_DECIMALS as f64 {
        Ok(value.floor() as usize)
    } else {
        Err(ConfigError::invalid(option, format!("{value} is outside 0..={MAX_DECIMALS}")))
    }
}

fn non_negative(option: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(option, format!("{value} is negative or not finite")))
    }
}

fn color(option: &'static str, text: &str) -> Result<Color> {
    Color::parse(text).ok_or_else(|| ConfigError::invalid(option, format!("`{text}` is not a color")))
}

/// Resolve a prefix/suffix choice; `custom` selects the free-text value.
fn affix(option: &'static str, choice: &str, custom: &str, known: &[&str]) -> Result<Option<String>> {
    let text = if choice == CUSTOM {
        custom
    } else if known.contains(&choice) {
        choice
    } else {
        return Err(ConfigError::invalid(option, format!("unknown choice `{choice}`")));
    };
    Ok((!text.is_empty()).then(|| text.to_string()))
}
