//! Number formatting for KPI values, deltas and tooltips.
//!
//! Formatting runs in three stages: percentage detection, host-native
//! formatting through an optional [`NativeFormat`] hook, and a manual
//! fallback that abbreviates large magnitudes with `K`, `M` and `B`.
//! Prefixes and suffixes are applied last.

use std::sync::Arc;

use tracing::warn;

/// Placeholder shown for missing values.
pub const MISSING: &str = "-";

const SCALE_STEPS: [(f64, char); 3] = [(1e9, 'B'), (1e6, 'M'), (1e3, 'K')];

/// Host-native number formatting hook.
///
/// The callback receives the value and the host format pattern and returns
/// `None` when it cannot format the value.
#[derive(Clone, Default)]
pub enum NativeFormat {
    /// No host formatter; the manual fallback is always used.
    #[default]
    Unavailable,
    /// Host formatter callback.
    Host(Arc<dyn Fn(f64, &str) -> Option<String> + Send + Sync>),
}

impl NativeFormat {
    /// Wrap a host formatter callback.
    pub fn host(format: impl Fn(f64, &str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Host(Arc::new(format))
    }

    fn apply(&self, value: f64, pattern: &str) -> Option<String> {
        match self {
            Self::Unavailable => None,
            Self::Host(format) => {
                let formatted = format(value, pattern).filter(|text| !text.is_empty());
                if formatted.is_none() {
                    warn!(value, pattern, "native formatter failed, using manual scaling");
                }
                formatted
            }
        }
    }
}

impl std::fmt::Debug for NativeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "NativeFormat::Unavailable"),
            Self::Host(_) => write!(f, "NativeFormat::Host(..)"),
        }
    }
}

/// Validated formatting options.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatConfig {
    /// Host numeric-format pattern, e.g. `#,##0.00` or `0.0%`.
    pub pattern: Option<String>,
    /// Abbreviate magnitudes of 1000 and above with `K`/`M`/`B`.
    pub short_format: bool,
    /// Decimals of abbreviated values.
    pub scaled_decimals: usize,
    /// Decimals of unabbreviated values; `None` prints the shortest exact form.
    pub plain_decimals: Option<usize>,
    /// Decimals of percentages when the pattern does not specify them.
    pub percent_decimals: usize,
    /// Text placed before the number.
    pub prefix: Option<String>,
    /// Text placed after the number.
    pub suffix: Option<String>,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            short_format: true,
            scaled_decimals: 1,
            plain_decimals: None,
            percent_decimals: 0,
            prefix: None,
            suffix: None,
        }
    }
}

impl FormatConfig {
    /// Check whether values are percentages, by pattern or by suffix.
    pub fn is_percent(&self) -> bool {
        self.pattern.as_deref().is_some_and(|pattern| pattern.contains('%'))
            || self.suffix.as_deref() == Some("%")
    }
}

/// Rendering flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatStyle {
    /// Final, exact display.
    Display,
    /// Intermediate animation frames: whole numbers, two-decimal percentages.
    Frame,
}

/// Formatter combining a [`FormatConfig`] with an optional native hook.
#[derive(Debug, Clone, Default)]
pub struct NumberFormatter {
    config: FormatConfig,
    native: NativeFormat,
}

impl NumberFormatter {
    /// Create a formatter without native formatting.
    pub fn new(config: FormatConfig) -> Self {
        Self {
            config,
            native: NativeFormat::Unavailable,
        }
    }

    /// Attach a native formatter.
    pub fn with_native(mut self, native: NativeFormat) -> Self {
        self.native = native;
        self
    }

    /// Access the configuration.
    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Format a value for display.
    pub fn format(&self, value: Option<f64>) -> String {
        self.format_with(value, FormatStyle::Display)
    }

    /// Format an intermediate animation value.
    pub fn format_frame(&self, value: f64) -> String {
        self.format_with(Some(value), FormatStyle::Frame)
    }

    /// Format a value in the given style.
    pub fn format_with(&self, value: Option<f64>, style: FormatStyle) -> String {
        let Some(value) = value.filter(|value| value.is_finite()) else {
            return MISSING.to_string();
        };
        if self.config.is_percent() {
            return self.format_percent(value, style);
        }
        let body = self.format_number(value, style);
        let mut out = String::with_capacity(body.len() + 8);
        if let Some(prefix) = &self.config.prefix {
            out.push_str(prefix);
        }
        out.push_str(&body);
        if let Some(suffix) = &self.config.suffix {
            out.push_str(suffix);
        }
        out
    }

    fn format_percent(&self, value: f64, style: FormatStyle) -> String {
        let scaled = if value.abs() <= 1.0 { value * 100.0 } else { value };
        let default_decimals = match style {
            FormatStyle::Display => self.config.percent_decimals,
            FormatStyle::Frame => 2,
        };
        let decimals = self
            .config
            .pattern
            .as_deref()
            .and_then(pattern_percent_decimals)
            .unwrap_or(default_decimals);
        // Percent output never carries the configured suffix.
        let prefix = self.config.prefix.as_deref().unwrap_or("");
        format!("{prefix}{scaled:.decimals$}%")
    }

    fn format_number(&self, value: f64, style: FormatStyle) -> String {
        let native = self
            .config
            .pattern
            .as_deref()
            .and_then(|pattern| self.native.apply(value, pattern));
        match native {
            Some(text) if !self.needs_scaling(&text, value) => text,
            _ => self.format_manual(value, style),
        }
    }

    fn needs_scaling(&self, text: &str, value: f64) -> bool {
        self.config.short_format
            && value.abs() >= 1e3
            && !text.contains(|c: char| matches!(c, 'K' | 'M' | 'B'))
    }

    fn format_manual(&self, value: f64, style: FormatStyle) -> String {
        if self.config.short_format {
            let abs = value.abs();
            if let Some((divisor, unit)) = SCALE_STEPS.iter().find(|(divisor, _)| abs >= *divisor) {
                let decimals = self.config.scaled_decimals;
                return format!("{:.decimals$}{unit}", value / divisor);
            }
        }
        let plain = match (style, self.config.plain_decimals) {
            (FormatStyle::Frame, _) => format!("{:.0}", value.round()),
            (FormatStyle::Display, Some(decimals)) => format!("{value:.decimals$}"),
            (FormatStyle::Display, None) => format!("{value}"),
        };
        if self.config.short_format {
            plain
        } else {
            group_thousands(&plain)
        }
    }
}

/// Fractional digit count written before the `%` of a format pattern.
fn pattern_percent_decimals(pattern: &str) -> Option<usize> {
    let percent = pattern.rfind('%')?;
    let head = &pattern[..percent];
    head.match_indices('.').find_map(|(index, _)| {
        let digits = head[index + 1..]
            .chars()
            .take_while(char::is_ascii_digit)
            .count();
        (digits > 0).then_some(digits)
    })
}

/// Insert `,` between groups of three integer digits.
pub fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };
    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }
    let mut grouped = String::with_capacity(number.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push_str(fraction);
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percent_suffix() -> NumberFormatter {
        NumberFormatter::new(FormatConfig {
            suffix: Some("%".into()),
            ..FormatConfig::default()
        })
    }

    #[test]
    fn missing_values_render_as_dash() {
        let formatter = NumberFormatter::default();
        assert_eq!(formatter.format(None), "-");
        assert_eq!(formatter.format(Some(f64::NAN)), "-");
    }

    #[test]
    fn scale_suffix_boundaries() {
        let formatter = NumberFormatter::default();
        assert_eq!(formatter.format(Some(999.0)), "999");
        assert_eq!(formatter.format(Some(1000.0)), "1.0K");
        assert_eq!(formatter.format(Some(2_500_000.0)), "2.5M");
        assert_eq!(formatter.format(Some(1_000_000_000.0)), "1.0B");
        assert_eq!(formatter.format(Some(-4200.0)), "-4.2K");
    }

    #[test]
    fn scaled_decimals_are_configurable() {
        let formatter = NumberFormatter::new(FormatConfig {
            scaled_decimals: 2,
            ..FormatConfig::default()
        });
        assert_eq!(formatter.format(Some(1_234_567_890.0)), "1.23B");
    }

    #[test]
    fn percent_by_suffix() {
        let formatter = percent_suffix();
        assert_eq!(formatter.format(Some(1500.0)), "1500%");
        assert_eq!(formatter.format(Some(0.15)), "15%");
        assert_eq!(formatter.format(Some(-0.5)), "-50%");
    }

    #[test]
    fn percent_decimals_from_pattern() {
        let formatter = NumberFormatter::new(FormatConfig {
            pattern: Some("0.00%".into()),
            prefix: Some("~".into()),
            suffix: Some("pts".into()),
            ..FormatConfig::default()
        });
        assert_eq!(formatter.format(Some(0.1234)), "~12.34%");
        assert_eq!(pattern_percent_decimals("#,##0%"), None);
        assert_eq!(pattern_percent_decimals("0.0 %"), Some(1));
    }

    #[test]
    fn frame_style_uses_two_percent_decimals() {
        assert_eq!(percent_suffix().format_frame(0.5), "50.00%");
        assert_eq!(NumberFormatter::default().format_frame(12.7), "13");
    }

    #[test]
    fn affixes_wrap_scaled_values() {
        let formatter = NumberFormatter::new(FormatConfig {
            prefix: Some("$".into()),
            suffix: Some(" USD".into()),
            ..FormatConfig::default()
        });
        assert_eq!(formatter.format(Some(12_000.0)), "$12.0K USD");
        assert_eq!(formatter.format(None), "-");
    }

    #[test]
    fn native_result_is_kept_when_already_scaled() {
        let native = NativeFormat::host(|value, _| Some(format!("{:.2}K", value / 1e3)));
        let formatter = NumberFormatter::new(FormatConfig {
            pattern: Some("#,##0".into()),
            ..FormatConfig::default()
        })
        .with_native(native);
        assert_eq!(formatter.format(Some(1500.0)), "1.50K");
    }

    #[test]
    fn native_result_without_scale_falls_back() {
        let native = NativeFormat::host(|value, _| Some(format!("{value}")));
        let formatter = NumberFormatter::new(FormatConfig {
            pattern: Some("#,##0".into()),
            ..FormatConfig::default()
        })
        .with_native(native);
        assert_eq!(formatter.format(Some(1500.0)), "1.5K");
        assert_eq!(formatter.format(Some(15.0)), "15");
    }

    #[test]
    fn failing_native_formatter_falls_back() {
        let formatter = NumberFormatter::new(FormatConfig {
            pattern: Some("#,##0".into()),
            ..FormatConfig::default()
        })
        .with_native(NativeFormat::host(|_, _| None));
        assert_eq!(formatter.format(Some(2_000_000.0)), "2.0M");
    }

    #[test]
    fn long_format_groups_thousands() {
        let formatter = NumberFormatter::new(FormatConfig {
            short_format: false,
            plain_decimals: Some(2),
            ..FormatConfig::default()
        });
        assert_eq!(formatter.format(Some(1_234_567.891)), "1,234,567.89");
        assert_eq!(formatter.format(Some(-1000.0)), "-1,000.00");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("123456"), "123,456");
    }

    #[test]
    fn long_format_keeps_native_text() {
        let formatter = NumberFormatter::new(FormatConfig {
            pattern: Some("#,##0".into()),
            short_format: false,
            ..FormatConfig::default()
        })
        .with_native(NativeFormat::host(|_, _| Some("1 234 567".into())));
        assert_eq!(formatter.format(Some(1_234_567.0)), "1 234 567");
    }
}
