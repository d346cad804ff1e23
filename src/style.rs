//! Colors and stroke styling for card elements.

use std::fmt;

use crate::delta::DeltaDirection;
use crate::render::annotate::MarkerKind;

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Parse `#rgb`, `#rrggbb` or `transparent`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        let hex = text.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        match hex.len() {
            3 => {
                let mut channels = hex
                    .chars()
                    .map(|digit| channel(&digit.to_string()).map(|value| value * 17));
                Some(Self::rgb8(channels.next()??, channels.next()??, channels.next()??))
            }
            6 => Some(Self::rgb8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |channel: f32| (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
        } else {
            write!(
                f,
                "rgba({},{},{},{})",
                byte(self.r),
                byte(self.g),
                byte(self.b),
                self.a.clamp(0.0, 1.0)
            )
        }
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb8(0x3f, 0x51, 0xb5),
            width: 1.5,
        }
    }
}

/// Colors used by the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Sparkline stroke.
    pub line: LineStyle,
    /// Area fill, alpha carries the area opacity.
    pub area: Color,
    /// Increasing delta.
    pub delta_up: Color,
    /// Decreasing delta.
    pub delta_down: Color,
    /// Unchanged delta.
    pub delta_neutral: Color,
    /// Minimum marker.
    pub pulse_min: Color,
    /// Maximum marker.
    pub pulse_max: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            line: LineStyle::default(),
            area: Color::rgb8(0x3f, 0x51, 0xb5).with_alpha(0.2),
            delta_up: Color::rgb8(0x16, 0xa3, 0x4a),
            delta_down: Color::rgb8(0xdc, 0x26, 0x26),
            delta_neutral: Color::rgb8(0x9c, 0xa3, 0xaf),
            pulse_min: Color::rgb8(0xdc, 0x26, 0x26),
            pulse_max: Color::rgb8(0x16, 0xa3, 0x4a),
        }
    }
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Color of the delta indicator.
    pub fn delta_color(&self, direction: DeltaDirection) -> Color {
        match direction {
            DeltaDirection::Up => self.delta_up,
            DeltaDirection::Down => self.delta_down,
            DeltaDirection::Flat => self.delta_neutral,
        }
    }

    /// Color of a min/max marker.
    pub fn marker_color(&self, kind: MarkerKind) -> Color {
        match kind {
            MarkerKind::Min => self.pulse_min,
            MarkerKind::Max => self.pulse_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#16a34a"), Some(Color::rgb8(0x16, 0xa3, 0x4a)));
        assert_eq!(Color::parse("#fff"), Some(Color::rgb8(255, 255, 255)));
        assert_eq!(Color::parse(" transparent "), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("16a34a"), None);
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gg0000"), None);
    }

    #[test]
    fn displays_as_css() {
        assert_eq!(Color::rgb8(0x3f, 0x51, 0xb5).to_string(), "#3f51b5");
        assert_eq!(Color::rgb8(255, 0, 0).with_alpha(0.5).to_string(), "rgba(255,0,0,0.5)");
    }

    #[test]
    fn default_theme_colors() {
        let theme = Theme::new();
        assert_eq!(theme.delta_color(DeltaDirection::Up).to_string(), "#16a34a");
        assert_eq!(theme.delta_color(DeltaDirection::Down).to_string(), "#dc2626");
        assert_eq!(theme.delta_color(DeltaDirection::Flat).to_string(), "#9ca3af");
        assert_eq!(theme.marker_color(MarkerKind::Min), theme.delta_down);
        assert_eq!(theme.marker_color(MarkerKind::Max), theme.delta_up);
        assert!((theme.area.a - 0.2).abs() < f32::EPSILON);
    }
}
