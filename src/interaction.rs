//! Pointer hit-testing and quick trend-window selection.
//!
//! These helpers are called by the host integration layer in response to
//! pointer moves and button clicks. Any state they need (the selected quick
//! button) is owned by the caller and passed in.

use serde::Deserialize;
use tracing::trace;

use crate::datasource::WindowSpec;
use crate::geom::{ScaledPoint, ScreenPoint};

/// Point resolved under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// Index into the series.
    pub index: usize,
    /// Date label of the point.
    pub label: String,
    /// Raw value of the point.
    pub value: f64,
    /// Pixel position of the point.
    pub position: ScreenPoint,
}

/// Resolve the series point nearest to a pointer x-offset.
///
/// The offset is mapped onto the index space proportionally to `width`, so
/// the hit does not depend on the pointer's vertical position. Missing
/// values produce no hit.
pub fn hit_test<L: AsRef<str>>(
    pairs: &[(L, Option<f64>)],
    points: &[ScaledPoint],
    pointer_x: f64,
    width: f64,
) -> Option<Hit> {
    let count = points.len();
    if count == 0 {
        return None;
    }
    let ratio = if count == 1 {
        0.0
    } else {
        let ratio = pointer_x / width;
        if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
    };
    let index = (ratio * (count - 1) as f64).round() as usize;
    let (label, value) = pairs.get(index)?;
    let value = value.filter(|value| !value.is_nan())?;
    let position = points.get(index)?.screen()?;
    trace!(pointer_x, index, "sparkline hit");
    Some(Hit {
        index,
        label: label.as_ref().to_string(),
        value,
        position,
    })
}

/// Quick-select button position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonSlot {
    /// First button.
    Button1,
    /// Second button.
    #[default]
    Button2,
    /// Third button.
    Button3,
}

impl ButtonSlot {
    /// All slots in display order.
    pub const ALL: [Self; 3] = [Self::Button1, Self::Button2, Self::Button3];

    fn index(self) -> usize {
        match self {
            Self::Button1 => 0,
            Self::Button2 => 1,
            Self::Button3 => 2,
        }
    }
}

/// One quick-select button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickButton {
    /// Trend window size in points.
    pub points: usize,
    /// Caption.
    pub label: String,
}

impl QuickButton {
    /// Create a button.
    pub fn new(points: usize, label: impl Into<String>) -> Self {
        Self {
            points,
            label: label.into(),
        }
    }
}

/// Quick trend buttons that override the configured window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickButtons {
    buttons: [QuickButton; 3],
    default_slot: ButtonSlot,
    current: Option<ButtonSlot>,
}

impl Default for QuickButtons {
    fn default() -> Self {
        Self::new(
            [
                QuickButton::new(12, "12P"),
                QuickButton::new(60, "60P"),
                QuickButton::new(365, "1Y"),
            ],
            ButtonSlot::default(),
        )
    }
}

impl QuickButtons {
    /// Create a button set with a default selection.
    pub fn new(buttons: [QuickButton; 3], default_slot: ButtonSlot) -> Self {
        Self {
            buttons,
            default_slot,
            current: None,
        }
    }

    /// Record the selection stored with the card configuration.
    pub fn with_current(mut self, current: Option<ButtonSlot>) -> Self {
        self.current = current;
        self
    }

    /// Access a button.
    pub fn button(&self, slot: ButtonSlot) -> &QuickButton {
        &self.buttons[slot.index()]
    }

    /// Iterate buttons with their slots.
    pub fn iter(&self) -> impl Iterator<Item = (ButtonSlot, &QuickButton)> {
        ButtonSlot::ALL.into_iter().map(|slot| (slot, self.button(slot)))
    }

    /// Active slot: host-held selection, then stored selection, then default.
    pub fn active_slot(&self, held: Option<ButtonSlot>) -> ButtonSlot {
        held.or(self.current).unwrap_or(self.default_slot)
    }

    /// Trend window implied by the active slot.
    pub fn window(&self, held: Option<ButtonSlot>) -> WindowSpec {
        WindowSpec::LastNPoints(self.button(self.active_slot(held)).points.max(1))
    }

    /// Find the slot showing `points`.
    pub fn slot_for_points(&self, points: usize) -> Option<ButtonSlot> {
        self.iter()
            .find(|(_, button)| button.points == points)
            .map(|(slot, _)| slot)
    }
}

/// Quick-select state owned by the host between renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuickSelection {
    held: Option<ButtonSlot>,
}

impl QuickSelection {
    /// Start from a previously held slot.
    pub fn new(held: Option<ButtonSlot>) -> Self {
        Self { held }
    }

    /// Slot currently held by the host, if any.
    pub fn held(&self) -> Option<ButtonSlot> {
        self.held
    }

    /// Handle a click on a button showing `points` and return the new window.
    ///
    /// Unknown values still switch the window but leave the held slot as is.
    pub fn click(&mut self, buttons: &QuickButtons, points: usize) -> WindowSpec {
        if let Some(slot) = buttons.slot_for_points(points) {
            self.held = Some(slot);
        }
        WindowSpec::LastNPoints(points.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(count: usize) -> (Vec<(String, Option<f64>)>, Vec<ScaledPoint>) {
        let pairs = (0..count).map(|index| (format!("d{index}"), Some(index as f64))).collect();
        let points = (0..count)
            .map(|index| ScaledPoint::new(index as f64 * 10.0, 5.0))
            .collect();
        (pairs, points)
    }

    #[test]
    fn pointer_maps_to_nearest_index() {
        let (pairs, points) = line(5);
        let hit = hit_test(&pairs, &points, 26.0, 40.0).unwrap();
        assert_eq!(hit.index, 3);
        assert_eq!(hit.label, "d3");
        assert_eq!(hit.position, ScreenPoint::new(30.0, 5.0));
    }

    #[test]
    fn pointer_outside_clamps_to_edges() {
        let (pairs, points) = line(5);
        assert_eq!(hit_test(&pairs, &points, -20.0, 40.0).unwrap().index, 0);
        assert_eq!(hit_test(&pairs, &points, 400.0, 40.0).unwrap().index, 4);
    }

    #[test]
    fn single_point_always_hits_index_zero() {
        let (pairs, points) = line(1);
        assert_eq!(hit_test(&pairs, &points, 35.0, 40.0).unwrap().index, 0);
    }

    #[test]
    fn missing_value_is_not_a_hit() {
        let pairs = vec![("a", Some(1.0)), ("b", None), ("c", Some(3.0))];
        let points = vec![
            ScaledPoint::new(0.0, 1.0),
            ScaledPoint::missing(50.0),
            ScaledPoint::new(100.0, 2.0),
        ];
        assert!(hit_test(&pairs, &points, 50.0, 100.0).is_none());
        assert!(hit_test(&pairs, &[], 50.0, 100.0).is_none());
    }

    #[test]
    fn zero_width_resolves_to_first_point() {
        let (pairs, points) = line(3);
        assert_eq!(hit_test(&pairs, &points, 10.0, 0.0).unwrap().index, 0);
    }

    #[test]
    fn selection_priority() {
        let buttons = QuickButtons::default();
        assert_eq!(buttons.active_slot(None), ButtonSlot::Button2);
        assert_eq!(buttons.window(None), WindowSpec::LastNPoints(60));

        let stored = buttons.clone().with_current(Some(ButtonSlot::Button3));
        assert_eq!(stored.window(None), WindowSpec::LastNPoints(365));
        assert_eq!(stored.window(Some(ButtonSlot::Button1)), WindowSpec::LastNPoints(12));
    }

    #[test]
    fn click_updates_held_slot() {
        let buttons = QuickButtons::default();
        let mut selection = QuickSelection::default();
        assert_eq!(selection.click(&buttons, 12), WindowSpec::LastNPoints(12));
        assert_eq!(selection.held(), Some(ButtonSlot::Button1));

        assert_eq!(selection.click(&buttons, 30), WindowSpec::LastNPoints(30));
        assert_eq!(selection.held(), Some(ButtonSlot::Button1));
        assert_eq!(buttons.window(selection.held()), WindowSpec::LastNPoints(12));
    }
}
