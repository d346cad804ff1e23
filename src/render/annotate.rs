//! Derived sparkline geometry: area fill and extreme markers.

use crate::geom::{ScaledPoint, ScreenPoint};

use super::path::{Path, PathCommand};

/// Close `line` down to `baseline` to form the area under the sparkline.
///
/// Returns `None` when the line is empty.
pub fn area_path(line: &Path, points: &[ScaledPoint], baseline: f64) -> Option<Path> {
    if line.is_empty() {
        return None;
    }
    let first = points.first()?;
    let last = points.last()?;
    let mut area = line.clone();
    area.push(PathCommand::LineTo(ScreenPoint::new(last.x, baseline)));
    area.push(PathCommand::LineTo(ScreenPoint::new(first.x, baseline)));
    area.push(PathCommand::Close);
    Some(area)
}

/// Which extreme a marker highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
}

/// Highlight of an extreme value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Minimum or maximum.
    pub kind: MarkerKind,
    /// Index into the series.
    pub index: usize,
    /// Raw value at the index.
    pub value: f64,
    /// Marker centre.
    pub position: ScreenPoint,
}

/// Indices of the first minimum and first maximum valid value.
pub fn extreme_indices<L>(pairs: &[(L, Option<f64>)]) -> Option<(usize, usize)> {
    let mut extremes: Option<((usize, f64), (usize, f64))> = None;
    for (index, (_, value)) in pairs.iter().enumerate() {
        let Some(value) = value.filter(|value| !value.is_nan()) else {
            continue;
        };
        extremes = Some(match extremes {
            None => ((index, value), (index, value)),
            Some((min, max)) => (
                if value < min.1 { (index, value) } else { min },
                if value > max.1 { (index, value) } else { max },
            ),
        });
    }
    extremes.map(|((min, _), (max, _))| (min, max))
}

/// Markers for the minimum and maximum of `pairs`, placed on `points`.
///
/// A marker is only produced when its point has a vertical position. The
/// minimum comes first; a constant series yields both markers on the same
/// point.
pub fn min_max_markers<L>(pairs: &[(L, Option<f64>)], points: &[ScaledPoint]) -> Vec<Marker> {
    let Some((min, max)) = extreme_indices(pairs) else {
        return Vec::new();
    };
    [(MarkerKind::Min, min), (MarkerKind::Max, max)]
        .into_iter()
        .filter_map(|(kind, index)| {
            let position = points.get(index)?.screen()?;
            let value = pairs.get(index)?.1?;
            Some(Marker {
                kind,
                index,
                value,
                position,
            })
        })
        .collect()
}
