//! Sparkline path construction.

use std::fmt;

use crate::geom::{ScaledPoint, ScreenPoint};

/// One SVG path command in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath (`M`).
    MoveTo(ScreenPoint),
    /// Straight segment (`L`).
    LineTo(ScreenPoint),
    /// Quadratic curve (`Q`) through `control` ending at `end`.
    QuadTo {
        /// Control point.
        control: ScreenPoint,
        /// End point.
        end: ScreenPoint,
    },
    /// Smooth quadratic continuation (`T`).
    SmoothQuadTo(ScreenPoint),
    /// Close the current subpath (`Z`).
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(p) => write!(f, "M{},{}", p.x, p.y),
            Self::LineTo(p) => write!(f, "L{},{}", p.x, p.y),
            Self::QuadTo { control, end } => {
                write!(f, "Q{},{} {},{}", control.x, control.y, end.x, end.y)
            }
            Self::SmoothQuadTo(p) => write!(f, "T{},{}", p.x, p.y),
            Self::Close => f.write_str("Z"),
        }
    }
}

/// Ordered list of path commands.
///
/// `Display` renders the SVG `d` attribute, commands separated by spaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Access the commands.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check whether the path has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Render the SVG `d` attribute.
    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, command) in self.commands.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}

/// Build the sparkline path through `points`.
///
/// The straight variant skips missing points and keeps connecting across
/// them. The smooth variant drops the cursor at a missing point and starts
/// a new subpath at the next present one; only the final run gets a `T`
/// terminator.
pub fn build_path(points: &[ScaledPoint], smooth: bool) -> Path {
    if smooth {
        smooth_path(points)
    } else {
        straight_path(points)
    }
}

fn straight_path(points: &[ScaledPoint]) -> Path {
    let mut path = Path::new();
    for point in points.iter().filter_map(ScaledPoint::screen) {
        if path.is_empty() {
            path.push(PathCommand::MoveTo(point));
        } else {
            path.push(PathCommand::LineTo(point));
        }
    }
    path
}

fn smooth_path(points: &[ScaledPoint]) -> Path {
    let mut path = Path::new();
    let mut prev: Option<ScreenPoint> = None;
    for point in points {
        let Some(point) = point.screen() else {
            prev = None;
            continue;
        };
        match prev {
            None => path.push(PathCommand::MoveTo(point)),
            Some(last) => path.push(PathCommand::QuadTo {
                control: last,
                end: ScreenPoint::new((last.x + point.x) / 2.0, (last.y + point.y) / 2.0),
            }),
        }
        prev = Some(point);
    }
    if let Some(last) = prev {
        path.push(PathCommand::SmoothQuadTo(last));
    }
    path
}
