//! kpi_card turns a date/measure result set into a KPI card: a headline
//! value, a period-over-period delta and sparkline geometry.
//! Every stage is a pure function; host state is passed in explicitly.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod animation;
pub mod card;
pub mod config;
pub mod datasource;
pub mod delta;
pub mod error;
pub mod format;
pub mod geom;
pub mod interaction;
pub mod render;
pub mod style;
pub mod transform;
pub mod view;

pub use aggregate::{AggregationMode, KpiScope, aggregate};
pub use animation::{AnimationConfig, AnimationGeneration, AnimationToken, CounterAnimation, CounterFrame};
pub use card::{CardFrame, KpiCard, KpiCardBuilder, ViewportCache, validate_rows};
pub use config::{CardConfig, CardOptions};
pub use datasource::{Cell, Row, TabularRow, WindowSpec, filter, normalize};
pub use delta::{
    DeltaAggregation, DeltaConfig, DeltaDirection, DeltaDisplay, DeltaDisplayMode, DeltaSummary,
    DeltaWindows, compute_delta,
};
pub use error::{ConfigError, Result};
pub use format::{FormatConfig, NativeFormat, NumberFormatter};
pub use geom::{PlotArea, ScaledPoint, ScreenPoint};
pub use interaction::{ButtonSlot, Hit, QuickButton, QuickButtons, QuickSelection, hit_test};
pub use render::{
    Corners, Marker, MarkerKind, Path, PathCommand, Sparkline, SparklineConfig, SparklineMode,
    Tooltip, area_path, build_path, build_sparkline, min_max_markers,
};
pub use style::{Color, LineStyle, Theme};
pub use transform::{Transform, scale};
pub use view::{ValueRange, Viewport};
