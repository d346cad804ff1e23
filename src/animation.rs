//! Animated KPI counter with generation-based cancellation.
//!
//! The host owns an [`AnimationGeneration`] per card. Starting a counter
//! takes a fresh [`AnimationToken`], which invalidates every token handed out
//! before it. Frames requested through a stale token come back as `None`, so
//! a superseded animation stops writing without any shared timer state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::format::NumberFormatter;

/// Default counter duration in milliseconds.
pub const DEFAULT_VALUE_ANIMATION_MS: u64 = 1000;

/// Validated animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Animate the KPI value at all.
    pub enabled: bool,
    /// Counter duration.
    pub duration_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: DEFAULT_VALUE_ANIMATION_MS,
        }
    }
}

/// Monotonic animation generation shared between a card and its tokens.
#[derive(Debug, Clone, Default)]
pub struct AnimationGeneration {
    current: Arc<AtomicU64>,
}

impl AnimationGeneration {
    /// Create a counter at generation zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation and return its token.
    pub fn begin(&self) -> AnimationToken {
        let id = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        AnimationToken {
            current: Arc::clone(&self.current),
            id,
        }
    }

    /// Invalidate every outstanding token.
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::AcqRel);
    }
}

/// Handle identifying one animation generation.
#[derive(Debug, Clone)]
pub struct AnimationToken {
    current: Arc<AtomicU64>,
    id: u64,
}

impl AnimationToken {
    /// Generation number of this token.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Check whether no newer animation has started since this token.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.id
    }
}

/// Ease-out cubic: fast start, slow finish.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    1.0 - (1.0 - progress).powi(3)
}

/// One frame of a counter animation.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterFrame {
    /// Text to show.
    pub text: String,
    /// True for the final frame.
    pub done: bool,
}

/// Counter running from a start value to the KPI value.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    token: AnimationToken,
    start: f64,
    target: Option<f64>,
    duration_ms: u64,
    formatter: NumberFormatter,
}

impl CounterAnimation {
    /// Animate from zero to `target`.
    pub fn new(
        token: AnimationToken,
        target: Option<f64>,
        duration_ms: u64,
        formatter: NumberFormatter,
    ) -> Self {
        Self {
            token,
            start: 0.0,
            target,
            duration_ms,
            formatter,
        }
    }

    /// Start from `start` instead of zero.
    pub fn from_value(mut self, start: f64) -> Self {
        if start.is_finite() {
            self.start = start;
        }
        self
    }

    /// Frame at `elapsed_ms` after the start.
    ///
    /// Returns `None` once a newer animation has started. Intermediate frames
    /// use the animation formatting; the final frame is formatted exactly like
    /// the static KPI text.
    pub fn frame(&self, elapsed_ms: f64) -> Option<CounterFrame> {
        if !self.token.is_current() {
            return None;
        }
        let Some(target) = self.target.filter(|target| target.is_finite()) else {
            return Some(self.final_frame());
        };
        let progress = if self.duration_ms == 0 || !elapsed_ms.is_finite() {
            1.0
        } else {
            elapsed_ms / self.duration_ms as f64
        };
        if progress >= 1.0 {
            return Some(self.final_frame());
        }
        let value = self.start + (target - self.start) * ease_out_cubic(progress);
        Some(CounterFrame {
            text: self.formatter.format_frame(value),
            done: false,
        })
    }

    fn final_frame(&self) -> CounterFrame {
        CounterFrame {
            text: self.formatter.format(self.target),
            done: true,
        }
    }
}
