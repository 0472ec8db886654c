//! Scroll-stage progress: maps page position to a regime.
//!
//! Sections of the page carry a stage value in `[0, 1]`. A marker line
//! slightly above mid-viewport is interpolated between the stages around
//! it, smoothed over frames, and bucketed into a scroll regime.

use crate::regime::Regime;

/// Fraction of the viewport height where the marker line sits.
pub const MARKER_FRACTION: f32 = 0.46;
pub const PROGRESS_SMOOTHING: f32 = 0.12;
pub const VELOCITY_GAIN: f32 = 18.0;
pub const VELOCITY_CAP: f32 = 14.0;
pub const VELOCITY_BLEND: f32 = 0.3;
pub const VELOCITY_DECAY: f32 = 0.16;
const SETTLE_PROGRESS: f32 = 0.001;
const SETTLE_VELOCITY: f32 = 0.04;

pub fn regime_from_progress(progress: f32) -> Regime {
    match progress {
        p if p < 0.16 => Regime::Unstable,
        p if p < 0.32 => Regime::Compressing,
        p if p < 0.5 => Regime::Collision,
        p if p < 0.68 => Regime::Rupture,
        p if p < 0.86 => Regime::Reordering,
        _ => Regime::Stabilized,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StagePoint {
    /// Document offset of the stage element.
    pub top: f32,
    pub value: f32,
}

impl StagePoint {
    /// Unparseable or non-finite values read as 0; others are clamped to `[0, 1]`.
    pub fn parse(top: f32, raw: Option<&str>) -> Self {
        let value = raw
            .and_then(|r| r.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .map_or(0.0, |v| v.clamp(0.0, 1.0));
        Self { top, value }
    }
}

/// Sorts by document offset.
pub fn sort_stages(points: &mut [StagePoint]) {
    points.sort_by(|a, b| a.top.total_cmp(&b.top));
}

/// Piecewise-linear progress at `marker`; `points` must be sorted.
pub fn interpolate_progress(points: &[StagePoint], marker: f32) -> f32 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (f, l),
        _ => return 0.0,
    };
    if points.len() == 1 || marker <= first.top {
        return first.value;
    }
    for pair in points.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        if marker > next.top {
            continue;
        }
        let span = (next.top - current.top).max(1.0);
        let ratio = ((marker - current.top) / span).clamp(0.0, 1.0);
        return current.value + (next.value - current.value) * ratio;
    }
    last.value
}

/// Smoothed progress and scroll velocity between frames.
#[derive(Clone, Debug)]
pub struct ProgressSmoother {
    progress: f32,
    target: f32,
    velocity: f32,
    last_y: f32,
    last_ms: f64,
}

impl ProgressSmoother {
    pub fn new(initial: f32, scroll_y: f32, now_ms: f64) -> Self {
        let initial = if initial.is_finite() {
            initial.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            progress: initial,
            target: initial,
            velocity: 0.0,
            last_y: scroll_y,
            last_ms: now_ms,
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity.clamp(0.0, VELOCITY_CAP)
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    /// Folds a scroll event into the velocity estimate.
    pub fn on_scroll(&mut self, scroll_y: f32, now_ms: f64) {
        let dy = scroll_y - self.last_y;
        let dt = (now_ms - self.last_ms).max(1.0) as f32;
        self.last_y = scroll_y;
        self.last_ms = now_ms;

        let instant = (dy.abs() / dt * VELOCITY_GAIN).clamp(0.0, VELOCITY_CAP);
        self.velocity += (instant - self.velocity) * VELOCITY_BLEND;
    }

    /// Advances one frame; returns whether another frame is needed to settle.
    pub fn step(&mut self, reduced_motion: bool) -> bool {
        if reduced_motion {
            self.progress = self.target;
        } else {
            self.progress += (self.target - self.progress) * PROGRESS_SMOOTHING;
        }
        self.velocity -= self.velocity * VELOCITY_DECAY;

        (self.target - self.progress).abs() > SETTLE_PROGRESS || self.velocity > SETTLE_VELOCITY
    }

    pub fn regime(&self) -> Regime {
        regime_from_progress(self.progress)
    }

    /// `data-field-progress` value, 4 dp.
    pub fn progress_attr(&self) -> String {
        format!("{:.4}", self.progress.clamp(0.0, 1.0))
    }

    /// `data-scroll-velocity` value, 3 dp.
    pub fn velocity_attr(&self) -> String {
        format!("{:.3}", self.velocity())
    }
}
