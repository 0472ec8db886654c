//! Frame budget for the animation loop.

use crate::constants::{FRAME_BUDGET_LOW_END_MS, FRAME_BUDGET_MS, LOW_END_THREADS};

/// Minimum spacing between frames for a device with `threads` logical cores.
/// An unknown count (0) is treated as a full-speed device.
pub fn frame_budget_ms(threads: u32) -> f64 {
    if threads > 0 && threads <= LOW_END_THREADS {
        FRAME_BUDGET_LOW_END_MS
    } else {
        FRAME_BUDGET_MS
    }
}

/// Drops callbacks that arrive before the budget has elapsed.
#[derive(Clone, Debug)]
pub struct FrameGate {
    budget_ms: f64,
    last_ms: Option<f64>,
}

impl FrameGate {
    pub fn new(budget_ms: f64) -> Self {
        Self {
            budget_ms: budget_ms.max(0.0),
            last_ms: None,
        }
    }

    pub fn for_threads(threads: u32) -> Self {
        Self::new(frame_budget_ms(threads))
    }

    #[inline]
    pub fn budget_ms(&self) -> f64 {
        self.budget_ms
    }

    /// Returns true and records `now_ms` when a frame may run.
    pub fn admit(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.budget_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// The next frame after a pause runs immediately.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for FrameGate {
    fn default() -> Self {
        Self::new(FRAME_BUDGET_MS)
    }
}
