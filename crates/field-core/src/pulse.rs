//! Expanding shockwaves spawned by interaction.

use glam::Vec2;
use std::collections::VecDeque;

use crate::constants::{
    HOVER_RETRIGGER_MS, PULSE_CAPACITY, PULSE_LIFE_DECAY, PULSE_RADIUS_STEP,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub origin: Vec2,
    pub radius: f32,
    pub power: f32,
    /// Remaining life in `(0, 1]`; the pulse is dropped once it reaches 0.
    pub life: f32,
}

impl Pulse {
    pub fn new(origin: Vec2, power: f32) -> Self {
        Self {
            origin,
            radius: 0.0,
            power,
            life: 1.0,
        }
    }
}

/// Bounded queue of live pulses; the oldest is evicted when full.
#[derive(Clone, Debug)]
pub struct PulseQueue {
    pulses: VecDeque<Pulse>,
    capacity: usize,
}

impl Default for PulseQueue {
    fn default() -> Self {
        Self::with_capacity(PULSE_CAPACITY)
    }
}

impl PulseQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pulses: VecDeque::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    pub fn emit(&mut self, origin: Vec2, power: f32) {
        self.pulses.push_back(Pulse::new(origin, power));
        while self.pulses.len() > self.capacity {
            self.pulses.pop_front();
        }
    }

    /// Grows every ring and drains life; drops pulses whose life ran out.
    pub fn advance(&mut self) {
        self.pulses.retain_mut(|p| {
            p.radius += PULSE_RADIUS_STEP;
            p.life -= PULSE_LIFE_DECAY;
            p.life > 0.0
        });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.pulses.iter()
    }

    /// Contiguous view for the force model.
    pub fn as_slice(&mut self) -> &[Pulse] {
        self.pulses.make_contiguous()
    }
}

/// Suppresses repeat hover pulses from the same target within a short interval.
#[derive(Clone, Debug)]
pub struct HoverGate<K> {
    last: Option<(K, f64)>,
    interval_ms: f64,
}

impl<K> Default for HoverGate<K> {
    fn default() -> Self {
        Self {
            last: None,
            interval_ms: HOVER_RETRIGGER_MS,
        }
    }
}

impl<K: PartialEq> HoverGate<K> {
    pub fn with_interval(interval_ms: f64) -> Self {
        Self {
            last: None,
            interval_ms,
        }
    }

    /// Returns true when a pulse should fire for `target` at `now_ms`.
    pub fn admit(&mut self, target: K, now_ms: f64) -> bool {
        if let Some((prev, ts)) = &self.last {
            if *prev == target && now_ms - *ts < self.interval_ms {
                return false;
            }
        }
        self.last = Some((target, now_ms));
        true
    }
}
