//! Per-frame force accumulation and integration.
//!
//! Contributions are added into velocity in a fixed order (jitter, cursor,
//! pulses, attractor, anchor, scroll), then drag is applied and the position
//! advances by one explicit Euler step. There is no substepping and no
//! velocity clamp beyond drag and the boundary reflection.

use glam::Vec2;
use rand::Rng;

use crate::constants::*;
use crate::node::Node;
use crate::pulse::Pulse;
use crate::regime::{AttractorRule, BinarySide, RegimeConfig};
use crate::viewport::Viewport;

/// Everything the force model reads besides the node itself.
#[derive(Clone, Copy, Debug)]
pub struct ForceContext<'a> {
    pub time_ms: f64,
    pub viewport: Viewport,
    pub config: &'a RegimeConfig,
    pub rule: AttractorRule,
    pub side: BinarySide,
    /// Pointer position; `None` while outside the viewport or under reduced motion.
    pub cursor: Option<Vec2>,
    pub pulses: &'a [Pulse],
    pub scroll_ratio: f32,
    pub scroll_velocity: f32,
    /// Targets for [`AttractorRule::Points`].
    pub attractors: &'a [Vec2],
    /// Inside the rupture freeze window every node compresses toward the center.
    pub freeze: bool,
}

pub fn step_nodes<R: Rng + ?Sized>(nodes: &mut [Node], ctx: &ForceContext<'_>, rng: &mut R) {
    for (i, n) in nodes.iter_mut().enumerate() {
        step_node(i, n, ctx, rng);
    }
}

pub fn step_node<R: Rng + ?Sized>(
    index: usize,
    n: &mut Node,
    ctx: &ForceContext<'_>,
    rng: &mut R,
) {
    let cfg = ctx.config;

    n.vel += jitter(n, ctx.time_ms, cfg.jitter);
    if let Some(cursor) = ctx.cursor {
        n.vel += cursor_push(n, cursor, ctx.scroll_velocity, cfg.cursor_force);
    }
    for pulse in ctx.pulses {
        n.vel += pulse_push(n.pos, pulse);
    }
    n.vel += attractor(index, n, ctx, rng);
    n.vel += (n.anchor - n.pos) * cfg.anchor_pull;
    n.vel.x += (ctx.scroll_ratio - 0.5) * SCROLL_IMPULSE_GAIN * n.mass;

    n.vel *= cfg.drag;
    n.pos += n.vel;
    reflect(n, ctx.viewport);
}

/// Smooth per-node oscillation; no random spikes.
pub fn jitter(n: &Node, time_ms: f64, amplitude: f32) -> Vec2 {
    let seed = n.seed as f64;
    let a = (time_ms * JITTER_FREQ_A as f64 + seed).sin() as f32;
    let b = (time_ms * JITTER_FREQ_B as f64 + seed * 1.3).cos() as f32;
    let y = (time_ms * JITTER_FREQ_Y as f64 + seed).sin() as f32;
    Vec2::new(
        a * amplitude * JITTER_GAIN_A + b * amplitude * JITTER_GAIN_B,
        y * amplitude * JITTER_GAIN_Y,
    )
}

/// Inverse-linear repulsion inside a radius that widens with scroll speed.
pub fn cursor_push(n: &Node, cursor: Vec2, scroll_velocity: f32, force: f32) -> Vec2 {
    let d = n.pos - cursor;
    let dist_sq = d.length_squared();
    let radius = CURSOR_RADIUS + scroll_velocity * CURSOR_RADIUS_PER_SCROLL;
    if dist_sq >= radius * radius {
        return Vec2::ZERO;
    }
    let dist = dist_sq.max(0.001).sqrt();
    let influence = (1.0 - dist / radius) * force * n.mass;
    d / dist * influence
}

/// Radial push for nodes inside the thin band around the ring.
pub fn pulse_push(pos: Vec2, pulse: &Pulse) -> Vec2 {
    let d = pos - pulse.origin;
    let dist = d.length();
    let wave_delta = (dist - pulse.radius).abs();
    if wave_delta >= PULSE_BAND {
        return Vec2::ZERO;
    }
    let push = (PULSE_BAND - wave_delta) / PULSE_BAND * pulse.power * pulse.life * PULSE_PUSH_GAIN;
    if dist > 0.0 {
        d / dist * push
    } else {
        Vec2::ZERO
    }
}

fn attractor<R: Rng + ?Sized>(
    index: usize,
    n: &Node,
    ctx: &ForceContext<'_>,
    rng: &mut R,
) -> Vec2 {
    let vp = ctx.viewport;
    let center = vp.center();
    let cfg = ctx.config;

    if ctx.freeze {
        return (center - n.pos) * FREEZE_COMPRESSION;
    }

    match ctx.rule {
        AttractorRule::Anchor => Vec2::ZERO,
        AttractorRule::Center { strength } => (center - n.pos) * strength,
        AttractorRule::Points { strength } => {
            if ctx.attractors.is_empty() {
                return Vec2::ZERO;
            }
            let target = ctx.attractors[index % ctx.attractors.len()];
            (target - n.pos) * strength
        }
        AttractorRule::Lanes { lanes, strength } => {
            let lanes = lanes.max(1) as usize;
            let lane = (index % lanes) as f32;
            let lane_y = vp.height * (lane + 0.5) / lanes as f32;
            Vec2::new(0.0, (lane_y - n.pos.y) * strength)
        }
        AttractorRule::Poles => {
            let (left, right) = ctx.side.pole_strengths(POLE_WEAK, POLE_STRONG);
            let towards_right = n.pos.x >= center.x;
            let (pole_x, strength) = if towards_right {
                (vp.width * POLE_RIGHT_X, right)
            } else {
                (vp.width * POLE_LEFT_X, left)
            };
            (Vec2::new(pole_x, center.y) - n.pos) * strength
        }
        AttractorRule::Split => {
            if n.pos.x < center.x {
                chaos(rng, cfg.split_chaos)
            } else {
                Vec2::ZERO
            }
        }
        AttractorRule::Collision { strength } => {
            let mut v = Vec2::new((center.x - n.pos.x) * strength, 0.0);
            if n.pos.x < center.x {
                v += chaos(rng, cfg.split_chaos * 0.5);
            }
            v
        }
        AttractorRule::Compress { strength } => Vec2::new(0.0, (center.y - n.pos.y) * strength),
        AttractorRule::Freeze => {
            (n.anchor - n.pos) * cfg.freeze_pull + (center - n.pos) * FOOTPRINT_CENTER_PULL
        }
    }
}

#[inline]
fn chaos<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> Vec2 {
    Vec2::new(
        (rng.gen::<f32>() - 0.5) * amount,
        (rng.gen::<f32>() - 0.5) * amount,
    )
}

/// Clamps to the viewport, inverting and damping the crossing-axis velocity.
pub fn reflect(n: &mut Node, viewport: Viewport) {
    if n.pos.x < 0.0 {
        n.pos.x = 0.0;
        n.vel.x *= BOUNDARY_DAMPING;
    } else if n.pos.x > viewport.width {
        n.pos.x = viewport.width;
        n.vel.x *= BOUNDARY_DAMPING;
    }

    if n.pos.y < 0.0 {
        n.pos.y = 0.0;
        n.vel.y *= BOUNDARY_DAMPING;
    } else if n.pos.y > viewport.height {
        n.pos.y = viewport.height;
        n.vel.y *= BOUNDARY_DAMPING;
    }

    // NaN from a degenerate viewport would escape the comparisons above.
    if !n.pos.is_finite() {
        n.pos = viewport.center();
        n.vel = Vec2::ZERO;
    }
}
