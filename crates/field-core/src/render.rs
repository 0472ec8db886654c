//! Per-frame paint of the field onto a [`Surface`].
//!
//! Draw order: trail wash, proximity lines, nodes, regime accents. The
//! renderer keeps no state of its own; the translucent wash over the last
//! frame is the only persistence between frames.

use glam::Vec2;
use rand::Rng;

use crate::color::{self, Rgba};
use crate::constants::*;
use crate::metrics::{FieldMetrics, NodeRole};
use crate::node::Node;
use crate::regime::{node_color, BinarySide, LinePalette, Regime, RegimeConfig};
use crate::surface::{ColorStops, Paint, Surface};
use crate::viewport::Viewport;

/// Read-only inputs for one painted frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub time_ms: f64,
    pub viewport: Viewport,
    pub regime: Regime,
    pub config: &'a RegimeConfig,
    pub side: BinarySide,
    pub nodes: &'a [Node],
    pub metrics: Option<&'a FieldMetrics>,
    pub focus_active: bool,
    pub scroll_ratio: f32,
    pub scroll_velocity: f32,
    pub reduced_motion: bool,
    /// Progress through the rupture freeze window, `None` outside it.
    pub freeze_progress: Option<f32>,
    /// Intro ramp progress in `[0, 1]`; 1 once the field is fully drawn.
    pub intro: f32,
}

impl FrameView<'_> {
    /// Connection distance after scroll scaling.
    #[inline]
    pub fn line_distance(&self) -> f32 {
        line_distance(self.config, self.scroll_ratio)
    }

    /// Nodes drawn this frame; the rest wait for the intro ramp.
    #[inline]
    pub fn visible_nodes(&self) -> &[Node] {
        &self.nodes[..intro_node_count(self.nodes.len(), self.intro)]
    }
}

/// Grows from `INTRO_START_FRACTION` of the pool to all of it, never
/// fewer than `INTRO_MIN_NODES` when the pool has them.
pub fn intro_node_count(total: usize, progress: f32) -> usize {
    let p = progress.clamp(0.0, 1.0);
    if p >= 1.0 {
        return total;
    }
    let ramped = (total as f32 * (INTRO_START_FRACTION + (1.0 - INTRO_START_FRACTION) * p)).floor();
    (ramped as usize).max(INTRO_MIN_NODES).min(total)
}

#[inline]
pub fn line_distance(config: &RegimeConfig, scroll_ratio: f32) -> f32 {
    config.line_distance * (LINE_DISTANCE_BASE + scroll_ratio * LINE_DISTANCE_SCROLL)
}

pub fn paint<S: Surface + ?Sized, R: Rng + ?Sized>(view: &FrameView<'_>, surface: &mut S, rng: &mut R) {
    wash(view, surface);
    connections(view, surface, rng);
    nodes(view, surface);
    accents(view, surface, rng);
}

fn full_rect<S: Surface + ?Sized>(vp: Viewport, surface: &mut S, paint: &Paint) {
    surface.fill_rect(Vec2::ZERO, Vec2::new(vp.width, vp.height), paint);
}

fn wash<S: Surface + ?Sized>(view: &FrameView<'_>, surface: &mut S) {
    let fill = color::SOFT.with_alpha(view.config.persistence);
    full_rect(view.viewport, surface, &Paint::Solid(fill));
}

/// Stable per-pair value in `[0, 1)`.
#[inline]
pub fn pair_gate(i: usize, j: usize) -> f32 {
    let v = ((i as f32) * 12.9898 + (j as f32) * 78.233).sin() * 43_758.547;
    v - v.floor()
}

fn connections<S: Surface + ?Sized, R: Rng + ?Sized>(
    view: &FrameView<'_>,
    surface: &mut S,
    rng: &mut R,
) {
    let cfg = view.config;
    let dynamic = view.line_distance();
    let max_sq = dynamic * dynamic;
    let split_x = view.viewport.width * 0.5;
    let dominant = if view.focus_active {
        view.metrics.and_then(|m| m.dominant)
    } else {
        None
    };
    let width = if view.regime == Regime::Stabilized {
        LINE_WIDTH_STABILIZED
    } else {
        LINE_WIDTH
    };
    let skip_chance = cfg.instability * LINE_FLICKER_GATE;
    let fade = view.intro.max(INTRO_LINE_FLOOR);
    let cap = cfg.max_links.unwrap_or(usize::MAX);
    let nodes = view.visible_nodes();

    for i in 0..nodes.len() {
        let a = nodes[i].pos;
        let mut links = 0;
        for j in (i + 1)..nodes.len() {
            if links >= cap {
                break;
            }
            let b = nodes[j].pos;
            let dist_sq = a.distance_squared(b);
            if dist_sq > max_sq {
                continue;
            }
            if !view.reduced_motion && rng.gen::<f32>() < skip_chance {
                continue;
            }

            let t = 1.0 - dist_sq.sqrt() / dynamic;
            let mut rgb = match cfg.palette {
                LinePalette::Hero => {
                    if rng.gen::<f32>() < 0.46 {
                        color::TENSION
                    } else {
                        color::SOFT
                    }
                }
                LinePalette::Change => {
                    if rng.gen::<f32>() < 0.26 {
                        color::TENSION
                    } else {
                        color::STABLE
                    }
                }
                LinePalette::Split => {
                    if a.x < split_x || b.x < split_x {
                        color::RISK
                    } else {
                        color::STABLE
                    }
                }
                LinePalette::Binary => {
                    if view.side.is_dominant(a.x, split_x) || view.side.is_dominant(b.x, split_x) {
                        color::STABLE
                    } else {
                        color::TENSION
                    }
                }
                LinePalette::Soft => color::SOFT,
                LinePalette::Stable => color::STABLE,
                LinePalette::Critical => {
                    if pair_gate(i, j) < cfg.criticality {
                        color::TENSION
                    } else {
                        color::STABLE
                    }
                }
            };

            let flicker = if cfg.palette == LinePalette::Hero {
                0.72 + ((view.time_ms * 0.004) as f32 + i as f32 + j as f32).sin() * 0.12
            } else {
                1.0
            };
            let mut alpha = cfg.line_alpha * t * flicker * fade;

            if dominant.is_some_and(|d| d == i || d == j) {
                rgb = color::STABLE;
                alpha *= 1.6;
            }

            surface.stroke_line(a, b, rgb.with_alpha(alpha), width);
            links += 1;
        }
    }
}

fn nodes<S: Surface + ?Sized>(view: &FrameView<'_>, surface: &mut S) {
    let footprint = view.regime == Regime::Footprint;
    let base_alpha = if footprint { 0.32 } else { 0.44 };
    let tint = node_color(view.regime);
    let fade = view.intro.max(INTRO_NODE_FLOOR);

    for (i, n) in view.visible_nodes().iter().enumerate() {
        let pulse = 0.5 + ((view.time_ms * 0.0014) as f32 + n.seed * 3.1).sin() * 0.5;
        let mut radius = if footprint { 1.15 } else { 1.4 + pulse * 0.55 };
        let mut alpha = base_alpha + pulse * 0.18;

        if let Some(m) = view.metrics {
            match m.role(i) {
                NodeRole::Dominant => {
                    radius *= 2.4;
                    alpha += 0.3;
                }
                NodeRole::Secondary => {
                    radius *= 1.7;
                    alpha += 0.18;
                }
                NodeRole::Linked if view.focus_active => {
                    radius *= 1.3;
                    alpha += 0.1;
                }
                _ => {}
            }
        }

        surface.fill_circle(n.pos, radius, &Paint::Solid(tint.with_alpha(alpha * fade)));
    }

    if view.regime == Regime::Hero {
        full_rect(
            view.viewport,
            surface,
            &Paint::Solid(color::TENSION.with_alpha(0.08)),
        );
    }
}

fn accents<S: Surface + ?Sized, R: Rng + ?Sized>(
    view: &FrameView<'_>,
    surface: &mut S,
    rng: &mut R,
) {
    let vp = view.viewport;
    let center = vp.center();
    let t = view.time_ms;
    let cfg = view.config;

    match view.regime {
        Regime::Stabilized => {
            let core = 14.0 + ((t * 0.0035) as f32).sin() * 4.0;
            surface.fill_circle(
                center,
                120.0,
                &Paint::radial(
                    center,
                    120.0,
                    color::STABLE.with_alpha(0.26),
                    color::STABLE.with_alpha(0.0),
                ),
            );
            surface.fill_circle(center, core, &Paint::Solid(color::STABLE.with_alpha(0.56)));
        }
        Regime::Binary => {
            let weak = (58.0, color::TENSION.with_alpha(0.10), 0.26);
            let strong = (92.0, color::STABLE.with_alpha(0.22), 0.58);
            let (left, right) = match view.side {
                BinarySide::After => (weak, strong),
                BinarySide::Before => (strong, weak),
            };
            pole(surface, vp.at(0.33, 0.5), left.0, left.1, left.2);
            pole(surface, vp.at(0.69, 0.5), right.0, right.1, right.2);
        }
        Regime::Rupture => match view.freeze_progress {
            Some(progress) => compression(view, surface, progress),
            None => {
                let mut stops = ColorStops::new();
                stops.push((0.0, color::RISK.with_alpha(0.08)));
                stops.push((0.48, color::RISK.with_alpha(0.03)));
                stops.push((0.52, color::STABLE.with_alpha(0.03)));
                stops.push((1.0, color::STABLE.with_alpha(0.08)));
                let paint = Paint::Linear {
                    from: Vec2::ZERO,
                    to: Vec2::new(vp.width, 0.0),
                    stops,
                };
                full_rect(vp, surface, &paint);
            }
        },
        Regime::Footprint => {
            let radius = 96.0 + ((t * 0.0012) as f32).sin() * 6.0;
            surface.fill_circle(
                center,
                radius,
                &Paint::radial(
                    center,
                    radius,
                    color::STABLE.with_alpha(0.16),
                    color::STABLE.with_alpha(0.0),
                ),
            );
        }
        Regime::Change => {
            pole(
                surface,
                center,
                78.0 + view.scroll_velocity * 0.3,
                color::TENSION.with_alpha(0.08),
                0.2,
            );
        }
        Regime::Hero | Regime::Unstable | Regime::Compressing | Regime::Collision
        | Regime::Reordering => {
            if cfg.void_radius > 0.0 {
                void(view, surface);
            }
            if let Some(m) = view.metrics {
                for zone in &m.risk_zones {
                    let radius = 60.0 + 40.0 * zone.intensity;
                    let alpha = 0.1 * zone.intensity * cfg.criticality.max(0.2);
                    surface.fill_circle(
                        zone.center,
                        radius,
                        &Paint::radial(
                            zone.center,
                            radius,
                            color::RISK.with_alpha(alpha),
                            color::TRANSPARENT,
                        ),
                    );
                }
            }
            if cfg.jitter > 0.2 {
                speckle(view, surface, rng);
            }
        }
    }
}

/// Dark hole at the center whose edge breathes with criticality.
fn void<S: Surface + ?Sized>(view: &FrameView<'_>, surface: &mut S) {
    let cfg = view.config;
    let center = view.viewport.center();
    let breath = ((view.time_ms * 0.002) as f32).sin() * cfg.criticality * 6.0;
    let radius = (cfg.void_radius + breath).max(1.0);
    surface.fill_circle(
        center,
        radius,
        &Paint::radial(
            center,
            radius,
            color::SOFT.with_alpha(0.5 * cfg.criticality.max(0.2)),
            color::SOFT.with_alpha(0.0),
        ),
    );
}

/// Full-canvas squeeze shown while the rupture freeze window is open.
fn compression<S: Surface + ?Sized>(view: &FrameView<'_>, surface: &mut S, progress: f32) {
    let vp = view.viewport;
    let center = vp.center();
    let fade = (1.0 - progress).clamp(0.0, 1.0);
    full_rect(vp, surface, &Paint::Solid(color::RISK.with_alpha(0.12 * fade)));
    let radius = vp.width.max(vp.height) * (0.5 + 0.5 * progress);
    surface.fill_circle(
        center,
        radius,
        &Paint::radial(
            center,
            radius,
            color::TRANSPARENT,
            color::SOFT.with_alpha(0.35 * fade),
        ),
    );
}

fn pole<S: Surface + ?Sized>(surface: &mut S, at: Vec2, radius: f32, fill: Rgba, node_alpha: f32) {
    surface.fill_circle(at, radius, &Paint::radial(at, radius, fill, color::TRANSPARENT));
    surface.fill_circle(
        at,
        (radius * 0.08).max(6.0),
        &Paint::Solid(color::STABLE.with_alpha(node_alpha)),
    );
}

fn speckle<S: Surface + ?Sized, R: Rng + ?Sized>(view: &FrameView<'_>, surface: &mut S, rng: &mut R) {
    let vp = view.viewport;
    let alpha = (view.config.jitter * 0.04).min(0.045);
    let paint = Paint::Solid(color::SOFT.with_alpha(alpha));
    for _ in 0..24 {
        let p = Vec2::new(rng.gen::<f32>() * vp.width, rng.gen::<f32>() * vp.height);
        surface.fill_rect(p, Vec2::ONE, &paint);
    }
}
