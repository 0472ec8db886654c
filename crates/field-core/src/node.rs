//! Simulated particles and the pool that owns them.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::constants::*;
use crate::viewport::Viewport;

/// One simulated particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rest position the anchor force pulls back toward.
    pub anchor: Vec2,
    /// Phase offset for the ambient oscillation, in `[0, 2π)`.
    pub seed: f32,
    /// Scales how strongly external forces move the node, in `[MASS_MIN, MASS_MAX]`.
    pub mass: f32,
}

impl Node {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        let pos = Vec2::new(
            rng.gen::<f32>() * viewport.width,
            rng.gen::<f32>() * viewport.height,
        );
        let vel = Vec2::new(
            (rng.gen::<f32>() - 0.5) * SEED_VELOCITY_SPAN,
            (rng.gen::<f32>() - 0.5) * SEED_VELOCITY_SPAN,
        );
        Self {
            pos,
            vel,
            anchor: pos,
            seed: rng.gen::<f32>() * TAU,
            mass: rng.gen_range(MASS_MIN..=MASS_MAX),
        }
    }

    /// Node at rest at `pos` with a fixed seed, for deterministic setups.
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            anchor: pos,
            seed: 0.0,
            mass: 1.0,
        }
    }
}

/// Pool size for a viewport at a given regime density.
///
/// Rounds after each factor: area, then the mobile reduction, then density.
pub fn target_count(viewport: Viewport, density: f32) -> usize {
    let mut target = (viewport.area() / AREA_PER_NODE).round();
    if viewport.is_mobile() {
        target = (target * MOBILE_DENSITY).round();
    }
    target = (target * density).round().max(0.0);
    (target as usize).clamp(MIN_NODES, MAX_NODES)
}

/// Growable collection of nodes, exclusively owned by one controller.
#[derive(Clone, Debug, Default)]
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// Grows with freshly spawned nodes or truncates from the tail.
    pub fn resize_to<R: Rng + ?Sized>(&mut self, target: usize, rng: &mut R, viewport: Viewport) {
        if self.nodes.len() > target {
            self.nodes.truncate(target);
            return;
        }
        self.nodes.reserve(target - self.nodes.len());
        while self.nodes.len() < target {
            self.nodes.push(Node::spawn(rng, viewport));
        }
    }

    /// Pulls positions and anchors back inside a (possibly shrunk) viewport.
    pub fn clamp_to(&mut self, viewport: Viewport) {
        for n in &mut self.nodes {
            n.pos = viewport.clamp(n.pos);
            n.anchor = viewport.clamp(n.anchor);
        }
    }
}
