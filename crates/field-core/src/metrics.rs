//! Proximity-graph topology sampled at a throttled interval.
//!
//! The sampler rebuilds an adjacency list under the same distance threshold
//! the renderer uses for connection lines, then derives the dominant node,
//! the cluster count, a convergence vector toward the dominant node, and the
//! densest screen regions. Building the graph is O(n²) over the pool, which
//! stays small enough (n ≤ `MAX_NODES`) that a full rebuild per sample is fine.

use glam::Vec2;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::constants::*;
use crate::viewport::Viewport;

/// Grid cell whose node count is close to the densest cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskZone {
    pub center: Vec2,
    /// Count relative to the densest cell, in `(0, 1]`.
    pub intensity: f32,
    pub count: usize,
}

pub type RiskZones = SmallVec<[RiskZone; RISK_ZONE_LIMIT]>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldMetrics {
    pub dominant: Option<usize>,
    pub secondary: Option<usize>,
    /// Share of the other nodes directly linked to the dominant node, 0–100.
    pub dominance_pct: f32,
    pub clusters: usize,
    /// Mean unit direction toward the dominant node; length ≤ 1.
    pub convergence: Vec2,
    pub risk_zones: RiskZones,
    /// Neighbours of the dominant node, ascending.
    pub dominant_links: Vec<usize>,
    pub degrees: Vec<usize>,
}

impl FieldMetrics {
    #[inline]
    pub fn convergence_magnitude(&self) -> f32 {
        self.convergence.length()
    }

    /// Role of node `i` for emphasis when drawing.
    pub fn role(&self, i: usize) -> NodeRole {
        if self.dominant == Some(i) {
            NodeRole::Dominant
        } else if self.secondary == Some(i) {
            NodeRole::Secondary
        } else if self.dominant_links.binary_search(&i).is_ok() {
            NodeRole::Linked
        } else {
            NodeRole::Plain
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeRole {
    Dominant,
    Secondary,
    Linked,
    Plain,
}

/// Fills `adjacency` with an undirected edge for every pair within `max_dist`.
pub fn build_adjacency(points: &[Vec2], max_dist: f32, adjacency: &mut Vec<Vec<usize>>) {
    let n = points.len();
    adjacency.truncate(n);
    for list in adjacency.iter_mut() {
        list.clear();
    }
    adjacency.resize_with(n, Vec::new);

    let max_sq = max_dist * max_dist;
    for i in 0..n {
        for j in (i + 1)..n {
            if points[i].distance_squared(points[j]) <= max_sq {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }
    }
}

/// Connected components by breadth-first traversal; each node is visited once.
pub fn count_components(
    adjacency: &[Vec<usize>],
    visited: &mut Vec<bool>,
    queue: &mut VecDeque<usize>,
) -> usize {
    visited.clear();
    visited.resize(adjacency.len(), false);
    queue.clear();

    let mut components = 0;
    for start in 0..adjacency.len() {
        if visited[start] {
            continue;
        }
        components += 1;
        visited[start] = true;
        queue.push_back(start);
        while let Some(i) = queue.pop_front() {
            for &j in &adjacency[i] {
                if !visited[j] {
                    visited[j] = true;
                    queue.push_back(j);
                }
            }
        }
    }
    components
}

/// `1` at the viewport center falling to `0` at a corner.
#[inline]
fn center_proximity(p: Vec2, viewport: Viewport) -> f32 {
    let reach = viewport.half_diagonal().max(1.0);
    (1.0 - p.distance(viewport.center()) / reach).clamp(0.0, 1.0)
}

/// Highest and second-highest scoring nodes.
///
/// Score is degree plus `dominance × center proximity`; with dominance below
/// 1 the bias only reorders equal degrees. Remaining ties go to the node
/// nearer the center, then to the lower index.
pub fn rank_nodes(
    points: &[Vec2],
    adjacency: &[Vec<usize>],
    viewport: Viewport,
    dominance: f32,
) -> (Option<usize>, Option<usize>) {
    let weight = dominance.clamp(0.0, 0.99);
    let mut best: Option<(usize, f32, f32)> = None;
    let mut second: Option<(usize, f32, f32)> = None;

    for (i, p) in points.iter().enumerate() {
        let prox = center_proximity(*p, viewport);
        let score = adjacency[i].len() as f32 + weight * prox;
        let candidate = (i, score, prox);
        if beats(candidate, best) {
            second = best;
            best = Some(candidate);
        } else if beats(candidate, second) {
            second = Some(candidate);
        }
    }
    (best.map(|b| b.0), second.map(|s| s.0))
}

#[inline]
fn beats(candidate: (usize, f32, f32), current: Option<(usize, f32, f32)>) -> bool {
    const EPS: f32 = 1e-6;
    match current {
        None => true,
        Some((_, score, prox)) => {
            candidate.1 > score + EPS || ((candidate.1 - score).abs() <= EPS && candidate.2 > prox)
        }
    }
}

/// Mean unit direction from every other node toward `dominant`.
pub fn convergence(points: &[Vec2], dominant: usize) -> Vec2 {
    let target = points[dominant];
    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for (i, p) in points.iter().enumerate() {
        if i == dominant {
            continue;
        }
        let d = target - *p;
        let len = d.length();
        if len > 1e-6 {
            sum += d / len;
            count += 1;
        }
    }
    if count == 0 {
        return Vec2::ZERO;
    }
    (sum / count as f32).clamp_length_max(1.0)
}

/// Densest cells of a coarse grid histogram, at most two.
pub fn risk_zones(points: &[Vec2], viewport: Viewport) -> RiskZones {
    let mut counts = [0usize; RISK_GRID_COLS * RISK_GRID_ROWS];
    let cell_w = viewport.width / RISK_GRID_COLS as f32;
    let cell_h = viewport.height / RISK_GRID_ROWS as f32;

    for p in points {
        let col = ((p.x / cell_w).max(0.0) as usize).min(RISK_GRID_COLS - 1);
        let row = ((p.y / cell_h).max(0.0) as usize).min(RISK_GRID_ROWS - 1);
        counts[row * RISK_GRID_COLS + col] += 1;
    }

    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return RiskZones::new();
    }
    let threshold = max as f32 * RISK_ZONE_THRESHOLD;

    let mut cells: SmallVec<[(usize, usize); RISK_GRID_COLS * RISK_GRID_ROWS]> = counts
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > 0 && c as f32 >= threshold)
        .map(|(idx, &c)| (idx, c))
        .collect();
    cells.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    cells
        .into_iter()
        .take(RISK_ZONE_LIMIT)
        .map(|(idx, count)| {
            let col = (idx % RISK_GRID_COLS) as f32;
            let row = (idx / RISK_GRID_COLS) as f32;
            RiskZone {
                center: Vec2::new((col + 0.5) * cell_w, (row + 0.5) * cell_h),
                intensity: count as f32 / max as f32,
                count,
            }
        })
        .collect()
}

/// Reusable buffers plus the throttle clock.
#[derive(Debug, Default)]
pub struct TopologySampler {
    adjacency: Vec<Vec<usize>>,
    visited: Vec<bool>,
    queue: VecDeque<usize>,
    points: Vec<Vec2>,
    last_sample_ms: Option<f64>,
    metrics: FieldMetrics,
}

impl TopologySampler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn metrics(&self) -> &FieldMetrics {
        &self.metrics
    }

    /// Forces the next `maybe_sample` call to resample.
    pub fn invalidate(&mut self) {
        self.last_sample_ms = None;
    }

    #[inline]
    pub fn is_due(&self, now_ms: f64) -> bool {
        match self.last_sample_ms {
            None => true,
            Some(last) => now_ms - last >= SAMPLE_INTERVAL_MS,
        }
    }

    /// Resamples when the interval elapsed; returns whether it did.
    pub fn maybe_sample(
        &mut self,
        now_ms: f64,
        points: impl IntoIterator<Item = Vec2>,
        viewport: Viewport,
        max_dist: f32,
        dominance: f32,
    ) -> bool {
        if !self.is_due(now_ms) {
            return false;
        }
        self.last_sample_ms = Some(now_ms);
        self.points.clear();
        self.points.extend(points);
        self.resample(viewport, max_dist, dominance);
        true
    }

    fn resample(&mut self, viewport: Viewport, max_dist: f32, dominance: f32) {
        let points = &self.points;
        build_adjacency(points, max_dist, &mut self.adjacency);
        let clusters = count_components(&self.adjacency, &mut self.visited, &mut self.queue);
        let (dominant, secondary) = rank_nodes(points, &self.adjacency, viewport, dominance);

        let m = &mut self.metrics;
        m.clusters = clusters;
        m.dominant = dominant;
        m.secondary = secondary;
        m.degrees.clear();
        m.degrees.extend(self.adjacency.iter().map(Vec::len));
        m.risk_zones = risk_zones(points, viewport);
        m.dominant_links.clear();

        match dominant {
            Some(d) => {
                let others = points.len().saturating_sub(1).max(1);
                m.dominance_pct = self.adjacency[d].len() as f32 / others as f32 * 100.0;
                m.convergence = convergence(points, d);
                m.dominant_links.extend_from_slice(&self.adjacency[d]);
                m.dominant_links.sort_unstable();
            }
            None => {
                m.dominance_pct = 0.0;
                m.convergence = Vec2::ZERO;
            }
        }
    }
}

/// One-shot sample over a set of points, without throttling.
pub fn sample(points: &[Vec2], viewport: Viewport, max_dist: f32, dominance: f32) -> FieldMetrics {
    let mut sampler = TopologySampler::new();
    sampler.maybe_sample(0.0, points.iter().copied(), viewport, max_dist, dominance);
    sampler.metrics
}
