//! Field controller: owns the simulation state and decides when to draw.
//!
//! The controller is platform independent. The host feeds it input events
//! and frame ticks, passes a [`Surface`] to draw on, and follows the
//! [`LoopCommand`]s it returns to start or stop scheduling frames.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use smallvec::SmallVec;

use crate::constants::*;
use crate::force::{step_nodes, ForceContext};
use crate::metrics::{FieldMetrics, TopologySampler};
use crate::node::{target_count, Node, NodePool};
use crate::overlay::{self, KeyValueStore, OverlayContent};
use crate::pulse::{Pulse, PulseQueue};
use crate::regime::{resolve_rule, Algorithm, Regime, RegimeConfig};
use crate::render::{self, line_distance, FrameView};
use crate::source::{Channel, FieldSnapshot, Selection};
use crate::surface::Surface;
use crate::viewport::Viewport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Paused,
    Destroyed,
}

/// What the host should do with its frame scheduling after a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCommand {
    Start,
    Stop,
    Keep,
}

/// Host conditions at construction time.
#[derive(Clone, Copy, Debug)]
pub struct Environment {
    pub viewport: Viewport,
    pub reduced_motion: bool,
    pub visible: bool,
    pub seed: u64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            reduced_motion: false,
            visible: true,
            seed: 0x5eed,
        }
    }
}

pub struct FieldController {
    rng: SmallRng,
    pool: NodePool,
    pulses: PulseQueue,
    sampler: TopologySampler,
    selection: Selection,
    viewport: Viewport,
    cursor: Option<Vec2>,
    scroll_ratio: f32,
    scroll_velocity: f32,
    last_scroll_y: Option<f32>,
    reduced_motion: bool,
    visible: bool,
    phase: Phase,
    regime_since_ms: f64,
    intro_since_ms: f64,
    attractors: SmallVec<[Vec2; 4]>,
    overlay_dirty: bool,
    sampled_since_overlay: bool,
    last_overlay_ms: Option<f64>,
    frames: u64,
}

impl FieldController {
    pub fn new(env: Environment, snapshot: &FieldSnapshot, now_ms: f64) -> Self {
        let selection = Selection::resolve(snapshot);
        let mut rng = SmallRng::seed_from_u64(env.seed);
        let mut pool = NodePool::new();
        pool.resize_to(
            target_count(env.viewport, selection.regime.config().density),
            &mut rng,
            env.viewport,
        );

        let mut controller = Self {
            rng,
            pool,
            pulses: PulseQueue::default(),
            sampler: TopologySampler::new(),
            selection,
            viewport: env.viewport,
            cursor: None,
            scroll_ratio: 0.0,
            scroll_velocity: 0.0,
            last_scroll_y: None,
            reduced_motion: env.reduced_motion,
            visible: env.visible,
            phase: Phase::Paused,
            regime_since_ms: now_ms,
            intro_since_ms: now_ms,
            attractors: SmallVec::new(),
            overlay_dirty: true,
            sampled_since_overlay: false,
            last_overlay_ms: None,
            frames: 0,
        };
        controller.phase = controller.desired_phase();
        log::info!(
            "[field] created regime={} algorithm={} nodes={}",
            controller.selection.regime.name(),
            controller.selection.algorithm.name(),
            controller.pool.len()
        );
        controller
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn regime(&self) -> Regime {
        self.selection.regime
    }

    #[inline]
    fn config(&self) -> &'static RegimeConfig {
        self.selection.regime.config()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        self.pool.as_slice()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    pub fn pulses(&self) -> impl Iterator<Item = &Pulse> {
        self.pulses.iter()
    }

    #[inline]
    pub fn metrics(&self) -> &FieldMetrics {
        self.sampler.metrics()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    #[inline]
    pub fn scroll_ratio(&self) -> f32 {
        self.scroll_ratio
    }

    /// Host-provided velocity when present, otherwise the local estimate.
    #[inline]
    pub fn scroll_velocity(&self) -> f32 {
        self.selection.scroll_velocity.unwrap_or(self.scroll_velocity)
    }

    #[inline]
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Progress through the rupture freeze window, `None` outside it.
    pub fn freeze_progress(&self, now_ms: f64) -> Option<f32> {
        if self.selection.regime != Regime::Rupture {
            return None;
        }
        let elapsed = now_ms - self.regime_since_ms;
        (0.0..FREEZE_WINDOW_MS)
            .contains(&elapsed)
            .then(|| (elapsed / FREEZE_WINDOW_MS) as f32)
    }

    /// Intro ramp progress; the ramp restarts on every structural change
    /// and is skipped under reduced motion.
    pub fn intro_progress(&self, now_ms: f64) -> f32 {
        if self.reduced_motion {
            return 1.0;
        }
        ((now_ms - self.intro_since_ms) / INTRO_MS).clamp(0.0, 1.0) as f32
    }

    fn desired_phase(&self) -> Phase {
        if self.visible && !self.reduced_motion {
            Phase::Running
        } else {
            Phase::Paused
        }
    }

    fn transition(&mut self) -> LoopCommand {
        if self.phase == Phase::Destroyed {
            return LoopCommand::Keep;
        }
        let next = self.desired_phase();
        if next == self.phase {
            return LoopCommand::Keep;
        }
        log::debug!("[field] {:?} -> {:?}", self.phase, next);
        self.phase = next;
        match next {
            Phase::Running => LoopCommand::Start,
            _ => LoopCommand::Stop,
        }
    }

    /// Pauses or resumes without touching node state.
    pub fn set_visible(&mut self, visible: bool) -> LoopCommand {
        self.visible = visible;
        self.transition()
    }

    /// Turning reduced motion on stops the loop and draws one still frame.
    pub fn set_reduced_motion<S: Surface + ?Sized>(
        &mut self,
        reduced: bool,
        now_ms: f64,
        surface: &mut S,
    ) -> LoopCommand {
        if self.phase == Phase::Destroyed {
            return LoopCommand::Keep;
        }
        self.reduced_motion = reduced;
        let command = self.transition();
        if reduced {
            self.cursor = None;
            self.render_static(now_ms, surface);
        }
        command
    }

    pub fn resize<S: Surface + ?Sized>(&mut self, viewport: Viewport, now_ms: f64, surface: &mut S) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.viewport = viewport;
        self.fit_pool();
        self.pool.clamp_to(viewport);
        // Topology follows on the regular sampling interval.
        if !self.is_running() {
            self.sample(now_ms, false);
            self.paint(now_ms, surface);
        }
    }

    fn fit_pool(&mut self) {
        let target = target_count(self.viewport, self.config().density);
        self.pool.resize_to(target, &mut self.rng, self.viewport);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.cursor = (!self.reduced_motion
            && self.phase != Phase::Destroyed
            && self.viewport.contains(pos))
        .then_some(pos);
    }

    pub fn pointer_leave(&mut self) {
        self.cursor = None;
    }

    /// `max_scroll` is the document's scrollable height; 0 means no scrolling.
    pub fn scroll(&mut self, scroll_y: f32, max_scroll: f32) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.scroll_ratio = if max_scroll > 0.0 {
            (scroll_y / max_scroll).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if let Some(last) = self.last_scroll_y {
            self.scroll_velocity = (scroll_y - last).abs().min(SCROLL_VELOCITY_MAX);
        }
        self.last_scroll_y = Some(scroll_y);
    }

    /// Spawns a shockwave at `origin`; ignored under reduced motion.
    pub fn pulse(&mut self, origin: Vec2, power: f32) -> bool {
        if self.reduced_motion || self.phase == Phase::Destroyed {
            return false;
        }
        self.pulses.emit(origin, power);
        true
    }

    /// Re-reads declarative state. A regime, algorithm, focus or side change
    /// resizes the pool, restarts the intro ramp, resets sampling, marks the
    /// overlay stale and draws immediately. Returns whether such a change happened.
    pub fn apply<S: Surface + ?Sized>(
        &mut self,
        snapshot: &FieldSnapshot,
        now_ms: f64,
        surface: &mut S,
    ) -> bool {
        if self.phase == Phase::Destroyed {
            return false;
        }
        let next = Selection::resolve(snapshot);
        self.selection.scroll_velocity = next.scroll_velocity;
        if !next.differs_structurally(&self.selection) {
            return false;
        }

        if next.regime != self.selection.regime {
            self.regime_since_ms = now_ms;
            log::info!(
                "[field] regime {} -> {}",
                self.selection.regime.name(),
                next.regime.name()
            );
        }
        self.selection = next;
        self.intro_since_ms = now_ms;
        self.fit_pool();
        self.sampler.invalidate();
        self.overlay_dirty = true;
        self.render_static(now_ms, surface);
        true
    }

    /// One animation tick: advance pulses, step nodes, sample, paint.
    /// Does nothing unless running; returns whether a frame was drawn.
    pub fn frame<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.pulses.advance();
        self.refresh_attractors();

        let config = self.config();
        let freeze = self.freeze_progress(now_ms).is_some();
        let scroll_velocity = self.scroll_velocity();
        let ctx = ForceContext {
            time_ms: now_ms,
            viewport: self.viewport,
            config,
            rule: resolve_rule(self.selection.regime, self.selection.algorithm),
            side: self.selection.side,
            cursor: self.cursor,
            pulses: self.pulses.as_slice(),
            scroll_ratio: self.scroll_ratio,
            scroll_velocity,
            attractors: &self.attractors,
            freeze,
        };
        step_nodes(self.pool.as_mut_slice(), &ctx, &mut self.rng);

        self.sample(now_ms, false);
        self.paint(now_ms, surface);
        self.scroll_velocity *= SCROLL_VELOCITY_DECAY;
        true
    }

    /// Samples and paints the current positions without stepping them.
    pub fn render_static<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.sample(now_ms, true);
        self.paint(now_ms, surface);
    }

    fn sample(&mut self, now_ms: f64, force: bool) {
        if force {
            self.sampler.invalidate();
        }
        let config = self.config();
        let max_dist = line_distance(config, self.scroll_ratio);
        if self.sampler.maybe_sample(
            now_ms,
            self.pool.iter().map(|n| n.pos),
            self.viewport,
            max_dist,
            config.dominance,
        ) {
            self.sampled_since_overlay = true;
        }
    }

    /// Fixed points for the scenario layout; density hot spots for risk.
    fn refresh_attractors(&mut self) {
        self.attractors.clear();
        let algorithm = self.selection.algorithm;
        if algorithm == Algorithm::Risk {
            self.attractors
                .extend(self.sampler.metrics().risk_zones.iter().map(|z| z.center));
        }
        if self.attractors.is_empty() {
            let vp = self.viewport;
            self.attractors.extend(
                algorithm
                    .anchor_fractions()
                    .iter()
                    .map(|[fx, fy]| vp.at(*fx, *fy)),
            );
        }
    }

    fn paint<S: Surface + ?Sized>(&mut self, now_ms: f64, surface: &mut S) {
        let emphasize =
            self.selection.channel == Channel::Regime || self.selection.focus_active();
        let view = FrameView {
            time_ms: now_ms,
            viewport: self.viewport,
            regime: self.selection.regime,
            config: self.selection.regime.config(),
            side: self.selection.side,
            nodes: self.pool.as_slice(),
            metrics: emphasize.then(|| self.sampler.metrics()),
            focus_active: self.selection.focus_active(),
            scroll_ratio: self.scroll_ratio,
            scroll_velocity: self.scroll_velocity(),
            reduced_motion: self.reduced_motion,
            freeze_progress: self.freeze_progress(now_ms),
            intro: self.intro_progress(now_ms),
        };
        render::paint(&view, surface, &mut self.rng);
        self.frames += 1;
    }

    /// New overlay content when it is stale, `None` when nothing changed.
    ///
    /// Footprint shows stored decision ids and re-reads them at most every
    /// `OVERLAY_REFRESH_MS`. The scroll-regime channel shows a metrics
    /// readout refreshed on every sample. Everything else hides the overlay.
    pub fn take_overlay<K: KeyValueStore + ?Sized>(
        &mut self,
        now_ms: f64,
        store: &K,
    ) -> Option<OverlayContent> {
        if self.phase == Phase::Destroyed {
            return None;
        }
        let dirty = std::mem::take(&mut self.overlay_dirty);
        let content = if self.selection.regime == Regime::Footprint {
            let stale = self
                .last_overlay_ms
                .map_or(true, |last| now_ms - last >= OVERLAY_REFRESH_MS);
            if !dirty && !stale {
                return None;
            }
            overlay::decision_ids(store)
        } else if self.selection.channel == Channel::Regime {
            if !dirty && !self.sampled_since_overlay {
                return None;
            }
            overlay::metrics_readout(self.selection.regime, self.sampler.metrics())
        } else if dirty {
            OverlayContent::Hidden
        } else {
            return None;
        };
        self.sampled_since_overlay = false;
        self.last_overlay_ms = Some(now_ms);
        Some(content)
    }

    /// Stops everything; later calls are no-ops. Returns `Stop` only the first time.
    pub fn destroy(&mut self) -> LoopCommand {
        if self.phase == Phase::Destroyed {
            return LoopCommand::Keep;
        }
        self.phase = Phase::Destroyed;
        self.cursor = None;
        log::info!("[field] destroyed after {} frames", self.frames);
        LoopCommand::Stop
    }
}
