//! Named visual regimes, algorithm selectors and their tuning tables.
//!
//! Every regime maps to one immutable [`RegimeConfig`]; every algorithm maps
//! to an optional [`AttractorRule`]. Behaviour differences between regimes
//! are data in these tables rather than branches in the force model.

use crate::color::{self, Rgba};

/// Per-node attractor applied after cursor and pulse forces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttractorRule {
    /// No extra term; the anchor pull alone shapes the field.
    Anchor,
    /// Pull toward the viewport center.
    Center { strength: f32 },
    /// Pull toward attractor `index % count` supplied by the controller.
    Points { strength: f32 },
    /// Snap rows: node `index % lanes` is pulled toward its lane's y.
    Lanes { lanes: u8, strength: f32 },
    /// Bimodal left/right poles, dominant side pulls harder.
    Poles,
    /// Random chaos left of the split line.
    Split,
    /// Both halves driven toward the split line, with chaos.
    Collision { strength: f32 },
    /// Vertical pull toward the horizontal center line.
    Compress { strength: f32 },
    /// Strong anchor pull plus a faint center pull.
    Freeze,
}

impl AttractorRule {
    /// Transient rules always win over an algorithm selection.
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AttractorRule::Split | AttractorRule::Collision { .. } | AttractorRule::Freeze
        )
    }
}

/// How connection lines pick their colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinePalette {
    /// Random tension (46%) over a soft base, with sinusoidal flicker.
    Hero,
    /// Random tension (26%) over the stable colour.
    Change,
    /// Risk colour when either end sits left of the split.
    Split,
    /// Stable on the dominant side, tension on the other.
    Binary,
    Soft,
    Stable,
    /// Deterministic per-pair gate against the regime criticality.
    Critical,
}

/// Immutable tuning bundle for one regime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegimeConfig {
    pub density: f32,
    pub jitter: f32,
    pub drag: f32,
    pub line_distance: f32,
    pub line_alpha: f32,
    pub instability: f32,
    pub cursor_force: f32,
    pub split_chaos: f32,
    pub anchor_pull: f32,
    pub freeze_pull: f32,
    /// Center-proximity weight used by the topology sampler; kept below 1.
    pub dominance: f32,
    pub criticality: f32,
    pub void_radius: f32,
    /// Alpha of the trail wash painted over the previous frame.
    pub persistence: f32,
    pub rule: AttractorRule,
    pub palette: LinePalette,
    /// Lines a node may open to later nodes per frame; `None` is unbounded.
    pub max_links: Option<usize>,
}

const HERO: RegimeConfig = RegimeConfig {
    density: 0.92,
    jitter: 0.62,
    drag: 0.956,
    line_distance: 138.0,
    line_alpha: 0.22,
    instability: 0.44,
    cursor_force: 0.95,
    split_chaos: 0.0,
    anchor_pull: 0.0006,
    freeze_pull: 0.0,
    dominance: 0.2,
    criticality: 0.4,
    void_radius: 0.0,
    persistence: 0.16,
    rule: AttractorRule::Anchor,
    palette: LinePalette::Hero,
    max_links: None,
};

const CHANGE: RegimeConfig = RegimeConfig {
    density: 1.12,
    jitter: 0.46,
    drag: 0.963,
    line_distance: 164.0,
    line_alpha: 0.3,
    instability: 0.26,
    cursor_force: 1.04,
    split_chaos: 0.0,
    anchor_pull: 0.0009,
    freeze_pull: 0.0,
    dominance: 0.3,
    criticality: 0.3,
    void_radius: 0.0,
    persistence: 0.16,
    rule: AttractorRule::Anchor,
    palette: LinePalette::Change,
    max_links: None,
};

const RUPTURE: RegimeConfig = RegimeConfig {
    density: 1.0,
    jitter: 0.58,
    drag: 0.951,
    line_distance: 146.0,
    line_alpha: 0.28,
    instability: 0.37,
    cursor_force: 0.88,
    split_chaos: 0.9,
    anchor_pull: 0.0015,
    freeze_pull: 0.0,
    dominance: 0.45,
    criticality: 0.66,
    void_radius: 82.0,
    persistence: 0.16,
    rule: AttractorRule::Split,
    palette: LinePalette::Split,
    max_links: None,
};

const STABILIZED: RegimeConfig = RegimeConfig {
    density: 0.8,
    jitter: 0.17,
    drag: 0.978,
    line_distance: 156.0,
    line_alpha: 0.25,
    instability: 0.08,
    cursor_force: 0.64,
    split_chaos: 0.0,
    anchor_pull: 0.0021,
    freeze_pull: 0.0,
    dominance: 0.9,
    criticality: 0.06,
    void_radius: 0.0,
    persistence: 0.16,
    rule: AttractorRule::Center { strength: 0.0007 },
    palette: LinePalette::Stable,
    max_links: Some(4),
};

const BINARY: RegimeConfig = RegimeConfig {
    density: 0.86,
    jitter: 0.2,
    drag: 0.974,
    line_distance: 148.0,
    line_alpha: 0.23,
    instability: 0.12,
    cursor_force: 0.71,
    split_chaos: 0.0,
    anchor_pull: 0.0017,
    freeze_pull: 0.0,
    dominance: 0.6,
    criticality: 0.2,
    void_radius: 0.0,
    persistence: 0.16,
    rule: AttractorRule::Poles,
    palette: LinePalette::Binary,
    max_links: None,
};

const FOOTPRINT: RegimeConfig = RegimeConfig {
    density: 0.74,
    jitter: 0.04,
    drag: 0.986,
    line_distance: 132.0,
    line_alpha: 0.17,
    instability: 0.02,
    cursor_force: 0.42,
    split_chaos: 0.0,
    anchor_pull: 0.0026,
    freeze_pull: 0.024,
    dominance: 0.8,
    criticality: 0.0,
    void_radius: 0.0,
    persistence: 0.08,
    rule: AttractorRule::Freeze,
    palette: LinePalette::Soft,
    max_links: Some(2),
};

const UNSTABLE: RegimeConfig = RegimeConfig {
    density: 1.0,
    jitter: 0.62,
    drag: 0.955,
    line_distance: 140.0,
    line_alpha: 0.22,
    instability: 0.44,
    cursor_force: 0.95,
    split_chaos: 0.0,
    anchor_pull: 0.0006,
    freeze_pull: 0.0,
    dominance: 0.2,
    criticality: 0.42,
    void_radius: 0.0,
    persistence: 0.16,
    rule: AttractorRule::Anchor,
    palette: LinePalette::Critical,
    max_links: None,
};

const COMPRESSING: RegimeConfig = RegimeConfig {
    density: 1.05,
    jitter: 0.4,
    drag: 0.962,
    line_distance: 150.0,
    line_alpha: 0.26,
    instability: 0.3,
    cursor_force: 0.9,
    split_chaos: 0.0,
    anchor_pull: 0.0009,
    freeze_pull: 0.0,
    dominance: 0.35,
    criticality: 0.34,
    void_radius: 40.0,
    persistence: 0.16,
    rule: AttractorRule::Compress { strength: 0.0012 },
    palette: LinePalette::Critical,
    max_links: None,
};

const COLLISION: RegimeConfig = RegimeConfig {
    density: 1.1,
    jitter: 0.5,
    drag: 0.952,
    line_distance: 146.0,
    line_alpha: 0.3,
    instability: 0.36,
    cursor_force: 0.86,
    split_chaos: 0.6,
    anchor_pull: 0.0011,
    freeze_pull: 0.0,
    dominance: 0.5,
    criticality: 0.58,
    void_radius: 64.0,
    persistence: 0.16,
    rule: AttractorRule::Collision { strength: 0.0014 },
    palette: LinePalette::Critical,
    max_links: None,
};

const REORDERING: RegimeConfig = RegimeConfig {
    density: 0.9,
    jitter: 0.24,
    drag: 0.97,
    line_distance: 154.0,
    line_alpha: 0.25,
    instability: 0.14,
    cursor_force: 0.72,
    split_chaos: 0.0,
    anchor_pull: 0.0016,
    freeze_pull: 0.0,
    dominance: 0.7,
    criticality: 0.2,
    void_radius: 36.0,
    persistence: 0.16,
    rule: AttractorRule::Lanes {
        lanes: 5,
        strength: 0.0009,
    },
    palette: LinePalette::Critical,
    max_links: None,
};

/// Named visual mode of the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Regime {
    Hero,
    Change,
    Rupture,
    Stabilized,
    Binary,
    Footprint,
    Unstable,
    Compressing,
    Collision,
    Reordering,
}

impl Regime {
    pub const ALL: [Regime; 10] = [
        Regime::Hero,
        Regime::Change,
        Regime::Rupture,
        Regime::Stabilized,
        Regime::Binary,
        Regime::Footprint,
        Regime::Unstable,
        Regime::Compressing,
        Regime::Collision,
        Regime::Reordering,
    ];

    /// Names accepted on the page-state channel.
    pub const STATES: [Regime; 6] = [
        Regime::Hero,
        Regime::Change,
        Regime::Rupture,
        Regime::Stabilized,
        Regime::Binary,
        Regime::Footprint,
    ];

    /// Default when the page-state attribute is absent or unknown.
    pub const STATE_DEFAULT: Regime = Regime::Hero;
    /// Default when the scroll-regime attribute is unknown.
    pub const REGIME_DEFAULT: Regime = Regime::Unstable;

    pub fn name(self) -> &'static str {
        match self {
            Regime::Hero => "hero",
            Regime::Change => "change",
            Regime::Rupture => "rupture",
            Regime::Stabilized => "stabilized",
            Regime::Binary => "binary",
            Regime::Footprint => "footprint",
            Regime::Unstable => "unstable",
            Regime::Compressing => "compressing",
            Regime::Collision => "collision",
            Regime::Reordering => "reordering",
        }
    }

    pub fn parse(name: &str) -> Option<Regime> {
        let name = name.trim();
        Regime::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// Only page states are accepted here; scroll regime names fall back too.
    #[inline]
    pub fn from_state_attr(value: Option<&str>) -> Regime {
        value
            .and_then(Regime::parse)
            .filter(|r| r.is_state())
            .unwrap_or(Regime::STATE_DEFAULT)
    }

    #[inline]
    pub fn is_state(self) -> bool {
        Regime::STATES.contains(&self)
    }

    #[inline]
    pub fn from_regime_attr(value: Option<&str>) -> Regime {
        value.and_then(Regime::parse).unwrap_or(Regime::REGIME_DEFAULT)
    }

    pub fn config(self) -> &'static RegimeConfig {
        match self {
            Regime::Hero => &HERO,
            Regime::Change => &CHANGE,
            Regime::Rupture => &RUPTURE,
            Regime::Stabilized => &STABILIZED,
            Regime::Binary => &BINARY,
            Regime::Footprint => &FOOTPRINT,
            Regime::Unstable => &UNSTABLE,
            Regime::Compressing => &COMPRESSING,
            Regime::Collision => &COLLISION,
            Regime::Reordering => &REORDERING,
        }
    }
}

/// Secondary selector narrowing the attractor within a regime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    #[default]
    Core,
    Scenario,
    Risk,
    Ledger,
    Binary,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Core,
        Algorithm::Scenario,
        Algorithm::Risk,
        Algorithm::Ledger,
        Algorithm::Binary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Core => "core",
            Algorithm::Scenario => "scenario",
            Algorithm::Risk => "risk",
            Algorithm::Ledger => "ledger",
            Algorithm::Binary => "binary",
        }
    }

    /// Unknown or absent names resolve to [`Algorithm::Core`].
    pub fn from_attr(value: Option<&str>) -> Algorithm {
        let Some(value) = value.map(str::trim) else {
            return Algorithm::Core;
        };
        Algorithm::ALL
            .iter()
            .copied()
            .find(|a| a.name().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }

    /// `Core` defers to the regime's own rule.
    pub fn rule(self) -> Option<AttractorRule> {
        match self {
            Algorithm::Core => None,
            Algorithm::Scenario => Some(AttractorRule::Points { strength: 0.0011 }),
            Algorithm::Risk => Some(AttractorRule::Points { strength: 0.0013 }),
            Algorithm::Ledger => Some(AttractorRule::Lanes {
                lanes: 6,
                strength: 0.0012,
            }),
            Algorithm::Binary => Some(AttractorRule::Poles),
        }
    }

    /// Fixed attractor points as viewport fractions.
    pub fn anchor_fractions(self) -> &'static [[f32; 2]] {
        match self {
            Algorithm::Scenario => &[[0.24, 0.34], [0.5, 0.7], [0.76, 0.34]],
            Algorithm::Risk => &[[0.2, 0.25], [0.8, 0.25], [0.2, 0.75], [0.8, 0.75]],
            _ => &[],
        }
    }
}

/// Transient rules first, then a non-core algorithm, then the regime rule.
pub fn resolve_rule(regime: Regime, algorithm: Algorithm) -> AttractorRule {
    let base = regime.config().rule;
    if base.is_transient() {
        return base;
    }
    algorithm.rule().unwrap_or(base)
}

/// Which pole of the binary split is dominant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BinarySide {
    Before,
    #[default]
    After,
}

impl BinarySide {
    pub fn from_attr(value: Option<&str>) -> BinarySide {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("before") => BinarySide::Before,
            _ => BinarySide::After,
        }
    }

    /// `(left strength, right strength)` for the pole rule.
    #[inline]
    pub fn pole_strengths(self, weak: f32, strong: f32) -> (f32, f32) {
        match self {
            BinarySide::After => (weak, strong),
            BinarySide::Before => (strong, weak),
        }
    }

    /// Whether a point at `x` lies on the dominant half.
    #[inline]
    pub fn is_dominant(self, x: f32, split_x: f32) -> bool {
        match self {
            BinarySide::After => x > split_x,
            BinarySide::Before => x < split_x,
        }
    }
}

/// Node fill colour for a regime.
pub fn node_color(regime: Regime) -> Rgba {
    match regime {
        Regime::Collision | Regime::Compressing => color::TENSION,
        _ => color::STABLE,
    }
}
