/// Simulation and rendering tuning constants.
///
/// These express intended behavior (pool bounds, force radii, decay rates)
/// and keep magic numbers out of the force model and renderer.
// Node pool sizing
pub const MIN_NODES: usize = 50;
pub const MAX_NODES: usize = 120;
pub const AREA_PER_NODE: f32 = 10_800.0; // viewport px² per node before density
pub const MOBILE_BREAKPOINT: f32 = 768.0;
pub const MOBILE_DENSITY: f32 = 0.72;

// Node seeding
pub const SEED_VELOCITY_SPAN: f32 = 0.6;
pub const MASS_MIN: f32 = 0.6;
pub const MASS_MAX: f32 = 1.6;

// Ambient jitter (time in ms)
pub const JITTER_FREQ_A: f32 = 0.0012;
pub const JITTER_FREQ_B: f32 = 0.0017;
pub const JITTER_FREQ_Y: f32 = 0.001;
pub const JITTER_GAIN_A: f32 = 0.18;
pub const JITTER_GAIN_B: f32 = 0.12;
pub const JITTER_GAIN_Y: f32 = 0.16;

// Cursor influence
pub const CURSOR_RADIUS: f32 = 180.0;
pub const CURSOR_RADIUS_PER_SCROLL: f32 = 2.0; // extra px per unit of scroll velocity

// Pulses
pub const PULSE_CAPACITY: usize = 12;
pub const PULSE_RADIUS_STEP: f32 = 10.0;
pub const PULSE_LIFE_DECAY: f32 = 0.028;
pub const PULSE_BAND: f32 = 42.0;
pub const PULSE_PUSH_GAIN: f32 = 0.012;
pub const HOVER_PULSE_POWER: f32 = 32.0;
pub const HOVER_RETRIGGER_MS: f64 = 130.0;

// Scroll coupling
pub const SCROLL_IMPULSE_GAIN: f32 = 0.04;
pub const SCROLL_VELOCITY_MAX: f32 = 42.0;
pub const SCROLL_VELOCITY_DECAY: f32 = 0.9; // per rendered frame

// Boundary
pub const BOUNDARY_DAMPING: f32 = -0.75;

// Attractor geometry (fractions of the viewport)
pub const POLE_LEFT_X: f32 = 0.32;
pub const POLE_RIGHT_X: f32 = 0.68;
pub const POLE_WEAK: f32 = 0.0007;
pub const POLE_STRONG: f32 = 0.0018;
pub const FOOTPRINT_CENTER_PULL: f32 = 0.00028;
pub const FREEZE_WINDOW_MS: f64 = 900.0;
pub const FREEZE_COMPRESSION: f32 = 0.004;

// Connection lines
pub const LINE_DISTANCE_BASE: f32 = 0.92;
pub const LINE_DISTANCE_SCROLL: f32 = 0.22;
pub const LINE_FLICKER_GATE: f32 = 0.06; // instability × gate = skip probability
pub const LINE_WIDTH: f32 = 0.84;
pub const LINE_WIDTH_STABILIZED: f32 = 0.96;

// Intro ramp after mount or a structural change
pub const INTRO_MS: f64 = 1200.0;
pub const INTRO_START_FRACTION: f32 = 0.46; // of the pool drawn at progress 0
pub const INTRO_MIN_NODES: usize = 8;
pub const INTRO_LINE_FLOOR: f32 = 0.42;
pub const INTRO_NODE_FLOOR: f32 = 0.5;

// Topology sampling
pub const SAMPLE_INTERVAL_MS: f64 = 160.0;
pub const RISK_GRID_COLS: usize = 6;
pub const RISK_GRID_ROWS: usize = 4;
pub const RISK_ZONE_THRESHOLD: f32 = 0.58; // fraction of the densest cell
pub const RISK_ZONE_LIMIT: usize = 2;

// Overlay
pub const OVERLAY_REFRESH_MS: f64 = 600.0;
pub const OVERLAY_PLACEHOLDER: &str = "pending";

// Frame pacing
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;
pub const FRAME_BUDGET_LOW_END_MS: f64 = 1000.0 / 30.0;
pub const LOW_END_THREADS: u32 = 4;
