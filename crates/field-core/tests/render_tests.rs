// Host-side tests for the renderer, drawn into a recording surface.

use field_core::color;
use field_core::metrics::sample;
use field_core::node::Node;
use field_core::regime::{BinarySide, Regime};
use field_core::render::{intro_node_count, line_distance, pair_gate, paint, FrameView};
use field_core::surface::{DrawOp, Paint, Recording};
use field_core::Viewport;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn three_nodes() -> Vec<Node> {
    vec![
        Node::at(Vec2::new(100.0, 100.0)),
        Node::at(Vec2::new(110.0, 100.0)),
        Node::at(Vec2::new(500.0, 500.0)),
    ]
}

fn view<'a>(regime: Regime, nodes: &'a [Node]) -> FrameView<'a> {
    FrameView {
        time_ms: 1000.0,
        viewport: Viewport::new(800.0, 600.0),
        regime,
        config: regime.config(),
        side: BinarySide::After,
        nodes,
        metrics: None,
        focus_active: false,
        scroll_ratio: 0.0,
        scroll_velocity: 0.0,
        reduced_motion: true,
        freeze_progress: None,
        intro: 1.0,
    }
}

fn position(rec: &Recording, pred: impl Fn(&DrawOp) -> bool) -> Vec<usize> {
    rec.ops
        .iter()
        .enumerate()
        .filter(|(_, op)| pred(op))
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn wash_comes_first_with_regime_persistence() {
    let nodes = three_nodes();
    let mut rec = Recording::new();
    let mut rng = SmallRng::seed_from_u64(1);
    paint(&view(Regime::Footprint, &nodes), &mut rec, &mut rng);

    match &rec.ops[0] {
        DrawOp::Rect {
            paint: Paint::Solid(c),
            ..
        } => {
            assert_eq!((c.r, c.g, c.b), (color::SOFT.r, color::SOFT.g, color::SOFT.b));
            assert!((c.a - 0.08).abs() < 1e-6);
        }
        other => panic!("expected wash, got {other:?}"),
    }
}

#[test]
fn lines_precede_nodes_precede_accents() {
    let nodes = three_nodes();
    let mut rec = Recording::new();
    let mut rng = SmallRng::seed_from_u64(1);
    paint(&view(Regime::Stabilized, &nodes), &mut rec, &mut rng);

    let lines = position(&rec, |op| matches!(op, DrawOp::Line { .. }));
    let circles = position(&rec, |op| matches!(op, DrawOp::Circle { .. }));
    assert_eq!(lines.len(), 1);
    // three nodes then glow and core
    assert_eq!(circles.len(), 5);
    assert_eq!(rec.rects().count(), 1);
    assert!(lines[0] < circles[0]);
}

#[test]
fn reduced_motion_never_skips_connections() {
    let nodes: Vec<Node> = (0..6)
        .map(|i| Node::at(Vec2::new(300.0 + i as f32 * 5.0, 300.0)))
        .collect();
    for seed in 0..8 {
        let mut rec = Recording::new();
        let mut rng = SmallRng::seed_from_u64(seed);
        paint(&view(Regime::Rupture, &nodes), &mut rec, &mut rng);
        assert_eq!(rec.lines().count(), 15);
    }
}

#[test]
fn line_width_thickens_when_stabilized() {
    let nodes = three_nodes();
    let mut rng = SmallRng::seed_from_u64(1);
    let width_for = |regime: Regime, rng: &mut SmallRng| {
        let mut rec = Recording::new();
        paint(&view(regime, &nodes), &mut rec, rng);
        let width = rec
            .lines()
            .map(|op| match op {
                DrawOp::Line { width, .. } => *width,
                _ => 0.0,
            })
            .next()
            .unwrap();
        width
    };
    assert!(width_for(Regime::Stabilized, &mut rng) > width_for(Regime::Change, &mut rng));
}

#[test]
fn focused_dominant_lines_switch_to_stable() {
    let nodes = vec![
        Node::at(Vec2::new(400.0, 300.0)),
        Node::at(Vec2::new(430.0, 300.0)),
        Node::at(Vec2::new(370.0, 300.0)),
    ];
    let points: Vec<Vec2> = nodes.iter().map(|n| n.pos).collect();
    let vp = Viewport::new(800.0, 600.0);
    let metrics = sample(&points, vp, 40.0, 0.2);
    assert_eq!(metrics.dominant, Some(0));

    let mut v = view(Regime::Hero, &nodes);
    v.metrics = Some(&metrics);
    v.focus_active = true;
    let mut rec = Recording::new();
    let mut rng = SmallRng::seed_from_u64(9);
    paint(&v, &mut rec, &mut rng);

    let touching_dominant: Vec<_> = rec
        .lines()
        .filter_map(|op| match op {
            DrawOp::Line { a, b, color, .. } if *a == nodes[0].pos || *b == nodes[0].pos => {
                Some(*color)
            }
            _ => None,
        })
        .collect();
    assert_eq!(touching_dominant.len(), 2);
    for c in touching_dominant {
        assert_eq!((c.r, c.g, c.b), (color::STABLE.r, color::STABLE.g, color::STABLE.b));
    }
}

#[test]
fn scroll_stretches_connection_distance() {
    let cfg = Regime::Change.config();
    let top = line_distance(cfg, 0.0);
    let bottom = line_distance(cfg, 1.0);
    assert!((top - cfg.line_distance * 0.92).abs() < 1e-3);
    assert!((bottom - cfg.line_distance * 1.14).abs() < 1e-3);
}

#[test]
fn pair_gate_is_stable_and_in_unit_range() {
    for i in 0..20 {
        for j in (i + 1)..20 {
            let g = pair_gate(i, j);
            assert!((0.0..1.0).contains(&g));
            assert_eq!(g, pair_gate(i, j));
        }
    }
}

#[test]
fn rupture_freeze_window_draws_compression_instead_of_split() {
    let nodes = three_nodes();
    let mut rng = SmallRng::seed_from_u64(1);

    let mut frozen = view(Regime::Rupture, &nodes);
    frozen.freeze_progress = Some(0.25);
    let mut rec = Recording::new();
    paint(&frozen, &mut rec, &mut rng);
    assert!(!rec
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Rect { paint: Paint::Linear { .. }, .. })));

    let mut rec = Recording::new();
    paint(&view(Regime::Rupture, &nodes), &mut rec, &mut rng);
    assert!(rec
        .ops
        .iter()
        .any(|op| matches!(op, DrawOp::Rect { paint: Paint::Linear { .. }, .. })));
}

fn cluster(count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| Node::at(Vec2::new(300.0 + i as f32 * 5.0, 300.0)))
        .collect()
}

fn first_circle_alpha(rec: &Recording) -> f32 {
    rec.circles()
        .find_map(|op| match op {
            DrawOp::Circle {
                paint: Paint::Solid(c),
                ..
            } => Some(c.a),
            _ => None,
        })
        .unwrap_or(0.0)
}

fn first_line_alpha(rec: &Recording) -> f32 {
    rec.lines()
        .find_map(|op| match op {
            DrawOp::Line { color, .. } => Some(color.a),
            _ => None,
        })
        .unwrap_or(0.0)
}

#[test]
fn intro_count_grows_from_a_floor_to_the_whole_pool() {
    assert_eq!(intro_node_count(100, 0.0), 46);
    assert_eq!(intro_node_count(100, 0.25), 59);
    assert_eq!(intro_node_count(100, 1.0), 100);
    assert_eq!(intro_node_count(10, 0.0), 8);
    assert_eq!(intro_node_count(5, 0.0), 5);
    assert_eq!(intro_node_count(100, 3.0), 100);
}

#[test]
fn intro_ramp_draws_fewer_fainter_nodes_early() {
    let nodes = cluster(20);
    let mut rng = SmallRng::seed_from_u64(4);

    let mut early = view(Regime::Hero, &nodes);
    early.intro = 0.0;
    let mut rec_early = Recording::new();
    paint(&early, &mut rec_early, &mut rng);

    let mut rec_full = Recording::new();
    paint(&view(Regime::Hero, &nodes), &mut rec_full, &mut rng);

    assert_eq!(rec_early.circles().count(), 9);
    assert_eq!(rec_full.circles().count(), 20);
    let ratio = first_circle_alpha(&rec_early) / first_circle_alpha(&rec_full);
    assert!((ratio - 0.5).abs() < 1e-3, "{ratio}");
}

#[test]
fn intro_ramp_floors_line_alpha() {
    let nodes = three_nodes();
    let mut rng = SmallRng::seed_from_u64(4);

    let mut early = view(Regime::Stabilized, &nodes);
    early.intro = 0.0;
    let mut rec_early = Recording::new();
    paint(&early, &mut rec_early, &mut rng);

    let mut rec_full = Recording::new();
    paint(&view(Regime::Stabilized, &nodes), &mut rec_full, &mut rng);

    let ratio = first_line_alpha(&rec_early) / first_line_alpha(&rec_full);
    assert!((ratio - 0.42).abs() < 1e-3, "{ratio}");
}

#[test]
fn link_cap_limits_lines_per_node() {
    let nodes = cluster(6);
    let mut rng = SmallRng::seed_from_u64(2);
    let count = |regime: Regime, rng: &mut SmallRng| {
        let mut rec = Recording::new();
        paint(&view(regime, &nodes), &mut rec, rng);
        rec.lines().count()
    };

    assert_eq!(Regime::Footprint.config().max_links, Some(2));
    // 2 + 2 + 2 + 2 + 1: each node opens at most two lines to later nodes.
    assert_eq!(count(Regime::Footprint, &mut rng), 9);
    // 4 + 4 + 3 + 2 + 1
    assert_eq!(count(Regime::Stabilized, &mut rng), 14);
    assert_eq!(Regime::Change.config().max_links, None);
    assert_eq!(count(Regime::Change, &mut rng), 15);
}
