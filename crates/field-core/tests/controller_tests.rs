// Host-side tests for the field controller state machine.

use std::collections::HashMap;

use field_core::overlay::{FINGERPRINT_KEY, SESSION_KEY};
use field_core::{
    Environment, FieldController, FieldSnapshot, LoopCommand, OverlayContent, Phase, Recording,
    Regime, Viewport,
};
use glam::Vec2;

fn env() -> Environment {
    Environment {
        viewport: Viewport::new(1440.0, 900.0),
        ..Environment::default()
    }
}

fn hero() -> FieldController {
    FieldController::new(env(), &FieldSnapshot::with_state("hero"), 0.0)
}

#[test]
fn starts_running_when_visible_and_motion_allowed() {
    let c = hero();
    assert_eq!(c.phase(), Phase::Running);
    assert_eq!(c.regime(), Regime::Hero);
    assert_eq!(c.node_count(), 110);
}

#[test]
fn starts_paused_under_reduced_motion() {
    let e = Environment {
        reduced_motion: true,
        ..env()
    };
    let c = FieldController::new(e, &FieldSnapshot::default(), 0.0);
    assert_eq!(c.phase(), Phase::Paused);
}

#[test]
fn frame_draws_only_while_running() {
    let mut c = hero();
    let mut rec = Recording::new();
    assert!(c.frame(16.0, &mut rec));
    assert!(!rec.ops.is_empty());

    assert_eq!(c.set_visible(false), LoopCommand::Stop);
    rec.clear();
    assert!(!c.frame(32.0, &mut rec));
    assert!(rec.ops.is_empty());
}

#[test]
fn reduced_motion_halts_loop_and_renders_once() {
    let mut c = hero();
    let mut rec = Recording::new();
    c.frame(16.0, &mut rec);
    let before = c.frames_rendered();
    rec.clear();

    assert_eq!(c.set_reduced_motion(true, 20.0, &mut rec), LoopCommand::Stop);
    assert_eq!(c.phase(), Phase::Paused);
    assert_eq!(c.frames_rendered(), before + 1);
    assert!(!rec.ops.is_empty());

    let drawn = rec.ops.len();
    for t in 1..10 {
        assert!(!c.frame(20.0 + t as f64 * 16.0, &mut rec));
    }
    assert_eq!(rec.ops.len(), drawn);

    assert_eq!(c.set_reduced_motion(false, 200.0, &mut rec), LoopCommand::Start);
    assert_eq!(c.phase(), Phase::Running);
}

#[test]
fn hidden_pause_preserves_node_state() {
    let mut c = hero();
    let mut rec = Recording::new();
    c.frame(16.0, &mut rec);
    c.set_visible(false);
    let frozen: Vec<_> = c.nodes().to_vec();
    for t in 0..20 {
        c.frame(100.0 + t as f64 * 16.0, &mut rec);
    }
    assert_eq!(c.nodes(), frozen.as_slice());

    assert_eq!(c.set_visible(true), LoopCommand::Start);
    assert_eq!(c.set_visible(true), LoopCommand::Keep);
    assert_eq!(c.nodes(), frozen.as_slice());
}

#[test]
fn regime_change_resizes_pool_and_renders_immediately() {
    let mut c = hero();
    let mut rec = Recording::new();
    assert!(c.apply(&FieldSnapshot::with_state("change"), 50.0, &mut rec));
    assert_eq!(c.regime(), Regime::Change);
    // 120 × 1.12 clamps to the ceiling
    assert_eq!(c.node_count(), 120);
    assert!(!rec.ops.is_empty());

    rec.clear();
    assert!(!c.apply(&FieldSnapshot::with_state("change"), 60.0, &mut rec));
    assert!(rec.ops.is_empty());

    assert!(c.apply(&FieldSnapshot::with_state("footprint"), 70.0, &mut rec));
    // 120 × 0.74 = 88.8
    assert_eq!(c.node_count(), 89);
}

#[test]
fn scroll_velocity_attribute_overrides_local_estimate() {
    let mut c = hero();
    let mut rec = Recording::new();
    c.scroll(0.0, 1000.0);
    c.scroll(30.0, 1000.0);
    assert_eq!(c.scroll_velocity(), 30.0);
    assert!((c.scroll_ratio() - 0.03).abs() < 1e-6);

    let snapshot = FieldSnapshot {
        state: Some("hero".into()),
        scroll_velocity: Some("3.5".into()),
        ..FieldSnapshot::default()
    };
    assert!(!c.apply(&snapshot, 10.0, &mut rec));
    assert_eq!(c.scroll_velocity(), 3.5);
}

#[test]
fn local_scroll_velocity_is_capped_and_decays() {
    let mut c = hero();
    let mut rec = Recording::new();
    c.scroll(0.0, 5000.0);
    c.scroll(400.0, 5000.0);
    assert_eq!(c.scroll_velocity(), 42.0);
    c.frame(16.0, &mut rec);
    assert!(c.scroll_velocity() < 42.0);
}

#[test]
fn pointer_outside_viewport_clears_cursor() {
    let mut c = hero();
    c.pointer_move(Vec2::new(100.0, 100.0));
    assert_eq!(c.cursor(), Some(Vec2::new(100.0, 100.0)));
    c.pointer_move(Vec2::new(-10.0, 100.0));
    assert_eq!(c.cursor(), None);
    c.pointer_move(Vec2::new(10.0, 10.0));
    c.pointer_leave();
    assert_eq!(c.cursor(), None);
}

#[test]
fn pulses_are_ignored_under_reduced_motion() {
    let mut c = hero();
    let mut rec = Recording::new();
    assert!(c.pulse(Vec2::new(200.0, 200.0), 32.0));
    assert_eq!(c.pulses().count(), 1);
    c.set_reduced_motion(true, 10.0, &mut rec);
    assert!(!c.pulse(Vec2::new(200.0, 200.0), 32.0));
    assert_eq!(c.cursor(), None);
}

#[test]
fn nodes_stay_in_bounds_through_interaction() {
    let mut c = hero();
    let vp = c.viewport();
    let mut rec = Recording::new();
    for t in 0..240 {
        let now = t as f64 * 16.0;
        if t % 20 == 0 {
            c.pulse(Vec2::new(700.0, 450.0), 400.0);
        }
        c.pointer_move(Vec2::new(600.0 + (t % 50) as f32, 400.0));
        c.scroll(t as f32 * 25.0, 6000.0);
        c.frame(now, &mut rec);
        rec.clear();
    }
    for n in c.nodes() {
        assert!(vp.contains(n.pos));
    }
}

#[test]
fn shrinking_viewport_keeps_nodes_inside() {
    let mut c = hero();
    let mut rec = Recording::new();
    let small = Viewport::new(400.0, 300.0);
    c.resize(small, 10.0, &mut rec);
    assert_eq!(c.node_count(), 50);
    for n in c.nodes() {
        assert!(small.contains(n.pos));
    }
}

#[test]
fn resize_leaves_sampling_to_the_interval() {
    let mut c = FieldController::new(env(), &FieldSnapshot::with_regime("collision"), 0.0);
    let store: HashMap<String, String> = HashMap::new();
    let mut rec = Recording::new();
    c.frame(16.0, &mut rec);
    assert!(c.take_overlay(16.0, &store).is_some());

    c.resize(Viewport::new(1200.0, 800.0), 40.0, &mut rec);
    c.frame(60.0, &mut rec);
    assert_eq!(c.take_overlay(60.0, &store), None);

    c.frame(180.0, &mut rec);
    assert!(c.take_overlay(180.0, &store).is_some());
}

#[test]
fn intro_ramp_restarts_on_structural_change() {
    let mut c = hero();
    let mut rec = Recording::new();
    assert_eq!(c.intro_progress(0.0), 0.0);
    assert!((c.intro_progress(600.0) - 0.5).abs() < 1e-6);
    assert_eq!(c.intro_progress(5000.0), 1.0);

    c.frame(16.0, &mut rec);
    let early = rec.circles().count();
    rec.clear();
    c.frame(1300.0, &mut rec);
    let settled = rec.circles().count();
    assert!(early < settled, "{early} >= {settled}");

    assert!(c.apply(&FieldSnapshot::with_state("change"), 2000.0, &mut rec));
    assert_eq!(c.intro_progress(2000.0), 0.0);
    assert!(!c.apply(&FieldSnapshot::with_state("change"), 2600.0, &mut rec));
    assert!((c.intro_progress(2600.0) - 0.5).abs() < 1e-6);
}

#[test]
fn reduced_motion_skips_the_intro_ramp() {
    let e = Environment {
        reduced_motion: true,
        ..env()
    };
    let c = FieldController::new(e, &FieldSnapshot::default(), 0.0);
    assert_eq!(c.intro_progress(0.0), 1.0);
}

#[test]
fn rupture_opens_a_freeze_window_on_entry() {
    let mut c = hero();
    let mut rec = Recording::new();
    assert_eq!(c.freeze_progress(100.0), None);
    c.apply(&FieldSnapshot::with_state("rupture"), 1000.0, &mut rec);
    assert!(c.freeze_progress(1000.0).is_some());
    assert!(c.freeze_progress(1450.0).is_some_and(|p| (p - 0.5).abs() < 1e-4));
    assert_eq!(c.freeze_progress(1900.0), None);
}

#[test]
fn footprint_overlay_shows_stored_ids_with_placeholder() {
    let mut c = FieldController::new(env(), &FieldSnapshot::with_state("footprint"), 0.0);
    let mut store = HashMap::new();
    store.insert(SESSION_KEY.to_owned(), "sess-42".to_owned());

    let content = c.take_overlay(0.0, &store);
    assert_eq!(
        content,
        Some(OverlayContent::Lines(vec![
            "decision_id: sess-42".to_owned(),
            "decision_hash: pending".to_owned(),
        ]))
    );
    assert_eq!(c.take_overlay(100.0, &store), None);

    store.insert(FINGERPRINT_KEY.to_owned(), "1x9z".to_owned());
    match c.take_overlay(650.0, &store) {
        Some(OverlayContent::Lines(lines)) => assert_eq!(lines[1], "decision_hash: 1x9z"),
        other => panic!("expected refreshed ids, got {other:?}"),
    }
}

#[test]
fn page_state_overlay_is_hidden() {
    let mut c = hero();
    let store: HashMap<String, String> = HashMap::new();
    assert_eq!(c.take_overlay(0.0, &store), Some(OverlayContent::Hidden));
    assert_eq!(c.take_overlay(10.0, &store), None);
}

#[test]
fn scroll_regime_overlay_reads_out_metrics_after_sampling() {
    let mut c = FieldController::new(env(), &FieldSnapshot::with_regime("collision"), 0.0);
    let store: HashMap<String, String> = HashMap::new();
    let mut rec = Recording::new();
    c.frame(16.0, &mut rec);

    match c.take_overlay(16.0, &store) {
        Some(OverlayContent::Lines(lines)) => {
            assert_eq!(lines[0], "regime: collision");
            assert!(lines.iter().any(|l| l.starts_with("clusters: ")));
        }
        other => panic!("expected metrics readout, got {other:?}"),
    }
    assert_eq!(c.take_overlay(20.0, &store), None);
    c.frame(200.0, &mut rec);
    assert!(c.take_overlay(200.0, &store).is_some());
}

#[test]
fn destroy_is_terminal_and_idempotent() {
    let mut c = hero();
    let mut rec = Recording::new();
    assert_eq!(c.destroy(), LoopCommand::Stop);
    assert_eq!(c.destroy(), LoopCommand::Keep);
    assert_eq!(c.phase(), Phase::Destroyed);
    assert!(!c.frame(16.0, &mut rec));
    assert_eq!(c.set_visible(true), LoopCommand::Keep);
    assert!(!c.apply(&FieldSnapshot::with_state("change"), 20.0, &mut rec));
    assert!(rec.ops.is_empty());
}
