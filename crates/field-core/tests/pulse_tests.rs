// Host-side tests for pulse lifetime and hover gating.

use field_core::constants::{PULSE_CAPACITY, PULSE_LIFE_DECAY, PULSE_RADIUS_STEP};
use field_core::pulse::{HoverGate, PulseQueue};
use glam::Vec2;

#[test]
fn advance_grows_radius_and_drains_life() {
    let mut q = PulseQueue::default();
    q.emit(Vec2::new(10.0, 10.0), 32.0);
    q.advance();
    let p = q.iter().next().copied().unwrap();
    assert_eq!(p.radius, PULSE_RADIUS_STEP);
    assert!((p.life - (1.0 - PULSE_LIFE_DECAY)).abs() < 1e-6);
}

#[test]
fn life_is_monotonic_and_pulse_expires() {
    let mut q = PulseQueue::default();
    q.emit(Vec2::ZERO, 32.0);
    let mut last = 1.0;
    for _ in 0..30 {
        q.advance();
        let life = q.iter().next().map(|p| p.life).unwrap();
        assert!(life < last);
        last = life;
    }
    for _ in 0..10 {
        q.advance();
    }
    assert!(q.is_empty());
}

#[test]
fn queue_evicts_oldest_past_capacity() {
    let mut q = PulseQueue::default();
    for i in 0..20 {
        q.emit(Vec2::new(i as f32, 0.0), 32.0);
    }
    assert_eq!(q.len(), PULSE_CAPACITY);
    let first = q.iter().next().unwrap();
    assert_eq!(first.origin.x, (20 - PULSE_CAPACITY) as f32);
}

#[test]
fn hover_gate_suppresses_repeat_on_same_target() {
    let mut gate = HoverGate::default();
    assert!(gate.admit("card-a", 0.0));
    assert!(!gate.admit("card-a", 60.0));
    assert!(gate.admit("card-b", 70.0));
    assert!(gate.admit("card-a", 80.0));
    assert!(gate.admit("card-a", 300.0));
}

#[test]
fn hover_gate_custom_interval() {
    let mut gate = HoverGate::with_interval(10.0);
    assert!(gate.admit(1u32, 0.0));
    assert!(!gate.admit(1u32, 5.0));
    assert!(gate.admit(1u32, 10.0));
}
