// Host-side tests for scroll-stage progress.

use field_core::progress::*;
use field_core::Regime;

fn stages() -> Vec<StagePoint> {
    let mut points = vec![
        StagePoint::parse(1000.0, Some("1")),
        StagePoint::parse(0.0, Some("0")),
        StagePoint::parse(400.0, Some("0.5")),
    ];
    sort_stages(&mut points);
    points
}

#[test]
fn progress_buckets_into_scroll_regimes() {
    let cases = [
        (0.0, Regime::Unstable),
        (0.159, Regime::Unstable),
        (0.16, Regime::Compressing),
        (0.4, Regime::Collision),
        (0.5, Regime::Rupture),
        (0.7, Regime::Reordering),
        (0.86, Regime::Stabilized),
        (1.0, Regime::Stabilized),
    ];
    for (p, expected) in cases {
        assert_eq!(regime_from_progress(p), expected, "progress {p}");
    }
}

#[test]
fn stage_values_are_sanitized() {
    assert_eq!(StagePoint::parse(0.0, Some("abc")).value, 0.0);
    assert_eq!(StagePoint::parse(0.0, Some("1.7")).value, 1.0);
    assert_eq!(StagePoint::parse(0.0, Some("-3")).value, 0.0);
    assert_eq!(StagePoint::parse(0.0, None).value, 0.0);
}

#[test]
fn marker_interpolates_between_sorted_stages() {
    let points = stages();
    assert_eq!(points[0].top, 0.0);
    assert!((interpolate_progress(&points, 200.0) - 0.25).abs() < 1e-6);
    assert!((interpolate_progress(&points, 700.0) - 0.75).abs() < 1e-6);
    assert_eq!(interpolate_progress(&points, -50.0), 0.0);
    assert_eq!(interpolate_progress(&points, 5000.0), 1.0);
}

#[test]
fn degenerate_stage_lists() {
    assert_eq!(interpolate_progress(&[], 100.0), 0.0);
    let single = [StagePoint::parse(500.0, Some("0.6"))];
    assert!((interpolate_progress(&single, 0.0) - 0.6).abs() < 1e-6);
    assert!((interpolate_progress(&single, 900.0) - 0.6).abs() < 1e-6);
}

#[test]
fn smoother_eases_toward_target() {
    let mut s = ProgressSmoother::new(0.0, 0.0, 0.0);
    s.set_target(1.0);
    assert!(s.step(false));
    assert!((s.progress() - PROGRESS_SMOOTHING).abs() < 1e-6);
    for _ in 0..200 {
        s.step(false);
    }
    assert!(!s.step(false));
    assert_eq!(s.regime(), Regime::Stabilized);
}

#[test]
fn reduced_motion_snaps_progress() {
    let mut s = ProgressSmoother::new(0.0, 0.0, 0.0);
    s.set_target(0.55);
    s.step(true);
    assert_eq!(s.progress(), 0.55);
    assert_eq!(s.progress_attr(), "0.5500");
}

#[test]
fn scroll_velocity_is_capped_blended_and_decays() {
    let mut s = ProgressSmoother::new(0.0, 0.0, 0.0);
    // 100px over 100ms → 18, capped at 14, blended at 0.3
    s.on_scroll(100.0, 100.0);
    assert!((s.velocity() - 4.2).abs() < 1e-5);
    assert_eq!(s.velocity_attr(), "4.200");

    assert!(s.step(false));
    assert!((s.velocity() - 4.2 * (1.0 - VELOCITY_DECAY)).abs() < 1e-5);
}

#[test]
fn non_finite_initial_progress_reads_as_zero() {
    let s = ProgressSmoother::new(f32::NAN, 0.0, 0.0);
    assert_eq!(s.progress(), 0.0);
}
