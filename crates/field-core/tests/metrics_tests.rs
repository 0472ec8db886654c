// Host-side tests for the topology sampler.

use field_core::metrics::{build_adjacency, rank_nodes, risk_zones, sample, NodeRole, TopologySampler};
use field_core::Viewport;
use glam::Vec2;

fn star() -> Vec<Vec2> {
    vec![
        Vec2::new(50.0, 50.0),
        Vec2::new(80.0, 50.0),
        Vec2::new(20.0, 50.0),
        Vec2::new(50.0, 80.0),
        Vec2::new(50.0, 20.0),
    ]
}

#[test]
fn hub_of_a_star_is_dominant() {
    let vp = Viewport::new(100.0, 100.0);
    let m = sample(&star(), vp, 40.0, 0.2);
    assert_eq!(m.dominant, Some(0));
    assert_eq!(m.clusters, 1);
    assert!((m.dominance_pct - 100.0).abs() < 1e-4);
    assert_eq!(m.dominant_links, vec![1, 2, 3, 4]);
    assert_eq!(m.degrees, vec![4, 1, 1, 1, 1]);
    // Symmetric leaves cancel out.
    assert!(m.convergence_magnitude() < 1e-4);
    assert_eq!(m.role(0), NodeRole::Dominant);
    assert_eq!(m.role(3), NodeRole::Linked);
}

#[test]
fn equal_degree_tie_goes_to_the_node_nearer_the_center() {
    let vp = Viewport::new(100.0, 100.0);
    let points = [Vec2::new(10.0, 10.0), Vec2::new(40.0, 40.0)];
    let mut adj = Vec::new();
    build_adjacency(&points, 50.0, &mut adj);
    assert_eq!(rank_nodes(&points, &adj, vp, 0.0), (Some(1), Some(0)));
    assert_eq!(rank_nodes(&points, &adj, vp, 0.6), (Some(1), Some(0)));
}

#[test]
fn exact_ties_resolve_to_the_lower_index() {
    let vp = Viewport::new(100.0, 100.0);
    // Mirror images around the center: same degree, same proximity.
    let points = [Vec2::new(30.0, 50.0), Vec2::new(70.0, 50.0)];
    let mut adj = Vec::new();
    build_adjacency(&points, 50.0, &mut adj);
    let (dominant, secondary) = rank_nodes(&points, &adj, vp, 0.3);
    assert_eq!(dominant, Some(0));
    assert_eq!(secondary, Some(1));
}

#[test]
fn edge_threshold_is_inclusive() {
    let points = [Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0)];
    let mut adj = Vec::new();
    build_adjacency(&points, 50.0, &mut adj);
    assert_eq!(adj[0], vec![1]);
    build_adjacency(&points, 49.9, &mut adj);
    assert!(adj[0].is_empty() && adj[1].is_empty());
}

#[test]
fn two_separated_groups_make_two_clusters() {
    let vp = Viewport::new(100.0, 100.0);
    let points = [
        Vec2::new(10.0, 10.0),
        Vec2::new(20.0, 10.0),
        Vec2::new(80.0, 80.0),
        Vec2::new(90.0, 80.0),
    ];
    assert_eq!(sample(&points, vp, 15.0, 0.2).clusters, 2);
}

#[test]
fn isolated_nodes_are_each_a_cluster() {
    let vp = Viewport::new(1000.0, 1000.0);
    let points: Vec<Vec2> = (0..6).map(|i| Vec2::new(i as f32 * 150.0, 500.0)).collect();
    let m = sample(&points, vp, 20.0, 0.2);
    assert_eq!(m.clusters, 6);
    assert_eq!(m.dominance_pct, 0.0);
}

#[test]
fn empty_pool_samples_to_defaults() {
    let m = sample(&[], Viewport::new(100.0, 100.0), 20.0, 0.2);
    assert_eq!(m.dominant, None);
    assert_eq!(m.clusters, 0);
    assert!(m.risk_zones.is_empty());
}

#[test]
fn risk_zone_marks_the_densest_cell() {
    let vp = Viewport::new(600.0, 400.0);
    let mut points: Vec<Vec2> = (0..8).map(|i| Vec2::new(20.0 + i as f32, 20.0)).collect();
    points.push(Vec2::new(550.0, 350.0));
    let zones = risk_zones(&points, vp);
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].count, 8);
    assert_eq!(zones[0].intensity, 1.0);
    assert_eq!(zones[0].center, Vec2::new(50.0, 50.0));
}

#[test]
fn sampler_is_throttled_until_invalidated() {
    let vp = Viewport::new(100.0, 100.0);
    let mut s = TopologySampler::new();
    assert!(s.maybe_sample(0.0, star(), vp, 40.0, 0.2));
    assert!(!s.maybe_sample(100.0, star(), vp, 40.0, 0.2));
    assert!(s.maybe_sample(160.0, star(), vp, 40.0, 0.2));
    s.invalidate();
    assert!(s.maybe_sample(170.0, star(), vp, 40.0, 0.2));
    assert_eq!(s.metrics().dominant, Some(0));
}
