//! Integration tests for the span placement engine.
//!
//! These tests verify:
//!   1. Determinism: identical context + seed => identical record sequences,
//!      independent of unrelated ambient RNG usage
//!   2. Degenerate spans (inverted range, empty containers) yield no records
//!   3. The iteration cap bounds record count, and records stay in arc order
//!   4. The minimum spacing clamp keeps zero-width spacing ranges advancing
//!   5. Fixed-distance walks land instances at the expected arc positions
//!   6. Curve-aligned rotation points instance forward along the tangent
//!   7. Terrain conformance blends height/orientation, and terrain is never
//!      queried while both conformance weights are zero
//!   8. Weighted selection frequencies follow the configured ratio

use std::sync::atomic::{AtomicU32, Ordering};

use bevy::prelude::*;
use rand::Rng;
use spline_scatter::prelude::*;

// ── Helpers ────────────────────────────────────────────────────────

fn straight_x(length: f32) -> CurveSet {
    CurveSet::from_curve(PolylineCurve::new(vec![
        Vec3::ZERO,
        Vec3::new(length, 0.0, 0.0),
    ]))
}

fn scene_item(probability: f32) -> ScatterItem {
    ScatterItem::scene("props/item.glb#Scene0", probability)
}

struct FlatTerrain {
    height: f32,
    origin: f32,
    normal: Option<Vec3>,
}

impl TerrainSampler for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.height
    }
    fn origin_y(&self) -> f32 {
        self.origin
    }
    fn normal_at(&self, _x: f32, _z: f32) -> Option<Vec3> {
        self.normal
    }
}

/// Counts every query; placement with zero conformance weights must leave it
/// untouched.
#[derive(Default)]
struct CountingTerrain {
    queries: AtomicU32,
}

impl TerrainSampler for CountingTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.queries.fetch_add(1, Ordering::Relaxed);
        0.0
    }
    fn normal_at(&self, _x: f32, _z: f32) -> Option<Vec3> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        None
    }
}

fn context<'a>(
    curves: &'a CurveSet,
    span: SplineSpan,
    items: &'a [ScatterItem],
    config: &'a ScatterConfig,
    seed: u64,
) -> PlacementContext<'a> {
    PlacementContext {
        curves,
        span,
        items,
        config,
        terrain: None,
        owner: Transform::IDENTITY,
        seed,
    }
}

// ── Determinism ────────────────────────────────────────────────────

#[test]
fn identical_inputs_reproduce_identical_records() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0), scene_item(2.0), ScatterItem::gap(0.5)];
    let config = ScatterConfig {
        spacing: Vec2::new(2.0, 9.0),
        position_offset: Vec3Range::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.5, 1.0)),
        rotation_offset: Vec3Range::new(Vec3::new(0.0, -30.0, 0.0), Vec3::new(0.0, 30.0, 0.0)),
        scale_offset: Vec3Range::new(Vec3::splat(-0.2), Vec3::splat(0.4)),
        count_limit: 40,
        ..Default::default()
    };
    let span = SplineSpan::new(0, 0.1, 0.9);

    let first = run_scatter(&context(&curves, span, &items, &config, 1234));

    // Unrelated ambient draws between runs must not influence the engine.
    let mut ambient = rand::rng();
    for _ in 0..17 {
        let _: f32 = ambient.random();
    }

    let second = run_scatter(&context(&curves, span, &items, &config, 1234));
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn different_seeds_diverge() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(2.0, 9.0),
        position_offset: Vec3Range::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)),
        count_limit: 30,
        ..Default::default()
    };
    let span = SplineSpan::default();

    let a = run_scatter(&context(&curves, span, &items, &config, 1));
    let b = run_scatter(&context(&curves, span, &items, &config, 2));
    assert_ne!(a, b);
}

// ── Degenerate input ───────────────────────────────────────────────

#[test]
fn inverted_range_places_nothing() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig::default();
    let span = SplineSpan::new(0, 0.8, 0.2);
    assert!(run_scatter(&context(&curves, span, &items, &config, 7)).is_empty());
}

#[test]
fn empty_range_places_nothing() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig::default();
    let span = SplineSpan::new(0, 0.5, 0.5);
    assert!(run_scatter(&context(&curves, span, &items, &config, 7)).is_empty());
}

// ── Iteration cap & ordering ───────────────────────────────────────

#[test]
fn count_limit_caps_records() {
    let curves = straight_x(1000.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(1.0, 1.0),
        count_limit: 5,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 3));
    assert_eq!(records.len(), 5);
}

#[test]
fn records_are_in_arc_order() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(1.0, 6.0),
        count_limit: 200,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 99));
    assert!(!records.is_empty());
    for pair in records.windows(2) {
        assert!(pair[0].translation.x <= pair[1].translation.x);
    }
}

// ── Spacing ────────────────────────────────────────────────────────

#[test]
fn zero_spacing_range_still_advances() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(0.0, 0.0),
        count_limit: 50,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 13));

    // Every iteration stays inside the span and places an instance, each at
    // least the minimum clamp further along.
    assert_eq!(records.len(), 50);
    for pair in records.windows(2) {
        let step = pair[1].translation.x - pair[0].translation.x;
        assert!(step >= 0.0009, "step was {step}");
    }
}

#[test]
fn fixed_distance_walk_hits_expected_slots() {
    // Curve length 100, span (0, 1), spacing fixed at 10, cap 20: ten
    // placements at t = 0.0 .. 0.9, the remaining iterations out of range.
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(10.0, 10.0),
        count_limit: 20,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 5));

    assert_eq!(records.len(), 10);
    for (i, record) in records.iter().enumerate() {
        let expected = Vec3::new(10.0 * i as f32, 0.0, 0.0);
        assert!(
            record.translation.abs_diff_eq(expected, 1e-3),
            "record {i} at {:?}",
            record.translation
        );
    }
}

#[test]
fn span_sub_range_offsets_the_walk() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(10.0, 10.0),
        count_limit: 20,
        ..Default::default()
    };
    let span = SplineSpan::new(0, 0.5, 1.0);
    let records = run_scatter(&context(&curves, span, &items, &config, 5));

    // Walk starts at t = 0.5 and covers the remaining 50 units.
    assert_eq!(records.len(), 5);
    assert!(records[0].translation.abs_diff_eq(Vec3::new(50.0, 0.0, 0.0), 1e-3));
    assert!(records[4].translation.abs_diff_eq(Vec3::new(90.0, 0.0, 0.0), 1e-3));
}

// ── Rotation composition ───────────────────────────────────────────

#[test]
fn full_spline_fit_points_forward_along_tangent() {
    let curves = CurveSet::from_curve(PolylineCurve::new(vec![
        Vec3::ZERO,
        Vec3::new(50.0, 10.0, 0.0),
    ]));
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(5.0, 5.0),
        count_limit: 8,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 21));

    let tangent = Vec3::new(50.0, 10.0, 0.0).normalize();
    assert!(!records.is_empty());
    for record in &records {
        let forward = record.rotation * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(tangent, 1e-4), "forward {forward:?}");
    }
}

#[test]
fn zero_spline_fit_yaws_only() {
    let curves = CurveSet::from_curve(PolylineCurve::new(vec![
        Vec3::ZERO,
        Vec3::new(50.0, 50.0, 0.0),
    ]));
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        fit_rotation_to_spline: 0.0,
        spacing: Vec2::new(10.0, 10.0),
        count_limit: 6,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 21));

    assert!(!records.is_empty());
    for record in &records {
        // Owner up stays fixed; forward is the tangent's horizontal heading.
        let up = record.rotation * Vec3::Y;
        let forward = record.rotation * Vec3::NEG_Z;
        assert!(up.abs_diff_eq(Vec3::Y, 1e-4));
        assert!(forward.abs_diff_eq(Vec3::X, 1e-4), "forward {forward:?}");
    }
}

#[test]
fn axis_remap_reorients_item_frames() {
    // Items authored facing +X: the tangent must land on their +X axis.
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let config = ScatterConfig {
        forward_axis: Vec3::X,
        spacing: Vec2::new(20.0, 20.0),
        count_limit: 5,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 2));

    assert!(!records.is_empty());
    for record in &records {
        assert!((record.rotation * Vec3::X).abs_diff_eq(Vec3::X, 1e-4));
    }
}

// ── Terrain conformance ────────────────────────────────────────────

#[test]
fn terrain_height_blends_instance_y() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let terrain = FlatTerrain { height: 5.0, origin: 2.0, normal: None };
    let span = SplineSpan::default();

    let config = ScatterConfig {
        fit_height_to_terrain: 1.0,
        spacing: Vec2::new(10.0, 10.0),
        count_limit: 10,
        ..Default::default()
    };
    let mut ctx = context(&curves, span, &items, &config, 8);
    ctx.terrain = Some(&terrain);
    for record in run_scatter(&ctx) {
        assert!((record.translation.y - 7.0).abs() < 1e-4);
    }

    let config = ScatterConfig { fit_height_to_terrain: 0.5, ..config };
    let mut ctx = context(&curves, span, &items, &config, 8);
    ctx.terrain = Some(&terrain);
    for record in run_scatter(&ctx) {
        assert!((record.translation.y - 3.5).abs() < 1e-4);
    }
}

#[test]
fn terrain_normal_tilts_instance_up() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let normal = Vec3::new(0.6, 0.8, 0.0);
    let terrain = FlatTerrain { height: 0.0, origin: 0.0, normal: Some(normal) };
    let config = ScatterConfig {
        fit_rotation_to_terrain: 1.0,
        spacing: Vec2::new(10.0, 10.0),
        count_limit: 10,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let mut ctx = context(&curves, span, &items, &config, 8);
    ctx.terrain = Some(&terrain);

    let records = run_scatter(&ctx);
    assert!(!records.is_empty());
    for record in &records {
        let up = record.rotation * Vec3::Y;
        assert!(up.abs_diff_eq(normal, 1e-4), "up {up:?}");
    }
}

#[test]
fn terrain_untouched_when_weights_are_zero() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0)];
    let terrain = CountingTerrain::default();
    let config = ScatterConfig {
        spacing: Vec2::new(5.0, 5.0),
        count_limit: 30,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let mut ctx = context(&curves, span, &items, &config, 8);
    ctx.terrain = Some(&terrain);

    let records = run_scatter(&ctx);
    assert!(!records.is_empty());
    assert_eq!(terrain.queries.load(Ordering::Relaxed), 0);
}

// ── Weighted selection ─────────────────────────────────────────────

#[test]
fn selection_frequencies_follow_probabilities() {
    let curves = straight_x(100.0);
    let items = vec![scene_item(1.0), scene_item(3.0)];
    let config = ScatterConfig {
        spacing: Vec2::new(0.0, 0.0),
        count_limit: 4000,
        ..Default::default()
    };
    let span = SplineSpan::default();
    let records = run_scatter(&context(&curves, span, &items, &config, 4242));

    assert_eq!(records.len(), 4000);
    let first = records.iter().filter(|r| r.item == ScatterItemId(0)).count();
    let share = first as f32 / records.len() as f32;
    assert!((share - 0.25).abs() < 0.03, "share was {share}");
}
