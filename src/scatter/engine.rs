// src/scatter/engine.rs
//! Span-walking placement engine: deterministic per seed, pure per run.

use bevy::math::{EulerRot, FloatExt};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::curve::{CurveSampler, CurveSet};
use crate::span::SplineSpan;

use super::catalog::ScatterItem;
use super::core::{
    look_rotation, signed_angle, PlacementRecord, ScatterConfig, ScatterItemId, ScatterMethod,
    TerrainSampler, MIN_SPACING,
};
use super::random_box::RandomBox;

/// Input to one placement run.
pub struct PlacementContext<'a> {
    pub curves: &'a CurveSet,
    pub span: SplineSpan,
    pub items: &'a [ScatterItem],
    pub config: &'a ScatterConfig,
    /// Queried only when a `fit_*_to_terrain` weight is above zero.
    pub terrain: Option<&'a dyn TerrainSampler>,
    /// Frame of the owning entity; anchors the yaw-only rotation lock.
    pub owner: Transform,
    pub seed: u64,
}

/// Walk the span by reserved arc length and emit one record per placed slot.
///
/// Fully deterministic for identical inputs: every run owns a ChaCha8 stream
/// seeded from the context, so concurrent runs and unrelated ambient draws
/// never interact with it. Degenerate input (missing curve, empty items,
/// inverted range, zero-length curve) yields an empty result, never an error.
pub fn run_scatter(ctx: &PlacementContext) -> Vec<PlacementRecord> {
    let Some(curve) = ctx.curves.curve(ctx.span.index) else {
        return Vec::new();
    };
    if ctx.items.is_empty() {
        return Vec::new();
    }
    let spline_length = curve.length();
    if !spline_length.is_finite() || spline_length <= 0.0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(ctx.seed);
    let range = ctx.span.range;
    let span_length = spline_length * (range.y - range.x);

    let mut random_box = RandomBox::new();
    for item in ctx.items {
        random_box.push_weight(item.probability);
    }

    let mut reserved = 0.0f32;
    let mut records = Vec::new();
    for _ in 0..ctx.config.count_limit {
        let t = range.x + reserved / spline_length;
        if t >= range.y {
            // Reserved distance only grows, so once past the end every
            // remaining iteration is a no-op. Skip, never break: the loop
            // runs its fixed iteration count.
            continue;
        }

        let index = random_box.choose(&mut rng);
        let item = &ctx.items[index];
        if item.render.is_some() {
            let (translation, rotation, scale) = calculate_trs(ctx, curve, t, &mut rng);
            records.push(PlacementRecord {
                item: ScatterItemId(index as u32),
                translation,
                rotation,
                scale,
            });
        }

        let spacing = match ctx.config.method {
            ScatterMethod::FixedCount => {
                // Target count clamped to >= 1 keeps the spacing finite.
                span_length / ctx.config.spacing.x.max(1.0)
            }
            ScatterMethod::DistanceRange => {
                let (lo, hi) = if ctx.config.spacing.x <= ctx.config.spacing.y {
                    (ctx.config.spacing.x, ctx.config.spacing.y)
                } else {
                    (ctx.config.spacing.y, ctx.config.spacing.x)
                };
                rng.random_range(lo..=hi)
            }
        };
        reserved += spacing.max(MIN_SPACING);
    }
    records
}

/// Compose the full transform for one slot at parameter `t`.
///
/// Draw order per instance is position-u, rotation-u, scale-u; spacing draws
/// happen back in the walk loop.
fn calculate_trs(
    ctx: &PlacementContext,
    curve: &dyn CurveSampler,
    t: f32,
    rng: &mut ChaCha8Rng,
) -> (Vec3, Quat, Vec3) {
    let config = ctx.config;
    let sample = curve.sample(t);
    let spline_rotation = look_rotation(sample.tangent, sample.up);

    // Position: offset in the curve frame, then optional height conformance.
    let position_offset = config.position_offset.sample(rng.random::<f32>());
    let mut translation = sample.position + spline_rotation * position_offset;
    if config.fit_height_to_terrain > 0.0 {
        if let Some(terrain) = ctx.terrain {
            let ground = terrain.height_at(translation.x, translation.z)
                + terrain.origin_y()
                + position_offset.y;
            translation.y = sample.position.y.lerp(ground, config.fit_height_to_terrain);
        }
    }

    // Rotation: curve alignment (full or yaw-locked blend), Euler offset,
    // axis remap, then optional terrain tilt on the left.
    let remap = look_rotation(config.forward_axis, config.up_axis).inverse();
    let rotation_offset = config.rotation_offset.sample(rng.random::<f32>());
    let euler_offset = Quat::from_euler(
        EulerRot::YXZ,
        rotation_offset.y.to_radians(),
        rotation_offset.x.to_radians(),
        rotation_offset.z.to_radians(),
    );
    let mut rotation = if config.fit_rotation_to_spline >= 1.0 {
        spline_rotation * euler_offset * remap
    } else {
        let owner_up = *ctx.owner.up();
        let lock_angle = signed_angle(*ctx.owner.forward(), sample.tangent, owner_up);
        let lock_rotation = Quat::from_axis_angle(owner_up, lock_angle);
        let slope_rotation = lock_rotation.slerp(spline_rotation, config.fit_rotation_to_spline);
        slope_rotation * euler_offset * remap
    };
    if config.fit_rotation_to_terrain > 0.0 {
        if let Some(normal) = ctx
            .terrain
            .and_then(|terrain| terrain.normal_at(translation.x, translation.z))
        {
            let tilt = Quat::from_rotation_arc(Vec3::Y, normal.normalize_or(Vec3::Y));
            rotation = Quat::IDENTITY.slerp(tilt, config.fit_rotation_to_terrain) * rotation;
        }
    }

    // Scale
    let scale_offset = config.scale_offset.sample(rng.random::<f32>());
    (translation, rotation, Vec3::ONE + scale_offset)
}
