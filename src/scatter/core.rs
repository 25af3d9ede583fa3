// src/scatter/core.rs
//! Core types/traits for deterministic span scattering.
//! Keep this file dependency-light; it should compile before the engine or plugin glue.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------- Ids & records ----------

/// Index of an item in the scatter catalog (stable during a run).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScatterItemId(pub u32);

/// Finalized placement for one instance (full transform + item identity).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub item: ScatterItemId,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

// ---------- Spacing & offsets ----------

/// Smallest arc-length step between consecutive slots (world units).
/// Guarantees loop progress even for zero-width spacing ranges.
pub const MIN_SPACING: f32 = 0.001;

/// How consecutive slots are spaced along the span.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScatterMethod {
    /// `spacing.x` is the target instance count across the whole span.
    FixedCount,
    /// Each step draws a distance uniformly from `[spacing.x, spacing.y]`.
    #[default]
    DistanceRange,
}

/// Component-wise interpolated offset range.
///
/// One scalar draw interpolates all three axes together; `min == max` is a
/// fixed, non-random value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Range {
    pub min: Vec3,
    pub max: Vec3,
}

impl Vec3Range {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A degenerate range producing `value` every draw.
    pub fn fixed(value: Vec3) -> Self {
        Self { min: value, max: value }
    }

    #[inline]
    pub fn sample(&self, u: f32) -> Vec3 {
        self.min.lerp(self.max, u)
    }
}

// ---------- Scatter configuration ----------

/// Everything the engine needs besides curve, span, items, and seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    #[serde(default)]
    pub method: ScatterMethod,
    /// (min, max) spacing in world units; `FixedCount` reads only `x`.
    #[serde(default = "default_spacing")]
    pub spacing: Vec2,
    #[serde(default)]
    pub position_offset: Vec3Range,
    /// Euler offsets in degrees.
    #[serde(default)]
    pub rotation_offset: Vec3Range,
    /// Added to unit scale, per axis.
    #[serde(default)]
    pub scale_offset: Vec3Range,
    /// 1.0 aligns instances fully to the curve frame; lower values blend
    /// toward a yaw-only lock that keeps the owner's up axis fixed.
    #[serde(default = "default_fit_spline")]
    pub fit_rotation_to_spline: f32,
    /// 0.0 disables terrain height conformance (terrain is never queried).
    #[serde(default)]
    pub fit_height_to_terrain: f32,
    /// 0.0 disables terrain normal conformance (terrain is never queried).
    #[serde(default)]
    pub fit_rotation_to_terrain: f32,
    /// Item-local up axis the curve frame maps onto.
    #[serde(default = "default_up_axis")]
    pub up_axis: Vec3,
    /// Item-local forward axis the curve tangent maps onto.
    #[serde(default = "default_forward_axis")]
    pub forward_axis: Vec3,
    /// Hard iteration cap; the sole bound on work per run.
    #[serde(default = "default_count_limit")]
    pub count_limit: usize,
}

fn default_spacing() -> Vec2 {
    Vec2::ONE
}
fn default_fit_spline() -> f32 {
    1.0
}
fn default_up_axis() -> Vec3 {
    Vec3::Y
}
fn default_forward_axis() -> Vec3 {
    Vec3::NEG_Z
}
fn default_count_limit() -> usize {
    1000
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            method: ScatterMethod::default(),
            spacing: default_spacing(),
            position_offset: Vec3Range::default(),
            rotation_offset: Vec3Range::default(),
            scale_offset: Vec3Range::default(),
            fit_rotation_to_spline: default_fit_spline(),
            fit_height_to_terrain: 0.0,
            fit_rotation_to_terrain: 0.0,
            up_axis: default_up_axis(),
            forward_axis: default_forward_axis(),
            count_limit: default_count_limit(),
        }
    }
}

// ---------- Terrain collaborator ----------

/// Terrain queries used for height/orientation conformance.
///
/// The engine only calls these when the corresponding `fit_*_to_terrain`
/// weight is above zero.
pub trait TerrainSampler: Send + Sync + 'static {
    /// Ground height (world Y) at world XZ.
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// World-space Y of the terrain origin, added to sampled heights.
    fn origin_y(&self) -> f32 {
        0.0
    }

    /// Surface normal (unit) at world XZ, if available.
    fn normal_at(&self, x: f32, z: f32) -> Option<Vec3> {
        let _ = (x, z);
        None
    }
}

// ---------- Rotation helpers ----------

/// Rotation whose forward (-Z) axis aligns to `forward` and whose up axis
/// approximates `up`. Degenerate input falls back to identity axes.
#[inline]
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    Transform::IDENTITY.looking_to(forward, up).rotation
}

/// Signed angle in radians from `from` to `to` around `axis`.
#[inline]
pub fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = from.angle_between(to);
    if !unsigned.is_finite() {
        return 0.0;
    }
    unsigned * axis.dot(from.cross(to)).signum()
}
