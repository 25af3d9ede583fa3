// src/curve.rs
//! Curve collaborator surface: a sampler trait, an ordered curve container,
//! and an arc-length parameterized polyline implementation.

use bevy::prelude::*;
use std::sync::Arc;

/// One evaluated point of a curve: position plus a local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    /// Unit travel direction at this point.
    pub tangent: Vec3,
    /// Unit curve-local up, orthogonal to `tangent`.
    pub up: Vec3,
}

/// A 3D curve that can be evaluated by normalized arc-length parameter.
///
/// `t` is expected in `[0, 1]`; implementations clamp out-of-range input
/// rather than failing.
pub trait CurveSampler: Send + Sync + 'static {
    /// Evaluate position/tangent/up at normalized parameter `t`.
    fn sample(&self, t: f32) -> CurveSample;
    /// Total arc length in world units.
    fn length(&self) -> f32;
}

/// Ordered collection of curves, independently indexable.
#[derive(Clone, Default)]
pub struct CurveSet {
    curves: Vec<Arc<dyn CurveSampler>>,
}

impl CurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-curve convenience constructor.
    pub fn from_curve(curve: impl CurveSampler) -> Self {
        let mut set = Self::new();
        set.push(curve);
        set
    }

    pub fn push(&mut self, curve: impl CurveSampler) {
        self.curves.push(Arc::new(curve));
    }

    pub fn curve(&self, index: usize) -> Option<&dyn CurveSampler> {
        self.curves.get(index).map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// Piecewise-linear curve with arc-length parameterization.
///
/// Stores a cumulative arc table alongside the points; `sample` binary-searches
/// the bracketing segment and interpolates. Endpoints are clamped.
#[derive(Clone, Debug)]
pub struct PolylineCurve {
    points: Vec<Vec3>,
    /// Cumulative arc length up to each point; `arcs[0] == 0`.
    arcs: Vec<f32>,
    total: f32,
}

impl PolylineCurve {
    pub fn new(mut points: Vec<Vec3>) -> Self {
        // Collapse consecutive duplicates so every stored segment has length.
        points.dedup_by(|b, a| b.distance_squared(*a) < 1e-12);

        let mut arcs = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += p.distance(points[i - 1]);
            }
            arcs.push(total);
        }
        Self { points, arcs, total }
    }

    /// Build the curve with every point mapped through `transform`.
    pub fn with_transform(points: Vec<Vec3>, transform: &Transform) -> Self {
        Self::new(points.into_iter().map(|p| transform.transform_point(p)).collect())
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    fn segment_frame(&self, seg: usize) -> (Vec3, Vec3) {
        let tangent = (self.points[seg + 1] - self.points[seg]).normalize_or(Vec3::NEG_Z);
        // Project world up off the tangent; fall back when the segment is vertical.
        let up = (Vec3::Y - tangent * Vec3::Y.dot(tangent)).normalize_or(Vec3::Z);
        (tangent, up)
    }
}

impl CurveSampler for PolylineCurve {
    fn sample(&self, t: f32) -> CurveSample {
        if self.points.len() < 2 {
            return CurveSample {
                position: self.points.first().copied().unwrap_or(Vec3::ZERO),
                tangent: Vec3::NEG_Z,
                up: Vec3::Y,
            };
        }

        let arc = t.clamp(0.0, 1.0) * self.total;
        // Bracketing segment via the cumulative table.
        let seg = self
            .arcs
            .partition_point(|&a| a <= arc)
            .saturating_sub(1)
            .min(self.points.len() - 2);

        let seg_start = self.arcs[seg];
        let seg_len = self.arcs[seg + 1] - seg_start;
        let local = if seg_len > 0.0 { (arc - seg_start) / seg_len } else { 0.0 };

        let position = self.points[seg].lerp(self.points[seg + 1], local);
        let (tangent, up) = self.segment_frame(seg);
        CurveSample { position, tangent, up }
    }

    fn length(&self) -> f32 {
        self.total
    }
}
