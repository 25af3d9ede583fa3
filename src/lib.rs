//! # spline_scatter
//!
//! Deterministic placement of prop instances along spans of 3D curves.
//!
//! A span selects a curve and a normalized `[start, end]` slice of it. The
//! engine walks that slice by arc length, picks a weighted catalog item per
//! slot, and composes a full transform from the curve frame, configured
//! offset ranges, and optional terrain conformance. Identical inputs and seed
//! always reproduce the same placements.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use spline_scatter::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ScatterPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) {
//!     let road = PolylineCurve::new(vec![
//!         Vec3::ZERO,
//!         Vec3::new(40.0, 0.0, 10.0),
//!         Vec3::new(80.0, 2.0, -5.0),
//!     ]);
//!     commands.spawn((
//!         CurveSource(CurveSet::from_curve(road)),
//!         SpanScatter::new(SplineSpan::new(0, 0.1, 0.9))
//!             .with_items(vec![
//!                 ScatterItem::scene("props/lamp.glb#Scene0", 1.0),
//!                 ScatterItem::scene("props/bench.glb#Scene0", 3.0),
//!             ])
//!             .with_seed(7),
//!     ));
//! }
//! ```
//!
//! The engine core ([`scatter::engine::run_scatter`]) is pure and usable
//! without an `App`; the plugin adds the dirty-mark/rebuild driver loop.

pub mod curve;
pub mod scatter;
pub mod span;

pub use scatter::ScatterPlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::curve::{CurveSample, CurveSampler, CurveSet, PolylineCurve};
    pub use crate::scatter::catalog::{RenderRef, ScatterCatalog, ScatterItem};
    pub use crate::scatter::core::{
        PlacementRecord, ScatterConfig, ScatterItemId, ScatterMethod, TerrainSampler, Vec3Range,
    };
    pub use crate::scatter::engine::{run_scatter, PlacementContext};
    pub use crate::scatter::plugin::{CurveSource, ScatterPlugin, ScatterTerrain, SpanScatter};
    pub use crate::scatter::state::{ScatterInstance, ScatterState};
    pub use crate::span::SplineSpan;
}
