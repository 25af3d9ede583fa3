// src/scatter/plugin.rs
//! Scatter plugin wiring (glue).
//! - Catalog asset/loader
//! - Curve + terrain collaborator surfaces
//! - Dirty-mark, rebuild, and cleanup driver systems

use bevy::prelude::*;
use std::sync::Arc;

use crate::curve::CurveSet;
use crate::span::SplineSpan;

use super::catalog::{ScatterCatalog, ScatterCatalogLoader, ScatterItem};
use super::core::{ScatterConfig, TerrainSampler};
use super::state::ScatterState;
use super::systems::{
    attach_render_refs, cleanup_removed_scatters, mark_dirty_scatters, rebuild_dirty_scatters,
};

/// Ordered curve container collaborator.
///
/// Scatters resolve their curve through this component, either on their own
/// entity or on an explicit `source` entity.
#[derive(Component, Clone, Default)]
pub struct CurveSource(pub CurveSet);

/// Optional terrain collaborator, shared by every scatter in the world.
#[derive(Resource, Clone)]
pub struct ScatterTerrain(pub Arc<dyn TerrainSampler>);

impl ScatterTerrain {
    pub fn new(sampler: impl TerrainSampler) -> Self {
        Self(Arc::new(sampler))
    }
}

/// Scatters weighted items along a span of a curve.
///
/// Placement reruns whenever this component, its curve source, or its catalog
/// changes; each rerun despawns the previous instances first.
#[derive(Component, Clone)]
#[require(ScatterState)]
pub struct SpanScatter {
    /// Entity carrying the [`CurveSource`]; `None` means this entity.
    pub source: Option<Entity>,
    pub span: SplineSpan,
    /// Inline item list, used when no loaded catalog is set.
    pub items: Vec<ScatterItem>,
    /// Catalog asset; takes precedence over `items` once loaded.
    pub catalog: Option<Handle<ScatterCatalog>>,
    pub config: ScatterConfig,
    /// 0 derives a stable per-owner seed from the entity id.
    pub seed: u64,
}

impl Default for SpanScatter {
    fn default() -> Self {
        Self {
            source: None,
            span: SplineSpan::default(),
            items: vec![ScatterItem::default()],
            catalog: None,
            config: ScatterConfig::default(),
            seed: 0,
        }
    }
}

impl SpanScatter {
    pub fn new(span: SplineSpan) -> Self {
        Self { span, ..Default::default() }
    }

    pub fn with_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_items(mut self, items: Vec<ScatterItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_catalog(mut self, catalog: Handle<ScatterCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_config(mut self, config: ScatterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

pub struct ScatterPlugin;

impl Plugin for ScatterPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ScatterCatalog>()
            .register_asset_loader(ScatterCatalogLoader)
            .add_systems(Update, mark_dirty_scatters)
            .add_systems(Update, rebuild_dirty_scatters.after(mark_dirty_scatters))
            .add_systems(
                Update,
                cleanup_removed_scatters.after(rebuild_dirty_scatters),
            )
            .add_systems(Update, attach_render_refs.after(rebuild_dirty_scatters));
    }
}
