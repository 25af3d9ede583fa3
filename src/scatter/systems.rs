// src/scatter/systems.rs
//! Driver loop: mark dirty on input changes, rebuild, clean up.

use bevy::prelude::*;
use std::collections::HashSet;

use super::catalog::{RenderRef, ScatterCatalog, ScatterItem};
use super::engine::{run_scatter, PlacementContext};
use super::plugin::{CurveSource, ScatterTerrain, SpanScatter};
use super::state::{PendingRender, ScatterInstance, ScatterState};

/// Mark scatters dirty when the component itself, its curve source, or its
/// catalog asset changed. Stale output is never presented: the rebuild system
/// picks the flag up on the same tick.
pub fn mark_dirty_scatters(
    changed_sources: Query<Entity, Changed<CurveSource>>,
    mut catalog_events: EventReader<AssetEvent<ScatterCatalog>>,
    mut scatters: Query<(Entity, Ref<SpanScatter>, &mut ScatterState)>,
) {
    let mut touched_catalogs = HashSet::new();
    for event in catalog_events.read() {
        if let AssetEvent::Added { id }
        | AssetEvent::Modified { id }
        | AssetEvent::LoadedWithDependencies { id } = event
        {
            touched_catalogs.insert(*id);
        }
    }
    let changed_sources: HashSet<Entity> = changed_sources.iter().collect();

    for (entity, scatter, mut state) in &mut scatters {
        let source = scatter.source.unwrap_or(entity);
        let catalog_changed = scatter
            .catalog
            .as_ref()
            .is_some_and(|handle| touched_catalogs.contains(&handle.id()));
        if scatter.is_changed() || changed_sources.contains(&source) || catalog_changed {
            state.mark_dirty();
        }
    }
}

/// Clear-and-regenerate every dirty scatter.
pub fn rebuild_dirty_scatters(
    mut commands: Commands,
    catalogs: Res<Assets<ScatterCatalog>>,
    terrain: Option<Res<ScatterTerrain>>,
    sources: Query<&CurveSource>,
    transforms: Query<&GlobalTransform>,
    mut scatters: Query<(Entity, &SpanScatter, &mut ScatterState)>,
) {
    for (entity, scatter, mut state) in &mut scatters {
        if !state.take_dirty() {
            continue;
        }
        state.clear_instances(&mut commands);

        let source = scatter.source.unwrap_or(entity);
        let Ok(CurveSource(curves)) = sources.get(source) else {
            continue;
        };

        let items: &[ScatterItem] = match scatter
            .catalog
            .as_ref()
            .and_then(|handle| catalogs.get(handle))
        {
            Some(catalog) => &catalog.items,
            None => &scatter.items,
        };

        let mut span = scatter.span;
        span.validate(Some(curves));

        let owner = transforms
            .get(entity)
            .map(|global| global.compute_transform())
            .unwrap_or_default();
        let seed = if scatter.seed != 0 { scatter.seed } else { entity.to_bits() };

        let ctx = PlacementContext {
            curves,
            span,
            items,
            config: &scatter.config,
            terrain: terrain.as_ref().map(|t| t.0.as_ref()),
            owner,
            seed,
        };
        let records = run_scatter(&ctx);

        for (index, record) in records.iter().enumerate() {
            let Some(render) = items[record.item.0 as usize].render.clone() else {
                continue;
            };
            let instance = commands
                .spawn((
                    Transform {
                        translation: record.translation,
                        rotation: record.rotation,
                        scale: record.scale,
                    },
                    Visibility::default(),
                    PendingRender(render),
                    ScatterInstance { owner: entity, item: record.item, index },
                ))
                .id();
            commands.entity(entity).add_child(instance);
            state.track(instance);
        }

        debug!(
            "scatter: rebuilt {:?} with {} instances (seed {})",
            entity,
            state.instances().len(),
            seed
        );
    }
}

/// Drop instances whose owner lost its `SpanScatter`.
pub fn cleanup_removed_scatters(
    mut commands: Commands,
    mut orphans: Query<(Entity, &mut ScatterState), Without<SpanScatter>>,
) {
    for (entity, mut state) in &mut orphans {
        state.clear_instances(&mut commands);
        commands.entity(entity).remove::<ScatterState>();
    }
}

/// Resolve pending render refs into scene/mesh components.
///
/// Skipped entirely in headless worlds without an asset server; instances
/// stay as bare transforms.
pub fn attach_render_refs(
    mut commands: Commands,
    assets: Option<Res<AssetServer>>,
    pending: Query<(Entity, &PendingRender), Added<PendingRender>>,
) {
    let Some(assets) = assets else {
        return;
    };
    for (entity, render) in &pending {
        let mut instance = commands.entity(entity);
        match &render.0 {
            RenderRef::Scene { path } => {
                instance.insert(SceneRoot(assets.load(path.clone())));
            }
            RenderRef::MeshMaterial { mesh, material } => {
                instance.insert(Mesh3d(assets.load(mesh.clone())));
                if let Some(material) = material {
                    let handle: Handle<StandardMaterial> = assets.load(material.clone());
                    instance.insert(MeshMaterial3d(handle));
                }
            }
        }
        instance.remove::<PendingRender>();
    }
}
