// src/scatter/state.rs
use bevy::prelude::*;

use super::catalog::RenderRef;
use super::core::ScatterItemId;

/// Marker on every spawned scatter instance.
#[derive(Component, Clone, Copy, Debug)]
pub struct ScatterInstance {
    /// The scatter owner that created this instance.
    pub owner: Entity,
    /// Catalog item this instance was drawn from.
    pub item: ScatterItemId,
    /// Index in the placement sequence.
    pub index: usize,
}

/// Render representation waiting to be resolved against the asset server.
#[derive(Component, Clone, Debug)]
pub struct PendingRender(pub RenderRef);

/// Per-owner rebuild flag + bookkeeping of spawned instances.
///
/// Starts dirty so a freshly added scatter builds on the next driver tick.
/// Any input change marks it dirty again; the rebuild system clears old
/// instances and regenerates in full (the only supported lifecycle model).
#[derive(Component, Debug)]
pub struct ScatterState {
    dirty: bool,
    instances: Vec<Entity>,
}

impl Default for ScatterState {
    fn default() -> Self {
        Self { dirty: true, instances: Vec::new() }
    }
}

impl ScatterState {
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn instances(&self) -> &[Entity] {
        &self.instances
    }

    /// Consume the dirty flag; returns whether a rebuild is due.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn track(&mut self, instance: Entity) {
        self.instances.push(instance);
    }

    /// Despawn everything spawned by the previous run.
    pub(crate) fn clear_instances(&mut self, commands: &mut Commands) {
        for entity in self.instances.drain(..) {
            commands.entity(entity).despawn();
        }
    }
}
