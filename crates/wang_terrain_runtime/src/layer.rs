//! Terrain layer components and resolution systems

use crate::loader::TerrainTileSet;
use bevy::prelude::*;
use std::sync::Arc;
use wang_terrain_autotile::{AutotileConfig, Compositor, CornerAssignmentGrid, ResolvedGrid};
use wang_terrain_core::TileSetModel;

/// A terrain layout to resolve against a tileset every frame
#[derive(Component, Debug, Clone)]
pub struct TerrainLayer {
    pub tileset: Handle<TerrainTileSet>,
    /// Terrain color per vertex; edit it freely, the next frame picks it up
    pub grid: CornerAssignmentGrid,
    pub config: AutotileConfig,
}

impl TerrainLayer {
    pub fn new(tileset: Handle<TerrainTileSet>, grid: CornerAssignmentGrid, config: AutotileConfig) -> Self {
        Self {
            tileset,
            grid,
            config,
        }
    }
}

/// The tile ids of the last resolution pass
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct ResolvedTerrain {
    pub grid: ResolvedGrid,
}

/// Compositor cached for a layer, rebuilt when the tileset asset or the
/// configured wang set changes
#[derive(Component, Debug)]
pub struct TerrainCompositor {
    model: Arc<TileSetModel>,
    wang_set: String,
    /// `None` when the wang set could not be indexed
    compositor: Option<Compositor>,
}

impl TerrainCompositor {
    pub fn compositor(&self) -> Option<&Compositor> {
        self.compositor.as_ref()
    }

    fn is_current(&self, model: &Arc<TileSetModel>, wang_set: &str) -> bool {
        Arc::ptr_eq(&self.model, model) && self.wang_set == wang_set
    }
}

/// System that builds a [`TerrainCompositor`] for each layer whose tileset is
/// loaded, and rebuilds it after a reload or a wang set change
pub fn prepare_terrain_compositors(
    mut commands: Commands,
    tilesets: Res<Assets<TerrainTileSet>>,
    layers: Query<(Entity, &TerrainLayer, Option<&TerrainCompositor>)>,
) {
    for (entity, layer, cached) in layers.iter() {
        let Some(tileset) = tilesets.get(&layer.tileset) else {
            continue;
        };
        let wang_set = &layer.config.wang_set;
        if cached.is_some_and(|cached| cached.is_current(&tileset.model, wang_set)) {
            continue;
        }

        let compositor = match Compositor::from_config(Arc::clone(&tileset.model), &layer.config) {
            Ok(compositor) => {
                info!(
                    "Prepared terrain layer for wang set '{}' of tileset '{}'",
                    wang_set,
                    tileset.model.name()
                );
                Some(compositor)
            }
            Err(e) => {
                warn!("Cannot resolve terrain layer {:?}: {}", entity, e);
                None
            }
        };

        commands.entity(entity).insert(TerrainCompositor {
            model: Arc::clone(&tileset.model),
            wang_set: wang_set.clone(),
            compositor,
        });
    }
}

/// System that resolves every prepared layer for the current elapsed time.
///
/// Variants are seeded from the layer config on every pass, so they only
/// change when the grid or the config does; animated tiles follow [`Time`].
/// Unmatched cells are reported once, when the set of unmatched cells changes.
pub fn resolve_terrain_layers(
    mut commands: Commands,
    time: Res<Time>,
    mut layers: Query<(Entity, &TerrainLayer, &TerrainCompositor, Option<&mut ResolvedTerrain>)>,
) {
    let elapsed_ms = time.elapsed().as_millis() as u64;

    for (entity, layer, cached, resolved) in layers.iter_mut() {
        let Some(compositor) = cached.compositor() else {
            continue;
        };

        let grid = match compositor.resolve_with_config(&layer.grid, elapsed_ms, &layer.config) {
            Ok(grid) => grid,
            Err(e) => {
                warn!("Failed to resolve terrain layer {:?}: {}", entity, e);
                continue;
            }
        };

        if unmatched_changed(resolved.as_deref(), &grid) {
            if let Some(first) = grid.unmatched().first() {
                warn!(
                    "Terrain layer {:?} has {} cells without a matching tile, first at ({}, {}) with signature [{}]",
                    entity,
                    grid.unmatched().len(),
                    first.x,
                    first.y,
                    first.signature
                );
            }
        }

        match resolved {
            Some(mut resolved) => {
                resolved.set_if_neq(ResolvedTerrain { grid });
            }
            None => {
                commands.entity(entity).insert(ResolvedTerrain { grid });
            }
        }
    }
}

fn unmatched_changed(previous: Option<&ResolvedTerrain>, grid: &ResolvedGrid) -> bool {
    !previous.is_some_and(|previous| previous.grid.unmatched() == grid.unmatched())
}
