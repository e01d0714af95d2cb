//! Bevy runtime for wang terrain
//!
//! Loads terrain tilesets as assets and resolves [`TerrainLayer`] components
//! into [`ResolvedTerrain`] every frame, with animated tiles following
//! Bevy's [`Time`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use wang_terrain_runtime::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(WangTerrainPlugin)
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     let mut grid = CornerAssignmentGrid::new(32, 32);
//!     grid.fill(1);
//!     commands.spawn(TerrainLayer::new(
//!         asset_server.load("terrain/water.wang.json"),
//!         grid,
//!         AutotileConfig::new("Water"),
//!     ));
//! }
//! ```
//!
//! With the `tilemap` feature, put the layer on a `bevy_ecs_tilemap` map
//! entity and [`tilemap::sync_tilemap_textures`] keeps its tile textures in
//! step with the resolved terrain.

use bevy::prelude::*;

pub mod layer;
pub mod loader;
#[cfg(feature = "tilemap")]
pub mod tilemap;

pub use layer::{
    prepare_terrain_compositors, resolve_terrain_layers, ResolvedTerrain, TerrainCompositor, TerrainLayer,
};
pub use loader::{TerrainLoadError, TerrainTileSet, TerrainTileSetLoader};

// Re-export the engine crates
pub use wang_terrain_autotile;
pub use wang_terrain_core;

pub mod prelude {
    pub use crate::{ResolvedTerrain, TerrainLayer, TerrainTileSet, WangTerrainPlugin};
    pub use wang_terrain_autotile::{AutotileConfig, CornerAssignmentGrid, FallbackPolicy, ResolvedGrid};
}

/// Plugin that registers terrain tileset assets and resolves terrain layers
pub struct WangTerrainPlugin;

impl Plugin for WangTerrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TerrainTileSet>()
            .init_asset_loader::<TerrainTileSetLoader>()
            .add_systems(Update, (prepare_terrain_compositors, resolve_terrain_layers).chain());

        #[cfg(feature = "tilemap")]
        app.add_systems(Update, tilemap::sync_tilemap_textures.after(resolve_terrain_layers));
    }
}
