//! Asset loader for terrain tilesets
//!
//! Loads `.wang.json` files into [`TerrainTileSet`] assets. The description is
//! validated while loading, so a tileset that reaches `Assets` is always usable.
//! With Bevy's `file_watcher` feature, saving the file reloads the tileset and
//! every layer using it rebuilds its compositor.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use wang_terrain_runtime::{TerrainLayer, WangTerrainPlugin};
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     let tileset = asset_server.load("terrain/water.wang.json");
//!     commands.spawn(TerrainLayer::new(tileset, grid, AutotileConfig::new("Water")));
//! }
//! ```

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use std::sync::Arc;
use thiserror::Error;
use wang_terrain_core::{TerrainError, TileSetModel};

/// Error type for terrain tileset loading failures
#[derive(Debug, Error)]
pub enum TerrainLoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid terrain tileset: {0}")]
    Terrain(#[from] TerrainError),
}

/// A validated tileset, shared with every compositor built from it
#[derive(Asset, TypePath, Debug, Clone)]
pub struct TerrainTileSet {
    pub model: Arc<TileSetModel>,
}

impl TerrainTileSet {
    pub fn new(model: TileSetModel) -> Self {
        Self { model: Arc::new(model) }
    }

    /// Parse and validate a JSON tileset description
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, TerrainError> {
        TileSetModel::from_json_slice(bytes).map(Self::new)
    }
}

/// Asset loader for terrain tileset JSON files
#[derive(Default, TypePath)]
pub struct TerrainTileSetLoader;

impl AssetLoader for TerrainTileSetLoader {
    type Asset = TerrainTileSet;
    type Settings = ();
    type Error = TerrainLoadError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let tileset = TerrainTileSet::from_json_slice(&bytes)?;
        info!(
            "Loaded terrain tileset '{}' ({} tiles, {} wang sets)",
            tileset.model.name(),
            tileset.model.tile_count(),
            tileset.model.wang_sets().len()
        );
        Ok(tileset)
    }

    fn extensions(&self) -> &[&str] {
        &["wang.json"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tileset_asset() {
        let json = br#"{
            "name": "Water",
            "tile_count": 4,
            "wang_sets": [{
                "name": "Water",
                "type": "corner",
                "colors": [{ "name": "Water" }],
                "tiles": [{ "tile_id": 2, "wang_id": "0,1,0,1,0,1,0,1" }]
            }]
        }"#;

        let tileset = TerrainTileSet::from_json_slice(json).unwrap();
        assert_eq!(tileset.model.name(), "Water");
        assert_eq!(tileset.model.wang_tiles("Water").unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_tileset_is_rejected() {
        let json = br#"{ "name": "Broken", "tile_count": 1, "tiles": [{ "id": 0, "probability": 0 }] }"#;
        assert!(matches!(
            TerrainTileSet::from_json_slice(json),
            Err(TerrainError::InvalidWeight { tile_id: 0, .. })
        ));

        let load_error: TerrainLoadError = TerrainTileSet::from_json_slice(b"[]").unwrap_err().into();
        assert!(load_error.to_string().starts_with("Invalid terrain tileset"));
    }
}
