//! The validated, read-only tileset model

use crate::source::TileSetSource;
use crate::validate::{validate_tiles, validate_wang_set};
use crate::wang::{WangColor, WangSet, WangTile};
use crate::{SchemaViolation, TerrainError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use wang_terrain_animation::{AnimationClock, Frame};

/// Probability of a tile that does not declare one
pub const DEFAULT_TILE_PROBABILITY: f32 = 1.0;

/// A tile of the tileset with its variant weight and optional animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    /// Relative weight among tiles sharing a signature (always > 0)
    pub probability: f32,
    /// Animation frames, if the tile is animated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Vec<Frame>>,
}

impl Tile {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            probability: DEFAULT_TILE_PROBABILITY,
            animation: None,
        }
    }

    /// Check if this tile has an animation
    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }
}

/// Immutable tileset catalog: metadata, tiles, wang sets and animation tables.
///
/// Built once from a [`TileSetSource`]; every invariant is checked during
/// construction so lookups afterwards only fail for ids the caller made up.
/// The model is `Send + Sync` and meant to be shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TileSetModel {
    name: String,
    tile_width: u32,
    tile_height: u32,
    columns: u32,
    image: Option<String>,
    tile_count: u32,
    /// Tiles the description declares; the rest use defaults
    tiles: HashMap<u32, Tile>,
    wang_sets: Vec<WangSet>,
    animations: AnimationClock,
}

impl TileSetModel {
    /// Validate a source description and build the model
    pub fn from_source(source: &TileSetSource) -> Result<Self, TerrainError> {
        let (tiles, animations) = validate_tiles(source)?;

        let mut wang_sets: Vec<WangSet> = Vec::with_capacity(source.wang_sets.len());
        for set in &source.wang_sets {
            if wang_sets.iter().any(|existing| existing.name == set.name) {
                return Err(SchemaViolation::DuplicateWangSet(set.name.clone()).into());
            }
            wang_sets.push(validate_wang_set(set, source.tile_count)?);
        }

        tracing::debug!(
            tileset = %source.name,
            tile_count = source.tile_count,
            declared_tiles = tiles.len(),
            wang_sets = wang_sets.len(),
            animated = animations.len(),
            "built tileset model"
        );

        Ok(Self {
            name: source.name.clone(),
            tile_width: source.tile_width,
            tile_height: source.tile_height,
            columns: source.columns,
            image: source.image.clone(),
            tile_count: source.tile_count,
            tiles,
            wang_sets,
            animations,
        })
    }

    /// Parse and validate a JSON tileset description
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        let source: TileSetSource = serde_json::from_str(json)?;
        Self::from_source(&source)
    }

    /// Parse and validate a JSON tileset description from bytes
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, TerrainError> {
        let source: TileSetSource = serde_json::from_slice(bytes)?;
        Self::from_source(&source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tile size in pixels as (width, height)
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Source image path, if the description named one
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Get a tile by id; tiles the description never mentions come back
    /// with default probability and no animation
    pub fn tile(&self, id: u32) -> Result<Cow<'_, Tile>, TerrainError> {
        if id >= self.tile_count {
            return Err(TerrainError::UnknownTile(id));
        }
        Ok(self
            .tiles
            .get(&id)
            .map_or_else(|| Cow::Owned(Tile::new(id)), Cow::Borrowed))
    }

    /// Convert a tile id to its (column, row) in the source image
    pub fn tile_grid_pos(&self, id: u32) -> Option<(u32, u32)> {
        if self.columns == 0 || id >= self.tile_count() {
            return None;
        }
        Some((id % self.columns, id / self.columns))
    }

    /// All wang sets in declaration order
    pub fn wang_sets(&self) -> &[WangSet] {
        &self.wang_sets
    }

    /// Get a wang set by name
    pub fn wang_set(&self, set_name: &str) -> Result<&WangSet, TerrainError> {
        self.wang_sets
            .iter()
            .find(|set| set.name == set_name)
            .ok_or_else(|| TerrainError::UnknownWangSet(set_name.to_string()))
    }

    /// Get a wang color by its 1-based id
    pub fn color_by_id(&self, set_name: &str, id: u32) -> Result<&WangColor, TerrainError> {
        self.wang_set(set_name)?
            .color(id)
            .ok_or_else(|| TerrainError::UnknownColor {
                set: set_name.to_string(),
                id,
            })
    }

    /// Wang tiles of a set in declaration order
    pub fn wang_tiles(&self, set_name: &str) -> Result<&[WangTile], TerrainError> {
        Ok(&self.wang_set(set_name)?.tiles)
    }

    /// Frame tables of every animated tile
    pub fn animation_clock(&self) -> &AnimationClock {
        &self.animations
    }
}
