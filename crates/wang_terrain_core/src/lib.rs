//! Core data structures for wang_terrain
//!
//! This crate provides the read-only catalog consumed by the autotiler:
//! - `TileSetModel` - Validated tileset with wang sets, tile weights and animations
//! - `WangSet` / `WangColor` / `WangTile` - Tiled-compatible terrain rules
//! - `WangId` - The 8-position edge/corner signature of a tile or cell
//! - `TileSetSource` - The serde description a model is built from
//! - `TerrainError` - Error type shared by every wang_terrain crate

mod error;
mod source;
mod tileset;
mod validate;
mod wang;

pub use error::{SchemaViolation, TerrainError};
pub use source::{TileSetSource, TileSource, WangColorSource, WangSetSource, WangTileSource};
pub use tileset::{Tile, TileSetModel, DEFAULT_TILE_PROBABILITY};
pub use wang::{Color, WangColor, WangId, WangSet, WangSetKind, WangTile, NO_COLOR, WANG_ID_LEN};

// Re-export the animation crate so downstream users see one frame type
pub use wang_terrain_animation::{AnimationClock, Frame, FrameTimeline};
