//! Error types shared across the wang_terrain crates

use crate::wang::WangId;
use thiserror::Error;

/// Errors raised while building a tileset model or resolving terrain
#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("invalid tileset schema: {0}")]
    InvalidSchema(#[from] SchemaViolation),
    #[error("unknown wang set '{0}'")]
    UnknownWangSet(String),
    #[error("unknown color {id} in wang set '{set}'")]
    UnknownColor { set: String, id: u32 },
    #[error("unknown tile {0}")]
    UnknownTile(u32),
    #[error("no tile matches signature [{0}]")]
    UnmatchedSignature(WangId),
    #[error("tile {tile_id} has invalid probability {weight}")]
    InvalidWeight { tile_id: u32, weight: f32 },
    #[error("tile {tile_id} has a malformed animation: {reason}")]
    MalformedAnimation { tile_id: u32, reason: String },
    #[error("cannot select a variant from an empty candidate list")]
    EmptyCandidates,
    #[error("failed to parse tileset description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A specific inconsistency found while validating a tileset description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("tile {tile_id} is outside the tileset (tile count {tile_count})")]
    TileOutOfRange { tile_id: u32, tile_count: u32 },
    #[error("tile {0} is declared more than once")]
    DuplicateTile(u32),
    #[error("wang set '{0}' is declared more than once")]
    DuplicateWangSet(String),
    #[error("wang set '{set}' color {color_id} has invalid probability {probability}")]
    ColorProbability {
        set: String,
        color_id: u32,
        probability: f32,
    },
    #[error("wang set '{set}' color {color_id} has unreadable display color '{value}'")]
    ColorValue {
        set: String,
        color_id: u32,
        value: String,
    },
    #[error("wang set '{set}' tile {tile_id} has {len} signature entries, expected 8")]
    SignatureLength { set: String, tile_id: u32, len: usize },
    #[error("wang set '{set}' tile {tile_id} references undeclared color {color_id}")]
    UndeclaredColor {
        set: String,
        tile_id: u32,
        color_id: u32,
    },
    #[error("wang set '{set}' tile {tile_id} sets position {position}, which this set type does not use")]
    MisplacedColor {
        set: String,
        tile_id: u32,
        position: usize,
    },
    #[error("wang set '{set}' lists tile {tile_id} more than once")]
    DuplicateWangTile { set: String, tile_id: u32 },
}
