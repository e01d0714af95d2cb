//! Serde description of a tileset
//!
//! The fields follow Tiled's tileset attributes so a `.tsx` file maps onto
//! this structure one to one. Nothing here is validated; [`TileSetModel`]
//! does that when it is built.
//!
//! [`TileSetModel`]: crate::TileSetModel

use crate::wang::WangSetKind;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use wang_terrain_animation::Frame;

/// A whole tileset as it arrives from the asset pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileSetSource {
    pub name: String,
    #[serde(default)]
    pub tile_width: u32,
    #[serde(default)]
    pub tile_height: u32,
    pub tile_count: u32,
    #[serde(default)]
    pub columns: u32,
    /// Source image path (relative to the tileset file)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Tiles with non-default properties
    #[serde(default)]
    pub tiles: Vec<TileSource>,
    #[serde(default)]
    pub wang_sets: Vec<WangSetSource>,
}

/// Per-tile properties: spawn probability and animation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileSource {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<Vec<Frame>>,
}

/// A wang set with its colors and tile signatures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WangSetSource {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: WangSetKind,
    #[serde(default)]
    pub colors: Vec<WangColorSource>,
    #[serde(default)]
    pub tiles: Vec<WangTileSource>,
}

/// A wang color; its id is its position in the list plus one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WangColorSource {
    pub name: String,
    /// Display color, `#rrggbb` or `#aarrggbb`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default = "default_color_probability")]
    pub probability: f32,
}

fn default_color_probability() -> f32 {
    1.0
}

/// A tile's signature inside a wang set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WangTileSource {
    pub tile_id: u32,
    /// Either Tiled's `"0,1,0,0,0,1,0,1"` string or a JSON array
    #[serde(deserialize_with = "deserialize_wang_id")]
    pub wang_id: Vec<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WangIdRepr {
    Text(String),
    List(Vec<u32>),
}

fn deserialize_wang_id<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match WangIdRepr::deserialize(deserializer)? {
        WangIdRepr::List(values) => Ok(values),
        WangIdRepr::Text(text) => text
            .split(',')
            .map(|part| {
                part.trim().parse::<u32>().map_err(|e| {
                    D::Error::custom(format!("invalid wang id entry '{}': {}", part.trim(), e))
                })
            })
            .collect(),
    }
}

impl TileSetSource {
    pub fn new(name: impl Into<String>, tile_count: u32) -> Self {
        Self {
            name: name.into(),
            tile_count,
            ..Default::default()
        }
    }

    /// Set the spawn probability of a tile
    pub fn with_probability(mut self, id: u32, probability: f32) -> Self {
        self.tile_entry(id).probability = Some(probability);
        self
    }

    /// Set the animation of a tile
    pub fn with_animation(mut self, id: u32, frames: Vec<Frame>) -> Self {
        self.tile_entry(id).animation = Some(frames);
        self
    }

    /// Add a wang set
    pub fn with_wang_set(mut self, wang_set: WangSetSource) -> Self {
        self.wang_sets.push(wang_set);
        self
    }

    fn tile_entry(&mut self, id: u32) -> &mut TileSource {
        let index = match self.tiles.iter().position(|t| t.id == id) {
            Some(index) => index,
            None => {
                self.tiles.push(TileSource {
                    id,
                    ..Default::default()
                });
                self.tiles.len() - 1
            }
        };
        &mut self.tiles[index]
    }
}

impl WangSetSource {
    pub fn new(name: impl Into<String>, kind: WangSetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            colors: Vec::new(),
            tiles: Vec::new(),
        }
    }

    /// Add a color with default probability; returns the builder
    pub fn with_color(mut self, name: impl Into<String>) -> Self {
        self.colors.push(WangColorSource {
            name: name.into(),
            color: None,
            probability: default_color_probability(),
        });
        self
    }

    /// Add a tile signature
    pub fn with_tile(mut self, tile_id: u32, wang_id: [u32; 8]) -> Self {
        self.tiles.push(WangTileSource {
            tile_id,
            wang_id: wang_id.to_vec(),
        });
        self
    }
}
