//! Wang set types
//!
//! These mirror Tiled's wang sets: a set of terrain colors plus, for each
//! participating tile, the color found at each of its 8 edge/corner positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of positions in a wang id
pub const WANG_ID_LEN: usize = 8;

/// Color id meaning "no terrain at this position"
pub const NO_COLOR: u32 = 0;

/// Simple RGBA color for terrain visualization (no Bevy dependency)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    /// Parse a Tiled hex color: `#rrggbb` or `#aarrggbb` (the `#` is optional)
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            let byte = u8::from_str_radix(hex.get(i..i + 2)?, 16).ok()?;
            Some(byte as f32 / 255.0)
        };

        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(2)?, channel(4)?, channel(6)?, channel(0)?)),
            _ => None,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Type of wang set - determines which positions of a wang id are meaningful
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WangSetKind {
    /// Only the 4 corners carry colors; good for basic terrain transitions
    #[default]
    Corner,
    /// Only the 4 edges carry colors; good for roads, platforms, paths
    Edge,
    /// 4 corners + 4 edges
    Mixed,
}

impl WangSetKind {
    /// Whether a wang id position may hold a color in this kind of set
    pub fn uses_position(&self, index: usize) -> bool {
        match self {
            WangSetKind::Corner => WangId::is_corner(index),
            WangSetKind::Edge => index < WANG_ID_LEN && !WangId::is_corner(index),
            WangSetKind::Mixed => index < WANG_ID_LEN,
        }
    }
}

/// Wang ID representing terrain colors at all 8 positions
/// Uses Tiled's position indexing:
///   7|0|1
///   6|X|2
///   5|4|3
/// - Even indices (0,2,4,6) = Edges (Top, Right, Bottom, Left)
/// - Odd indices (1,3,5,7) = Corners (TopRight, BottomRight, BottomLeft, TopLeft)
///
/// A value of [`NO_COLOR`] means the position belongs to no terrain. It is
/// compared like any other color, it is not a wildcard.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WangId {
    pub colors: [u32; WANG_ID_LEN],
}

impl WangId {
    pub const TOP: usize = 0;
    pub const TOP_RIGHT: usize = 1;
    pub const RIGHT: usize = 2;
    pub const BOTTOM_RIGHT: usize = 3;
    pub const BOTTOM: usize = 4;
    pub const BOTTOM_LEFT: usize = 5;
    pub const LEFT: usize = 6;
    pub const TOP_LEFT: usize = 7;

    pub const EMPTY: Self = WangId {
        colors: [NO_COLOR; WANG_ID_LEN],
    };

    pub const fn new(colors: [u32; WANG_ID_LEN]) -> Self {
        Self { colors }
    }

    /// Build a corner-only wang id; edge positions stay empty
    pub const fn from_corners(top_left: u32, top_right: u32, bottom_right: u32, bottom_left: u32) -> Self {
        let mut colors = [NO_COLOR; WANG_ID_LEN];
        colors[Self::TOP_LEFT] = top_left;
        colors[Self::TOP_RIGHT] = top_right;
        colors[Self::BOTTOM_RIGHT] = bottom_right;
        colors[Self::BOTTOM_LEFT] = bottom_left;
        Self { colors }
    }

    /// Create a WangId with all positions set to one color
    pub const fn filled(color: u32) -> Self {
        WangId {
            colors: [color; WANG_ID_LEN],
        }
    }

    /// Build from a slice, returning `None` unless it has exactly 8 entries
    pub fn from_slice(values: &[u32]) -> Option<Self> {
        let colors: [u32; WANG_ID_LEN] = values.try_into().ok()?;
        Some(Self { colors })
    }

    /// Color at a position (`NO_COLOR` for out-of-range indices)
    pub fn get(&self, index: usize) -> u32 {
        self.colors.get(index).copied().unwrap_or(NO_COLOR)
    }

    /// Corner colors in (top-left, top-right, bottom-right, bottom-left) order
    pub fn corners(&self) -> [u32; 4] {
        [
            self.colors[Self::TOP_LEFT],
            self.colors[Self::TOP_RIGHT],
            self.colors[Self::BOTTOM_RIGHT],
            self.colors[Self::BOTTOM_LEFT],
        ]
    }

    /// Number of positions at which two wang ids differ
    pub fn hamming_distance(&self, other: &WangId) -> u32 {
        self.colors
            .iter()
            .zip(other.colors.iter())
            .filter(|(a, b)| a != b)
            .count() as u32
    }

    /// Whether position `i` is a corner
    pub fn is_corner(i: usize) -> bool {
        i < WANG_ID_LEN && i % 2 == 1
    }
}

/// Formats like Tiled's `wangid` attribute: `0,1,0,0,0,1,0,1`
impl fmt::Display for WangId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, color) in self.colors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{color}")?;
        }
        Ok(())
    }
}

impl FromStr for WangId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|e| format!("invalid wang id entry '{}': {}", part.trim(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        WangId::from_slice(&values)
            .ok_or_else(|| format!("wang id has {} entries, expected 8", values.len()))
    }
}

/// A terrain color within a wang set (e.g., "Water", "Grass")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangColor {
    /// 1-based id; position in the set's color list plus one
    pub id: u32,
    pub name: String,
    /// Display color for UI visualization
    pub color: Color,
    /// Relative likelihood Tiled gives this color when painting
    pub probability: f32,
}

/// A tile participating in a wang set, with its signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WangTile {
    pub tile_id: u32,
    pub wang_id: WangId,
}

/// A named wang set with its colors and tiles (in declaration order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WangSet {
    pub name: String,
    pub kind: WangSetKind,
    pub colors: Vec<WangColor>,
    pub tiles: Vec<WangTile>,
}

impl WangSet {
    /// Get a color by its 1-based id
    pub fn color(&self, id: u32) -> Option<&WangColor> {
        if id == NO_COLOR {
            return None;
        }
        self.colors.get(id as usize - 1)
    }

    /// Get a color id by name
    pub fn color_id(&self, name: &str) -> Option<u32> {
        self.colors.iter().find(|c| c.name == name).map(|c| c.id)
    }

    /// Get the signature of a tile in this set
    pub fn wang_id_of(&self, tile_id: u32) -> Option<WangId> {
        self.tiles
            .iter()
            .find(|t| t.tile_id == tile_id)
            .map(|t| t.wang_id)
    }
}
