//! Signature matching
//!
//! [`WangMatcher`] indexes one wang set of a [`TileSetModel`] by exact
//! signature. Lookups are exact; approximate matching only happens when the
//! caller asks for it through a [`FallbackPolicy`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wang_terrain_core::{TerrainError, TileSetModel, WangId, WangSetKind, WANG_ID_LEN};

/// What to do when a cell's signature has no exact match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Report the signature as unmatched
    #[default]
    Strict,
    /// Use the indexed signature with the fewest differing positions
    NearestByHammingDistance,
    /// Use this tile
    DefaultTile(u32),
}

/// Exact-signature index over one wang set
#[derive(Debug, Clone)]
pub struct WangMatcher {
    set_name: String,
    kind: WangSetKind,
    tile_count: u32,
    /// Distinct signatures in order of first appearance, with their tiles
    entries: Vec<(WangId, Vec<u32>)>,
    index: HashMap<WangId, usize>,
}

impl WangMatcher {
    /// Index the tiles of `set_name`
    pub fn new(model: &TileSetModel, set_name: &str) -> Result<Self, TerrainError> {
        let set = model.wang_set(set_name)?;

        let mut entries: Vec<(WangId, Vec<u32>)> = Vec::new();
        let mut index: HashMap<WangId, usize> = HashMap::new();
        for tile in &set.tiles {
            match index.get(&tile.wang_id) {
                Some(&i) => entries[i].1.push(tile.tile_id),
                None => {
                    index.insert(tile.wang_id, entries.len());
                    entries.push((tile.wang_id, vec![tile.tile_id]));
                }
            }
        }

        tracing::debug!(
            wang_set = %set_name,
            tiles = set.tiles.len(),
            signatures = entries.len(),
            "indexed wang set"
        );

        Ok(Self {
            set_name: set.name.clone(),
            kind: set.kind,
            tile_count: model.tile_count(),
            entries,
            index,
        })
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn kind(&self) -> WangSetKind {
        self.kind
    }

    /// Number of distinct signatures
    pub fn signature_count(&self) -> usize {
        self.entries.len()
    }

    /// Tiles whose signature equals `signature`, in declaration order
    pub fn resolve(&self, signature: &WangId) -> Result<&[u32], TerrainError> {
        self.index
            .get(signature)
            .map(|&i| self.entries[i].1.as_slice())
            .ok_or(TerrainError::UnmatchedSignature(*signature))
    }

    /// Like [`resolve`](Self::resolve), falling back per `fallback` when
    /// there is no exact match
    pub fn resolve_with<'a>(
        &'a self,
        signature: &WangId,
        fallback: &'a FallbackPolicy,
    ) -> Result<&'a [u32], TerrainError> {
        match self.resolve(signature) {
            Ok(candidates) => Ok(candidates),
            Err(unmatched) => match fallback {
                FallbackPolicy::Strict => Err(unmatched),
                FallbackPolicy::NearestByHammingDistance => self.nearest(signature).ok_or(unmatched),
                FallbackPolicy::DefaultTile(tile_id) => {
                    self.check_tile(*tile_id)?;
                    Ok(std::slice::from_ref(tile_id))
                }
            },
        }
    }

    /// Check that a fallback can be applied against this tileset
    pub fn check_fallback(&self, fallback: &FallbackPolicy) -> Result<(), TerrainError> {
        match fallback {
            FallbackPolicy::DefaultTile(tile_id) => self.check_tile(*tile_id),
            _ => Ok(()),
        }
    }

    /// Fill tiles: every position this set's kind uses carries `color`
    pub fn uniform_tiles(&self, color: u32) -> Vec<u32> {
        let kind = self.kind;
        self.entries
            .iter()
            .filter(|(signature, _)| {
                (0..WANG_ID_LEN)
                    .filter(|&i| kind.uses_position(i))
                    .all(|i| signature.get(i) == color)
            })
            .flat_map(|(_, tiles)| tiles.iter().copied())
            .collect()
    }

    // min_by_key keeps the first of equal minima, so ties go to declaration order
    fn nearest(&self, signature: &WangId) -> Option<&[u32]> {
        self.entries
            .iter()
            .min_by_key(|(candidate, _)| candidate.hamming_distance(signature))
            .map(|(_, tiles)| tiles.as_slice())
    }

    fn check_tile(&self, tile_id: u32) -> Result<(), TerrainError> {
        if tile_id >= self.tile_count {
            return Err(TerrainError::UnknownTile(tile_id));
        }
        Ok(())
    }
}
