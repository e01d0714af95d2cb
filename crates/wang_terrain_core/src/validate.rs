//! Tileset validation logic
//!
//! Each check turns a piece of the source description into its checked model
//! form, so a model can never hold data that skipped validation.

use crate::source::{TileSetSource, WangSetSource};
use crate::tileset::Tile;
use crate::wang::{Color, WangColor, WangId, WangSet, WangTile, NO_COLOR};
use crate::{SchemaViolation, TerrainError};
use std::collections::HashMap;
use std::collections::HashSet;
use wang_terrain_animation::{AnimationClock, AnimationError};

/// Check every tile entry and produce the declared tiles by id.
///
/// Only declared tiles are stored; `tile_count` comes from the description and
/// may be far larger than what is worth allocating.
pub(crate) fn validate_tiles(source: &TileSetSource) -> Result<(HashMap<u32, Tile>, AnimationClock), TerrainError> {
    let tile_count = source.tile_count;
    let mut tiles: HashMap<u32, Tile> = HashMap::with_capacity(source.tiles.len());
    let mut clock = AnimationClock::new();

    for entry in &source.tiles {
        check_tile_in_range(entry.id, tile_count)?;
        if tiles.contains_key(&entry.id) {
            return Err(SchemaViolation::DuplicateTile(entry.id).into());
        }

        let mut tile = Tile::new(entry.id);

        if let Some(probability) = entry.probability {
            if !probability.is_finite() || probability <= 0.0 {
                return Err(TerrainError::InvalidWeight {
                    tile_id: entry.id,
                    weight: probability,
                });
            }
            tile.probability = probability;
        }

        if let Some(frames) = &entry.animation {
            if let Some(frame) = frames.iter().find(|f| f.tile_id >= tile_count) {
                return Err(TerrainError::MalformedAnimation {
                    tile_id: entry.id,
                    reason: format!(
                        "frame references tile {}, outside the tileset (tile count {})",
                        frame.tile_id, tile_count
                    ),
                });
            }
            clock
                .insert(entry.id, frames)
                .map_err(|e: AnimationError| TerrainError::MalformedAnimation {
                    tile_id: entry.id,
                    reason: e.to_string(),
                })?;
            tile.animation = Some(frames.clone());
        }

        tiles.insert(entry.id, tile);
    }

    Ok((tiles, clock))
}

/// Check a wang set against the tileset and produce its model form
pub(crate) fn validate_wang_set(set: &WangSetSource, tile_count: u32) -> Result<WangSet, TerrainError> {
    let mut colors = Vec::with_capacity(set.colors.len());
    for (index, color) in set.colors.iter().enumerate() {
        let id = index as u32 + 1;

        if !color.probability.is_finite() || color.probability < 0.0 {
            return Err(SchemaViolation::ColorProbability {
                set: set.name.clone(),
                color_id: id,
                probability: color.probability,
            }
            .into());
        }

        let display = match &color.color {
            Some(value) => Color::from_hex(value).ok_or_else(|| SchemaViolation::ColorValue {
                set: set.name.clone(),
                color_id: id,
                value: value.clone(),
            })?,
            None => Color::default(),
        };

        colors.push(WangColor {
            id,
            name: color.name.clone(),
            color: display,
            probability: color.probability,
        });
    }

    let color_count = colors.len() as u32;
    let mut tiles = Vec::with_capacity(set.tiles.len());
    let mut seen = HashSet::new();

    for entry in &set.tiles {
        check_tile_in_range(entry.tile_id, tile_count)?;
        if !seen.insert(entry.tile_id) {
            return Err(SchemaViolation::DuplicateWangTile {
                set: set.name.clone(),
                tile_id: entry.tile_id,
            }
            .into());
        }

        let wang_id = WangId::from_slice(&entry.wang_id).ok_or_else(|| SchemaViolation::SignatureLength {
            set: set.name.clone(),
            tile_id: entry.tile_id,
            len: entry.wang_id.len(),
        })?;

        for (position, &color_id) in wang_id.colors.iter().enumerate() {
            if color_id == NO_COLOR {
                continue;
            }
            if color_id > color_count {
                return Err(SchemaViolation::UndeclaredColor {
                    set: set.name.clone(),
                    tile_id: entry.tile_id,
                    color_id,
                }
                .into());
            }
            if !set.kind.uses_position(position) {
                return Err(SchemaViolation::MisplacedColor {
                    set: set.name.clone(),
                    tile_id: entry.tile_id,
                    position,
                }
                .into());
            }
        }

        tiles.push(WangTile {
            tile_id: entry.tile_id,
            wang_id,
        });
    }

    Ok(WangSet {
        name: set.name.clone(),
        kind: set.kind,
        colors,
        tiles,
    })
}

fn check_tile_in_range(tile_id: u32, tile_count: u32) -> Result<(), TerrainError> {
    if tile_id >= tile_count {
        return Err(SchemaViolation::TileOutOfRange { tile_id, tile_count }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{WangColorSource, WangTileSource};
    use crate::wang::WangSetKind;
    use wang_terrain_animation::Frame;

    fn corner_set() -> WangSetSource {
        WangSetSource::new("Water", WangSetKind::Corner).with_color("Water")
    }

    #[test]
    fn test_defaults_for_undeclared_tiles() {
        let source = TileSetSource::new("Test", 4).with_probability(2, 0.25);
        let (tiles, clock) = validate_tiles(&source).unwrap();

        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[&2].probability, 0.25);
        assert!(clock.is_empty());
    }

    #[test]
    fn test_huge_tile_count_stays_sparse() {
        let source = TileSetSource::new("Huge", u32::MAX)
            .with_probability(u32::MAX - 1, 0.5)
            .with_animation(7, vec![Frame::new(7, 100), Frame::new(u32::MAX - 1, 100)]);
        let (tiles, clock) = validate_tiles(&source).unwrap();
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[&(u32::MAX - 1)].probability, 0.5);
        assert_eq!(clock.current_frame(7, 150), u32::MAX - 1);
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let source = TileSetSource::new("Test", 4).with_probability(1, bad);
            let result = validate_tiles(&source);
            assert!(
                matches!(result, Err(TerrainError::InvalidWeight { tile_id: 1, .. })),
                "probability {bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_animations() {
        let empty = TileSetSource::new("Test", 4).with_animation(0, vec![]);
        assert!(matches!(
            validate_tiles(&empty),
            Err(TerrainError::MalformedAnimation { tile_id: 0, .. })
        ));

        let zero = TileSetSource::new("Test", 4).with_animation(0, vec![Frame::new(1, 0)]);
        assert!(matches!(
            validate_tiles(&zero),
            Err(TerrainError::MalformedAnimation { tile_id: 0, .. })
        ));

        let dangling = TileSetSource::new("Test", 4).with_animation(0, vec![Frame::new(9, 100)]);
        let Err(TerrainError::MalformedAnimation { reason, .. }) = validate_tiles(&dangling) else {
            panic!("dangling frame should be rejected");
        };
        assert!(reason.contains('9'));
    }

    #[test]
    fn test_rejects_tiles_outside_tileset() {
        let source = TileSetSource::new("Test", 4).with_probability(4, 1.0);
        assert!(matches!(
            validate_tiles(&source),
            Err(TerrainError::InvalidSchema(SchemaViolation::TileOutOfRange {
                tile_id: 4,
                tile_count: 4
            }))
        ));

        let set = corner_set().with_tile(10, [0, 1, 0, 1, 0, 1, 0, 1]);
        assert!(matches!(
            validate_wang_set(&set, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::TileOutOfRange { tile_id: 10, .. }))
        ));
    }

    #[test]
    fn test_assigns_color_ids_in_order() {
        let set = WangSetSource::new("Ground", WangSetKind::Corner)
            .with_color("Grass")
            .with_color("Dirt");
        let checked = validate_wang_set(&set, 4).unwrap();
        assert_eq!(checked.colors[0].id, 1);
        assert_eq!(checked.colors[1].id, 2);
        assert_eq!(checked.color_id("Dirt"), Some(2));
    }

    #[test]
    fn test_rejects_bad_signatures() {
        let mut short = corner_set();
        short.tiles.push(WangTileSource {
            tile_id: 0,
            wang_id: vec![0, 1, 0],
        });
        assert!(matches!(
            validate_wang_set(&short, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::SignatureLength { tile_id: 0, len: 3, .. }))
        ));

        let undeclared = corner_set().with_tile(1, [0, 2, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            validate_wang_set(&undeclared, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::UndeclaredColor { tile_id: 1, color_id: 2, .. }))
        ));

        let edge_in_corner_set = corner_set().with_tile(2, [1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            validate_wang_set(&edge_in_corner_set, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::MisplacedColor { tile_id: 2, position: 0, .. }))
        ));

        let duplicate = corner_set()
            .with_tile(3, [0, 1, 0, 0, 0, 0, 0, 0])
            .with_tile(3, [0, 0, 0, 1, 0, 0, 0, 0]);
        assert!(matches!(
            validate_wang_set(&duplicate, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::DuplicateWangTile { tile_id: 3, .. }))
        ));
    }

    #[test]
    fn test_rejects_bad_colors() {
        let mut set = corner_set();
        set.colors.push(WangColorSource {
            name: "Lava".to_string(),
            color: Some("not a color".to_string()),
            probability: 1.0,
        });
        assert!(matches!(
            validate_wang_set(&set, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::ColorValue { color_id: 2, .. }))
        ));

        let mut set = corner_set();
        set.colors[0].probability = -0.5;
        assert!(matches!(
            validate_wang_set(&set, 4),
            Err(TerrainError::InvalidSchema(SchemaViolation::ColorProbability { color_id: 1, .. }))
        ));
    }
}
