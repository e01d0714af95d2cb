//! bevy_ecs_tilemap integration
//!
//! Pushes resolved tile ids into the `TileTextureIndex` of an existing
//! tilemap. Terrain rows run top-down (Tiled), tilemap rows bottom-up, so
//! row `y` of the terrain lands on tilemap row `height - 1 - y`.

use crate::layer::ResolvedTerrain;
use bevy::prelude::*;
use bevy_ecs_tilemap::prelude::*;

/// Tilemap position of terrain cell `(x, y)`, if it fits in the map
pub fn tilemap_pos(x: u32, y: u32, size: &TilemapSize) -> Option<TilePos> {
    if x >= size.x || y >= size.y {
        return None;
    }
    Some(TilePos { x, y: size.y - 1 - y })
}

/// System that writes resolved tiles into the tilemap on the same entity.
///
/// Unresolved cells are hidden rather than left with a stale texture.
pub fn sync_tilemap_textures(
    layers: Query<(&ResolvedTerrain, &TileStorage, &TilemapSize), Changed<ResolvedTerrain>>,
    mut tiles: Query<(&mut TileTextureIndex, &mut TileVisible)>,
) {
    for (resolved, storage, size) in layers.iter() {
        let grid = &resolved.grid;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let Some(pos) = tilemap_pos(x, y, size) else {
                    continue;
                };
                let Some(tile_entity) = storage.get(&pos) else {
                    continue;
                };
                let Ok((mut texture, mut visible)) = tiles.get_mut(tile_entity) else {
                    continue;
                };

                match grid.get(x, y) {
                    Some(tile_id) => {
                        texture.set_if_neq(TileTextureIndex(tile_id));
                        visible.set_if_neq(TileVisible(true));
                    }
                    None => {
                        visible.set_if_neq(TileVisible(false));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TerrainTileSet;
    use wang_terrain_autotile::{AutotileConfig, Compositor, CornerAssignmentGrid};

    const GROUND_JSON: &[u8] = br#"{
        "name": "Ground",
        "tile_count": 8,
        "wang_sets": [{
            "name": "Water",
            "type": "corner",
            "colors": [{ "name": "Water" }],
            "tiles": [{ "tile_id": 5, "wang_id": "0,1,0,1,0,1,0,1" }]
        }]
    }"#;

    #[test]
    fn test_sync_writes_textures_and_hides_unresolved() {
        let tileset = TerrainTileSet::from_json_slice(GROUND_JSON).unwrap();
        let compositor = Compositor::new(tileset.model.clone(), "Water").unwrap();
        // Cell (0, 0) is all water, cell (1, 0) matches nothing
        let grid = CornerAssignmentGrid::from_rows(&[&[1, 1, 0], &[1, 1, 0]]).unwrap();
        let resolved = compositor
            .resolve_with_config(&grid, 0, &AutotileConfig::new("Water"))
            .unwrap();

        let mut app = App::new();
        app.add_systems(Update, sync_tilemap_textures);

        let size = TilemapSize { x: 2, y: 1 };
        let mut storage = TileStorage::empty(size);
        let mut tiles = Vec::new();
        for x in 0..size.x {
            let tile = app
                .world_mut()
                .spawn((TileTextureIndex(0), TileVisible(true)))
                .id();
            storage.set(&TilePos { x, y: 0 }, tile);
            tiles.push(tile);
        }
        app.world_mut()
            .spawn((ResolvedTerrain { grid: resolved }, storage, size));

        app.update();

        let world = app.world();
        assert_eq!(world.get::<TileTextureIndex>(tiles[0]), Some(&TileTextureIndex(5)));
        assert_eq!(world.get::<TileVisible>(tiles[0]), Some(&TileVisible(true)));
        assert_eq!(world.get::<TileTextureIndex>(tiles[1]), Some(&TileTextureIndex(0)));
        assert_eq!(world.get::<TileVisible>(tiles[1]), Some(&TileVisible(false)));
    }

    #[test]
    fn test_rows_are_flipped() {
        let size = TilemapSize { x: 4, y: 3 };
        assert_eq!(tilemap_pos(0, 0, &size), Some(TilePos { x: 0, y: 2 }));
        assert_eq!(tilemap_pos(3, 2, &size), Some(TilePos { x: 3, y: 0 }));
        assert_eq!(tilemap_pos(4, 0, &size), None);
        assert_eq!(tilemap_pos(0, 3, &size), None);
    }
}
