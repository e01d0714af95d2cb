//! # wang_terrain
//!
//! Corner-based Wang tile autotiling for Tiled tilesets.
//!
//! Paint terrain colors onto the vertices of a grid and get back concrete
//! tile ids: matching tile signatures, weighted variants and animated tiles.
//!
//! ## Crates
//!
//! - [`wang_terrain_core`] - tileset model, wang sets, signatures, errors
//! - [`wang_terrain_animation`] - frame timelines and the animation clock
//! - [`wang_terrain_autotile`] - corner grid, matcher, variant selection, compositor
//! - `wang_terrain_runtime` - Bevy plugin and asset loader (feature `runtime`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rand::{rngs::SmallRng, SeedableRng};
//! use wang_terrain::prelude::*;
//!
//! let model = Arc::new(TileSetModel::from_json_str(&json)?);
//! let compositor = Compositor::new(model, "Water")?;
//!
//! let mut grid = CornerAssignmentGrid::new(16, 16);
//! grid.fill(1);
//!
//! let resolved = compositor.resolve(&grid, 0, &mut SmallRng::seed_from_u64(0), &FallbackPolicy::Strict)?;
//! ```

pub use wang_terrain_animation;
pub use wang_terrain_autotile;
pub use wang_terrain_core;

#[cfg(feature = "runtime")]
pub use wang_terrain_runtime;

pub mod prelude {
    pub use wang_terrain_autotile::{
        AutotileConfig, Compositor, CornerAssignmentGrid, FallbackPolicy, ResolvedGrid, SharedCornerGrid,
        UnmatchedCell, VariantSelector, WangMatcher,
    };
    pub use wang_terrain_core::{AnimationClock, Frame, TerrainError, TileSetModel, WangId};

    #[cfg(feature = "runtime")]
    pub use wang_terrain_runtime::{ResolvedTerrain, TerrainLayer, TerrainTileSet, WangTerrainPlugin};
}
