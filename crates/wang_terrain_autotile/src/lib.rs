//! Corner-based Wang tile autotiling
//!
//! This crate turns a grid of terrain colors assigned to vertices into
//! concrete tile ids, using the wang sets of a [`TileSetModel`].
//!
//! # Features
//! - Exact signature matching with an explicit fallback policy
//! - Weighted variant selection driven by a caller-supplied rng
//! - Animated tiles resolved for an explicit elapsed time
//! - Deterministic serial or multi-threaded resolution passes
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rand::{rngs::SmallRng, SeedableRng};
//! use wang_terrain_autotile::{Compositor, CornerAssignmentGrid, FallbackPolicy, TileSetModel};
//!
//! let model = Arc::new(TileSetModel::from_json_str(include_str!("water.wang.json"))?);
//! let compositor = Compositor::new(model, "Water")?;
//!
//! // 10x10 cells of water
//! let mut grid = CornerAssignmentGrid::new(10, 10);
//! grid.fill(1);
//!
//! let mut rng = SmallRng::seed_from_u64(0);
//! let resolved = compositor.resolve(&grid, elapsed_ms, &mut rng, &FallbackPolicy::Strict)?;
//! ```
//!
//! [`TileSetModel`]: wang_terrain_core::TileSetModel

pub mod compositor;
pub mod config;
pub mod grid;
pub mod matcher;
pub mod selector;

// Re-export main types at crate root
pub use compositor::{Compositor, ResolvedGrid, UnmatchedCell};
pub use config::AutotileConfig;
pub use grid::{CornerAssignmentGrid, SharedCornerGrid};
pub use matcher::{FallbackPolicy, WangMatcher};
pub use selector::{choose_weighted, VariantSelector};

// Re-export wang_terrain_core
pub use wang_terrain_core;
pub use wang_terrain_core::{TerrainError, TileSetModel};
