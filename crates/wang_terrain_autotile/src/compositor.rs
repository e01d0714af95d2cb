//! Grid resolution
//!
//! The [`Compositor`] turns a [`CornerAssignmentGrid`] into a [`ResolvedGrid`]
//! of concrete tile ids: corner signature, match, weighted variant pick,
//! then the animation frame for the given time.
//!
//! Each pass draws a single seed from the caller's rng and gives every cell
//! its own small rng derived from `(pass seed, x, y)`. A cell's result
//! therefore doesn't depend on evaluation order, and a pass split across
//! worker threads gives exactly the serial result.

use crate::config::AutotileConfig;
use crate::grid::CornerAssignmentGrid;
use crate::matcher::{FallbackPolicy, WangMatcher};
use crate::selector::VariantSelector;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;
use wang_terrain_core::{TerrainError, TileSetModel, WangId};

/// A cell left without a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmatchedCell {
    pub x: u32,
    pub y: u32,
    pub signature: WangId,
}

/// Tile id per cell, row-major with `(0, 0)` at the top-left
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ResolvedGridRepr")]
pub struct ResolvedGrid {
    width: u32,
    height: u32,
    cells: Vec<Option<u32>>,
    unmatched: Vec<UnmatchedCell>,
}

#[derive(Deserialize)]
struct ResolvedGridRepr {
    width: u32,
    height: u32,
    cells: Vec<Option<u32>>,
    #[serde(default)]
    unmatched: Vec<UnmatchedCell>,
}

impl TryFrom<ResolvedGridRepr> for ResolvedGrid {
    type Error = String;

    fn try_from(repr: ResolvedGridRepr) -> Result<Self, Self::Error> {
        let expected = repr.width as usize * repr.height as usize;
        if repr.cells.len() != expected {
            return Err(format!(
                "a {}x{} grid needs {} cells, found {}",
                repr.width,
                repr.height,
                expected,
                repr.cells.len()
            ));
        }
        if let Some(cell) = repr.unmatched.iter().find(|c| c.x >= repr.width || c.y >= repr.height) {
            return Err(format!("unmatched cell ({}, {}) is outside the grid", cell.x, cell.y));
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            cells: repr.cells,
            unmatched: repr.unmatched,
        })
    }
}

impl ResolvedGrid {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile at cell `(x, y)`; `None` if unresolved or out of bounds
    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    pub fn cells(&self) -> &[Option<u32>] {
        &self.cells
    }

    /// Cells whose signature had no match under a strict fallback
    pub fn unmatched(&self) -> &[UnmatchedCell] {
        &self.unmatched
    }

    /// Whether every cell received a tile
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// Iterate `(x, y, tile)` over resolved cells
    pub fn iter_resolved(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let width = self.width.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|tile| (i as u32 % width, i as u32 / width, tile))
        })
    }
}

enum CellOutcome {
    Tile(u32),
    Unmatched(WangId),
}

/// Resolves corner grids against one wang set of a shared tileset
#[derive(Debug, Clone)]
pub struct Compositor {
    model: Arc<TileSetModel>,
    matcher: WangMatcher,
    selector: VariantSelector,
}

impl Compositor {
    pub fn new(model: Arc<TileSetModel>, set_name: &str) -> Result<Self, TerrainError> {
        let matcher = WangMatcher::new(&model, set_name)?;
        let selector = VariantSelector::new(Arc::clone(&model));
        Ok(Self {
            model,
            matcher,
            selector,
        })
    }

    /// Build a compositor for the wang set named in `config`
    pub fn from_config(model: Arc<TileSetModel>, config: &AutotileConfig) -> Result<Self, TerrainError> {
        Self::new(model, &config.wang_set)
    }

    pub fn model(&self) -> &Arc<TileSetModel> {
        &self.model
    }

    pub fn matcher(&self) -> &WangMatcher {
        &self.matcher
    }

    /// Resolve every cell on the calling thread
    pub fn resolve(
        &self,
        grid: &CornerAssignmentGrid,
        elapsed_ms: u64,
        rng: &mut impl Rng,
        fallback: &FallbackPolicy,
    ) -> Result<ResolvedGrid, TerrainError> {
        self.resolve_parallel(grid, elapsed_ms, rng, fallback, 1)
    }

    /// Resolve every cell, splitting the rows into bands over `workers`
    /// scoped threads. The result is identical to [`resolve`](Self::resolve)
    /// for the same rng state.
    pub fn resolve_parallel(
        &self,
        grid: &CornerAssignmentGrid,
        elapsed_ms: u64,
        rng: &mut impl Rng,
        fallback: &FallbackPolicy,
        workers: usize,
    ) -> Result<ResolvedGrid, TerrainError> {
        self.matcher.check_fallback(fallback)?;

        let pass_seed: u64 = rng.gen();
        let height = grid.height();
        let workers = workers.clamp(1, height.max(1) as usize);

        let outcomes = if workers == 1 {
            self.resolve_rows(grid, 0..height, pass_seed, elapsed_ms, fallback)?
        } else {
            let band = (height as usize).div_ceil(workers) as u32;
            let bands: Vec<Range<u32>> = (0..height)
                .step_by(band as usize)
                .map(|start| start..(start + band).min(height))
                .collect();

            let results = std::thread::scope(|scope| {
                let handles: Vec<_> = bands
                    .into_iter()
                    .map(|rows| {
                        scope.spawn(move || self.resolve_rows(grid, rows, pass_seed, elapsed_ms, fallback))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect::<Vec<_>>()
            });

            let mut outcomes = Vec::with_capacity(grid.width() as usize * height as usize);
            for band in results {
                outcomes.extend(band?);
            }
            outcomes
        };

        let resolved = assemble(grid.width(), height, outcomes);
        tracing::debug!(
            wang_set = %self.matcher.set_name(),
            width = resolved.width,
            height = resolved.height,
            unmatched = resolved.unmatched.len(),
            elapsed_ms,
            workers,
            "resolved terrain grid"
        );
        Ok(resolved)
    }

    /// Resolve with the fallback, seed and worker count of `config`.
    ///
    /// The variant rng is re-seeded from `config.seed` on every call, so
    /// variants stay put while animations advance with `elapsed_ms`.
    pub fn resolve_with_config(
        &self,
        grid: &CornerAssignmentGrid,
        elapsed_ms: u64,
        config: &AutotileConfig,
    ) -> Result<ResolvedGrid, TerrainError> {
        let mut rng = SmallRng::seed_from_u64(config.seed);
        self.resolve_parallel(grid, elapsed_ms, &mut rng, &config.fallback, config.workers)
    }

    fn resolve_rows(
        &self,
        grid: &CornerAssignmentGrid,
        rows: Range<u32>,
        pass_seed: u64,
        elapsed_ms: u64,
        fallback: &FallbackPolicy,
    ) -> Result<Vec<CellOutcome>, TerrainError> {
        let mut outcomes = Vec::with_capacity(rows.len() * grid.width() as usize);
        for y in rows {
            for x in 0..grid.width() {
                outcomes.push(self.resolve_cell(grid, x, y, pass_seed, elapsed_ms, fallback)?);
            }
        }
        Ok(outcomes)
    }

    fn resolve_cell(
        &self,
        grid: &CornerAssignmentGrid,
        x: u32,
        y: u32,
        pass_seed: u64,
        elapsed_ms: u64,
        fallback: &FallbackPolicy,
    ) -> Result<CellOutcome, TerrainError> {
        let signature = grid.cell_signature(x, y);
        let candidates = match self.matcher.resolve_with(&signature, fallback) {
            Ok(candidates) => candidates,
            Err(TerrainError::UnmatchedSignature(signature)) => return Ok(CellOutcome::Unmatched(signature)),
            Err(e) => return Err(e),
        };

        let mut rng = SmallRng::seed_from_u64(cell_seed(pass_seed, x, y));
        let tile = self.selector.select(candidates, &mut rng)?;
        Ok(CellOutcome::Tile(self.model.animation_clock().current_frame(tile, elapsed_ms)))
    }
}

fn assemble(width: u32, height: u32, outcomes: Vec<CellOutcome>) -> ResolvedGrid {
    let mut cells = Vec::with_capacity(outcomes.len());
    let mut unmatched = Vec::new();
    let row_width = width.max(1);

    for (i, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            CellOutcome::Tile(tile) => cells.push(Some(tile)),
            CellOutcome::Unmatched(signature) => {
                cells.push(None);
                unmatched.push(UnmatchedCell {
                    x: i as u32 % row_width,
                    y: i as u32 / row_width,
                    signature,
                });
            }
        }
    }

    ResolvedGrid {
        width,
        height,
        cells,
        unmatched,
    }
}

/// splitmix64 finalizer over the pass seed and cell position
fn cell_seed(pass_seed: u64, x: u32, y: u32) -> u64 {
    let position = ((x as u64) << 32) | y as u64;
    let mut z = pass_seed ^ position.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
