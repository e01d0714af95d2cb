//! Corner assignment grid
//!
//! The logical terrain layout: one terrain color per grid vertex. A
//! `width × height` cell grid has `(width + 1) × (height + 1)` vertices.
//! Coordinates follow Tiled: `(0, 0)` is the top-left vertex, +Y goes down.

use parking_lot::{RwLock, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use wang_terrain_core::{WangId, NO_COLOR};

/// Terrain color per vertex (`None` = unassigned)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct CornerAssignmentGrid {
    width: u32,
    height: u32,
    vertices: Vec<Option<u32>>,
}

/// Serialized grid, checked before it becomes a [`CornerAssignmentGrid`]
#[derive(Deserialize)]
struct GridRepr {
    width: u32,
    height: u32,
    vertices: Vec<Option<u32>>,
}

impl TryFrom<GridRepr> for CornerAssignmentGrid {
    type Error = String;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        let expected = (repr.width as usize + 1) * (repr.height as usize + 1);
        if repr.vertices.len() != expected {
            return Err(format!(
                "a {}x{} grid needs {} vertices, found {}",
                repr.width,
                repr.height,
                expected,
                repr.vertices.len()
            ));
        }
        Ok(Self {
            width: repr.width,
            height: repr.height,
            vertices: repr.vertices,
        })
    }
}

impl CornerAssignmentGrid {
    /// Create an unassigned grid for `width × height` cells
    pub fn new(width: u32, height: u32) -> Self {
        let count = (width as usize + 1) * (height as usize + 1);
        Self {
            width,
            height,
            vertices: vec![None; count],
        }
    }

    /// Build a grid from vertex rows (top to bottom), `0` meaning unassigned.
    ///
    /// Returns `None` if there are fewer than two rows, fewer than two
    /// columns, or the rows have different lengths.
    pub fn from_rows(rows: &[&[u32]]) -> Option<Self> {
        let vertex_height = rows.len();
        let vertex_width = rows.first()?.len();
        if vertex_height < 2 || vertex_width < 2 || rows.iter().any(|r| r.len() != vertex_width) {
            return None;
        }

        let vertices = rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|&color| (color != NO_COLOR).then_some(color))
            .collect();

        Some(Self {
            width: vertex_width as u32 - 1,
            height: vertex_height as u32 - 1,
            vertices,
        })
    }

    /// Width in cells
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Vertex grid dimensions (`width + 1`, `height + 1`)
    pub fn vertex_dimensions(&self) -> (u32, u32) {
        (self.width + 1, self.height + 1)
    }

    fn vertex_index(&self, vx: u32, vy: u32) -> Option<usize> {
        if vx > self.width || vy > self.height {
            return None;
        }
        Some(vy as usize * (self.width as usize + 1) + vx as usize)
    }

    /// Color assigned to a vertex (`None` if unassigned or out of bounds)
    pub fn vertex(&self, vx: u32, vy: u32) -> Option<u32> {
        self.vertex_index(vx, vy)
            .and_then(|i| self.vertices.get(i).copied().flatten())
    }

    /// Assign a color to a vertex. Returns `false` if out of bounds.
    ///
    /// Assigning [`NO_COLOR`] is the same as clearing the vertex.
    pub fn set_vertex(&mut self, vx: u32, vy: u32, color: u32) -> bool {
        match self.vertex_index(vx, vy) {
            Some(i) => {
                self.vertices[i] = (color != NO_COLOR).then_some(color);
                true
            }
            None => false,
        }
    }

    /// Unassign a vertex. Returns `false` if out of bounds.
    pub fn clear_vertex(&mut self, vx: u32, vy: u32) -> bool {
        self.set_vertex(vx, vy, NO_COLOR)
    }

    /// Assign one color to every vertex
    pub fn fill(&mut self, color: u32) {
        let value = (color != NO_COLOR).then_some(color);
        self.vertices.iter_mut().for_each(|v| *v = value);
    }

    /// Assign a color to every vertex in the inclusive rectangle
    /// `(min_x, min_y)..=(max_x, max_y)`, clipped to the grid.
    ///
    /// Returns the number of vertices written.
    pub fn paint_rect(&mut self, min: (u32, u32), max: (u32, u32), color: u32) -> usize {
        let max_x = max.0.min(self.width);
        let max_y = max.1.min(self.height);
        let mut written = 0;
        for vy in min.1..=max_y {
            for vx in min.0..=max_x {
                if self.set_vertex(vx, vy, color) {
                    written += 1;
                }
            }
        }
        written
    }

    /// Corner signature of cell `(x, y)`; edges stay empty and unassigned
    /// vertices read as [`NO_COLOR`]
    pub fn cell_signature(&self, x: u32, y: u32) -> WangId {
        let color = |vx: u32, vy: u32| self.vertex(vx, vy).unwrap_or(NO_COLOR);
        WangId::from_corners(
            color(x, y),
            color(x + 1, y),
            color(x + 1, y + 1),
            color(x, y + 1),
        )
    }
}

/// A corner grid shared between one writer and any number of resolvers.
///
/// Resolution passes work on [`SharedCornerGrid::snapshot`], a copy taken
/// under the read lock, so a write can never tear a pass in progress.
#[derive(Debug, Default)]
pub struct SharedCornerGrid {
    inner: RwLock<CornerAssignmentGrid>,
}

impl SharedCornerGrid {
    pub fn new(grid: CornerAssignmentGrid) -> Self {
        Self {
            inner: RwLock::new(grid),
        }
    }

    /// Copy the current layout
    pub fn snapshot(&self) -> CornerAssignmentGrid {
        self.inner.read().clone()
    }

    /// Exclusive access for the authoring side
    pub fn write(&self) -> RwLockWriteGuard<'_, CornerAssignmentGrid> {
        self.inner.write()
    }

    /// Apply an edit under the write lock
    pub fn update<R>(&self, edit: impl FnOnce(&mut CornerAssignmentGrid) -> R) -> R {
        let mut guard = self.inner.write();
        edit(&mut *guard)
    }
}

impl Default for CornerAssignmentGrid {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
