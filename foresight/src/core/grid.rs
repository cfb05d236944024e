//! Square obstacle mask.

use anyhow::{Result, bail};

use crate::core::types::Cell;

/// Largest supported side length. Coordinates are `i32` and the mask holds
/// `size * size` cells.
pub const MAX_GRID_SIZE: usize = 1024;

/// An N×N obstacle mask. Immutable once the world is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    blocked: Vec<bool>,
}

impl Grid {
    /// Grid with every cell free.
    pub fn open(size: usize) -> Result<Self> {
        if size == 0 {
            bail!("grid size must be > 0");
        }
        if size > MAX_GRID_SIZE {
            bail!("grid size {size} exceeds the maximum of {MAX_GRID_SIZE}");
        }
        Ok(Self {
            size,
            blocked: vec![false; size * size],
        })
    }

    /// Build from rows of `'#'` (blocked) and any other char (free).
    ///
    /// Rows are indexed by `y`, columns by `x`.
    pub fn from_rows(rows: &[&str]) -> Result<Self> {
        let size = rows.len();
        let mut grid = Self::open(size)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != size {
                bail!("row {} has {} columns, expected {}", y, row.chars().count(), size);
            }
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.blocked[y * size + x] = true;
                }
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        let n = self.size as i32;
        (0..n).contains(&cell.x) && (0..n).contains(&cell.y)
    }

    /// True if `cell` is in bounds and not an obstacle.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|idx| !self.blocked[idx])
    }

    /// Mark `cell` as an obstacle. Out-of-bounds cells are ignored.
    pub fn block(&mut self, cell: Cell) {
        if let Some(idx) = self.index(cell) {
            self.blocked[idx] = true;
        }
    }

    /// Row-major index of an in-bounds cell.
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(cell.y as usize * self.size + cell.x as usize)
    }

    /// Free neighbours of `cell` in the fixed 4-connected order.
    pub fn free_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors_4()
            .into_iter()
            .filter(move |next| self.is_free(*next))
    }

    /// Number of cells that are not obstacles.
    pub fn free_count(&self) -> usize {
        self.blocked.iter().filter(|blocked| !**blocked).count()
    }
}
