#![forbid(unsafe_code)]

//! Transient cell-claim bitmap for one relayout pass.

use crate::grid::{GridCell, GridDimensions};
use crate::request::MeasuredLayout;

/// A `[column][row]` boolean grid, `true` where some widget claims the cell.
///
/// Stored column-major so the free-slot scan walks memory in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OccupancyGrid {
    columns: u16,
    rows: u16,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// An empty (all-free) grid sized to the given dimensions.
    #[must_use]
    pub fn new(dims: &GridDimensions) -> Self {
        Self {
            columns: dims.columns,
            rows: dims.rows,
            cells: vec![false; dims.cell_count()],
        }
    }

    pub const fn columns(&self) -> u16 {
        self.columns
    }

    pub const fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let rows = usize::from(self.rows);
        (x < usize::from(self.columns) && y < rows).then_some(x * rows + y)
    }

    /// Whether the cell is claimed. Cells outside the grid read as free.
    #[must_use]
    pub fn is_occupied(&self, cell: GridCell) -> bool {
        self.index(cell.x, cell.y)
            .is_some_and(|idx| self.cells[idx])
    }

    /// Number of claimed cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|claimed| **claimed).count()
    }

    /// First free cell scanning column-major: every row of column 0, then
    /// column 1, and so on.
    #[must_use]
    pub fn first_free(&self) -> Option<GridCell> {
        let rows = usize::from(self.rows);
        if rows == 0 {
            return None;
        }
        self.cells.iter().position(|claimed| !claimed).map(|idx| {
            GridCell::new((idx / rows) as i32, (idx % rows) as i32)
        })
    }

    /// Claim every cell of `[x, x+w) × [y, y+h)`, clipped to the grid.
    pub fn mark(&mut self, footprint: MeasuredLayout) {
        let x_start = footprint.x.max(0);
        let x_end = footprint.right().min(i32::from(self.columns));
        let y_start = footprint.y.max(0);
        let y_end = footprint.bottom().min(i32::from(self.rows));
        for x in x_start..x_end {
            for y in y_start..y_end {
                if let Some(idx) = self.index(x, y) {
                    self.cells[idx] = true;
                }
            }
        }
    }
}
