#![forbid(unsafe_code)]

//! Live grid metrics reported by the host.

use serde::{Deserialize, Serialize};
use tabgrid_core::geometry::{PixelPoint, PixelRect};

use crate::request::MeasuredLayout;

/// Pixel size and column/row counts of the host grid.
///
/// Replaced wholesale whenever the host probes its viewport; never patched
/// field by field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Grid container width in pixels.
    pub width: f64,
    /// Grid container height in pixels.
    pub height: f64,
    pub columns: u16,
    pub rows: u16,
}

impl GridDimensions {
    /// Create new grid metrics.
    #[must_use]
    pub const fn new(width: f64, height: f64, columns: u16, rows: u16) -> Self {
        Self {
            width,
            height,
            columns,
            rows,
        }
    }

    /// True when the grid has no cells or no pixel area.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.columns == 0 || self.rows == 0 || self.width <= 0.0 || self.height <= 0.0
    }

    /// Width of one column in pixels (zero for a degenerate grid).
    #[inline]
    pub fn px_per_column(&self) -> f64 {
        if self.columns == 0 {
            0.0
        } else {
            self.width / f64::from(self.columns)
        }
    }

    /// Height of one row in pixels (zero for a degenerate grid).
    #[inline]
    pub fn px_per_row(&self) -> f64 {
        if self.rows == 0 {
            0.0
        } else {
            self.height / f64::from(self.rows)
        }
    }

    /// Number of cells in the grid.
    #[inline]
    pub fn cell_count(&self) -> usize {
        usize::from(self.columns) * usize::from(self.rows)
    }

    /// Pixel position of the top-left corner of a cell.
    #[must_use]
    pub fn cell_origin(&self, cell: GridCell) -> PixelPoint {
        PixelPoint::new(
            f64::from(cell.x) * self.px_per_column(),
            f64::from(cell.y) * self.px_per_row(),
        )
    }

    /// Pixel rectangle covered by a measured layout.
    #[must_use]
    pub fn pixel_rect(&self, layout: MeasuredLayout) -> PixelRect {
        let origin = self.cell_origin(GridCell::new(layout.x, layout.y));
        PixelRect::new(
            origin.x,
            origin.y,
            f64::from(layout.w.max(0)) * self.px_per_column(),
            f64::from(layout.h.max(0)) * self.px_per_row(),
        )
    }

    /// Every cell of the grid in column-major order.
    ///
    /// Hosts use this to draw the sample backdrop shown while dragging.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + use<> {
        let rows = i32::from(self.rows);
        (0..i32::from(self.columns))
            .flat_map(move |x| (0..rows).map(move |y| GridCell::new(x, y)))
    }
}

/// Integer grid coordinates of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridCell {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridCell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_per_cell_divides_evenly() {
        let dims = GridDimensions::new(600.0, 400.0, 6, 4);
        assert_eq!(dims.px_per_column(), 100.0);
        assert_eq!(dims.px_per_row(), 100.0);
        assert_eq!(dims.cell_count(), 24);
        assert!(!dims.is_degenerate());
    }

    #[test]
    fn degenerate_grid_has_zero_cell_size() {
        let dims = GridDimensions::default();
        assert!(dims.is_degenerate());
        assert_eq!(dims.px_per_column(), 0.0);
        assert_eq!(dims.px_per_row(), 0.0);
        assert_eq!(dims.cells().count(), 0);
    }

    #[test]
    fn cells_are_column_major() {
        let dims = GridDimensions::new(20.0, 30.0, 2, 3);
        let cells: Vec<_> = dims.cells().collect();
        assert_eq!(cells[0], GridCell::new(0, 0));
        assert_eq!(cells[1], GridCell::new(0, 1));
        assert_eq!(cells[3], GridCell::new(1, 0));
        assert_eq!(cells.len(), 6);
    }

    #[test]
    fn pixel_rect_scales_span() {
        let dims = GridDimensions::new(600.0, 400.0, 6, 4);
        let rect = dims.pixel_rect(MeasuredLayout::new(2, 1, 3, 2));
        assert_eq!(rect, PixelRect::new(200.0, 100.0, 300.0, 200.0));
    }
}
