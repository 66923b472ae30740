#![forbid(unsafe_code)]

//! Pixel-to-cell conversion used while dragging.

use tabgrid_core::geometry::PixelPoint;

use crate::grid::{GridCell, GridDimensions};
use crate::request::MeasuredLayout;

/// Snap a tentative top-left pixel position to the nearest grid cell.
///
/// Each axis rounds half up independently
/// (`floor(px / px_per_cell + 0.5)`) and is clamped to the last valid
/// column / row. Returns `None` for a degenerate grid.
#[must_use]
pub fn snap_to_cell(tentative: PixelPoint, dims: &GridDimensions) -> Option<GridCell> {
    if dims.is_degenerate() {
        return None;
    }
    let col = snap_axis(tentative.x, dims.px_per_column(), dims.columns);
    let row = snap_axis(tentative.y, dims.px_per_row(), dims.rows);
    Some(GridCell::new(col, row))
}

fn snap_axis(px: f64, px_per_cell: f64, count: u16) -> i32 {
    let last = f64::from(count.saturating_sub(1));
    let raw = (px / px_per_cell + 0.5).floor();
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, last) as i32
}

/// Anchor a span at `cell`, shrinking it so it never extends past the grid.
#[must_use]
pub fn clip_to_grid(cell: GridCell, w: i32, h: i32, dims: &GridDimensions) -> MeasuredLayout {
    let max_w = (i32::from(dims.columns) - cell.x).max(0);
    let max_h = (i32::from(dims.rows) - cell.y).max(0);
    MeasuredLayout::new(cell.x, cell.y, w.clamp(0, max_w), h.clamp(0, max_h))
}
