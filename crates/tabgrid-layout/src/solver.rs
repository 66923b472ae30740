#![forbid(unsafe_code)]

//! Abstract-to-concrete placement.
//!
//! # Invariants
//!
//! 1. A relayout pass starts from an all-free [`OccupancyGrid`].
//! 2. Requests are resolved in attachment order, each exactly once, so a
//!    request only ever sees the footprints of the requests before it.
//! 3. A request with both coordinates is placed verbatim, without clamping.
//! 4. Occupancy marking clips to the grid; the measured footprint itself is
//!    never clipped.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Fallback |
//! |---------|-------|----------|
//! | No free cell | Grid fully claimed or zero-sized | Place at `(0, 0)`, overlapping |
//! | Free cell too small | Scan ignores the requested span | Footprint overlaps neighbours |

use crate::grid::{GridCell, GridDimensions};
use crate::occupancy::OccupancyGrid;
use crate::request::{AbstractLayout, MeasuredLayout};

/// Resolves abstract requests against the live grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlacementSolver {
    dims: GridDimensions,
}

impl PlacementSolver {
    #[must_use]
    pub const fn new(dims: GridDimensions) -> Self {
        Self { dims }
    }

    pub const fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    /// An all-free occupancy grid for a new pass.
    #[must_use]
    pub fn fresh_occupancy(&self) -> OccupancyGrid {
        OccupancyGrid::new(&self.dims)
    }

    /// Resolve one request and claim its footprint in `occupancy`.
    pub fn resolve(&self, request: &AbstractLayout, occupancy: &mut OccupancyGrid) -> MeasuredLayout {
        let origin = match (request.p_x, request.p_y) {
            (Some(x), Some(y)) => GridCell::new(x, y),
            _ => occupancy.first_free().unwrap_or_else(|| {
                tracing::debug!(
                    target: "tabgrid.solver",
                    columns = self.dims.columns,
                    rows = self.dims.rows,
                    "no free cell, placing at origin"
                );
                GridCell::default()
            }),
        };

        let w = if request.is_relative_width() {
            relative_span(self.dims.columns, request.r_w, origin.x)
        } else {
            request.w
        };
        let h = if request.is_relative_height() {
            relative_span(self.dims.rows, request.r_h, origin.y)
        } else {
            request.h
        };

        let measured = MeasuredLayout::new(origin.x, origin.y, w, h);
        occupancy.mark(measured);
        measured
    }

    /// Run a full relayout pass over `requests` in order.
    pub fn measure_all<'a, I>(&self, requests: I) -> Vec<MeasuredLayout>
    where
        I: IntoIterator<Item = &'a AbstractLayout>,
    {
        let mut occupancy = self.fresh_occupancy();
        requests
            .into_iter()
            .map(|request| self.resolve(request, &mut occupancy))
            .collect()
    }
}

/// `count + offset + origin + 1`, saturating: offsets come from persisted
/// records and may be anything.
fn relative_span(count: u16, offset: i32, origin: i32) -> i32 {
    i32::from(count)
        .saturating_add(offset)
        .saturating_add(origin)
        .saturating_add(1)
}
