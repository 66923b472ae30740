#![forbid(unsafe_code)]

//! Grid layout primitives and the placement solver.
//!
//! A widget asks for a place on the grid with an [`AbstractLayout`]; the
//! [`PlacementSolver`] turns every request into a [`MeasuredLayout`] during
//! one relayout pass, marking claimed cells in an [`OccupancyGrid`] that is
//! rebuilt from nothing each pass.

pub mod grid;
pub mod occupancy;
pub mod record;
pub mod request;
pub mod snap;
pub mod solver;

pub use grid::{GridCell, GridDimensions};
pub use occupancy::OccupancyGrid;
pub use record::{LayoutStateRecord, WidgetId};
pub use request::{AbstractLayout, LayoutPatch, MeasuredLayout};
pub use snap::{clip_to_grid, snap_to_cell};
pub use solver::PlacementSolver;

pub use tabgrid_core::geometry::{PixelPoint, PixelRect};
