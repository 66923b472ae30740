#![forbid(unsafe_code)]

//! What a host needs to paint each widget and the drag overlay.

use tabgrid_core::geometry::PixelRect;
use tabgrid_layout::{GridCell, GridDimensions, MeasuredLayout, WidgetId};
use tabgrid_widgets::Surface;

use crate::drag::{DragCancelReason, DragOutcome};
use crate::render_stats::Outline;

/// Where a widget's container goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// In the grid at its measured layout.
    Grid(MeasuredLayout),
    /// Absolutely positioned, following the pointer.
    Floating(PixelRect),
}

/// One attached widget, ready to paint.
#[derive(Debug, Clone, Copy)]
pub struct WidgetFrame<'a> {
    pub id: WidgetId,
    pub kind: &'a str,
    pub placement: Placement,
    pub outline: Outline,
    pub surface: &'a Surface,
}

/// Transient drag decorations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragOverlay {
    pub widget: WidgetId,
    /// Candidate span in cells, clipped to the grid. `None` before the first move.
    pub ghost: Option<MeasuredLayout>,
    pub floating: PixelRect,
    pub delete_zone: Option<PixelRect>,
}

/// Grid metrics before and after a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridChange {
    pub old: GridDimensions,
    pub new: GridDimensions,
}

impl GridChange {
    /// Whether the column or row count changed, not just the pixel size.
    pub fn cells_changed(&self) -> bool {
        self.old.columns != self.new.columns || self.old.rows != self.new.rows
    }
}

/// Result of feeding one pointer event to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerResponse {
    /// A press outside every widget.
    Ignored,
    Started(WidgetId),
    Moved(Option<GridCell>),
    Finished(DragOutcome),
}

impl PointerResponse {
    /// The session ended by cancellation for `reason`.
    pub fn is_cancelled(&self, reason: DragCancelReason) -> bool {
        matches!(
            self,
            Self::Finished(DragOutcome::Cancelled { reason: r, .. }) if *r == reason
        )
    }
}
