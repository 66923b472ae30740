#![forbid(unsafe_code)]

//! tabgrid public facade crate.
//!
//! Re-exports the types a host needs to drive a widget grid: the engine and
//! its configuration, the widget trait and registry, grid geometry, and
//! pointer events. Most hosts only need the prelude.
//!
//! ```
//! use tabgrid::prelude::*;
//!
//! let mut engine = Engine::with_defaults(EngineConfig::default());
//! engine.probe(GridDimensions::new(1200.0, 800.0, 12, 8));
//! let id = engine
//!     .create("sample", Extra::Null, AbstractLayout::auto(2, 2))
//!     .unwrap();
//! assert_eq!(engine.measured(id), Some(MeasuredLayout::new(0, 0, 2, 2)));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use tabgrid_core::event::{PointerButton, PointerEvent, PointerEventKind};
pub use tabgrid_core::geometry::{PixelPoint, PixelRect};

// --- Layout re-exports -----------------------------------------------------

pub use tabgrid_layout::{
    AbstractLayout, GridCell, GridDimensions, LayoutPatch, LayoutStateRecord, MeasuredLayout,
    PlacementSolver, WidgetId,
};

// --- Widget re-exports -----------------------------------------------------

pub use tabgrid_widgets::{
    Extra, KindRegistry, LifecycleState, Node, NodeKind, Preferences, Surface, TimerId, Widget,
    WidgetContext, WidgetError,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "state-persistence")]
pub use tabgrid_runtime::FileStorage;
pub use tabgrid_runtime::{
    DragCancelReason, DragOutcome, DragOverlay, DragRejection, Engine, EngineConfig, EngineError,
    GridChange, LayoutPersistence, MemoryStorage, Outline, Placement, PointerResponse,
    StorageBackend, StorageError, WidgetFrame,
};

/// Standard result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AbstractLayout, DragOutcome, Engine, EngineConfig, EngineError, Extra, GridDimensions,
        KindRegistry, LayoutPatch, LayoutPersistence, MeasuredLayout, PixelPoint, PixelRect,
        PointerButton, PointerEvent, PointerEventKind, PointerResponse, Result, Surface, Widget,
        WidgetContext, WidgetId,
    };

    pub use crate::{core, layout, runtime, widgets};
}

pub use tabgrid_core as core;
pub use tabgrid_layout as layout;
pub use tabgrid_runtime as runtime;
pub use tabgrid_widgets as widgets;
