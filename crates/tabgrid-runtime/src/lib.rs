#![forbid(unsafe_code)]

//! Runtime for the tabgrid widget engine.
//!
//! [`Engine`] is the widget registry: it attaches widgets, measures them into
//! the grid, drives their lifecycle and timers, routes pointer drags, counts
//! updates for diagnostics, and hands the ordered layout to a
//! [`LayoutPersistence`] whenever the structure changes.
//!
//! # Feature Gates
//!
//! - `state-persistence` (default): enables [`FileStorage`].

pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod frame;
pub mod render_stats;
pub mod state_persistence;

pub use config::EngineConfig;
pub use drag::{DragCancelReason, DragController, DragOutcome, DragRejection, DragSession, DragState};
pub use engine::Engine;
pub use error::EngineError;
pub use frame::{DragOverlay, GridChange, Placement, PointerResponse, WidgetFrame};
pub use render_stats::{Outline, RenderStatsCollector};
#[cfg(feature = "state-persistence")]
pub use state_persistence::FileStorage;
pub use state_persistence::{
    LayoutPersistence, MemoryStorage, StorageBackend, StorageError, StorageResult, default_layout,
};
