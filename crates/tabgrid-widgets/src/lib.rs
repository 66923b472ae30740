#![forbid(unsafe_code)]

//! Widget lifecycle contract and built-in widget kinds.
//!
//! A widget is anything implementing [`Widget`]: it draws into a retained
//! [`Surface`] during `prepare_layout` / `update`, asks the engine for work
//! through its [`WidgetContext`], and tears its timers down in `unload`.
//! The [`KindRegistry`] maps persisted kind names to constructors.

pub mod builtin;
pub mod context;
pub mod kind;
pub mod preferences;
pub mod surface;
pub mod timer;
pub mod widget;

pub use context::{WidgetContext, WidgetRequest};
pub use kind::{BoxError, KindRegistry, WidgetError, WidgetFactory, catch_widget_panic};
pub use preferences::Preferences;
pub use surface::{Node, NodeKind, Surface};
pub use timer::{TimerId, TimerQueue};
pub use widget::{Extra, LifecyclePhase, LifecycleState, Widget};

pub use tabgrid_layout::{LayoutPatch, WidgetId};
