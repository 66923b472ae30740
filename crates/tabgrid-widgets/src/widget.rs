#![forbid(unsafe_code)]

//! The widget capability trait.

use std::fmt;

use crate::context::WidgetContext;
use crate::surface::Surface;
use crate::timer::TimerId;

/// Opaque per-widget data bag, persisted alongside the layout.
pub type Extra = serde_json::Value;

/// Contract every widget implementation honours.
///
/// The engine guarantees:
///
/// 1. `prepare_layout` runs once right after construction and again after
///    every reset, always preceded by `unload` when it is not the first call.
/// 2. `update` runs once after every `prepare_layout` and again on every
///    invalidation. It must be cheap and safe to repeat.
/// 3. `unload` runs before every reset and before detachment. It must cancel
///    every timer the widget owns, because the engine never does.
pub trait Widget {
    /// Build the widget's presentation inside `surface` and start its timers.
    fn prepare_layout(&mut self, surface: &mut Surface, extra: &Extra, cx: &mut WidgetContext<'_>);

    /// Refresh the presentation built by `prepare_layout`.
    fn update(&mut self, surface: &mut Surface, extra: &Extra, cx: &mut WidgetContext<'_>);

    /// Cancel pending timers. The surface is cleared by the engine afterwards.
    fn unload(&mut self, cx: &mut WidgetContext<'_>) {
        let _ = cx;
    }

    /// A timer owned by this widget fired. Defaults to requesting an update.
    fn on_timer(&mut self, timer: TimerId, cx: &mut WidgetContext<'_>) {
        let _ = timer;
        cx.invalidate();
    }
}

/// Where a widget sits in its lifecycle.
///
/// `Attaching → Attached ⇄ Invalidating`, `Attached → Resetting → Attached`,
/// and finally `Detached`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Attaching,
    Attached,
    Invalidating,
    Resetting,
    Detached,
}

impl LifecycleState {
    /// Whether the widget currently belongs to the layout.
    pub const fn is_attached(self) -> bool {
        !matches!(self, Self::Detached)
    }
}

/// Which widget callback was running, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    Construct,
    PrepareLayout,
    Update,
    Unload,
    Timer,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Construct => "construct",
            Self::PrepareLayout => "prepare_layout",
            Self::Update => "update",
            Self::Unload => "unload",
            Self::Timer => "on_timer",
        };
        f.write_str(name)
    }
}
