#![forbid(unsafe_code)]

//! Update-rate counter and debug-hover highlight pulses.
//!
//! Every widget update is counted in a rolling window; the count of the last
//! complete window is shown as "updates/sec". While debug hover is on, each
//! update also arms a short per-widget pulse. A new update before the pulse
//! expires re-arms it, so a widget's outline flickers at its update rate.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tabgrid_layout::{GridDimensions, WidgetId};

/// Outline state of a widget's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outline {
    #[default]
    None,
    /// Debug hover is on and the widget is quiet.
    DebugIdle,
    /// Debug hover is on and the widget updated within the pulse duration.
    Pulse,
    /// The widget is following the pointer.
    Dragging,
}

#[derive(Debug, Clone)]
pub struct RenderStatsCollector {
    window: Duration,
    pulse_duration: Duration,
    window_start: Instant,
    counter: u64,
    snapshot: u64,
    hover: bool,
    pulses: BTreeMap<WidgetId, Instant>,
}

impl RenderStatsCollector {
    #[must_use]
    pub fn new(window: Duration, pulse_duration: Duration, now: Instant) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            pulse_duration,
            window_start: now,
            counter: 0,
            snapshot: 0,
            hover: false,
            pulses: BTreeMap::new(),
        }
    }

    /// Count one widget update.
    pub fn record_update(&mut self, widget: WidgetId, now: Instant) {
        self.roll(now);
        self.counter += 1;
        if self.hover {
            self.pulses.insert(widget, now + self.pulse_duration);
        }
    }

    /// Roll the window and expire pulses.
    pub fn advance(&mut self, now: Instant) {
        self.roll(now);
        self.pulses.retain(|_, deadline| *deadline > now);
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return;
        }
        // A gap longer than two windows means the last full window was idle.
        self.snapshot = if elapsed >= self.window * 2 { 0 } else { self.counter };
        self.counter = 0;
        self.window_start = now;
    }

    /// Updates counted in the last complete window.
    pub const fn updates_per_second(&self) -> u64 {
        self.snapshot
    }

    pub const fn hover(&self) -> bool {
        self.hover
    }

    /// Enter or leave debug hover. Leaving drops every pending pulse.
    pub fn set_hover(&mut self, on: bool) {
        if self.hover == on {
            return;
        }
        self.hover = on;
        if !on {
            self.pulses.clear();
        }
        tracing::info!(target: "tabgrid.stats", hover = on, "debug hover toggled");
    }

    pub fn outline(&self, widget: WidgetId) -> Outline {
        if !self.hover {
            Outline::None
        } else if self.pulses.contains_key(&widget) {
            Outline::Pulse
        } else {
            Outline::DebugIdle
        }
    }

    pub fn forget(&mut self, widget: WidgetId) {
        self.pulses.remove(&widget);
    }

    /// The diagnostics line shown when debugging is enabled.
    pub fn summary(&self, dims: &GridDimensions, widgets: usize) -> String {
        format!(
            "debugging enabled, layout size: [{} × {}] ({} × {}), widgets attached: {}, updates/sec: {}",
            dims.width, dims.height, dims.columns, dims.rows, widgets, self.snapshot
        )
    }
}
