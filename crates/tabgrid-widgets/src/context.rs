#![forbid(unsafe_code)]

//! Per-call handle a widget uses to talk back to the engine.
//!
//! Requests are only recorded here. The engine applies them after the
//! current callback returns, in the order they were made.

use std::time::{Duration, Instant};

use tabgrid_layout::{LayoutPatch, WidgetId};

use crate::preferences::Preferences;
use crate::timer::{TimerId, TimerQueue};

/// Work a widget asked the engine to do.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetRequest {
    Invalidate(WidgetId),
    ChangeLayout(WidgetId, LayoutPatch),
}

impl WidgetRequest {
    pub const fn widget(&self) -> WidgetId {
        match self {
            Self::Invalidate(id) | Self::ChangeLayout(id, _) => *id,
        }
    }
}

/// Scoped access to timers, preferences, and deferred engine requests.
pub struct WidgetContext<'a> {
    id: WidgetId,
    now: Instant,
    timers: &'a mut TimerQueue,
    requests: &'a mut Vec<WidgetRequest>,
    preferences: &'a Preferences,
}

impl<'a> WidgetContext<'a> {
    pub fn new(
        id: WidgetId,
        now: Instant,
        timers: &'a mut TimerQueue,
        requests: &'a mut Vec<WidgetRequest>,
        preferences: &'a Preferences,
    ) -> Self {
        Self {
            id,
            now,
            timers,
            requests,
            preferences,
        }
    }

    /// Id of the widget this context belongs to.
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Engine time of the current callback.
    pub const fn now(&self) -> Instant {
        self.now
    }

    pub fn preferences(&self) -> &Preferences {
        self.preferences
    }

    /// Ask for `update` to run again.
    pub fn invalidate(&mut self) {
        self.requests.push(WidgetRequest::Invalidate(self.id));
    }

    /// Merge `patch` into this widget's layout request and relayout.
    pub fn change_layout(&mut self, patch: LayoutPatch) {
        self.requests.push(WidgetRequest::ChangeLayout(self.id, patch));
    }

    pub fn set_interval(&mut self, period: Duration) -> TimerId {
        self.timers.schedule_interval(self.id, self.now, period)
    }

    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.timers.schedule_timeout(self.id, self.now, delay)
    }

    pub fn clear_timer(&mut self, timer: TimerId) -> bool {
        self.timers.cancel(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_are_recorded_in_order() {
        let mut timers = TimerQueue::new();
        let mut requests = Vec::new();
        let prefs = Preferences::new();
        let id = WidgetId::new(3);
        {
            let mut cx = WidgetContext::new(id, Instant::now(), &mut timers, &mut requests, &prefs);
            cx.change_layout(LayoutPatch::size(2, 2));
            cx.invalidate();
        }
        assert_eq!(
            requests,
            vec![
                WidgetRequest::ChangeLayout(id, LayoutPatch::size(2, 2)),
                WidgetRequest::Invalidate(id),
            ]
        );
    }

    #[test]
    fn timers_are_owned_by_context_widget() {
        let mut timers = TimerQueue::new();
        let mut requests = Vec::new();
        let prefs = Preferences::new();
        let id = WidgetId::new(7);
        let timer = {
            let mut cx = WidgetContext::new(id, Instant::now(), &mut timers, &mut requests, &prefs);
            cx.set_interval(Duration::from_secs(1))
        };
        assert_eq!(timers.pending_for(id), 1);
        assert!(timers.cancel(timer));
    }
}
