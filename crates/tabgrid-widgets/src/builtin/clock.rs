#![forbid(unsafe_code)]

//! Wall clock: `HH:MM` above `Weekday, Mon D`.

use std::time::Duration;

use chrono::{Local, NaiveDateTime};

use super::centered_column;
use crate::context::WidgetContext;
use crate::surface::{NodeKind, Surface};
use crate::timer::TimerId;
use crate::widget::{Extra, Widget};

/// How often the clock asks to be redrawn.
pub const TICK: Duration = Duration::from_secs(1);

pub struct ClockWidget {
    source: fn() -> NaiveDateTime,
    timer: Option<TimerId>,
}

impl Default for ClockWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockWidget {
    /// A clock reading local time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(|| Local::now().naive_local())
    }

    /// A clock reading time from `source`.
    #[must_use]
    pub fn with_source(source: fn() -> NaiveDateTime) -> Self {
        Self {
            source,
            timer: None,
        }
    }

    pub const fn timer(&self) -> Option<TimerId> {
        self.timer
    }
}

pub fn format_time(at: &NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}

pub fn format_date(at: &NaiveDateTime) -> String {
    at.format("%A, %b %-d").to_string()
}

impl Widget for ClockWidget {
    fn prepare_layout(&mut self, surface: &mut Surface, _: &Extra, cx: &mut WidgetContext<'_>) {
        centered_column(surface);
        surface.append("time", NodeKind::Text);
        surface.set_attr("time", "font-size", "20vh");
        surface.set_attr("time", "font-weight", "100");
        surface.append("date", NodeKind::Text);
        surface.set_attr("date", "font-size", "4vh");
        surface.set_attr("date", "font-weight", "200");
        self.timer = Some(cx.set_interval(TICK));
    }

    fn update(&mut self, surface: &mut Surface, _: &Extra, _: &mut WidgetContext<'_>) {
        let now = (self.source)();
        surface.set_text("time", format_time(&now));
        surface.set_text("date", format_date(&now));
    }

    fn unload(&mut self, cx: &mut WidgetContext<'_>) {
        if let Some(timer) = self.timer.take() {
            cx.clear_timer(timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::Preferences;
    use crate::timer::TimerQueue;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::time::Instant;
    use tabgrid_layout::WidgetId;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(9, 7, 42))
            .unwrap()
    }

    #[test]
    fn formats_zero_padded_time_and_long_date() {
        assert_eq!(format_time(&fixed()), "09:07");
        assert_eq!(format_date(&fixed()), "Tuesday, Mar 5");
    }

    #[test]
    fn lifecycle_owns_exactly_one_interval() {
        let id = WidgetId::new(0);
        let mut timers = TimerQueue::new();
        let mut requests = Vec::new();
        let prefs = Preferences::new();
        let mut surface = Surface::new();
        let mut clock = ClockWidget::with_source(fixed);
        let extra = json!({});

        let mut cx = WidgetContext::new(id, Instant::now(), &mut timers, &mut requests, &prefs);
        clock.prepare_layout(&mut surface, &extra, &mut cx);
        clock.update(&mut surface, &extra, &mut cx);
        clock.unload(&mut cx);
        drop(cx);

        assert_eq!(surface.node("time").map(|n| n.text()), Some("09:07"));
        assert_eq!(timers.pending_for(id), 0);
        assert_eq!(clock.timer(), None);
    }
}
