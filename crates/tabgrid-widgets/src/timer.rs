#![forbid(unsafe_code)]

//! Host-driven timer queue.
//!
//! Nothing here reads the wall clock. The engine passes `now` in and drains
//! due timers with [`TimerQueue::pop_due`].

use std::fmt;
use std::time::{Duration, Instant};

use tabgrid_layout::WidgetId;

/// Smallest period an interval timer may have.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle returned when a timer is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct TimerEntry {
    id: TimerId,
    owner: WidgetId,
    due: Instant,
    period: Option<Duration>,
}

/// Pending timers for every widget, keyed by owner.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_id: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire once at `now + delay`.
    pub fn schedule_timeout(&mut self, owner: WidgetId, now: Instant, delay: Duration) -> TimerId {
        self.push(owner, now + delay, None)
    }

    /// Fire every `period`, starting at `now + period`.
    pub fn schedule_interval(&mut self, owner: WidgetId, now: Instant, period: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(owner, now + period, Some(period))
    }

    fn push(&mut self, owner: WidgetId, due: Instant, period: Option<Duration>) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(TimerEntry {
            id,
            owner,
            due,
            period,
        });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Remove every timer `owner` still holds, returning how many there were.
    pub fn cancel_owner(&mut self, owner: WidgetId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        before - self.entries.len()
    }

    pub fn pending_for(&self, owner: WidgetId) -> usize {
        self.entries.iter().filter(|e| e.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest deadline still pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// Intervals are rescheduled. An interval that fell behind fires once and
    /// resumes a full period after `now`, so a single drain never loops on it.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, WidgetId)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(idx, _)| idx)?;

        let entry = &mut self.entries[idx];
        let fired = (entry.id, entry.owner);
        match entry.period {
            Some(period) => {
                let mut next = entry.due + period;
                if next <= now {
                    next = now + period;
                }
                entry.due = next;
            }
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: u32) -> WidgetId {
        WidgetId::new(n)
    }

    #[test]
    fn timeout_fires_once() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let id = q.schedule_timeout(w(0), t0, Duration::from_millis(10));
        assert_eq!(q.pop_due(t0), None);
        assert_eq!(q.pop_due(t0 + Duration::from_millis(10)), Some((id, w(0))));
        assert_eq!(q.pop_due(t0 + Duration::from_secs(5)), None);
        assert!(q.is_empty());
    }

    #[test]
    fn interval_reschedules_and_coalesces_missed_ticks() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let id = q.schedule_interval(w(1), t0, Duration::from_secs(1));
        let late = t0 + Duration::from_millis(3500);
        assert_eq!(q.pop_due(late), Some((id, w(1))));
        assert_eq!(q.pop_due(late), None);
        assert_eq!(q.next_deadline(), Some(late + Duration::from_secs(1)));
    }

    #[test]
    fn earliest_due_fires_first() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        let slow = q.schedule_timeout(w(0), t0, Duration::from_millis(20));
        let fast = q.schedule_timeout(w(1), t0, Duration::from_millis(5));
        let now = t0 + Duration::from_millis(30);
        assert_eq!(q.pop_due(now).map(|(id, _)| id), Some(fast));
        assert_eq!(q.pop_due(now).map(|(id, _)| id), Some(slow));
    }

    #[test]
    fn cancel_owner_drops_only_that_widget() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        q.schedule_interval(w(0), t0, Duration::from_secs(1));
        q.schedule_timeout(w(0), t0, Duration::from_secs(1));
        q.schedule_timeout(w(2), t0, Duration::from_secs(1));
        assert_eq!(q.cancel_owner(w(0)), 2);
        assert_eq!(q.pending_for(w(2)), 1);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn zero_period_is_clamped() {
        let t0 = Instant::now();
        let mut q = TimerQueue::new();
        q.schedule_interval(w(0), t0, Duration::ZERO);
        assert_eq!(q.next_deadline(), Some(t0 + MIN_PERIOD));
    }
}
