#![forbid(unsafe_code)]

//! The widget registry and lifecycle driver.
//!
//! [`Engine`] owns the ordered widget collection, the grid metrics, the
//! timer queue, the drag slot, and the persistence collaborator. Every
//! structural change runs a full relayout pass:
//!
//! 1. A fresh [`OccupancyGrid`](tabgrid_layout::OccupancyGrid) is built.
//! 2. Each widget is measured in attachment order against it.
//!
//! No pass reuses occupancy from an earlier one.
//!
//! Widget callbacks run inside a panic boundary. Requests a widget makes
//! through its context are queued and drained after the callback returns.

use std::time::Instant;

use tabgrid_core::event::{PointerEvent, PointerEventKind};
use tabgrid_core::geometry::{PixelPoint, PixelRect};
use tabgrid_layout::{
    AbstractLayout, GridDimensions, LayoutPatch, LayoutStateRecord, MeasuredLayout,
    PlacementSolver, WidgetId,
};
use tabgrid_widgets::{
    Extra, KindRegistry, LifecyclePhase, LifecycleState, Surface, TimerQueue, Widget,
    WidgetContext, WidgetError, WidgetRequest, catch_widget_panic,
};

use crate::config::EngineConfig;
use crate::drag::{DragCancelReason, DragController, DragOutcome, DragRejection};
use crate::error::EngineError;
use crate::frame::{DragOverlay, GridChange, Placement, PointerResponse, WidgetFrame};
use crate::render_stats::{Outline, RenderStatsCollector};
use crate::state_persistence::{LayoutPersistence, StorageError};

/// Upper bound on timer callbacks run by one [`Engine::advance`].
const MAX_TIMER_FIRES: usize = 1024;

struct WidgetEntry {
    id: WidgetId,
    kind: String,
    extra: Extra,
    layout: AbstractLayout,
    measured: MeasuredLayout,
    widget: Box<dyn Widget>,
    surface: Surface,
    state: LifecycleState,
}

impl WidgetEntry {
    fn record(&self) -> LayoutStateRecord {
        LayoutStateRecord::new(self.kind.clone(), self.id, self.extra.clone(), self.layout)
    }
}

/// Grid widget engine. One per page.
pub struct Engine {
    config: EngineConfig,
    kinds: KindRegistry,
    persistence: LayoutPersistence,
    grid: GridDimensions,
    entries: Vec<WidgetEntry>,
    timers: TimerQueue,
    requests: Vec<WidgetRequest>,
    drag: DragController,
    stats: RenderStatsCollector,
    delete_zone: Option<PixelRect>,
    now: Instant,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("grid", &self.grid)
            .field("widgets", &self.entries.len())
            .field("timers", &self.timers.len())
            .field("dragging", &self.drag.is_active())
            .field("persistence", &self.persistence)
            .finish()
    }
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig, kinds: KindRegistry, persistence: LayoutPersistence) -> Self {
        let now = Instant::now();
        Self {
            grid: config.initial_grid.unwrap_or_default(),
            drag: DragController::new(config.drag_button),
            stats: RenderStatsCollector::new(config.stats_window, config.pulse_duration, now),
            config,
            kinds,
            persistence,
            entries: Vec::new(),
            timers: TimerQueue::new(),
            requests: Vec::new(),
            delete_zone: None,
            now,
        }
    }

    /// Engine with built-in kinds and in-memory persistence.
    #[must_use]
    pub fn with_defaults(config: EngineConfig) -> Self {
        Self::new(config, KindRegistry::with_builtins(), LayoutPersistence::memory())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn kinds_mut(&mut self) -> &mut KindRegistry {
        &mut self.kinds
    }

    pub const fn grid(&self) -> GridDimensions {
        self.grid
    }

    pub const fn now(&self) -> Instant {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.index_of(id).is_some()
    }

    /// Attached widget ids in attachment order.
    pub fn widget_ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn measured(&self, id: WidgetId) -> Option<MeasuredLayout> {
        self.entry(id).map(|e| e.measured)
    }

    /// Measured layouts of every widget, in attachment order.
    pub fn measured_layouts(&self) -> Vec<(WidgetId, MeasuredLayout)> {
        self.entries.iter().map(|e| (e.id, e.measured)).collect()
    }

    pub fn abstract_layout(&self, id: WidgetId) -> Option<AbstractLayout> {
        self.entry(id).map(|e| e.layout)
    }

    pub fn extra(&self, id: WidgetId) -> Option<&Extra> {
        self.entry(id).map(|e| &e.extra)
    }

    pub fn surface(&self, id: WidgetId) -> Option<&Surface> {
        self.entry(id).map(|e| &e.surface)
    }

    /// Lifecycle state; `Detached` for ids that are not attached.
    pub fn lifecycle(&self, id: WidgetId) -> LifecycleState {
        self.entry(id).map_or(LifecycleState::Detached, |e| e.state)
    }

    /// Timers still pending for `id`, attached or not.
    pub fn pending_timers(&self, id: WidgetId) -> usize {
        self.timers.pending_for(id)
    }

    /// The persisted form of the current layout.
    pub fn records(&self) -> Vec<LayoutStateRecord> {
        self.entries.iter().map(WidgetEntry::record).collect()
    }

    fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn entry(&self, id: WidgetId) -> Option<&WidgetEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────────────────

    /// Construct, attach, lay out, and draw a widget, then save.
    pub fn create(
        &mut self,
        kind: &str,
        extra: Extra,
        layout: AbstractLayout,
    ) -> Result<WidgetId, EngineError> {
        let id = self.attach(kind, extra, layout)?;
        self.flush_requests();
        self.persist();
        Ok(id)
    }

    fn attach(
        &mut self,
        kind: &str,
        extra: Extra,
        layout: AbstractLayout,
    ) -> Result<WidgetId, EngineError> {
        let widget = match self.kinds.construct(kind, &extra) {
            Ok(widget) => widget,
            Err(e @ WidgetError::UnknownKind(_)) => {
                tracing::warn!(target: "tabgrid.engine", kind, "skipping widget of unknown kind");
                return Err(e.into());
            }
            Err(e) => {
                tracing::error!(target: "tabgrid.engine", kind, error = %e, "widget construction failed");
                return Err(e.into());
            }
        };

        let id = WidgetId::smallest_free(self.entries.iter().map(|e| e.id));
        self.entries.push(WidgetEntry {
            id,
            kind: kind.to_owned(),
            extra,
            layout,
            measured: MeasuredLayout::default(),
            widget,
            surface: Surface::new(),
            state: LifecycleState::Attaching,
        });
        self.relayout();

        let idx = self.entries.len() - 1;
        if let Err(e) = self.prepare_and_update(idx) {
            self.entries.remove(idx);
            self.timers.cancel_owner(id);
            self.requests.retain(|r| r.widget() != id);
            self.relayout();
            tracing::error!(target: "tabgrid.engine", kind, widget = %id, error = %e, "widget creation failed");
            return Err(e.into());
        }

        self.entries[idx].state = LifecycleState::Attached;
        tracing::info!(target: "tabgrid.engine", kind, widget = %id, "widget created");
        Ok(id)
    }

    /// Unload and remove a widget, then relayout and save.
    pub fn detach(&mut self, id: WidgetId) -> Result<(), EngineError> {
        let idx = self.index_of(id).ok_or(EngineError::NotAttached(id))?;
        if self.drag.session().is_some_and(|s| s.widget() == id) {
            self.drag.cancel(DragCancelReason::WidgetDetached);
        }

        self.unload_entry(idx);
        let entry = self.entries.remove(idx);
        self.requests.retain(|r| r.widget() != id);
        self.stats.forget(id);

        // Ids are reused, so a leaked timer would otherwise reach the next
        // widget handed this id.
        let leaked = self.timers.cancel_owner(id);
        if leaked > 0 {
            tracing::warn!(
                target: "tabgrid.engine",
                widget = %id,
                kind = %entry.kind,
                timers = leaked,
                "detached widget left timers pending, cancelled them"
            );
        }

        self.relayout();
        tracing::info!(target: "tabgrid.engine", widget = %id, kind = %entry.kind, "widget detached");
        self.flush_requests();
        self.persist();
        Ok(())
    }

    /// Reset every widget in order. Ids, extra data, and layouts are kept.
    pub fn rebuild_layout(&mut self) {
        for idx in 0..self.entries.len() {
            self.entries[idx].state = LifecycleState::Resetting;
            self.unload_entry(idx);
            if let Err(e) = self.prepare_and_update(idx) {
                tracing::error!(
                    target: "tabgrid.engine",
                    widget = %self.entries[idx].id,
                    error = %e,
                    "widget reset failed"
                );
            }
            self.entries[idx].state = LifecycleState::Attached;
        }
        self.flush_requests();
    }

    /// Invalidate every attached widget.
    pub fn update_all_widgets(&mut self) {
        for idx in 0..self.entries.len() {
            self.run_update(idx);
        }
        self.flush_requests();
    }

    /// Re-run a widget's `update`. Unattached ids only log a warning.
    pub fn invalidate(&mut self, id: WidgetId) {
        let Some(idx) = self.index_of(id) else {
            tracing::warn!(target: "tabgrid.engine", widget = %id, "invalidate on unattached widget");
            return;
        };
        self.run_update(idx);
        self.flush_requests();
    }

    /// Merge `patch` into a widget's abstract layout and relayout.
    pub fn change_layout(&mut self, id: WidgetId, patch: LayoutPatch) -> Result<(), EngineError> {
        let idx = self.index_of(id).ok_or(EngineError::NotAttached(id))?;
        self.entries[idx].layout.apply(&patch);
        self.relayout();
        Ok(())
    }

    /// Replace the grid metrics and relayout.
    pub fn probe(&mut self, dims: GridDimensions) -> GridChange {
        let change = GridChange {
            old: self.grid,
            new: dims,
        };
        self.grid = dims;
        self.relayout();
        tracing::debug!(
            target: "tabgrid.engine",
            width = dims.width,
            height = dims.height,
            columns = dims.columns,
            rows = dims.rows,
            "grid probed"
        );
        change
    }

    /// Replace the current widgets with the persisted layout, then save once.
    ///
    /// Returns how many records attached.
    pub fn restore(&mut self) -> usize {
        self.destroy();
        let records = self.persistence.load();
        let total = records.len();
        let mut attached = 0;
        for record in records {
            if self.attach(&record.kind, record.extra, record.layout).is_ok() {
                attached += 1;
            }
        }
        self.flush_requests();
        tracing::info!(target: "tabgrid.engine", attached, skipped = total - attached, "layout restored");
        self.persist();
        attached
    }

    /// Save the current layout, reporting failure.
    pub fn save(&self) -> Result<(), EngineError> {
        self.persistence.save(&self.records())?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(&self.records()) {
            tracing::warn!(
                target: "tabgrid.persist",
                backend = self.persistence.backend_name(),
                error = %e,
                "failed to save layout"
            );
        }
    }

    pub fn clear_storage(&self) -> Result<(), StorageError> {
        self.persistence.clear()
    }

    /// Unload every widget and empty the registry. Storage is untouched.
    pub fn destroy(&mut self) {
        self.drag.cancel(DragCancelReason::Programmatic);
        for idx in 0..self.entries.len() {
            self.unload_entry(idx);
        }
        self.entries.clear();
        self.requests.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Time
    // ─────────────────────────────────────────────────────────────────────

    /// Move engine time to `now`: fire due timers, roll stats, expire pulses.
    pub fn advance(&mut self, now: Instant) {
        self.now = self.now.max(now);
        let mut fired = 0;
        loop {
            if fired >= MAX_TIMER_FIRES {
                // Anything still due stays queued for the next advance.
                tracing::warn!(target: "tabgrid.engine", fired, "timer queue did not settle in one advance");
                break;
            }
            let Some((timer, owner)) = self.timers.pop_due(self.now) else {
                break;
            };
            fired += 1;
            let Some(idx) = self.index_of(owner) else {
                tracing::warn!(target: "tabgrid.engine", widget = %owner, %timer, "dropping timer of detached widget");
                self.timers.cancel(timer);
                continue;
            };
            if let Err(e) = self.call_widget(idx, LifecyclePhase::Timer, |w, _, _, cx| {
                w.on_timer(timer, cx);
            }) {
                tracing::error!(target: "tabgrid.engine", widget = %owner, error = %e, "widget timer failed");
            }
            self.flush_requests();
        }
        self.stats.advance(self.now);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle plumbing
    // ─────────────────────────────────────────────────────────────────────

    fn call_widget<R>(
        &mut self,
        idx: usize,
        phase: LifecyclePhase,
        f: impl FnOnce(&mut dyn Widget, &mut Surface, &Extra, &mut WidgetContext<'_>) -> R,
    ) -> Result<R, WidgetError> {
        let entry = &mut self.entries[idx];
        let mut cx = WidgetContext::new(
            entry.id,
            self.now,
            &mut self.timers,
            &mut self.requests,
            &self.config.preferences,
        );
        let WidgetEntry {
            kind,
            extra,
            widget,
            surface,
            ..
        } = entry;
        catch_widget_panic(kind.as_str(), phase, || {
            f(&mut **widget, surface, extra, &mut cx)
        })
    }

    fn prepare_and_update(&mut self, idx: usize) -> Result<(), WidgetError> {
        self.call_widget(idx, LifecyclePhase::PrepareLayout, |w, s, e, cx| {
            w.prepare_layout(s, e, cx);
        })?;
        self.call_widget(idx, LifecyclePhase::Update, |w, s, e, cx| w.update(s, e, cx))
    }

    /// The invalidation path. Only these updates count toward the stats.
    fn run_update(&mut self, idx: usize) {
        self.entries[idx].state = LifecycleState::Invalidating;
        let result = self.call_widget(idx, LifecyclePhase::Update, |w, s, e, cx| w.update(s, e, cx));
        let id = self.entries[idx].id;
        self.entries[idx].state = LifecycleState::Attached;
        match result {
            Ok(()) => self.stats.record_update(id, self.now),
            Err(e) => {
                tracing::error!(target: "tabgrid.engine", widget = %id, error = %e, "widget update failed");
            }
        }
    }

    fn unload_entry(&mut self, idx: usize) {
        if let Err(e) = self.call_widget(idx, LifecyclePhase::Unload, |w, _, _, cx| w.unload(cx)) {
            tracing::error!(
                target: "tabgrid.engine",
                widget = %self.entries[idx].id,
                error = %e,
                "widget unload failed"
            );
        }
        self.entries[idx].surface.clear();
    }

    /// Drain queued widget requests in FIFO order.
    fn flush_requests(&mut self) {
        let mut passes = 0;
        while !self.requests.is_empty() {
            if passes >= self.config.max_request_passes {
                tracing::warn!(
                    target: "tabgrid.engine",
                    passes,
                    dropped = self.requests.len(),
                    "widget requests did not settle, dropping the rest"
                );
                self.requests.clear();
                break;
            }
            passes += 1;
            for request in std::mem::take(&mut self.requests) {
                let Some(idx) = self.index_of(request.widget()) else {
                    tracing::debug!(target: "tabgrid.engine", widget = %request.widget(), "discarding request of detached widget");
                    continue;
                };
                match request {
                    WidgetRequest::Invalidate(_) => self.run_update(idx),
                    WidgetRequest::ChangeLayout(_, patch) => {
                        self.entries[idx].layout.apply(&patch);
                        self.relayout();
                    }
                }
            }
        }
    }

    fn relayout(&mut self) {
        let _span = tracing::debug_span!(
            target: "tabgrid.engine",
            "engine.relayout",
            widgets = self.entries.len(),
            columns = self.grid.columns,
            rows = self.grid.rows
        )
        .entered();
        let solver = PlacementSolver::new(self.grid);
        let mut occupancy = solver.fresh_occupancy();
        for entry in &mut self.entries {
            entry.measured = solver.resolve(&entry.layout, &mut occupancy);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Presentation
    // ─────────────────────────────────────────────────────────────────────

    /// Every attached widget in paint order.
    pub fn frames(&self) -> impl Iterator<Item = WidgetFrame<'_>> + '_ {
        let dragging = self.drag.session().copied();
        self.entries.iter().map(move |e| {
            let (placement, outline) = match dragging {
                Some(session) if session.widget() == e.id => {
                    (Placement::Floating(session.floating_rect()), Outline::Dragging)
                }
                _ => (Placement::Grid(e.measured), self.stats.outline(e.id)),
            };
            WidgetFrame {
                id: e.id,
                kind: &e.kind,
                placement,
                outline,
                surface: &e.surface,
            }
        })
    }

    pub fn frame(&self, id: WidgetId) -> Option<WidgetFrame<'_>> {
        self.frames().find(|f| f.id == id)
    }

    /// Topmost widget whose grid rectangle contains `point`.
    pub fn hit_test(&self, point: PixelPoint) -> Option<WidgetId> {
        self.entries
            .iter()
            .rev()
            .find(|e| self.grid.pixel_rect(e.measured).contains(point))
            .map(|e| e.id)
    }

    /// Outline every widget while the pointer rests on the diagnostics line.
    pub fn set_debug_hover(&mut self, on: bool) {
        self.stats.set_hover(on);
    }

    /// The diagnostics line, when debugging is enabled.
    pub fn debug_line(&self) -> Option<String> {
        self.config
            .debug_enabled
            .then(|| self.stats.summary(&self.grid, self.entries.len()))
    }

    pub const fn updates_per_second(&self) -> u64 {
        self.stats.updates_per_second()
    }

    /// Change a display preference and update every widget.
    pub fn set_preference(&mut self, key: &str, value: &str) {
        self.config.preferences.set(key, value);
        self.update_all_widgets();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drag
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_delete_zone(&mut self, zone: PixelRect) {
        self.delete_zone = Some(zone);
    }

    pub fn clear_delete_zone(&mut self) {
        self.delete_zone = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Start dragging `id` with the press `event`.
    pub fn begin_drag(&mut self, id: WidgetId, event: &PointerEvent) -> Result<(), DragRejection> {
        let Some(entry) = self.entry(id) else {
            return Err(if self.drag.is_active() {
                DragRejection::SessionActive
            } else {
                DragRejection::NotAttached
            });
        };
        let start = self.grid.pixel_rect(entry.measured);
        let span = (entry.measured.w, entry.measured.h);
        self.drag.begin(id, event, start, span)
    }

    /// Where a press starts dragging `id`: the configured handle square at
    /// the widget's top-left corner, or its whole grid rectangle.
    pub fn drag_handle_rect(&self, id: WidgetId) -> Option<PixelRect> {
        let rect = self.grid.pixel_rect(self.entry(id)?.measured);
        Some(match self.config.drag_handle_size {
            Some(size) => PixelRect::new(rect.x, rect.y, size.min(rect.width), size.min(rect.height)),
            None => rect,
        })
    }

    /// Route one host pointer event through the drag machine.
    ///
    /// A press starts a drag only inside the topmost widget's
    /// [drag handle](Self::drag_handle_rect); other presses are ignored.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Result<PointerResponse, DragRejection> {
        match event.kind {
            PointerEventKind::Down(_) => match self.hit_test(event.position) {
                Some(id)
                    if !self
                        .drag_handle_rect(id)
                        .is_some_and(|handle| handle.contains(event.position)) =>
                {
                    Ok(PointerResponse::Ignored)
                }
                Some(id) => self.begin_drag(id, event).map(|()| PointerResponse::Started(id)),
                None if self.drag.is_active() => Err(DragRejection::SessionActive),
                None => Ok(PointerResponse::Ignored),
            },
            PointerEventKind::Move => self
                .drag
                .pointer_move(event, &self.grid)
                .map(PointerResponse::Moved),
            PointerEventKind::Up(_) => {
                let outcome = self.drag.release(event, &self.grid, self.delete_zone)?;
                self.finish_drag(outcome);
                Ok(PointerResponse::Finished(outcome))
            }
            PointerEventKind::Cancel => self
                .drag
                .cancel(DragCancelReason::PointerCancel)
                .map(PointerResponse::Finished)
                .ok_or(DragRejection::NoSession),
        }
    }

    /// Abort the open drag (blur, escape). The widget returns to its cell.
    pub fn cancel_drag(&mut self, reason: DragCancelReason) -> Option<DragOutcome> {
        self.drag.cancel(reason)
    }

    pub fn drag_overlay(&self) -> Option<DragOverlay> {
        self.drag.session().map(|session| DragOverlay {
            widget: session.widget(),
            ghost: session.ghost(&self.grid),
            floating: session.floating_rect(),
            delete_zone: self.delete_zone,
        })
    }

    fn finish_drag(&mut self, outcome: DragOutcome) {
        match outcome {
            DragOutcome::Committed { widget, cell } => {
                match self.change_layout(widget, LayoutPatch::position(cell.x, cell.y)) {
                    Ok(()) => self.persist(),
                    Err(e) => {
                        tracing::warn!(target: "tabgrid.drag", widget = %widget, error = %e, "drag commit failed");
                    }
                }
            }
            DragOutcome::Deleted { widget } => {
                if let Err(e) = self.detach(widget) {
                    tracing::warn!(target: "tabgrid.drag", widget = %widget, error = %e, "drag delete failed");
                }
            }
            DragOutcome::Cancelled { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    const GRID: GridDimensions = GridDimensions::new(600.0, 400.0, 6, 4);

    fn engine() -> Engine {
        Engine::with_defaults(EngineConfig::default().with_initial_grid(GRID))
    }

    #[test]
    fn ids_reuse_smallest_free() {
        let mut engine = engine();
        let a = engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        let b = engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        let c = engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        assert_eq!([a.get(), b.get(), c.get()], [0, 1, 2]);
        engine.detach(b).unwrap();
        let d = engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        assert_eq!(d, b);
        let order: Vec<_> = engine.widget_ids().map(WidgetId::get).collect();
        assert_eq!(order, [0, 2, 1]);
    }

    #[test]
    fn clock_timer_drives_updates() {
        let mut engine = engine();
        let id = engine.create("clock", json!({}), AbstractLayout::at(0, 0, 0, 3).relative_width(-1)).unwrap();
        assert_eq!(engine.measured(id), Some(MeasuredLayout::new(0, 0, 6, 3)));
        assert_eq!(engine.pending_timers(id), 1);
        engine.advance(engine.now() + Duration::from_millis(1500));
        engine.advance(engine.now() + Duration::from_millis(1000));
        // Creation is not counted; the window closed by the second tick
        // holds the first.
        assert_eq!(engine.updates_per_second(), 1);
        assert_eq!(engine.pending_timers(id), 1);
    }

    #[test]
    fn only_invalidations_count_toward_update_rate() {
        let mut engine = engine();
        let id = engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        engine.rebuild_layout();
        engine.advance(engine.now() + Duration::from_secs(1));
        assert_eq!(engine.updates_per_second(), 0);

        engine.invalidate(id);
        engine.invalidate(id);
        engine.advance(engine.now() + Duration::from_secs(1));
        assert_eq!(engine.updates_per_second(), 2);
    }

    #[test]
    fn rebuild_keeps_exactly_one_clock_timer() {
        let mut engine = engine();
        let id = engine.create("clock", json!({}), AbstractLayout::auto(2, 1)).unwrap();
        engine.rebuild_layout();
        engine.rebuild_layout();
        assert_eq!(engine.pending_timers(id), 1);
        assert_eq!(engine.lifecycle(id), LifecycleState::Attached);
        assert!(engine.surface(id).and_then(|s| s.node("time")).is_some());
    }

    #[test]
    fn detach_clears_clock_timer_and_state() {
        let mut engine = engine();
        let id = engine.create("clock", json!({}), AbstractLayout::auto(2, 1)).unwrap();
        engine.detach(id).unwrap();
        assert_eq!(engine.pending_timers(id), 0);
        assert_eq!(engine.lifecycle(id), LifecycleState::Detached);
        assert!(matches!(engine.detach(id), Err(EngineError::NotAttached(_))));
    }

    #[test]
    fn link_without_rel_fails_and_leaves_registry_intact() {
        let mut engine = engine();
        let a = engine.create("sample", json!({}), AbstractLayout::auto(2, 1)).unwrap();
        let before = engine.measured_layouts();
        let err = engine.create("link", json!({}), AbstractLayout::auto(1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::Widget(WidgetError::Construction { .. })));
        assert_eq!(engine.measured_layouts(), before);
        assert!(engine.contains(a));
    }

    #[test]
    fn preference_change_updates_links() {
        let mut engine = engine();
        let id = engine
            .create("link", json!({"rel": "https://example.org"}), AbstractLayout::auto(1, 1))
            .unwrap();
        let radius = |e: &Engine| {
            e.surface(id)
                .and_then(|s| s.node("icon"))
                .and_then(|n| n.attr("border-radius"))
                .map(str::to_owned)
        };
        assert_eq!(radius(&engine).as_deref(), Some("25%"));
        engine.set_preference("shortcut-circle", "true");
        assert_eq!(radius(&engine).as_deref(), Some("50%"));
    }

    #[test]
    fn debug_line_requires_debug_enabled() {
        let mut engine = engine();
        assert_eq!(engine.debug_line(), None);
        engine.config.debug_enabled = true;
        engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        assert_eq!(
            engine.debug_line().as_deref(),
            Some("debugging enabled, layout size: [600 × 400] (6 × 4), widgets attached: 1, updates/sec: 0")
        );
    }

    #[test]
    fn probe_reports_old_and_new_and_relayouts() {
        let mut engine = engine();
        let id = engine.create("clock", json!({}), AbstractLayout::at(0, 0, 0, 3).relative_width(-1)).unwrap();
        let wider = GridDimensions::new(1200.0, 400.0, 12, 4);
        let change = engine.probe(wider);
        assert_eq!(change.old, GRID);
        assert_eq!(change.new, wider);
        assert!(change.cells_changed());
        assert_eq!(engine.measured(id).map(|m| m.w), Some(12));
    }

    #[test]
    fn press_outside_drag_handle_is_ignored() {
        let mut engine = Engine::with_defaults(
            EngineConfig::default()
                .with_initial_grid(GRID)
                .with_drag_handle_size(20.0),
        );
        let id = engine.create("sample", json!({}), AbstractLayout::at(1, 1, 2, 1)).unwrap();
        assert_eq!(engine.drag_handle_rect(id), Some(PixelRect::new(100.0, 100.0, 20.0, 20.0)));

        let body = engine.handle_pointer(&PointerEvent::down(150.0, 150.0));
        assert_eq!(body, Ok(PointerResponse::Ignored));
        assert!(!engine.is_dragging());

        let handle = engine.handle_pointer(&PointerEvent::down(110.0, 110.0));
        assert_eq!(handle, Ok(PointerResponse::Started(id)));
        assert!(engine.is_dragging());
    }

    #[test]
    fn debug_hover_outlines_every_widget() {
        let mut engine = engine();
        let a = engine.create("sample", json!({}), AbstractLayout::auto(1, 1)).unwrap();
        engine.set_debug_hover(true);
        assert_eq!(engine.frame(a).map(|f| f.outline), Some(Outline::DebugIdle));
        engine.invalidate(a);
        assert_eq!(engine.frame(a).map(|f| f.outline), Some(Outline::Pulse));
        engine.set_debug_hover(false);
        assert_eq!(engine.frame(a).map(|f| f.outline), Some(Outline::None));
    }
}
