#![forbid(unsafe_code)]

//! Pointer-driven drag-to-reposition state machine.
//!
//! ```text
//! Idle -> Dragging -> { Committed | Deleted | Cancelled } -> Idle
//! ```
//!
//! At most one session exists engine-wide. A second `begin` while a session
//! is open is rejected, never queued over the first. Events from any pointer
//! other than the one that started the session are ignored.
//!
//! All pixel positions are relative to the grid container's top-left corner.

use std::fmt;

use tabgrid_core::event::{PointerButton, PointerEvent, PointerEventKind};
use tabgrid_core::geometry::{PixelPoint, PixelRect};
use tabgrid_layout::{GridCell, GridDimensions, MeasuredLayout, WidgetId, clip_to_grid, snap_to_cell};

/// Why a pointer event did not advance the drag machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragRejection {
    /// Another drag session is already open.
    SessionActive,
    /// The target widget is not attached.
    NotAttached,
    /// The press used a button other than the configured drag button.
    ButtonNotAllowed,
    /// A move/up arrived with no session open.
    NoSession,
    /// The event came from a different pointer than the session's.
    PointerMismatch,
}

impl fmt::Display for DragRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::SessionActive => "a drag session is already active",
            Self::NotAttached => "widget is not attached",
            Self::ButtonNotAllowed => "button does not start drags",
            Self::NoSession => "no drag session is active",
            Self::PointerMismatch => "event belongs to a different pointer",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for DragRejection {}

/// Why a session ended without a commit or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragCancelReason {
    /// Released without ever producing a candidate cell.
    NoMovement,
    PointerCancel,
    EscapeKey,
    Blur,
    /// The dragged widget was detached mid-drag.
    WidgetDetached,
    Programmatic,
}

/// How a drag session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Move the widget's abstract position to `cell`.
    Committed { widget: WidgetId, cell: GridCell },
    /// Released over the delete target.
    Deleted { widget: WidgetId },
    /// Revert to the original placement.
    Cancelled {
        widget: WidgetId,
        reason: DragCancelReason,
    },
}

impl DragOutcome {
    pub const fn widget(&self) -> WidgetId {
        match self {
            Self::Committed { widget, .. }
            | Self::Deleted { widget }
            | Self::Cancelled { widget, .. } => *widget,
        }
    }
}

/// The single open drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    widget: WidgetId,
    pointer_id: u32,
    origin: PixelPoint,
    start_rect: PixelRect,
    current: PixelPoint,
    span: (i32, i32),
    candidate: Option<GridCell>,
}

impl DragSession {
    pub const fn widget(&self) -> WidgetId {
        self.widget
    }

    pub const fn pointer_id(&self) -> u32 {
        self.pointer_id
    }

    /// Last snapped cell, `None` until the pointer has moved.
    pub const fn candidate(&self) -> Option<GridCell> {
        self.candidate
    }

    /// Where the widget's container floats while following the pointer.
    pub fn floating_rect(&self) -> PixelRect {
        let delta = self.current.delta_from(self.origin);
        self.start_rect.moved_to(self.start_rect.origin().offset(delta))
    }

    /// The widget's measured span anchored at the candidate, clipped to the grid.
    pub fn ghost(&self, dims: &GridDimensions) -> Option<MeasuredLayout> {
        self.candidate
            .map(|cell| clip_to_grid(cell, self.span.0, self.span.1, dims))
    }

    fn track(&mut self, position: PixelPoint, dims: &GridDimensions) {
        self.current = position;
        let tentative = self.floating_rect().origin();
        if let Some(cell) = snap_to_cell(tentative, dims) {
            self.candidate = Some(cell);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Owns the engine's only drag slot.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    button: PointerButton,
}

impl DragController {
    #[must_use]
    pub fn new(button: PointerButton) -> Self {
        Self {
            state: DragState::Idle,
            button,
        }
    }

    pub const fn state(&self) -> &DragState {
        &self.state
    }

    pub const fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub const fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Open a session for `widget`, whose grid placement is `start_rect`
    /// pixels and `span` cells.
    pub fn begin(
        &mut self,
        widget: WidgetId,
        event: &PointerEvent,
        start_rect: PixelRect,
        span: (i32, i32),
    ) -> Result<(), DragRejection> {
        if let DragState::Dragging(active) = &self.state {
            tracing::warn!(
                target: "tabgrid.drag",
                active = %active.widget,
                requested = %widget,
                "rejecting second drag session"
            );
            return Err(DragRejection::SessionActive);
        }
        match event.kind {
            PointerEventKind::Down(button) if button == self.button => {}
            _ => return Err(DragRejection::ButtonNotAllowed),
        }

        self.state = DragState::Dragging(DragSession {
            widget,
            pointer_id: event.pointer_id,
            origin: event.position,
            start_rect,
            current: event.position,
            span,
            candidate: None,
        });
        tracing::debug!(
            target: "tabgrid.drag",
            widget = %widget,
            pointer_id = event.pointer_id,
            x = event.position.x,
            y = event.position.y,
            "drag started"
        );
        Ok(())
    }

    fn session_for(&mut self, event: &PointerEvent) -> Result<&mut DragSession, DragRejection> {
        match &mut self.state {
            DragState::Idle => Err(DragRejection::NoSession),
            DragState::Dragging(session) if session.pointer_id != event.pointer_id => {
                Err(DragRejection::PointerMismatch)
            }
            DragState::Dragging(session) => Ok(session),
        }
    }

    /// Follow the pointer and return the new candidate cell.
    pub fn pointer_move(
        &mut self,
        event: &PointerEvent,
        dims: &GridDimensions,
    ) -> Result<Option<GridCell>, DragRejection> {
        let session = self.session_for(event)?;
        session.track(event.position, dims);
        Ok(session.candidate)
    }

    /// End the session at the release point.
    pub fn release(
        &mut self,
        event: &PointerEvent,
        dims: &GridDimensions,
        delete_zone: Option<PixelRect>,
    ) -> Result<DragOutcome, DragRejection> {
        let session = self.session_for(event)?;
        if session.current != event.position {
            session.track(event.position, dims);
        }
        let session = *session;
        self.state = DragState::Idle;

        let widget = session.widget;
        let outcome = if delete_zone.is_some_and(|zone| zone.contains(event.position)) {
            DragOutcome::Deleted { widget }
        } else if let Some(cell) = session.candidate {
            DragOutcome::Committed { widget, cell }
        } else {
            DragOutcome::Cancelled {
                widget,
                reason: DragCancelReason::NoMovement,
            }
        };
        log_outcome(&outcome);
        Ok(outcome)
    }

    /// Abort the open session, if any.
    pub fn cancel(&mut self, reason: DragCancelReason) -> Option<DragOutcome> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return None;
        };
        let outcome = DragOutcome::Cancelled {
            widget: session.widget,
            reason,
        };
        log_outcome(&outcome);
        Some(outcome)
    }
}

fn log_outcome(outcome: &DragOutcome) {
    match outcome {
        DragOutcome::Committed { widget, cell } => tracing::info!(
            target: "tabgrid.drag",
            widget = %widget,
            x = cell.x,
            y = cell.y,
            "drag committed"
        ),
        DragOutcome::Deleted { widget } => {
            tracing::info!(target: "tabgrid.drag", widget = %widget, "drag deleted widget");
        }
        DragOutcome::Cancelled { widget, reason } => tracing::info!(
            target: "tabgrid.drag",
            widget = %widget,
            reason = ?reason,
            "drag cancelled"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: GridDimensions = GridDimensions::new(600.0, 400.0, 6, 4);

    fn started(start: PixelRect) -> DragController {
        let mut drag = DragController::default();
        drag.begin(WidgetId::new(0), &PointerEvent::down(10.0, 10.0), start, (1, 1))
            .unwrap();
        drag
    }

    #[test]
    fn one_and_a_half_columns_commits_two_columns_over() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        let cell = drag.pointer_move(&PointerEvent::moved(160.0, 10.0), &DIMS).unwrap();
        assert_eq!(cell, Some(GridCell::new(2, 0)));
        let outcome = drag.release(&PointerEvent::up(160.0, 10.0), &DIMS, None).unwrap();
        assert_eq!(
            outcome,
            DragOutcome::Committed {
                widget: WidgetId::new(0),
                cell: GridCell::new(2, 0)
            }
        );
        assert!(!drag.is_active());
    }

    #[test]
    fn far_moves_clamp_to_last_cell() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        let cell = drag.pointer_move(&PointerEvent::moved(5000.0, 5000.0), &DIMS).unwrap();
        assert_eq!(cell, Some(GridCell::new(5, 3)));
        let cell = drag.pointer_move(&PointerEvent::moved(-900.0, -900.0), &DIMS).unwrap();
        assert_eq!(cell, Some(GridCell::new(0, 0)));
    }

    #[test]
    fn ghost_is_clipped_at_grid_edge() {
        let mut drag = DragController::default();
        drag.begin(
            WidgetId::new(4),
            &PointerEvent::down(0.0, 0.0),
            PixelRect::new(0.0, 0.0, 300.0, 200.0),
            (3, 2),
        )
        .unwrap();
        drag.pointer_move(&PointerEvent::moved(500.0, 300.0), &DIMS).unwrap();
        let ghost = drag.session().and_then(|s| s.ghost(&DIMS)).unwrap();
        assert_eq!(ghost, MeasuredLayout::new(5, 3, 1, 1));
        let floating = drag.session().map(DragSession::floating_rect).unwrap();
        assert_eq!(floating, PixelRect::new(500.0, 300.0, 300.0, 200.0));
    }

    #[test]
    fn second_session_is_rejected_and_first_survives() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        let err = drag
            .begin(WidgetId::new(1), &PointerEvent::down(0.0, 0.0).with_pointer(2), PixelRect::default(), (1, 1))
            .unwrap_err();
        assert_eq!(err, DragRejection::SessionActive);
        assert_eq!(drag.session().map(DragSession::widget), Some(WidgetId::new(0)));
    }

    #[test]
    fn foreign_pointer_is_ignored() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        let err = drag
            .pointer_move(&PointerEvent::moved(300.0, 0.0).with_pointer(9), &DIMS)
            .unwrap_err();
        assert_eq!(err, DragRejection::PointerMismatch);
        assert_eq!(drag.session().and_then(DragSession::candidate), None);
    }

    #[test]
    fn wrong_button_does_not_start() {
        let mut drag = DragController::default();
        let press = PointerEvent::new(
            PointerEventKind::Down(PointerButton::Secondary),
            1,
            PixelPoint::new(0.0, 0.0),
        );
        let err = drag
            .begin(WidgetId::new(0), &press, PixelRect::default(), (1, 1))
            .unwrap_err();
        assert_eq!(err, DragRejection::ButtonNotAllowed);
        assert!(!drag.is_active());
    }

    #[test]
    fn release_in_place_reverts() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        let outcome = drag.release(&PointerEvent::up(10.0, 10.0), &DIMS, None).unwrap();
        assert!(matches!(
            outcome,
            DragOutcome::Cancelled {
                reason: DragCancelReason::NoMovement,
                ..
            }
        ));
    }

    #[test]
    fn release_over_delete_zone_deletes() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        drag.pointer_move(&PointerEvent::moved(200.0, 200.0), &DIMS).unwrap();
        let zone = PixelRect::new(550.0, 350.0, 50.0, 50.0);
        let outcome = drag.release(&PointerEvent::up(575.0, 375.0), &DIMS, Some(zone)).unwrap();
        assert_eq!(outcome, DragOutcome::Deleted { widget: WidgetId::new(0) });
    }

    #[test]
    fn events_without_session_are_rejected() {
        let mut drag = DragController::default();
        assert_eq!(
            drag.pointer_move(&PointerEvent::moved(1.0, 1.0), &DIMS),
            Err(DragRejection::NoSession)
        );
        assert_eq!(drag.cancel(DragCancelReason::Blur), None);
    }

    #[test]
    fn cancel_closes_session() {
        let mut drag = started(PixelRect::new(0.0, 0.0, 100.0, 100.0));
        let outcome = drag.cancel(DragCancelReason::EscapeKey);
        assert_eq!(
            outcome,
            Some(DragOutcome::Cancelled {
                widget: WidgetId::new(0),
                reason: DragCancelReason::EscapeKey
            })
        );
        assert!(!drag.is_active());
    }
}
