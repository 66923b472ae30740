#![forbid(unsafe_code)]

//! Host pointer events.
//!
//! Hosts translate their native input (DOM pointer events, terminal mouse
//! reports) into [`PointerEvent`] values before handing them to the engine.
//! Positions are in grid-container pixel space, see
//! [`crate::geometry::PixelPoint`].

use crate::geometry::PixelPoint;
use serde::{Deserialize, Serialize};

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left mouse button, primary touch contact, or pen tip.
    #[default]
    Primary,
    /// Right mouse button.
    Secondary,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released.
    Up(PointerButton),
    /// The host interrupted the pointer stream (blur, lost capture, escape).
    Cancel,
}

/// A pointer event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Host pointer identifier; a drag follows a single pointer.
    pub pointer_id: u32,
    pub position: PixelPoint,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, pointer_id: u32, position: PixelPoint) -> Self {
        Self {
            kind,
            pointer_id,
            position,
        }
    }

    /// Primary-button press at `(x, y)` for pointer 1.
    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(
            PointerEventKind::Down(PointerButton::Primary),
            1,
            PixelPoint::new(x, y),
        )
    }

    /// Move to `(x, y)` for pointer 1.
    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move, 1, PixelPoint::new(x, y))
    }

    /// Primary-button release at `(x, y)` for pointer 1.
    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(
            PointerEventKind::Up(PointerButton::Primary),
            1,
            PixelPoint::new(x, y),
        )
    }

    /// Use a different pointer id.
    #[must_use]
    pub const fn with_pointer(mut self, pointer_id: u32) -> Self {
        self.pointer_id = pointer_id;
        self
    }
}
