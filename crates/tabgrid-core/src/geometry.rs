#![forbid(unsafe_code)]

//! Pixel-space geometric primitives.
//!
//! All coordinates are relative to the top-left corner of the host's grid
//! container. Values are `f64` because hosts report fractional pixel sizes
//! (for example `1903 / 12` pixels per column).

use serde::{Deserialize, Serialize};

/// A point in grid-container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - origin`.
    #[inline]
    pub fn delta_from(self, origin: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x - origin.x, self.y - origin.y)
    }

    /// Translate by the given delta.
    #[inline]
    pub fn offset(self, delta: PixelPoint) -> PixelPoint {
        PixelPoint::new(self.x + delta.x, self.y + delta.y)
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> PixelPoint {
        PixelPoint::new(self.x, self.y)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point lies inside the rectangle.
    ///
    /// Edges are inclusive on all four sides, matching a DOM bounding-rect
    /// test (`left <= x <= right`).
    #[inline]
    pub fn contains(&self, point: PixelPoint) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Same size, moved so its top-left corner sits at `origin`.
    #[inline]
    pub fn moved_to(&self, origin: PixelPoint) -> PixelRect {
        PixelRect::new(origin.x, origin.y, self.width, self.height)
    }
}
