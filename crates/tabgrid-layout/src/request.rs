#![forbid(unsafe_code)]

//! Abstract placement requests and their measured results.

use serde::{Deserialize, Serialize};

/// A widget's requested placement before it is resolved against the grid.
///
/// Serialized with the short field names of the persisted layout schema
/// (`pX`, `pY`, `w`, `h`, `rW`, `rH`).
///
/// - `p_x` / `p_y`: requested column and row. When either is `None` the
///   solver picks the first free cell.
/// - `w` / `h`: span in columns / rows. Zero means "use the relative
///   offset" when `r_w` / `r_h` is non-zero.
/// - `r_w` / `r_h`: offset from the grid's far edge used for relative spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbstractLayout {
    #[serde(rename = "pX", default, skip_serializing_if = "Option::is_none")]
    pub p_x: Option<i32>,
    #[serde(rename = "pY", default, skip_serializing_if = "Option::is_none")]
    pub p_y: Option<i32>,
    pub w: i32,
    pub h: i32,
    #[serde(rename = "rW", default, skip_serializing_if = "is_zero")]
    pub r_w: i32,
    #[serde(rename = "rH", default, skip_serializing_if = "is_zero")]
    pub r_h: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl AbstractLayout {
    /// A fixed-size request with an explicit position.
    #[must_use]
    pub const fn at(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            p_x: Some(x),
            p_y: Some(y),
            w,
            h,
            r_w: 0,
            r_h: 0,
        }
    }

    /// A fixed-size request placed in the first free cell.
    #[must_use]
    pub const fn auto(w: i32, h: i32) -> Self {
        Self {
            p_x: None,
            p_y: None,
            w,
            h,
            r_w: 0,
            r_h: 0,
        }
    }

    /// Set the relative width offset (takes effect only when `w == 0`).
    #[must_use]
    pub const fn relative_width(mut self, r_w: i32) -> Self {
        self.r_w = r_w;
        self
    }

    /// Set the relative height offset (takes effect only when `h == 0`).
    #[must_use]
    pub const fn relative_height(mut self, r_h: i32) -> Self {
        self.r_h = r_h;
        self
    }

    /// True if both coordinates are given.
    #[inline]
    pub const fn has_position(&self) -> bool {
        self.p_x.is_some() && self.p_y.is_some()
    }

    /// Width resolves against the grid's far edge.
    #[inline]
    pub const fn is_relative_width(&self) -> bool {
        self.w == 0 && self.r_w != 0
    }

    /// Height resolves against the grid's far edge.
    #[inline]
    pub const fn is_relative_height(&self) -> bool {
        self.h == 0 && self.r_h != 0
    }

    /// Merge a patch into this request.
    pub fn apply(&mut self, patch: &LayoutPatch) {
        if let Some(x) = patch.p_x {
            self.p_x = Some(x);
        }
        if let Some(y) = patch.p_y {
            self.p_y = Some(y);
        }
        if let Some(w) = patch.w {
            self.w = w;
        }
        if let Some(h) = patch.h {
            self.h = h;
        }
        if let Some(r_w) = patch.r_w {
            self.r_w = r_w;
        }
        if let Some(r_h) = patch.r_h {
            self.r_h = r_h;
        }
    }
}

/// A partial update of an [`AbstractLayout`]; `Some` fields overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutPatch {
    pub p_x: Option<i32>,
    pub p_y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub r_w: Option<i32>,
    pub r_h: Option<i32>,
}

impl LayoutPatch {
    /// A patch that only moves the widget.
    #[must_use]
    pub const fn position(x: i32, y: i32) -> Self {
        Self {
            p_x: Some(x),
            p_y: Some(y),
            w: None,
            h: None,
            r_w: None,
            r_h: None,
        }
    }

    /// A patch that only resizes the widget.
    #[must_use]
    pub const fn size(w: i32, h: i32) -> Self {
        Self {
            p_x: None,
            p_y: None,
            w: Some(w),
            h: Some(h),
            r_w: None,
            r_h: None,
        }
    }

    /// Chain a position onto this patch.
    #[must_use]
    pub const fn with_position(mut self, x: i32, y: i32) -> Self {
        self.p_x = Some(x);
        self.p_y = Some(y);
        self
    }

    /// True when applying the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.p_x.is_none()
            && self.p_y.is_none()
            && self.w.is_none()
            && self.h.is_none()
            && self.r_w.is_none()
            && self.r_h.is_none()
    }
}

/// Resolved integer grid placement `{x, y, w, h}`.
///
/// Derived on every relayout pass and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MeasuredLayout {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl MeasuredLayout {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Check whether two footprints share at least one cell.
    #[must_use]
    pub const fn overlaps(&self, other: &MeasuredLayout) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_schema_names() {
        let layout = AbstractLayout::at(0, 0, 0, 3).relative_width(-1);
        let json = serde_json::to_value(layout).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"pX": 0, "pY": 0, "w": 0, "h": 3, "rW": -1})
        );
    }

    #[test]
    fn missing_optional_fields_deserialize_to_defaults() {
        let layout: AbstractLayout = serde_json::from_str(r#"{"w": 2, "h": 1}"#).unwrap();
        assert_eq!(layout, AbstractLayout::auto(2, 1));
        assert!(!layout.has_position());
    }

    #[test]
    fn relative_needs_zero_span_and_nonzero_offset() {
        assert!(AbstractLayout::at(0, 0, 0, 3).relative_width(-1).is_relative_width());
        assert!(!AbstractLayout::at(0, 0, 2, 3).relative_width(-1).is_relative_width());
        assert!(!AbstractLayout::at(0, 0, 0, 3).is_relative_width());
        assert!(AbstractLayout::at(0, 0, 1, 0).relative_height(-2).is_relative_height());
    }

    #[test]
    fn patch_overwrites_only_given_fields() {
        let mut layout = AbstractLayout::at(1, 1, 2, 2).relative_width(-3);
        layout.apply(&LayoutPatch::position(4, 0));
        assert_eq!(layout.p_x, Some(4));
        assert_eq!(layout.p_y, Some(0));
        assert_eq!((layout.w, layout.h, layout.r_w), (2, 2, -3));

        layout.apply(&LayoutPatch::size(1, 1));
        assert_eq!((layout.w, layout.h), (1, 1));
        assert!(LayoutPatch::default().is_empty());
        assert!(!LayoutPatch::size(1, 1).with_position(0, 0).is_empty());
    }

    #[test]
    fn overlap_is_half_open() {
        let a = MeasuredLayout::new(0, 0, 2, 1);
        assert!(a.overlaps(&MeasuredLayout::new(1, 0, 1, 1)));
        assert!(!a.overlaps(&MeasuredLayout::new(2, 0, 1, 1)));
        assert!(!a.overlaps(&MeasuredLayout::new(0, 1, 1, 1)));
    }
}
