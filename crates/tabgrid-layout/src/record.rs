#![forbid(unsafe_code)]

//! Persisted layout schema.
//!
//! The persisted form is an ordered JSON array of [`LayoutStateRecord`]s:
//!
//! ```json
//! [
//!   {"kind": "clock", "id": 0, "extra": {}, "layout": {"pX": 0, "pY": 0, "w": 0, "h": 3, "rW": -1}},
//!   {"kind": "link", "id": 1, "extra": {"rel": "https://github.com"}, "layout": {"w": 1, "h": 1}}
//! ]
//! ```
//!
//! Array order is attachment order, which is also placement precedence.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::AbstractLayout;

/// Identity of an attached widget, unique among attached widgets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WidgetId(u32);

impl WidgetId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The smallest id not present in `in_use`.
    #[must_use]
    pub fn smallest_free<I>(in_use: I) -> Self
    where
        I: IntoIterator<Item = WidgetId> + Clone,
    {
        let mut candidate = 0u32;
        while in_use.clone().into_iter().any(|id| id.0 == candidate) {
            candidate += 1;
        }
        Self(candidate)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One persisted widget: `{kind, id, extra, layout}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutStateRecord {
    /// Widget kind name, resolved through the host's kind registry.
    pub kind: String,
    pub id: WidgetId,
    /// Opaque data handed to the widget implementation.
    #[serde(default = "empty_extra")]
    pub extra: Value,
    pub layout: AbstractLayout,
}

fn empty_extra() -> Value {
    Value::Object(serde_json::Map::new())
}

impl LayoutStateRecord {
    #[must_use]
    pub fn new(kind: impl Into<String>, id: WidgetId, extra: Value, layout: AbstractLayout) -> Self {
        Self {
            kind: kind.into(),
            id,
            extra,
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn smallest_free_fills_gaps() {
        let ids = [WidgetId::new(0), WidgetId::new(1), WidgetId::new(3)];
        assert_eq!(WidgetId::smallest_free(ids.iter().copied()), WidgetId::new(2));
        assert_eq!(
            WidgetId::smallest_free(std::iter::empty::<WidgetId>()),
            WidgetId::new(0)
        );
    }

    #[test]
    fn record_round_trips_schema() {
        let raw = json!({
            "kind": "link",
            "id": 4,
            "extra": {"rel": "https://example.org"},
            "layout": {"pX": 1, "pY": 2, "w": 1, "h": 1}
        });
        let record: LayoutStateRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(record.id, WidgetId::new(4));
        assert_eq!(record.layout, AbstractLayout::at(1, 2, 1, 1));
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn missing_extra_defaults_to_empty_object() {
        let record: LayoutStateRecord =
            serde_json::from_str(r#"{"kind":"sample","id":0,"layout":{"w":1,"h":1}}"#).unwrap();
        assert_eq!(record.extra, json!({}));
    }

    #[test]
    fn negative_id_is_rejected() {
        let result = serde_json::from_str::<LayoutStateRecord>(
            r#"{"kind":"sample","id":-1,"layout":{"w":1,"h":1}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn id_displays_with_hash() {
        assert_eq!(WidgetId::new(7).to_string(), "#7");
    }
}
