#![forbid(unsafe_code)]

//! User preference flags visible to widgets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Preference key that turns link icons into circles.
pub const SHORTCUT_CIRCLE: &str = "shortcut-circle";

/// String-keyed preference map. Flags are stored as `"true"` / `"false"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    values: BTreeMap<String, String>,
}

impl Preferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// `true` only when the key is present and set to `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn set_flag(&mut self, key: impl Into<String>, on: bool) {
        self.set(key, if on { "true" } else { "false" });
    }

    #[must_use]
    pub fn with_flag(mut self, key: impl Into<String>, on: bool) -> Self {
        self.set_flag(key, on);
        self
    }
}
