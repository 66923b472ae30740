#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! Defaults suit an interactive new-tab page. Hosts can overlay the
//! environment with [`EngineConfig::from_env`] or load a JSON document with
//! [`EngineConfig::from_json_str`]; durations are written in milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabgrid_core::event::PointerButton;
use tabgrid_layout::GridDimensions;
use tabgrid_widgets::Preferences;

/// Environment variable that enables the diagnostics line.
pub const DEBUG_ENV: &str = "TABGRID_DEBUG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Grid metrics used until the host's first probe.
    pub initial_grid: Option<GridDimensions>,
    /// Whether [`Engine::debug_line`](crate::Engine::debug_line) renders.
    pub debug_enabled: bool,
    /// How long a widget stays highlighted after an update in debug hover.
    #[serde(with = "millis")]
    pub pulse_duration: Duration,
    /// Width of the updates-per-second counting window.
    #[serde(with = "millis")]
    pub stats_window: Duration,
    /// Upper bound on request-queue drain passes per flush.
    pub max_request_passes: usize,
    /// Pointer button that starts a drag.
    pub drag_button: PointerButton,
    /// Side of the square drag handle at each widget's top-left corner, in
    /// pixels. `None` lets a press anywhere on the widget start a drag.
    pub drag_handle_size: Option<f64>,
    /// Display preferences visible to widgets.
    pub preferences: Preferences,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_grid: None,
            debug_enabled: false,
            pulse_duration: Duration::from_millis(150),
            stats_window: Duration::from_secs(1),
            max_request_passes: 64,
            drag_button: PointerButton::Primary,
            drag_handle_size: None,
            preferences: Preferences::new(),
        }
    }
}

impl EngineConfig {
    /// Defaults with `TABGRID_DEBUG` applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Overlay environment values read through `lookup`.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup(DEBUG_ENV) {
            self.debug_enabled = v == "1" || v.eq_ignore_ascii_case("true");
        }
        self
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_initial_grid(mut self, grid: GridDimensions) -> Self {
        self.initial_grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_pulse_duration(mut self, pulse: Duration) -> Self {
        self.pulse_duration = pulse;
        self
    }

    #[must_use]
    pub fn with_stats_window(mut self, window: Duration) -> Self {
        self.stats_window = window;
        self
    }

    #[must_use]
    pub fn with_max_request_passes(mut self, passes: usize) -> Self {
        self.max_request_passes = passes;
        self
    }

    #[must_use]
    pub fn with_drag_button(mut self, button: PointerButton) -> Self {
        self.drag_button = button;
        self
    }

    #[must_use]
    pub fn with_drag_handle_size(mut self, size: f64) -> Self {
        self.drag_handle_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.pulse_duration, Duration::from_millis(150));
        assert_eq!(config.stats_window, Duration::from_secs(1));
        assert_eq!(config.max_request_passes, 64);
        assert_eq!(config.drag_button, PointerButton::Primary);
        assert_eq!(config.drag_handle_size, None);
        assert!(!config.debug_enabled);
    }

    #[test]
    fn env_overlay_accepts_one_and_true() {
        for (value, expected) in [("1", true), ("TRUE", true), ("0", false), ("yes", false)] {
            let config = EngineConfig::default()
                .with_debug(!expected)
                .with_env(|key| (key == DEBUG_ENV).then(|| value.to_owned()));
            assert_eq!(config.debug_enabled, expected, "value {value:?}");
        }
    }

    #[test]
    fn missing_env_keeps_value() {
        let config = EngineConfig::default().with_debug(true).with_env(|_| None);
        assert!(config.debug_enabled);
    }

    #[test]
    fn json_document_uses_millis_and_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{
                "debug_enabled": true,
                "pulse_duration": 300,
                "drag_handle_size": 18.0,
                "initial_grid": {"width": 1200.0, "height": 800.0, "columns": 12, "rows": 8},
                "preferences": {"shortcut-circle": "true"}
            }"#,
        )
        .unwrap();
        assert!(config.debug_enabled);
        assert_eq!(config.pulse_duration, Duration::from_millis(300));
        assert_eq!(config.drag_handle_size, Some(18.0));
        assert_eq!(config.stats_window, Duration::from_secs(1));
        assert_eq!(config.initial_grid.map(|g| g.columns), Some(12));
        assert!(config.preferences.flag("shortcut-circle"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(EngineConfig::from_json_str("{\"max_request_passes\": -1}").is_err());
    }
}
