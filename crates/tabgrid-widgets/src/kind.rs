#![forbid(unsafe_code)]

//! Kind registry: persisted kind names to widget constructors.
//!
//! Construction and every lifecycle callback the engine makes go through
//! [`catch_widget_panic`], so one faulty widget cannot take the layout down.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::builtin;
use crate::widget::{Extra, LifecyclePhase, Widget};

/// Error type widget factories return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builds a widget from its persisted `extra` data.
pub type WidgetFactory = Box<dyn Fn(&Extra) -> Result<Box<dyn Widget>, BoxError>>;

/// Why a widget could not be constructed or run.
#[derive(Debug)]
pub enum WidgetError {
    /// No factory is registered under this kind name.
    UnknownKind(String),
    /// The factory returned an error.
    Construction { kind: String, source: BoxError },
    /// A widget callback panicked.
    Panicked {
        kind: String,
        phase: LifecyclePhase,
        message: String,
    },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKind(kind) => write!(f, "unknown widget kind: {kind}"),
            Self::Construction { kind, source } => {
                write!(f, "failed to construct {kind} widget: {source}")
            }
            Self::Panicked {
                kind,
                phase,
                message,
            } => write!(f, "{kind} widget panicked in {phase}: {message}"),
        }
    }
}

impl std::error::Error for WidgetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Construction { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Run a widget callback, turning a panic into [`WidgetError::Panicked`].
pub fn catch_widget_panic<R>(
    kind: &str,
    phase: LifecyclePhase,
    f: impl FnOnce() -> R,
) -> Result<R, WidgetError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let mut message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        if let Some(stripped) = message.strip_prefix("internal error: entered unreachable code: ") {
            message = stripped.to_string();
        }
        WidgetError::Panicked {
            kind: kind.to_owned(),
            phase,
            message,
        }
    })
}

/// Registry of constructible widget kinds.
pub struct KindRegistry {
    factories: BTreeMap<String, WidgetFactory>,
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl KindRegistry {
    /// A registry with no kinds at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// A registry holding `clock`, `link`, and `sample`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register (or replace) the factory for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&Extra) -> Result<Box<dyn Widget>, BoxError> + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a widget of `kind`. Factory panics are caught.
    pub fn construct(&self, kind: &str, extra: &Extra) -> Result<Box<dyn Widget>, WidgetError> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| WidgetError::UnknownKind(kind.to_owned()))?;
        catch_widget_panic(kind, LifecyclePhase::Construct, || factory(extra))?.map_err(|source| {
            WidgetError::Construction {
                kind: kind.to_owned(),
                source,
            }
        })
    }
}
