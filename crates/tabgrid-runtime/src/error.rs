#![forbid(unsafe_code)]

//! Engine-level error type.

use std::fmt;

use tabgrid_layout::WidgetId;
use tabgrid_widgets::WidgetError;

use crate::state_persistence::StorageError;

/// Errors returned by [`Engine`](crate::Engine) operations.
#[derive(Debug)]
pub enum EngineError {
    /// A widget failed to construct or panicked while attaching.
    Widget(WidgetError),
    /// The operation named a widget that is not attached.
    NotAttached(WidgetId),
    /// The storage backend failed.
    Storage(StorageError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Widget(e) => write!(f, "widget error: {e}"),
            Self::NotAttached(id) => write!(f, "widget {id} is not attached"),
            Self::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Widget(e) => Some(e),
            Self::NotAttached(_) => None,
            Self::Storage(e) => Some(e),
        }
    }
}

impl From<WidgetError> for EngineError {
    fn from(e: WidgetError) -> Self {
        Self::Widget(e)
    }
}

impl From<StorageError> for EngineError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}
