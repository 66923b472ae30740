#![forbid(unsafe_code)]

//! Layout persistence for save/restore across sessions.
//!
//! The engine never touches storage directly. It hands the ordered record
//! list to a [`LayoutPersistence`], which encodes it as one JSON array and
//! delegates the bytes to a [`StorageBackend`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    LayoutPersistence                          │
//! │   - Encodes Vec<LayoutStateRecord> as a JSON array            │
//! │   - Lenient decode: bad records skipped, bad blob → default   │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     StorageBackend                            │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file (requires state-persistence)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; operations return `Result`.
//! 2. **Atomic writes**: file storage uses the write-rename pattern.
//! 3. **Partial load tolerance**: a record that fails to decode is skipped, the rest load.
//! 4. **Order preservation**: records are stored and restored in attachment order.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returned; load falls back to default layout |
//! | `StorageError::Serialization` | JSON encode failure | Returned from `save` |
//! | `StorageError::Corruption` | Blob is not a JSON array | Default layout used, logged |
//! | Bad record | Missing field, wrong type | Record skipped, logged |
//! | Missing blob | First run | Default layout used |

use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::{Value, json};
use tabgrid_layout::{AbstractLayout, LayoutStateRecord, WidgetId};
use tabgrid_widgets::builtin;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during layout storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization error.
    Serialization(String),
    /// Stored blob is not a valid layout document.
    Corruption(String),
    /// Backend is not available.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::Corruption(_)
            | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for pluggable layout storage backends.
///
/// Backends move one opaque blob; encoding is [`LayoutPersistence`]'s job.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Load the stored blob. `None` means nothing was stored yet.
    fn load(&self) -> StorageResult<Option<String>>;

    /// Replace the stored blob.
    fn save(&self, blob: &str) -> StorageResult<()>;

    /// Remove the stored blob.
    fn clear(&self) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&self) -> StorageResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, blob: &str) -> StorageResult<()> {
        (**self).save(blob)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<Option<String>>,
    saves: RwLock<u64>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with a blob.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            data: RwLock::new(Some(blob.into())),
            saves: RwLock::new(0),
        }
    }

    /// The currently stored blob, if any.
    pub fn blob(&self) -> Option<String> {
        self.data.read().ok().and_then(|g| g.clone())
    }

    /// How many times `save` succeeded.
    pub fn save_count(&self) -> u64 {
        self.saves.read().map(|g| *g).unwrap_or(0)
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load(&self) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, blob: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = Some(blob.to_owned());
        if let Ok(mut saves) = self.saves.write() {
            *saves += 1;
        }
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self
            .data
            .read()
            .map(|g| g.as_ref().map_or(0, String::len))
            .unwrap_or(0);
        f.debug_struct("MemoryStorage")
            .field("bytes", &bytes)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// File-based storage backend holding the layout JSON array.
    ///
    /// # Atomic Writes
    ///
    /// 1. Write to `{path}.tmp`
    /// 2. Flush and sync
    /// 3. Rename `{path}.tmp` -> `{path}`
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Create a file storage at the given path.
        ///
        /// The file does not need to exist; it will be created on first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// Create storage at the default location for the application.
        ///
        /// Uses `$XDG_STATE_HOME/tabgrid/{app_name}/layout.json`, falling back
        /// to `~/.local/state` and then the current directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = dirs_or_fallback();
            let path = base.join("tabgrid").join(app_name).join("layout.json");
            Self { path }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }
    }

    fn dirs_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn load(&self) -> StorageResult<Option<String>> {
            if !self.path.exists() {
                return Ok(None);
            }
            Ok(Some(fs::read_to_string(&self.path)?))
        }

        fn save(&self, blob: &str) -> StorageResult<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }

            let tmp_path = self.temp_path();
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                writer.write_all(blob.as_bytes())?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                target: "tabgrid.persist",
                path = %self.path.display(),
                bytes = blob.len(),
                "wrote layout file"
            );
            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            Ok(())
        }

        fn is_available(&self) -> bool {
            if let Some(parent) = self.path.parent() {
                if !parent.exists() {
                    return fs::create_dir_all(parent).is_ok();
                }
                let test_path = parent.join(".tabgrid_test_write");
                if fs::write(&test_path, b"test").is_ok() {
                    let _ = fs::remove_file(&test_path);
                    return true;
                }
            }
            false
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;

// ─────────────────────────────────────────────────────────────────────────────
// Layout Codec
// ─────────────────────────────────────────────────────────────────────────────

/// Layout used on first run or when the stored blob is unreadable: a
/// full-width clock across the top and a sample block below it.
pub fn default_layout() -> Vec<LayoutStateRecord> {
    vec![
        LayoutStateRecord::new(
            builtin::CLOCK,
            WidgetId::new(0),
            json!({}),
            AbstractLayout::at(0, 0, 0, 3).relative_width(-1),
        ),
        LayoutStateRecord::new(
            builtin::SAMPLE,
            WidgetId::new(1),
            json!({}),
            AbstractLayout::at(4, 4, 3, 2),
        ),
    ]
}

/// Decode a stored blob.
///
/// Fails only when the blob is not a JSON array. Elements that do not decode
/// as records are skipped with a warning.
pub fn decode_layout(blob: &str) -> StorageResult<Vec<LayoutStateRecord>> {
    let value: Value = serde_json::from_str(blob)
        .map_err(|e| StorageError::Corruption(format!("layout is not valid JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(StorageError::Corruption("layout is not a JSON array".into()));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<LayoutStateRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    target: "tabgrid.persist",
                    index,
                    error = %e,
                    "skipping undecodable layout record"
                );
            }
        }
    }
    Ok(records)
}

/// Encode records as a JSON array, preserving order.
pub fn encode_layout(records: &[LayoutStateRecord]) -> StorageResult<String> {
    serde_json::to_string(records).map_err(|e| StorageError::Serialization(e.to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout Persistence
// ─────────────────────────────────────────────────────────────────────────────

/// The engine's persistence collaborator.
pub struct LayoutPersistence {
    backend: Box<dyn StorageBackend>,
}

impl LayoutPersistence {
    #[must_use]
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Ephemeral persistence backed by a fresh [`MemoryStorage`].
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Load the stored layout, falling back to [`default_layout`].
    pub fn load(&self) -> Vec<LayoutStateRecord> {
        let blob = match self.backend.load() {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!(
                    target: "tabgrid.persist",
                    backend = self.backend.name(),
                    "no stored layout, using default"
                );
                return default_layout();
            }
            Err(e) => {
                tracing::warn!(
                    target: "tabgrid.persist",
                    backend = self.backend.name(),
                    error = %e,
                    "failed to read layout, using default"
                );
                return default_layout();
            }
        };

        match decode_layout(&blob) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    target: "tabgrid.persist",
                    backend = self.backend.name(),
                    error = %e,
                    "stored layout is corrupt, using default"
                );
                default_layout()
            }
        }
    }

    /// Replace the stored layout with `records`.
    pub fn save(&self, records: &[LayoutStateRecord]) -> StorageResult<()> {
        if !self.backend.is_available() {
            return Err(StorageError::Unavailable(self.backend.name().to_owned()));
        }
        let blob = encode_layout(records)?;
        self.backend.save(&blob)?;
        tracing::debug!(
            target: "tabgrid.persist",
            backend = self.backend.name(),
            records = records.len(),
            "saved layout"
        );
        Ok(())
    }

    pub fn clear(&self) -> StorageResult<()> {
        self.backend.clear()
    }
}

impl fmt::Debug for LayoutPersistence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutPersistence")
            .field("backend", &self.backend.name())
            .finish()
    }
}
