//! Durable widget layout storage.
//!
//! The layout is a single JSON object mapping widget id to top-left
//! position, stored at `<config_dir>/hudsnap/<namespace>/layout.json`.
//! Reads happen once at startup; writes are fire-and-forget through a
//! background writer and always replace the whole file atomically.

mod error;
mod writer;


pub use error::StorageError;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use hudsnap_types::{Point, WidgetId};

use writer::LayoutWriter;

/// Saved widget positions keyed by widget id
pub type PersistedLayout = BTreeMap<WidgetId, Point>;

const LAYOUT_FILE: &str = "layout.json";

// ─────────────────────────────────────────────────────────────────────────────
// Sink Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for layout snapshots
pub trait LayoutSink {
    /// Saved layout, empty when nothing usable exists
    fn load(&self) -> PersistedLayout;

    /// Persist a full snapshot. Must not block on I/O.
    fn save(&self, layout: PersistedLayout);
}

// ─────────────────────────────────────────────────────────────────────────────
// PositionStore
// ─────────────────────────────────────────────────────────────────────────────

/// File-backed layout store
pub struct PositionStore {
    path: PathBuf,
    writer: Option<LayoutWriter>,
}

impl PositionStore {
    /// Store backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let writer = match LayoutWriter::spawn(path.clone()) {
            Ok(writer) => Some(writer),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start layout writer; layout will not be saved");
                None
            }
        };
        Self { path, writer }
    }

    /// Store at the default location for `namespace`
    pub fn for_namespace(namespace: &str) -> Result<Self, StorageError> {
        Ok(Self::new(default_layout_path(namespace)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until every queued save has been written.
    ///
    /// This is a blocking call: from async code wrap it in
    /// `tokio::task::block_in_place`.
    pub fn flush(&self) {
        let flushed = self.writer.as_ref().is_some_and(|w| w.flush());
        if !flushed {
            tracing::warn!(error = %StorageError::WriterGone, "Layout flush skipped");
        }
    }
}

impl LayoutSink for PositionStore {
    fn load(&self) -> PersistedLayout {
        match read_layout(&self.path) {
            Ok(Some(layout)) => {
                tracing::info!(widgets = layout.len(), path = %self.path.display(), "Loaded layout");
                layout
            }
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "No saved layout, using defaults");
                PersistedLayout::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable layout, using defaults");
                PersistedLayout::new()
            }
        }
    }

    fn save(&self, layout: PersistedLayout) {
        let queued = self.writer.as_ref().is_some_and(|w| w.save(layout));
        if !queued {
            tracing::warn!(error = %StorageError::WriterGone, "Layout save dropped");
        }
    }
}

impl std::fmt::Debug for PositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionStore")
            .field("path", &self.path)
            .field("writer_running", &self.writer.is_some())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// `<config_dir>/hudsnap/<namespace>/layout.json`
pub fn default_layout_path(namespace: &str) -> Result<PathBuf, StorageError> {
    let base = dirs::config_dir().ok_or(StorageError::NoConfigDir)?;
    Ok(base
        .join("hudsnap")
        .join(sanitize_namespace(namespace))
        .join(LAYOUT_FILE))
}

/// Restrict a namespace to a single safe path component
fn sanitize_namespace(namespace: &str) -> String {
    let cleaned: String = namespace
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "default".to_string()
    } else {
        cleaned
    }
}

/// Read a layout file. A missing file is `Ok(None)`.
pub fn read_layout(path: &Path) -> Result<Option<PersistedLayout>, StorageError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::ReadFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let layout: PersistedLayout =
        serde_json::from_str(&contents).map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Some(
        layout
            .into_iter()
            .filter(|(_, position)| position.is_finite())
            .collect(),
    ))
}

/// Write `layout` to a sibling temp file, sync it, then rename over `path`
pub fn write_layout_atomic(path: &Path, layout: &PersistedLayout) -> Result<(), StorageError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_vec_pretty(layout).map_err(StorageError::Serialize)?;
    let tmp_path = path.with_extension("json.tmp");

    let write_err = |source| StorageError::WriteFile {
        path: tmp_path.clone(),
        source,
    };
    let mut file = File::create(&tmp_path).map_err(write_err)?;
    file.write_all(&json).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|source| StorageError::Rename {
        path: path.to_path_buf(),
        source,
    })
}
