//! Error types for layout persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors while reading or writing the layout file
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read layout file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse layout file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize layout")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to create layout directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write layout file {path}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace layout file {path}")]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error("layout writer thread is not running")]
    WriterGone,
}
