//! Error types for context operations

use thiserror::Error;

use crate::host::HotKeyParseError;

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("invalid shortcut '{value}' for {action}")]
    InvalidShortcut {
        action: &'static str,
        value: String,
        #[source]
        source: HotKeyParseError,
    },
}
