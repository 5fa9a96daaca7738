//! Error types for device dossier operations.

use thiserror::Error;

/// Primary error type for store and controller operations.
#[derive(Error, Debug)]
pub enum DkError {
    // Device errors
    #[error("Unknown device name: {name}")]
    UnknownDevice { name: String },

    // Storage errors
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Database file not found: {path}")]
    StoreFileMissing { path: String },

    #[error("Export failed for {path}: {reason}")]
    ExportFailed { path: String, reason: String },

    // Image errors
    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    #[error("No image stored for device '{device}'")]
    NoImage { device: String },

    // Import errors
    #[error("Input file not found: {path}")]
    InputFileNotFound { path: String },

    #[error("Input file is not valid UTF-8 text: {path}")]
    InputNotUtf8 { path: String },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl DkError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownDevice { .. }
                | Self::NoImage { .. }
                | Self::InputFileNotFound { .. }
                | Self::InputNotUtf8 { .. }
                | Self::StoreFileMissing { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnknownDevice { .. } => {
                Some("Run: devkeep list (names accept Cyrillic labels or ASCII slugs)")
            }
            Self::NoImage { .. } => Some("Load one first: devkeep import-image <DEVICE> <FILE>"),
            Self::InputFileNotFound { .. } => Some("Check the path and try again"),
            Self::InputNotUtf8 { .. } => Some("Text imports must be plain UTF-8 files"),
            Self::StoreFileMissing { .. } => Some("Any read/write command creates the database"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using DkError.
pub type Result<T> = std::result::Result<T, DkError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| DkError::Other(format!("{}: {e}", f().into())))
    }
}
