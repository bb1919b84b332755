//! Error types for project persistence.

use std::path::PathBuf;
use thiserror::Error;

use crate::data::DecodeError;

/// Errors that can occur while saving or loading a project directory.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The project directory has no data file
    #[error("project data file not found: {path:?}")]
    MissingDataFile {
        /// Expected location of the data file
        path: PathBuf,
    },

    /// Version mismatch between expected and found
    #[error("project version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version string
        expected: String,
        /// Found version string
        found: String,
    },

    /// A source image exists in the collection but not on disk
    #[error("source image missing: {path:?}")]
    MissingOriginal {
        /// The path that could not be read
        path: PathBuf,
    },

    /// Image decoding failed while rendering an annotated copy
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Rendering an annotated copy failed
    #[error("render error: {message}")]
    Render {
        /// Description of the failure
        message: String,
    },
}

impl ProjectError {
    /// Create a render error with a message.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}
