//! Error types for annotation collection operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from mutating the annotation collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An entry with the same resolved path or file name already exists.
    #[error("an image named {name:?} is already in the collection ({path:?})")]
    Conflict {
        /// Path of the rejected entry.
        path: PathBuf,
        /// The colliding file name.
        name: String,
    },

    /// The referenced path is not in the collection.
    #[error("no image {path:?} in the collection")]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },
}

impl StoreError {
    /// Create a conflict error for the given entry path.
    pub fn conflict(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::Conflict { path, name }
    }

    /// Create a not-found error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}
