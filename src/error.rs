//! Errors from reading the music library.
//!
//! Remote lookups, local lyrics I/O, durations and settings each have their
//! own `thiserror` type next to the code that raises them. The CLI wraps all
//! of them in `anyhow`.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tags or audio properties could not be read
    #[error("Metadata error for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// Scan root does not exist
    #[error("Path not found: {0}")]
    NotFound(PathBuf),
}

impl Error {
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }
}
