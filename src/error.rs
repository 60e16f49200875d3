use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Everything that can go wrong while resolving splits or streaming examples.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Fetching or extracting a split archive failed.
    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    /// The manifest is missing, unreadable, or lacks a required column.
    #[error("failed to read manifest {}: {reason}", .path.display())]
    ManifestRead { path: PathBuf, reason: String },

    /// A manifest row carries a style outside the label set.
    #[error("row {index}: '{value}' is not a known style")]
    UnknownStyle { index: usize, value: String },

    #[error("unknown configuration '{0}', expected one of All, Baroque, Realism")]
    UnknownConfig(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("failed to decode image {}: {reason}", .path.display())]
    Image { path: PathBuf, reason: String },
}

impl LoaderError {
    pub(crate) fn download(url: &str, reason: impl ToString) -> Self {
        LoaderError::Download {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn manifest(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LoaderError::ManifestRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
