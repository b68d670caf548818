//! Error kinds shared by the object model and the storage areas
//!
//! Storage-level code returns [`Result`]. Porcelain commands wrap these in
//! `anyhow::Error` with extra context, and callers that care about the kind
//! can still `downcast_ref::<Error>()`.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing object, branch, ref, index or repository
    #[error("{0}")]
    NotFound(String),

    /// Malformed serialized bytes, bad header, length mismatch, bad signature
    #[error("invalid format: {0}")]
    Format(String),

    /// Branch already exists, histories diverged, branch is checked out
    #[error("{0}")]
    Conflict(String),

    /// Empty, nested or otherwise invalid names and keys
    #[error("{0}")]
    Validation(String),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Extension for attaching a path to raw `std::io` results.
pub trait IoResultExt<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::io(path, source))
    }
}
