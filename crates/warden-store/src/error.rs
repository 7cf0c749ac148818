use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by entry stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be created, read, or rewritten.
    #[error("acl store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field holds a character the line format cannot represent.
    #[error("{field} {value:?} contains a reserved character ('|', CR or LF)")]
    InvalidField { field: &'static str, value: String },

    /// A previous holder of the store lock panicked.
    #[error("acl store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
