//! Cache error type.

use std::path::PathBuf;

/// Errors raised by the cache tiers.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The named hash algorithm is not supported.
    #[error("Hash algorithm not available: {0}")]
    HashAlgorithmUnavailable(String),

    /// Durable tier read or write failed.
    #[error("Cache I/O failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be mapped to a file inside the cache directory.
    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),

    /// Field name or value contains a NUL byte.
    #[error("Field {0:?} contains a NUL byte and cannot be stored")]
    UnencodableField(String),

    /// Stored record does not follow the record layout.
    #[error("Corrupt cache record: {0}")]
    CorruptRecord(&'static str),
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
