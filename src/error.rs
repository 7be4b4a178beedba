//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for the application layer (config loading, CLI).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods. The search core returns [`SearchError`] instead.
pub type Result<T> = anyhow::Result<T>;

/// Boxed underlying cause carried by [`SearchError::Cache`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable code identifying the kind of a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    IndexNotFound,
    CacheError,
    IoError,
}

/// Errors produced by the search core.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The configured content root does not exist.
    #[error("Content directory not found: {}", path.display())]
    IndexNotFound { path: PathBuf },

    /// Rebuilding or reading the cache failed.
    #[error("{message}")]
    Cache {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A single path could not be read or stat'ed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SearchError {
    /// Cache error without an underlying cause.
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
            source: None,
        }
    }

    /// Cache error wrapping an underlying cause.
    pub fn cache_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Cache {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub const fn code(&self) -> SearchErrorCode {
        match self {
            Self::IndexNotFound { .. } => SearchErrorCode::IndexNotFound,
            Self::Cache { .. } => SearchErrorCode::CacheError,
            Self::Io { .. } => SearchErrorCode::IoError,
        }
    }
}
