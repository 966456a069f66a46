//! Error types for query resolution
//!
//! The taxonomy separates failures that prevent producing a correct primary
//! result (surfaced to the caller) from failures in auxiliary features
//! (contained and logged). A search never fails because a secondary feature
//! failed.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced to the caller of [`crate::SearchEngine`]
#[derive(Debug, Error)]
pub enum EngineError {
    /// The store could not be read during an index rebuild and no previously
    /// built index was available to serve stale
    #[error("index build failed: {source}")]
    IndexBuild {
        #[source]
        source: StoreError,
    },

    /// A store error during query resolution on either path
    #[error("search failed: {source}")]
    Search {
        #[source]
        source: StoreError,
    },

    /// The configured deadline expired before resolution completed
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

impl EngineError {
    /// Check whether a retry of the same query may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            EngineError::IndexBuild { source } | EngineError::Search { source } => {
                source.is_transient()
            }
            EngineError::Timeout(_) => true,
        }
    }
}

/// Errors reported by [`crate::ContentStore`] implementations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (transient)
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed to execute a query
    #[error("store query failed: {0}")]
    Query(String),

    /// IO error from the underlying storage layer
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Check if the error is transient and the operation worth retrying
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Io(_))
    }
}
