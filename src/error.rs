//! Error types for data source and store operations.
//!
//! Provides the crate-wide [`Error`] enum and [`Result`] alias. Data-path
//! faults (store outages, malformed records, unreadable payloads) are
//! absorbed inside the resolver and projector and never reach callers;
//! the variants here cover configuration problems and host-protocol misuse.

use thiserror::Error;

use crate::store::{DefinitionId, StoreError};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by data source and schema operations.
///
/// # Examples
///
/// ```
/// use rowsource::Error;
///
/// let err = Error::NotReady {
///     message: "arguments have not been processed".to_string(),
/// };
/// assert!(err.to_string().contains("not ready"));
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// The instance store failed while serving a query.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Schema configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of the configuration problem.
        message: String,
    },

    /// A store record did not carry the expected definition.
    #[error("definition mismatch: expected {expected}, found {actual}")]
    RecordMismatch {
        /// The definition the schema is configured for.
        expected: DefinitionId,
        /// The definition the record actually carried.
        actual: DefinitionId,
    },

    /// A lifecycle method was invoked before the source was ready for it.
    #[error("data source not ready: {message}")]
    NotReady {
        /// Which precondition was violated.
        message: String,
    },
}
