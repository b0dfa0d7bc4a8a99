//! Error types distinguished by the search source.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a record store.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library snapshot could not be read.
    #[error("failed to read library {path}: {source}")]
    Read {
        /// Snapshot location.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The library snapshot is not valid JSON or lacks a game list.
    #[error("failed to parse library {path}: {source}")]
    Parse {
        /// Snapshot location.
        path: PathBuf,
        /// Underlying decoding error.
        source: serde_json::Error,
    },
    /// The store could not enumerate its records.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    /// An icon token could not be turned into a reference.
    #[error("invalid icon token '{token}': {reason}")]
    Icon {
        /// Raw token as stored in the record.
        token: String,
        /// Why resolution failed.
        reason: String,
    },
}

/// Failures that prevent a single record from becoming a result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// The record has no identity, so no selection action can be bound.
    #[error("record '{name}' has no identity")]
    MissingIdentity {
        /// Name of the offending record, for diagnostics.
        name: String,
    },
}
