//! Error types
//!
//! Store and codec failures are ordinary `Result` errors. A [`PersistentValue`]
//! never returns them from read/update though: it folds them into a
//! [`PersistError`] and hands that to its reporter.
//!
//! [`PersistentValue`]: crate::PersistentValue

use thiserror::Error;

/// Failure of a key/value backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed store file: {0}")]
    Malformed(String),
}

/// Failure to turn a value into text or back
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("storage key must not be empty")]
    Empty,
}

/// Recoverable failure reported on a value's side channel
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("stored value under `{key}` could not be decoded, using default: {source}")]
    DecodeFailure {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("could not persist value under `{key}`: {reason}")]
    StoreWriteFailure { key: String, reason: WriteFailure },

    #[error("store unavailable for `{key}`, keeping value in memory only: {source}")]
    StoreUnavailable {
        key: String,
        #[source]
        source: StoreError,
    },
}

/// Why a write-through did not land
#[derive(Error, Debug)]
pub enum WriteFailure {
    #[error(transparent)]
    Encode(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PersistError {
    /// Key of the slot the failure concerns
    pub fn key(&self) -> &str {
        match self {
            PersistError::DecodeFailure { key, .. }
            | PersistError::StoreWriteFailure { key, .. }
            | PersistError::StoreUnavailable { key, .. } => key,
        }
    }

    pub fn is_decode_failure(&self) -> bool {
        matches!(self, PersistError::DecodeFailure { .. })
    }

    pub fn is_write_failure(&self) -> bool {
        matches!(self, PersistError::StoreWriteFailure { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, PersistError::StoreUnavailable { .. })
    }
}
