//! Storage backend errors
//!
//! Errors raised by [`Store`](super::Store) implementations. Mutating
//! operations return these so that read-only stores can reject writes and
//! snapshot loading can report malformed input.

use thiserror::Error;

/// Errors from storage backends.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// A write was attempted on a store that does not accept them.
    #[error("Store '{store}' is read-only")]
    ReadOnly { store: String },

    /// A snapshot could not be turned back into a store.
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },
}

impl BackendError {
    /// Check if this error is a rejected write on a read-only store.
    pub fn is_read_only(&self) -> bool {
        matches!(self, BackendError::ReadOnly { .. })
    }

    /// Check if this error reports a malformed snapshot.
    pub fn is_invalid_snapshot(&self) -> bool {
        matches!(self, BackendError::InvalidSnapshot { .. })
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
