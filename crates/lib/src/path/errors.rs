//! Path specific errors
//!
//! This module contains error types for parsing and manipulating hierarchical
//! paths, names, and segments. Each parse failure mode has its own variant so
//! that callers (and tests) can distinguish precisely why a path was rejected.

use thiserror::Error;

/// Errors raised by the path algebra.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The input text was empty or contained only whitespace.
    #[error("Path text is blank")]
    BlankText,

    /// A delimiter-separated segment of the input was empty.
    #[error("Empty segment in path '{text}'")]
    EmptySegment { text: String },

    /// A segment carried a same-name-sibling index that is not a positive integer.
    #[error("Invalid same-name-sibling index in segment '{segment}'")]
    InvalidIndex { segment: String },

    /// A self- or parent-reference segment carried a prefix or an index.
    #[error("Reserved segment '{segment}' takes no prefix or index")]
    ReservedSegment { segment: String },

    /// A name was structurally invalid (empty local part, stray delimiter, ...).
    #[error("Invalid name '{text}': {reason}")]
    InvalidName { text: String, reason: String },

    /// Normalizing an absolute path would step above the root.
    #[error("Normalizing '{path}' would step above the root")]
    RootEscape { path: String },

    /// An operation required an absolute path but was given a relative one.
    #[error("{operation} requires an absolute path, got '{path}'")]
    AbsoluteRequired { operation: String, path: String },

    /// An operation required a relative path but was given an absolute one.
    #[error("{operation} requires a relative path, got '{path}'")]
    RelativeRequired { operation: String, path: String },

    /// An ancestor was requested beyond the length of the path.
    #[error("Path '{path}' has no ancestor of degree {degree}")]
    AncestorDegree { path: String, degree: usize },

    /// A subpath range fell outside the path's segments.
    #[error("Subpath range {start}..{end} is out of bounds for a path of {length} segments")]
    SubpathOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },
}

impl PathError {
    /// Check if this error describes malformed or misused path text.
    pub fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            PathError::BlankText
                | PathError::EmptySegment { .. }
                | PathError::InvalidIndex { .. }
                | PathError::ReservedSegment { .. }
                | PathError::InvalidName { .. }
                | PathError::RootEscape { .. }
                | PathError::AbsoluteRequired { .. }
                | PathError::RelativeRequired { .. }
        )
    }

    /// Check if this error reports an ancestor degree beyond the path length.
    pub fn is_path_not_found(&self) -> bool {
        matches!(self, PathError::AncestorDegree { .. })
    }
}

// Conversion from PathError to the main Error type
impl From<PathError> for crate::Error {
    fn from(err: PathError) -> Self {
        crate::Error::Path(err)
    }
}
