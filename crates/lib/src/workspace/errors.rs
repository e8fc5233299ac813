//! Workspace specific errors
//!
//! Errors raised when reading or writing the committed tree of a single
//! workspace.

use thiserror::Error;

use crate::backend::BackendError;
use crate::node::NodeId;

/// Errors from workspace operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// A node was addressed with a relative path.
    #[error("Path '{path}' must be absolute to address a node")]
    AbsolutePathRequired { path: String },

    /// No node exists at the given path.
    ///
    /// `lowest_existing` is the deepest ancestor of the path that does
    /// exist, which callers can use to report how far resolution got.
    #[error("No node at '{path}' in workspace '{workspace}' (deepest existing: '{lowest_existing}')")]
    PathNotFound {
        workspace: String,
        path: String,
        lowest_existing: String,
    },

    /// No record with the given identity exists.
    #[error("Node {id} is not present in workspace '{workspace}'")]
    NodeNotFound { workspace: String, id: NodeId },

    /// The store has no record for the workspace root.
    #[error("Workspace '{workspace}' has no root record")]
    RootMissing { workspace: String },

    /// A non-root record without a name cannot be addressed by path.
    #[error("Node {id} has a parent but no name")]
    UnnamedNode { id: NodeId },

    /// A record could not be created because its declared parent is absent.
    #[error("Cannot create node {id} in workspace '{workspace}': its parent is not present")]
    ParentMissing { workspace: String, id: NodeId },

    /// An error from the underlying store.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl WorkspaceError {
    /// Check if this error indicates a node that could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkspaceError::PathNotFound { .. }
                | WorkspaceError::NodeNotFound { .. }
                | WorkspaceError::ParentMissing { .. }
        )
    }

    /// Check if this error indicates a path that cannot address a node.
    pub fn is_invalid_path(&self) -> bool {
        matches!(self, WorkspaceError::AbsolutePathRequired { .. })
    }

    /// Check if this error is a rejected write on a read-only store.
    pub fn is_read_only(&self) -> bool {
        match self {
            WorkspaceError::Backend(err) => err.is_read_only(),
            _ => false,
        }
    }
}

// Conversion from WorkspaceError to the main Error type
impl From<WorkspaceError> for crate::Error {
    fn from(err: WorkspaceError) -> Self {
        crate::Error::Workspace(err)
    }
}
