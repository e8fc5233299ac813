//! Transaction specific errors
//!
//! Errors raised while staging changes against workspaces or while
//! publishing them at commit.

use thiserror::Error;

use crate::node::NodeId;

/// Errors from transaction operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TransactionError {
    /// A staging operation was attempted on a read-only transaction.
    #[error("Transaction is read-only")]
    ReadOnly,

    /// The named workspace does not exist, or was destroyed and recreated
    /// after this transaction first touched it.
    #[error("Workspace '{name}' is not valid for this transaction")]
    InvalidWorkspace { name: String },

    /// No node with the given identity is visible to this transaction.
    #[error("Node {id} is not present in workspace '{workspace}'")]
    NodeNotFound { workspace: String, id: NodeId },

    /// No node exists at the given path in the staged state.
    #[error("No node at '{path}' in workspace '{workspace}' (deepest existing: '{lowest_existing}')")]
    PathNotFound {
        workspace: String,
        path: String,
        lowest_existing: String,
    },

    /// The node handle no longer matches the staged state.
    ///
    /// Raised when the node was removed within this transaction, or when
    /// its parent, name, or child list changed after the handle was
    /// obtained. Property-only changes do not stale a handle.
    #[error("Reference to node {id} is stale")]
    StaleReference { id: NodeId },

    /// An operation needed a name and none was available.
    #[error("A name is required to place node {id}")]
    NameRequired { id: NodeId },

    /// The root node cannot be moved.
    #[error("Cannot move the root of workspace '{workspace}'")]
    CannotMoveRoot { workspace: String },

    /// A node cannot be moved beneath itself.
    #[error("Cannot move node {id} under {target}, which is within its own subtree")]
    CannotMoveIntoSubtree { id: NodeId, target: NodeId },

    /// The reference child for a positioned insert is not a child of the
    /// target parent.
    #[error("Node {id} is not a child of {parent}")]
    NotASibling { id: NodeId, parent: NodeId },

    /// A requested child position is past the end of the child list.
    #[error("Child index {index} is out of bounds for {len} children")]
    ChildIndexOutOfBounds { index: usize, len: usize },
}

impl TransactionError {
    /// Check if this error indicates a node that could not be found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TransactionError::NodeNotFound { .. } | TransactionError::PathNotFound { .. }
        )
    }

    /// Check if this error reports a stale node handle.
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, TransactionError::StaleReference { .. })
    }

    /// Check if this error reports an unusable workspace.
    pub fn is_invalid_workspace(&self) -> bool {
        matches!(self, TransactionError::InvalidWorkspace { .. })
    }

    /// Check if this error is a rejected write on a read-only transaction.
    pub fn is_read_only(&self) -> bool {
        matches!(self, TransactionError::ReadOnly)
    }

    /// Check if this error reports a structurally impossible operation.
    pub fn is_operation_error(&self) -> bool {
        matches!(
            self,
            TransactionError::NameRequired { .. }
                | TransactionError::CannotMoveRoot { .. }
                | TransactionError::CannotMoveIntoSubtree { .. }
                | TransactionError::NotASibling { .. }
                | TransactionError::ChildIndexOutOfBounds { .. }
        )
    }
}

// Conversion from TransactionError to the main Error type
impl From<TransactionError> for crate::Error {
    fn from(err: TransactionError) -> Self {
        crate::Error::Transaction(err)
    }
}
