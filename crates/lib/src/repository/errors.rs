//! Repository specific errors
//!
//! Errors raised while managing the workspace set of a repository.

use thiserror::Error;

use crate::node::NodeId;

/// Errors from repository and workspace lifecycle operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A workspace with the requested name already exists.
    #[error("Workspace '{name}' already exists")]
    WorkspaceAlreadyExists { name: String },

    /// The named workspace does not exist.
    #[error("Workspace '{name}' does not exist")]
    InvalidWorkspace { name: String },

    /// The default workspace cannot be destroyed.
    #[error("Workspace '{name}' is the default workspace and cannot be destroyed")]
    CannotDestroyDefault { name: String },

    /// The last remaining workspace cannot be destroyed.
    #[error("Workspace '{name}' is the only workspace and cannot be destroyed")]
    CannotDestroySole { name: String },

    /// A mounted store was built against a different root identity.
    #[error("Store roots at {found}, repository root is {expected}")]
    RootMismatch { expected: NodeId, found: NodeId },
}

impl RepositoryError {
    /// Check if this error reports a name collision or a destroy guard.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            RepositoryError::WorkspaceAlreadyExists { .. }
                | RepositoryError::CannotDestroyDefault { .. }
                | RepositoryError::CannotDestroySole { .. }
        )
    }

    /// Check if this error reports an unknown workspace.
    pub fn is_invalid_workspace(&self) -> bool {
        matches!(self, RepositoryError::InvalidWorkspace { .. })
    }
}

// Conversion from RepositoryError to the main Error type
impl From<RepositoryError> for crate::Error {
    fn from(err: RepositoryError) -> Self {
        crate::Error::Repository(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let exists = RepositoryError::WorkspaceAlreadyExists {
            name: "scratch".to_owned(),
        };
        assert!(exists.is_conflict());
        assert!(!exists.is_invalid_workspace());

        let unknown = RepositoryError::InvalidWorkspace {
            name: "missing".to_owned(),
        };
        assert!(unknown.is_invalid_workspace());
        assert!(!unknown.is_conflict());

        let sole = RepositoryError::CannotDestroySole {
            name: "default".to_owned(),
        };
        assert!(sole.is_conflict());

        let mismatch = RepositoryError::RootMismatch {
            expected: NodeId::random(),
            found: NodeId::random(),
        };
        assert!(!mismatch.is_conflict());
    }
}
