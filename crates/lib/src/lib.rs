//!
//! Xylem: an embedded hierarchical content repository.
//! This library provides path-addressed trees of nodes with transactional,
//! copy-on-write mutation across named workspaces.
//!
//! ## Core Concepts
//!
//! Xylem is built around several key concepts:
//!
//! * **Paths (`path::Path`)**: Immutable hierarchical addresses made of [`Segment`]s, with
//!   namespace-prefixed names and 1-based same-name-sibling indexes. Paths form a small
//!   algebra: append, ancestor, normalize, `relative_to`, `resolve`.
//! * **Nodes (`node::Node`)**: The unit of content. A node has a stable 128-bit identity,
//!   a name under its parent, a set of multi-valued properties, and an ordered child list.
//! * **Stores (`backend::Store`)**: A pluggable identity-indexed arena holding a workspace's
//!   committed records; in-memory by default, with JSON snapshots and a read-only
//!   relational-metadata projection as alternatives.
//! * **Workspaces (`workspace::Workspace`)**: One named, independently addressable tree.
//!   All workspaces of a repository share a root identity.
//! * **Transactions (`transaction::Transaction`)**: The unit of change. Mutations are
//!   staged invisibly as an overlay on the committed trees, then published atomically per
//!   workspace by `commit` or discarded by `rollback`.
//! * **Repositories (`repository::Repository`)**: The top-level container owning the
//!   workspace set and handing out transactions.
//!
//! ## Example
//!
//! ```
//! use xylem::{Context, Name, Path, Repository, TransactionMode};
//!
//! let repo = Repository::new("content");
//! let mut txn = repo.start_transaction(&Context::new(), TransactionMode::ReadWrite);
//!
//! let root = txn.get_node("default", &Path::root())?;
//! txn.add_child("default", &root, Name::new("catalog")?, None, vec![])?;
//! txn.commit()?;
//!
//! let catalog = repo
//!     .default_workspace()
//!     .node_at(&Path::parse("/catalog")?)?;
//! assert_eq!(catalog.version(), 1);
//! # Ok::<(), xylem::Error>(())
//! ```

pub mod backend;
pub mod constants;
pub mod context;
pub mod node;
pub mod path;
pub mod repository;
pub mod transaction;
pub mod workspace;

pub use backend::{InMemoryStore, MetadataProvider, MetadataStore, StaticMetadata, Store};
pub use context::Context;
pub use node::{Node, NodeId, Property, Value};
pub use path::{Name, Path, Segment};
pub use repository::{ConflictBehavior, Repository, RepositoryConfig};
pub use transaction::{Location, Transaction, TransactionMode};
pub use workspace::Workspace;

/// Result type used throughout the xylem library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the xylem library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured path errors from the path module
    #[error(transparent)]
    Path(path::PathError),

    /// Structured workspace errors from the workspace module
    #[error(transparent)]
    Workspace(workspace::WorkspaceError),

    /// Structured transaction errors from the transaction module
    #[error(transparent)]
    Transaction(transaction::TransactionError),

    /// Structured repository errors from the repository module
    #[error(transparent)]
    Repository(repository::RepositoryError),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
            Error::Path(_) => "path",
            Error::Workspace(_) => "workspace",
            Error::Transaction(_) => "transaction",
            Error::Repository(_) => "repository",
            Error::Backend(_) => "backend",
        }
    }

    /// Check if this error reports malformed or misused path text.
    pub fn is_invalid_path(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_invalid_path(),
            Error::Workspace(ws_err) => ws_err.is_invalid_path(),
            _ => false,
        }
    }

    /// Check if this error reports an ancestor degree beyond a path's length.
    pub fn is_path_not_found(&self) -> bool {
        match self {
            Error::Path(path_err) => path_err.is_path_not_found(),
            _ => false,
        }
    }

    /// Check if this error reports a node that could not be found.
    pub fn is_node_not_found(&self) -> bool {
        match self {
            Error::Workspace(ws_err) => ws_err.is_not_found(),
            Error::Transaction(txn_err) => txn_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error reports an unknown or unusable workspace name.
    pub fn is_invalid_workspace(&self) -> bool {
        match self {
            Error::Transaction(txn_err) => txn_err.is_invalid_workspace(),
            Error::Repository(repo_err) => repo_err.is_invalid_workspace(),
            _ => false,
        }
    }

    /// Check if this error reports a stale node handle.
    pub fn is_stale_reference(&self) -> bool {
        match self {
            Error::Transaction(txn_err) => txn_err.is_stale_reference(),
            _ => false,
        }
    }

    /// Check if this error is a rejected write on a read-only transaction
    /// or store.
    pub fn is_read_only(&self) -> bool {
        match self {
            Error::Transaction(txn_err) => txn_err.is_read_only(),
            Error::Workspace(ws_err) => ws_err.is_read_only(),
            Error::Backend(backend_err) => backend_err.is_read_only(),
            _ => false,
        }
    }

    /// Check if this error reports a workspace name collision or a
    /// protected-workspace destroy.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Repository(repo_err) => repo_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error indicates something that could not be found.
    pub fn is_not_found(&self) -> bool {
        self.is_path_not_found() || self.is_node_not_found()
    }
}
