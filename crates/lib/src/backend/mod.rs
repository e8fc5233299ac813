//! Storage backends for workspace trees.
//!
//! A workspace keeps its committed nodes in a [`Store`], an identity-indexed
//! arena with a distinguished root. The default implementation is the
//! [`InMemoryStore`], which also supports JSON snapshots for simple
//! persistence. [`MetadataStore`] projects relational catalog metadata into
//! a read-only tree.
//!
//! Stores know nothing about paths or staging; resolving a path to a node
//! and batching mutations both happen above this layer.

mod errors;
mod in_memory;
mod metadata;

pub use errors::BackendError;
pub use in_memory::InMemoryStore;
pub(crate) use in_memory::Snapshot;
pub use metadata::{ColumnMetadata, MetadataProvider, MetadataStore, StaticMetadata, TableMetadata};

use crate::node::{Node, NodeId};

/// An identity-indexed arena of nodes with a distinguished root.
///
/// Reads return owned copies of the stored records; callers mutate copies
/// and write them back with [`Store::put`]. Mutating operations are
/// fallible so that read-only implementations can reject them.
pub trait Store: Send + Sync {
    /// The identity of the root node.
    ///
    /// The root record is always present in the store.
    fn root_id(&self) -> NodeId;

    /// Retrieve a copy of a node by identity.
    ///
    /// # Arguments
    /// * `id` - The identity of the node to retrieve
    ///
    /// # Returns
    /// A `Some` containing a copy of the node, or `None` if no record with
    /// that identity exists.
    fn get(&self, id: &NodeId) -> Option<Node>;

    /// Store a node under its identity, replacing any existing record.
    ///
    /// # Arguments
    /// * `node` - The record to store
    ///
    /// # Returns
    /// A `Result` containing the replaced record if one existed.
    fn put(&mut self, node: Node) -> Result<Option<Node>, BackendError>;

    /// Remove the record with the given identity.
    ///
    /// # Arguments
    /// * `id` - The identity of the record to remove
    ///
    /// # Returns
    /// A `Result` containing the removed record if one existed.
    fn remove(&mut self, id: &NodeId) -> Result<Option<Node>, BackendError>;

    /// Remove every record, including the root.
    ///
    /// The caller is expected to write a fresh root record afterwards.
    fn remove_all(&mut self) -> Result<(), BackendError>;

    /// The number of records in the store.
    fn len(&self) -> usize;

    /// True if the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies of all records, in no particular order.
    fn nodes(&self) -> Vec<Node>;
}
