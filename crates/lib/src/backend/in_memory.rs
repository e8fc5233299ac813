//! The default, heap-backed store.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use serde::{Deserialize, Serialize};

use super::{BackendError, Store};
use crate::node::{Node, NodeId};

/// A store backed by a hash map.
///
/// This is the store every freshly created workspace uses. Besides the
/// [`Store`] operations it can be rebuilt from a JSON snapshot written by
/// [`Workspace::save_to_file`](crate::Workspace::save_to_file), which makes
/// simple file persistence possible without a server or a database.
#[derive(Debug)]
pub struct InMemoryStore {
    root_id: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl InMemoryStore {
    /// Create a store holding a single fresh root record.
    pub fn new(root_id: NodeId) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(root_id, Node::new_root(root_id));
        Self { root_id, nodes }
    }

    /// Build a store from existing records. The root record must be among
    /// them and identities must be unique.
    pub(crate) fn from_nodes(root_id: NodeId, records: Vec<Node>) -> Result<Self, BackendError> {
        let mut nodes = HashMap::with_capacity(records.len());
        for node in records {
            if nodes.insert(node.id(), node).is_some() {
                return Err(BackendError::InvalidSnapshot {
                    reason: "duplicate node identity".to_owned(),
                });
            }
        }
        if !nodes.contains_key(&root_id) {
            return Err(BackendError::InvalidSnapshot {
                reason: format!("root record {root_id} is missing"),
            });
        }
        Ok(Self { root_id, nodes })
    }

    /// Load a store from a JSON snapshot file.
    ///
    /// The returned store can be attached to a repository with
    /// [`Repository::mount_workspace`](crate::Repository::mount_workspace),
    /// provided the snapshot was taken from a workspace of the same
    /// repository.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let file = File::open(path)?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(snapshot.into_store()?)
    }
}

impl Store for InMemoryStore {
    fn root_id(&self) -> NodeId {
        self.root_id
    }

    fn get(&self, id: &NodeId) -> Option<Node> {
        self.nodes.get(id).cloned()
    }

    fn put(&mut self, node: Node) -> Result<Option<Node>, BackendError> {
        Ok(self.nodes.insert(node.id(), node))
    }

    fn remove(&mut self, id: &NodeId) -> Result<Option<Node>, BackendError> {
        Ok(self.nodes.remove(id))
    }

    fn remove_all(&mut self) -> Result<(), BackendError> {
        self.nodes.clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }
}

/// The serialized form of a store: the root identity plus all records.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    root_id: NodeId,
    nodes: Vec<Node>,
}

impl Snapshot {
    pub(crate) fn capture(store: &dyn Store) -> Self {
        Self {
            root_id: store.root_id(),
            nodes: store.nodes(),
        }
    }

    pub(crate) fn into_store(self) -> Result<InMemoryStore, BackendError> {
        InMemoryStore::from_nodes(self.root_id, self.nodes)
    }

    pub(crate) fn write_to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
