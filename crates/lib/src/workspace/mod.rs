//! Workspaces, the named committed trees of a repository.
//!
//! A [`Workspace`] is a thread-safe veneer over a [`Store`]: it resolves
//! absolute paths to records, writes records back, and snapshots itself to
//! a file. Direct structural writes keep the tree consistent — creating a
//! record appends it to its parent's child list, removing one detaches the
//! whole subtree, and same-name-sibling indexes are renumbered either way —
//! so child lists and parent links never diverge. The workspace holds no
//! staged state; buffering mutations is the transaction layer's job, which
//! batches record writes and hands them to [`Workspace::apply`] at commit.
//!
//! Workspace handles are cheap to clone and share one store per workspace;
//! reads take a shared lock, writes an exclusive one.

mod errors;


use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

pub use errors::WorkspaceError;

use crate::backend::{Snapshot, Store};
use crate::node::{Node, NodeId};
use crate::path::{Name, Path, Segment};

/// A named committed tree.
#[derive(Clone)]
pub struct Workspace {
    name: Arc<str>,
    root_id: NodeId,
    store: Arc<RwLock<Box<dyn Store>>>,
}

impl Workspace {
    pub(crate) fn new(name: &str, store: Box<dyn Store>) -> Self {
        let root_id = store.root_id();
        Self {
            name: Arc::from(name),
            root_id,
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// The workspace's name, unique within its repository.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identity of the root node.
    ///
    /// Every workspace of a repository shares the same root identity.
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// The number of committed records.
    pub fn len(&self) -> usize {
        self.read_store().len()
    }

    /// True if the workspace holds no committed records.
    pub fn is_empty(&self) -> bool {
        self.read_store().is_empty()
    }

    /// A copy of the committed record with the given identity.
    pub fn node(&self, id: &NodeId) -> Option<Node> {
        self.read_store().get(id)
    }

    /// A copy of the committed root record.
    pub fn root(&self) -> crate::Result<Node> {
        self.read_store()
            .get(&self.root_id)
            .ok_or_else(|| self.root_missing().into())
    }

    /// Resolve an absolute path to a committed node.
    ///
    /// The path is canonicalized first. Lookup treats a segment without an
    /// index and the same segment with index 1 as the same child.
    pub fn node_at(&self, path: &Path) -> crate::Result<Node> {
        if !path.is_absolute() {
            return Err(WorkspaceError::AbsolutePathRequired {
                path: path.to_string(),
            }
            .into());
        }
        let canonical = path.canonicalize()?;
        let store = self.read_store();
        let mut current = store
            .get(&self.root_id)
            .ok_or_else(|| self.root_missing())?;
        let mut walked = Path::root();
        for segment in canonical.iter() {
            match child_matching(&**store, &current, segment) {
                Some(child) => {
                    walked = walked.append(segment.clone());
                    current = child;
                }
                None => {
                    return Err(WorkspaceError::PathNotFound {
                        workspace: self.name.to_string(),
                        path: canonical.to_string(),
                        lowest_existing: walked.to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(current)
    }

    /// The absolute path of a committed node, assembled from parent links.
    pub fn path_for(&self, id: &NodeId) -> crate::Result<Path> {
        let store = self.read_store();
        let limit = store.len();
        let mut current = store.get(id).ok_or_else(|| self.node_not_found(*id))?;
        let mut segments = Vec::new();
        while let Some(parent_id) = current.parent() {
            let segment = current
                .name()
                .cloned()
                .ok_or(WorkspaceError::UnnamedNode { id: current.id() })?;
            segments.push(segment);
            // Parent chains are acyclic in a consistent tree; the length
            // bound keeps a corrupted store from looping forever.
            if segments.len() > limit {
                return Err(self.node_not_found(parent_id).into());
            }
            current = store
                .get(&parent_id)
                .ok_or_else(|| self.node_not_found(parent_id))?;
        }
        segments.reverse();
        Ok(Path::absolute_from(segments))
    }

    /// Store a record under its identity, returning the one it replaced.
    ///
    /// An existing record keeps its structure: only its property set is
    /// replaced, and the prior record is returned. A new record is created
    /// under its declared parent — appended to the parent's child list,
    /// with same-name siblings renumbered. Either way the written record
    /// ends up one version past the one it replaces, or one past its own
    /// when there was none: every direct write counts as one touch.
    /// Non-root records must carry a name.
    pub fn put_node(&self, node: Node) -> crate::Result<Option<Node>> {
        if node.parent().is_some() && node.name().is_none() {
            return Err(WorkspaceError::UnnamedNode { id: node.id() }.into());
        }
        let mut store = self.write_store();

        if let Some(mut existing) = store.get(&node.id()) {
            let prior = existing.clone();
            existing.clear_properties();
            for property in node.properties() {
                existing.set_property(property.clone());
            }
            existing.set_version(prior.version() + 1);
            store.put(existing).map_err(WorkspaceError::from)?;
            return Ok(Some(prior));
        }

        let Some(parent_id) = node.parent() else {
            // The root record is created by the workspace itself; any
            // other parentless record has no place in this tree.
            return Err(WorkspaceError::ParentMissing {
                workspace: self.name.to_string(),
                id: node.id(),
            }
            .into());
        };
        let Some(mut parent) = store.get(&parent_id) else {
            return Err(WorkspaceError::ParentMissing {
                workspace: self.name.to_string(),
                id: node.id(),
            }
            .into());
        };
        let name = node
            .name()
            .cloned()
            .ok_or(WorkspaceError::UnnamedNode { id: node.id() })?;

        parent.children_mut().push(node.id());
        parent.set_version(parent.version() + 1);
        store.put(parent).map_err(WorkspaceError::from)?;
        let mut node = node;
        node.set_version(node.version() + 1);
        store.put(node).map_err(WorkspaceError::from)?;
        renumber_siblings(&mut **store, &parent_id, name.name())?;
        Ok(None)
    }

    /// Remove the record with the given identity, detaching it from its
    /// parent and removing its whole subtree.
    ///
    /// Identity-keyed: a child is never looked up by name. Removing the
    /// root, or an identity with no record, is a no-op returning `None`;
    /// otherwise the removed record is returned and the remaining
    /// same-name siblings are renumbered.
    pub fn remove_node(&self, id: &NodeId) -> crate::Result<Option<Node>> {
        if *id == self.root_id {
            return Ok(None);
        }
        let mut store = self.write_store();
        let Some(target) = store.get(id) else {
            return Ok(None);
        };

        if let Some(parent_id) = target.parent() {
            if let Some(mut parent) = store.get(&parent_id) {
                parent.children_mut().retain(|child| child != id);
                parent.set_version(parent.version() + 1);
                store.put(parent).map_err(WorkspaceError::from)?;
            }
        }

        let mut stack = vec![target.clone()];
        while let Some(record) = stack.pop() {
            for child_id in record.children() {
                if let Some(child) = store.get(child_id) {
                    stack.push(child);
                }
            }
            store.remove(&record.id()).map_err(WorkspaceError::from)?;
        }

        if let (Some(parent_id), Some(segment)) = (target.parent(), target.name()) {
            renumber_siblings(&mut **store, &parent_id, segment.name())?;
        }
        Ok(Some(target))
    }

    /// Remove every record and write a fresh, empty root under the same
    /// identity, one version further on.
    pub fn remove_all(&self) -> crate::Result<()> {
        let mut store = self.write_store();
        let root_version = store
            .get(&self.root_id)
            .map(|root| root.version())
            .unwrap_or(0);
        store.remove_all().map_err(WorkspaceError::from)?;
        let mut root = Node::new_root(self.root_id);
        root.set_version(root_version + 1);
        store.put(root).map_err(WorkspaceError::from)?;
        Ok(())
    }

    /// Copies of all committed records, in no particular order.
    pub fn nodes(&self) -> Vec<Node> {
        self.read_store().nodes()
    }

    /// Write a JSON snapshot of the committed records to a file.
    pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let snapshot = Snapshot::capture(&**self.read_store());
        snapshot.write_to_file(path)
    }

    /// Publish one transaction's staged changes for this workspace.
    ///
    /// Runs under the store's write lock, so concurrent commits to the same
    /// workspace serialize. Versions continue from the committed records
    /// captured before any removal: each record written here ends up
    /// exactly one version past its committed predecessor.
    pub(crate) fn apply(
        &self,
        remove_all: bool,
        upserts: Vec<Node>,
        removals: Vec<NodeId>,
    ) -> crate::Result<()> {
        let mut store = self.write_store();
        let mut prior_versions = HashMap::with_capacity(upserts.len());
        for node in &upserts {
            if let Some(existing) = store.get(&node.id()) {
                prior_versions.insert(node.id(), existing.version());
            }
        }
        if remove_all {
            store.remove_all().map_err(WorkspaceError::from)?;
        }
        for mut node in upserts {
            let base = prior_versions
                .get(&node.id())
                .copied()
                .unwrap_or_else(|| node.version());
            node.set_version(base + 1);
            store.put(node).map_err(WorkspaceError::from)?;
        }
        for id in &removals {
            store.remove(id).map_err(WorkspaceError::from)?;
        }
        Ok(())
    }

    /// True if both handles publish into the same store.
    pub(crate) fn same_store(&self, other: &Workspace) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    fn read_store(&self) -> RwLockReadGuard<'_, Box<dyn Store>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> RwLockWriteGuard<'_, Box<dyn Store>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn root_missing(&self) -> WorkspaceError {
        WorkspaceError::RootMissing {
            workspace: self.name.to_string(),
        }
    }

    fn node_not_found(&self, id: NodeId) -> WorkspaceError {
        WorkspaceError::NodeNotFound {
            workspace: self.name.to_string(),
            id,
        }
    }
}

/// Reassign same-name-sibling indexes among `name`d children of a parent.
///
/// A sole child carries no index; duplicated names are numbered 1..n in
/// child-list order. Index maintenance does not count as a touch, so only
/// the name segment of a rewritten record changes, not its version.
fn renumber_siblings(
    store: &mut dyn Store,
    parent_id: &NodeId,
    name: &Name,
) -> Result<(), WorkspaceError> {
    let Some(parent) = store.get(parent_id) else {
        return Ok(());
    };
    let mut matching = Vec::new();
    for child_id in parent.children() {
        if let Some(child) = store.get(child_id) {
            if child.name().map(Segment::name) == Some(name) {
                matching.push(child);
            }
        }
    }
    let total = matching.len();
    for (position, mut child) in matching.into_iter().enumerate() {
        let desired = if total == 1 {
            None
        } else {
            Some(position as u32 + 1)
        };
        let Some(segment) = child.name().cloned() else {
            continue;
        };
        if segment.index() != desired {
            child.set_name(Some(segment.reindexed(desired)));
            store.put(child)?;
        }
    }
    Ok(())
}

/// Find the child of `parent` matching `segment`, index 1 and no index
/// being equivalent.
fn child_matching(store: &dyn Store, parent: &Node, segment: &Segment) -> Option<Node> {
    for child_id in parent.children() {
        let Some(child) = store.get(child_id) else {
            warn!(node = %child_id, "child record missing from store");
            continue;
        };
        if child.name().is_some_and(|name| name.matches(segment)) {
            return Some(child);
        }
    }
    None
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("name", &self.name)
            .field("root_id", &self.root_id)
            .finish_non_exhaustive()
    }
}
