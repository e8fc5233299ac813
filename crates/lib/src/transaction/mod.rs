//! Transactions, the unit of change.
//!
//! A [`Transaction`] stages mutations against one or more workspaces of a
//! repository without touching their committed trees. Every operation
//! names the workspace it works on; reads see the transaction's own staged
//! changes layered over the committed state, while other transactions and
//! direct workspace readers see nothing until [`Transaction::commit`]
//! publishes the changes workspace by workspace.
//!
//! Transactions are single-owner values: staging takes `&mut self`, and
//! commit and rollback consume the transaction, so a finished transaction
//! cannot be used again by construction.
//!
//! Node handles returned by transaction reads are plain copies. Structural
//! operations revalidate a handle against the staged state and fail with
//! [`TransactionError::StaleReference`] when its parent, name, or children
//! have changed since the handle was obtained; mutating operations return
//! the updated record, so chained mutations always have a fresh handle to
//! work with.

mod errors;


use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, info, warn};

pub use errors::TransactionError;

use crate::context::Context;
use crate::node::{Node, NodeId, Property};
use crate::path::{Name, Path, Segment};
use crate::repository::{ConflictBehavior, Repository};
use crate::workspace::{Workspace, WorkspaceError};

/// Whether a transaction may stage changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionMode {
    #[default]
    ReadWrite,
    ReadOnly,
}

/// Where to find a node: by identity or by absolute path.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Id(NodeId),
    Path(Path),
}

impl From<NodeId> for Location {
    fn from(id: NodeId) -> Self {
        Location::Id(id)
    }
}

impl From<&NodeId> for Location {
    fn from(id: &NodeId) -> Self {
        Location::Id(*id)
    }
}

impl From<Path> for Location {
    fn from(path: Path) -> Self {
        Location::Path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.clone())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Id(id) => write!(f, "node {id}"),
            Location::Path(path) => write!(f, "{path}"),
        }
    }
}

/// Staged state for one workspace.
#[derive(Debug)]
struct WorkspaceChanges {
    workspace: Workspace,
    changed: HashMap<NodeId, Node>,
    removed: HashSet<NodeId>,
    remove_all: bool,
}

impl WorkspaceChanges {
    fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            changed: HashMap::new(),
            removed: HashSet::new(),
            remove_all: false,
        }
    }

    /// The staged view of a record: removals win, then staged records,
    /// then the committed state unless the whole workspace was wiped.
    fn find(&self, id: &NodeId) -> Option<Node> {
        if self.removed.contains(id) {
            return None;
        }
        if let Some(node) = self.changed.get(id) {
            return Some(node.clone());
        }
        if self.remove_all {
            return None;
        }
        self.workspace.node(id)
    }

    fn stage(&mut self, node: Node) {
        self.removed.remove(&node.id());
        self.changed.insert(node.id(), node);
    }

    fn stage_removed(&mut self, id: NodeId) {
        self.changed.remove(&id);
        self.removed.insert(id);
    }

    /// True if this transaction removed the record, as opposed to it never
    /// having existed.
    fn hides(&self, id: &NodeId) -> bool {
        if self.removed.contains(id) {
            return true;
        }
        self.remove_all && !self.changed.contains_key(id) && self.workspace.node(id).is_some()
    }

    fn is_dirty(&self) -> bool {
        self.remove_all || !self.changed.is_empty() || !self.removed.is_empty()
    }

    /// Upper bound on tree depth, used to stop walking corrupt parent
    /// chains.
    fn walk_limit(&self) -> usize {
        self.workspace.len() + self.changed.len() + 1
    }
}

/// A set of staged changes against the workspaces of one repository.
#[derive(Debug)]
pub struct Transaction {
    repository: Repository,
    context: Context,
    mode: TransactionMode,
    changes: HashMap<String, WorkspaceChanges>,
}

impl Transaction {
    pub(crate) fn new(repository: Repository, context: Context, mode: TransactionMode) -> Self {
        Self {
            repository,
            context,
            mode,
            changes: HashMap::new(),
        }
    }

    /// The context this transaction runs under.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn mode(&self) -> TransactionMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == TransactionMode::ReadOnly
    }

    /// True if any workspace has staged changes.
    pub fn has_staged_changes(&self) -> bool {
        self.changes.values().any(WorkspaceChanges::is_dirty)
    }

    /// Resolve a location to a node, seeing this transaction's changes.
    pub fn get_node(&self, workspace: &str, location: impl Into<Location>) -> crate::Result<Node> {
        match location.into() {
            Location::Id(id) => self.node_by_id(workspace, &id),
            Location::Path(path) => self.node_at(workspace, &path),
        }
    }

    /// Look a node up by identity, seeing this transaction's changes.
    pub fn node_by_id(&self, workspace: &str, id: &NodeId) -> crate::Result<Node> {
        let (ws, changes) = self.reader(workspace)?;
        find_node(&ws, changes, id).ok_or_else(|| {
            TransactionError::NodeNotFound {
                workspace: workspace.to_owned(),
                id: *id,
            }
            .into()
        })
    }

    /// Resolve an absolute path, seeing this transaction's changes.
    pub fn node_at(&self, workspace: &str, path: &Path) -> crate::Result<Node> {
        let (ws, changes) = self.reader(workspace)?;
        resolve_path(&ws, changes, path)
    }

    /// The children of a node in order, seeing this transaction's changes.
    pub fn children(&self, workspace: &str, node: &Node) -> crate::Result<Vec<Node>> {
        let (ws, changes) = self.reader(workspace)?;
        let current = current_record(&ws, changes, node)?;
        let mut out = Vec::with_capacity(current.children().len());
        for child_id in current.children() {
            if let Some(child) = find_node(&ws, changes, child_id) {
                out.push(child);
            }
        }
        Ok(out)
    }

    /// The absolute path of a node in the staged state.
    pub fn path_for(&self, workspace: &str, id: &NodeId) -> crate::Result<Path> {
        let (ws, changes) = self.reader(workspace)?;
        let start = find_node(&ws, changes, id).ok_or_else(|| node_missing(workspace, *id))?;
        let limit = changes
            .map(WorkspaceChanges::walk_limit)
            .unwrap_or_else(|| ws.len() + 1);
        let mut segments = Vec::new();
        let mut cursor = start;
        while let Some(parent_id) = cursor.parent() {
            let segment = cursor
                .name()
                .cloned()
                .ok_or(WorkspaceError::UnnamedNode { id: cursor.id() })?;
            segments.push(segment);
            if segments.len() > limit {
                return Err(node_missing(workspace, parent_id).into());
            }
            cursor = find_node(&ws, changes, &parent_id)
                .ok_or_else(|| node_missing(workspace, parent_id))?;
        }
        segments.reverse();
        Ok(Path::absolute_from(segments))
    }

    /// Stage a new child of `parent`.
    ///
    /// `index` is the position in the parent's ordered child list, not a
    /// same-name-sibling index; those are assigned automatically. `None`
    /// appends. Returns the staged child record.
    pub fn add_child(
        &mut self,
        workspace: &str,
        parent: &Node,
        name: Name,
        index: Option<usize>,
        properties: Vec<Property>,
    ) -> crate::Result<Node> {
        let wc = self.writer(workspace)?;
        let mut parent_record = current_record(&wc.workspace, Some(&*wc), parent)?;
        let position = index.unwrap_or(parent_record.children().len());
        if position > parent_record.children().len() {
            return Err(TransactionError::ChildIndexOutOfBounds {
                index: position,
                len: parent_record.children().len(),
            }
            .into());
        }

        let child_id = NodeId::random();
        let mut child = Node::new(child_id, parent_record.id(), Segment::new(name.clone()));
        for property in properties {
            child.set_property(property);
        }
        parent_record.children_mut().insert(position, child_id);
        let parent_id = parent_record.id();
        wc.stage(parent_record);
        wc.stage(child);
        renumber_siblings(wc, &parent_id, &name)?;
        self.staged_record(workspace, child_id)
    }

    /// Stage property changes on a node.
    ///
    /// Removals apply after `remove_all_existing` and before `to_set`.
    /// Returns the staged record; since properties are not structural,
    /// the caller's existing handle also stays valid.
    pub fn set_properties(
        &mut self,
        workspace: &str,
        node: &Node,
        to_set: Vec<Property>,
        to_remove: Vec<Name>,
        remove_all_existing: bool,
    ) -> crate::Result<Node> {
        let wc = self.writer(workspace)?;
        let mut current = current_record(&wc.workspace, Some(&*wc), node)?;
        if remove_all_existing {
            current.clear_properties();
        }
        for name in &to_remove {
            current.remove_property(name);
        }
        for property in to_set {
            current.set_property(property);
        }
        wc.stage(current.clone());
        Ok(current)
    }

    /// Stage removal of a node and its whole subtree.
    ///
    /// Removing the root wipes the workspace: all staged work for it is
    /// discarded and a fresh, empty root is staged under the same
    /// identity.
    pub fn remove_node(&mut self, workspace: &str, node: &Node) -> crate::Result<()> {
        let wc = self.writer(workspace)?;
        let current = current_record(&wc.workspace, Some(&*wc), node)?;

        let Some(parent_id) = current.parent() else {
            let root_id = wc.workspace.root_id();
            wc.changed.clear();
            wc.removed.clear();
            wc.remove_all = true;
            wc.stage(Node::new_root(root_id));
            return Ok(());
        };

        let mut subtree = Vec::new();
        let mut stack = vec![current.clone()];
        while let Some(record) = stack.pop() {
            for child_id in record.children() {
                if let Some(child) = wc.find(child_id) {
                    stack.push(child);
                }
            }
            subtree.push(record.id());
        }

        let mut parent = wc
            .find(&parent_id)
            .ok_or_else(|| node_missing(workspace, parent_id))?;
        parent.children_mut().retain(|id| *id != current.id());
        wc.stage(parent);
        let removed_name = current.name().map(|segment| segment.name().clone());
        for id in subtree {
            wc.stage_removed(id);
        }
        if let Some(name) = removed_name {
            renumber_siblings(wc, &parent_id, &name)?;
        }
        Ok(())
    }

    /// Stage a move of `node` under `new_parent`.
    ///
    /// `before` positions the node in front of an existing child of
    /// `new_parent`, `None` appends; `new_name` renames it in passing.
    /// Returns the staged record at its new location; stacking moves works
    /// by passing each returned record to the next call.
    pub fn move_node(
        &mut self,
        workspace: &str,
        node: &Node,
        new_parent: &Node,
        before: Option<&Node>,
        new_name: Option<Name>,
    ) -> crate::Result<Node> {
        let wc = self.writer(workspace)?;
        let mut current = current_record(&wc.workspace, Some(&*wc), node)?;
        let Some(old_parent_id) = current.parent() else {
            return Err(TransactionError::CannotMoveRoot {
                workspace: workspace.to_owned(),
            }
            .into());
        };
        let target_parent = current_record(&wc.workspace, Some(&*wc), new_parent)?;
        let target_id = target_parent.id();

        // Walk up from the target; finding the moved node on the way means
        // the move would put a node inside its own subtree.
        let mut cursor = Some(target_parent.clone());
        let mut steps = 0;
        let limit = wc.walk_limit();
        while let Some(record) = cursor {
            if record.id() == current.id() {
                return Err(TransactionError::CannotMoveIntoSubtree {
                    id: current.id(),
                    target: target_id,
                }
                .into());
            }
            steps += 1;
            if steps > limit {
                break;
            }
            cursor = record.parent().and_then(|id| wc.find(&id));
        }

        let old_name = current.name().map(|segment| segment.name().clone());
        let new_name = match new_name.or_else(|| old_name.clone()) {
            Some(name) => name,
            None => return Err(TransactionError::NameRequired { id: current.id() }.into()),
        };

        if old_parent_id == target_id {
            let mut parent = target_parent;
            parent.children_mut().retain(|id| *id != current.id());
            let position = position_for(&parent, before)?;
            parent.children_mut().insert(position, current.id());
            wc.stage(parent);
        } else {
            let mut parent = target_parent;
            let position = position_for(&parent, before)?;
            let mut old_parent = wc
                .find(&old_parent_id)
                .ok_or_else(|| node_missing(workspace, old_parent_id))?;
            old_parent.children_mut().retain(|id| *id != current.id());
            wc.stage(old_parent);
            parent.children_mut().insert(position, current.id());
            wc.stage(parent);
        }

        current.set_parent(Some(target_id));
        current.set_name(Some(Segment::new(new_name.clone())));
        let moved_id = current.id();
        wc.stage(current);

        if let Some(old_name) = old_name {
            renumber_siblings(wc, &old_parent_id, &old_name)?;
        }
        renumber_siblings(wc, &target_id, &new_name)?;
        self.staged_record(workspace, moved_id)
    }

    /// Stage a copy of `source` under `target_parent`, appended at the
    /// end of its child list.
    ///
    /// Source and target may be in different workspaces. A recursive copy
    /// takes the whole subtree; otherwise only the one node is copied,
    /// childless. Every copied node receives a fresh identity; reference
    /// properties pointing inside the copied subtree are re-pointed at the
    /// corresponding copies, while references to outside nodes are
    /// preserved. Returns the staged copy of the subtree top.
    pub fn copy_node(
        &mut self,
        source_workspace: &str,
        source: &Node,
        target_workspace: &str,
        target_parent: &Node,
        new_name: Option<Name>,
        recursive: bool,
    ) -> crate::Result<Node> {
        // Read phase: collect the source records, parents before children.
        let (source_ws, source_changes) = self.reader(source_workspace)?;
        let source_record = current_record(&source_ws, source_changes, source)?;
        let top_name = match new_name {
            Some(name) => name,
            None => match source_record.name() {
                Some(segment) => segment.name().clone(),
                None => {
                    return Err(TransactionError::NameRequired {
                        id: source_record.id(),
                    }
                    .into());
                }
            },
        };
        let source_top_id = source_record.id();
        let mut subtree = Vec::new();
        let mut stack = vec![source_record];
        while let Some(record) = stack.pop() {
            if recursive {
                for child_id in record.children() {
                    if let Some(child) = find_node(&source_ws, source_changes, child_id) {
                        stack.push(child);
                    }
                }
            }
            subtree.push(record);
        }

        // Write phase.
        let wc = self.writer(target_workspace)?;
        let mut target_record = current_record(&wc.workspace, Some(&*wc), target_parent)?;

        let top_copy_id = NodeId::random();
        let mut id_map = HashMap::with_capacity(subtree.len());
        id_map.insert(source_top_id, top_copy_id);
        for record in subtree.iter().skip(1) {
            id_map.insert(record.id(), NodeId::random());
        }

        for (position_in_subtree, record) in subtree.into_iter().enumerate() {
            let Some(new_id) = id_map.get(&record.id()).copied() else {
                continue;
            };
            let (new_parent_id, segment) = if position_in_subtree == 0 {
                (target_record.id(), Segment::new(top_name.clone()))
            } else {
                let Some(mapped_parent) =
                    record.parent().and_then(|id| id_map.get(&id)).copied()
                else {
                    continue;
                };
                let Some(segment) = record.name().cloned() else {
                    continue;
                };
                (mapped_parent, segment)
            };
            let mut copy = Node::new(new_id, new_parent_id, segment);
            for property in record.properties() {
                copy.set_property(property.clone());
            }
            copy.remap_references(&id_map);
            let children: Vec<NodeId> = record
                .children()
                .iter()
                .filter_map(|id| id_map.get(id))
                .copied()
                .collect();
            *copy.children_mut() = children;
            wc.stage(copy);
        }

        target_record.children_mut().push(top_copy_id);
        let target_parent_id = target_record.id();
        wc.stage(target_record);
        renumber_siblings(wc, &target_parent_id, &top_name)?;
        self.staged_record(target_workspace, top_copy_id)
    }

    /// Create a workspace. Takes effect immediately, not at commit.
    ///
    /// On a name collision the outcome follows `behavior`: fail, skip
    /// (`Ok(None)`), or adopt the existing workspace.
    pub fn create_workspace(
        &mut self,
        name: &str,
        behavior: ConflictBehavior,
    ) -> crate::Result<Option<Workspace>> {
        self.ensure_writable()?;
        self.repository.create_workspace(name, behavior)
    }

    /// Create a workspace as a deep copy of an existing one. Takes effect
    /// immediately, not at commit.
    ///
    /// The clone shares the root identity, as all workspaces of a
    /// repository do, but every other node receives a fresh identity.
    pub fn clone_workspace(
        &mut self,
        source: &str,
        name: &str,
        behavior: ConflictBehavior,
    ) -> crate::Result<Option<Workspace>> {
        self.ensure_writable()?;
        self.repository.clone_workspace(source, name, behavior)
    }

    /// Destroy a workspace. Takes effect immediately, not at commit.
    ///
    /// Staged changes this transaction held for the destroyed workspace
    /// are discarded.
    pub fn destroy_workspace(&mut self, name: &str) -> crate::Result<()> {
        self.ensure_writable()?;
        self.repository.destroy_workspace(name)?;
        self.changes.remove(name);
        Ok(())
    }

    /// Publish all staged changes, one workspace at a time.
    ///
    /// Before anything is written, every touched workspace is checked to
    /// still exist and still be backed by the store the changes were
    /// staged against; a workspace destroyed (or destroyed and recreated)
    /// since staging fails the whole commit up front. Each workspace then
    /// publishes atomically under its store's write lock; distinct
    /// workspaces are not written as one atomic unit.
    pub fn commit(self) -> crate::Result<()> {
        for (name, wc) in &self.changes {
            let valid = self
                .repository
                .workspace(name)
                .is_some_and(|current| current.same_store(&wc.workspace));
            if !valid {
                warn!(
                    context = %self.context,
                    workspace = %name,
                    "commit aborted, workspace no longer valid"
                );
                return Err(TransactionError::InvalidWorkspace { name: name.clone() }.into());
            }
        }
        for (name, wc) in self.changes {
            if !wc.is_dirty() {
                continue;
            }
            let WorkspaceChanges {
                workspace,
                changed,
                removed,
                remove_all,
            } = wc;
            let changed_count = changed.len();
            let removed_count = removed.len();
            workspace.apply(
                remove_all,
                changed.into_values().collect(),
                removed.into_iter().collect(),
            )?;
            info!(
                context = %self.context,
                workspace = %name,
                changed = changed_count,
                removed = removed_count,
                remove_all,
                "committed staged changes"
            );
        }
        Ok(())
    }

    /// Discard all staged changes.
    pub fn rollback(self) {
        let staged: usize = self
            .changes
            .values()
            .map(|wc| wc.changed.len() + wc.removed.len())
            .sum();
        debug!(
            context = %self.context,
            workspaces = self.changes.len(),
            staged,
            "rolled back transaction"
        );
    }

    /// The workspace handle and, if present, this transaction's staged
    /// changes for it.
    fn reader(&self, workspace: &str) -> Result<(Workspace, Option<&WorkspaceChanges>), TransactionError> {
        if let Some(wc) = self.changes.get(workspace) {
            return Ok((wc.workspace.clone(), Some(wc)));
        }
        let ws = self
            .repository
            .workspace(workspace)
            .ok_or_else(|| TransactionError::InvalidWorkspace {
                name: workspace.to_owned(),
            })?;
        Ok((ws, None))
    }

    /// The staged changes for a workspace, created on first use.
    fn writer(&mut self, workspace: &str) -> Result<&mut WorkspaceChanges, TransactionError> {
        self.ensure_writable()?;
        match self.changes.entry(workspace.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let ws = self.repository.workspace(workspace).ok_or_else(|| {
                    TransactionError::InvalidWorkspace {
                        name: workspace.to_owned(),
                    }
                })?;
                Ok(entry.insert(WorkspaceChanges::new(ws)))
            }
        }
    }

    fn ensure_writable(&self) -> Result<(), TransactionError> {
        match self.mode {
            TransactionMode::ReadWrite => Ok(()),
            TransactionMode::ReadOnly => Err(TransactionError::ReadOnly),
        }
    }

    /// Re-read a record that was just staged.
    fn staged_record(&self, workspace: &str, id: NodeId) -> crate::Result<Node> {
        self.changes
            .get(workspace)
            .and_then(|wc| wc.find(&id))
            .ok_or_else(|| node_missing(workspace, id).into())
    }
}

fn node_missing(workspace: &str, id: NodeId) -> TransactionError {
    TransactionError::NodeNotFound {
        workspace: workspace.to_owned(),
        id,
    }
}

/// A record as this transaction sees it.
fn find_node(workspace: &Workspace, changes: Option<&WorkspaceChanges>, id: &NodeId) -> Option<Node> {
    match changes {
        Some(wc) => wc.find(id),
        None => workspace.node(id),
    }
}

/// Revalidate a node handle against the staged state.
///
/// Returns the current record on success. A handle whose node this
/// transaction removed, or whose parent, name, or child list no longer
/// match, is stale; a handle to a node that never existed is not found.
fn current_record(
    workspace: &Workspace,
    changes: Option<&WorkspaceChanges>,
    handle: &Node,
) -> Result<Node, TransactionError> {
    let Some(current) = find_node(workspace, changes, &handle.id()) else {
        let removed_here = changes.is_some_and(|wc| wc.hides(&handle.id()));
        return Err(if removed_here {
            TransactionError::StaleReference { id: handle.id() }
        } else {
            TransactionError::NodeNotFound {
                workspace: workspace.name().to_owned(),
                id: handle.id(),
            }
        });
    };
    if current.parent() != handle.parent()
        || current.name() != handle.name()
        || current.children() != handle.children()
    {
        return Err(TransactionError::StaleReference { id: handle.id() });
    }
    Ok(current)
}

/// Resolve an absolute path through the staged state.
fn resolve_path(
    workspace: &Workspace,
    changes: Option<&WorkspaceChanges>,
    path: &Path,
) -> crate::Result<Node> {
    if !path.is_absolute() {
        return Err(WorkspaceError::AbsolutePathRequired {
            path: path.to_string(),
        }
        .into());
    }
    let canonical = path.canonicalize()?;
    let mut current =
        find_node(workspace, changes, &workspace.root_id()).ok_or_else(|| {
            WorkspaceError::RootMissing {
                workspace: workspace.name().to_owned(),
            }
        })?;
    let mut walked = Path::root();
    for segment in canonical.iter() {
        let mut next = None;
        for child_id in current.children() {
            if let Some(child) = find_node(workspace, changes, child_id) {
                if child.name().is_some_and(|name| name.matches(segment)) {
                    next = Some(child);
                    break;
                }
            }
        }
        match next {
            Some(child) => {
                walked = walked.append(segment.clone());
                current = child;
            }
            None => {
                return Err(TransactionError::PathNotFound {
                    workspace: workspace.name().to_owned(),
                    path: canonical.to_string(),
                    lowest_existing: walked.to_string(),
                }
                .into());
            }
        }
    }
    Ok(current)
}

/// Reassign same-name-sibling indexes among `name`d children of a parent.
///
/// A sole child carries no index; duplicated names are numbered 1..n in
/// child-list order. Only records whose index actually changes are staged.
fn renumber_siblings(
    wc: &mut WorkspaceChanges,
    parent_id: &NodeId,
    name: &Name,
) -> Result<(), TransactionError> {
    let parent = wc.find(parent_id).ok_or_else(|| TransactionError::NodeNotFound {
        workspace: wc.workspace.name().to_owned(),
        id: *parent_id,
    })?;
    let mut matching = Vec::new();
    for child_id in parent.children() {
        if let Some(child) = wc.find(child_id) {
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
            wc.stage(child);
        }
    }
    Ok(())
}

/// The insert position for `before` in a parent's child list.
fn position_for(parent: &Node, before: Option<&Node>) -> Result<usize, TransactionError> {
    match before {
        None => Ok(parent.children().len()),
        Some(sibling) => parent
            .children()
            .iter()
            .position(|id| *id == sibling.id())
            .ok_or(TransactionError::NotASibling {
                id: sibling.id(),
                parent: parent.id(),
            }),
    }
}
