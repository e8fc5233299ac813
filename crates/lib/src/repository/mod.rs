//! Repositories, the top-level container.
//!
//! A [`Repository`] owns a named set of [`Workspace`]s and hands out
//! [`Transaction`]s against them. Every workspace of a repository shares
//! one root identity, allocated when the repository is opened; that is
//! what lets clones and cross-workspace copies keep node identities
//! meaningful across trees.
//!
//! A repository always has a default workspace. Further workspaces are
//! created empty, cloned from an existing one, or mounted from an
//! externally built store such as a loaded snapshot or a read-only
//! projection.
//!
//! `Repository` is a cheap handle: clones share the same workspace set,
//! and all methods take `&self`, so a repository can be shared across
//! threads freely.

mod errors;


use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

pub use errors::RepositoryError;

use crate::backend::{InMemoryStore, Store};
use crate::constants::DEFAULT_WORKSPACE;
use crate::context::Context;
use crate::node::NodeId;
use crate::transaction::{Transaction, TransactionMode};
use crate::workspace::Workspace;

/// What to do when a workspace name is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictBehavior {
    /// Fail with [`RepositoryError::WorkspaceAlreadyExists`].
    #[default]
    Fail,
    /// Leave the existing workspace alone and return nothing.
    Skip,
    /// Adopt the existing workspace instead of creating one.
    UseExisting,
}

/// Initial workspace layout of a repository.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Name of the workspace every repository starts with.
    pub default_workspace: String,
    /// Additional empty workspaces to create at open.
    pub predefined: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            default_workspace: DEFAULT_WORKSPACE.to_owned(),
            predefined: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct RepositoryInner {
    name: String,
    root_id: NodeId,
    default_workspace: Workspace,
    workspaces: RwLock<HashMap<String, Workspace>>,
}

/// A named set of workspaces sharing one root identity.
#[derive(Debug, Clone)]
pub struct Repository {
    inner: Arc<RepositoryInner>,
}

impl Repository {
    /// Open an empty repository with a default workspace.
    pub fn new(name: &str) -> Self {
        Self::with_config(name, RepositoryConfig::default())
    }

    /// Open an empty repository with an explicit workspace layout.
    pub fn with_config(name: &str, config: RepositoryConfig) -> Self {
        let root_id = NodeId::random();
        let default_workspace = Workspace::new(
            &config.default_workspace,
            Box::new(InMemoryStore::new(root_id)),
        );
        let mut workspaces = HashMap::new();
        workspaces.insert(config.default_workspace.clone(), default_workspace.clone());
        for predefined in &config.predefined {
            workspaces
                .entry(predefined.clone())
                .or_insert_with(|| Workspace::new(predefined, Box::new(InMemoryStore::new(root_id))));
        }
        info!(
            repository = name,
            root = %root_id,
            workspaces = workspaces.len(),
            "opened repository"
        );
        Self {
            inner: Arc::new(RepositoryInner {
                name: name.to_owned(),
                root_id,
                default_workspace,
                workspaces: RwLock::new(workspaces),
            }),
        }
    }

    /// The repository name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The root identity shared by every workspace.
    pub fn root_id(&self) -> NodeId {
        self.inner.root_id
    }

    /// The workspace this repository opened with.
    pub fn default_workspace(&self) -> Workspace {
        self.inner.default_workspace.clone()
    }

    /// Look a workspace up by name.
    pub fn workspace(&self, name: &str) -> Option<Workspace> {
        self.read_workspaces().get(name).cloned()
    }

    /// The current workspace names, sorted.
    ///
    /// A snapshot: workspaces created or destroyed afterwards are not
    /// reflected.
    pub fn workspace_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_workspaces().keys().cloned().collect();
        names.sort();
        names
    }

    /// Start a transaction against this repository.
    pub fn start_transaction(&self, context: &Context, mode: TransactionMode) -> Transaction {
        debug!(
            context = %context,
            repository = %self.inner.name,
            ?mode,
            "started transaction"
        );
        Transaction::new(self.clone(), context.clone(), mode)
    }

    /// Register an externally built store as a workspace.
    ///
    /// The store must carry the repository's root identity; snapshots
    /// loaded from disk and read-only projections are the usual sources.
    /// On a name collision the outcome follows `behavior`.
    pub fn mount_workspace(
        &self,
        name: &str,
        store: Box<dyn Store>,
        behavior: ConflictBehavior,
    ) -> crate::Result<Option<Workspace>> {
        if store.root_id() != self.inner.root_id {
            return Err(RepositoryError::RootMismatch {
                expected: self.inner.root_id,
                found: store.root_id(),
            }
            .into());
        }
        let mut workspaces = self.write_workspaces();
        if let Some(existing) = workspaces.get(name) {
            return resolve_conflict(name, existing, behavior);
        }
        let workspace = Workspace::new(name, store);
        workspaces.insert(name.to_owned(), workspace.clone());
        info!(repository = %self.inner.name, workspace = name, "mounted workspace");
        Ok(Some(workspace))
    }

    /// Create an empty workspace.
    pub(crate) fn create_workspace(
        &self,
        name: &str,
        behavior: ConflictBehavior,
    ) -> crate::Result<Option<Workspace>> {
        let mut workspaces = self.write_workspaces();
        if let Some(existing) = workspaces.get(name) {
            return resolve_conflict(name, existing, behavior);
        }
        let workspace = Workspace::new(name, Box::new(InMemoryStore::new(self.inner.root_id)));
        workspaces.insert(name.to_owned(), workspace.clone());
        info!(repository = %self.inner.name, workspace = name, "created workspace");
        Ok(Some(workspace))
    }

    /// Create a workspace as a structural copy of an existing one.
    ///
    /// The copy is taken as of the call. The root keeps the shared root
    /// identity; every other record receives a fresh one, with parents,
    /// child lists, and reference properties re-pointed to match.
    pub(crate) fn clone_workspace(
        &self,
        source: &str,
        name: &str,
        behavior: ConflictBehavior,
    ) -> crate::Result<Option<Workspace>> {
        let mut workspaces = self.write_workspaces();
        let Some(source_workspace) = workspaces.get(source).cloned() else {
            return Err(RepositoryError::InvalidWorkspace {
                name: source.to_owned(),
            }
            .into());
        };
        if let Some(existing) = workspaces.get(name) {
            return resolve_conflict(name, existing, behavior);
        }

        let records = source_workspace.nodes();
        let mut id_map = HashMap::with_capacity(records.len());
        id_map.insert(self.inner.root_id, self.inner.root_id);
        for record in &records {
            id_map.entry(record.id()).or_insert_with(NodeId::random);
        }
        let mut copies = Vec::with_capacity(records.len());
        for mut record in records {
            let Some(new_id) = id_map.get(&record.id()).copied() else {
                continue;
            };
            record.set_id(new_id);
            if let Some(parent) = record.parent() {
                match id_map.get(&parent).copied() {
                    Some(mapped) => record.set_parent(Some(mapped)),
                    None => continue,
                }
            }
            let children: Vec<NodeId> = record
                .children()
                .iter()
                .filter_map(|id| id_map.get(id))
                .copied()
                .collect();
            *record.children_mut() = children;
            record.remap_references(&id_map);
            record.set_version(1);
            copies.push(record);
        }

        let store = InMemoryStore::from_nodes(self.inner.root_id, copies)?;
        let workspace = Workspace::new(name, Box::new(store));
        workspaces.insert(name.to_owned(), workspace.clone());
        info!(
            repository = %self.inner.name,
            source,
            workspace = name,
            "cloned workspace"
        );
        Ok(Some(workspace))
    }

    /// Remove a workspace from the repository.
    ///
    /// The default workspace and the last remaining workspace are
    /// protected; the sole check runs first, so destroying the default
    /// when it is the only workspace reports it as the sole one.
    pub(crate) fn destroy_workspace(&self, name: &str) -> crate::Result<()> {
        let mut workspaces = self.write_workspaces();
        if !workspaces.contains_key(name) {
            return Err(RepositoryError::InvalidWorkspace {
                name: name.to_owned(),
            }
            .into());
        }
        if workspaces.len() == 1 {
            return Err(RepositoryError::CannotDestroySole {
                name: name.to_owned(),
            }
            .into());
        }
        if name == self.inner.default_workspace.name() {
            return Err(RepositoryError::CannotDestroyDefault {
                name: name.to_owned(),
            }
            .into());
        }
        workspaces.remove(name);
        info!(repository = %self.inner.name, workspace = name, "destroyed workspace");
        Ok(())
    }

    fn read_workspaces(&self) -> RwLockReadGuard<'_, HashMap<String, Workspace>> {
        self.inner
            .workspaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_workspaces(&self) -> RwLockWriteGuard<'_, HashMap<String, Workspace>> {
        self.inner
            .workspaces
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve_conflict(
    name: &str,
    existing: &Workspace,
    behavior: ConflictBehavior,
) -> crate::Result<Option<Workspace>> {
    match behavior {
        ConflictBehavior::Fail => Err(RepositoryError::WorkspaceAlreadyExists {
            name: name.to_owned(),
        }
        .into()),
        ConflictBehavior::Skip => Ok(None),
        ConflictBehavior::UseExisting => Ok(Some(existing.clone())),
    }
}
