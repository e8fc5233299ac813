//! Workspace lifecycle, isolation, and cloning through the public API.

use std::collections::HashSet;

use xylem::{ConflictBehavior, NodeId, Path};

use crate::helpers::{WS, build_tree, path, test_repository, write_txn};

#[test]
fn test_unknown_workspace_is_invalid() {
    let repo = test_repository();
    let txn = write_txn(&repo);
    let err = txn.node_at("nope", &Path::root()).unwrap_err();
    assert!(err.is_invalid_workspace());
    assert_eq!(err.module(), "transaction");
}

#[test]
fn test_workspaces_share_only_the_root_identity() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    txn.create_workspace("scratch", ConflictBehavior::Fail)
        .unwrap();
    build_tree(&mut txn, WS, &["/thing/part"]);
    build_tree(&mut txn, "scratch", &["/thing/part"]);
    txn.commit().unwrap();

    let default_ids: HashSet<NodeId> = repo
        .default_workspace()
        .nodes()
        .iter()
        .map(|node| node.id())
        .collect();
    let scratch_ids: HashSet<NodeId> = repo
        .workspace("scratch")
        .unwrap()
        .nodes()
        .iter()
        .map(|node| node.id())
        .collect();

    let shared: Vec<NodeId> = default_ids.intersection(&scratch_ids).copied().collect();
    assert_eq!(shared, vec![repo.root_id()]);

    // Mutating one tree never shows up in the other.
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/only-here"]);
    txn.commit().unwrap();
    assert!(
        repo.workspace("scratch")
            .unwrap()
            .node_at(&path("/only-here"))
            .is_err()
    );
}

#[test]
fn test_cloned_workspace_diverges_from_its_source() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library/book"]);
    txn.commit().unwrap();

    let mut txn = write_txn(&repo);
    let clone = txn
        .clone_workspace(WS, "copy", ConflictBehavior::Fail)
        .unwrap()
        .unwrap();
    txn.rollback();

    // Same shape, fresh identities below the shared root.
    assert_eq!(clone.root_id(), repo.root_id());
    let source_book = repo
        .default_workspace()
        .node_at(&path("/library/book"))
        .unwrap();
    let clone_book = clone.node_at(&path("/library/book")).unwrap();
    assert_ne!(clone_book.id(), source_book.id());

    // Changes after the clone stay on their own side.
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library/pamphlet"]);
    build_tree(&mut txn, "copy", &["/library/errata"]);
    txn.commit().unwrap();

    assert!(clone.node_at(&path("/library/pamphlet")).is_err());
    assert!(clone.node_at(&path("/library/errata")).is_ok());
    assert!(
        repo.default_workspace()
            .node_at(&path("/library/errata"))
            .is_err()
    );
}

#[test]
fn test_commit_fails_after_workspace_destruction() {
    let repo = test_repository();
    let mut admin = write_txn(&repo);
    admin
        .create_workspace("extra", ConflictBehavior::Fail)
        .unwrap();
    admin.rollback();

    let mut txn = write_txn(&repo);
    build_tree(&mut txn, "extra", &["/pending"]);

    let mut admin = write_txn(&repo);
    admin.destroy_workspace("extra").unwrap();
    admin.rollback();

    let err = txn.commit().unwrap_err();
    assert!(err.is_invalid_workspace());
}

#[test]
fn test_destroy_guards_surface_conflicts() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);

    // The sole workspace, then the default one.
    let err = txn.destroy_workspace(WS).unwrap_err();
    assert!(err.is_conflict());

    txn.create_workspace("extra", ConflictBehavior::Fail)
        .unwrap();
    let err = txn.destroy_workspace(WS).unwrap_err();
    assert!(err.is_conflict());

    txn.destroy_workspace("extra").unwrap();
    let err = txn.destroy_workspace("extra").unwrap_err();
    assert!(err.is_invalid_workspace());
    txn.rollback();
}
