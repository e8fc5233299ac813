//! Staged mutation scenarios over the public transaction API.

use xylem::transaction::TransactionError;
use xylem::{ConflictBehavior, Error, Property, Value};

use crate::helpers::{
    WS, build_tree, name, path, read_txn, test_repository, text_property, write_txn,
};

#[test]
fn test_staged_changes_invisible_until_commit() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/draft"]);

    // The writer sees its own staging; nobody else does.
    assert!(txn.node_at(WS, &path("/draft")).is_ok());
    assert!(repo.default_workspace().node_at(&path("/draft")).is_err());
    let reader = read_txn(&repo);
    assert!(reader.node_at(WS, &path("/draft")).is_err());

    txn.commit().unwrap();
    assert!(repo.default_workspace().node_at(&path("/draft")).is_ok());
    let reader = read_txn(&repo);
    assert!(reader.node_at(WS, &path("/draft")).is_ok());
}

#[test]
fn test_rollback_discards_staged_changes() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/doomed/child"]);
    assert!(txn.has_staged_changes());
    txn.rollback();

    assert_eq!(repo.default_workspace().len(), 1);
    assert!(repo.default_workspace().node_at(&path("/doomed")).is_err());
}

#[test]
fn test_commit_bumps_versions_once() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    let root = txn.node_at(WS, &path("/")).unwrap();
    let doc = txn
        .add_child(
            WS,
            &root,
            name("doc"),
            None,
            vec![Property::single(name("title"), "first")],
        )
        .unwrap();
    txn.commit().unwrap();

    let committed = repo.default_workspace().node(&doc.id()).unwrap();
    assert_eq!(committed.version(), 1);

    // Two property writes in one transaction still count as one touch.
    let mut txn = write_txn(&repo);
    let doc = txn.node_at(WS, &path("/doc")).unwrap();
    let doc = txn
        .set_properties(
            WS,
            &doc,
            vec![Property::single(name("title"), "second")],
            vec![],
            false,
        )
        .unwrap();
    txn.set_properties(
        WS,
        &doc,
        vec![Property::single(name("author"), "someone")],
        vec![],
        false,
    )
    .unwrap();
    txn.commit().unwrap();

    let committed = repo.default_workspace().node(&doc.id()).unwrap();
    assert_eq!(committed.version(), 2);
    assert_eq!(
        text_property(&committed, &name("title")).as_deref(),
        Some("second")
    );
    assert!(committed.property(&name("author")).is_some());
}

#[test]
fn test_copied_subtree_is_independent() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/a/b/c", "/new"]);
    let c = txn.node_at(WS, &path("/a/b/c")).unwrap();
    let b = txn.node_at(WS, &path("/a/b")).unwrap();
    txn.set_properties(
        WS,
        &b,
        vec![Property::single(name("favorite"), Value::Reference(c.id()))],
        vec![],
        false,
    )
    .unwrap();
    txn.commit().unwrap();

    let mut txn = write_txn(&repo);
    let b = txn.node_at(WS, &path("/a/b")).unwrap();
    let target = txn.node_at(WS, &path("/new")).unwrap();
    let copy_b = txn.copy_node(WS, &b, WS, &target, None, true).unwrap();
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    let copy_c = ws.node_at(&path("/new/b/c")).unwrap();
    assert_ne!(copy_b.id(), b.id());
    assert_ne!(copy_c.id(), c.id());

    // The reference inside the copied subtree follows the copy.
    let favorite = ws
        .node(&copy_b.id())
        .unwrap()
        .property(&name("favorite"))
        .unwrap()
        .first()
        .unwrap()
        .as_reference();
    assert_eq!(favorite, Some(copy_c.id()));

    // Mutating the copy leaves the original alone.
    let mut txn = write_txn(&repo);
    let copy_c = txn.node_at(WS, &path("/new/b/c")).unwrap();
    txn.set_properties(
        WS,
        &copy_c,
        vec![Property::single(name("kind"), "duplicate")],
        vec![],
        false,
    )
    .unwrap();
    txn.commit().unwrap();

    let original = ws.node_at(&path("/a/b/c")).unwrap();
    assert!(original.property(&name("kind")).is_none());
    assert_eq!(original.version(), 1);
}

#[test]
fn test_shallow_copy_is_childless() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/a/b/c", "/new"]);
    let b = txn.node_at(WS, &path("/a/b")).unwrap();
    let target = txn.node_at(WS, &path("/new")).unwrap();
    let copy = txn
        .copy_node(WS, &b, WS, &target, Some(name("lone")), false)
        .unwrap();
    txn.commit().unwrap();

    let copy = repo.default_workspace().node(&copy.id()).unwrap();
    assert!(copy.children().is_empty());
    assert_eq!(
        repo.default_workspace()
            .path_for(&copy.id())
            .unwrap()
            .to_string(),
        "/new/lone"
    );
}

#[test]
fn test_stacked_moves_relocate_the_tree() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/a/b/c", "/d/e", "/new"]);
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    let b_id = ws.node_at(&path("/a/b")).unwrap().id();
    let c_id = ws.node_at(&path("/a/b/c")).unwrap().id();
    let d_id = ws.node_at(&path("/d")).unwrap().id();
    let e_id = ws.node_at(&path("/d/e")).unwrap().id();

    // Each move resolves against the staged result of the previous one.
    let mut txn = write_txn(&repo);
    let b = txn.node_at(WS, &path("/a/b")).unwrap();
    let target = txn.node_at(WS, &path("/new")).unwrap();
    txn.move_node(WS, &b, &target, None, None).unwrap();
    assert!(txn.node_at(WS, &path("/new/b/c")).is_ok());

    let c = txn.node_at(WS, &path("/new/b/c")).unwrap();
    let target = txn.node_at(WS, &path("/d")).unwrap();
    txn.move_node(WS, &c, &target, None, None).unwrap();
    assert!(txn.node_at(WS, &path("/d/c")).is_ok());

    let e = txn.node_at(WS, &path("/d/e")).unwrap();
    let target = txn.node_at(WS, &path("/d/c")).unwrap();
    txn.move_node(WS, &e, &target, None, None).unwrap();

    let d = txn.node_at(WS, &path("/d")).unwrap();
    let target = txn.node_at(WS, &path("/new/b")).unwrap();
    txn.move_node(WS, &d, &target, None, None).unwrap();
    txn.commit().unwrap();

    // Identities survive every relocation.
    assert_eq!(ws.node_at(&path("/new/b")).unwrap().id(), b_id);
    assert_eq!(ws.node_at(&path("/new/b/d")).unwrap().id(), d_id);
    assert_eq!(ws.node_at(&path("/new/b/d/c")).unwrap().id(), c_id);
    assert_eq!(ws.node_at(&path("/new/b/d/c/e")).unwrap().id(), e_id);
    assert_eq!(ws.path_for(&e_id).unwrap().to_string(), "/new/b/d/c/e");

    // Nothing was orphaned along the way.
    assert_eq!(ws.len(), 7);
    for node in ws.nodes() {
        assert!(ws.path_for(&node.id()).is_ok());
    }
}

#[test]
fn test_move_into_own_subtree_is_rejected() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/a/b"]);
    let a = txn.node_at(WS, &path("/a")).unwrap();
    let b = txn.node_at(WS, &path("/a/b")).unwrap();
    let err = txn.move_node(WS, &a, &b, None, None).unwrap_err();
    assert!(matches!(
        err,
        Error::Transaction(TransactionError::CannotMoveIntoSubtree { .. })
    ));
}

#[test]
fn test_structural_change_stales_old_handles() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    let stale_root = txn.node_at(WS, &path("/")).unwrap();
    build_tree(&mut txn, WS, &["/fresh"]);

    let err = txn.children(WS, &stale_root).unwrap_err();
    assert!(err.is_stale_reference());

    // A re-fetched handle works again.
    let root = txn.node_at(WS, &path("/")).unwrap();
    assert_eq!(txn.children(WS, &root).unwrap().len(), 1);
}

#[test]
fn test_read_only_transaction_rejects_staging() {
    let repo = test_repository();
    let mut txn = read_txn(&repo);
    let root = txn.node_at(WS, &path("/")).unwrap();
    let err = txn
        .add_child(WS, &root, name("nope"), None, vec![])
        .unwrap_err();
    assert!(err.is_read_only());
    assert!(!txn.has_staged_changes());
}

#[test]
fn test_commit_spans_workspaces() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/a/b"]);
    txn.commit().unwrap();

    let mut txn = write_txn(&repo);
    txn.create_workspace("archive", ConflictBehavior::Fail)
        .unwrap();
    let a = txn.node_at(WS, &path("/a")).unwrap();
    let archive_root = txn.node_at("archive", &path("/")).unwrap();
    let copy = txn
        .copy_node(WS, &a, "archive", &archive_root, None, true)
        .unwrap();
    txn.commit().unwrap();

    let archive = repo.workspace("archive").unwrap();
    assert_eq!(archive.node_at(&path("/a")).unwrap().id(), copy.id());
    assert!(archive.node_at(&path("/a/b")).is_ok());
    assert_ne!(copy.id(), a.id());
    // The source workspace is untouched by the cross-workspace copy.
    assert_eq!(repo.default_workspace().len(), 3);
}

#[test]
fn test_removing_root_wipes_the_workspace() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/a/b", "/c"]);
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    let root_version = ws.root().unwrap().version();

    let mut txn = write_txn(&repo);
    let root = txn.node_at(WS, &path("/")).unwrap();
    txn.remove_node(WS, &root).unwrap();
    let root = txn.node_at(WS, &path("/")).unwrap();
    assert!(root.children().is_empty());
    txn.add_child(WS, &root, name("seed"), None, vec![]).unwrap();
    txn.commit().unwrap();

    assert_eq!(ws.len(), 2);
    let root = ws.root().unwrap();
    assert_eq!(root.id(), repo.root_id());
    assert_eq!(root.version(), root_version + 1);
    assert!(ws.node_at(&path("/seed")).is_ok());
    assert!(ws.node_at(&path("/a")).is_err());
}
