//! Path addressing against committed workspace trees.

use xylem::{Path, Property};

use crate::helpers::{WS, build_tree, name, path, test_repository, write_txn};

#[test]
fn test_committed_tree_resolves_paths() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(
        &mut txn,
        WS,
        &["/library/fiction/novel", "/library/poetry"],
    );
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    assert_eq!(ws.len(), 5);
    assert_eq!(ws.node_at(&Path::root()).unwrap().id(), repo.root_id());

    let novel = ws.node_at(&path("/library/fiction/novel")).unwrap();
    assert_eq!(
        ws.path_for(&novel.id()).unwrap().to_string(),
        "/library/fiction/novel"
    );

    // Self and parent references are eliminated before the walk.
    let twisted = ws
        .node_at(&path("/library/./poetry/../fiction/novel"))
        .unwrap();
    assert_eq!(twisted.id(), novel.id());
}

#[test]
fn test_same_name_siblings_number_in_order() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library"]);
    let library = txn.node_at(WS, &path("/library")).unwrap();
    let first = txn
        .add_child(WS, &library, name("entry"), None, vec![])
        .unwrap();
    let library = txn.node_at(WS, &path("/library")).unwrap();
    let second = txn
        .add_child(WS, &library, name("entry"), None, vec![])
        .unwrap();
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    assert_eq!(
        ws.node_at(&path("/library/entry[1]")).unwrap().id(),
        first.id()
    );
    assert_eq!(
        ws.node_at(&path("/library/entry[2]")).unwrap().id(),
        second.id()
    );
    // A bare name addresses the first sibling.
    assert_eq!(ws.node_at(&path("/library/entry")).unwrap().id(), first.id());

    // Removing the first sibling collapses the survivor's index.
    let mut txn = write_txn(&repo);
    let doomed = txn.node_at(WS, &path("/library/entry[1]")).unwrap();
    txn.remove_node(WS, &doomed).unwrap();
    txn.commit().unwrap();

    let survivor = ws.node_at(&path("/library/entry")).unwrap();
    assert_eq!(survivor.id(), second.id());
    assert!(survivor.name().unwrap().index().is_none());
    assert_eq!(
        ws.path_for(&survivor.id()).unwrap().to_string(),
        "/library/entry"
    );
}

#[test]
fn test_missing_path_reports_not_found() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library"]);
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    let err = ws.node_at(&path("/library/ghost/leaf")).unwrap_err();
    assert!(err.is_node_not_found());
    assert!(err.is_not_found());
    assert_eq!(err.module(), "workspace");

    let err = ws.node_at(&path("relative")).unwrap_err();
    assert!(err.is_invalid_path());
}

#[test]
fn test_direct_writes_count_as_touches() {
    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library"]);
    txn.commit().unwrap();

    let ws = repo.default_workspace();
    let mut library = ws.node_at(&path("/library")).unwrap();
    assert_eq!(library.version(), 1);

    library.set_property(Property::single(name("kind"), "shelf"));
    let prior = ws.put_node(library).unwrap().unwrap();
    assert_eq!(prior.version(), 1);

    let current = ws.node_at(&path("/library")).unwrap();
    assert_eq!(current.version(), 2);
    assert!(current.property(&name("kind")).is_some());
}
