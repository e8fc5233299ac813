//! Snapshot persistence and the metadata projection, end to end.

use xylem::backend::{ColumnMetadata, TableMetadata};
use xylem::{ConflictBehavior, InMemoryStore, MetadataStore, Name, Property, StaticMetadata};

use crate::helpers::{WS, build_tree, name, path, read_txn, test_repository, text_property, write_txn};

#[test]
fn test_snapshot_round_trip_through_mount() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("default.json");

    let repo = test_repository();
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library/fiction/novel"]);
    let novel = txn.node_at(WS, &path("/library/fiction/novel")).unwrap();
    txn.set_properties(
        WS,
        &novel,
        vec![Property::single(name("title"), "ulysses")],
        vec![],
        false,
    )
    .unwrap();
    txn.commit().unwrap();
    repo.default_workspace().save_to_file(&file).unwrap();

    // Later writes are not part of the snapshot.
    let mut txn = write_txn(&repo);
    build_tree(&mut txn, WS, &["/library/poetry"]);
    txn.commit().unwrap();

    let store = InMemoryStore::load_from_file(&file).unwrap();
    repo.mount_workspace("restored", Box::new(store), ConflictBehavior::Fail)
        .unwrap();

    let txn = read_txn(&repo);
    let restored = txn
        .node_at("restored", &path("/library/fiction/novel"))
        .unwrap();
    assert_eq!(restored.id(), novel.id());
    assert_eq!(restored.version(), 1);
    assert_eq!(
        text_property(&restored, &name("title")).as_deref(),
        Some("ulysses")
    );
    assert!(txn.node_at("restored", &path("/library/poetry")).is_err());
    assert!(txn.node_at(WS, &path("/library/poetry")).is_ok());
}

fn sample_catalog() -> StaticMetadata {
    let mut provider = StaticMetadata::new();
    provider.add_table(
        "inventory",
        "public",
        TableMetadata::new("books").with_table_type("TABLE"),
        vec![
            ColumnMetadata::new("id", "BIGINT").not_nullable(),
            ColumnMetadata::new("title", "VARCHAR").with_size(255),
        ],
    );
    provider
}

#[test]
fn test_metadata_catalog_browsable_by_path() {
    let repo = test_repository();
    let projected = MetadataStore::project(repo.root_id(), &sample_catalog()).unwrap();
    repo.mount_workspace("catalog", Box::new(projected), ConflictBehavior::Fail)
        .unwrap();

    let txn = read_txn(&repo);
    let books = txn
        .node_at("catalog", &path("/inventory/public/books"))
        .unwrap();
    let meta_type = Name::prefixed("meta", "type").unwrap();
    assert_eq!(text_property(&books, &meta_type).as_deref(), Some("table"));
    assert_eq!(txn.children("catalog", &books).unwrap().len(), 2);

    let title = txn
        .node_at("catalog", &path("/inventory/public/books/title"))
        .unwrap();
    let data_type = Name::prefixed("meta", "dataType").unwrap();
    assert_eq!(text_property(&title, &data_type).as_deref(), Some("VARCHAR"));
}

#[test]
fn test_metadata_workspace_rejects_commits() {
    let repo = test_repository();
    let projected = MetadataStore::project(repo.root_id(), &sample_catalog()).unwrap();
    repo.mount_workspace("catalog", Box::new(projected), ConflictBehavior::Fail)
        .unwrap();
    let records_before = repo.workspace("catalog").unwrap().len();

    // Staging succeeds; publishing hits the read-only store.
    let mut txn = write_txn(&repo);
    let root = txn.node_at("catalog", &path("/")).unwrap();
    txn.add_child("catalog", &root, name("intruder"), None, vec![])
        .unwrap();
    let err = txn.commit().unwrap_err();
    assert!(err.is_read_only());

    assert_eq!(repo.workspace("catalog").unwrap().len(), records_before);
}
