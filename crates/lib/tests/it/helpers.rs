//! Shared fixtures for the integration suite.

use xylem::{Context, Name, Node, Path, Repository, Transaction, TransactionMode};

/// The workspace every repository starts with.
pub const WS: &str = "default";

pub fn test_repository() -> Repository {
    Repository::new("it")
}

pub fn write_txn(repo: &Repository) -> Transaction {
    repo.start_transaction(&Context::with_actor("it"), TransactionMode::ReadWrite)
}

pub fn read_txn(repo: &Repository) -> Transaction {
    repo.start_transaction(&Context::with_actor("it"), TransactionMode::ReadOnly)
}

pub fn name(text: &str) -> Name {
    Name::new(text).expect("test name is well-formed")
}

pub fn path(text: &str) -> Path {
    Path::parse(text).expect("test path is well-formed")
}

/// Stage every missing node along the given absolute paths.
pub fn build_tree(txn: &mut Transaction, workspace: &str, paths: &[&str]) {
    for text in paths {
        let target = path(text);
        let mut walked = Path::root();
        for segment in target.iter() {
            let next = walked.append(segment.clone());
            if txn.node_at(workspace, &next).is_err() {
                let parent = txn
                    .node_at(workspace, &walked)
                    .expect("ancestors are created first");
                txn.add_child(workspace, &parent, segment.name().clone(), None, vec![])
                    .expect("fresh child under an existing parent");
            }
            walked = next;
        }
    }
}

/// The single text value of a property, if present.
pub fn text_property(node: &Node, name: &Name) -> Option<String> {
    node.property(name)?.first()?.as_text().map(str::to_owned)
}
