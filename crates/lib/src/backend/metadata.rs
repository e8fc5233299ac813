//! Read-only projection of relational catalog metadata.
//!
//! A [`MetadataProvider`] describes a database the way JDBC metadata does:
//! catalogs containing schemas containing tables containing columns. The
//! [`MetadataStore`] materializes that description as a node tree
//! (`/<catalog>/<schema>/<table>/<column>`) whose records carry `meta:`
//! properties, so catalog structure can be browsed and queried with the
//! same path operations as any other workspace. The projected store
//! rejects writes.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use super::{BackendError, Store};
use crate::node::{Node, NodeId, Property};
use crate::path::{Name, Segment};

/// Description of a table, as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    pub name: String,
    /// The vendor's table kind, e.g. `TABLE` or `VIEW`.
    pub table_type: Option<String>,
    pub description: Option<String>,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_type: None,
            description: None,
        }
    }

    pub fn with_table_type(mut self, table_type: impl Into<String>) -> Self {
        self.table_type = Some(table_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Description of a column, as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    /// The vendor's type name, e.g. `VARCHAR` or `BIGINT`.
    pub data_type: String,
    pub size: Option<i64>,
    pub nullable: bool,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            size: None,
            nullable: true,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn not_nullable(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// A source of catalog metadata.
///
/// Implementations typically wrap a live database connection; the
/// projection asks for catalogs, then schemas per catalog, and so on down
/// to columns.
pub trait MetadataProvider {
    fn catalogs(&self) -> Vec<String>;
    fn schemas(&self, catalog: &str) -> Vec<String>;
    fn tables(&self, catalog: &str, schema: &str) -> Vec<TableMetadata>;
    fn columns(&self, catalog: &str, schema: &str, table: &str) -> Vec<ColumnMetadata>;
}

/// An in-memory [`MetadataProvider`], filled programmatically.
#[derive(Debug, Default)]
pub struct StaticMetadata {
    catalogs: BTreeMap<String, BTreeMap<String, Vec<(TableMetadata, Vec<ColumnMetadata>)>>>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table with its columns, creating the catalog and schema
    /// entries as needed.
    pub fn add_table(
        &mut self,
        catalog: &str,
        schema: &str,
        table: TableMetadata,
        columns: Vec<ColumnMetadata>,
    ) {
        self.catalogs
            .entry(catalog.to_owned())
            .or_default()
            .entry(schema.to_owned())
            .or_default()
            .push((table, columns));
    }
}

impl MetadataProvider for StaticMetadata {
    fn catalogs(&self) -> Vec<String> {
        self.catalogs.keys().cloned().collect()
    }

    fn schemas(&self, catalog: &str) -> Vec<String> {
        self.catalogs
            .get(catalog)
            .map(|schemas| schemas.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn tables(&self, catalog: &str, schema: &str) -> Vec<TableMetadata> {
        self.catalogs
            .get(catalog)
            .and_then(|schemas| schemas.get(schema))
            .map(|tables| tables.iter().map(|(table, _)| table.clone()).collect())
            .unwrap_or_default()
    }

    fn columns(&self, catalog: &str, schema: &str, table: &str) -> Vec<ColumnMetadata> {
        self.catalogs
            .get(catalog)
            .and_then(|schemas| schemas.get(schema))
            .and_then(|tables| tables.iter().find(|(t, _)| t.name == table))
            .map(|(_, columns)| columns.clone())
            .unwrap_or_default()
    }
}

/// A read-only store built by projecting a [`MetadataProvider`].
#[derive(Debug)]
pub struct MetadataStore {
    root_id: NodeId,
    nodes: HashMap<NodeId, Node>,
}

impl MetadataStore {
    /// Materialize the provider's catalogs as a node tree rooted at
    /// `root_id`.
    ///
    /// Entries whose names cannot form a path segment, and entries that
    /// would duplicate a sibling name, are skipped with a warning; the
    /// projection itself never fails on provider data.
    pub fn project(root_id: NodeId, provider: &dyn MetadataProvider) -> crate::Result<Self> {
        let type_name = Name::prefixed("meta", "type")?;
        let table_type_name = Name::prefixed("meta", "tableType")?;
        let description_name = Name::prefixed("meta", "description")?;
        let data_type_name = Name::prefixed("meta", "dataType")?;
        let size_name = Name::prefixed("meta", "size")?;
        let nullable_name = Name::prefixed("meta", "nullable")?;

        let mut nodes = HashMap::new();
        let mut root = Node::new_root(root_id);
        root.set_property(Property::single(type_name.clone(), "database"));
        root.set_version(1);
        nodes.insert(root_id, root);

        for catalog in provider.catalogs() {
            let properties = vec![Property::single(type_name.clone(), "catalog")];
            let Some(catalog_id) = attach(&mut nodes, root_id, &catalog, properties) else {
                continue;
            };
            for schema in provider.schemas(&catalog) {
                let properties = vec![Property::single(type_name.clone(), "schema")];
                let Some(schema_id) = attach(&mut nodes, catalog_id, &schema, properties) else {
                    continue;
                };
                for table in provider.tables(&catalog, &schema) {
                    let mut properties = vec![Property::single(type_name.clone(), "table")];
                    if let Some(table_type) = &table.table_type {
                        properties
                            .push(Property::single(table_type_name.clone(), table_type.as_str()));
                    }
                    if let Some(description) = &table.description {
                        properties
                            .push(Property::single(description_name.clone(), description.as_str()));
                    }
                    let Some(table_id) = attach(&mut nodes, schema_id, &table.name, properties)
                    else {
                        continue;
                    };
                    for column in provider.columns(&catalog, &schema, &table.name) {
                        let mut properties = vec![
                            Property::single(type_name.clone(), "column"),
                            Property::single(data_type_name.clone(), column.data_type.as_str()),
                            Property::single(nullable_name.clone(), column.nullable),
                        ];
                        if let Some(size) = column.size {
                            properties.push(Property::single(size_name.clone(), size));
                        }
                        attach(&mut nodes, table_id, &column.name, properties);
                    }
                }
            }
        }

        debug!(records = nodes.len(), "projected catalog metadata");
        Ok(Self { root_id, nodes })
    }
}

/// Create one projected node under `parent_id`, maintaining the parent's
/// child list. Returns `None` when the entry is skipped.
fn attach(
    nodes: &mut HashMap<NodeId, Node>,
    parent_id: NodeId,
    name_text: &str,
    properties: Vec<Property>,
) -> Option<NodeId> {
    let name = match Name::new(name_text) {
        Ok(name) => name,
        Err(error) => {
            warn!(name = name_text, %error, "skipping metadata entry with unusable name");
            return None;
        }
    };
    let parent = nodes.get(&parent_id)?;
    let duplicate = parent
        .children()
        .iter()
        .filter_map(|id| nodes.get(id))
        .any(|child| child.name().map(Segment::name) == Some(&name));
    if duplicate {
        warn!(name = name_text, "skipping metadata entry with duplicate name");
        return None;
    }

    let id = NodeId::random();
    let mut node = Node::new(id, parent_id, Segment::new(name));
    for property in properties {
        node.set_property(property);
    }
    node.set_version(1);
    nodes.insert(id, node);
    if let Some(parent) = nodes.get_mut(&parent_id) {
        parent.children_mut().push(id);
    }
    Some(id)
}

impl Store for MetadataStore {
    fn root_id(&self) -> NodeId {
        self.root_id
    }

    fn get(&self, id: &NodeId) -> Option<Node> {
        self.nodes.get(id).cloned()
    }

    fn put(&mut self, _node: Node) -> Result<Option<Node>, BackendError> {
        Err(BackendError::ReadOnly {
            store: "metadata".to_owned(),
        })
    }

    fn remove(&mut self, _id: &NodeId) -> Result<Option<Node>, BackendError> {
        Err(BackendError::ReadOnly {
            store: "metadata".to_owned(),
        })
    }

    fn remove_all(&mut self) -> Result<(), BackendError> {
        Err(BackendError::ReadOnly {
            store: "metadata".to_owned(),
        })
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }
}
