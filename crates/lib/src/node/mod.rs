//! Nodes, the unit of content.
//!
//! A [`Node`] is a record in a workspace's tree: an identity, a link to its
//! parent, the [`Segment`] it is known by under that parent, a set of named
//! [`Property`]s, and the ordered identities of its children. Nodes are
//! plain data; all tree manipulation goes through a workspace or a
//! transaction, which keep the parent and child links consistent.
//!
//! Every node carries a version counter. It starts at zero for a freshly
//! staged node and increases by one each time a commit touches the node.

mod id;
mod value;


use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub use id::NodeId;
pub use value::Value;

use crate::path::{Name, Segment};

/// A named list of values on a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    name: Name,
    values: Vec<Value>,
}

impl Property {
    /// Create a property from any sequence of values.
    pub fn new(name: Name, values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            name,
            values: values.into_iter().collect(),
        }
    }

    /// Create a single-valued property.
    pub fn single(name: Name, value: impl Into<Value>) -> Self {
        Self {
            name,
            values: vec![value.into()],
        }
    }

    /// The property's name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The values in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// The number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the property has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }
}

/// One node of a workspace tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    name: Option<Segment>,
    properties: BTreeMap<Name, Property>,
    children: Vec<NodeId>,
    version: u64,
}

impl Node {
    /// Create a root node. Roots have no parent and no name.
    pub fn new_root(id: NodeId) -> Self {
        Self {
            id,
            parent: None,
            name: None,
            properties: BTreeMap::new(),
            children: Vec::new(),
            version: 0,
        }
    }

    /// Create a node under the given parent.
    pub fn new(id: NodeId, parent: NodeId, name: Segment) -> Self {
        Self {
            id,
            parent: Some(parent),
            name: Some(name),
            properties: BTreeMap::new(),
            children: Vec::new(),
            version: 0,
        }
    }

    /// The node's identity.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The identity of the parent, or `None` for a root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The segment this node is known by under its parent, or `None` for a
    /// root.
    pub fn name(&self) -> Option<&Segment> {
        self.name.as_ref()
    }

    /// The number of commits that have touched this node.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// True if this node is a root.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The property with the given name, if present.
    pub fn property(&self, name: &Name) -> Option<&Property> {
        self.properties.get(name)
    }

    /// All properties, ordered by name.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.properties.values()
    }

    /// The number of properties.
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Set a property, returning the one it replaced.
    pub fn set_property(&mut self, property: Property) -> Option<Property> {
        self.properties.insert(property.name.clone(), property)
    }

    /// Remove a property by name, returning it if it was present.
    pub fn remove_property(&mut self, name: &Name) -> Option<Property> {
        self.properties.remove(name)
    }

    /// Remove all properties.
    pub fn clear_properties(&mut self) {
        self.properties.clear();
    }

    /// Builder-style [`Node::set_property`].
    pub fn with_property(mut self, property: Property) -> Self {
        self.set_property(property);
        self
    }

    /// The identities of the children, in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn set_name(&mut self, name: Option<Segment>) {
        self.name = name;
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    /// Rewrite reference values according to an old-to-new identity map.
    ///
    /// Used when a subtree is copied or a workspace cloned: references that
    /// point inside the copied subtree follow the copy, references to
    /// outside nodes are left alone.
    pub(crate) fn remap_references(&mut self, map: &HashMap<NodeId, NodeId>) {
        for property in self.properties.values_mut() {
            for value in property.values_mut() {
                if let Value::Reference(id) = value {
                    if let Some(new_id) = map.get(id) {
                        *id = *new_id;
                    }
                }
            }
        }
    }
}
