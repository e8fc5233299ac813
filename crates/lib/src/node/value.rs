//! Property values.

use serde::{Deserialize, Serialize};

use super::id::NodeId;

/// A single property value.
///
/// Values are scalar; a property carries a list of them. References hold
/// the identity of another node rather than its path, so they stay valid
/// when the referenced node moves and can be re-pointed when a subtree is
/// copied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Long(i64),
    Double(f64),
    Text(String),
    /// The identity of another node.
    Reference(NodeId),
}

impl Value {
    /// The boolean inside, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer inside, if this is a [`Value::Long`].
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// The float inside, if this is a [`Value::Double`].
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The text inside, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The referenced identity, if this is a [`Value::Reference`].
    pub fn as_reference(&self) -> Option<NodeId> {
        match self {
            Value::Reference(id) => Some(*id),
            _ => None,
        }
    }

    /// True if this value references another node.
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Reference(id)
    }
}
