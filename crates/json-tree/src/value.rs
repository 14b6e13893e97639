//! Values stored in a tree.

use std::ops::{Index, IndexMut};

use json_tree_temporal::{format_datetime, Timestamp};
use serde_json::Number;

use crate::error::TreeError;
use crate::key::Key;
use crate::tree::{JsonTree, TreeIndex};

pub(crate) static NULL: Value = Value::Null;

/// Any value a tree can hold.
///
/// This is the JSON data model plus [`Timestamp`], and with objects replaced
/// by [`JsonTree`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    DateTime(Timestamp),
    Array(Vec<Value>),
    Tree(JsonTree),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, Value::Tree(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Timestamp> {
        match self {
            Value::DateTime(ts) => Some(ts),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&JsonTree> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut JsonTree> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn into_tree(self) -> Option<JsonTree> {
        match self {
            Value::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Vivifying key lookup on a tree value.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotATree`] when this value is not a tree.
    pub fn get(&mut self, key: impl Into<Key>) -> Result<&mut Value, TreeError> {
        let key = key.into();
        match self {
            Value::Tree(tree) => Ok(tree.get(key)),
            _ => Err(TreeError::NotATree {
                key: key.to_string(),
            }),
        }
    }

    /// Vivifying attribute lookup on a tree value.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotATree`] when this value is not a tree.
    pub fn attr(&mut self, name: &str) -> Result<&mut Value, TreeError> {
        match self {
            Value::Tree(tree) => Ok(tree.attr(name)),
            _ => Err(TreeError::NotATree {
                key: name.to_string(),
            }),
        }
    }

    /// Convert to a plain `serde_json::Value`.
    ///
    /// Timestamps become ISO strings and integer keys become their decimal
    /// text.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::DateTime(ts) => serde_json::Value::String(format_datetime(ts)),
            Value::Array(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Tree(tree) => tree.to_json(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i.into())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(i.into())
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Number(u.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON form and become `Null`.
    fn from(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::DateTime(ts)
    }
}

impl From<JsonTree> for Value {
    fn from(tree: JsonTree) -> Self {
        Value::Tree(tree)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    /// Plain structural conversion into base-class trees. Strings are kept
    /// as strings; date recognition only happens while decoding text.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Tree(map.into_iter().collect()),
        }
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == Some(other.as_str())
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<Timestamp> for Value {
    fn eq(&self, other: &Timestamp) -> bool {
        self.as_datetime() == Some(other)
    }
}

impl PartialEq<serde_json::Value> for Value {
    fn eq(&self, other: &serde_json::Value) -> bool {
        self.to_json() == *other
    }
}

impl<I: TreeIndex> Index<I> for Value {
    type Output = Value;

    /// Non-vivifying lookup. Absent keys and non-tree values read as `Null`.
    fn index(&self, index: I) -> &Value {
        match self {
            Value::Tree(tree) => index.peek_in(tree).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl<I: TreeIndex> IndexMut<I> for Value {
    /// Vivifying lookup.
    ///
    /// Unlike `serde_json::Value`, a `Null` is not turned into a tree first:
    /// only existing trees can be indexed mutably.
    ///
    /// # Panics
    ///
    /// When this value is not a tree, `Null` included. Use [`Value::get`] or
    /// [`Value::attr`] for a fallible lookup.
    fn index_mut(&mut self, index: I) -> &mut Value {
        match self {
            Value::Tree(tree) => index.vivify_in(tree),
            other => panic!("cannot index into a non-tree value: {other:?}"),
        }
    }
}
