//! The auto-vivifying attribute tree.
//!
//! Reading a key that is not there never fails: an empty tree of the same
//! class is inserted under that key and returned, so arbitrarily deep paths
//! materialize on first access.
//!
//! ```
//! use json_tree::{attr, JsonTree, Value};
//!
//! let mut tree = JsonTree::new();
//! *attr!(tree.something.there) = Value::from(3);
//! assert_eq!(tree["something"]["there"], 3);
//! ```
//!
//! Rust resolves methods statically, so the tree's own methods (`keys`,
//! `len`, ...) can never be shadowed by data. `tree.attr("keys")` and
//! `attr!(tree.keys)` always address the data stored under `"keys"`.

use std::fmt;
use std::ops::{Index, IndexMut};

use indexmap::IndexMap;

use crate::error::TreeError;
use crate::key::Key;
use crate::mapping::TreeClass;
use crate::value::{Value, NULL};

/// Ordered mapping whose absent keys default to fresh trees of its class.
///
/// Equality compares entries as a plain mapping: class and insertion order
/// are ignored.
#[derive(Clone, Default)]
pub struct JsonTree {
    class: TreeClass,
    entries: IndexMap<Key, Value>,
}

impl JsonTree {
    /// An empty tree of the base class.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(class: TreeClass) -> Self {
        Self {
            class,
            entries: IndexMap::new(),
        }
    }

    /// Wrap already-built entries, as the decoder does for every object.
    pub fn from_entries(class: TreeClass, entries: IndexMap<Key, Value>) -> Self {
        Self { class, entries }
    }

    pub fn class(&self) -> &TreeClass {
        &self.class
    }

    /// Value under `key`, inserting an empty tree of this class if absent.
    pub fn get(&mut self, key: impl Into<Key>) -> &mut Value {
        let class = &self.class;
        self.entries
            .entry(key.into())
            .or_insert_with(|| Value::Tree(class.new_tree()))
    }

    /// Value under the storage key the class maps `name` to, vivified like
    /// [`JsonTree::get`].
    pub fn attr(&mut self, name: &str) -> &mut Value {
        let key = self.class.map(name);
        self.get(key)
    }

    /// Insert or overwrite, returning the stored value.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> &mut Value {
        let (index, _) = self.entries.insert_full(key.into(), value.into());
        &mut self.entries[index]
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> &mut Value {
        let key = self.class.map(name);
        self.set(key, value)
    }

    /// Vivifying descent through a chain of attribute names.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidArgument`] for an empty path, and
    /// [`TreeError::NotATree`] when an existing intermediate value is not a
    /// tree.
    pub fn attr_path(&mut self, names: &[&str]) -> Result<&mut Value, TreeError> {
        let Some((first, rest)) = names.split_first() else {
            return Err(TreeError::InvalidArgument("empty attribute path".to_string()));
        };
        let mut current = self.attr(first);
        for name in rest {
            current = current.attr(name)?;
        }
        Ok(current)
    }

    /// Lookup that never inserts.
    pub fn peek(&self, key: impl Into<Key>) -> Option<&Value> {
        self.entries.get(&key.into())
    }

    pub fn peek_attr(&self, name: &str) -> Option<&Value> {
        self.entries.get(&self.class.map(name))
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.entries.contains_key(&key.into())
    }

    pub fn contains_attr(&self, name: &str) -> bool {
        self.entries.contains_key(&self.class.map(name))
    }

    /// Remove an entry, keeping the order of the others.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.entries.shift_remove(&key.into())
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<Value> {
        let key = self.class.map(name);
        self.entries.shift_remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.entries.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, Key, Value> {
        self.entries.values_mut()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, Key, Value> {
        self.entries.iter_mut()
    }

    /// Convert to a plain `serde_json` object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.to_json_key(), value.to_json()))
                .collect(),
        )
    }
}

impl PartialEq for JsonTree {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for JsonTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for JsonTree {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = JsonTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for JsonTree {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(key, value)| (key.into(), value.into())));
    }
}

impl IntoIterator for JsonTree {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonTree {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a mut JsonTree {
    type Item = (&'a Key, &'a mut Value);
    type IntoIter = indexmap::map::IterMut<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter_mut()
    }
}

/// Index that routes a lookup through the tree's name mapping.
///
/// `tree[Attr("one")]` is the operator form of `tree.attr("one")`; the
/// [`attr!`](crate::attr) macro builds chains of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr<'a>(pub &'a str);

mod private {
    pub trait Sealed {}
    impl Sealed for str {}
    impl Sealed for String {}
    impl Sealed for i64 {}
    impl Sealed for super::Key {}
    impl Sealed for super::Attr<'_> {}
    impl<T: ?Sized + Sealed> Sealed for &T {}
}

/// Types usable with `tree[...]` and `value[...]`.
///
/// Strings and `i64` index storage keys directly, [`Attr`] goes through the
/// name mapping. Sealed.
pub trait TreeIndex: private::Sealed {
    #[doc(hidden)]
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value>;

    #[doc(hidden)]
    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value;
}

impl TreeIndex for str {
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value> {
        tree.peek(self)
    }

    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value {
        tree.get(self)
    }
}

impl TreeIndex for String {
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value> {
        tree.peek(self)
    }

    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value {
        tree.get(self)
    }
}

impl TreeIndex for i64 {
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value> {
        tree.peek(*self)
    }

    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value {
        tree.get(*self)
    }
}

impl TreeIndex for Key {
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value> {
        tree.entries.get(self)
    }

    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value {
        tree.get(self)
    }
}

impl TreeIndex for Attr<'_> {
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value> {
        tree.peek_attr(self.0)
    }

    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value {
        tree.attr(self.0)
    }
}

impl<T: ?Sized + TreeIndex> TreeIndex for &T {
    fn peek_in<'t>(&self, tree: &'t JsonTree) -> Option<&'t Value> {
        (**self).peek_in(tree)
    }

    fn vivify_in<'t>(&self, tree: &'t mut JsonTree) -> &'t mut Value {
        (**self).vivify_in(tree)
    }
}

impl<I: TreeIndex> Index<I> for JsonTree {
    type Output = Value;

    /// Non-vivifying lookup: a shared borrow cannot insert, so absent keys
    /// read as `Null` and the tree is left untouched.
    fn index(&self, index: I) -> &Value {
        index.peek_in(self).unwrap_or(&NULL)
    }
}

impl<I: TreeIndex> IndexMut<I> for JsonTree {
    /// Vivifying lookup, same as [`JsonTree::get`] / [`JsonTree::attr`].
    fn index_mut(&mut self, index: I) -> &mut Value {
        index.vivify_in(self)
    }
}

/// Dot-syntax attribute access.
///
/// `attr!(tree.a.b.c)` evaluates to `&mut Value`, vivifying every step
/// through the tree's name mapping. Panics if an existing intermediate value
/// is not a tree; use [`JsonTree::attr_path`] for a fallible walk.
///
/// ```
/// use json_tree::{attr, JsonTree, Value};
///
/// let mut tree = JsonTree::new();
/// *attr!(tree.a.b) = Value::from("x");
/// assert_eq!(*attr!(tree.a.b), "x");
/// assert!(attr!(tree.a.missing).as_tree().unwrap().is_empty());
/// ```
#[macro_export]
macro_rules! attr {
    ($tree:ident $(. $name:ident)+) => {
        &mut $tree $([$crate::Attr(stringify!($name))])+
    };
}
