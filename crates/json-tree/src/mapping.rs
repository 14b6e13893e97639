//! Attribute-name mappings and the tree classes built from them.
//!
//! A [`TreeClass`] decides how attribute names become storage keys. The base
//! class uses names as-is. [`make_class`] builds a new class around a
//! [`NameMapping`], either a lookup table or a function. This is handy when
//! stored keys are not convenient identifiers (`"custom field 10042"`), change
//! between deployments, or are not strings at all.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::error::TreeError;
use crate::key::Key;
use crate::tree::JsonTree;
use crate::value::Value;

/// Function form of a name mapping.
pub type MapFn = dyn Fn(&str) -> Key + Send + Sync;

/// Translation from attribute names to storage keys.
///
/// A mapping must be stable: the same name always maps to the same key,
/// otherwise a value written through an attribute cannot be read back.
#[derive(Clone, Default)]
pub enum NameMapping {
    #[default]
    Identity,
    /// Lookup table; names missing from the table map to themselves.
    Table(Arc<HashMap<String, Key>>),
    Func(Arc<MapFn>),
}

impl NameMapping {
    /// Build a table mapping.
    ///
    /// # Example
    ///
    /// ```
    /// use json_tree::{Key, NameMapping};
    ///
    /// let mapping = NameMapping::table([("one", "1"), ("two", "2")]);
    /// assert_eq!(mapping.map("one"), Key::from("1"));
    /// assert_eq!(mapping.map("three"), Key::from("three"));
    /// ```
    pub fn table<I, N, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, K)>,
        N: Into<String>,
        K: Into<Key>,
    {
        NameMapping::Table(Arc::new(
            entries
                .into_iter()
                .map(|(name, key)| (name.into(), key.into()))
                .collect(),
        ))
    }

    /// Build a function mapping.
    ///
    /// # Example
    ///
    /// ```
    /// use json_tree::{Key, NameMapping};
    ///
    /// let spacify = NameMapping::func(|name: &str| name.replace('_', " "));
    /// assert_eq!(spacify.map("hello_there"), Key::from("hello there"));
    /// ```
    pub fn func<F, K>(f: F) -> Self
    where
        F: Fn(&str) -> K + Send + Sync + 'static,
        K: Into<Key>,
    {
        NameMapping::Func(Arc::new(move |name: &str| -> Key { f(name).into() }))
    }

    /// Translate an attribute name into its storage key.
    pub fn map(&self, name: &str) -> Key {
        match self {
            NameMapping::Identity => Key::from(name),
            NameMapping::Table(table) => table.get(name).cloned().unwrap_or_else(|| Key::from(name)),
            NameMapping::Func(f) => f(name),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, NameMapping::Identity)
    }
}

impl fmt::Debug for NameMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMapping::Identity => f.write_str("Identity"),
            NameMapping::Table(table) => f.debug_tuple("Table").field(table).finish(),
            NameMapping::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl<N, K> From<HashMap<N, K>> for NameMapping
where
    N: Into<String>,
    K: Into<Key>,
{
    fn from(table: HashMap<N, K>) -> Self {
        NameMapping::table(table)
    }
}

impl<N, K, const LEN: usize> From<[(N, K); LEN]> for NameMapping
where
    N: Into<String>,
    K: Into<Key>,
{
    fn from(table: [(N, K); LEN]) -> Self {
        NameMapping::table(table)
    }
}

impl TryFrom<&serde_json::Value> for NameMapping {
    type Error = TreeError;

    /// Read a table mapping from a JSON object whose values are strings or
    /// integers, e.g. a field-name table loaded from configuration.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        let serde_json::Value::Object(map) = value else {
            return Err(not_a_mapping());
        };
        let mut table = HashMap::with_capacity(map.len());
        for (name, key) in map {
            let key = match key {
                serde_json::Value::String(s) => Key::Str(s.clone()),
                serde_json::Value::Number(n) => n.as_i64().map(Key::Int).ok_or_else(|| bad_key(name))?,
                _ => return Err(bad_key(name)),
            };
            table.insert(name.clone(), key);
        }
        Ok(NameMapping::Table(Arc::new(table)))
    }
}

impl TryFrom<&Value> for NameMapping {
    type Error = TreeError;

    /// Read a table mapping from a tree whose values are strings or integers.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Tree(tree) = value else {
            return Err(not_a_mapping());
        };
        let mut table = HashMap::with_capacity(tree.len());
        for (name, key) in tree {
            let name = name.to_string();
            let key = match key {
                Value::String(s) => Key::Str(s.clone()),
                Value::Number(n) => n.as_i64().map(Key::Int).ok_or_else(|| bad_key(&name))?,
                _ => return Err(bad_key(&name)),
            };
            table.insert(name, key);
        }
        Ok(NameMapping::Table(Arc::new(table)))
    }
}

fn not_a_mapping() -> TreeError {
    TreeError::InvalidArgument("mapping is neither callable nor a key/value table".to_string())
}

fn bad_key(name: &str) -> TreeError {
    TreeError::InvalidArgument(format!(
        "mapping for {name:?} must be a string or integer key"
    ))
}

struct ClassInner {
    id: u64,
    mapping: NameMapping,
}

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// The concrete variant of a tree: its identity plus its name mapping.
///
/// Trees vivify children of their own class. Every [`make_class`] call yields
/// a distinct class, even for equivalent mappings; classes compare equal only
/// when they are the same handle.
#[derive(Clone)]
pub struct TreeClass {
    inner: Arc<ClassInner>,
}

impl TreeClass {
    /// The default class, with identity attribute names.
    pub fn base() -> Self {
        static BASE: OnceLock<TreeClass> = OnceLock::new();
        BASE.get_or_init(|| TreeClass {
            inner: Arc::new(ClassInner {
                id: 0,
                mapping: NameMapping::Identity,
            }),
        })
        .clone()
    }

    /// A fresh class around `mapping`.
    pub fn mapped(mapping: NameMapping) -> Self {
        TreeClass {
            inner: Arc::new(ClassInner {
                id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
                mapping,
            }),
        }
    }

    pub fn mapping(&self) -> &NameMapping {
        &self.inner.mapping
    }

    /// Storage key for attribute `name`.
    pub fn map(&self, name: &str) -> Key {
        self.inner.mapping.map(name)
    }

    pub fn is_base(&self) -> bool {
        self.inner.id == 0
    }

    /// An empty tree of this class.
    pub fn new_tree(&self) -> JsonTree {
        JsonTree::with_class(self.clone())
    }

    /// A tree of this class holding `entries`, stored under the given keys.
    pub fn tree_from<I, K, V>(&self, entries: I) -> JsonTree
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut tree = self.new_tree();
        tree.extend(entries);
        tree
    }
}

impl Default for TreeClass {
    fn default() -> Self {
        TreeClass::base()
    }
}

impl PartialEq for TreeClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TreeClass {}

impl fmt::Debug for TreeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeClass")
            .field("id", &self.inner.id)
            .field("mapping", &self.inner.mapping)
            .finish()
    }
}

/// Build a new tree class whose attribute names go through `mapping`.
///
/// Accepts a [`NameMapping`], a `HashMap` or array of name/key pairs, or a
/// JSON object / tree value holding such a table.
///
/// # Errors
///
/// [`TreeError::InvalidArgument`] when `mapping` is a value that is not a
/// key/value table, or whose entries are not string or integer keys.
///
/// # Example
///
/// ```
/// use json_tree::{make_class, Key};
///
/// let numbers = make_class([("one", "1"), ("two", "2")]).unwrap();
/// let mut number = numbers.new_tree();
/// number.set_attr("one", "something");
/// assert_eq!(number.keys().collect::<Vec<_>>(), [&Key::from("1")]);
/// assert_eq!(*number.attr("one"), "something");
///
/// assert!(make_class(&serde_json::json!(["one", "two"])).is_err());
/// ```
pub fn make_class<M>(mapping: M) -> Result<TreeClass, TreeError>
where
    M: TryInto<NameMapping>,
    TreeError: From<M::Error>,
{
    Ok(TreeClass::mapped(mapping.try_into()?))
}

/// Build a mapped class and one tree of it holding `entries`.
///
/// Entries are stored under the keys given, not passed through the mapping.
///
/// # Example
///
/// ```
/// use json_tree::mapped_tree;
///
/// let mut number = mapped_tree(
///     [("one", "1"), ("two", "2")],
///     [("1", "something"), ("2", "hello")],
/// )
/// .unwrap();
/// assert_eq!(*number.attr("two"), "hello");
/// ```
pub fn mapped_tree<M, I, K, V>(mapping: M, entries: I) -> Result<JsonTree, TreeError>
where
    M: TryInto<NameMapping>,
    TreeError: From<M::Error>,
    I: IntoIterator<Item = (K, V)>,
    K: Into<Key>,
    V: Into<Value>,
{
    Ok(make_class(mapping)?.tree_from(entries))
}
