//! Tree decoder: JSON text → `Value`, with every object turned into a tree
//! and every string offered to date-time recognition.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use indexmap::IndexMap;
use json_tree_temporal::parse_datetime;
use serde::de::{DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use crate::error::TreeError;
use crate::key::Key;
use crate::mapping::TreeClass;
use crate::tree::JsonTree;
use crate::value::Value;

/// Replacement for the default string hook.
pub type DateTimeDecoder = Arc<dyn Fn(String) -> Value + Send + Sync>;

/// Interception points of the decoder.
///
/// Numbers, booleans, null and arrays are never offered to a hook.
pub trait ParseHooks {
    /// Called with the entries of every completed JSON object, innermost
    /// first. Duplicate keys have already been collapsed: the last value wins
    /// and keeps the position of the first occurrence.
    fn on_object(&self, entries: IndexMap<Key, Value>) -> Value;

    /// Called for every string value. Object keys are not passed here.
    fn on_string(&self, text: String) -> Value;
}

/// Parse a date-time string, or hand the string back unchanged.
pub fn decode_datetime(text: String) -> Value {
    match parse_datetime(&text) {
        Some(ts) => Value::DateTime(ts),
        None => Value::String(text),
    }
}

/// The stock hooks: objects become trees of `tree_class`, strings go through
/// [`decode_datetime`] unless a replacement is configured.
#[derive(Clone, Default)]
pub struct TreeDecoder {
    tree_class: TreeClass,
    datetime_decoder: Option<DateTimeDecoder>,
}

impl TreeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree_class(mut self, tree_class: TreeClass) -> Self {
        self.tree_class = tree_class;
        self
    }

    pub fn with_datetime_decoder(mut self, decoder: Option<DateTimeDecoder>) -> Self {
        self.datetime_decoder = decoder;
        self
    }

    pub fn tree_class(&self) -> &TreeClass {
        &self.tree_class
    }

    /// Decode one JSON document.
    ///
    /// # Errors
    ///
    /// [`TreeError::Json`] for malformed text, including trailing
    /// non-whitespace after the document.
    pub fn decode_str(&self, text: &str) -> Result<Value, TreeError> {
        decode_str_with(text, self)
    }

    /// Read `reader` to the end and decode it as one JSON document.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<Value, TreeError> {
        decode_reader_with(reader, self)
    }
}

impl ParseHooks for TreeDecoder {
    fn on_object(&self, entries: IndexMap<Key, Value>) -> Value {
        Value::Tree(JsonTree::from_entries(self.tree_class.clone(), entries))
    }

    fn on_string(&self, text: String) -> Value {
        match &self.datetime_decoder {
            Some(decode) => decode(text),
            None => decode_datetime(text),
        }
    }
}

impl fmt::Debug for TreeDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeDecoder")
            .field("tree_class", &self.tree_class)
            .field("datetime_decoder", &self.datetime_decoder.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Decode `text` with arbitrary hooks.
pub fn decode_str_with<H: ?Sized + ParseHooks>(text: &str, hooks: &H) -> Result<Value, TreeError> {
    let mut de = serde_json::Deserializer::from_str(text);
    let value = HookedSeed { hooks }.deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Read `reader` fully, then decode it with arbitrary hooks.
///
/// # Errors
///
/// [`TreeError::Io`] when reading fails or the input is not UTF-8.
pub fn decode_reader_with<R, H>(mut reader: R, hooks: &H) -> Result<Value, TreeError>
where
    R: Read,
    H: ?Sized + ParseHooks,
{
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(TreeError::Io)?;
    decode_str_with(&text, hooks)
}

// ----------------------------------------------------------------
// serde plumbing

struct HookedSeed<'h, H: ?Sized> {
    hooks: &'h H,
}

impl<H: ?Sized> Clone for HookedSeed<'_, H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H: ?Sized> Copy for HookedSeed<'_, H> {}

impl<'de, H: ?Sized + ParseHooks> DeserializeSeed<'de> for HookedSeed<'_, H> {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, H: ?Sized + ParseHooks> Visitor<'de> for HookedSeed<'_, H> {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Number::from_f64(v).map_or(Value::Null, Value::Number))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(self.hooks.on_string(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(self.hooks.on_string(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(self)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = IndexMap::new();
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(self)?;
            entries.insert(Key::Str(key), value);
        }
        Ok(self.hooks.on_object(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn objects_become_trees_of_the_class() {
        let class = crate::make_class([("one", "1")]).unwrap();
        let decoder = TreeDecoder::new().with_tree_class(class.clone());
        let value = decoder.decode_str(r#"{"1": {"x": []}}"#).unwrap();
        let tree = value.as_tree().unwrap();
        assert_eq!(tree.class(), &class);
        assert_eq!(tree.peek_attr("one").unwrap().as_tree().unwrap().class(), &class);
    }

    #[test]
    fn strings_are_recognized_but_keys_are_not() {
        let value = TreeDecoder::new()
            .decode_str(r#"{"2013-04-29T22:45:35": "2013-04-29T22:45:35", "s": "hello world"}"#)
            .unwrap();
        let tree = value.as_tree().unwrap();
        let (key, when) = tree.iter().next().unwrap();
        assert_eq!(key, "2013-04-29T22:45:35");
        assert!(when.as_datetime().is_some());
        assert_eq!(tree["s"], "hello world");
    }

    #[test]
    fn duplicate_keys_last_wins_first_position() {
        let value = TreeDecoder::new().decode_str(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let tree = value.as_tree().unwrap();
        let keys: Vec<String> = tree.keys().map(Key::to_string).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(tree["a"], 3);
    }

    #[test]
    fn trailing_garbage_is_an_error() {
        assert!(matches!(TreeDecoder::new().decode_str("{} x"), Err(TreeError::Json(_))));
        assert!(matches!(TreeDecoder::new().decode_str("{\"a\": }"), Err(TreeError::Json(_))));
        assert!(TreeDecoder::new().decode_str("  [1, 2.5, null]\n").is_ok());
    }

    #[test]
    fn hooks_see_inner_objects_first() {
        struct Recorder(RefCell<Vec<usize>>);
        impl ParseHooks for Recorder {
            fn on_object(&self, entries: IndexMap<Key, Value>) -> Value {
                self.0.borrow_mut().push(entries.len());
                Value::Tree(JsonTree::from_entries(TreeClass::base(), entries))
            }
            fn on_string(&self, text: String) -> Value {
                Value::String(text.to_uppercase())
            }
        }
        let recorder = Recorder(RefCell::new(Vec::new()));
        let value = decode_str_with(r#"{"a": {"b": "x", "c": 1}, "d": ["y"]}"#, &recorder).unwrap();
        assert_eq!(*recorder.0.borrow(), [2, 2]);
        assert_eq!(value["a"]["b"], "X");
        assert_eq!(value["d"], serde_json::json!(["Y"]));
    }

    #[test]
    fn reader_errors_are_io() {
        let bytes: &[u8] = &[b'"', 0xff, b'"'];
        assert!(matches!(TreeDecoder::new().decode_reader(bytes), Err(TreeError::Io(_))));
        let value = TreeDecoder::new().decode_reader(&b"{\"n\": 3}"[..]).unwrap();
        assert_eq!(value["n"], 3);
    }
}
