//! Tree encoder: `Value`/`JsonTree`/`Timestamp` → JSON text.

use std::fmt;
use std::io;
use std::sync::Arc;

use json_tree_temporal::{format_datetime, Timestamp};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::formatter::TreeFormatter;
use crate::error::TreeError;
use crate::key::Key;
use crate::tree::JsonTree;
use crate::value::Value;

/// Replacement for the default ISO-8601 date-time formatting.
pub type DateTimeEncoder = Arc<dyn Fn(&Timestamp) -> String + Send + Sync>;

/// Types the tree encoder can write.
pub trait Encode {
    /// Serialize `self` with `encoder`'s settings.
    fn encode_with<S: Serializer>(&self, encoder: &TreeEncoder, serializer: S)
        -> Result<S::Ok, S::Error>;
}

/// Pairs a value with the encoder settings so it can be handed to serde.
pub struct Encoded<'a, T: ?Sized> {
    encoder: &'a TreeEncoder,
    value: &'a T,
}

impl<'a, T: ?Sized + Encode> Encoded<'a, T> {
    pub fn new(encoder: &'a TreeEncoder, value: &'a T) -> Self {
        Self { encoder, value }
    }
}

impl<T: ?Sized + Encode> Serialize for Encoded<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.encode_with(self.encoder, serializer)
    }
}

/// Encoder settings shared by a whole document.
#[derive(Clone, Default)]
pub struct TreeEncoder {
    datetime_encoder: Option<DateTimeEncoder>,
    sort_keys: bool,
}

impl TreeEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_datetime_encoder(mut self, encoder: Option<DateTimeEncoder>) -> Self {
        self.datetime_encoder = encoder;
        self
    }

    /// Write tree entries ordered by their JSON key text instead of
    /// insertion order.
    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    /// Text written for a timestamp.
    pub fn format_datetime(&self, ts: &Timestamp) -> String {
        match &self.datetime_encoder {
            Some(encode) => encode(ts),
            None => format_datetime(ts),
        }
    }

    /// Write `value` as JSON to `writer`, laid out by `formatter`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Io`] when the writer fails, [`TreeError::Json`] for any
    /// other serializer error.
    pub fn encode<V, W>(&self, value: &V, writer: W, formatter: TreeFormatter) -> Result<(), TreeError>
    where
        V: ?Sized + Encode,
        W: io::Write,
    {
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        value.encode_with(self, &mut serializer).map_err(|err| {
            if err.is_io() {
                TreeError::Io(err.into())
            } else {
                TreeError::Json(err)
            }
        })
    }

    /// Encode to a `String` with the default layout.
    pub fn encode_to_string<V: ?Sized + Encode>(&self, value: &V) -> Result<String, TreeError> {
        let mut out = Vec::new();
        self.encode(value, &mut out, TreeFormatter::new())?;
        String::from_utf8(out).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
    }
}

impl fmt::Debug for TreeEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeEncoder")
            .field("datetime_encoder", &self.datetime_encoder.as_ref().map(|_| ".."))
            .field("sort_keys", &self.sort_keys)
            .finish()
    }
}

// ----------------------------------------------------------------
// Encode implementations

impl Encode for Value {
    fn encode_with<S: Serializer>(&self, encoder: &TreeEncoder, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(ts) => ts.encode_with(encoder, serializer),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Encoded::new(encoder, item))?;
                }
                seq.end()
            }
            Value::Tree(tree) => tree.encode_with(encoder, serializer),
        }
    }
}

impl Encode for JsonTree {
    fn encode_with<S: Serializer>(&self, encoder: &TreeEncoder, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        if encoder.sort_keys {
            let mut entries: Vec<(String, &Value)> =
                self.iter().map(|(key, value)| (key.to_json_key(), value)).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, value) in entries {
                map.serialize_entry(&key, &Encoded::new(encoder, value))?;
            }
        } else {
            for (key, value) in self {
                map.serialize_entry(key, &Encoded::new(encoder, value))?;
            }
        }
        map.end()
    }
}

impl Encode for Timestamp {
    fn encode_with<S: Serializer>(&self, encoder: &TreeEncoder, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encoder.format_datetime(self))
    }
}

impl Encode for Key {
    fn encode_with<S: Serializer>(&self, _encoder: &TreeEncoder, serializer: S) -> Result<S::Ok, S::Error> {
        self.serialize(serializer)
    }
}

impl<T: ?Sized + Encode> Encode for &T {
    fn encode_with<S: Serializer>(&self, encoder: &TreeEncoder, serializer: S) -> Result<S::Ok, S::Error> {
        (**self).encode_with(encoder, serializer)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode_with(&TreeEncoder::default(), serializer)
    }
}

impl Serialize for JsonTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode_with(&TreeEncoder::default(), serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_tree_temporal::parse_datetime;
    use serde_json::json;

    fn sample() -> JsonTree {
        let mut tree = JsonTree::new();
        tree.set("b", 1);
        tree.set(3i64, "three");
        tree.set("a", parse_datetime("2013-04-29T22:45:35-04:00").unwrap());
        tree
    }

    #[test]
    fn integer_keys_become_strings() {
        let text = TreeEncoder::new().encode_to_string(&sample()).unwrap();
        assert_eq!(text, r#"{"b": 1, "3": "three", "a": "2013-04-29T22:45:35-04:00"}"#);
    }

    #[test]
    fn sorted_keys() {
        let encoder = TreeEncoder::new().with_sort_keys(true);
        let text = encoder.encode_to_string(&sample()).unwrap();
        assert_eq!(text, r#"{"3": "three", "a": "2013-04-29T22:45:35-04:00", "b": 1}"#);
    }

    #[test]
    fn custom_datetime_encoder() {
        let encoder = TreeEncoder::new()
            .with_datetime_encoder(Some(Arc::new(|ts: &Timestamp| ts.local().date().to_string())));
        let text = encoder.encode_to_string(&sample()).unwrap();
        assert_eq!(text, r#"{"b": 1, "3": "three", "a": "2013-04-29"}"#);
    }

    #[test]
    fn serialize_matches_to_json() {
        let tree = sample();
        assert_eq!(serde_json::to_value(&tree).unwrap(), tree.to_json());
        assert_eq!(
            serde_json::to_value(Value::from(vec![Value::Null, Value::from(true)])).unwrap(),
            json!([null, true])
        );
    }

    #[test]
    fn writer_failure_is_io_error() {
        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = TreeEncoder::new()
            .encode(&sample(), Broken, TreeFormatter::new())
            .unwrap_err();
        assert!(matches!(err, TreeError::Io(_)));
    }
}
