//! `dumps`/`loads`-style entry points.
//!
//! Each call builds its own encoder or decoder from the given options; the
//! plain variants use the defaults.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

use json_tree_temporal::Timestamp;
use tracing::debug;

use crate::codec::{DateTimeDecoder, DateTimeEncoder, Encode, TreeDecoder, TreeEncoder, TreeFormatter};
use crate::error::TreeError;
use crate::mapping::TreeClass;
use crate::value::Value;

// ----------------------------------------------------------------
// Options

/// Output options for [`dumps_with`] and [`dump_with`].
///
/// Separators left unset default to `", "` / `": "`, or `","` / `": "` when
/// indenting.
#[derive(Clone)]
pub struct DumpOptions {
    pub indent: Option<String>,
    pub item_separator: Option<String>,
    pub key_separator: Option<String>,
    /// Escape every non-ASCII character. On by default.
    pub ensure_ascii: bool,
    pub sort_keys: bool,
    pub datetime_encoder: Option<DateTimeEncoder>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            indent: None,
            item_separator: None,
            key_separator: None,
            ensure_ascii: true,
            sort_keys: false,
            datetime_encoder: None,
        }
    }
}

impl DumpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// No whitespace at all: `,` and `:` separators.
    pub fn compact() -> Self {
        Self::default().separators(",", ":")
    }

    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = Some(indent.into());
        self
    }

    /// Indent by `width` spaces per level.
    pub fn indent_spaces(self, width: usize) -> Self {
        self.indent(" ".repeat(width))
    }

    pub fn separators(mut self, item: impl Into<String>, key: impl Into<String>) -> Self {
        self.item_separator = Some(item.into());
        self.key_separator = Some(key.into());
        self
    }

    pub fn ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    pub fn sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    /// Format timestamps with `encode` instead of ISO-8601.
    pub fn datetime_encoder<F>(mut self, encode: F) -> Self
    where
        F: Fn(&Timestamp) -> String + Send + Sync + 'static,
    {
        self.datetime_encoder = Some(Arc::new(encode));
        self
    }

    pub fn encoder(&self) -> TreeEncoder {
        TreeEncoder::new()
            .with_datetime_encoder(self.datetime_encoder.clone())
            .with_sort_keys(self.sort_keys)
    }

    pub fn formatter(&self) -> TreeFormatter {
        let default_item = if self.indent.is_some() { "," } else { ", " };
        let item = self.item_separator.as_deref().unwrap_or(default_item);
        let key = self.key_separator.as_deref().unwrap_or(": ");
        let formatter = TreeFormatter::new()
            .with_separators(item.as_bytes(), key.as_bytes())
            .with_ensure_ascii(self.ensure_ascii);
        match &self.indent {
            Some(indent) => formatter.with_indent(indent.as_bytes()),
            None => formatter,
        }
    }
}

impl fmt::Debug for DumpOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DumpOptions")
            .field("indent", &self.indent)
            .field("item_separator", &self.item_separator)
            .field("key_separator", &self.key_separator)
            .field("ensure_ascii", &self.ensure_ascii)
            .field("sort_keys", &self.sort_keys)
            .field("datetime_encoder", &self.datetime_encoder.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Input options for [`loads_with`] and [`load_with`].
#[derive(Clone, Default)]
pub struct LoadOptions {
    /// Class of every decoded tree.
    pub tree_class: TreeClass,
    pub datetime_decoder: Option<DateTimeDecoder>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree_class(mut self, tree_class: TreeClass) -> Self {
        self.tree_class = tree_class;
        self
    }

    /// Replace date-time recognition of string values with `decode`.
    pub fn datetime_decoder<F>(mut self, decode: F) -> Self
    where
        F: Fn(String) -> Value + Send + Sync + 'static,
    {
        self.datetime_decoder = Some(Arc::new(decode));
        self
    }

    /// Keep every string as a string.
    pub fn plain_strings(self) -> Self {
        self.datetime_decoder(Value::String)
    }

    pub fn decoder(&self) -> TreeDecoder {
        TreeDecoder::new()
            .with_tree_class(self.tree_class.clone())
            .with_datetime_decoder(self.datetime_decoder.clone())
    }
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("tree_class", &self.tree_class)
            .field("datetime_decoder", &self.datetime_decoder.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Options for [`clone_with`]: the encoder side and the decoder side of the
/// round trip.
#[derive(Clone, Default)]
pub struct CloneOptions {
    pub tree_class: TreeClass,
    pub datetime_encoder: Option<DateTimeEncoder>,
    pub datetime_decoder: Option<DateTimeDecoder>,
}

impl CloneOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree_class(mut self, tree_class: TreeClass) -> Self {
        self.tree_class = tree_class;
        self
    }

    pub fn datetime_encoder<F>(mut self, encode: F) -> Self
    where
        F: Fn(&Timestamp) -> String + Send + Sync + 'static,
    {
        self.datetime_encoder = Some(Arc::new(encode));
        self
    }

    pub fn datetime_decoder<F>(mut self, decode: F) -> Self
    where
        F: Fn(String) -> Value + Send + Sync + 'static,
    {
        self.datetime_decoder = Some(Arc::new(decode));
        self
    }

    fn dump_options(&self) -> DumpOptions {
        DumpOptions {
            datetime_encoder: self.datetime_encoder.clone(),
            ..DumpOptions::compact()
        }
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            tree_class: self.tree_class.clone(),
            datetime_decoder: self.datetime_decoder.clone(),
        }
    }
}

impl fmt::Debug for CloneOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneOptions")
            .field("tree_class", &self.tree_class)
            .field("datetime_encoder", &self.datetime_encoder.as_ref().map(|_| ".."))
            .field("datetime_decoder", &self.datetime_decoder.as_ref().map(|_| ".."))
            .finish()
    }
}

// ----------------------------------------------------------------
// Encoding

/// Serialize to a JSON string with default options.
///
/// ```
/// use json_tree::{dumps, JsonTree};
///
/// let tree: JsonTree = [("a", 1), ("b", 2)].into_iter().collect();
/// assert_eq!(dumps(&tree).unwrap(), r#"{"a": 1, "b": 2}"#);
/// ```
pub fn dumps<V: ?Sized + Encode>(value: &V) -> Result<String, TreeError> {
    dumps_with(value, &DumpOptions::default())
}

pub fn dumps_with<V: ?Sized + Encode>(value: &V, options: &DumpOptions) -> Result<String, TreeError> {
    let mut out = Vec::new();
    dump_with(value, &mut out, options)?;
    String::from_utf8(out).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err).into())
}

/// Serialize to `writer` with default options.
pub fn dump<V, W>(value: &V, writer: W) -> Result<(), TreeError>
where
    V: ?Sized + Encode,
    W: Write,
{
    dump_with(value, writer, &DumpOptions::default())
}

/// Serialize to `writer`.
///
/// # Errors
///
/// [`TreeError::Io`] when the writer fails.
pub fn dump_with<V, W>(value: &V, writer: W, options: &DumpOptions) -> Result<(), TreeError>
where
    V: ?Sized + Encode,
    W: Write,
{
    debug!(
        indent = ?options.indent,
        sort_keys = options.sort_keys,
        ensure_ascii = options.ensure_ascii,
        custom_datetime = options.datetime_encoder.is_some(),
        "dump"
    );
    options.encoder().encode(value, writer, options.formatter())
}

// ----------------------------------------------------------------
// Decoding

/// Parse a JSON document, turning objects into trees and ISO-8601 strings
/// into timestamps.
///
/// ```
/// use json_tree::loads;
///
/// let value = loads(r#"{"when": "2013-04-29T22:45:35", "n": 3}"#).unwrap();
/// assert!(value["when"].as_datetime().is_some());
/// assert_eq!(value["n"], 3);
/// ```
pub fn loads(text: &str) -> Result<Value, TreeError> {
    loads_with(text, &LoadOptions::default())
}

/// # Errors
///
/// [`TreeError::Json`] for malformed input.
pub fn loads_with(text: &str, options: &LoadOptions) -> Result<Value, TreeError> {
    debug!(
        len = text.len(),
        base_class = options.tree_class.is_base(),
        custom_datetime = options.datetime_decoder.is_some(),
        "loads"
    );
    options.decoder().decode_str(text)
}

pub fn load<R: Read>(reader: R) -> Result<Value, TreeError> {
    load_with(reader, &LoadOptions::default())
}

/// Read `reader` to the end and parse it.
///
/// # Errors
///
/// [`TreeError::Io`] when reading fails, [`TreeError::Json`] for malformed
/// input.
pub fn load_with<R: Read>(reader: R, options: &LoadOptions) -> Result<Value, TreeError> {
    debug!(
        base_class = options.tree_class.is_base(),
        custom_datetime = options.datetime_decoder.is_some(),
        "load"
    );
    options.decoder().decode_reader(reader)
}

// ----------------------------------------------------------------
// Deep copy

/// Deep copy through an encode/decode round trip.
///
/// Unlike `Clone`, the copy is re-decoded: trees come back in the base class
/// and every date-time string is recognized again.
pub fn clone<V: ?Sized + Encode>(value: &V) -> Result<Value, TreeError> {
    clone_with(value, &CloneOptions::default())
}

pub fn clone_with<V: ?Sized + Encode>(value: &V, options: &CloneOptions) -> Result<Value, TreeError> {
    let text = dumps_with(value, &options.dump_options())?;
    loads_with(&text, &options.load_options())
}
