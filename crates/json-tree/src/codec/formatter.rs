//! Output formatting for the tree encoder.
//!
//! [`TreeFormatter`] plugs into `serde_json::Serializer` and controls layout:
//! optional indentation, the separators written between items and between a
//! key and its value, and whether non-ASCII text is escaped.

use std::io;

use serde_json::ser::Formatter;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Configurable `serde_json` formatter.
///
/// Without indentation everything goes on one line, separated by
/// `item_separator` and `key_separator`. With indentation every element starts
/// on its own line, indented once per nesting level; empty containers stay
/// `[]` / `{}`.
#[derive(Debug, Clone)]
pub struct TreeFormatter {
    indent: Option<Vec<u8>>,
    item_separator: Vec<u8>,
    key_separator: Vec<u8>,
    ensure_ascii: bool,
    current_indent: usize,
    has_value: bool,
}

impl Default for TreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeFormatter {
    /// Single-line output with `", "` and `": "` separators and ASCII-only
    /// text.
    pub fn new() -> Self {
        Self {
            indent: None,
            item_separator: b", ".to_vec(),
            key_separator: b": ".to_vec(),
            ensure_ascii: true,
            current_indent: 0,
            has_value: false,
        }
    }

    /// Put each element on its own line, indented by `indent` per level.
    pub fn with_indent(mut self, indent: &[u8]) -> Self {
        self.indent = Some(indent.to_vec());
        self
    }

    pub fn with_separators(mut self, item: &[u8], key: &[u8]) -> Self {
        self.item_separator = item.to_vec();
        self.key_separator = key.to_vec();
        self
    }

    /// When set, every character outside printable ASCII that `serde_json`
    /// does not already escape (DEL and everything non-ASCII) is written as a
    /// `\uXXXX` escape, a surrogate pair outside the BMP.
    pub fn with_ensure_ascii(mut self, ensure_ascii: bool) -> Self {
        self.ensure_ascii = ensure_ascii;
        self
    }

    fn begin_element<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(&self.item_separator)?;
        }
        if let Some(indent) = &self.indent {
            writer.write_all(b"\n")?;
            for _ in 0..self.current_indent {
                writer.write_all(indent)?;
            }
        }
        Ok(())
    }

    fn end_container<W>(&mut self, writer: &mut W, close: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent -= 1;
        if let Some(indent) = &self.indent {
            if self.has_value {
                writer.write_all(b"\n")?;
                for _ in 0..self.current_indent {
                    writer.write_all(indent)?;
                }
            }
        }
        writer.write_all(close)
    }
}

fn needs_escape(ch: char) -> bool {
    !ch.is_ascii() || ch == '\u{7f}'
}

fn write_u16_escape<W>(writer: &mut W, unit: u16) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    let bytes = [
        b'\\',
        b'u',
        HEX[usize::from(unit >> 12)],
        HEX[usize::from((unit >> 8) & 0xf)],
        HEX[usize::from((unit >> 4) & 0xf)],
        HEX[usize::from(unit & 0xf)],
    ];
    writer.write_all(&bytes)
}

impl Formatter for TreeFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.end_container(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_element(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.end_container(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.begin_element(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(&self.key_separator)
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.ensure_ascii || !fragment.chars().any(needs_escape) {
            return writer.write_all(fragment.as_bytes());
        }
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if !needs_escape(ch) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write_u16_escape(writer, *unit)?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    fn render(value: &serde_json::Value, formatter: TreeFormatter) -> String {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn default_layout() {
        let value = json!({"a": [1, 2], "b": {}});
        assert_eq!(render(&value, TreeFormatter::new()), r#"{"a": [1, 2], "b": {}}"#);
    }

    #[test]
    fn compact_separators() {
        let value = json!({"a": [1, 2]});
        let formatter = TreeFormatter::new().with_separators(b",", b":");
        assert_eq!(render(&value, formatter), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn indented_layout() {
        let value = json!({"a": [1, {}], "b": []});
        let formatter = TreeFormatter::new().with_indent(b"  ").with_separators(b",", b": ");
        assert_eq!(
            render(&value, formatter),
            "{\n  \"a\": [\n    1,\n    {}\n  ],\n  \"b\": []\n}"
        );
    }

    #[test]
    fn ascii_escapes() {
        let value = json!("caf\u{e9} \u{1f600}");
        assert_eq!(render(&value, TreeFormatter::new()), r#""caf\u00e9 \ud83d\ude00""#);
        let raw = TreeFormatter::new().with_ensure_ascii(false);
        assert_eq!(render(&value, raw), "\"caf\u{e9} \u{1f600}\"");
    }

    #[test]
    fn delete_is_escaped_with_ensure_ascii() {
        let value = json!("a\u{7f}b");
        assert_eq!(render(&value, TreeFormatter::new()), r#""a\u007fb""#);
        let raw = TreeFormatter::new().with_ensure_ascii(false);
        assert_eq!(render(&value, raw), "\"a\u{7f}b\"");
    }

    #[test]
    fn control_characters_still_escaped() {
        let value = json!("a\"b\n\u{1}");
        assert_eq!(render(&value, TreeFormatter::new()), r#""a\"b\n\u0001""#);
    }
}
