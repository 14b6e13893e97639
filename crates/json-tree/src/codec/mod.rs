//! JSON encoding and decoding of trees.
//!
//! Both directions go through `serde_json`: the encoder is a serde
//! `Serialize` adapter writing through [`TreeFormatter`], the decoder a
//! `DeserializeSeed` adapter calling [`ParseHooks`] for every object and
//! string value.

pub mod decoder;
pub mod encoder;
pub mod formatter;

pub use decoder::{decode_datetime, decode_reader_with, decode_str_with, DateTimeDecoder, ParseHooks, TreeDecoder};
pub use encoder::{DateTimeEncoder, Encode, Encoded, TreeEncoder};
pub use formatter::TreeFormatter;
