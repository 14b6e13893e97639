//! Auto-vivifying attribute trees over ordered JSON objects.
//!
//! A [`JsonTree`] is an insertion-ordered mapping where reading a missing key
//! creates an empty sub-tree instead of failing, so deep structures can be
//! written without building every level first. Loading JSON turns every
//! object into a tree and every ISO-8601 date-time string into a
//! [`Timestamp`]; dumping writes them back.
//!
//! # Example
//!
//! ```
//! use json_tree::{attr, dumps, loads, JsonTree, Value};
//!
//! let mut data = JsonTree::new();
//! *attr!(data.state.status.active) = Value::from(true);
//! data["state"]["status"]["count"] = Value::from(3);
//!
//! let text = dumps(&data).unwrap();
//! assert_eq!(text, r#"{"state": {"status": {"active": true, "count": 3}}}"#);
//!
//! let mut back = loads(&text).unwrap().into_tree().unwrap();
//! assert_eq!(back["state"]["status"]["count"], 3);
//! assert_eq!(*attr!(back.state.status.active), true);
//! ```
//!
//! Name-mapped classes translate attribute names into storage keys:
//!
//! ```
//! use json_tree::{attr, make_class};
//!
//! let numbers = make_class([("one", "1"), ("two", "2")]).unwrap();
//! let mut number = numbers.new_tree();
//! *attr!(number.one) = "something".into();
//! assert_eq!(number["1"], "something");
//! ```

pub mod codec;
pub mod error;
pub mod facade;
pub mod key;
pub mod mapping;
pub mod tree;
pub mod value;

pub use codec::{
    decode_datetime, DateTimeDecoder, DateTimeEncoder, Encode, ParseHooks, TreeDecoder, TreeEncoder, TreeFormatter,
};
pub use error::TreeError;
pub use facade::{
    clone, clone_with, dump, dump_with, dumps, dumps_with, load, load_with, loads, loads_with, CloneOptions,
    DumpOptions, LoadOptions,
};
pub use key::Key;
pub use mapping::{make_class, mapped_tree, MapFn, NameMapping, TreeClass};
pub use tree::{Attr, JsonTree, TreeIndex};
pub use value::Value;

pub use json_tree_temporal::{format_datetime, parse_datetime, FixedTzOffset, TemporalError, Timestamp};
