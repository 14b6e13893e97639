//! Date-time recognition and formatting for json-tree.
//!
//! Strings shaped like ISO-8601 date-times are turned into [`Timestamp`]s and
//! written back in canonical ISO form. Offsets are kept as a plain
//! [`FixedTzOffset`] annotation; no timezone database is involved.
//!
//! # Example
//!
//! ```
//! use json_tree_temporal::{format_datetime, parse_datetime};
//!
//! let ts = parse_datetime("2013-04-29 22:45:35.4361-0400").unwrap();
//! assert_eq!(ts.offset().unwrap().to_string(), "-04:00");
//! assert_eq!(format_datetime(&ts), "2013-04-29T22:45:35.436100-04:00");
//! ```

pub mod codec;
pub mod error;
pub mod offset;
pub mod timestamp;

pub use codec::{format_datetime, parse_datetime};
pub use error::TemporalError;
pub use offset::FixedTzOffset;
pub use timestamp::Timestamp;
