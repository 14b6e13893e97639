//! The temporal value produced by the recognizer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use serde::{Serialize, Serializer};

use crate::codec::{format_datetime, parse_datetime};
use crate::error::TemporalError;
use crate::offset::FixedTzOffset;

/// A wall-clock date-time with an optional fixed UTC offset.
///
/// Without an offset the value is naive. With one, `local` is the wall-clock
/// time *in* that offset, exactly as it appeared in the source text.
///
/// Equality is field-wise: two aware timestamps denoting the same instant in
/// different offsets are not equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedTzOffset>,
}

impl Timestamp {
    pub fn naive(local: NaiveDateTime) -> Self {
        Self {
            local,
            offset: None,
        }
    }

    pub fn with_offset(local: NaiveDateTime, offset: FixedTzOffset) -> Self {
        Self {
            local,
            offset: Some(offset),
        }
    }

    /// Wall-clock date and time, without the offset.
    pub fn local(&self) -> NaiveDateTime {
        self.local
    }

    pub fn offset(&self) -> Option<FixedTzOffset> {
        self.offset
    }

    pub fn is_naive(&self) -> bool {
        self.offset.is_none()
    }

    /// Sub-second part truncated to microseconds.
    pub fn microsecond(&self) -> u32 {
        self.local.nanosecond() / 1_000
    }

    /// The aware chrono value, or `None` for naive timestamps.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset?.to_fixed_offset();
        self.local.and_local_timezone(offset).single()
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(local: NaiveDateTime) -> Self {
        Self::naive(local)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    /// Offsets are kept at minute resolution; leftover seconds are dropped.
    fn from(value: DateTime<FixedOffset>) -> Self {
        let minutes = value.offset().local_minus_utc() / 60;
        let offset = FixedTzOffset::from_minutes(minutes).unwrap_or(FixedTzOffset::UTC);
        Self::with_offset(value.naive_local(), offset)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_datetime(self))
    }
}

impl FromStr for Timestamp {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_datetime(s).ok_or_else(|| TemporalError::NotADateTime(s.to_string()))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_datetime(self))
    }
}
