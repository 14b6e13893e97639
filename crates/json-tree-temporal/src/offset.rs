//! Fixed UTC offset annotation attached to decoded timestamps.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, Offset, TimeDelta, Utc};

use crate::error::TemporalError;

const MINUTES_PER_DAY: i32 = 24 * 60;

/// An immutable, fixed UTC offset with no calendar-aware DST rules.
///
/// Built from the `±HH:MM` / `±HHMM` suffix of a date-time string. Only the
/// sign and the two numeric fields are interpreted; the minutes field is not
/// range checked on its own (`+05:75` is six hours and fifteen minutes).
///
/// # Example
///
/// ```
/// use json_tree_temporal::FixedTzOffset;
///
/// let tz = FixedTzOffset::parse("-04:00").unwrap();
/// assert_eq!(tz.minutes(), -240);
/// assert_eq!(tz.to_string(), "-04:00");
/// assert_eq!(tz.name(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedTzOffset {
    minutes: i32,
}

impl FixedTzOffset {
    /// The zero offset.
    pub const UTC: FixedTzOffset = FixedTzOffset { minutes: 0 };

    /// Parse `±HH:MM` or `±HHMM`.
    ///
    /// # Errors
    ///
    /// [`TemporalError::InvalidOffset`] when the text does not have that
    /// shape, [`TemporalError::OffsetOutOfRange`] when the offset reaches a
    /// full day.
    pub fn parse(text: &str) -> Result<Self, TemporalError> {
        let bytes = text.as_bytes();
        let invalid = || TemporalError::InvalidOffset(text.to_string());
        let negative = match bytes.first() {
            Some(b'+') => false,
            Some(b'-') => true,
            _ => return Err(invalid()),
        };
        let digits: Vec<u8> = match bytes.len() {
            6 if bytes[3] == b':' => vec![bytes[1], bytes[2], bytes[4], bytes[5]],
            5 => bytes[1..].to_vec(),
            _ => return Err(invalid()),
        };
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let field = |hi: u8, lo: u8| i32::from(hi - b'0') * 10 + i32::from(lo - b'0');
        let hours = field(digits[0], digits[1]);
        let mins = field(digits[2], digits[3]);
        let total = hours * 60 + mins;
        if total >= MINUTES_PER_DAY {
            return Err(TemporalError::OffsetOutOfRange(text.to_string()));
        }
        Ok(Self {
            minutes: if negative { -total } else { total },
        })
    }

    /// Build an offset from signed minutes east of UTC.
    ///
    /// Returns `None` when the magnitude reaches a full day.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        (minutes.abs() < MINUTES_PER_DAY).then_some(Self { minutes })
    }

    /// Signed offset in minutes east of UTC.
    pub fn minutes(&self) -> i32 {
        self.minutes
    }

    pub fn utc_offset(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.minutes))
    }

    /// The offset minus one hour.
    ///
    /// Vestigial: this value carries no daylight-saving meaning. It is kept
    /// observable because existing consumers of the encoded trees read it.
    pub fn dst(&self) -> TimeDelta {
        self.utc_offset() - TimeDelta::hours(1)
    }

    /// Display name. Always empty.
    pub fn name(&self) -> &str {
        ""
    }

    pub fn to_fixed_offset(&self) -> FixedOffset {
        // `parse`/`from_minutes` keep the magnitude below a day.
        FixedOffset::east_opt(self.minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl fmt::Display for FixedTzOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minutes < 0 { '-' } else { '+' };
        let abs = self.minutes.abs();
        write!(f, "{sign}{:02}:{:02}", abs / 60, abs % 60)
    }
}

impl FromStr for FixedTzOffset {
    type Err = TemporalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_shapes() {
        assert_eq!(FixedTzOffset::parse("+05:30").unwrap().minutes(), 330);
        assert_eq!(FixedTzOffset::parse("+0530").unwrap().minutes(), 330);
        assert_eq!(FixedTzOffset::parse("-0400").unwrap().minutes(), -240);
        assert_eq!(FixedTzOffset::parse("-00:00").unwrap(), FixedTzOffset::UTC);
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "05:30", "+5:30", "+05-30", "+05:3a", "+05:300", "Z"] {
            assert!(
                matches!(FixedTzOffset::parse(bad), Err(TemporalError::InvalidOffset(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_full_day() {
        assert_eq!(
            FixedTzOffset::parse("+24:00"),
            Err(TemporalError::OffsetOutOfRange("+24:00".to_string()))
        );
        assert!(FixedTzOffset::parse("-23:59").is_ok());
        assert!(FixedTzOffset::from_minutes(1440).is_none());
    }

    #[test]
    fn minutes_field_is_not_range_checked() {
        let tz = FixedTzOffset::parse("+05:75").unwrap();
        assert_eq!(tz.minutes(), 375);
        assert_eq!(tz.to_string(), "+06:15");
    }

    #[test]
    fn dst_is_offset_minus_one_hour() {
        let east = FixedTzOffset::parse("+05:30").unwrap();
        assert_eq!(east.dst(), TimeDelta::minutes(270));
        let west = FixedTzOffset::parse("-05:30").unwrap();
        assert_eq!(west.dst(), TimeDelta::minutes(-390));
        assert_eq!(FixedTzOffset::UTC.dst(), TimeDelta::hours(-1));
    }

    #[test]
    fn display_and_chrono_offset() {
        let tz: FixedTzOffset = "-0930".parse().unwrap();
        assert_eq!(tz.to_string(), "-09:30");
        assert_eq!(tz.to_fixed_offset().local_minus_utc(), -(9 * 3600 + 30 * 60));
        assert_eq!(tz.utc_offset(), TimeDelta::minutes(-570));
    }
}
