//! ISO-8601 recognizer and formatter.
//!
//! Recognized shapes:
//!
//! ```text
//! 2013-04-29T22:45:35.294303
//! 2013-04-29 22:45:35
//! 2013-04-29T22:45:35.4361-0400
//! 2013-04-29T22:45:35.4361-04:00
//! ```
//!
//! A trailing `Z` without a numeric offset is matched but never decoded: such
//! strings are left as they are.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;

use crate::offset::FixedTzOffset;
use crate::timestamp::Timestamp;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const FRACTION_FORMAT: &str = "%.f";
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn datetime_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?P<parsable>[0-9]{4}-[0-9]{2}-[0-9]{2}(?P<sep>[ T])[0-9]{2}:[0-9]{2}:[0-9]{2}(?P<fraction>\.[0-9]{1,7})?)(?P<offset>[-+][0-9]{2}:?[0-9]{2})?(?P<zulu>Z)?",
        )
        .unwrap()
    })
}

/// Recognize a date-time at the start of `text`.
///
/// Characters after the recognized prefix are ignored. Returns `None` when the
/// text does not have the date-time shape, and also when it has the shape but
/// names an impossible date or time (`2013-13-40T99:99:99`), a leap second, year
/// zero, or an offset of a full day or more.
///
/// A numeric offset takes precedence over a trailing `Z`. A `Z` with no
/// numeric offset yields `None`.
///
/// # Example
///
/// ```
/// use json_tree_temporal::parse_datetime;
///
/// let ts = parse_datetime("2013-04-29T22:45:35.4361-04:00").unwrap();
/// assert_eq!(ts.microsecond(), 436_100);
/// assert_eq!(ts.offset().unwrap().minutes(), -240);
///
/// assert!(parse_datetime("hello world").is_none());
/// assert!(parse_datetime("2013-13-40T99:99:99").is_none());
/// assert!(parse_datetime("2013-04-29T22:45:35.294303Z").is_none());
/// ```
pub fn parse_datetime(text: &str) -> Option<Timestamp> {
    let caps = datetime_regex().captures(text)?;
    let parsable = caps.name("parsable")?.as_str();

    let mut format = String::with_capacity(20);
    format.push_str(DATE_FORMAT);
    format.push_str(caps.name("sep")?.as_str());
    format.push_str(TIME_FORMAT);
    if caps.name("fraction").is_some() {
        format.push_str(FRACTION_FORMAT);
    }

    let local = match NaiveDateTime::parse_from_str(parsable, &format) {
        Ok(local) if is_representable(&local) => local,
        _ => {
            tracing::trace!(input = text, "date-time shaped string failed validation");
            return None;
        }
    };

    match (caps.name("offset"), caps.name("zulu")) {
        (Some(offset), _) => match FixedTzOffset::parse(offset.as_str()) {
            Ok(offset) => Some(Timestamp::with_offset(local, offset)),
            Err(err) => {
                tracing::trace!(input = text, error = %err, "date-time offset rejected");
                None
            }
        },
        (None, Some(_)) => {
            tracing::trace!(input = text, "zulu-suffixed date-time left undecoded");
            None
        }
        (None, None) => Some(Timestamp::naive(local)),
    }
}

// Year zero and leap seconds parse in chrono but have no ISO calendar
// counterpart in the formats this codec round-trips.
fn is_representable(local: &NaiveDateTime) -> bool {
    local.year() >= 1 && local.nanosecond() < 1_000_000_000
}

/// Format a timestamp as ISO-8601: `YYYY-MM-DDTHH:MM:SS[.ffffff][±HH:MM]`.
///
/// The fraction is omitted when zero and printed with six digits otherwise;
/// seven or nine digits are used only when needed to keep the stored
/// precision.
///
/// # Example
///
/// ```
/// use json_tree_temporal::{format_datetime, parse_datetime};
///
/// let ts = parse_datetime("2013-04-29 22:45:35.4361-0400").unwrap();
/// assert_eq!(format_datetime(&ts), "2013-04-29T22:45:35.436100-04:00");
/// ```
pub fn format_datetime(ts: &Timestamp) -> String {
    let local = ts.local();
    let mut out = local.format(ISO_FORMAT).to_string();
    let nanos = local.nanosecond();
    if nanos != 0 {
        let fraction = if nanos % 1_000 == 0 {
            format!(".{:06}", nanos / 1_000)
        } else if nanos % 100 == 0 {
            format!(".{:07}", nanos / 100)
        } else {
            format!(".{nanos:09}")
        };
        out.push_str(&fraction);
    }
    if let Some(offset) = ts.offset() {
        out.push_str(&offset.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(text: &str) -> String {
        format_datetime(&parse_datetime(text).unwrap())
    }

    #[test]
    fn recognizes_documented_shapes() {
        assert_eq!(round("2013-04-29T22:45:35.294303"), "2013-04-29T22:45:35.294303");
        assert_eq!(round("2013-04-29 22:45:35"), "2013-04-29T22:45:35");
        assert_eq!(round("2013-04-29T22:45:35.4361-0400"), "2013-04-29T22:45:35.436100-04:00");
        assert_eq!(round("2013-04-29T22:45:35.4361-04:00"), "2013-04-29T22:45:35.436100-04:00");
    }

    #[test]
    fn non_matching_text() {
        for text in ["hello world", "", "2013-04-29", "2013-04-29X22:45:35", "13-04-29T22:45:35", " 2013-04-29T22:45:35"] {
            assert_eq!(parse_datetime(text), None, "{text:?}");
        }
    }

    #[test]
    fn shaped_but_invalid() {
        for text in [
            "2013-13-40T99:99:99",
            "2013-02-30T00:00:00",
            "2013-04-29T24:00:00",
            "2013-04-29T23:59:60",
            "0000-01-01T00:00:00",
            "2013-04-29T22:45:35+24:00",
        ] {
            assert_eq!(parse_datetime(text), None, "{text:?}");
        }
    }

    #[test]
    fn trailing_text_is_ignored() {
        let ts = parse_datetime("2013-04-29T22:45:35 and then some").unwrap();
        assert_eq!(format_datetime(&ts), "2013-04-29T22:45:35");
    }

    #[test]
    fn fraction_beyond_seven_digits_drops_offset() {
        // The fraction stops after seven digits, so the offset no longer
        // follows directly and is not recognized.
        let ts = parse_datetime("2013-04-29T22:45:35.12345678-04:00").unwrap();
        assert!(ts.is_naive());
        assert_eq!(format_datetime(&ts), "2013-04-29T22:45:35.1234567");
    }

    #[test]
    fn seven_digit_fraction_is_kept() {
        assert_eq!(round("2013-04-29T22:45:35.1234567+01:00"), "2013-04-29T22:45:35.1234567+01:00");
        assert_eq!(round("2013-04-29T22:45:35.1234560"), "2013-04-29T22:45:35.123456");
    }

    #[test]
    fn lone_zulu_is_not_decoded() {
        for text in ["2013-04-29T22:45:35Z", "2013-04-29T22:45:35.294303Z", "2013-04-29 22:45:35Z tail"] {
            assert_eq!(parse_datetime(text), None, "{text:?}");
        }
    }

    #[test]
    fn numeric_offset_wins_over_zulu() {
        let ts = parse_datetime("2013-04-29T22:45:35+02:00Z").unwrap();
        assert_eq!(ts.offset().unwrap().minutes(), 120);
    }

    #[test]
    fn offset_with_large_minutes_field() {
        let ts = parse_datetime("2013-04-29T22:45:35+05:75").unwrap();
        assert_eq!(ts.offset().unwrap().minutes(), 375);
        assert_eq!(format_datetime(&ts), "2013-04-29T22:45:35+06:15");
    }

    #[test]
    fn nanosecond_precision_formats_with_nine_digits() {
        let local = chrono::NaiveDate::from_ymd_opt(2001, 1, 1)
            .unwrap()
            .and_hms_nano_opt(0, 0, 0, 123_456_789)
            .unwrap();
        assert_eq!(format_datetime(&Timestamp::naive(local)), "2001-01-01T00:00:00.123456789");
    }

    #[test]
    fn early_years_are_zero_padded() {
        let local = chrono::NaiveDate::from_ymd_opt(7, 3, 9)
            .unwrap()
            .and_hms_opt(1, 2, 3)
            .unwrap();
        assert_eq!(format_datetime(&Timestamp::naive(local)), "0007-03-09T01:02:03");
    }
}
