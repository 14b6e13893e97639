use chrono::{NaiveDate, Timelike};
use json_tree_temporal::{format_datetime, parse_datetime, FixedTzOffset, Timestamp};
use proptest::prelude::*;

fn fraction_text(digits: usize, value: u32) -> String {
    if digits == 0 {
        return String::new();
    }
    let scaled = value % 10u32.pow(digits as u32);
    format!(".{scaled:0width$}", width = digits)
}

proptest! {
    #[test]
    fn recognize_inverts_format(
        year in 1i32..=9999,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
        digits in 0usize..=7,
        fraction in 0u32..10_000_000,
        offset in prop::option::of(-14 * 60i32..=14 * 60),
    ) {
        let text = format!(
            "{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}{}",
            fraction_text(digits, fraction)
        );
        let parsed = parse_datetime(&text).unwrap();
        let local = parsed.local();
        let ts = match offset {
            Some(minutes) => Timestamp::with_offset(local, FixedTzOffset::from_minutes(minutes).unwrap()),
            None => Timestamp::naive(local),
        };

        let back = parse_datetime(&format_datetime(&ts)).unwrap();
        prop_assert_eq!(back, ts);
        prop_assert_eq!(back.local().date(), NaiveDate::from_ymd_opt(year, month, day).unwrap());
        prop_assert_eq!(back.local().hour(), hour);
        prop_assert_eq!(back.offset().map(|o| o.minutes()), offset);
    }

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC*") {
        let _ = parse_datetime(&text);
    }
}

#[test]
fn scenario_fraction_and_offset() {
    let ts = parse_datetime("2013-04-29T22:45:35.4361-04:00").unwrap();
    assert_eq!(ts.microsecond(), 436_100);
    assert_eq!(ts.offset(), Some(FixedTzOffset::parse("-04:00").unwrap()));
    assert_eq!(format_datetime(&ts), "2013-04-29T22:45:35.436100-04:00");
}

#[test]
fn space_separator_is_normalized() {
    let spaced = parse_datetime("2013-04-29 22:45:35").unwrap();
    let tee = parse_datetime("2013-04-29T22:45:35").unwrap();
    assert_eq!(spaced, tee);
}

#[test]
fn offset_dst_artifact_is_observable() {
    let ts = parse_datetime("2013-04-29T22:45:35-04:00").unwrap();
    let tz = ts.offset().unwrap();
    assert_eq!(tz.dst(), chrono::TimeDelta::hours(-5));
    assert_eq!(tz.name(), "");
}
