use chrono::NaiveDate;
use json_tree::{
    dumps, dumps_with, loads, loads_with, DumpOptions, FixedTzOffset, JsonTree, LoadOptions, Timestamp, Value,
};
use proptest::prelude::*;

fn json_leaf() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-z ]{0,8}".prop_map(serde_json::Value::from),
        "\\PC{0,6}".prop_map(serde_json::Value::from),
    ]
}

fn json_value() -> impl Strategy<Value = serde_json::Value> {
    json_leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(serde_json::Value::Array),
            prop::collection::vec(("[a-z_]{1,5}", inner), 0..5)
                .prop_map(|entries| serde_json::Value::Object(entries.into_iter().collect())),
        ]
    })
}

fn timestamp() -> impl Strategy<Value = Timestamp> {
    (
        1i32..=9999,
        1u32..=12,
        1u32..=28,
        0u32..86_400,
        0u32..1_000_000,
        prop::option::of(-14 * 60i32..=14 * 60),
    )
        .prop_map(|(year, month, day, secs, micros, offset)| {
            let local = NaiveDate::from_ymd_opt(year, month, day)
                .and_then(|date| date.and_hms_micro_opt(secs / 3600, secs / 60 % 60, secs % 60, micros))
                .unwrap();
            match offset.and_then(FixedTzOffset::from_minutes) {
                Some(offset) => Timestamp::with_offset(local, offset),
                None => Timestamp::naive(local),
            }
        })
}

fn is_date_like(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::String(s) => json_tree::parse_datetime(s).is_some(),
        serde_json::Value::Array(items) => items.iter().any(is_date_like),
        serde_json::Value::Object(map) => map.values().any(is_date_like),
        _ => false,
    }
}

proptest! {
    #[test]
    fn loads_inverts_dumps(json in json_value()) {
        prop_assume!(!is_date_like(&json));
        let value = Value::from(json.clone());
        let text = dumps(&value).unwrap();
        let back = loads(&text).unwrap();
        prop_assert_eq!(&back, &value);
        prop_assert_eq!(back.to_json(), json);
    }

    #[test]
    fn every_layout_parses_back(json in json_value(), indent in prop::option::of(0usize..4), sort in any::<bool>()) {
        prop_assume!(!is_date_like(&json));
        let mut options = DumpOptions::new().sort_keys(sort).ensure_ascii(!sort);
        if let Some(width) = indent {
            options = options.indent_spaces(width);
        }
        let text = dumps_with(&Value::from(json.clone()), &options).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(reparsed, json);
    }

    #[test]
    fn timestamps_survive_round_trip(stamps in prop::collection::vec(timestamp(), 1..6)) {
        let tree: JsonTree = stamps
            .iter()
            .enumerate()
            .map(|(index, ts)| (format!("t{index}"), *ts))
            .collect();
        let back = loads(&dumps(&tree).unwrap()).unwrap();
        prop_assert_eq!(&back, &Value::Tree(tree.clone()));

        let plain = loads_with(&dumps(&tree).unwrap(), &LoadOptions::new().plain_strings()).unwrap();
        for (key, value) in &tree {
            let expected = json_tree::format_datetime(value.as_datetime().unwrap());
            prop_assert_eq!(plain[key].as_str(), Some(expected.as_str()));
        }
    }

    #[test]
    fn vivification_is_idempotent(path in prop::collection::vec("[a-z]{1,3}", 1..6)) {
        let names: Vec<&str> = path.iter().map(String::as_str).collect();
        let mut tree = JsonTree::new();
        tree.attr_path(&names).unwrap();
        let once = dumps(&tree).unwrap();
        tree.attr_path(&names).unwrap();
        prop_assert_eq!(dumps(&tree).unwrap(), once);
        prop_assert_eq!(tree.len(), 1);
    }
}
