use crate::JsonOptions;
use serde_json::json;

#[test]
fn from_loose_coerces_bare_strings_into_lists() {
    let opts = JsonOptions::from_loose(&json!({ "color": "red" }));
    assert_eq!(opts.color, Some(vec!["red".to_string()]));
}

#[test]
fn from_loose_filters_non_string_list_entries() {
    let opts = JsonOptions::from_loose(&json!({
        "color": ["red", 1, "blue", null],
        "extraJs": [1, 2],
    }));
    assert_eq!(
        opts.color,
        Some(vec!["red".to_string(), "blue".to_string()])
    );
    assert_eq!(opts.extra_js, None, "all entries filtered drops the key");
}

#[test]
fn from_loose_drops_non_numeric_numbers() {
    let opts = JsonOptions::from_loose(&json!({
        "duration": "fast",
        "maxWidth": 300,
        "spacingHorizontal": 40.5,
        "colorFreezeLevel": -2,
    }));
    assert_eq!(opts.duration, None);
    assert_eq!(opts.max_width, Some(300.0));
    assert_eq!(opts.spacing_horizontal, Some(40.5));
    assert_eq!(opts.color_freeze_level, None, "negative levels are invalid");
}

#[test]
fn from_loose_ignores_non_object_values() {
    assert_eq!(JsonOptions::from_loose(&json!("nope")), JsonOptions::default());
    assert_eq!(JsonOptions::from_loose(&json!(null)), JsonOptions::default());
}

#[test]
fn serializes_with_camel_case_keys_and_skips_absent_fields() {
    let opts = JsonOptions {
        initial_expand_level: Some(2),
        zoom: Some(false),
        ..JsonOptions::default()
    };
    let value = serde_json::to_value(&opts).unwrap();
    assert_eq!(value, json!({ "initialExpandLevel": 2, "zoom": false }));
}
