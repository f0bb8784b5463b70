//! Serializable options subset accepted from front matter or external config.
//!
//! The full view-side options schema (color functions, toggles) is derived from this
//! by the render crate; this layer only normalizes loosely typed input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JsonOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_freeze_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_expand_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_horizontal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_vertical: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_js: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_css: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<bool>,
}

impl JsonOptions {
    /// Builds the options subset from a loosely typed front-matter value.
    ///
    /// Front matter is user input, so every field is coerced rather than rejected:
    /// string-list fields wrap bare strings, filter non-string entries and drop the key
    /// when nothing is left; numeric fields drop non-numeric values.
    pub fn from_loose(value: &Value) -> Self {
        let mut opts = Self::default();
        let Some(map) = value.as_object() else {
            return opts;
        };

        opts.color = string_list(map.get("color"));
        opts.extra_js = string_list(map.get("extraJs"));
        opts.extra_css = string_list(map.get("extraCss"));

        opts.duration = number(map.get("duration"));
        opts.max_width = number(map.get("maxWidth"));
        opts.spacing_horizontal = number(map.get("spacingHorizontal"));
        opts.spacing_vertical = number(map.get("spacingVertical"));
        opts.initial_expand_level = number(map.get("initialExpandLevel")).map(|v| v as i64);
        opts.color_freeze_level =
            number(map.get("colorFreezeLevel")).and_then(|v| (v >= 0.0).then_some(v as u32));

        opts.zoom = map.get("zoom").and_then(Value::as_bool);
        opts.pan = map.get("pan").and_then(Value::as_bool);

        opts
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let list: Vec<String> = match value? {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    (!list.is_empty()).then_some(list)
}

fn number(value: Option<&Value>) -> Option<f64> {
    value?.as_f64()
}
