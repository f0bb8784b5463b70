//! Full view-side options schema and its derivation from the serializable subset.

use indexmap::IndexMap;
use manta_core::JsonOptions;
use std::cell::RefCell;

/// d3's `schemeCategory10`, the reference palette for branch coloring.
pub const DEFAULT_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, PartialEq)]
pub struct MindmapOptions {
    /// Branch color palette. A single entry means one constant color for the
    /// whole map.
    pub colors: Vec<String>,
    /// Number of leading path segments that decide a node's color; 0 keys the
    /// scale on the full path.
    pub color_freeze_level: u32,
    /// Transition duration in milliseconds; 0 disables animation.
    pub duration: f64,
    /// Content wrap width; 0 = unlimited.
    pub max_width: f64,
    /// Fold every branch node at depth >= this level on `set_data`; -1 disables.
    pub initial_expand_level: i64,
    pub spacing_horizontal: f64,
    pub spacing_vertical: f64,
    pub padding_x: f64,
    pub node_min_height: f64,
    /// Fraction of the viewport the fitted map may occupy.
    pub fit_ratio: f64,
    pub max_initial_scale: f64,
    pub zoom: bool,
    pub pan: bool,
}

impl Default for MindmapOptions {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|s| s.to_string()).collect(),
            color_freeze_level: 0,
            duration: 500.0,
            max_width: 0.0,
            initial_expand_level: -1,
            spacing_horizontal: 80.0,
            spacing_vertical: 5.0,
            padding_x: 8.0,
            node_min_height: 16.0,
            fit_ratio: 0.95,
            max_initial_scale: 2.0,
            zoom: true,
            pan: true,
        }
    }
}

/// Pure derivation from the serializable subset; unset fields keep defaults.
pub fn derive_options(json: &JsonOptions) -> MindmapOptions {
    let mut opts = MindmapOptions::default();
    if let Some(colors) = &json.color {
        if !colors.is_empty() {
            opts.colors = colors.clone();
        }
    }
    if let Some(level) = json.color_freeze_level {
        opts.color_freeze_level = level;
    }
    if let Some(duration) = json.duration {
        opts.duration = duration.max(0.0);
    }
    if let Some(max_width) = json.max_width {
        opts.max_width = max_width.max(0.0);
    }
    if let Some(level) = json.initial_expand_level {
        opts.initial_expand_level = level;
    }
    if let Some(v) = json.spacing_horizontal {
        opts.spacing_horizontal = v;
    }
    if let Some(v) = json.spacing_vertical {
        opts.spacing_vertical = v;
    }
    if let Some(zoom) = json.zoom {
        opts.zoom = zoom;
    }
    if let Some(pan) = json.pan {
        opts.pan = pan;
    }
    opts
}

/// Deterministic ordinal color scale: each distinct key takes the next palette
/// entry on first sight, wrapping when the palette runs out. Keyed by the node
/// path truncated to `color_freeze_level` segments, so children past the freeze
/// depth inherit their ancestor's color.
pub struct ColorScale {
    colors: Vec<String>,
    freeze_level: u32,
    assigned: RefCell<IndexMap<String, usize>>,
}

impl ColorScale {
    pub fn new(options: &MindmapOptions) -> Self {
        Self {
            colors: options.colors.clone(),
            freeze_level: options.color_freeze_level,
            assigned: RefCell::new(IndexMap::new()),
        }
    }

    pub fn color_for(&self, path: &str) -> String {
        // A single-color palette never consults the key.
        if self.colors.len() == 1 {
            return self.colors[0].clone();
        }
        let key = if self.freeze_level > 0 {
            path.split('.')
                .take(self.freeze_level as usize)
                .collect::<Vec<_>>()
                .join(".")
        } else {
            path.to_string()
        };
        let mut assigned = self.assigned.borrow_mut();
        let next = assigned.len();
        let index = *assigned.entry(key).or_insert(next);
        self.colors[index % self.colors.len()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn derivation_keeps_defaults_for_unset_fields() {
        let opts = derive_options(&JsonOptions::default());
        assert_eq!(opts, MindmapOptions::default());
    }

    #[test]
    fn derivation_applies_present_fields() {
        let json = JsonOptions::from_loose(&json!({
            "color": ["red", "blue"],
            "duration": 0,
            "initialExpandLevel": 2,
            "zoom": false,
        }));
        let opts = derive_options(&json);
        assert_eq!(opts.colors, ["red", "blue"]);
        assert_eq!(opts.duration, 0.0);
        assert_eq!(opts.initial_expand_level, 2);
        assert!(!opts.zoom);
        assert!(opts.pan, "untouched fields keep their defaults");
    }

    #[test]
    fn single_color_palette_short_circuits_the_scale() {
        let opts = MindmapOptions {
            colors: vec!["teal".to_string()],
            color_freeze_level: 3,
            ..MindmapOptions::default()
        };
        let scale = ColorScale::new(&opts);
        assert_eq!(scale.color_for("1"), "teal");
        assert_eq!(scale.color_for("1.2.3.4"), "teal");
    }

    #[test]
    fn scale_is_deterministic_and_freeze_level_groups_descendants() {
        let opts = MindmapOptions {
            colors: vec!["a".into(), "b".into(), "c".into()],
            color_freeze_level: 2,
            ..MindmapOptions::default()
        };
        let scale = ColorScale::new(&opts);
        let c1 = scale.color_for("1.2");
        let c2 = scale.color_for("1.5");
        assert_ne!(c1, c2);
        // Deeper nodes reuse their second-level ancestor's key.
        assert_eq!(scale.color_for("1.2.7"), c1);
        assert_eq!(scale.color_for("1.5.9.11"), c2);
        // Same queries, same answers.
        assert_eq!(scale.color_for("1.2"), c1);
    }

    #[test]
    fn palette_wraps_when_keys_outnumber_colors() {
        let opts = MindmapOptions {
            colors: vec!["a".into(), "b".into()],
            ..MindmapOptions::default()
        };
        let scale = ColorScale::new(&opts);
        let first = scale.color_for("1");
        scale.color_for("2");
        assert_eq!(scale.color_for("3"), first);
    }
}
