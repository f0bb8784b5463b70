use crate::assets::AssetBundle;
use crate::hooks::TransformHooks;
use crate::plugin::{Plugin, PluginContext};
use crate::render_rules::BlockContext;
use regex::Regex;
use std::sync::OnceLock;

pub const NAME: &str = "checkbox";

const CHECKED: &str = "<svg width=\"16\" height=\"16\" viewBox=\"0 0 16 16\" class=\"mm-checkbox mm-checkbox-checked\"><rect x=\"1\" y=\"1\" width=\"14\" height=\"14\" rx=\"3\"/><path d=\"M4 8.5 6.8 11 12 5\"/></svg> ";
const UNCHECKED: &str = "<svg width=\"16\" height=\"16\" viewBox=\"0 0 16 16\" class=\"mm-checkbox\"><rect x=\"1\" y=\"1\" width=\"14\" height=\"14\" rx=\"3\"/></svg> ";

fn prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([ xX])\]\s+").unwrap())
}

/// Rewrites literal `[ ]` / `[x]` prefixes (and tokenizer task-list markers) into
/// inline SVG glyphs. Only the very start of heading content or a list item's lead
/// paragraph qualifies; mid-text brackets and fenced code are never touched.
pub struct CheckboxPlugin;

impl Plugin for CheckboxPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&self, hooks: &TransformHooks, ctx: &PluginContext) -> AssetBundle {
        let features = ctx.features.clone();
        hooks.parser.tap(move |rules| {
            {
                let features = features.clone();
                rules.set_checkbox_rule(move |checked| {
                    features.enable(NAME);
                    (if checked { CHECKED } else { UNCHECKED }).to_string()
                });
            }
            let features = features.clone();
            rules.add_content_filter(move |context, content| {
                if !matches!(context, BlockContext::Heading | BlockContext::ListItemLead) {
                    return;
                }
                if let Some(caps) = prefix_re().captures(content) {
                    let glyph = if &caps[1] == " " { UNCHECKED } else { CHECKED };
                    let rest = content[caps.get(0).unwrap().end()..].to_string();
                    features.enable(NAME);
                    *content = format!("{glyph}{rest}");
                }
            });
        });
        AssetBundle::default()
    }
}
