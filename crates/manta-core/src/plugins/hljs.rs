use crate::assets::{AssetBundle, CssItem, JsItem};
use crate::hooks::TransformHooks;
use crate::plugin::{Plugin, PluginContext};
use htmlize::{escape_attribute, escape_text};

pub const NAME: &str = "hljs";

/// Fenced-code highlighting with the same lazy-load-then-retransform pattern as
/// math: without a highlighter the code renders escaped and the asset is requested.
pub struct HljsPlugin;

impl Plugin for HljsPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&self, hooks: &TransformHooks, ctx: &PluginContext) -> AssetBundle {
        let js_url = ctx.assets.hljs_js_url();
        let css_url = ctx.assets.hljs_css_url();

        let features = ctx.features.clone();
        let highlighter = ctx.highlighter.clone();
        let loader = ctx.loader.clone();
        let rule_js = js_url.clone();
        hooks.parser.tap(move |rules| {
            let features = features.clone();
            let highlighter = highlighter.clone();
            let loader = loader.clone();
            let js = rule_js.clone();
            rules.set_code_block_rule(move |lang, source| {
                features.enable(NAME);
                let class = match lang {
                    Some(lang) if !lang.is_empty() => {
                        format!(" class=\"language-{}\"", escape_attribute(lang))
                    }
                    _ => String::new(),
                };
                if let Some(h) = highlighter.get() {
                    if let Some(html) = h.highlight(source, lang) {
                        return format!("<pre><code{class}>{html}</code></pre>");
                    }
                } else {
                    loader.request(&js);
                }
                format!("<pre><code{class}>{}</code></pre>", escape_text(source))
            });
        });

        AssetBundle {
            styles: vec![CssItem::Stylesheet(css_url)],
            scripts: vec![JsItem::Script(js_url)],
        }
    }
}
