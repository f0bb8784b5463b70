use crate::assets::{AssetBundle, CssItem, JsItem};
use crate::hooks::TransformHooks;
use crate::loader::AssetLoader;
use crate::plugin::{Capability, MathTypesetter, Plugin, PluginContext};
use htmlize::escape_text;

pub const NAME: &str = "katex";

/// Math rendering. When no typesetter is available yet (the lazy-load scenario) the
/// raw source is emitted in a placeholder span, the library asset is requested, and
/// the owning view is expected to retransform once the load completes.
pub struct KatexPlugin;

fn render_math(
    source: &str,
    display: bool,
    math: &Capability<dyn MathTypesetter>,
    loader: &AssetLoader,
    js_url: &str,
) -> String {
    if let Some(typesetter) = math.get() {
        return typesetter.render(source, display);
    }
    loader.request(js_url);
    let class = if display { "math math-display" } else { "math" };
    format!("<span class=\"{class}\">{}</span>", escape_text(source))
}

impl Plugin for KatexPlugin {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&self, hooks: &TransformHooks, ctx: &PluginContext) -> AssetBundle {
        let js_url = ctx.assets.katex_js_url();
        let css_url = ctx.assets.katex_css_url();

        let features = ctx.features.clone();
        let math = ctx.math.clone();
        let loader = ctx.loader.clone();
        let rule_js = js_url.clone();
        hooks.parser.tap(move |rules| {
            {
                let features = features.clone();
                let math = math.clone();
                let loader = loader.clone();
                let js = rule_js.clone();
                rules.set_inline_math_rule(move |src| {
                    features.enable(NAME);
                    render_math(src, false, &math, &loader, &js)
                });
            }
            let features = features.clone();
            let math = math.clone();
            let loader = loader.clone();
            let js = rule_js.clone();
            rules.set_block_math_rule(move |src| {
                features.enable(NAME);
                render_math(src, true, &math, &loader, &js)
            });
        });

        AssetBundle {
            styles: vec![CssItem::Stylesheet(css_url)],
            scripts: vec![JsItem::Script(js_url)],
        }
    }
}
