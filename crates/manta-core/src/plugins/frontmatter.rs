use crate::assets::AssetBundle;
use crate::frontmatter;
use crate::hooks::TransformHooks;
use crate::options::JsonOptions;
use crate::plugin::{Plugin, PluginContext};

/// Strips a leading YAML front-matter block, records the consumed line count for
/// downstream line mapping, and normalizes the `markmap:` options subset.
pub struct FrontmatterPlugin;

impl Plugin for FrontmatterPlugin {
    fn name(&self) -> &'static str {
        "frontmatter"
    }

    fn install(&self, hooks: &TransformHooks, _ctx: &PluginContext) -> AssetBundle {
        hooks.before_parse.tap(|ctx| {
            let Some(fm) = frontmatter::extract(&ctx.text) else {
                return;
            };
            ctx.text = fm.rest;
            ctx.content_line_offset = fm.line_offset;
            if let Some(data) = fm.data {
                if let Some(markmap) = data.get("markmap") {
                    ctx.json_options = Some(JsonOptions::from_loose(markmap));
                }
                ctx.frontmatter = data.as_object().cloned();
            }
        });
        AssetBundle::default()
    }
}
