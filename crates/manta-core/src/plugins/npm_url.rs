use crate::assets::{AssetBundle, AssetConfig};
use crate::hooks::TransformHooks;
use crate::plugin::{Plugin, PluginContext};

/// Rewrites `npm:<package>/<path>` references in front-matter `extraJs`/`extraCss`
/// into fully resolved CDN URLs. Unresolvable references are left as written.
pub struct NpmUrlPlugin;

fn rewrite_list(list: &mut Option<Vec<String>>, assets: &AssetConfig) {
    let Some(entries) = list else {
        return;
    };
    for entry in entries.iter_mut() {
        if !entry.starts_with("npm:") {
            continue;
        }
        match assets.resolve_npm(entry) {
            Some(resolved) => *entry = resolved,
            None => tracing::warn!(reference = %entry, "unresolvable npm asset reference"),
        }
    }
}

impl Plugin for NpmUrlPlugin {
    fn name(&self) -> &'static str {
        "npmUrl"
    }

    fn install(&self, hooks: &TransformHooks, ctx: &PluginContext) -> AssetBundle {
        let assets = ctx.assets.clone();
        hooks.after_parse.tap(move |ctx| {
            if let Some(options) = &mut ctx.json_options {
                rewrite_list(&mut options.extra_js, &assets);
                rewrite_list(&mut options.extra_css, &assets);
            }
        });
        AssetBundle::default()
    }
}
