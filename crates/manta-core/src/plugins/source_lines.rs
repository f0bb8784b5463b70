use crate::assets::AssetBundle;
use crate::hooks::TransformHooks;
use crate::plugin::{Plugin, PluginContext};

/// Tags every block node with its source line span, enabling cursor-sync features
/// ("scroll to the node under the editor cursor") downstream.
pub struct SourceLinesPlugin;

impl Plugin for SourceLinesPlugin {
    fn name(&self) -> &'static str {
        "sourceLines"
    }

    fn install(&self, hooks: &TransformHooks, _ctx: &PluginContext) -> AssetBundle {
        hooks.parser.tap(|rules| {
            rules.tag_lines = true;
        });
        AssetBundle::default()
    }
}
