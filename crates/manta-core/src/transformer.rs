//! The transform pipeline: hooks around tokenization, tree building, cleanup.

use crate::assets::AssetBundle;
use crate::error::{Error, Result};
use crate::features::FeatureMap;
use crate::hooks::TransformHooks;
use crate::model::{ContentNode, NodeType};
use crate::options::JsonOptions;
use crate::plugin::{MathTypesetter, Plugin, PluginContext, SyntaxHighlighter};
use crate::plugins::builtin_plugins;
use crate::render_rules::RendererRules;
use crate::tree;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::rc::Rc;

/// Shared state of the `beforeParse` hook. Plugins may rewrite the raw text and
/// record front-matter metadata here before tokenization.
#[derive(Debug, Default)]
pub struct ParseContext {
    pub text: String,
    pub frontmatter: Option<Map<String, Value>>,
    pub json_options: Option<JsonOptions>,
    /// Source lines consumed ahead of the tokenized text (front matter).
    pub content_line_offset: usize,
}

/// Shared state of the `afterParse` hook: post-parse adjustments to parsed metadata.
#[derive(Debug, Default)]
pub struct TransformContext {
    pub frontmatter: Option<Map<String, Value>>,
    pub json_options: Option<JsonOptions>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    pub root: ContentNode,
    /// Which plugins produced observable output during this call.
    pub features: FeatureMap,
    pub frontmatter: Option<Map<String, Value>>,
    pub json_options: Option<JsonOptions>,
    pub content_line_offset: usize,
}

pub struct Transformer {
    hooks: TransformHooks,
    context: PluginContext,
    assets: IndexMap<String, AssetBundle>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    /// Transformer with the built-in plugin set and default asset configuration.
    pub fn new() -> Self {
        Self::with_plugins(builtin_plugins(), PluginContext::default())
            .expect("built-in plugin names are unique")
    }

    /// Installs `plugins` in order, each exactly once. Hooks persist for the lifetime
    /// of this instance and are shared across repeated `transform()` calls.
    pub fn with_plugins(plugins: Vec<Rc<dyn Plugin>>, context: PluginContext) -> Result<Self> {
        let hooks = TransformHooks::default();
        let mut assets: IndexMap<String, AssetBundle> = IndexMap::new();
        for plugin in &plugins {
            if assets.contains_key(plugin.name()) {
                return Err(Error::DuplicatePlugin {
                    name: plugin.name().to_string(),
                });
            }
            let bundle = plugin.install(&hooks, &context);
            assets.insert(plugin.name().to_string(), bundle);
        }
        Ok(Self {
            hooks,
            context,
            assets,
        })
    }

    pub fn hooks(&self) -> &TransformHooks {
        &self.hooks
    }

    pub fn plugin_context(&self) -> &PluginContext {
        &self.context
    }

    /// Parses Markdown into a content tree.
    ///
    /// Never fails: malformed front matter is treated as absent and malformed
    /// Markdown renders as literal text, so some tree is always produced.
    pub fn transform(&self, text: &str) -> TransformResult {
        tracing::debug!(input_bytes = text.len(), "transform start");
        self.context.features.reset();

        let mut parse_ctx = ParseContext {
            text: text.replace("\r\n", "\n"),
            ..ParseContext::default()
        };
        self.hooks.before_parse.call(&mut parse_ctx);

        let mut rules =
            RendererRules::new(self.context.features.clone(), parse_ctx.content_line_offset);
        self.hooks.parser.call(&mut rules);

        let mut root = tree::build_tree(&parse_ctx.text, &rules);

        let mut after_ctx = TransformContext {
            frontmatter: parse_ctx.frontmatter,
            json_options: parse_ctx.json_options,
        };
        self.hooks.after_parse.call(&mut after_ctx);

        tree::clean_tree(&mut root);
        // A document that is a single top-level heading or list needs no wrapper.
        if root.node_type == NodeType::Root && root.children.len() == 1 {
            root = root.children.remove(0);
        }
        tree::reset_depth(&mut root);

        let features = self.context.features.snapshot();
        tracing::debug!(
            features = features.len(),
            line_offset = parse_ctx.content_line_offset,
            "transform done"
        );
        TransformResult {
            root,
            features,
            frontmatter: after_ctx.frontmatter,
            json_options: after_ctx.json_options,
            content_line_offset: parse_ctx.content_line_offset,
        }
    }

    /// Static assets of all installed plugins, in installation order.
    pub fn assets(&self) -> AssetBundle {
        let mut all = AssetBundle::default();
        for bundle in self.assets.values() {
            all.extend(bundle);
        }
        all
    }

    /// Assets of the named plugins only, preserving installation order.
    pub fn assets_for(&self, names: &[&str]) -> Result<AssetBundle> {
        for name in names {
            if !self.assets.contains_key(*name) {
                return Err(Error::UnknownPlugin {
                    name: (*name).to_string(),
                });
            }
        }
        let mut out = AssetBundle::default();
        for (name, bundle) in &self.assets {
            if names.contains(&name.as_str()) {
                out.extend(bundle);
            }
        }
        Ok(out)
    }

    /// Assets of only the plugins whose feature flag is set in `features`,
    /// i.e. the selection produced by the most recent transform call.
    pub fn used_assets(&self, features: &FeatureMap) -> AssetBundle {
        let mut out = AssetBundle::default();
        for (name, bundle) in &self.assets {
            if features.get(name).copied().unwrap_or(false) {
                out.extend(bundle);
            }
        }
        out
    }

    /// Reports a lazily loaded asset as available and fires the `retransform` hook so
    /// owning views redo their transform.
    pub fn notify_asset_loaded(&self, url: &str) {
        if self.context.loader.complete(url) {
            self.hooks.retransform.call(&mut ());
        }
    }

    /// Reports a failed lazy load. Swallowed: no retransform fires and affected
    /// content stays in its placeholder rendering.
    pub fn notify_asset_failed(&self, url: &str) {
        self.context.loader.fail(url);
    }

    pub fn set_math_typesetter(&self, typesetter: Rc<dyn MathTypesetter>) {
        self.context.math.set(typesetter);
    }

    pub fn set_highlighter(&self, highlighter: Rc<dyn SyntaxHighlighter>) {
        self.context.highlighter.set(highlighter);
    }
}
