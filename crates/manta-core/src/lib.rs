#![forbid(unsafe_code)]

//! Markdown to mind-map content tree (headless).
//!
//! Design goals:
//! - deterministic, testable outputs (same input + options => same tree)
//! - host-extensible plugin pipeline with explicit hook points
//! - runtime-agnostic APIs (no specific executor required)

pub mod assets;
pub mod error;
pub mod features;
pub mod frontmatter;
pub mod hooks;
pub mod loader;
pub mod model;
pub mod options;
pub mod plugin;
pub mod plugins;
pub mod render_rules;
pub mod transformer;
mod tree;

pub use assets::{AssetBundle, AssetConfig, CssItem, JsItem};
pub use error::{Error, Result};
pub use features::{FeatureMap, FeatureSink};
pub use hooks::{Hook, TapHandle, TransformHooks};
pub use loader::AssetLoader;
pub use model::{ContentNode, NodePayload, NodeType};
pub use options::JsonOptions;
pub use plugin::{Capability, MathTypesetter, Plugin, PluginContext, SyntaxHighlighter};
pub use transformer::{ParseContext, TransformContext, TransformResult, Transformer};

#[cfg(test)]
mod tests;
