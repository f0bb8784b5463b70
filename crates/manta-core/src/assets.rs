//! Static assets declared by plugins and the explicit configuration that replaces
//! build-time version globals.

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum CssItem {
    /// Inline `<style>` text.
    Style(String),
    /// External stylesheet URL.
    Stylesheet(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum JsItem {
    /// External script URL.
    Script(String),
    /// Inline script text.
    IifeScript(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBundle {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<CssItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<JsItem>,
}

impl AssetBundle {
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.scripts.is_empty()
    }

    pub fn extend(&mut self, other: &AssetBundle) {
        self.styles.extend(other.styles.iter().cloned());
        self.scripts.extend(other.scripts.iter().cloned());
    }
}

/// Explicit asset-resolution configuration handed to plugins at install time.
///
/// Pinned versions and the CDN base live here instead of compiled-in globals so
/// tests can construct a transformer without a build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetConfig {
    /// CDN base for `npm:` package references. Must end with `/`.
    pub provider_base: Url,
    pub katex_version: String,
    pub hljs_version: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            provider_base: Url::parse("https://cdn.jsdelivr.net/npm/")
                .expect("static provider base URL"),
            katex_version: "0.16.11".to_string(),
            hljs_version: "11.10.0".to_string(),
        }
    }
}

impl AssetConfig {
    /// Resolves an `npm:<package>/<path>` reference against the provider base.
    ///
    /// Returns `None` when the reference is not `npm:`-prefixed or does not resolve to
    /// a valid URL; callers keep the original string in that case.
    pub fn resolve_npm(&self, reference: &str) -> Option<String> {
        let rest = reference.strip_prefix("npm:")?;
        let rest = rest.trim_start_matches('/');
        if rest.is_empty() {
            return None;
        }
        self.provider_base.join(rest).ok().map(|u| u.to_string())
    }

    pub fn katex_js_url(&self) -> String {
        format!(
            "{}katex@{}/dist/katex.min.js",
            self.provider_base, self.katex_version
        )
    }

    pub fn katex_css_url(&self) -> String {
        format!(
            "{}katex@{}/dist/katex.min.css",
            self.provider_base, self.katex_version
        )
    }

    pub fn hljs_js_url(&self) -> String {
        format!(
            "{}@highlightjs/cdn-assets@{}/highlight.min.js",
            self.provider_base, self.hljs_version
        )
    }

    pub fn hljs_css_url(&self) -> String {
        format!(
            "{}@highlightjs/cdn-assets@{}/styles/default.min.css",
            self.provider_base, self.hljs_version
        )
    }
}
