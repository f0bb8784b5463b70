//! Render-rule registry driven by the `parser` hook.
//!
//! Plugins do not monkey-patch the tokenizer; they register rules for the token
//! types they care about through this first-class surface. The tree builder consults
//! the registry while rendering inline content.

use crate::features::FeatureSink;
use htmlize::{escape_attribute, escape_text};
use std::rc::Rc;

/// Where a block's finalized inline content came from. Content filters use this to
/// restrict themselves to qualifying positions (e.g. checkbox glyphs only at the
/// start of headings and list-item lead paragraphs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContext {
    Heading,
    /// First paragraph of a list item (including tight-list implicit paragraphs).
    ListItemLead,
    Other,
}

type CodeRule = Rc<dyn Fn(Option<&str>, &str) -> String>;
type MathRule = Rc<dyn Fn(&str) -> String>;
type CheckboxRule = Rc<dyn Fn(bool) -> String>;
type ContentFilter = Rc<dyn Fn(BlockContext, &mut String)>;

/// Per-transform rule table. A fresh table is created for every `transform()` call
/// and handed to the `parser` hook before tokenization.
#[derive(Clone)]
pub struct RendererRules {
    pub features: FeatureSink,
    /// When set, block nodes carry their source line span in `payload.lines`.
    pub tag_lines: bool,
    /// Source lines consumed by front matter, added to every tagged span.
    pub line_offset: usize,
    code_block: Option<CodeRule>,
    inline_math: Option<MathRule>,
    block_math: Option<MathRule>,
    checkbox: Option<CheckboxRule>,
    content_filters: Vec<ContentFilter>,
}

impl RendererRules {
    pub fn new(features: FeatureSink, line_offset: usize) -> Self {
        Self {
            features,
            tag_lines: false,
            line_offset,
            code_block: None,
            inline_math: None,
            block_math: None,
            checkbox: None,
            content_filters: Vec::new(),
        }
    }

    pub fn set_code_block_rule(&mut self, rule: impl Fn(Option<&str>, &str) -> String + 'static) {
        self.code_block = Some(Rc::new(rule));
    }

    pub fn set_inline_math_rule(&mut self, rule: impl Fn(&str) -> String + 'static) {
        self.inline_math = Some(Rc::new(rule));
    }

    pub fn set_block_math_rule(&mut self, rule: impl Fn(&str) -> String + 'static) {
        self.block_math = Some(Rc::new(rule));
    }

    pub fn set_checkbox_rule(&mut self, rule: impl Fn(bool) -> String + 'static) {
        self.checkbox = Some(Rc::new(rule));
    }

    pub fn add_content_filter(&mut self, filter: impl Fn(BlockContext, &mut String) + 'static) {
        self.content_filters.push(Rc::new(filter));
    }

    pub(crate) fn render_code_block(&self, lang: Option<&str>, source: &str) -> String {
        match &self.code_block {
            Some(rule) => rule(lang, source),
            None => {
                let class = match lang {
                    Some(lang) if !lang.is_empty() => {
                        format!(" class=\"language-{}\"", escape_attribute(lang))
                    }
                    _ => String::new(),
                };
                format!("<pre><code{class}>{}</code></pre>", escape_text(source))
            }
        }
    }

    pub(crate) fn render_inline_math(&self, source: &str) -> String {
        match &self.inline_math {
            Some(rule) => rule(source),
            None => escape_text(source).into_owned(),
        }
    }

    pub(crate) fn render_block_math(&self, source: &str) -> String {
        match &self.block_math {
            Some(rule) => rule(source),
            None => escape_text(source).into_owned(),
        }
    }

    pub(crate) fn render_checkbox(&self, checked: bool) -> String {
        match &self.checkbox {
            Some(rule) => rule(checked),
            None => {
                if checked {
                    "[x] ".to_string()
                } else {
                    "[ ] ".to_string()
                }
            }
        }
    }

    pub(crate) fn apply_content_filters(&self, context: BlockContext, content: &mut String) {
        for filter in &self.content_filters {
            filter(context, content);
        }
    }
}
