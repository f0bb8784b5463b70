//! Token-stream to content-tree builder.
//!
//! The tokenizer emits a flat block/inline event stream; this module walks it with an
//! explicit stack of open block nodes. Headings do not nest arbitrarily: a heading at
//! level N closes every open heading at level >= N before it opens. All other block
//! openers push a child one level deeper than the current top.

use crate::model::{ContentNode, NodeType};
use crate::render_rules::{BlockContext, RendererRules};
use htmlize::{escape_attribute, escape_text};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_MATH
}

fn magic_comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<!--\s*markmap:\s*(\w+)\s*-->$").unwrap())
}

struct Frame {
    node: ContentNode,
    heading_level: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureTarget {
    /// Content flows into the heading frame currently on top of the stack.
    HeadingFrame,
    /// Content becomes a paragraph child of the top frame.
    Paragraph,
    /// Content becomes a table cell in the active table capture.
    TableCell,
}

struct ImageFrame {
    saved: String,
    dest: String,
    title: String,
}

struct Capture {
    out: String,
    target: CaptureTarget,
    context: BlockContext,
    pending_fold: u8,
    span: Option<Range<usize>>,
    images: Vec<ImageFrame>,
}

struct CodeCapture {
    lang: Option<String>,
    source: String,
    span: Range<usize>,
}

struct TableCapture {
    html: String,
    span: Range<usize>,
}

pub(crate) struct TreeBuilder<'r> {
    rules: &'r RendererRules,
    stack: Vec<Frame>,
    capture: Option<Capture>,
    code: Option<CodeCapture>,
    table: Option<TableCapture>,
    line_starts: Vec<usize>,
}

impl<'r> TreeBuilder<'r> {
    fn new(text: &str, rules: &'r RendererRules) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            rules,
            stack: vec![Frame {
                node: ContentNode::new(NodeType::Root),
                heading_level: None,
            }],
            capture: None,
            code: None,
            table: None,
            line_starts,
        }
    }

    fn lines_for(&self, span: &Range<usize>) -> Option<(usize, usize)> {
        if !self.rules.tag_lines {
            return None;
        }
        let line_of = |offset: usize| match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let start = line_of(span.start);
        let end = line_of(span.end.saturating_sub(1).max(span.start)) + 1;
        let off = self.rules.line_offset;
        Some((start + off, end + off))
    }

    fn top(&mut self) -> &mut ContentNode {
        &mut self.stack.last_mut().expect("stack never empty").node
    }

    fn pop_attach(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let frame = self.stack.pop().expect("guarded above");
        self.top().children.push(frame.node);
    }

    fn close_headings(&mut self, level: u8) {
        while self
            .stack
            .last()
            .and_then(|f| f.heading_level)
            .is_some_and(|l| l >= level)
        {
            self.pop_attach();
        }
    }

    /// Closes heading frames opened inside the current container before the container
    /// itself pops (a heading inside a list item cannot outlive the item).
    fn close_heading_frames(&mut self) {
        while self.stack.last().is_some_and(|f| f.heading_level.is_some()) {
            self.pop_attach();
        }
    }

    fn open_capture(&mut self, target: CaptureTarget, context: BlockContext, span: Range<usize>) {
        self.capture = Some(Capture {
            out: String::new(),
            target,
            context,
            pending_fold: 0,
            span: Some(span),
            images: Vec::new(),
        });
    }

    /// Starts an implicit paragraph for inline events arriving outside any block
    /// capture (tight list items omit the paragraph wrapper).
    fn ensure_capture(&mut self, span: &Range<usize>) -> &mut Capture {
        if self.capture.is_none() {
            let top = self.stack.last().expect("stack never empty");
            let context = if top.node.node_type == NodeType::ListItem
                && top.node.children.is_empty()
                && top.node.content.is_empty()
            {
                BlockContext::ListItemLead
            } else {
                BlockContext::Other
            };
            self.open_capture(CaptureTarget::Paragraph, context, span.clone());
        }
        self.capture.as_mut().expect("just ensured")
    }

    fn push_inline(&mut self, span: &Range<usize>, fragment: &str) {
        let capture = self.ensure_capture(span);
        capture.out.push_str(fragment);
        if let Some(s) = &mut capture.span {
            s.start = s.start.min(span.start);
            s.end = s.end.max(span.end);
        }
    }

    /// Finalizes the active capture, if any, into its destination.
    fn flush_capture(&mut self) {
        let Some(mut capture) = self.capture.take() else {
            return;
        };
        let mut content = std::mem::take(&mut capture.out);
        self.rules.apply_content_filters(capture.context, &mut content);
        // Consumed directives (magic comments) can leave a dangling separator space.
        content.truncate(content.trim_end().len());

        match capture.target {
            CaptureTarget::HeadingFrame => {
                let node = self.top();
                node.content = content;
                if capture.pending_fold != 0 {
                    node.payload.fold = capture.pending_fold;
                }
            }
            CaptureTarget::Paragraph => {
                let mut node = ContentNode::with_content(NodeType::Paragraph, content);
                node.payload.fold = capture.pending_fold;
                node.payload.lines = capture.span.as_ref().and_then(|s| self.lines_for(s));
                self.top().children.push(node);
            }
            CaptureTarget::TableCell => {
                // Handled by the table-cell end arm; reaching here means the tokenizer
                // closed a table without closing its cell, which it never does.
            }
        }
    }

    fn handle_html(&mut self, span: &Range<usize>, html: &str) {
        let trimmed = html.trim();
        if let Some(caps) = magic_comment_re().captures(trimmed) {
            let fold = match &caps[1] {
                "fold" => 1,
                "foldAll" => 2,
                _ => 0,
            };
            if fold != 0 {
                // Consume the comment; it is a structural directive, not content.
                match &mut self.capture {
                    Some(capture) => capture.pending_fold = fold,
                    None => self.top().payload.fold = fold,
                }
                return;
            }
        }
        if self.capture.is_some() {
            self.push_inline(span, html);
        } else if !trimmed.is_empty() {
            let mut node = ContentNode::with_content(NodeType::Html, trimmed.to_string());
            node.payload.lines = self.lines_for(span);
            self.top().children.push(node);
        }
    }

    fn handle(&mut self, event: Event<'_>, span: Range<usize>) {
        // Fenced code swallows every event until its end tag.
        if let Some(code) = &mut self.code {
            match event {
                Event::Text(t) => {
                    code.source.push_str(&t);
                    return;
                }
                Event::End(TagEnd::CodeBlock) => {
                    let code = self.code.take().expect("checked above");
                    let mut node = ContentNode::with_content(
                        NodeType::Fence,
                        self.rules
                            .render_code_block(code.lang.as_deref(), &code.source),
                    );
                    node.payload.lines = self.lines_for(&code.span);
                    self.top().children.push(node);
                    return;
                }
                _ => return,
            }
        }

        match event {
            Event::Start(tag) => self.handle_start(tag, span),
            Event::End(tag_end) => self.handle_end(tag_end),
            Event::Text(t) => {
                let fragment = escape_text(&*t).into_owned();
                self.push_inline(&span, &fragment);
            }
            Event::Code(t) => {
                let fragment = format!("<code>{}</code>", escape_text(&*t));
                self.push_inline(&span, &fragment);
            }
            Event::InlineMath(t) => {
                let fragment = self.rules.render_inline_math(&t);
                self.push_inline(&span, &fragment);
            }
            Event::DisplayMath(t) => {
                let fragment = self.rules.render_block_math(&t);
                self.push_inline(&span, &fragment);
            }
            Event::Html(t) | Event::InlineHtml(t) => self.handle_html(&span, &t),
            Event::SoftBreak => self.push_inline(&span, " "),
            Event::HardBreak => self.push_inline(&span, "<br>"),
            Event::Rule => self.flush_capture(),
            Event::TaskListMarker(checked) => {
                let fragment = self.rules.render_checkbox(checked);
                self.push_inline(&span, &fragment);
            }
            Event::FootnoteReference(_) => {}
        }
    }

    fn handle_start(&mut self, tag: Tag<'_>, span: Range<usize>) {
        match tag {
            Tag::Paragraph => {
                self.flush_capture();
                let top = self.stack.last().expect("stack never empty");
                let context = if top.node.node_type == NodeType::ListItem
                    && top.node.children.is_empty()
                    && top.node.content.is_empty()
                {
                    BlockContext::ListItemLead
                } else {
                    BlockContext::Other
                };
                self.open_capture(CaptureTarget::Paragraph, context, span);
            }
            Tag::Heading { level, .. } => {
                self.flush_capture();
                self.close_headings(level as u8);
                let mut node = ContentNode::new(NodeType::Heading);
                node.payload.lines = self.lines_for(&span);
                self.stack.push(Frame {
                    node,
                    heading_level: Some(level as u8),
                });
                self.open_capture(CaptureTarget::HeadingFrame, BlockContext::Heading, span);
            }
            Tag::List(start) => {
                self.flush_capture();
                let mut node = ContentNode::new(if start.is_some() {
                    NodeType::OrderedList
                } else {
                    NodeType::BulletList
                });
                node.payload.start_index = start.map(|s| s as i64);
                node.payload.lines = self.lines_for(&span);
                self.stack.push(Frame {
                    node,
                    heading_level: None,
                });
            }
            Tag::Item => {
                self.flush_capture();
                let mut node = ContentNode::new(NodeType::ListItem);
                node.payload.lines = self.lines_for(&span);
                self.stack.push(Frame {
                    node,
                    heading_level: None,
                });
            }
            Tag::CodeBlock(kind) => {
                self.flush_capture();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        let lang = info.split_whitespace().next().unwrap_or_default();
                        (!lang.is_empty()).then(|| lang.to_string())
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeCapture {
                    lang,
                    source: String::new(),
                    span,
                });
            }
            Tag::Table(_) => {
                self.flush_capture();
                self.table = Some(TableCapture {
                    html: "<table>".to_string(),
                    span,
                });
            }
            Tag::TableHead => {
                if let Some(table) = &mut self.table {
                    table.html.push_str("<thead><tr>");
                }
            }
            Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table.html.push_str("<tr>");
                }
            }
            Tag::TableCell => {
                self.open_capture(CaptureTarget::TableCell, BlockContext::Other, span);
            }
            Tag::Emphasis => self.push_inline(&span, "<em>"),
            Tag::Strong => self.push_inline(&span, "<strong>"),
            Tag::Strikethrough => self.push_inline(&span, "<del>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut open = format!("<a href=\"{}\"", escape_attribute(&*dest_url));
                if !title.is_empty() {
                    open.push_str(&format!(" title=\"{}\"", escape_attribute(&*title)));
                }
                open.push('>');
                self.push_inline(&span, &open);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let capture = self.ensure_capture(&span);
                capture.images.push(ImageFrame {
                    saved: std::mem::take(&mut capture.out),
                    dest: dest_url.to_string(),
                    title: title.to_string(),
                });
            }
            _ => {}
        }
    }

    fn handle_end(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => self.flush_capture(),
            TagEnd::Heading(_) => self.flush_capture(),
            TagEnd::List(_) | TagEnd::Item => {
                self.flush_capture();
                self.close_heading_frames();
                self.pop_attach();
            }
            TagEnd::Table => {
                if let Some(mut table) = self.table.take() {
                    table.html.push_str("</tbody></table>");
                    let mut node = ContentNode::with_content(NodeType::Table, table.html);
                    node.payload.lines = self.lines_for(&table.span);
                    self.top().children.push(node);
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = &mut self.table {
                    table.html.push_str("</tr></thead><tbody>");
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = &mut self.table {
                    table.html.push_str("</tr>");
                }
            }
            TagEnd::TableCell => {
                if let Some(capture) = self.capture.take() {
                    if let Some(table) = &mut self.table {
                        // Header cells only appear before the body section opens.
                        let tag = if table.html.contains("<tbody>") { "td" } else { "th" };
                        table
                            .html
                            .push_str(&format!("<{tag}>{}</{tag}>", capture.out));
                    }
                }
            }
            TagEnd::Emphasis => self.push_inline(&(0..0), "</em>"),
            TagEnd::Strong => self.push_inline(&(0..0), "</strong>"),
            TagEnd::Strikethrough => self.push_inline(&(0..0), "</del>"),
            TagEnd::Link => self.push_inline(&(0..0), "</a>"),
            TagEnd::Image => {
                if let Some(capture) = &mut self.capture {
                    if let Some(frame) = capture.images.pop() {
                        let alt = std::mem::replace(&mut capture.out, frame.saved);
                        let mut img = format!(
                            "<img src=\"{}\" alt=\"{}\"",
                            escape_attribute(frame.dest.as_str()),
                            escape_attribute(alt.as_str())
                        );
                        if !frame.title.is_empty() {
                            img.push_str(&format!(
                                " title=\"{}\"",
                                escape_attribute(frame.title.as_str())
                            ));
                        }
                        img.push('>');
                        capture.out.push_str(&img);
                    }
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> ContentNode {
        self.flush_capture();
        while self.stack.len() > 1 {
            self.pop_attach();
        }
        self.stack.pop().expect("root frame remains").node
    }
}

/// Parses `text` into a raw content tree using the installed render rules.
pub(crate) fn build_tree(text: &str, rules: &RendererRules) -> ContentNode {
    let mut builder = TreeBuilder::new(text, rules);
    let parser = Parser::new_ext(text, parser_options());
    for (event, span) in parser.into_offset_iter() {
        builder.handle(event, span);
    }
    builder.finish()
}

/// Post-order cleanup pass: headings drop paragraph children; list items
/// promote their lead paragraph or
/// fence into their own content and prepend ordered-list numbering; ordered lists
/// assign sequential indices; degenerate single-child wrappers collapse.
pub(crate) fn clean_tree(root: &mut ContentNode) {
    clean_node(root, true);
}

fn clean_node(node: &mut ContentNode, is_root: bool) {
    match node.node_type {
        NodeType::Heading => {
            // Heading text already lives in the heading's own content; body paragraphs
            // under a heading are not part of the map.
            node.children
                .retain(|c| c.node_type != NodeType::Paragraph);
        }
        NodeType::ListItem => {
            let mut kept = Vec::with_capacity(node.children.len());
            for child in node.children.drain(..) {
                if matches!(child.node_type, NodeType::Paragraph | NodeType::Fence) {
                    if node.content.is_empty() {
                        node.content = child.content;
                        node.payload.merge_from(&child.payload);
                    }
                } else {
                    kept.push(child);
                }
            }
            node.children = kept;
            if let Some(index) = node.payload.index {
                node.content = format!("{index}. {}", node.content);
            }
        }
        NodeType::OrderedList => {
            let mut index = node.payload.start_index.unwrap_or(1);
            for child in &mut node.children {
                if child.node_type == NodeType::ListItem {
                    child.payload.index = Some(index);
                    index += 1;
                }
            }
        }
        _ => {}
    }

    for child in &mut node.children {
        clean_node(child, false);
    }

    // Wrapper collapsing: a single contentless child is structural noise; its children
    // move up. The root node is exempt so a document that is one top-level list keeps
    // the list as its promotable child.
    if !is_root && node.children.len() == 1 && node.children[0].content.is_empty() {
        node.children = std::mem::take(&mut node.children[0].children);
    }
}

/// Final top-down pass: depth is always `parent.depth + 1`, root is 0.
pub(crate) fn reset_depth(node: &mut ContentNode) {
    fn walk(node: &mut ContentNode, depth: usize) {
        node.depth = depth;
        for child in &mut node.children {
            walk(child, depth + 1);
        }
    }
    walk(node, 0);
}
