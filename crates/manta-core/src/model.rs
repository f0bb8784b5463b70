//! Content tree produced by the transform pipeline.
//!
//! The tree is pure data: no view state lives here. Fold hints recorded by magic
//! comments land in [`NodePayload::fold`]; everything the view layer derives
//! (ids, keys, rectangles) is rebuilt per render pass on its side.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Root,
    Heading,
    Paragraph,
    ListItem,
    OrderedList,
    BulletList,
    Fence,
    Table,
    Html,
}

/// Optional per-node bag. `fold` uses 0 = open, 1 = folded, 2 = folded recursively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fold: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<i64>,
    /// Source line span `[start, end)`, zero-based, shifted by the front-matter offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<(usize, usize)>,
}

fn is_zero(v: &u8) -> bool {
    *v == 0
}

impl NodePayload {
    pub fn is_empty(&self) -> bool {
        self.fold == 0 && self.index.is_none() && self.start_index.is_none() && self.lines.is_none()
    }

    /// Overlay semantics used when a child's content is promoted into its parent:
    /// fields present on `other` win.
    pub fn merge_from(&mut self, other: &NodePayload) {
        if other.fold != 0 {
            self.fold = other.fold;
        }
        if other.index.is_some() {
            self.index = other.index;
        }
        if other.start_index.is_some() {
            self.start_index = other.start_index;
        }
        if other.lines.is_some() {
            self.lines = other.lines;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub depth: usize,
    /// Rendered inline HTML of this node only (descendants excluded).
    pub content: String,
    #[serde(default, skip_serializing_if = "NodePayload::is_empty")]
    pub payload: NodePayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            depth: 0,
            content: String::new(),
            payload: NodePayload::default(),
            children: Vec::new(),
        }
    }

    pub fn with_content(node_type: NodeType, content: impl Into<String>) -> Self {
        let mut node = Self::new(node_type);
        node.content = content.into();
        node
    }
}
