//! View-side node tree, rebuilt from scratch every render pass.
//!
//! Nothing here survives between passes except through the instance's fold
//! side-table; identity across passes is carried by `key` alone.

use crate::text::ContentSizer;
use manta_core::ContentNode;
use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Fold state keyed by node path. Lives on the instance, not on the tree, so a
/// re-transform of edited Markdown keeps the user's open/closed state for nodes
/// whose position survived the edit.
pub type FoldTable = FxHashMap<String, bool>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn inflate(&self, d: f64) -> Rect {
        Rect {
            x: self.x - d,
            y: self.y - d,
            width: self.width + d * 2.0,
            height: self.height + d * 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn contains_rect(&self, r: &Rect) -> bool {
        r.x >= self.min_x && r.y >= self.min_y && r.x + r.width <= self.max_x
            && r.y + r.height <= self.max_y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    /// DFS-monotonic id within one pass.
    pub id: usize,
    /// Dot-joined ancestor ids, root included.
    pub path: String,
    /// Identity across passes: path plus a hash of the content HTML.
    pub key: String,
    pub content: String,
    /// Measured content size before padding.
    pub size: (f64, f64),
    pub rect: Rect,
    pub folded: bool,
    /// True when the source node has children, folded or not (drives the toggle
    /// circle even while the subtree is hidden).
    pub has_children: bool,
    /// Visible children only; a folded node's subtree is not built.
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    /// Builds the view tree for one pass. Ids are assigned in DFS order, so the
    /// same content tree always yields the same paths.
    pub fn build(root: &ContentNode, folds: &FoldTable, sizer: &ContentSizer) -> RenderNode {
        let mut next_id = 1usize;
        build_node(root, "", &mut next_id, folds, sizer)
    }

    pub fn find(&self, path: &str) -> Option<&RenderNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

fn content_key(path: &str, content: &str) -> String {
    let mut hasher = FxHasher::default();
    content.hash(&mut hasher);
    format!("{path}!{:x}", hasher.finish())
}

fn build_node(
    node: &ContentNode,
    parent_path: &str,
    next_id: &mut usize,
    folds: &FoldTable,
    sizer: &ContentSizer,
) -> RenderNode {
    let id = *next_id;
    *next_id += 1;
    let path = if parent_path.is_empty() {
        id.to_string()
    } else {
        format!("{parent_path}.{id}")
    };
    let folded = folds.get(&path).copied().unwrap_or(false);
    let size = sizer.size_of(&node.content);

    let children = if folded {
        // Ids of hidden descendants are still consumed so paths stay stable
        // across fold toggles.
        skip_subtree_ids(node, next_id);
        Vec::new()
    } else {
        node.children
            .iter()
            .map(|c| build_node(c, &path, next_id, folds, sizer))
            .collect()
    };

    RenderNode {
        id,
        key: content_key(&path, &node.content),
        path,
        content: node.content.clone(),
        size,
        rect: Rect::default(),
        folded,
        has_children: !node.children.is_empty(),
        children,
    }
}

fn skip_subtree_ids(node: &ContentNode, next_id: &mut usize) {
    for child in &node.children {
        *next_id += 1;
        skip_subtree_ids(child, next_id);
    }
}

/// Seeds the fold table from the tree's own fold hints. A recursive hint
/// (`fold == 2`) cascades over the whole subtree; `initial_expand_level`
/// additionally folds every branch node at depth >= level (-1 disables).
pub fn seed_folds(root: &ContentNode, initial_expand_level: i64, folds: &mut FoldTable) {
    fn walk(
        node: &ContentNode,
        parent_path: &str,
        next_id: &mut usize,
        level: i64,
        fold_all: bool,
        folds: &mut FoldTable,
    ) {
        let id = *next_id;
        *next_id += 1;
        let path = if parent_path.is_empty() {
            id.to_string()
        } else {
            format!("{parent_path}.{id}")
        };
        let fold_all = fold_all || node.payload.fold == 2;
        let by_level = level >= 0 && node.depth as i64 >= level && !node.children.is_empty();
        if fold_all || node.payload.fold == 1 || by_level {
            // Hints never override state the user already toggled.
            folds.entry(path.clone()).or_insert(true);
        }
        for child in &node.children {
            walk(child, &path, next_id, level, fold_all, folds);
        }
    }
    let mut next_id = 1usize;
    walk(root, "", &mut next_id, initial_expand_level, false, folds);
}

/// Every node path of the tree, visible or not, in DFS order. Used to validate
/// paths and to address whole subtrees.
pub fn enumerate_paths(root: &ContentNode) -> Vec<String> {
    fn walk(node: &ContentNode, parent_path: &str, next_id: &mut usize, out: &mut Vec<String>) {
        let id = *next_id;
        *next_id += 1;
        let path = if parent_path.is_empty() {
            id.to_string()
        } else {
            format!("{parent_path}.{id}")
        };
        out.push(path.clone());
        for child in &node.children {
            walk(child, &path, next_id, out);
        }
    }
    let mut out = Vec::new();
    let mut next_id = 1usize;
    walk(root, "", &mut next_id, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{ContentSizer, DeterministicTextMeasurer};
    use manta_core::{ContentNode, NodeType};
    use std::rc::Rc;

    fn tree() -> ContentNode {
        let mut root = ContentNode::with_content(NodeType::Heading, "a");
        let mut b = ContentNode::with_content(NodeType::Heading, "b");
        b.depth = 1;
        let mut c = ContentNode::with_content(NodeType::Heading, "c");
        c.depth = 2;
        b.children.push(c);
        root.children.push(b);
        root
    }

    fn sizer() -> ContentSizer {
        ContentSizer::new(Rc::new(DeterministicTextMeasurer::default()), 0.0, 16.0)
    }

    #[test]
    fn paths_are_stable_across_fold_toggles() {
        let tree = tree();
        let open = RenderNode::build(&tree, &FoldTable::default(), &sizer());
        assert_eq!(open.path, "1");
        assert_eq!(open.children[0].path, "1.2");
        assert_eq!(open.children[0].children[0].path, "1.2.3");

        let mut folds = FoldTable::default();
        folds.insert("1.2".to_string(), true);
        let folded = RenderNode::build(&tree, &folds, &sizer());
        assert_eq!(folded.children[0].path, "1.2");
        assert!(folded.children[0].folded);
        assert!(folded.children[0].has_children);
        assert!(folded.children[0].children.is_empty());
    }

    #[test]
    fn key_tracks_content_changes() {
        let mut tree = tree();
        let before = RenderNode::build(&tree, &FoldTable::default(), &sizer());
        tree.children[0].content = "renamed".to_string();
        let after = RenderNode::build(&tree, &FoldTable::default(), &sizer());
        assert_eq!(before.key, after.key);
        assert_ne!(before.children[0].key, after.children[0].key);
        assert_eq!(before.children[0].path, after.children[0].path);
    }

    #[test]
    fn recursive_fold_hint_cascades() {
        let mut tree = tree();
        tree.payload.fold = 2;
        let mut folds = FoldTable::default();
        seed_folds(&tree, -1, &mut folds);
        assert_eq!(folds.get("1"), Some(&true));
        assert_eq!(folds.get("1.2"), Some(&true));
        assert_eq!(folds.get("1.2.3"), Some(&true));
    }

    #[test]
    fn initial_expand_level_folds_branches_below_it() {
        let tree = tree();
        let mut folds = FoldTable::default();
        seed_folds(&tree, 1, &mut folds);
        assert_eq!(folds.get("1"), None, "root is above the level");
        assert_eq!(folds.get("1.2"), Some(&true));
        assert_eq!(folds.get("1.2.3"), None, "leaves have nothing to fold");
    }
}
