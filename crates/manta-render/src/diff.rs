//! Enter/update/exit reconciliation between consecutive render passes.
//!
//! Identity is the node `key` (path + content hash). New keys animate out of
//! their nearest pre-existing ancestor's prior rectangle; removed keys animate
//! into their nearest surviving ancestor's new rectangle, so subtrees visually
//! collapse into and expand out of their parents.

use crate::model::{Rect, RenderNode};
use indexmap::IndexMap;

/// One node as captured at the end of a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShot {
    pub key: String,
    pub path: String,
    pub parent_key: Option<String>,
    pub content: String,
    pub rect: Rect,
    pub folded: bool,
    pub has_children: bool,
}

/// All nodes of one pass in DFS order, keyed by node key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: IndexMap<String, NodeShot>,
}

impl Snapshot {
    pub fn capture(root: &RenderNode) -> Self {
        let mut nodes = IndexMap::new();
        walk(root, None, &mut nodes);
        Self { nodes }
    }

    pub fn by_path(&self, path: &str) -> Option<&NodeShot> {
        self.nodes.values().find(|n| n.path == path)
    }

    /// Walks `key`'s ancestor chain (this snapshot's parent links), returning
    /// the first ancestor accepted by `pred`.
    fn ancestor_where(&self, key: &str, pred: impl Fn(&str) -> bool) -> Option<&NodeShot> {
        let mut current = self.nodes.get(key)?.parent_key.as_deref();
        while let Some(k) = current {
            if pred(k) {
                return self.nodes.get(k);
            }
            current = self.nodes.get(k)?.parent_key.as_deref();
        }
        None
    }
}

fn walk(node: &RenderNode, parent_key: Option<&str>, out: &mut IndexMap<String, NodeShot>) {
    out.insert(
        node.key.clone(),
        NodeShot {
            key: node.key.clone(),
            path: node.path.clone(),
            parent_key: parent_key.map(str::to_string),
            content: node.content.clone(),
            rect: node.rect,
            folded: node.folded,
            has_children: node.has_children,
        },
    );
    for child in &node.children {
        walk(child, Some(&node.key), out);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnterNode {
    pub shot: NodeShot,
    /// Rect the node grows out of: nearest ancestor's rect in the previous pass.
    pub origin: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateNode {
    pub shot: NodeShot,
    pub from: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExitNode {
    pub key: String,
    /// Rect the node shrinks into: nearest surviving ancestor's new rect.
    pub target: Rect,
}

/// One render pass worth of stage mutations, animated over a single duration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPatch {
    pub enter: Vec<EnterNode>,
    pub update: Vec<UpdateNode>,
    pub exit: Vec<ExitNode>,
    pub duration: f64,
}

impl RenderPatch {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }
}

pub fn reconcile(prev: &Snapshot, next: &Snapshot, duration: f64) -> RenderPatch {
    let mut patch = RenderPatch {
        duration,
        ..RenderPatch::default()
    };

    for (key, shot) in &next.nodes {
        match prev.nodes.get(key) {
            // A key present on both sides is an update even if it briefly left
            // and re-entered within the pass.
            Some(old) => patch.update.push(UpdateNode {
                shot: shot.clone(),
                from: old.rect,
            }),
            None => {
                let origin = next
                    .ancestor_where(key, |k| prev.nodes.contains_key(k))
                    .and_then(|a| prev.nodes.get(&a.key))
                    .map(|a| a.rect)
                    .unwrap_or(shot.rect);
                patch.enter.push(EnterNode {
                    shot: shot.clone(),
                    origin,
                });
            }
        }
    }

    for (key, old) in &prev.nodes {
        if next.nodes.contains_key(key) {
            continue;
        }
        let target = prev
            .ancestor_where(key, |k| next.nodes.contains_key(k))
            .and_then(|a| next.nodes.get(&a.key))
            .map(|a| a.rect)
            .unwrap_or(old.rect);
        patch.exit.push(ExitNode {
            key: key.clone(),
            target,
        });
    }

    tracing::debug!(
        enter = patch.enter.len(),
        update = patch.update.len(),
        exit = patch.exit.len(),
        "reconciled render pass"
    );
    patch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::model::{FoldTable, RenderNode};
    use crate::options::MindmapOptions;
    use crate::text::{ContentSizer, DeterministicTextMeasurer};
    use manta_core::{ContentNode, NodeType};
    use std::rc::Rc;

    fn node(content: &str, children: Vec<ContentNode>) -> ContentNode {
        let mut n = ContentNode::with_content(NodeType::Heading, content);
        n.children = children;
        n
    }

    fn snapshot(tree: &ContentNode, folds: &FoldTable) -> Snapshot {
        let sizer = ContentSizer::new(Rc::new(DeterministicTextMeasurer::default()), 0.0, 16.0);
        let mut root = RenderNode::build(tree, folds, &sizer);
        layout(&mut root, &MindmapOptions::default());
        Snapshot::capture(&root)
    }

    #[test]
    fn identical_passes_produce_updates_only() {
        let tree = node("r", vec![node("a", vec![])]);
        let prev = snapshot(&tree, &FoldTable::default());
        let next = snapshot(&tree, &FoldTable::default());
        let patch = reconcile(&prev, &next, 0.0);
        assert!(patch.enter.is_empty());
        assert!(patch.exit.is_empty());
        assert_eq!(patch.update.len(), 2);
    }

    #[test]
    fn unfolding_enters_nodes_out_of_their_ancestors_prior_rect() {
        let tree = node("r", vec![node("a", vec![node("x", vec![])])]);

        let mut folds = FoldTable::default();
        folds.insert("1.2".to_string(), true);
        let prev = snapshot(&tree, &folds);
        let next = snapshot(&tree, &FoldTable::default());

        let patch = reconcile(&prev, &next, 200.0);
        assert_eq!(patch.enter.len(), 1);
        assert_eq!(patch.enter[0].shot.path, "1.2.3");
        // Grows out of "a" as it was before the unfold.
        let a_prev = prev.by_path("1.2").unwrap().rect;
        assert_eq!(patch.enter[0].origin, a_prev);
        assert_eq!(patch.duration, 200.0);
    }

    #[test]
    fn folding_exits_nodes_into_the_surviving_ancestors_new_rect() {
        let tree = node("r", vec![node("a", vec![node("x", vec![])])]);
        let prev = snapshot(&tree, &FoldTable::default());

        let mut folds = FoldTable::default();
        folds.insert("1.2".to_string(), true);
        let next = snapshot(&tree, &folds);

        let patch = reconcile(&prev, &next, 0.0);
        assert_eq!(patch.exit.len(), 1);
        let a_new = next.by_path("1.2").unwrap().rect;
        assert_eq!(patch.exit[0].target, a_new);
    }

    #[test]
    fn content_change_is_an_exit_plus_enter_for_that_node_only() {
        let before = node("r", vec![node("a", vec![]), node("b", vec![])]);
        let after = node("r", vec![node("a2", vec![]), node("b", vec![])]);

        let prev = snapshot(&before, &FoldTable::default());
        let next = snapshot(&after, &FoldTable::default());
        let patch = reconcile(&prev, &next, 0.0);

        assert_eq!(patch.enter.len(), 1);
        assert_eq!(patch.exit.len(), 1);
        assert_eq!(patch.update.len(), 2, "root and the untouched sibling");
        assert_eq!(patch.enter[0].shot.content, "a2");
    }

    #[test]
    fn deep_removal_targets_the_nearest_surviving_ancestor() {
        let before = node(
            "r",
            vec![node("a", vec![node("x", vec![node("y", vec![])])])],
        );
        let after = node("r", vec![]);

        let prev = snapshot(&before, &FoldTable::default());
        let next = snapshot(&after, &FoldTable::default());
        let patch = reconcile(&prev, &next, 0.0);

        assert_eq!(patch.exit.len(), 3);
        let root_new = next.by_path("1").unwrap().rect;
        for exit in &patch.exit {
            assert_eq!(exit.target, root_new, "all collapse into the root");
        }
    }
}
