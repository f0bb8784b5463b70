//! Stacking mind-map layout with variable node sizes.
//!
//! Growth axis is horizontal: children sit to the right of their parent. Each
//! subtree occupies a "block" whose height is the larger of the node's own
//! height and the stacked heights of its visible children; nodes are centered
//! vertically within their block.

use crate::model::{Bounds, Rect, RenderNode};
use crate::options::MindmapOptions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MindmapLayout {
    pub bounds: Bounds,
}

pub fn layout(root: &mut RenderNode, options: &MindmapOptions) -> MindmapLayout {
    place(root, 0.0, 0.0, options);
    let mut points = Vec::new();
    collect_corners(root, &mut points);
    let bounds = Bounds::from_points(points).unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    });
    tracing::trace!(
        width = bounds.width(),
        height = bounds.height(),
        "layout pass"
    );
    MindmapLayout { bounds }
}

fn block_height(node: &RenderNode, options: &MindmapOptions) -> f64 {
    if node.children.is_empty() {
        return node.size.1;
    }
    node.size.1.max(children_height(node, options))
}

fn children_height(node: &RenderNode, options: &MindmapOptions) -> f64 {
    let mut total = 0.0;
    for (i, child) in node.children.iter().enumerate() {
        if i > 0 {
            total += gap(&node.children[i - 1], child, options);
        }
        total += block_height(child, options);
    }
    total
}

/// Two adjacent leaf blocks sit one spacing apart; once either side carries a
/// subtree the gap doubles to keep branch groups visually separate.
fn gap(above: &RenderNode, below: &RenderNode, options: &MindmapOptions) -> f64 {
    if above.children.is_empty() && below.children.is_empty() {
        options.spacing_vertical
    } else {
        options.spacing_vertical * 2.0
    }
}

fn place(node: &mut RenderNode, x: f64, block_top: f64, options: &MindmapOptions) {
    let bh = block_height(node, options);
    node.rect = Rect {
        x,
        y: block_top + (bh - node.size.1) / 2.0,
        width: node.size.0 + options.padding_x * 2.0,
        height: node.size.1,
    };

    if node.children.is_empty() {
        return;
    }
    let child_x = x + node.rect.width + options.spacing_horizontal;
    let total = children_height(node, options);
    let mut y = block_top + (bh - total) / 2.0;
    for i in 0..node.children.len() {
        if i > 0 {
            y += gap_at(node, i, options);
        }
        let child_bh = block_height(&node.children[i], options);
        place(&mut node.children[i], child_x, y, options);
        y += child_bh;
    }
}

fn gap_at(node: &RenderNode, index: usize, options: &MindmapOptions) -> f64 {
    gap(&node.children[index - 1], &node.children[index], options)
}

fn collect_corners(node: &RenderNode, points: &mut Vec<(f64, f64)>) {
    points.push((node.rect.x, node.rect.y));
    points.push((node.rect.x + node.rect.width, node.rect.y + node.rect.height));
    for child in &node.children {
        collect_corners(child, points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FoldTable;
    use crate::text::{ContentSizer, DeterministicTextMeasurer};
    use manta_core::{ContentNode, NodeType};
    use std::rc::Rc;

    fn node(content: &str, children: Vec<ContentNode>) -> ContentNode {
        let mut n = ContentNode::with_content(NodeType::Heading, content);
        n.children = children;
        n
    }

    fn build(tree: &ContentNode, folds: &FoldTable) -> RenderNode {
        let sizer = ContentSizer::new(Rc::new(DeterministicTextMeasurer::default()), 0.0, 16.0);
        RenderNode::build(tree, folds, &sizer)
    }

    #[test]
    fn children_sit_right_of_the_parent_with_horizontal_spacing() {
        let tree = node("r", vec![node("a", vec![]), node("b", vec![])]);
        let mut root = build(&tree, &FoldTable::default());
        layout(&mut root, &MindmapOptions::default());

        let expected_x = root.rect.x + root.rect.width + 80.0;
        for child in &root.children {
            assert!((child.rect.x - expected_x).abs() < 1e-9);
        }
    }

    #[test]
    fn sibling_leaves_are_separated_by_one_vertical_spacing() {
        let tree = node("r", vec![node("a", vec![]), node("b", vec![])]);
        let mut root = build(&tree, &FoldTable::default());
        layout(&mut root, &MindmapOptions::default());

        let a = &root.children[0].rect;
        let b = &root.children[1].rect;
        assert!((b.y - (a.y + a.height) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn branch_boundaries_double_the_gap() {
        let tree = node(
            "r",
            vec![
                node("branch", vec![node("x", vec![]), node("y", vec![])]),
                node("leaf", vec![]),
            ],
        );
        let mut root = build(&tree, &FoldTable::default());
        layout(&mut root, &MindmapOptions::default());

        let branch = &root.children[0];
        let leaf = &root.children[1];
        let branch_bottom = branch
            .children
            .iter()
            .map(|c| c.rect.y + c.rect.height)
            .fold(branch.rect.y + branch.rect.height, f64::max);
        assert!(leaf.rect.y - branch_bottom >= 10.0 - 1e-9);
    }

    #[test]
    fn parent_is_vertically_centered_on_its_children() {
        let tree = node("r", vec![node("a", vec![]), node("b", vec![])]);
        let mut root = build(&tree, &FoldTable::default());
        layout(&mut root, &MindmapOptions::default());

        let first = &root.children[0].rect;
        let last = &root.children[1].rect;
        let children_mid = (first.y + (last.y + last.height)) / 2.0;
        let parent_mid = root.rect.y + root.rect.height / 2.0;
        assert!((children_mid - parent_mid).abs() < 1e-9);
    }

    #[test]
    fn folded_subtrees_take_only_their_own_height() {
        let big = node(
            "branch",
            (0..8).map(|i| node(&format!("c{i}"), vec![])).collect(),
        );
        let tree = node("r", vec![big, node("leaf", vec![])]);

        let mut open = build(&tree, &FoldTable::default());
        let open_bounds = layout(&mut open, &MindmapOptions::default()).bounds;

        let mut folds = FoldTable::default();
        folds.insert("1.2".to_string(), true);
        let mut folded = build(&tree, &folds);
        let folded_bounds = layout(&mut folded, &MindmapOptions::default()).bounds;

        assert!(folded_bounds.height() < open_bounds.height());
        assert!(folded_bounds.width() < open_bounds.width());
    }

    #[test]
    fn every_rect_is_contained_in_the_reported_bounds() {
        let tree = node(
            "r",
            vec![
                node("a", vec![node("a1", vec![]), node("a2", vec![])]),
                node("a long label that is wider than the rest", vec![]),
            ],
        );
        let mut root = build(&tree, &FoldTable::default());
        let bounds = layout(&mut root, &MindmapOptions::default()).bounds;

        fn check(n: &RenderNode, b: &Bounds) {
            assert!(b.contains_rect(&n.rect), "{} escapes bounds", n.path);
            n.children.iter().for_each(|c| check(c, b));
        }
        check(&root, &bounds);
    }
}
