//! Retained render surface.
//!
//! The stage is the headless stand-in for a host DOM container: render passes
//! mutate it through patches, and [`crate::svg::render_svg`] serializes it.
//! Exited nodes leave immediately; the patch's animation geometry is for hosts
//! that tween, which a headless stage does not.

use crate::diff::{NodeShot, RenderPatch, Snapshot};
use crate::model::Rect;
use crate::options::ColorScale;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct NodeVisual {
    pub shot: NodeShot,
    pub color: String,
}

#[derive(Default)]
pub struct SvgStage {
    nodes: IndexMap<String, NodeVisual>,
    highlight: Option<Rect>,
}

impl SvgStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one pass. The enter and update partitions together cover exactly
    /// the new snapshot, so the retained set is rebuilt in its DFS order; exits
    /// drop out.
    pub fn apply(&mut self, patch: &RenderPatch, next: &Snapshot, colors: &ColorScale) {
        debug_assert_eq!(
            patch.enter.len() + patch.update.len(),
            next.nodes.len(),
            "patch does not cover the snapshot"
        );
        let mut nodes = IndexMap::with_capacity(next.nodes.len());
        for shot in next.nodes.values() {
            nodes.insert(
                shot.key.clone(),
                NodeVisual {
                    shot: shot.clone(),
                    color: colors.color_for(&shot.path),
                },
            );
        }
        self.nodes = nodes;
    }

    pub fn set_highlight(&mut self, rect: Option<Rect>) {
        self.highlight = rect;
    }

    pub fn highlight(&self) -> Option<Rect> {
        self.highlight
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeVisual> {
        self.nodes.values()
    }

    pub fn get(&self, key: &str) -> Option<&NodeVisual> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.highlight = None;
    }
}
