//! The mind-map instance: one content tree, one retained stage, one viewport.
//!
//! Every state change funnels through [`Mindmap::render`], which rebuilds the
//! view tree, lays it out, reconciles against the previous snapshot and applies
//! the patch to the stage. Viewport operations are async and resolve when their
//! transition settles or is superseded.

use crate::diff::{RenderPatch, Snapshot, reconcile};
use crate::layout::layout;
use crate::model::{Bounds, FoldTable, RenderNode, enumerate_paths, seed_folds};
use crate::options::{ColorScale, MindmapOptions};
use crate::stage::SvgStage;
use crate::svg::{SvgOptions, render_svg};
use crate::text::{ContentSizer, DeterministicTextMeasurer, TextMeasurer};
use crate::viewport::{Transform, TransitionOutcome, Transitions, Viewport};
use crate::{Error, Result};
use manta_core::ContentNode;
use std::rc::Rc;

const HIGHLIGHT_PADDING: f64 = 4.0;

pub struct Mindmap {
    options: MindmapOptions,
    measurer: Rc<dyn TextMeasurer>,
    data: Option<ContentNode>,
    folds: FoldTable,
    snapshot: Snapshot,
    bounds: Option<Bounds>,
    stage: SvgStage,
    colors: ColorScale,
    viewport: Viewport,
    transitions: Transitions,
    highlight_path: Option<String>,
    destroyed: bool,
}

impl Mindmap {
    pub fn new(options: MindmapOptions) -> Self {
        Self::with_measurer(options, Rc::new(DeterministicTextMeasurer::default()))
    }

    pub fn with_measurer(options: MindmapOptions, measurer: Rc<dyn TextMeasurer>) -> Self {
        let colors = ColorScale::new(&options);
        Self {
            options,
            measurer,
            data: None,
            folds: FoldTable::default(),
            snapshot: Snapshot::default(),
            bounds: None,
            stage: SvgStage::new(),
            colors,
            viewport: Viewport::new(800.0, 600.0),
            transitions: Transitions::new(),
            highlight_path: None,
            destroyed: false,
        }
    }

    pub fn options(&self) -> &MindmapOptions {
        &self.options
    }

    pub fn transform(&self) -> Transform {
        self.viewport.transform()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Host viewport size in pixels. Hosts coalesce resize storms themselves;
    /// this only records the latest size for subsequent viewport math.
    pub fn notify_resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Replaces the content tree and renders. Fold hints carried by the tree
    /// seed the side-table without overriding interactive state; node paths
    /// that survived the edit therefore keep their open/closed state.
    pub fn set_data(&mut self, root: ContentNode) -> Result<RenderPatch> {
        self.ensure_alive()?;
        seed_folds(&root, self.options.initial_expand_level, &mut self.folds);
        self.data = Some(root);
        Ok(self.render())
    }

    pub fn set_options(&mut self, options: MindmapOptions) -> Result<RenderPatch> {
        self.ensure_alive()?;
        self.colors = ColorScale::new(&options);
        self.options = options;
        Ok(self.render())
    }

    /// Flips the fold state of the node at `path`; with `recursive`, the whole
    /// subtree is forced to the node's new state.
    pub fn toggle_node(&mut self, path: &str, recursive: bool) -> Result<RenderPatch> {
        self.ensure_alive()?;
        let data = self.data.as_ref().ok_or(Error::NoData)?;
        let paths = enumerate_paths(data);
        if !paths.iter().any(|p| p == path) {
            return Err(Error::UnknownNode {
                path: path.to_string(),
            });
        }
        let value = !self.folds.get(path).copied().unwrap_or(false);
        self.folds.insert(path.to_string(), value);
        if recursive {
            let prefix = format!("{path}.");
            for p in paths {
                if p.starts_with(&prefix) {
                    self.folds.insert(p, value);
                }
            }
        }
        Ok(self.render())
    }

    /// One full render pass; cheap no-op when no data is set.
    pub fn render(&mut self) -> RenderPatch {
        let Some(data) = &self.data else {
            return RenderPatch::default();
        };
        let sizer = ContentSizer::new(
            Rc::clone(&self.measurer),
            self.options.max_width,
            self.options.node_min_height,
        );
        let mut root = RenderNode::build(data, &self.folds, &sizer);
        let result = layout(&mut root, &self.options);
        self.bounds = Some(result.bounds);

        let next = Snapshot::capture(&root);
        let patch = reconcile(&self.snapshot, &next, self.options.duration);
        self.stage.apply(&patch, &next, &self.colors);
        self.snapshot = next;
        self.refresh_highlight();
        patch
    }

    /// Scales and pans so the whole map fits the viewport.
    pub async fn fit(&mut self) -> Result<TransitionOutcome> {
        let t = self.fit_transform()?;
        Ok(self.animate_to(t).await)
    }

    /// Executor-free fit: applies the transform without a transition.
    pub fn fit_now(&mut self) -> Result<Transform> {
        let t = self.fit_transform()?;
        self.viewport.set_transform(t);
        Ok(t)
    }

    fn fit_transform(&self) -> Result<Transform> {
        self.ensure_alive()?;
        let bounds = self.bounds.ok_or(Error::NoData)?;
        Ok(self
            .viewport
            .fit(&bounds, self.options.fit_ratio, self.options.max_initial_scale))
    }

    /// Minimal pan bringing the node into the padded viewport; a no-op per axis
    /// when the node is already visible there.
    pub async fn ensure_visible(&mut self, path: &str, padding: f64) -> Result<TransitionOutcome> {
        self.ensure_alive()?;
        let rect = self.visible_rect(path)?;
        let t = self.viewport.ensure_visible(&rect, padding);
        Ok(self.animate_to(t).await)
    }

    pub async fn center_node(&mut self, path: &str) -> Result<TransitionOutcome> {
        self.ensure_alive()?;
        let rect = self.visible_rect(path)?;
        let t = self.viewport.center_node(&rect);
        Ok(self.animate_to(t).await)
    }

    pub async fn rescale(&mut self, scale: f64) -> Result<TransitionOutcome> {
        self.ensure_alive()?;
        let t = self.viewport.rescale(scale);
        Ok(self.animate_to(t).await)
    }

    /// Completes the pending transition; the headless analog of the animation
    /// clock reaching its end.
    pub fn settle(&self) {
        self.transitions.settle();
    }

    /// Shows the highlight overlay around the node at `path`, or hides it. The
    /// overlay tracks the node through later renders.
    pub fn set_highlight(&mut self, path: Option<&str>) -> Result<()> {
        self.ensure_alive()?;
        if let Some(path) = path {
            self.visible_rect(path)?;
            self.highlight_path = Some(path.to_string());
        } else {
            self.highlight_path = None;
        }
        self.refresh_highlight();
        Ok(())
    }

    pub fn to_svg(&self) -> String {
        let bounds = self.bounds.unwrap_or(Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 0.0,
            max_y: 0.0,
        });
        render_svg(
            &self.stage,
            &bounds,
            &self.viewport.transform(),
            &SvgOptions::default(),
        )
    }

    /// Tears the instance down: the stage empties, the pending transition
    /// resolves interrupted, and every later operation fails `Destroyed`.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.transitions.interrupt();
        self.stage.clear();
        self.snapshot = Snapshot::default();
        self.data = None;
        self.bounds = None;
        self.highlight_path = None;
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            return Err(Error::Destroyed);
        }
        Ok(())
    }

    fn visible_rect(&self, path: &str) -> Result<crate::model::Rect> {
        self.snapshot
            .by_path(path)
            .map(|shot| shot.rect)
            .ok_or_else(|| Error::UnknownNode {
                path: path.to_string(),
            })
    }

    async fn animate_to(&mut self, t: Transform) -> TransitionOutcome {
        self.viewport.set_transform(t);
        let ticket = self.transitions.begin();
        if self.options.duration == 0.0 {
            self.transitions.settle();
        }
        ticket.wait().await
    }

    fn refresh_highlight(&mut self) {
        let rect = self
            .highlight_path
            .as_deref()
            .and_then(|p| self.snapshot.by_path(p))
            .map(|shot| shot.rect.inflate(HIGHLIGHT_PADDING));
        self.stage.set_highlight(rect);
    }
}
