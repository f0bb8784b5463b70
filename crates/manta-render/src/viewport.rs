//! Pan/zoom transform math and the transition registry.
//!
//! Operations here are pure geometry over the current transform; the async
//! surface lives on the instance, which pairs each transform change with a
//! ticket from [`Transitions`]. Starting a new transition supersedes the
//! pending one, which resolves `Interrupted` rather than erroring.

use crate::model::{Bounds, Rect};
use futures::channel::oneshot;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            k: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Settled,
    Interrupted,
}

/// At most one transition is pending per instance; beginning another resolves
/// the old one `Interrupted`.
#[derive(Default)]
pub struct Transitions {
    pending: RefCell<Option<oneshot::Sender<TransitionOutcome>>>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> TransitionTicket {
        let (tx, rx) = oneshot::channel();
        if let Some(old) = self.pending.borrow_mut().replace(tx) {
            let _ = old.send(TransitionOutcome::Interrupted);
        }
        TransitionTicket { rx }
    }

    /// Completes the pending transition, if any. The headless analog of the
    /// animation finishing.
    pub fn settle(&self) {
        if let Some(tx) = self.pending.borrow_mut().take() {
            let _ = tx.send(TransitionOutcome::Settled);
        }
    }

    /// Resolves the pending transition `Interrupted` without starting another.
    pub fn interrupt(&self) {
        if let Some(tx) = self.pending.borrow_mut().take() {
            let _ = tx.send(TransitionOutcome::Interrupted);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}

pub struct TransitionTicket {
    rx: oneshot::Receiver<TransitionOutcome>,
}

impl TransitionTicket {
    /// Resolves when the transition settles or is superseded. A dropped
    /// registry counts as interruption, never an error.
    pub async fn wait(self) -> TransitionOutcome {
        self.rx.await.unwrap_or(TransitionOutcome::Interrupted)
    }
}

/// Viewport geometry: a size in host pixels plus the current transform.
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    transform: Transform,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            transform: Transform::default(),
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Scale-to-fit: the content bounds occupy at most `fit_ratio` of each
    /// viewport axis, capped at `max_scale`, centered.
    pub fn fit(&self, bounds: &Bounds, fit_ratio: f64, max_scale: f64) -> Transform {
        let bw = bounds.width().max(1e-9);
        let bh = bounds.height().max(1e-9);
        let k = (fit_ratio * (self.width / bw).min(self.height / bh)).min(max_scale);
        Transform {
            x: (self.width - bw * k) / 2.0 - bounds.min_x * k,
            y: (self.height - bh * k) / 2.0 - bounds.min_y * k,
            k,
        }
    }

    /// Minimal pan that brings `rect` (content units) inside the padded
    /// viewport. Per axis, the two edge deltas only agree in sign when the rect
    /// is entirely outside the padded region; then the smaller-magnitude delta
    /// is applied. Otherwise the axis is left alone.
    pub fn ensure_visible(&self, rect: &Rect, padding: f64) -> Transform {
        let t = self.transform;
        let left = rect.x * t.k + t.x;
        let right = (rect.x + rect.width) * t.k + t.x;
        let top = rect.y * t.k + t.y;
        let bottom = (rect.y + rect.height) * t.k + t.y;

        let dx = axis_delta(left, right, padding, self.width - padding);
        let dy = axis_delta(top, bottom, padding, self.height - padding);
        Transform {
            x: t.x + dx,
            y: t.y + dy,
            k: t.k,
        }
    }

    pub fn center_node(&self, rect: &Rect) -> Transform {
        let t = self.transform;
        Transform {
            x: self.width / 2.0 - t.k * (rect.x + rect.width / 2.0),
            y: self.height / 2.0 - t.k * (rect.y + rect.height / 2.0),
            k: t.k,
        }
    }

    /// Multiplies the scale, pinned at the viewport center.
    pub fn rescale(&self, scale: f64) -> Transform {
        let t = self.transform;
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;
        Transform {
            x: cx - (cx - t.x) * scale,
            y: cy - (cy - t.y) * scale,
            k: t.k * scale,
        }
    }
}

fn axis_delta(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    let d_lo = min - lo;
    let d_hi = max - hi;
    if d_lo * d_hi > 0.0 {
        if d_lo.abs() < d_hi.abs() { d_lo } else { d_hi }
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn bounds(w: f64, h: f64) -> Bounds {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: w,
            max_y: h,
        }
    }

    #[test]
    fn fit_centers_and_respects_the_ratio() {
        let vp = Viewport::new(1000.0, 500.0);
        let t = vp.fit(&bounds(2000.0, 500.0), 0.95, 2.0);
        // Width-limited: k = 0.95 * 1000/2000.
        assert!((t.k - 0.475).abs() < 1e-9);
        assert!((t.x - (1000.0 - 2000.0 * t.k) / 2.0).abs() < 1e-9);
        assert!((t.y - (500.0 - 500.0 * t.k) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn fit_never_exceeds_the_max_scale() {
        let vp = Viewport::new(1000.0, 1000.0);
        let t = vp.fit(&bounds(10.0, 10.0), 0.95, 2.0);
        assert_eq!(t.k, 2.0);
    }

    #[test]
    fn ensure_visible_is_a_noop_when_the_rect_is_visible() {
        let vp = Viewport::new(1000.0, 500.0);
        let rect = Rect {
            x: 100.0,
            y: 100.0,
            width: 50.0,
            height: 20.0,
        };
        assert_eq!(vp.ensure_visible(&rect, 10.0), vp.transform());
    }

    #[test]
    fn ensure_visible_pans_by_the_smaller_delta() {
        let vp = Viewport::new(1000.0, 500.0);
        // Entirely right of the viewport.
        let rect = Rect {
            x: 1200.0,
            y: 100.0,
            width: 50.0,
            height: 20.0,
        };
        let t = vp.ensure_visible(&rect, 10.0);
        // Edge deltas are -1190 and -260; the smaller magnitude wins.
        assert!((t.x - -260.0).abs() < 1e-9);
        assert_eq!(t.y, 0.0);
    }

    #[test]
    fn ensure_visible_ignores_an_axis_the_rect_already_spans() {
        let vp = Viewport::new(1000.0, 500.0);
        // Overhangs both padded edges: deltas are +110 and -110, so no pan
        // could bring the whole rect inside and the axis is left alone.
        let rect = Rect {
            x: -100.0,
            y: 100.0,
            width: 1200.0,
            height: 20.0,
        };
        let t = vp.ensure_visible(&rect, 10.0);
        assert_eq!(t, vp.transform());
    }

    #[test]
    fn ensure_visible_pans_a_rect_straddling_one_edge_inside() {
        let vp = Viewport::new(1000.0, 500.0);
        // Straddles only the right padded edge: deltas are -940 and -60,
        // so the smaller-magnitude pan pulls the rect fully into view.
        let rect = Rect {
            x: 950.0,
            y: 100.0,
            width: 100.0,
            height: 20.0,
        };
        let t = vp.ensure_visible(&rect, 10.0);
        assert!((t.x - -60.0).abs() < 1e-9);
        assert_eq!(t.y, 0.0);
    }

    #[test]
    fn rescale_is_pinned_at_the_viewport_center() {
        let mut vp = Viewport::new(1000.0, 500.0);
        vp.set_transform(Transform {
            x: 100.0,
            y: 50.0,
            k: 1.0,
        });
        let t = vp.rescale(2.0);
        assert_eq!(t.k, 2.0);
        // The content point that sat at the center stays there.
        let center_content_x = (500.0 - 100.0) / 1.0;
        assert!((center_content_x * t.k + t.x - 500.0).abs() < 1e-9);
    }

    #[test]
    fn superseding_a_transition_resolves_it_interrupted() {
        let transitions = Transitions::new();
        let first = transitions.begin();
        let second = transitions.begin();
        assert_eq!(block_on(first.wait()), TransitionOutcome::Interrupted);
        transitions.settle();
        assert_eq!(block_on(second.wait()), TransitionOutcome::Settled);
        assert!(!transitions.has_pending());
    }

    #[test]
    fn dropping_the_registry_interrupts_the_ticket() {
        let transitions = Transitions::new();
        let ticket = transitions.begin();
        drop(transitions);
        assert_eq!(block_on(ticket.wait()), TransitionOutcome::Interrupted);
    }
}
