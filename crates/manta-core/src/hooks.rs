//! Ordered, revocable listener lists used as the transform pipeline's extension points.
//!
//! Listeners run synchronously in tap order and communicate by mutating the shared
//! argument. There is no return-value propagation.

use crate::render_rules::RendererRules;
use crate::transformer::{ParseContext, TransformContext};
use std::cell::RefCell;
use std::rc::Rc;

type Listener<A> = Rc<dyn Fn(&mut A)>;

struct HookInner<A> {
    next_id: u64,
    listeners: Vec<(u64, Listener<A>)>,
}

/// A single extension point: an ordered list of listeners sharing one argument type.
pub struct Hook<A> {
    inner: Rc<RefCell<HookInner<A>>>,
}

impl<A> Default for Hook<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Hook<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> Hook<A> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HookInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers a listener and returns a handle that removes it again.
    pub fn tap(&self, f: impl Fn(&mut A) + 'static) -> TapHandle
    where
        A: 'static,
    {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, Rc::new(f)));
            id
        };
        let inner = Rc::clone(&self.inner);
        TapHandle::new(move || {
            inner.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
        })
    }

    /// Invokes all listeners in tap order with the same argument.
    ///
    /// Iterates over a snapshot of the listener list, so taps revoked (or added) by a
    /// listener do not affect the in-flight call.
    pub fn call(&self, args: &mut A) {
        let snapshot: Vec<Listener<A>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, f)| Rc::clone(f))
            .collect();
        for f in snapshot {
            f(args);
        }
    }

    /// Drops every listener. Outstanding [`TapHandle`]s become no-ops.
    pub fn clear(&self) {
        self.inner.borrow_mut().listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().listeners.is_empty()
    }
}

/// Revokes one tap. Dropping the handle without calling [`TapHandle::revoke`] leaves the
/// listener installed for the lifetime of the hook.
pub struct TapHandle {
    revoke: Option<Box<dyn FnOnce()>>,
}

impl TapHandle {
    fn new(revoke: impl FnOnce() + 'static) -> Self {
        Self {
            revoke: Some(Box::new(revoke)),
        }
    }

    pub fn revoke(mut self) {
        if let Some(f) = self.revoke.take() {
            f();
        }
    }
}

impl std::fmt::Debug for TapHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapHandle")
            .field("armed", &self.revoke.is_some())
            .finish()
    }
}

/// The fixed set of pipeline extension points shared by all plugins of one
/// [`Transformer`](crate::Transformer) instance.
#[derive(Default, Clone)]
pub struct TransformHooks {
    /// Runs before tokenization; may rewrite the raw Markdown text.
    pub before_parse: Hook<ParseContext>,
    /// Runs once per transform to let plugins install render rules.
    pub parser: Hook<RendererRules>,
    /// Runs after the token walk, before tree cleanup.
    pub after_parse: Hook<TransformContext>,
    /// Signals that previously rendered content became stale because a lazily loaded
    /// dependency is now available.
    pub retransform: Hook<()>,
}
