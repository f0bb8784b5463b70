//! Lazy-asset bookkeeping for client-side optional renderers (math typesetting,
//! syntax highlighting).
//!
//! The transform never blocks on a missing renderer: content is emitted in a
//! placeholder form, the asset is requested here, and once the host reports the load
//! the `retransform` hook tells owners to redo the transform. Duplicate requests for
//! the same URL coalesce into one in-flight load.

use rustc_hash::FxHashSet;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct LoaderInner {
    pending: Vec<String>,
    loaded: FxHashSet<String>,
    failed: FxHashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    inner: Rc<RefCell<LoaderInner>>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a lazy asset. Returns `true` when this call started a new load;
    /// `false` when the asset is already pending, loaded, or failed.
    pub fn request(&self, url: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.loaded.contains(url)
            || inner.failed.contains(url)
            || inner.pending.iter().any(|u| u == url)
        {
            return false;
        }
        tracing::debug!(url, "requesting lazy asset");
        inner.pending.push(url.to_string());
        true
    }

    /// URLs the host should load, in request order.
    pub fn pending(&self) -> Vec<String> {
        self.inner.borrow().pending.clone()
    }

    /// Marks a pending asset as loaded. Returns `true` when the URL was pending.
    pub fn complete(&self, url: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(pos) = inner.pending.iter().position(|u| u == url) else {
            return false;
        };
        inner.pending.remove(pos);
        inner.loaded.insert(url.to_string());
        true
    }

    /// Marks a pending asset as failed. Failed loads are swallowed: no retransform
    /// fires and the content stays in its placeholder rendering unless re-requested
    /// via [`AssetLoader::reset`].
    pub fn fail(&self, url: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(pos) = inner.pending.iter().position(|u| u == url) else {
            return false;
        };
        inner.pending.remove(pos);
        inner.failed.insert(url.to_string());
        true
    }

    pub fn is_loaded(&self, url: &str) -> bool {
        self.inner.borrow().loaded.contains(url)
    }

    /// Forgets a failed load so the next transform may retry it.
    pub fn reset(&self, url: &str) {
        self.inner.borrow_mut().failed.remove(url);
    }
}
