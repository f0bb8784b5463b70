//! Plugin surface: a named transform that taps pipeline hooks at install time and
//! declares the static assets it may need.

use crate::assets::{AssetBundle, AssetConfig};
use crate::features::FeatureSink;
use crate::hooks::TransformHooks;
use crate::loader::AssetLoader;
use std::cell::RefCell;
use std::rc::Rc;

/// Renders math source to markup. Injected rather than linked so headless hosts can
/// plug a real typesetter (or none) without a build-time dependency.
pub trait MathTypesetter {
    fn render(&self, source: &str, display: bool) -> String;
}

/// Highlights fenced code. Returns `None` when the language is unknown; the caller
/// falls back to escaped plain text.
pub trait SyntaxHighlighter {
    fn highlight(&self, code: &str, lang: Option<&str>) -> Option<String>;
}

/// A capability slot that may be filled after construction (the lazy-load scenario:
/// the plugin is installed first, the library arrives later).
pub struct Capability<T: ?Sized> {
    inner: Rc<RefCell<Option<Rc<T>>>>,
}

impl<T: ?Sized> Default for Capability<T> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Capability<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filled(value: Rc<T>) -> Self {
        let cap = Self::new();
        cap.set(value);
        cap
    }

    pub fn set(&self, value: Rc<T>) {
        *self.inner.borrow_mut() = Some(value);
    }

    pub fn get(&self) -> Option<Rc<T>> {
        self.inner.borrow().clone()
    }

    pub fn is_available(&self) -> bool {
        self.inner.borrow().is_some()
    }
}

/// Everything a plugin sees at install time. Explicit configuration object instead of
/// compiled-in globals, so tests can construct transformers freely.
#[derive(Clone)]
pub struct PluginContext {
    pub assets: AssetConfig,
    pub features: FeatureSink,
    pub loader: AssetLoader,
    pub math: Capability<dyn MathTypesetter>,
    pub highlighter: Capability<dyn SyntaxHighlighter>,
}

impl Default for PluginContext {
    fn default() -> Self {
        Self {
            assets: AssetConfig::default(),
            features: FeatureSink::new(),
            loader: AssetLoader::new(),
            math: Capability::new(),
            highlighter: Capability::new(),
        }
    }
}

pub trait Plugin {
    fn name(&self) -> &'static str;

    /// Taps into the pipeline hooks. Called exactly once per transformer instance;
    /// the taps live as long as the hooks do.
    fn install(&self, hooks: &TransformHooks, ctx: &PluginContext) -> AssetBundle;
}
