use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Plugin-name keyed flags recording which plugins produced observable output during the
/// most recent transform. Drives downstream asset selection.
pub type FeatureMap = IndexMap<String, bool>;

/// Cloneable handle plugins capture to flag their feature as used.
///
/// The underlying map is owned by the transformer and reset at the start of every
/// `transform()` call, so flags always describe a single transform.
#[derive(Debug, Clone, Default)]
pub struct FeatureSink {
    flags: Rc<RefCell<FeatureMap>>,
}

impl FeatureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self, name: &str) {
        self.flags.borrow_mut().insert(name.to_string(), true);
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.flags.borrow().get(name).copied().unwrap_or(false)
    }

    pub fn reset(&self) {
        self.flags.borrow_mut().clear();
    }

    /// Snapshot of the flags accumulated since the last reset.
    pub fn snapshot(&self) -> FeatureMap {
        self.flags.borrow().clone()
    }
}
