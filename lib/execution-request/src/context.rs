use std::any::Any;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Type-erased value stored in a [`KeyedContext`], a data-loader registry,
/// or the legacy `context`/`root` slots of an execution request.
pub type ContextValue = Arc<dyn Any + Send + Sync>;

/// Immutable string-keyed store of arbitrary values, shared between the
/// caller, the engine, and data fetchers for the lifetime of one request.
///
/// Entries keep insertion order. Once built, a context never changes; use
/// [`KeyedContext::derive`] to produce a modified copy. Two contexts holding
/// identical entries are still distinct objects: consumers that cache per
/// context compare handles with `Arc::ptr_eq`, so no `PartialEq` is
/// implemented.
#[derive(Default)]
pub struct KeyedContext {
    entries: IndexMap<String, ContextValue>,
}

impl KeyedContext {
    pub fn builder() -> KeyedContextBuilder {
        KeyedContextBuilder::default()
    }

    /// Typed lookup. Returns `None` when the key is absent or the stored
    /// value has a different type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.entries.get(key)?.downcast_ref::<T>()
    }

    /// Raw lookup, for callers that want to re-share the value elsewhere.
    pub fn get_value(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a new context seeded with this one's entries (values shared,
    /// not cloned), modified by `modify`. `self` is untouched.
    pub fn derive<F>(&self, modify: F) -> KeyedContext
    where
        F: FnOnce(KeyedContextBuilder) -> KeyedContextBuilder,
    {
        let seeded = KeyedContextBuilder {
            entries: self.entries.clone(),
        };
        modify(seeded).build()
    }
}

impl fmt::Debug for KeyedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedContext")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Accumulates entries for a [`KeyedContext`]. Consumed by [`build`].
///
/// [`build`]: KeyedContextBuilder::build
#[derive(Default)]
pub struct KeyedContextBuilder {
    entries: IndexMap<String, ContextValue>,
}

impl KeyedContextBuilder {
    /// Records an entry, overwriting any previous value under `key`.
    pub fn insert(mut self, key: impl Into<String>, value: impl Any + Send + Sync) -> Self {
        self.entries.insert(key.into(), Arc::new(value));
        self
    }

    /// Stores an already-shared value without wrapping it again.
    pub fn insert_value(mut self, key: impl Into<String>, value: ContextValue) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn build(self) -> KeyedContext {
        KeyedContext {
            entries: self.entries,
        }
    }
}
