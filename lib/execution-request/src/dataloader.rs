use std::any::Any;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::context::ContextValue;

/// Registry of named data loaders shared by every fetcher of one request.
///
/// Loader handles are opaque to this crate; batching and dispatch belong to
/// the engine. The map is concurrent, so callers holding the same `Arc` can
/// keep registering loaders after the owning request was built.
#[derive(Default)]
pub struct DataLoaderRegistry {
    loaders: DashMap<String, ContextValue>,
}

impl DataLoaderRegistry {
    /// Registers a loader under `key`, replacing any previous one.
    pub fn register<T: Any + Send + Sync>(&self, key: impl Into<String>, loader: T) {
        self.loaders.insert(key.into(), Arc::new(loader));
    }

    /// Typed lookup of a registered loader. Returns `None` when the key is
    /// absent or the loader has a different type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let entry = self.loaders.get(key)?;
        Arc::clone(entry.value()).downcast::<T>().ok()
    }

    pub fn unregister(&self, key: &str) -> Option<ContextValue> {
        self.loaders.remove(key).map(|(_, loader)| loader)
    }

    pub fn keys(&self) -> Vec<String> {
        self.loaders.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}

impl fmt::Debug for DataLoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLoaderRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::DataLoaderRegistry;

    struct UserLoader {
        batch_size: usize,
    }

    #[test]
    fn registers_and_gets_typed_loader() {
        let registry = DataLoaderRegistry::default();
        registry.register("users", UserLoader { batch_size: 50 });

        let loader = registry.get::<UserLoader>("users").unwrap();
        assert_eq!(loader.batch_size, 50);
        assert_eq!(registry.keys(), vec!["users".to_string()]);
    }

    #[test]
    fn mistyped_get_returns_none() {
        let registry = DataLoaderRegistry::default();
        registry.register("users", UserLoader { batch_size: 50 });

        assert!(registry.get::<String>("users").is_none());
    }

    #[test]
    fn unregister_removes_loader() {
        let registry = DataLoaderRegistry::default();
        registry.register("users", UserLoader { batch_size: 50 });

        assert!(registry.unregister("users").is_some());
        assert!(registry.is_empty());
        assert!(registry.unregister("users").is_none());
    }
}
