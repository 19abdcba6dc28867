use std::sync::RwLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Visibility of a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheScope {
    Public,
    Private,
}

/// A caching hint recorded for one response path during execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHint {
    pub path: Vec<String>,
    pub max_age: Option<Duration>,
    pub scope: CacheScope,
}

/// Per-request cache-control handle.
///
/// One instance is shared (by `Arc`) between the request, the engine, and
/// data fetchers; fetchers append hints while the engine executes, and the
/// caller reads the collected hints afterwards to compute response cache
/// headers. How hints are combined into a policy is the caller's concern.
#[derive(Debug, Default)]
pub struct CacheControl {
    hints: RwLock<Vec<CacheHint>>,
}

impl CacheControl {
    pub fn add_hint(&self, hint: CacheHint) {
        let mut hints = self.hints.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        hints.push(hint);
    }

    /// Snapshot of the hints recorded so far, in recording order.
    pub fn hints(&self) -> Vec<CacheHint> {
        self.hints
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{CacheControl, CacheHint, CacheScope};

    #[test]
    fn records_hints_in_order() {
        let cache_control = CacheControl::default();
        cache_control.add_hint(CacheHint {
            path: vec!["user".to_string()],
            max_age: Some(Duration::from_secs(60)),
            scope: CacheScope::Private,
        });
        cache_control.add_hint(CacheHint {
            path: vec!["user".to_string(), "avatar".to_string()],
            max_age: None,
            scope: CacheScope::Public,
        });

        let hints = cache_control.hints();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].path, vec!["user"]);
        assert_eq!(hints[0].scope, CacheScope::Private);
        assert_eq!(hints[1].path, vec!["user", "avatar"]);
    }

    #[test]
    fn scope_displays_uppercase() {
        assert_eq!(CacheScope::Public.to_string(), "PUBLIC");
        assert_eq!(CacheScope::Private.to_string(), "PRIVATE");
    }
}
