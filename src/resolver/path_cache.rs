//! Resolved-path memoization with an explicit known-absent sentinel.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::DeclaredDependency;

/// Memoized repository lookups, keyed by the dependency's full identity
/// (`group:artifact:version:packaging`).
///
/// A stored `None` records known-absent: a dependency that was probed and
/// not found is never probed again until [`PathCache::clear`].
#[derive(Debug, Default)]
pub struct PathCache {
    entries: HashMap<String, Option<PathBuf>>,
}

impl PathCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a dependency. Outer `None` means never probed; `Some(None)`
    /// means probed and known absent.
    pub fn get(&self, dep: &DeclaredDependency) -> Option<Option<PathBuf>> {
        self.entries.get(&dep.identity()).cloned()
    }

    /// Record a lookup result, present or absent.
    pub fn insert(&mut self, dep: &DeclaredDependency, path: Option<PathBuf>) {
        self.entries.insert(dep.identity(), path);
    }

    /// Number of recorded lookups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
