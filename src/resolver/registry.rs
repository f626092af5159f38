//! Canonical version registry - one node per coordinate, highest version
//! wins.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Coordinate, DeclaredDependency};
use crate::version;

/// The canonical node stored for a coordinate.
///
/// Handed out shared: repeated canonicalization of a coordinate returns the
/// same allocation until an upgrade replaces it.
pub type ResolvedNode = Arc<DeclaredDependency>;

/// Registry mapping each coordinate to its single canonical node.
///
/// Invariant: at most one node exists per coordinate, and it always carries
/// the highest version offered so far. Ties keep the existing node, so the
/// first-seen declaration wins among equals.
#[derive(Debug, Default)]
pub struct VersionRegistry {
    nodes: HashMap<Coordinate, ResolvedNode>,
}

impl VersionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical node for `dep`'s coordinate, inserting `dep` as
    /// the node if the coordinate is new. The version carried by later calls
    /// does not change an existing node; only
    /// [`register_or_upgrade`](Self::register_or_upgrade) does.
    pub fn canonicalize(&mut self, dep: &DeclaredDependency) -> ResolvedNode {
        self.nodes
            .entry(dep.coordinate().clone())
            .or_insert_with(|| Arc::new(dep.clone()))
            .clone()
    }

    /// Replace the stored node when `candidate` carries a strictly higher
    /// version. Never downgrades.
    pub fn register_or_upgrade(&mut self, candidate: DeclaredDependency) -> ResolvedNode {
        match self.nodes.get(candidate.coordinate()) {
            Some(existing)
                if version::compare(candidate.version(), existing.version())
                    != std::cmp::Ordering::Greater =>
            {
                existing.clone()
            }
            _ => {
                let node = Arc::new(candidate);
                self.nodes
                    .insert(node.coordinate().clone(), node.clone());
                node
            }
        }
    }

    /// Look up the node for a coordinate.
    pub fn get(&self, coordinate: &Coordinate) -> Option<ResolvedNode> {
        self.nodes.get(coordinate).cloned()
    }

    /// Number of registered coordinates.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
