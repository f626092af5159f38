//! Dependency declaration.
//!
//! A `DeclaredDependency` is a dependency exactly as some declaration site
//! stated it: a coordinate, a version query, a packaging, and the exclusions
//! attached at that site. Instances are immutable once built.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Coordinate, Packaging};

/// A dependency as declared by a build descriptor or a package descriptor.
///
/// The version field holds the declared query verbatim: an exact version, a
/// `+` pattern, or the empty string when the declaration leaves the version
/// to dependency management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    coordinate: Coordinate,
    version: String,
    packaging: Packaging,
    exclusions: BTreeSet<Coordinate>,
}

impl DeclaredDependency {
    /// Create a new declaration with `Jar` packaging and no exclusions.
    pub fn new(coordinate: Coordinate, version: impl Into<String>) -> Self {
        DeclaredDependency {
            coordinate,
            version: version.into(),
            packaging: Packaging::default(),
            exclusions: BTreeSet::new(),
        }
    }

    /// Set the packaging.
    pub fn with_packaging(mut self, packaging: Packaging) -> Self {
        self.packaging = packaging;
        self
    }

    /// Replace the exclusion set.
    pub fn with_exclusions(mut self, exclusions: BTreeSet<Coordinate>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Add a single excluded coordinate.
    pub fn exclude(mut self, coordinate: Coordinate) -> Self {
        self.exclusions.insert(coordinate);
        self
    }

    /// Get the coordinate.
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Get the group id.
    pub fn group_id(&self) -> &str {
        self.coordinate.group_id()
    }

    /// Get the artifact id.
    pub fn artifact_id(&self) -> &str {
        self.coordinate.artifact_id()
    }

    /// Get the declared version query.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the packaging.
    pub fn packaging(&self) -> Packaging {
        self.packaging
    }

    /// Coordinates excluded from this dependency's transitive expansion.
    pub fn exclusions(&self) -> &BTreeSet<Coordinate> {
        &self.exclusions
    }

    /// Check whether `coordinate` is excluded here.
    pub fn excludes(&self, coordinate: &Coordinate) -> bool {
        self.exclusions.contains(coordinate)
    }

    /// The full identity `group:artifact:version:packaging`, the key under
    /// which lookup results are memoized.
    pub fn identity(&self) -> String {
        format!("{}:{}:{}", self.coordinate, self.version, self.packaging)
    }
}

impl fmt::Display for DeclaredDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)
    }
}
