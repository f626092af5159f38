//! Ordered repository search.
//!
//! Candidate repositories are probed in a fixed order: configured flat
//! override directories first, then the local cache repository. A flat hit
//! therefore wins even when the cache repository holds the same coordinate.

use std::path::PathBuf;

use anyhow::Result;

use crate::archive;
use crate::core::DeclaredDependency;
use crate::sources::{FlatRepository, LocalRepository, LocatedArtifact};
use crate::version::{StandardMatcher, VersionMatcher};

/// Searches the ordered repository tiers for artifacts.
pub struct RepositoryLocator {
    flats: Vec<FlatRepository>,
    local: LocalRepository,
    matcher: Box<dyn VersionMatcher + Send + Sync>,
}

impl RepositoryLocator {
    /// Create a locator over the given flat overrides and cache repository,
    /// using the default version matcher.
    pub fn new(flats: Vec<FlatRepository>, local: LocalRepository) -> Self {
        RepositoryLocator {
            flats,
            local,
            matcher: Box::new(StandardMatcher),
        }
    }

    /// Replace the version-matching strategy.
    pub fn with_matcher(mut self, matcher: Box<dyn VersionMatcher + Send + Sync>) -> Self {
        self.matcher = matcher;
        self
    }

    /// The cache repository this locator probes last.
    pub fn local(&self) -> &LocalRepository {
        &self.local
    }

    /// First tier: flat override directories (aar-only).
    ///
    /// A hit is exploded into the flat repository's cache directory and the
    /// exploded directory is returned. An archive that fails to explode is
    /// treated as absent and the search continues.
    pub fn locate_flat(&self, dep: &DeclaredDependency) -> Result<Option<PathBuf>> {
        for flat in &self.flats {
            let Some(aar) = flat.locate(dep.artifact_id(), dep.version(), &*self.matcher)? else {
                continue;
            };

            let name = aar
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let stem = name.strip_suffix(".aar").unwrap_or(&name);
            let exploded = flat.cache_dir().join(format!("{stem}.exploded.aar"));

            match archive::extract(&aar, &exploded) {
                Ok(()) => return Ok(Some(exploded)),
                Err(err) => {
                    tracing::warn!(
                        archive = %aar.display(),
                        error = %format!("{err:#}"),
                        "failed to explode flat repository archive"
                    );
                }
            }
        }
        Ok(None)
    }

    /// Second tier: the Maven-layout cache repository.
    pub fn locate_cached(&self, dep: &DeclaredDependency) -> Result<Option<LocatedArtifact>> {
        self.local.locate(
            dep.coordinate(),
            dep.version(),
            dep.packaging(),
            &*self.matcher,
        )
    }
}
