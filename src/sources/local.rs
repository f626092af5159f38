//! The local cache repository - Maven-layout artifact storage on disk.
//!
//! Artifacts live at `<root>/<group/as/path>/<artifact>/<version>/` as
//! `artifact-version.{pom,jar,aar}`, with `.exploded.aar` directories as
//! extraction products next to `.aar` files.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::archive;
use crate::core::{Coordinate, Packaging};
use crate::sources::metadata::{MetadataIndex, METADATA_FILE};
use crate::version::VersionMatcher;

/// Default cache repository root: `~/.aide/maven`.
pub fn default_cache_root() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".aide").join("maven"))
}

/// An artifact located in the cache repository, with the concrete version
/// the lookup landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedArtifact {
    pub path: PathBuf,
    pub version: String,
}

/// The Maven-layout cache repository.
#[derive(Debug, Clone)]
pub struct LocalRepository {
    root: PathBuf,
}

impl LocalRepository {
    /// Create a repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalRepository { root: root.into() }
    }

    /// The repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate an artifact for `coordinate` matching the `version` query.
    ///
    /// The concrete version comes from the metadata index, falling back to
    /// the directory listing. Probe order inside the version directory:
    /// `.pom` (pom packaging only), `.jar` file, `.aar` directory,
    /// `.exploded.aar` directory, then `.aar` file, which is exploded into a
    /// sibling `.exploded.aar` directory.
    pub fn locate(
        &self,
        coordinate: &Coordinate,
        version: &str,
        packaging: Packaging,
        matcher: &dyn VersionMatcher,
    ) -> Result<Option<LocatedArtifact>> {
        let artifact_dir = self
            .root
            .join(coordinate.group_path())
            .join(coordinate.artifact_id());
        if !artifact_dir.is_dir() {
            return Ok(None);
        }

        let Some(version) = self.concrete_version(&artifact_dir, version, matcher)? else {
            return Ok(None);
        };

        // version dots would confuse Path::with_extension, so file names are
        // assembled as strings
        let version_dir = artifact_dir.join(&version);
        let stem = format!("{}-{}", coordinate.artifact_id(), version);
        let located = |path: PathBuf| {
            Some(LocatedArtifact {
                path,
                version: version.clone(),
            })
        };

        if packaging == Packaging::Pom {
            let pom = version_dir.join(format!("{stem}.pom"));
            if pom.is_file() {
                return Ok(located(pom));
            }
        }

        let jar = version_dir.join(format!("{stem}.jar"));
        if jar.is_file() {
            return Ok(located(jar));
        }

        let aar = version_dir.join(format!("{stem}.aar"));
        if aar.is_dir() {
            return Ok(located(aar));
        }

        let exploded = version_dir.join(format!("{stem}.exploded.aar"));
        if exploded.is_dir() {
            return Ok(located(exploded));
        }

        if aar.is_file() {
            // extraction failure means the artifact is unusable; report it
            // and treat the coordinate as absent
            if let Err(err) = archive::extract(&aar, &exploded) {
                tracing::warn!(
                    archive = %aar.display(),
                    error = %format!("{err:#}"),
                    "failed to explode archive"
                );
                return Ok(None);
            }
            return Ok(located(exploded));
        }

        Ok(None)
    }

    /// Pick the concrete version present for this artifact: first the
    /// metadata index, then the listing of version subdirectories.
    fn concrete_version(
        &self,
        artifact_dir: &Path,
        version: &str,
        matcher: &dyn VersionMatcher,
    ) -> Result<Option<String>> {
        let metadata_path = artifact_dir.join(METADATA_FILE);
        if metadata_path.is_file() {
            match MetadataIndex::load(&metadata_path) {
                Ok(index) => {
                    if let Some(found) = index.resolve(version, matcher) {
                        return Ok(Some(found));
                    }
                }
                Err(err) => {
                    tracing::debug!(
                        path = %metadata_path.display(),
                        error = %format!("{err:#}"),
                        "unreadable metadata index, falling back to directory listing"
                    );
                }
            }
        }

        let versions = crate::util::fs::subdir_names(artifact_dir)?;
        Ok(matcher.best_match(version, &versions))
    }
}
