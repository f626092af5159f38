//! Flat repository - a directory of aar artifacts matched by filename.
//!
//! A flat repository has no group structure: artifacts sit directly in one
//! directory as `artifactId.aar` or `artifactId-<version>.aar`. Each flat
//! repository is paired with a cache directory where archives found here are
//! exploded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::version::VersionMatcher;

/// A flat override repository.
#[derive(Debug, Clone)]
pub struct FlatRepository {
    dir: PathBuf,
    cache_dir: PathBuf,
}

impl FlatRepository {
    /// Create a flat repository rooted at `dir`, exploding archives into
    /// `cache_dir`.
    pub fn new(dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        FlatRepository {
            dir: dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// The directory holding the artifacts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where archives found here get exploded.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Locate an aar for `artifact_id` by filename. Flat repositories hold
    /// aar artifacts only; the group id plays no part.
    ///
    /// The exact name `artifactId.aar` wins; otherwise the directory is
    /// scanned for `artifactId-<version>.aar` and version selection is
    /// delegated to the matcher.
    pub fn locate(
        &self,
        artifact_id: &str,
        version: &str,
        matcher: &dyn VersionMatcher,
    ) -> Result<Option<PathBuf>> {
        if !self.dir.is_dir() {
            return Ok(None);
        }

        let exact = self.dir.join(format!("{artifact_id}.aar"));
        if exact.exists() {
            return Ok(Some(exact));
        }

        let prefix = format!("{artifact_id}-");
        let mut candidates = Vec::new();
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read flat repository: {}", self.dir.display()))?;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(candidate) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".aar"))
            {
                candidates.push(candidate.to_string());
            }
        }

        Ok(matcher
            .best_match(version, &candidates)
            .map(|chosen| self.dir.join(format!("{artifact_id}-{chosen}.aar"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::StandardMatcher;
    use tempfile::TempDir;

    #[test]
    fn test_exact_name_wins() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("support.aar"), "a").unwrap();
        fs::write(tmp.path().join("support-9.9.aar"), "b").unwrap();

        let flat = FlatRepository::new(tmp.path(), tmp.path().join("cache"));
        let found = flat.locate("support", "1.0", &StandardMatcher).unwrap();

        assert_eq!(found, Some(tmp.path().join("support.aar")));
    }

    #[test]
    fn test_versioned_name_selection() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("support-1.2.aar"), "a").unwrap();
        fs::write(tmp.path().join("support-1.10.aar"), "b").unwrap();
        fs::write(tmp.path().join("other-1.2.aar"), "c").unwrap();

        let flat = FlatRepository::new(tmp.path(), tmp.path().join("cache"));

        let found = flat.locate("support", "1.+", &StandardMatcher).unwrap();
        assert_eq!(found, Some(tmp.path().join("support-1.10.aar")));

        let found = flat.locate("support", "1.2", &StandardMatcher).unwrap();
        assert_eq!(found, Some(tmp.path().join("support-1.2.aar")));
    }

    #[test]
    fn test_missing_artifact_and_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let flat = FlatRepository::new(tmp.path(), tmp.path().join("cache"));
        assert_eq!(flat.locate("absent", "1.0", &StandardMatcher).unwrap(), None);

        let gone = FlatRepository::new(tmp.path().join("nope"), tmp.path().join("cache"));
        assert_eq!(gone.locate("absent", "1.0", &StandardMatcher).unwrap(), None);
    }
}
