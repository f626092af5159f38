//! Filesystem utilities.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Names of the subdirectories directly under `dir`.
pub fn subdir_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Last-modified time of `path`.
pub fn modified(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("failed to stat: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_subdir_names() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("1.0")).unwrap();
        fs::create_dir(tmp.path().join("2.0")).unwrap();
        fs::write(tmp.path().join("maven-metadata.xml"), "<metadata/>").unwrap();

        let names = subdir_names(tmp.path()).unwrap();
        assert_eq!(names, vec!["1.0", "2.0"]);
    }

    #[test]
    fn test_ensure_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // second call is a no-op
        ensure_dir(&nested).unwrap();
    }
}
