//! Idempotent archive extraction.
//!
//! Archive-form artifacts (`.aar` files are zip archives) are exploded into
//! a directory once and reused. A freshness check keeps repeat calls from
//! redoing the work; extraction failures are reported to the caller, which
//! treats the artifact as absent.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// Extract `archive` into `out_dir`, overwriting whatever is there, unless
/// the existing extraction is already fresh.
pub fn extract(archive: &Path, out_dir: &Path) -> Result<()> {
    if is_fresh(archive, out_dir)? {
        tracing::debug!(
            archive = %archive.display(),
            "extraction is fresh, skipping"
        );
        return Ok(());
    }

    let file =
        File::open(archive).with_context(|| format!("failed to open: {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("failed to read archive: {}", archive.display()))?;

    crate::util::fs::remove_dir_all_if_exists(out_dir)?;
    crate::util::fs::ensure_dir(out_dir)?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .with_context(|| format!("failed to read archive entry in {}", archive.display()))?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(
                entry = entry.name(),
                archive = %archive.display(),
                "skipping archive entry with an unsafe path"
            );
            continue;
        };
        let dest = out_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&dest)
                .with_context(|| format!("failed to create directory: {}", dest.display()))?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            }
            let mut out = File::create(&dest)
                .with_context(|| format!("failed to create file: {}", dest.display()))?;
            io::copy(&mut entry, &mut out)
                .with_context(|| format!("failed to extract to: {}", dest.display()))?;
        }
    }

    tracing::debug!(
        archive = %archive.display(),
        out_dir = %out_dir.display(),
        "extracted archive"
    );
    Ok(())
}

/// An extraction is fresh when the output directory exists, holds at least
/// one regular file, and none of its files is older than the archive.
fn is_fresh(archive: &Path, out_dir: &Path) -> Result<bool> {
    if !out_dir.is_dir() {
        return Ok(false);
    }

    let archive_mtime = crate::util::fs::modified(archive)?;
    let mut saw_file = false;

    for entry in WalkDir::new(out_dir) {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", out_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        saw_file = true;

        let metadata = entry
            .metadata()
            .with_context(|| format!("failed to stat: {}", entry.path().display()))?;
        let mtime = metadata
            .modified()
            .with_context(|| format!("failed to stat: {}", entry.path().display()))?;
        if mtime < archive_mtime {
            return Ok(false);
        }
    }

    Ok(saw_file)
}
