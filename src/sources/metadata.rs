//! Per-artifact metadata index (`maven-metadata.xml`).
//!
//! Each `(group, artifact)` directory in a cache repository may carry a
//! metadata index listing the versions present. The index is advisory: when
//! it is missing, unreadable, or lists no matching version, the caller falls
//! back to the directory listing.

use std::path::Path;

use anyhow::{Context, Result};
use roxmltree::Document;

use crate::version::VersionMatcher;

/// File name of the metadata index inside an artifact directory.
pub const METADATA_FILE: &str = "maven-metadata.xml";

/// Versions listed by an artifact's metadata index.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    versions: Vec<String>,
}

impl MetadataIndex {
    /// Parse metadata XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let document = Document::parse(xml).context("malformed metadata XML")?;
        let versions = document
            .descendants()
            .filter(|node| node.has_tag_name("version"))
            .filter_map(|node| node.text())
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        Ok(MetadataIndex { versions })
    }

    /// Read and parse the index at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// The listed versions, in document order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Resolve a version query against the listed versions.
    pub fn resolve(&self, query: &str, matcher: &dyn VersionMatcher) -> Option<String> {
        matcher.best_match(query, &self.versions)
    }
}
