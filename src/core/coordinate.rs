//! Package identity - WHAT package (group + artifact), independent of version.
//!
//! The version registry keys its canonical nodes by `Coordinate`, so two
//! declarations of the same group/artifact pair collapse onto one entry no
//! matter which versions they carry.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The logical identity of a package: `groupId` plus `artifactId`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    group_id: String,
    artifact_id: String,
}

impl Coordinate {
    /// Create a new coordinate.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Coordinate {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Get the group id.
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// Get the artifact id.
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// The group id as a relative path (`com.example` becomes `com/example`),
    /// the directory prefix an artifact occupies inside a cache repository.
    pub fn group_path(&self) -> PathBuf {
        self.group_id.split('.').collect()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}

/// The artifact form a dependency resolves to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    /// Metadata-only artifact (`.pom`); `bom` descriptors map here too.
    Pom,
    /// A `.jar` archive.
    #[default]
    Jar,
    /// An `.aar` archive, possibly pre-exploded into a directory.
    Aar,
}

impl Packaging {
    /// Parse a descriptor `<type>`/`<packaging>` value. Unknown forms default
    /// to `Jar`.
    pub fn from_descriptor_type(value: &str) -> Self {
        match value.trim() {
            "pom" | "bom" => Packaging::Pom,
            "aar" => Packaging::Aar,
            _ => Packaging::Jar,
        }
    }

    /// The file extension for this packaging.
    pub fn extension(&self) -> &'static str {
        match self {
            Packaging::Pom => "pom",
            Packaging::Jar => "jar",
            Packaging::Aar => "aar",
        }
    }
}

impl fmt::Display for Packaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
