//! Configuration file support for quay.
//!
//! quay reads two configuration locations:
//! - Global: `~/.quay/config.toml` - user-wide defaults
//! - Project: `.quay/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default transitive expansion depth.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Artifact-id substrings pruned from transitive expansion by default.
const DEFAULT_EXCLUDED_ARTIFACTS: &[&str] = &["android-all"];

/// Relative path of a config file under its base directory.
const CONFIG_FILE: &str = ".quay/config.toml";

/// quay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the cache repository root; `~/.aide/maven` when unset.
    pub cache_root: Option<PathBuf>,

    /// Flat override repositories: artifact directory mapped to the
    /// directory where archives found there get exploded.
    pub flat_repositories: BTreeMap<PathBuf, PathBuf>,

    /// Transitive expansion depth.
    pub max_depth: Option<usize>,

    /// Artifact-id substrings pruned from transitive expansion.
    pub excluded_artifacts: Option<Vec<String>>,
}

impl Config {
    /// The configured cache root, if any.
    pub fn cache_root(&self) -> Option<&Path> {
        self.cache_root.as_deref()
    }

    /// The flat repository map.
    pub fn flat_repositories(&self) -> &BTreeMap<PathBuf, PathBuf> {
        &self.flat_repositories
    }

    /// The effective expansion depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// The effective artifact-filter substrings.
    pub fn excluded_artifacts(&self) -> Vec<String> {
        match &self.excluded_artifacts {
            Some(list) => list.clone(),
            None => DEFAULT_EXCLUDED_ARTIFACTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|err| {
                tracing::warn!(
                    "failed to load config from {}: {}",
                    path.display(),
                    err
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Load the layered configuration for a project directory: global
    /// config first, then the project's, which wins.
    pub fn load_layered(project_dir: &Path) -> Self {
        let mut config = match global_config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        };
        config.merge(Self::load_or_default(&project_dir.join(CONFIG_FILE)));
        config
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.cache_root.is_some() {
            self.cache_root = other.cache_root;
        }
        self.flat_repositories.extend(other.flat_repositories);
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.excluded_artifacts.is_some() {
            self.excluded_artifacts = other.excluded_artifacts;
        }
    }
}

/// Path of the global config file, `~/.quay/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE))
}
