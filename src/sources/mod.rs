//! Repository tiers.
//!
//! Artifacts are searched in a fixed order: flat override directories
//! first, then the local cache repository.

pub mod flat;
pub mod local;
pub mod locator;
pub mod metadata;

pub use flat::FlatRepository;
pub use local::{default_cache_root, LocalRepository, LocatedArtifact};
pub use locator::RepositoryLocator;
pub use metadata::MetadataIndex;
