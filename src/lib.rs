//! quay - a local-repository dependency resolver for Maven-style artifacts
//!
//! Given dependencies declared as `groupId:artifactId:version:packaging`,
//! quay expands their transitive closure against local repositories only:
//! configured flat override directories first, then a Maven-layout cache
//! repository on disk. Archive-form artifacts are exploded once and reused,
//! version conflicts collapse onto a single highest-version node per
//! coordinate, and recursion is bounded by a fixed depth.
//!
//! Network transport, artifact download, and build-tool integration sit
//! outside this crate; it consumes declared dependencies and a filesystem.

pub mod archive;
pub mod core;
pub mod resolver;
pub mod sources;
pub mod util;
pub mod version;

pub use crate::core::{Coordinate, DeclaredDependency, Descriptor, Packaging};
pub use crate::resolver::{
    ArtifactFilter, DependencyResolver, Resolution, ResolveError, VersionRegistry,
};
pub use crate::sources::{FlatRepository, LocalRepository, RepositoryLocator};
pub use crate::util::Config;
