//! Dependency resolution.
//!
//! The resolver expands declared dependencies into their transitive closure
//! against local repositories only: flat override directories first, then
//! the Maven-layout cache repository. Version conflicts collapse onto a
//! single highest-version node per coordinate, and recursion is bounded by
//! a fixed depth instead of cycle detection.

pub mod errors;
pub mod path_cache;
pub mod registry;

pub use errors::ResolveError;
pub use registry::{ResolvedNode, VersionRegistry};

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::descriptor::descriptor_path;
use crate::core::{Coordinate, DeclaredDependency, DescriptorCache, DescriptorReader};
use crate::sources::{default_cache_root, FlatRepository, LocalRepository, RepositoryLocator};
use crate::util::config::{Config, DEFAULT_MAX_DEPTH};
use path_cache::PathCache;

/// Outcome of a resolution pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resolution {
    /// Artifact paths for every dependency that resolved, in first-visit
    /// order.
    pub resolved_paths: Vec<PathBuf>,
    /// Dependencies that could not be located in any repository tier.
    pub missing: Vec<DeclaredDependency>,
}

/// Prunes dependencies from transitive expansion by artifact id.
///
/// Some ecosystems ship umbrella artifacts that must never join a
/// compilation closure; the filter holds their identifying substrings.
#[derive(Debug, Clone, Default)]
pub struct ArtifactFilter {
    substrings: Vec<String>,
}

impl ArtifactFilter {
    /// Create a filter pruning artifact ids that contain any of the given
    /// substrings.
    pub fn new(substrings: Vec<String>) -> Self {
        ArtifactFilter { substrings }
    }

    /// Check whether `dep` is pruned.
    pub fn excludes(&self, dep: &DeclaredDependency) -> bool {
        self.substrings
            .iter()
            .any(|substring| dep.artifact_id().contains(substring.as_str()))
    }
}

/// An artifact found in some repository tier, with the concrete version
/// when the repository layout reveals it.
struct Located {
    path: PathBuf,
    version: Option<String>,
}

/// State threaded through one resolution pass.
#[derive(Default)]
struct Pass {
    resolution: Resolution,
    visited: HashSet<PathBuf>,
    missing_seen: HashSet<String>,
}

/// Resolves declared dependencies into their transitive closure.
///
/// The registry, path cache, and descriptor cache live for the resolver's
/// lifetime (or until [`reset`](Self::reset)). Methods take `&mut self`, so
/// one resolution is in flight per instance by construction; embedders that
/// share a resolver across threads wrap it in a `Mutex`. All I/O is local
/// and blocking.
pub struct DependencyResolver {
    locator: RepositoryLocator,
    registry: VersionRegistry,
    path_cache: PathCache,
    descriptors: DescriptorCache,
    filter: ArtifactFilter,
    max_depth: usize,
}

impl DependencyResolver {
    /// Create a resolver over the given repository tiers with default depth
    /// and no artifact filter.
    pub fn new(locator: RepositoryLocator) -> Self {
        DependencyResolver {
            locator,
            registry: VersionRegistry::new(),
            path_cache: PathCache::new(),
            descriptors: DescriptorCache::new(),
            filter: ArtifactFilter::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Build a resolver from configuration: cache root (configured override
    /// or the default under the user's home), flat repositories, depth, and
    /// artifact filter.
    pub fn from_config(config: &Config) -> Result<Self, ResolveError> {
        let root = match config.cache_root() {
            Some(path) => path.to_path_buf(),
            None => default_cache_root().ok_or(ResolveError::NoCacheRoot)?,
        };
        let flats = config
            .flat_repositories()
            .iter()
            .map(|(dir, cache_dir)| FlatRepository::new(dir, cache_dir))
            .collect();
        let locator = RepositoryLocator::new(flats, LocalRepository::new(root));

        Ok(Self::new(locator)
            .with_max_depth(config.max_depth())
            .with_filter(ArtifactFilter::new(config.excluded_artifacts())))
    }

    /// Set the transitive expansion depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the artifact filter.
    pub fn with_filter(mut self, filter: ArtifactFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Replace the descriptor reader (and reset the descriptor cache).
    pub fn with_descriptor_reader(
        mut self,
        reader: Box<dyn DescriptorReader + Send + Sync>,
    ) -> Self {
        self.descriptors = DescriptorCache::with_reader(reader);
        self
    }

    /// The version registry, exposed for inspection.
    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// Clear the version registry, the path cache, and the parsed
    /// descriptors. Call after the backing repository changes on disk. Must
    /// not race an in-flight resolution; `&mut self` enforces that within
    /// one instance.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.path_cache.clear();
        self.descriptors.clear();
        tracing::debug!("resolver caches cleared");
    }

    /// Resolve the transitive closure of `declared`.
    ///
    /// Dependencies that cannot be located are reported in
    /// [`Resolution::missing`] and do not disturb the resolution of their
    /// siblings; only structural failures (unreadable repositories,
    /// malformed descriptors) abort the call.
    pub fn resolve_closure(
        &mut self,
        declared: &[DeclaredDependency],
    ) -> Result<Resolution, ResolveError> {
        // every declaration offers its version to the registry up front, so
        // conflicting declared versions collapse before any lookup happens
        for dep in declared {
            self.registry.register_or_upgrade(dep.clone());
        }

        let mut pass = Pass::default();
        for dep in declared {
            self.resolve(dep, self.max_depth, &BTreeSet::new(), &mut pass)?;
        }

        tracing::debug!(
            resolved = pass.resolution.resolved_paths.len(),
            missing = pass.resolution.missing.len(),
            "resolved dependency closure"
        );
        Ok(pass.resolution)
    }

    /// List every dependency of `declared` (transitively) that is not
    /// present locally.
    pub fn missing_dependencies(
        &mut self,
        declared: &[DeclaredDependency],
    ) -> Result<Vec<DeclaredDependency>, ResolveError> {
        Ok(self.resolve_closure(declared)?.missing)
    }

    /// Resolve a single dependency to its artifact path without expanding
    /// children.
    pub fn resolve_artifact_path(
        &mut self,
        dep: &DeclaredDependency,
    ) -> Result<Option<PathBuf>, ResolveError> {
        let node = self.registry.canonicalize(dep);
        Ok(self.locate(&node)?.map(|located| located.path))
    }

    /// Whether `dep` is present in some repository tier.
    pub fn is_cached(&mut self, dep: &DeclaredDependency) -> Result<bool, ResolveError> {
        Ok(self.resolve_artifact_path(dep)?.is_some())
    }

    fn resolve(
        &mut self,
        dep: &DeclaredDependency,
        depth: usize,
        inherited: &BTreeSet<Coordinate>,
        pass: &mut Pass,
    ) -> Result<(), ResolveError> {
        let node = self.registry.canonicalize(dep);

        let Some(located) = self.locate(&node)? else {
            tracing::debug!(dependency = %node, "dependency not present locally");
            if pass.missing_seen.insert(dep.identity()) {
                pass.resolution.missing.push(dep.clone());
            }
            return Ok(());
        };

        // the on-disk instance version is authoritative for conflict
        // resolution; upgrades never downgrade the registry
        if let Some(version) = &located.version {
            if version != node.version() {
                let instance =
                    DeclaredDependency::new(node.coordinate().clone(), version.clone())
                        .with_packaging(node.packaging())
                        .with_exclusions(node.exclusions().clone());
                self.registry.register_or_upgrade(instance);
            }
        }

        if !pass.visited.insert(located.path.clone()) {
            return Ok(());
        }
        pass.resolution.resolved_paths.push(located.path.clone());

        if depth == 0 {
            return Ok(());
        }

        let descriptor =
            self.descriptors
                .load(&located.path)
                .map_err(|source| ResolveError::Descriptor {
                    path: descriptor_path(&located.path),
                    source,
                })?;

        // management entries only raise version floors; register_or_upgrade
        // never downgrades and never adds resolution targets by itself
        for entry in descriptor.dependency_management() {
            self.registry.register_or_upgrade(entry.clone());
        }

        // the exclusion set in force here is the canonical node's own plus
        // everything inherited from the declaration path above, so an
        // exclusion shields the whole subtree beneath it
        let current = self.registry.canonicalize(descriptor.artifact());
        let mut exclusions = inherited.clone();
        exclusions.extend(current.exclusions().iter().cloned());

        for child in descriptor.dependencies() {
            if exclusions.contains(child.coordinate()) {
                tracing::debug!(
                    parent = %current,
                    child = %child.coordinate(),
                    "skipping excluded dependency"
                );
                continue;
            }
            if self.filter.excludes(child) {
                tracing::debug!(child = %child, "skipping filtered dependency");
                continue;
            }
            self.resolve(child, depth - 1, &exclusions, pass)?;
        }

        Ok(())
    }

    /// Probe the repository tiers for `node`.
    ///
    /// Flat overrides come first and are never memoized, so a flat artifact
    /// wins even when the cache repository holds the same coordinate. Cache
    /// repository lookups are memoized, including known-absent results.
    fn locate(&mut self, node: &DeclaredDependency) -> Result<Option<Located>, ResolveError> {
        if let Some(path) = self.locator.locate_flat(node)? {
            return Ok(Some(Located {
                path,
                version: None,
            }));
        }

        if let Some(cached) = self.path_cache.get(node) {
            return Ok(cached.map(|path| Located {
                path,
                version: None,
            }));
        }

        let found = self.locator.locate_cached(node)?;
        self.path_cache
            .insert(node, found.as_ref().map(|located| located.path.clone()));

        Ok(found.map(|located| Located {
            path: located.path,
            version: Some(located.version),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinate, Packaging};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn install_jar(root: &Path, group: &str, artifact: &str, version: &str, pom_extra: &str) {
        let dir = root
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{artifact}-{version}.jar")), "jar").unwrap();
        fs::write(
            dir.join(format!("{artifact}-{version}.pom")),
            format!(
                "<project><groupId>{group}</groupId>\
                 <artifactId>{artifact}</artifactId>\
                 <version>{version}</version>{pom_extra}</project>"
            ),
        )
        .unwrap();
    }

    fn dependency_xml(group: &str, artifact: &str, version: &str) -> String {
        format!(
            "<dependencies><dependency>\
             <groupId>{group}</groupId>\
             <artifactId>{artifact}</artifactId>\
             <version>{version}</version>\
             </dependency></dependencies>"
        )
    }

    fn resolver_for(root: &Path) -> DependencyResolver {
        DependencyResolver::new(RepositoryLocator::new(
            Vec::new(),
            LocalRepository::new(root),
        ))
    }

    fn declared(group: &str, artifact: &str, version: &str) -> DeclaredDependency {
        DeclaredDependency::new(Coordinate::new(group, artifact), version)
    }

    #[test]
    fn test_resolves_transitive_children() {
        let tmp = TempDir::new().unwrap();
        install_jar(
            tmp.path(),
            "com.example",
            "app",
            "1.0",
            &dependency_xml("com.example", "util", "2.0"),
        );
        install_jar(tmp.path(), "com.example", "util", "2.0", "");

        let mut resolver = resolver_for(tmp.path());
        let resolution = resolver
            .resolve_closure(&[declared("com.example", "app", "1.0")])
            .unwrap();

        assert_eq!(resolution.resolved_paths.len(), 2);
        assert!(resolution.missing.is_empty());
        assert!(resolution.resolved_paths[1].ends_with("util-2.0.jar"));
    }

    #[test]
    fn test_depth_zero_resolves_only_roots() {
        let tmp = TempDir::new().unwrap();
        install_jar(
            tmp.path(),
            "com.example",
            "app",
            "1.0",
            &dependency_xml("com.example", "util", "2.0"),
        );
        install_jar(tmp.path(), "com.example", "util", "2.0", "");

        let mut resolver = resolver_for(tmp.path()).with_max_depth(0);
        let resolution = resolver
            .resolve_closure(&[declared("com.example", "app", "1.0")])
            .unwrap();

        assert_eq!(resolution.resolved_paths.len(), 1);
        assert!(resolution.resolved_paths[0].ends_with("app-1.0.jar"));
    }

    #[test]
    fn test_missing_dependency_is_reported_once() {
        let tmp = TempDir::new().unwrap();
        install_jar(
            tmp.path(),
            "com.example",
            "app",
            "1.0",
            &dependency_xml("com.example", "ghost", "1.0"),
        );
        install_jar(
            tmp.path(),
            "com.example",
            "extra",
            "1.0",
            &dependency_xml("com.example", "ghost", "1.0"),
        );

        let mut resolver = resolver_for(tmp.path());
        let resolution = resolver
            .resolve_closure(&[
                declared("com.example", "app", "1.0"),
                declared("com.example", "extra", "1.0"),
            ])
            .unwrap();

        assert_eq!(resolution.resolved_paths.len(), 2);
        assert_eq!(resolution.missing.len(), 1);
        assert_eq!(resolution.missing[0].artifact_id(), "ghost");
    }

    #[test]
    fn test_artifact_filter_prunes_children() {
        let tmp = TempDir::new().unwrap();
        install_jar(
            tmp.path(),
            "com.example",
            "app",
            "1.0",
            &dependency_xml("org.platform", "android-all-sdk", "14"),
        );

        let mut resolver = resolver_for(tmp.path())
            .with_filter(ArtifactFilter::new(vec!["android-all".to_string()]));
        let resolution = resolver
            .resolve_closure(&[declared("com.example", "app", "1.0")])
            .unwrap();

        // filtered children are neither resolved nor reported missing
        assert_eq!(resolution.resolved_paths.len(), 1);
        assert!(resolution.missing.is_empty());
    }

    #[test]
    fn test_malformed_descriptor_aborts() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("com/example/broken/1.0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("broken-1.0.jar"), "jar").unwrap();
        fs::write(dir.join("broken-1.0.pom"), "<project><unclosed").unwrap();

        let mut resolver = resolver_for(tmp.path());
        let result = resolver.resolve_closure(&[declared("com.example", "broken", "1.0")]);

        assert!(matches!(result, Err(ResolveError::Descriptor { .. })));
    }

    #[test]
    fn test_reset_clears_registry_and_path_cache() {
        let tmp = TempDir::new().unwrap();
        install_jar(tmp.path(), "com.example", "app", "1.0", "");

        let mut resolver = resolver_for(tmp.path());
        resolver
            .resolve_closure(&[declared("com.example", "app", "1.0")])
            .unwrap();
        assert!(!resolver.registry().is_empty());

        resolver.reset();
        assert!(resolver.registry().is_empty());
    }

    #[test]
    fn test_conflicting_declared_versions_collapse() {
        let tmp = TempDir::new().unwrap();
        install_jar(tmp.path(), "com.example", "lib", "1.0", "");
        install_jar(tmp.path(), "com.example", "lib", "2.0", "");

        let mut resolver = resolver_for(tmp.path());
        let resolution = resolver
            .resolve_closure(&[
                declared("com.example", "lib", "1.0"),
                declared("com.example", "lib", "2.0"),
            ])
            .unwrap();

        assert_eq!(resolution.resolved_paths.len(), 1);
        assert!(resolution.resolved_paths[0].ends_with("lib-2.0.jar"));

        let node = resolver
            .registry()
            .get(&Coordinate::new("com.example", "lib"))
            .unwrap();
        assert_eq!(node.version(), "2.0");
    }

    #[test]
    fn test_exclusion_shields_subtree() {
        let tmp = TempDir::new().unwrap();
        install_jar(
            tmp.path(),
            "com.example",
            "app",
            "1.0",
            &dependency_xml("com.example", "mid", "1.0"),
        );
        install_jar(
            tmp.path(),
            "com.example",
            "mid",
            "1.0",
            &dependency_xml("com.example", "leaf", "1.0"),
        );
        install_jar(tmp.path(), "com.example", "leaf", "1.0", "");

        let mut resolver = resolver_for(tmp.path());
        let root = declared("com.example", "app", "1.0")
            .exclude(Coordinate::new("com.example", "leaf"));
        let resolution = resolver.resolve_closure(&[root]).unwrap();

        // leaf sits two levels down, but the root's exclusion still shields it
        assert!(!resolution
            .resolved_paths
            .iter()
            .any(|path| path.ends_with("leaf-1.0.jar")));
        assert!(resolution.missing.is_empty());
    }

    #[test]
    fn test_management_raises_version_floor() {
        let tmp = TempDir::new().unwrap();
        install_jar(
            tmp.path(),
            "com.example",
            "app",
            "1.0",
            &format!(
                "<dependencyManagement>{}</dependencyManagement>{}",
                dependency_xml("com.example", "util", "2.0"),
                dependency_xml("com.example", "util", "1.0"),
            ),
        );
        install_jar(tmp.path(), "com.example", "util", "2.0", "");

        let mut resolver = resolver_for(tmp.path());
        let resolution = resolver
            .resolve_closure(&[declared("com.example", "app", "1.0")])
            .unwrap();

        // the child declares 1.0, but management pins the floor at 2.0
        assert!(resolution.resolved_paths[1].ends_with("util-2.0.jar"));
        assert!(resolution.missing.is_empty());
    }

    #[test]
    fn test_pom_packaging_dependency() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("com/example/platform/1.0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("platform-1.0.pom"),
            "<project><groupId>com.example</groupId>\
             <artifactId>platform</artifactId>\
             <version>1.0</version><packaging>pom</packaging></project>",
        )
        .unwrap();

        let mut resolver = resolver_for(tmp.path());
        let path = resolver
            .resolve_artifact_path(
                &declared("com.example", "platform", "1.0").with_packaging(Packaging::Pom),
            )
            .unwrap();

        assert!(path.unwrap().ends_with("platform-1.0.pom"));
    }
}
