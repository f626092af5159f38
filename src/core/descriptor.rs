//! Package descriptor (`*.pom`) parsing and caching.
//!
//! A descriptor lists a package's own coordinates, its dependencies, and its
//! dependency-management entries. The descriptor file sits next to the
//! resolved artifact, named after it with the packaging suffix swapped for
//! `.pom`.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use roxmltree::{Document, Node};
use thiserror::Error;

use crate::core::{Coordinate, DeclaredDependency, Packaging};

/// Suffix of an exploded archive directory.
const EXPLODED_SUFFIX: &str = ".exploded.aar";

/// Scopes that never join transitive expansion.
const SKIPPED_SCOPES: &[&str] = &["test", "provided", "system"];

/// Parse failure for a package descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("failed to read descriptor")]
    Read(#[from] std::io::Error),

    #[error("malformed descriptor XML")]
    Xml(#[from] roxmltree::Error),

    #[error("descriptor has no <project> root element")]
    MissingProject,

    #[error("descriptor is missing <{0}>")]
    MissingElement(&'static str),
}

/// A parsed package descriptor.
#[derive(Debug, Clone)]
pub struct Descriptor {
    artifact: DeclaredDependency,
    dependencies: Vec<DeclaredDependency>,
    dependency_management: Vec<DeclaredDependency>,
}

impl Descriptor {
    /// The descriptor's own declaration: its coordinates, version, and
    /// packaging.
    pub fn artifact(&self) -> &DeclaredDependency {
        &self.artifact
    }

    /// Declared dependencies, in declaration order. Entries scoped `test`,
    /// `provided`, or `system`, and entries marked optional, are already
    /// filtered out.
    pub fn dependencies(&self) -> &[DeclaredDependency] {
        &self.dependencies
    }

    /// Dependency-management entries, in declaration order. These only pin
    /// versions; they never introduce resolution targets on their own.
    pub fn dependency_management(&self) -> &[DeclaredDependency] {
        &self.dependency_management
    }

    /// Parse descriptor XML.
    pub fn parse(xml: &str) -> Result<Self, DescriptorError> {
        let document = Document::parse(xml)?;
        let project = document.root_element();
        if project.tag_name().name() != "project" {
            return Err(DescriptorError::MissingProject);
        }

        let parent = project
            .children()
            .find(|node| node.is_element() && node.tag_name().name() == "parent");

        let group_id = element_text(&project, "groupId")
            .or_else(|| parent.as_ref().and_then(|p| element_text(p, "groupId")))
            .ok_or(DescriptorError::MissingElement("groupId"))?;
        let artifact_id = element_text(&project, "artifactId")
            .ok_or(DescriptorError::MissingElement("artifactId"))?;
        let version = element_text(&project, "version")
            .or_else(|| parent.as_ref().and_then(|p| element_text(p, "version")))
            .ok_or(DescriptorError::MissingElement("version"))?;
        let packaging = element_text(&project, "packaging")
            .map(|value| Packaging::from_descriptor_type(&value))
            .unwrap_or_default();

        let artifact = DeclaredDependency::new(Coordinate::new(group_id, artifact_id), version)
            .with_packaging(packaging);

        let dependencies = parse_dependency_list(&project, true);
        let dependency_management = project
            .children()
            .find(|node| node.is_element() && node.tag_name().name() == "dependencyManagement")
            .map(|management| parse_dependency_list(&management, false))
            .unwrap_or_default();

        Ok(Descriptor {
            artifact,
            dependencies,
            dependency_management,
        })
    }

    /// Read and parse the descriptor at `path`.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

/// Parse the `<dependency>` entries under a node's `<dependencies>` child.
///
/// With `filter_scopes` set, entries that do not participate in transitive
/// expansion (test/provided/system scope, optional) are dropped; management
/// lists keep everything since they only pin versions.
fn parse_dependency_list(parent: &Node<'_, '_>, filter_scopes: bool) -> Vec<DeclaredDependency> {
    let Some(dependencies) = parent
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == "dependencies")
    else {
        return Vec::new();
    };

    dependencies
        .children()
        .filter(|node| node.is_element() && node.tag_name().name() == "dependency")
        .filter_map(|node| parse_dependency(&node, filter_scopes))
        .collect()
}

fn parse_dependency(node: &Node<'_, '_>, filter_scopes: bool) -> Option<DeclaredDependency> {
    let group_id = element_text(node, "groupId")?;
    let artifact_id = element_text(node, "artifactId")?;

    if filter_scopes {
        if let Some(scope) = element_text(node, "scope") {
            if SKIPPED_SCOPES.iter().any(|s| scope.eq_ignore_ascii_case(s)) {
                return None;
            }
        }
        if element_text(node, "optional").is_some_and(|v| v.eq_ignore_ascii_case("true")) {
            return None;
        }
    }

    // no version means dependency management is expected to pin one; an
    // empty query resolves as "latest" against what is locally available
    let version = element_text(node, "version").unwrap_or_default();
    let packaging = element_text(node, "type")
        .map(|value| Packaging::from_descriptor_type(&value))
        .unwrap_or_default();

    let exclusions: BTreeSet<Coordinate> = node
        .children()
        .find(|child| child.is_element() && child.tag_name().name() == "exclusions")
        .map(|exclusions| {
            exclusions
                .children()
                .filter(|child| child.is_element() && child.tag_name().name() == "exclusion")
                .filter_map(|exclusion| {
                    let group = element_text(&exclusion, "groupId")?;
                    let artifact = element_text(&exclusion, "artifactId")?;
                    Some(Coordinate::new(group, artifact))
                })
                .collect()
        })
        .unwrap_or_default();

    Some(
        DeclaredDependency::new(Coordinate::new(group_id, artifact_id), version)
            .with_packaging(packaging)
            .with_exclusions(exclusions),
    )
}

fn element_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
        .and_then(|child| child.text())
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Derive the descriptor path for a resolved artifact path: strip the
/// `.exploded.aar` suffix or the 4-character packaging extension, then
/// append `.pom`.
pub fn descriptor_path(artifact_path: &Path) -> PathBuf {
    let name = artifact_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem_len = if name.ends_with(EXPLODED_SUFFIX) {
        name.len() - EXPLODED_SUFFIX.len()
    } else {
        name.len().saturating_sub(4)
    };
    artifact_path.with_file_name(format!("{}.pom", &name[..stem_len]))
}

/// Reads the descriptor that belongs to a resolved artifact.
///
/// The descriptor format is a collaborator: the default implementation reads
/// POM XML from the filesystem, and embedders with a different ecosystem can
/// plug their own.
pub trait DescriptorReader {
    /// Read and parse the descriptor at `descriptor_path`.
    fn read(&self, descriptor_path: &Path) -> Result<Descriptor, DescriptorError>;
}

/// Default reader: POM XML straight from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct PomReader;

impl DescriptorReader for PomReader {
    fn read(&self, descriptor_path: &Path) -> Result<Descriptor, DescriptorError> {
        Descriptor::load(descriptor_path)
    }
}

/// Memoizing descriptor loader, keyed by artifact path.
///
/// Parsed descriptors live until [`DescriptorCache::clear`]; repeated
/// expansion of a popular artifact parses its descriptor once.
pub struct DescriptorCache {
    reader: Box<dyn DescriptorReader + Send + Sync>,
    parsed: HashMap<PathBuf, Arc<Descriptor>>,
}

impl DescriptorCache {
    /// Create a cache backed by the default POM reader.
    pub fn new() -> Self {
        Self::with_reader(Box::new(PomReader))
    }

    /// Create a cache backed by a custom reader.
    pub fn with_reader(reader: Box<dyn DescriptorReader + Send + Sync>) -> Self {
        DescriptorCache {
            reader,
            parsed: HashMap::new(),
        }
    }

    /// Load the descriptor for `artifact_path`, memoized.
    pub fn load(&mut self, artifact_path: &Path) -> Result<Arc<Descriptor>, DescriptorError> {
        if let Some(descriptor) = self.parsed.get(artifact_path) {
            return Ok(descriptor.clone());
        }
        let descriptor = Arc::new(self.reader.read(&descriptor_path(artifact_path))?);
        self.parsed
            .insert(artifact_path.to_path_buf(), descriptor.clone());
        Ok(descriptor)
    }

    /// Drop all memoized descriptors.
    pub fn clear(&mut self) {
        self.parsed.clear();
    }
}

impl Default for DescriptorCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <groupId>com.example</groupId>
  <artifactId>widgets</artifactId>
  <version>1.4.0</version>
  <packaging>aar</packaging>
  <dependencyManagement>
    <dependencies>
      <dependency>
        <groupId>org.base</groupId>
        <artifactId>core</artifactId>
        <version>2.1</version>
      </dependency>
    </dependencies>
  </dependencyManagement>
  <dependencies>
    <dependency>
      <groupId>org.base</groupId>
      <artifactId>core</artifactId>
      <version>2.0</version>
      <exclusions>
        <exclusion>
          <groupId>org.legacy</groupId>
          <artifactId>compat</artifactId>
        </exclusion>
      </exclusions>
    </dependency>
    <dependency>
      <groupId>org.junit</groupId>
      <artifactId>junit</artifactId>
      <version>4.13</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.extras</groupId>
      <artifactId>maybe</artifactId>
      <version>1.0</version>
      <optional>true</optional>
    </dependency>
    <dependency>
      <groupId>org.unpinned</groupId>
      <artifactId>floating</artifactId>
    </dependency>
  </dependencies>
</project>
"#;

    #[test]
    fn test_parse_project() {
        let descriptor = Descriptor::parse(SAMPLE).unwrap();
        let artifact = descriptor.artifact();

        assert_eq!(artifact.group_id(), "com.example");
        assert_eq!(artifact.artifact_id(), "widgets");
        assert_eq!(artifact.version(), "1.4.0");
        assert_eq!(artifact.packaging(), Packaging::Aar);
    }

    #[test]
    fn test_scope_and_optional_filtering() {
        let descriptor = Descriptor::parse(SAMPLE).unwrap();
        let names: Vec<&str> = descriptor
            .dependencies()
            .iter()
            .map(|dep| dep.artifact_id())
            .collect();

        assert_eq!(names, vec!["core", "floating"]);
    }

    #[test]
    fn test_exclusions_and_unpinned_version() {
        let descriptor = Descriptor::parse(SAMPLE).unwrap();

        let core = &descriptor.dependencies()[0];
        assert!(core.excludes(&Coordinate::new("org.legacy", "compat")));

        let floating = &descriptor.dependencies()[1];
        assert_eq!(floating.version(), "");
    }

    #[test]
    fn test_dependency_management() {
        let descriptor = Descriptor::parse(SAMPLE).unwrap();
        let management = descriptor.dependency_management();

        assert_eq!(management.len(), 1);
        assert_eq!(management[0].version(), "2.1");
    }

    #[test]
    fn test_parent_fallback() {
        let xml = r#"<project>
  <parent>
    <groupId>com.example</groupId>
    <artifactId>parent</artifactId>
    <version>3.0</version>
  </parent>
  <artifactId>child</artifactId>
</project>"#;

        let descriptor = Descriptor::parse(xml).unwrap();
        assert_eq!(descriptor.artifact().group_id(), "com.example");
        assert_eq!(descriptor.artifact().version(), "3.0");
    }

    #[test]
    fn test_malformed_xml() {
        assert!(matches!(
            Descriptor::parse("<project><broken"),
            Err(DescriptorError::Xml(_))
        ));
        assert!(matches!(
            Descriptor::parse("<notaproject/>"),
            Err(DescriptorError::MissingProject)
        ));
    }

    #[test]
    fn test_descriptor_path_derivation() {
        assert_eq!(
            descriptor_path(Path::new("/repo/lib-1.0.jar")),
            PathBuf::from("/repo/lib-1.0.pom")
        );
        assert_eq!(
            descriptor_path(Path::new("/repo/lib-1.0.exploded.aar")),
            PathBuf::from("/repo/lib-1.0.pom")
        );
        assert_eq!(
            descriptor_path(Path::new("/repo/lib-1.0.pom")),
            PathBuf::from("/repo/lib-1.0.pom")
        );
    }

    #[test]
    fn test_cache_memoizes() {
        struct StaticReader;

        impl DescriptorReader for StaticReader {
            fn read(&self, _: &Path) -> Result<Descriptor, DescriptorError> {
                Descriptor::parse(SAMPLE)
            }
        }

        let mut cache = DescriptorCache::with_reader(Box::new(StaticReader));

        let first = cache.load(Path::new("/repo/widgets-1.4.0.aar")).unwrap();
        let second = cache.load(Path::new("/repo/widgets-1.4.0.aar")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
