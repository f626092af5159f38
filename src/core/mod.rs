//! Core data structures for quay.
//!
//! This module contains the foundational types used throughout quay:
//! - Package identity (Coordinate, Packaging)
//! - Dependency declarations
//! - Package descriptors and their cache

pub mod coordinate;
pub mod dependency;
pub mod descriptor;

pub use coordinate::{Coordinate, Packaging};
pub use dependency::DeclaredDependency;
pub use descriptor::{
    descriptor_path, Descriptor, DescriptorCache, DescriptorError, DescriptorReader, PomReader,
};
