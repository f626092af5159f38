//! Resolution error types.
//!
//! Absence of an artifact is not an error: it surfaces as a missing entry in
//! the resolution result and siblings keep resolving. These variants cover
//! the structural failures that abort a whole call.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::DescriptorError;

/// Error during dependency resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A located artifact's descriptor could not be read or parsed.
    #[error("failed to load descriptor {}", .path.display())]
    Descriptor {
        path: PathBuf,
        #[source]
        source: DescriptorError,
    },

    /// No cache repository root could be determined.
    #[error("no cache repository root: configure one or ensure a home directory exists")]
    NoCacheRoot,

    /// Filesystem failure while probing repositories.
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}
