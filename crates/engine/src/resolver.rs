//! Resource location contract

use std::path::PathBuf;

use caravel_errors::Result;
use caravel_types::{ComponentConfig, Version};

/// Filesystem locations of the release resources for one installation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    /// Component charts and manifests
    pub resource_path: PathBuf,
    /// Installation-level resources (cluster-wide objects, CRDs)
    pub installation_resource_path: PathBuf,
}

/// Locates release resources for a version and a set of declared
/// components. Consumed as an opaque collaborator; failures surface as
/// [`caravel_errors::ResolveError`] synchronously from the trigger call.
pub trait ResourceLocator: Send + Sync {
    /// Resolve the resource locations for this installation.
    ///
    /// # Errors
    ///
    /// Returns an error if the release resources or any declared
    /// component's resources cannot be located.
    fn resolve(&self, version: &Version, components: &[ComponentConfig]) -> Result<ResourcePaths>;
}
