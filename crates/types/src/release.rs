//! Release descriptor for an installation

use semver::Version;
use serde::{Deserialize, Serialize};

/// Identifies the component release to install on a runtime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub version: Version,
    /// Optional location of the release resources when they are not
    /// resolved from the default artifact store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_url: Option<String>,
}

impl Release {
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self {
            version,
            resources_url: None,
        }
    }

    #[must_use]
    pub fn with_resources_url(mut self, url: impl Into<String>) -> Self {
        self.resources_url = Some(url.into());
        self
    }
}

impl std::fmt::Display for Release {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)
    }
}
