#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the caravel installation orchestrator
//!
//! This crate provides the vocabulary shared across the system: runtime
//! identifiers, deployment profiles, release descriptors, configuration
//! bags, and the component declarations an installation is made of.

pub mod component;
pub mod config;
pub mod release;

// Re-export commonly used types
pub use component::{ComponentConfig, ComponentDefinition, ComponentList};
pub use config::{ConfigEntry, Configuration};
pub use release::Release;
pub use semver::Version;
pub use uuid::Uuid;

use serde::{Deserialize, Serialize};

/// Opaque identifier of one deployment target (a runtime cluster).
///
/// Unique per tracked installation; used as the tracker's map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeId(String);

impl RuntimeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RuntimeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuntimeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RuntimeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Named deployment profile selecting a resource preset for the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployProfile {
    Evaluation,
    Production,
}

impl std::fmt::Display for DeployProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Evaluation => f.write_str("evaluation"),
            Self::Production => f.write_str("production"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_id_round_trips_as_plain_string() {
        let id = RuntimeId::new("rt-7f3a");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""rt-7f3a""#);
        assert_eq!(id.to_string(), "rt-7f3a");
    }

    #[test]
    fn profile_serializes_lowercase() {
        let json = serde_json::to_string(&DeployProfile::Production).unwrap();
        assert_eq!(json, r#""production""#);
    }
}
