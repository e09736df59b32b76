//! Caller-visible installation state

use serde::{Deserialize, Serialize};

/// Coarse state of one runtime's installation as seen by a polling caller.
///
/// Computed fresh on every poll from the status aggregator; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InstallationState {
    /// No installation is tracked for the runtime
    NoInstallation,
    /// The deployment is still running
    InProgress { description: String },
    /// Every component succeeded
    Installed { description: String },
    /// The installation failed; `recoverable` distinguishes a single
    /// component's failure (retry may succeed) from a process-level abort
    /// (re-trigger from scratch)
    Error {
        description: String,
        recoverable: bool,
    },
}

impl InstallationState {
    /// Whether observing this state purged the tracked entry
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Installed { .. } | Self::Error { recoverable: false, .. }
        )
    }

    /// Whether this is an error the caller is expected to retry
    #[must_use]
    pub fn is_recoverable_error(&self) -> bool {
        matches!(self, Self::Error { recoverable: true, .. })
    }
}

impl std::fmt::Display for InstallationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoInstallation => f.write_str("no installation"),
            Self::InProgress { description } => write!(f, "in progress: {description}"),
            Self::Installed { description } => write!(f, "installed: {description}"),
            Self::Error {
                description,
                recoverable,
            } => {
                let class = if *recoverable { "recoverable" } else { "fatal" };
                write!(f, "{class} error: {description}")
            }
        }
    }
}
