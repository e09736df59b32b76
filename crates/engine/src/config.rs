//! Deterministic engine configuration built from trigger inputs

use std::path::PathBuf;
use std::time::Duration;

use caravel_types::{ComponentList, DeployProfile, Version};

/// Fixed worker concurrency for component application
pub const DEFAULT_WORKERS_COUNT: usize = 4;

/// Safety margin between cooperative cancellation and forced termination
const QUIT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5 * 60);

const APPLY_TIMEOUT: Duration = Duration::from_secs(8 * 60);
const BACKOFF_INITIAL_INTERVAL: Duration = Duration::from_secs(3);
const BACKOFF_MAX_ELAPSED_TIME: Duration = Duration::from_secs(5 * 60);
const MAX_REVISION_HISTORY: u32 = 10;

/// Where the engine reads its kubeconfig from
#[derive(Clone)]
pub enum KubeconfigSource {
    /// Raw kubeconfig material passed inline
    Content(String),
    /// Path to a kubeconfig file on disk
    Path(PathBuf),
}

impl std::fmt::Debug for KubeconfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Inline kubeconfig material carries cluster credentials
        match self {
            Self::Content(content) => f
                .debug_struct("KubeconfigSource::Content")
                .field("len", &content.len())
                .finish(),
            Self::Path(path) => f.debug_tuple("KubeconfigSource::Path").field(path).finish(),
        }
    }
}

/// Full configuration for one deployment run.
///
/// Built deterministically from the trigger inputs: concurrency and the
/// timeout policy are fixed, only the cancel timeout is injected.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub workers_count: usize,
    /// Timeout for cooperative cancellation of the run
    pub cancel_timeout: Duration,
    /// Timeout after which the run is force-quit
    pub quit_timeout: Duration,
    /// Per-component apply timeout
    pub apply_timeout: Duration,
    pub backoff_initial_interval: Duration,
    pub backoff_max_elapsed_time: Duration,
    pub max_revision_history: u32,
    pub profile: DeployProfile,
    pub components: ComponentList,
    pub resource_path: PathBuf,
    pub installation_resource_path: PathBuf,
    pub kubeconfig: KubeconfigSource,
    pub version: Version,
}

impl EngineConfig {
    /// Assemble the configuration for an installation run.
    ///
    /// `quit_timeout` is derived from `cancel_timeout` plus a fixed margin
    /// so a hung run is always force-quit after cancellation had its
    /// chance.
    #[must_use]
    pub fn for_installation(
        profile: DeployProfile,
        version: Version,
        components: ComponentList,
        resource_path: PathBuf,
        installation_resource_path: PathBuf,
        kubeconfig: KubeconfigSource,
        cancel_timeout: Duration,
    ) -> Self {
        Self {
            workers_count: DEFAULT_WORKERS_COUNT,
            cancel_timeout,
            quit_timeout: cancel_timeout + QUIT_TIMEOUT_MARGIN,
            apply_timeout: APPLY_TIMEOUT,
            backoff_initial_interval: BACKOFF_INITIAL_INTERVAL,
            backoff_max_elapsed_time: BACKOFF_MAX_ELAPSED_TIME,
            max_revision_history: MAX_REVISION_HISTORY,
            profile,
            components,
            resource_path,
            installation_resource_path,
            kubeconfig,
            version,
        }
    }
}
