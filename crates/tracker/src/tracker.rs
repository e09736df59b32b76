//! The installation tracker
//!
//! Sole owner of all status aggregators. Callers interact through two
//! intent-revealing operations: `trigger` starts a deployment in the
//! background, `check_state` reads the aggregated status. The raw map is
//! never exposed, so callers cannot bypass the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use caravel_engine::{
    build_overrides, launch_logged, EngineBuilder, EngineConfig, KubeconfigSource, ResourceLocator,
};
use caravel_errors::{DeployError, Result};
use caravel_events::{EventReceiver, ProcessEventKind, ProcessUpdate};
use caravel_types::{ComponentConfig, ComponentList, Configuration, DeployProfile, Release, RuntimeId};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::state::InstallationState;
use crate::status::ComponentsStatus;

/// Inputs of one trigger call
#[derive(Debug, Clone)]
pub struct TriggerContext {
    pub runtime_id: RuntimeId,
    pub kubeconfig: KubeconfigSource,
    pub profile: DeployProfile,
    pub release: Release,
    pub global_configuration: Configuration,
    pub components: Vec<ComponentConfig>,
}

impl TriggerContext {
    pub fn new(runtime_id: impl Into<RuntimeId>, kubeconfig: KubeconfigSource, release: Release) -> Self {
        Self {
            runtime_id: runtime_id.into(),
            kubeconfig,
            profile: DeployProfile::Evaluation,
            release,
            global_configuration: Configuration::default(),
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_profile(mut self, profile: DeployProfile) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn with_global_configuration(mut self, configuration: Configuration) -> Self {
        self.global_configuration = configuration;
        self
    }

    /// Declare a component for the installation
    #[must_use]
    pub fn add_component(mut self, component: ComponentConfig) -> Self {
        self.components.push(component);
        self
    }
}

/// One tracked installation: the aggregator plus the generation token of
/// the trigger that created it. Stale events from an orphaned run carry a
/// different token and are dropped.
struct TrackedInstallation {
    deployment: Uuid,
    status: ComponentsStatus,
}

type InstallationMap = HashMap<RuntimeId, TrackedInstallation>;

/// Tracks the installation status of every runtime with an active
/// deployment.
///
/// `trigger` returns as soon as the background deployment is launched;
/// `check_state` is a pure read of cached state, bounded by lock
/// contention only. A terminal state (installed, or fatally failed) is
/// purged on the first poll that observes it.
#[derive(Clone)]
pub struct InstallationTracker {
    locator: Arc<dyn ResourceLocator>,
    engines: Arc<dyn EngineBuilder>,
    cancel_timeout: Duration,
    installations: Arc<Mutex<InstallationMap>>,
}

impl std::fmt::Debug for InstallationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationTracker")
            .field("cancel_timeout", &self.cancel_timeout)
            .finish_non_exhaustive()
    }
}

impl InstallationTracker {
    /// Create a tracker over the given resource locator and engine
    /// factory. `cancel_timeout` bounds cooperative cancellation of each
    /// deployment run; forced termination follows after a fixed margin.
    #[must_use]
    pub fn new(
        locator: Arc<dyn ResourceLocator>,
        engines: Arc<dyn EngineBuilder>,
        cancel_timeout: Duration,
    ) -> Self {
        Self {
            locator,
            engines,
            cancel_timeout,
            installations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Start an installation for a runtime and return immediately.
    ///
    /// Resolves resources, assembles overrides and the engine
    /// configuration, registers a fresh status aggregator under the
    /// runtime key, and launches the deployment in the background. Any
    /// prior entry for the runtime is overwritten; a re-trigger discards
    /// previous status.
    /// Failures after the background task starts are only observable via
    /// [`check_state`](Self::check_state).
    ///
    /// # Errors
    ///
    /// Returns a `ResolveError` if release resources cannot be located, a
    /// `ConfigError` if override assembly fails or no components are
    /// declared, or the engine factory's error if the engine cannot be
    /// built.
    pub fn trigger(&self, context: TriggerContext) -> Result<()> {
        info!(
            runtime = %context.runtime_id,
            version = %context.release.version,
            profile = %context.profile,
            "installation triggered"
        );

        let paths = self
            .locator
            .resolve(&context.release.version, &context.components)?;

        let overrides = build_overrides(&context.components, &context.global_configuration)?;

        let status = ComponentsStatus::new(&context.components)?;

        let config = EngineConfig::for_installation(
            context.profile,
            context.release.version.clone(),
            ComponentList::from_configs(&context.components),
            paths.resource_path,
            paths.installation_resource_path,
            context.kubeconfig.clone(),
            self.cancel_timeout,
        );

        let (events_tx, events_rx) = caravel_events::channel();
        let engine = self
            .engines
            .build(&context.runtime_id, config, overrides, events_tx)?;

        let deployment = Uuid::new_v4();
        {
            let mut map = lock(&self.installations);
            map.insert(
                context.runtime_id.clone(),
                TrackedInstallation { deployment, status },
            );
        }

        self.spawn_dispatch(context.runtime_id.clone(), deployment, events_rx);

        info!(runtime = %context.runtime_id, "starting deployment process");
        launch_logged(&context.runtime_id, engine);

        Ok(())
    }

    /// Poll the installation state of a runtime.
    ///
    /// Never blocks on the engine. Observing a terminal state (installed,
    /// or fatally failed) deletes the tracked entry, so the next poll
    /// returns `NoInstallation`. A recoverable component failure keeps the
    /// entry in place so later events and polls keep converging.
    #[must_use]
    pub fn check_state(&self, runtime_id: &RuntimeId) -> InstallationState {
        let mut map = lock(&self.installations);

        let Some(tracked) = map.get(runtime_id) else {
            return InstallationState::NoInstallation;
        };

        if tracked.status.is_finished() {
            let description = tracked.status.description();
            map.remove(runtime_id);
            info!(runtime = %runtime_id, "installation completed successfully");
            return InstallationState::Installed { description };
        }

        if let Some(fatal) = tracked.status.installation_error() {
            let description = fatal.to_string();
            map.remove(runtime_id);
            info!(runtime = %runtime_id, error = %description, "installation failed");
            return InstallationState::Error {
                description,
                recoverable: false,
            };
        }

        if let Some(failure) = tracked.status.component_error() {
            let description = failure.to_string();
            error!(runtime = %runtime_id, error = %description, "component installation failed");
            return InstallationState::Error {
                description,
                recoverable: true,
            };
        }

        InstallationState::InProgress {
            description: tracked.status.description(),
        }
    }

    /// Upgrade an existing installation. Declared for the service
    /// contract; not available in this slice.
    ///
    /// # Errors
    ///
    /// Always returns `DeployError::NotSupported`.
    pub fn trigger_upgrade(&self, _context: TriggerContext) -> Result<()> {
        Err(DeployError::NotSupported {
            operation: "upgrade".to_string(),
        }
        .into())
    }

    /// Remove an installation from a runtime. Declared for the service
    /// contract; not available in this slice.
    ///
    /// # Errors
    ///
    /// Always returns `DeployError::NotSupported`.
    pub fn trigger_uninstall(&self, _runtime_id: &RuntimeId) -> Result<()> {
        Err(DeployError::NotSupported {
            operation: "uninstall".to_string(),
        }
        .into())
    }

    /// Clean up leftover installation resources on a runtime. Declared
    /// for the service contract; not available in this slice.
    ///
    /// # Errors
    ///
    /// Always returns `DeployError::NotSupported`.
    pub fn perform_cleanup(&self, _runtime_id: &RuntimeId) -> Result<()> {
        Err(DeployError::NotSupported {
            operation: "cleanup".to_string(),
        }
        .into())
    }

    /// Drain the engine's progress events into the tracked aggregator.
    ///
    /// The task applies an event only while the tracked entry still
    /// carries the deployment token it was spawned for; otherwise the
    /// entry was purged or replaced by a re-trigger and the event is
    /// dropped.
    fn spawn_dispatch(&self, runtime_id: RuntimeId, deployment: Uuid, mut events: EventReceiver) {
        let installations = Arc::clone(&self.installations);
        tokio::spawn(async move {
            while let Some(update) = events.recv().await {
                match &update.kind {
                    ProcessEventKind::Start => {
                        info!(runtime = %runtime_id, phase = %update.phase, "starting installation step");
                        log_component(&runtime_id, &update);
                    }
                    ProcessEventKind::Running | ProcessEventKind::Finished => {
                        log_component(&runtime_id, &update);
                    }
                    ProcessEventKind::ExecutionFailure
                    | ProcessEventKind::ForceQuitFailure
                    | ProcessEventKind::TimeoutFailure => {
                        error!(
                            runtime = %runtime_id,
                            kind = %update.kind,
                            error = ?update.error,
                            "installation failure reported"
                        );
                    }
                    ProcessEventKind::Unknown(kind) => {
                        info!(
                            runtime = %runtime_id,
                            kind = %kind,
                            "unknown event, the installation will continue"
                        );
                        continue;
                    }
                }

                let mut map = lock(&installations);
                match map.get_mut(&runtime_id) {
                    Some(tracked) if tracked.deployment == deployment => {
                        tracked.status.consume(&update);
                    }
                    _ => {
                        warn!(
                            runtime = %runtime_id,
                            "status tracking for runtime is gone, dropping event"
                        );
                    }
                }
            }
        });
    }
}

fn log_component(runtime_id: &RuntimeId, update: &ProcessUpdate) {
    if let Some(component) = &update.component {
        if !component.name.is_empty() {
            info!(
                runtime = %runtime_id,
                component = %component.name,
                status = %component.status,
                "component status"
            );
        }
    }
}

fn lock(map: &Mutex<InstallationMap>) -> MutexGuard<'_, InstallationMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}
