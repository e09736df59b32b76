//! Per-runtime component status aggregation
//!
//! One aggregator exists per tracked installation. It holds the latest
//! known status of every declared component, consumes the engine's
//! progress events in delivery order, and answers the classification
//! questions polling needs: finished, fatally failed, or failed in a way
//! the caller can retry.

use caravel_errors::{ConfigError, DeployError, Result};
use caravel_events::{ProcessEventKind, ProcessUpdate};
use caravel_types::ComponentConfig;
use tracing::warn;

/// Phase of one component within the current run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentPhase {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for ComponentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Running => f.write_str("running"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Latest known status of one declared component
#[derive(Debug, Clone)]
pub struct ComponentStatus {
    pub name: String,
    pub phase: ComponentPhase,
    pub last_error: Option<String>,
}

/// Aggregated status of all components of one installation.
///
/// Every component declared at trigger time has exactly one entry; entries
/// are only updated afterwards, never added or removed.
#[derive(Debug)]
pub struct ComponentsStatus {
    components: Vec<ComponentStatus>,
    fatal: Option<DeployError>,
}

impl ComponentsStatus {
    /// Create entries for all declared components, in the `NotStarted`
    /// phase.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyComponentList` if no components are
    /// declared.
    pub fn new(declared: &[ComponentConfig]) -> Result<Self> {
        if declared.is_empty() {
            return Err(ConfigError::EmptyComponentList.into());
        }

        let components = declared
            .iter()
            .map(|config| ComponentStatus {
                name: config.component.clone(),
                phase: ComponentPhase::NotStarted,
                last_error: None,
            })
            .collect();

        Ok(Self {
            components,
            fatal: None,
        })
    }

    /// Apply one progress event.
    ///
    /// Events are applied in delivery order. Unknown kinds and events
    /// naming undeclared components are logged and ignored; an
    /// installation never fails because of an unrecognized signal.
    pub fn consume(&mut self, update: &ProcessUpdate) {
        match &update.kind {
            ProcessEventKind::Start | ProcessEventKind::Running => {
                if let Some(component) = self.component_mut(update) {
                    component.phase = ComponentPhase::Running;
                }
            }
            ProcessEventKind::Finished => {
                if let Some(component) = self.component_mut(update) {
                    component.phase = ComponentPhase::Succeeded;
                    component.last_error = None;
                }
            }
            ProcessEventKind::ExecutionFailure => {
                let error = update.error.clone();
                if let Some(component) = self.component_mut(update) {
                    component.phase = ComponentPhase::Failed;
                    component.last_error =
                        Some(error.unwrap_or_else(|| "component installation failed".to_string()));
                }
            }
            ProcessEventKind::ForceQuitFailure | ProcessEventKind::TimeoutFailure => {
                // First fatal cause wins; later ones add nothing
                if self.fatal.is_none() {
                    let message = update
                        .error
                        .clone()
                        .unwrap_or_else(|| update.kind.to_string());
                    self.fatal = Some(DeployError::fatal(message));
                }
            }
            ProcessEventKind::Unknown(kind) => {
                warn!(kind = %kind, "unknown deployment event, ignoring");
            }
        }
    }

    /// True iff every declared component succeeded and no fatal error was
    /// recorded. A process-level failure dominates partial component
    /// state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.fatal.is_none()
            && self
                .components
                .iter()
                .all(|component| component.phase == ComponentPhase::Succeeded)
    }

    /// The recorded process-level failure, if any. Takes precedence over
    /// individual component phases.
    #[must_use]
    pub fn installation_error(&self) -> Option<&DeployError> {
        self.fatal.as_ref()
    }

    /// The first component-level failure when no fatal error was
    /// recorded. The run overall may still be retried.
    #[must_use]
    pub fn component_error(&self) -> Option<DeployError> {
        if self.fatal.is_some() {
            return None;
        }
        self.components
            .iter()
            .find(|component| component.phase == ComponentPhase::Failed)
            .map(|component| {
                DeployError::component_failed(
                    component.name.clone(),
                    component
                        .last_error
                        .clone()
                        .unwrap_or_else(|| "component installation failed".to_string()),
                )
            })
    }

    /// Short human-readable synopsis used for progress reporting.
    #[must_use]
    pub fn description(&self) -> String {
        let total = self.components.len();
        let mut succeeded = 0;
        let mut running = 0;
        let mut failed = 0;
        let mut pending = 0;
        for component in &self.components {
            match component.phase {
                ComponentPhase::NotStarted => pending += 1,
                ComponentPhase::Running => running += 1,
                ComponentPhase::Succeeded => succeeded += 1,
                ComponentPhase::Failed => failed += 1,
            }
        }
        format!(
            "{succeeded} of {total} components installed ({running} installing, {failed} failed, {pending} pending)"
        )
    }

    /// Latest known status of every declared component, in declaration
    /// order.
    #[must_use]
    pub fn components(&self) -> &[ComponentStatus] {
        &self.components
    }

    fn component_mut(&mut self, update: &ProcessUpdate) -> Option<&mut ComponentStatus> {
        let Some(snapshot) = &update.component else {
            warn!(kind = %update.kind, "component event without a component, ignoring");
            return None;
        };
        let entry = self
            .components
            .iter_mut()
            .find(|component| component.name == snapshot.name);
        if entry.is_none() {
            warn!(component = %snapshot.name, "event for undeclared component, ignoring");
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_events::DeployPhase;

    fn declared(names: &[&str]) -> Vec<ComponentConfig> {
        names
            .iter()
            .map(|name| ComponentConfig::new(*name, "platform-system"))
            .collect()
    }

    #[test]
    fn empty_component_list_is_rejected() {
        let err = ComponentsStatus::new(&[]).unwrap_err();
        assert!(matches!(
            err,
            caravel_errors::Error::Config(ConfigError::EmptyComponentList)
        ));
    }

    #[test]
    fn fresh_status_is_neither_finished_nor_failed() {
        let status = ComponentsStatus::new(&declared(&["istio", "core"])).unwrap();
        assert!(!status.is_finished());
        assert!(status.installation_error().is_none());
        assert!(status.component_error().is_none());
        assert_eq!(
            status.description(),
            "0 of 2 components installed (0 installing, 0 failed, 2 pending)"
        );
    }

    #[test]
    fn component_failure_then_success_converges_to_finished() {
        let mut status = ComponentsStatus::new(&declared(&["istio", "core"])).unwrap();

        status.consume(&ProcessUpdate::started(DeployPhase::Components, "istio"));
        status.consume(&ProcessUpdate::finished(DeployPhase::Components, "istio"));
        status.consume(&ProcessUpdate::started(DeployPhase::Components, "core"));
        status.consume(&ProcessUpdate::component_failed(
            DeployPhase::Components,
            "core",
            "helm release stuck",
        ));

        let err = status.component_error().expect("component error");
        assert!(matches!(
            err,
            DeployError::ComponentFailed { ref component, .. } if component == "core"
        ));
        assert!(!status.is_finished());

        status.consume(&ProcessUpdate::finished(DeployPhase::Components, "core"));

        assert!(status.is_finished());
        assert!(status.component_error().is_none());
        assert_eq!(
            status.description(),
            "2 of 2 components installed (0 installing, 0 failed, 0 pending)"
        );
    }

    #[test]
    fn fatal_error_dominates_component_state() {
        let mut status = ComponentsStatus::new(&declared(&["istio"])).unwrap();

        status.consume(&ProcessUpdate::finished(DeployPhase::Components, "istio"));
        status.consume(&ProcessUpdate::timed_out(
            DeployPhase::Components,
            "deployment exceeded timeout",
        ));

        assert!(!status.is_finished());
        let err = status.installation_error().expect("fatal error");
        assert!(matches!(err, DeployError::Fatal { .. }));
        assert!(status.component_error().is_none());
    }

    #[test]
    fn first_fatal_cause_is_kept() {
        let mut status = ComponentsStatus::new(&declared(&["istio"])).unwrap();

        status.consume(&ProcessUpdate::timed_out(
            DeployPhase::Components,
            "deployment exceeded timeout",
        ));
        status.consume(&ProcessUpdate::force_quit(
            DeployPhase::Components,
            "operator killed the run",
        ));

        let err = status.installation_error().expect("fatal error");
        assert_eq!(
            err.to_string(),
            "installation failed: deployment exceeded timeout"
        );
    }

    #[test]
    fn unknown_events_are_ignored() {
        let mut status = ComponentsStatus::new(&declared(&["istio"])).unwrap();

        status.consume(&ProcessUpdate {
            phase: DeployPhase::Components,
            kind: ProcessEventKind::Unknown("telemetry_tick".into()),
            component: None,
            error: None,
        });

        assert!(!status.is_finished());
        assert!(status.installation_error().is_none());
        assert!(status.component_error().is_none());
    }

    #[test]
    fn events_for_undeclared_components_are_ignored() {
        let mut status = ComponentsStatus::new(&declared(&["istio"])).unwrap();

        status.consume(&ProcessUpdate::finished(DeployPhase::Components, "tracing"));

        assert!(!status.is_finished());
        assert_eq!(status.components().len(), 1);
        assert_eq!(status.components()[0].phase, ComponentPhase::NotStarted);
    }
}
