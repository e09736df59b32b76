//! Structured progress events reported by the deployment engine

use serde::{Deserialize, Serialize};

/// Installation phase an update belongs to.
///
/// Prerequisites are applied before ordinary components; the engine reports
/// which group it is currently working through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeployPhase {
    Prerequisites,
    Components,
}

impl std::fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Prerequisites => f.write_str("prerequisites"),
            Self::Components => f.write_str("components"),
        }
    }
}

/// Kind of a progress event.
///
/// `ExecutionFailure` is a component-level failure the caller may retry;
/// `ForceQuitFailure` and `TimeoutFailure` are process-level and fatal.
/// `Unknown` carries any kind this version does not recognize. Such
/// events are logged and otherwise ignored; an installation never fails
/// because of an unrecognized signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessEventKind {
    /// A component's installation started
    Start,
    /// A component's installation is still being applied
    Running,
    /// A component finished successfully
    Finished,
    /// A component failed; the run may be retried
    ExecutionFailure,
    /// The whole run was force-quit
    ForceQuitFailure,
    /// The whole run exceeded its timeout
    TimeoutFailure,
    /// Unrecognized kind, kept for forward compatibility
    Unknown(String),
}

impl ProcessEventKind {
    /// Whether this kind reports a process-level, non-retriable failure
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ForceQuitFailure | Self::TimeoutFailure)
    }

    /// Whether this kind reports a single component's recoverable failure
    #[must_use]
    pub fn is_component_failure(&self) -> bool {
        matches!(self, Self::ExecutionFailure)
    }
}

impl std::fmt::Display for ProcessEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Running => f.write_str("running"),
            Self::Finished => f.write_str("finished"),
            Self::ExecutionFailure => f.write_str("execution failure"),
            Self::ForceQuitFailure => f.write_str("force-quit failure"),
            Self::TimeoutFailure => f.write_str("timeout failure"),
            Self::Unknown(kind) => write!(f, "unknown({kind})"),
        }
    }
}

/// Status of one component as reported by the engine alongside an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub name: String,
    /// Engine-reported status string, used for progress logging only
    pub status: String,
}

impl ComponentSnapshot {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// One structured progress event from the deployment engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessUpdate {
    pub phase: DeployPhase,
    pub kind: ProcessEventKind,
    /// The component this update concerns, when it concerns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentSnapshot>,
    /// Error detail carried by failure events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessUpdate {
    /// A component's installation started
    pub fn started(phase: DeployPhase, component: impl Into<String>) -> Self {
        Self {
            phase,
            kind: ProcessEventKind::Start,
            component: Some(ComponentSnapshot::new(component, "Installing")),
            error: None,
        }
    }

    /// A component is still being applied, with an engine status string
    pub fn running(
        phase: DeployPhase,
        component: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            kind: ProcessEventKind::Running,
            component: Some(ComponentSnapshot::new(component, status)),
            error: None,
        }
    }

    /// A component finished successfully
    pub fn finished(phase: DeployPhase, component: impl Into<String>) -> Self {
        Self {
            phase,
            kind: ProcessEventKind::Finished,
            component: Some(ComponentSnapshot::new(component, "Installed")),
            error: None,
        }
    }

    /// A component failed; the run overall may be retried
    pub fn component_failed(
        phase: DeployPhase,
        component: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            kind: ProcessEventKind::ExecutionFailure,
            component: Some(ComponentSnapshot::new(component, "Error")),
            error: Some(error.into()),
        }
    }

    /// The whole run was force-quit
    pub fn force_quit(phase: DeployPhase, error: impl Into<String>) -> Self {
        Self {
            phase,
            kind: ProcessEventKind::ForceQuitFailure,
            component: None,
            error: Some(error.into()),
        }
    }

    /// The whole run exceeded its timeout
    pub fn timed_out(phase: DeployPhase, error: impl Into<String>) -> Self {
        Self {
            phase,
            kind: ProcessEventKind::TimeoutFailure,
            component: None,
            error: Some(error.into()),
        }
    }
}
