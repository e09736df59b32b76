//! Deployment runtime error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum DeployError {
    /// The whole deployment run aborted, was force-quit or timed out.
    /// Not attributable to a single component and not retriable without a
    /// fresh trigger.
    #[error("installation failed: {message}")]
    Fatal { message: String },

    /// A single component failed while the run overall may still be
    /// retried.
    #[error("component {component} installation failed: {message}")]
    ComponentFailed { component: String, message: String },

    #[error("deployment engine failed to start: {message}")]
    EngineFailed { message: String },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
}

impl DeployError {
    /// Fatal process-level failure with a message.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    /// Recoverable failure of one named component.
    pub fn component_failed(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComponentFailed {
            component: component.into(),
            message: message.into(),
        }
    }
}

impl UserFacingError for DeployError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Fatal { .. } => Some("Trigger the installation again from scratch."),
            Self::ComponentFailed { .. } => {
                Some("The installation may be retried; keep polling or re-trigger.")
            }
            Self::EngineFailed { .. } => None,
            Self::NotSupported { .. } => Some("This lifecycle operation is not available."),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::ComponentFailed { .. })
    }
}
