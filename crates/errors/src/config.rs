//! Configuration and override assembly error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ConfigError {
    #[error("override conflict at {key}")]
    OverrideConflict { key: String },

    #[error("invalid override {key}: {message}")]
    InvalidOverride { key: String, message: String },

    #[error("no components declared for installation")]
    EmptyComponentList,

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::OverrideConflict { .. } => {
                Some("Two override entries write the same key with incompatible shapes.")
            }
            Self::InvalidOverride { .. } | Self::InvalidValue { .. } => {
                Some("Fix the configuration value and trigger the installation again.")
            }
            Self::EmptyComponentList => {
                Some("Declare at least one component for the installation.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }
}
