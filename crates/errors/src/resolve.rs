//! Resource resolution error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ResolveError {
    #[error("resources for version {version} not found")]
    NotFound { version: String },

    #[error("component {component} has no resources")]
    MissingComponent { component: String },

    #[error("failed to fetch resources: {message}")]
    FetchFailed { message: String },
}

impl UserFacingError for ResolveError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Check that the release version points at published resources.")
            }
            Self::MissingComponent { .. } => {
                Some("Remove the component from the installation or publish its resources.")
            }
            Self::FetchFailed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        false
    }
}
