#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the caravel installation orchestrator
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone for easier handling across task
//! boundaries.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod deploy;
pub mod resolve;

// Re-export all error types at the root
pub use config::ConfigError;
pub use deploy::DeployError;
pub use resolve::ResolveError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("resource resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("deployment error: {0}")]
    Deploy(#[from] DeployError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias for caravel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for status output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Resolve(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Deploy(err) => err.user_message(),
            Error::Internal(_) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Resolve(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Deploy(err) => err.user_hint(),
            Error::Internal(_) => None,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Error::Deploy(err) => err.is_retryable(),
            _ => false,
        }
    }
}
