#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deployment engine contracts and the asynchronous launcher
//!
//! The engine that renders and applies component manifests is an external
//! collaborator. This crate defines the narrow contracts caravel consumes
//! it through (start the deployment, resolve release resources), plus the
//! deterministic engine configuration and the fire-and-forget launcher.

mod config;
pub mod launcher;
pub mod overrides;
mod resolver;

pub use config::{EngineConfig, KubeconfigSource, DEFAULT_WORKERS_COUNT};
pub use launcher::{launch_logged, spawn_deployment, CompletionSignal};
pub use overrides::{build_overrides, Overrides, OverridesBuilder};
pub use resolver::{ResourceLocator, ResourcePaths};

use caravel_errors::Result;
use caravel_events::EventSender;
use caravel_types::RuntimeId;
use futures::future::BoxFuture;

/// A constructed deployment engine, ready to run once.
///
/// `start` drives the whole deployment to completion, reporting progress
/// through the [`EventSender`] the engine was built with, and returns the
/// overall outcome. Consuming `self` makes the single-run contract
/// explicit.
pub trait DeploymentEngine: Send + 'static {
    fn start(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

/// Factory for deployment engines; the tracker's injection seam.
pub trait EngineBuilder: Send + Sync {
    /// Build an engine for one deployment run.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be constructed from the given
    /// configuration.
    fn build(
        &self,
        runtime_id: &RuntimeId,
        config: EngineConfig,
        overrides: Overrides,
        events: EventSender,
    ) -> Result<Box<dyn DeploymentEngine>>;
}
