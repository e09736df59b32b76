//! Fire-and-forget deployment launcher
//!
//! A deployment runs on its own task while the trigger call returns
//! immediately. Completion travels over a one-shot signal consumed only by
//! the logging layer; caller-visible state flows exclusively through the
//! progress events into the status aggregator.

use caravel_errors::{Error, Result};
use caravel_types::RuntimeId;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::DeploymentEngine;

/// One-shot completion signal of a launched deployment
pub struct CompletionSignal {
    rx: oneshot::Receiver<Result<()>>,
}

impl CompletionSignal {
    /// Wait for the deployment task to finish.
    ///
    /// # Errors
    ///
    /// Returns the engine's failure, or an internal error if the task was
    /// dropped before signalling completion.
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => Err(Error::internal("deployment task dropped before completion")),
        }
    }
}

/// Run the engine on an independent task and return its completion signal.
#[must_use]
pub fn spawn_deployment(engine: Box<dyn DeploymentEngine>) -> CompletionSignal {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = engine.start().await;
        let _ = tx.send(outcome);
    });
    CompletionSignal { rx }
}

/// Launch the engine and log its terminal outcome.
///
/// Exactly one of the two terminal lines is written per run. The terminal
/// outcome may race with, or be starved by, the stream of smaller progress
/// events; polling must never rely on it.
pub fn launch_logged(runtime_id: &RuntimeId, engine: Box<dyn DeploymentEngine>) {
    let signal = spawn_deployment(engine);
    let runtime = runtime_id.clone();
    tokio::spawn(async move {
        match signal.wait().await {
            Ok(()) => info!(runtime = %runtime, "deployment completed successfully"),
            Err(error) => error!(runtime = %runtime, %error, "deployment failed"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_errors::DeployError;
    use futures::future::BoxFuture;

    struct StubEngine {
        outcome: Result<()>,
    }

    impl DeploymentEngine for StubEngine {
        fn start(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
            Box::pin(async move { self.outcome })
        }
    }

    #[tokio::test]
    async fn completion_signal_reports_success() {
        let signal = spawn_deployment(Box::new(StubEngine { outcome: Ok(()) }));
        assert!(signal.wait().await.is_ok());
    }

    #[tokio::test]
    async fn completion_signal_reports_failure() {
        let signal = spawn_deployment(Box::new(StubEngine {
            outcome: Err(DeployError::fatal("engine aborted").into()),
        }));
        assert!(signal.wait().await.is_err());
    }

    #[tokio::test]
    async fn launch_logged_runs_detached() {
        launch_logged(&RuntimeId::new("rt-1"), Box::new(StubEngine { outcome: Ok(()) }));
        // The logging task owns the signal; nothing for the caller to wait on.
        tokio::task::yield_now().await;
    }
}
