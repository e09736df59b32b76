#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Progress event contract between the deployment engine and the
//! installation tracker
//!
//! The engine reports progress as a stream of [`ProcessUpdate`] values over
//! a tokio channel. Events are tagged variants dispatched by exhaustive
//! `match`, so the state-transition logic stays testable in isolation from
//! the engine.

pub mod process;
pub use process::{ComponentSnapshot, DeployPhase, ProcessEventKind, ProcessUpdate};

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the engine-side event sender
pub type EventSender = UnboundedSender<ProcessUpdate>;

/// Type alias for the tracker-side event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<ProcessUpdate>;

/// Create a new progress event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Unified trait for emitting progress updates
///
/// Implemented by anything that holds an `EventSender`. Send errors are
/// ignored once the receiving side is gone; a deployment never fails
/// because nobody is listening to its progress.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an update through this emitter
    fn emit(&self, update: ProcessUpdate) {
        if let Some(sender) = self.event_sender() {
            let _ = sender.send(update);
        }
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
