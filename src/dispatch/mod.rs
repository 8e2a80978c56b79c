//! Dispatch sinks and the effect runner.
//!
//! ```text
//! resolve() ──→ Dispatcher::spawn_commands ──→ tokio task per command
//!                                                   │
//!                     sink.dispatch(action) ◄───────┘
//! ```
//!
//! The sink is whatever the host uses to feed actions back into its
//! pipeline: usually the [`ActionSender`] half of [`channel`], drained by
//! [`Store::spawn_pump`](crate::store::Store::spawn_pump).

mod dispatcher;
mod error;
mod inflight;
mod registry;

use tokio::sync::mpsc;

pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{DispatchError, EffectError};
pub use inflight::{InflightGuard, InflightTracker};
pub use registry::EffectRegistry;

/// Capability to reinject an action into the pipeline.
///
/// Implementations must accept concurrent and re-entrant calls: several
/// effects may complete at once, on different worker threads.
pub trait Dispatch<A>: Send + Sync + 'static {
    fn dispatch(&self, action: A);
}

/// Adapts a closure into a [`Dispatch`] sink.
pub struct FnDispatch<F>(pub F);

impl<A, F> Dispatch<A> for FnDispatch<F>
where
    F: Fn(A) + Send + Sync + 'static,
{
    fn dispatch(&self, action: A) {
        (self.0)(action)
    }
}

/// Sending half of an action channel.
pub struct ActionSender<A> {
    sender: mpsc::UnboundedSender<A>,
}

impl<A> Clone for ActionSender<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A> ActionSender<A> {
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl<A: std::fmt::Debug + Send + 'static> Dispatch<A> for ActionSender<A> {
    fn dispatch(&self, action: A) {
        if let Err(err) = self.sender.send(action) {
            tracing::warn!(action = ?err.0, "Action dropped: pipeline receiver is gone");
        }
    }
}

/// Receiving half of an action channel, owned by the host pipeline.
pub struct ActionReceiver<A> {
    receiver: mpsc::UnboundedReceiver<A>,
}

impl<A> ActionReceiver<A> {
    /// Next action, or `None` once every sender has been dropped.
    pub async fn recv(&mut self) -> Option<A> {
        self.receiver.recv().await
    }

    /// Next action if one is already queued.
    pub fn try_recv(&mut self) -> Option<A> {
        self.receiver.try_recv().ok()
    }

    pub fn close(&mut self) {
        self.receiver.close();
    }
}

/// Unbounded action channel. Effects push into the sender, the host drains
/// the receiver.
pub fn channel<A>() -> (ActionSender<A>, ActionReceiver<A>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ActionSender { sender }, ActionReceiver { receiver })
}
