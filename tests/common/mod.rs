//! Shared test utilities: recording sinks and timing helpers.

#![allow(dead_code, unused_imports)]

use cmdreduce::dispatch::{Dispatch, Dispatcher, EffectError};
use cmdreduce::store::Store;
use cmdreduce::Action;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(2);

/// Sink that records every dispatched action and forwards it to a channel
/// so tests can await deliveries.
#[derive(Clone)]
pub struct RecordingSink<A> {
    seen: Arc<Mutex<Vec<A>>>,
    notify: mpsc::UnboundedSender<A>,
}

impl<A: Clone> RecordingSink<A> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<A>) {
        let (notify, receiver) = mpsc::unbounded_channel();
        (
            Self {
                seen: Arc::new(Mutex::new(Vec::new())),
                notify,
            },
            receiver,
        )
    }

    pub fn seen(&self) -> Vec<A> {
        self.seen.lock().clone()
    }
}

impl<A: Clone + Send + 'static> Dispatch<A> for RecordingSink<A> {
    fn dispatch(&self, action: A) {
        self.seen.lock().push(action.clone());
        let _ = self.notify.send(action);
    }
}

/// Dispatcher over a recording sink, plus the delivery receiver.
pub fn recording_dispatcher<A: Action + Clone>() -> (
    Dispatcher<A>,
    RecordingSink<A>,
    mpsc::UnboundedReceiver<A>,
) {
    let (sink, deliveries) = RecordingSink::new();
    let dispatcher = Dispatcher::builder(sink.clone())
        .build()
        .expect("tokio runtime");
    (dispatcher, sink, deliveries)
}

/// Await the next delivered action, failing the test after [`WAIT`].
pub async fn next_delivery<A>(deliveries: &mut mpsc::UnboundedReceiver<A>) -> A {
    tokio::time::timeout(WAIT, deliveries.recv())
        .await
        .expect("timed out waiting for a dispatched action")
        .expect("delivery channel closed")
}

/// Await the next reported effect failure.
pub async fn next_failure(failures: &mut mpsc::UnboundedReceiver<EffectError>) -> EffectError {
    tokio::time::timeout(WAIT, failures.recv())
        .await
        .expect("timed out waiting for an effect failure")
        .expect("failure channel closed")
}

/// Wait until the dispatcher has no running effects.
pub async fn settle<A: Action>(dispatcher: &Dispatcher<A>) {
    tokio::time::timeout(WAIT, dispatcher.idle())
        .await
        .expect("effects did not settle");
}

/// Wait until `pred` holds for the store state.
pub async fn wait_for_state<S, A, F>(store: &Store<S, A>, pred: F) -> S
where
    S: Clone + Send + 'static,
    A: Action,
    F: Fn(&S) -> bool,
{
    let mut changes = store.subscribe();
    let wait = async {
        loop {
            if let Some(state) = store.state().filter(|s| pred(s)) {
                return state;
            }
            changes.changed().await.expect("store dropped");
        }
    };
    tokio::time::timeout(WAIT, wait)
        .await
        .expect("timed out waiting for store state")
}

/// Resolves to `action` after `ms` milliseconds.
pub async fn delay((action, ms): (Value, u64)) -> Option<Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Some(action)
}
