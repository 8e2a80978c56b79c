use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::command::{Command, Effect, EffectCall};
use crate::config::{EffectOrdering, EffectsConfig, FailurePolicy};
use crate::mvi::Action;

use super::error::{DispatchError, EffectError};
use super::inflight::InflightTracker;
use super::registry::EffectRegistry;
use super::Dispatch;

/// Runs commands and forwards their actions to the dispatch sink.
///
/// Cheap to clone; every combinator holds one. Effects are spawned on the
/// runtime captured when the dispatcher was built.
pub struct Dispatcher<A> {
    inner: Arc<Inner<A>>,
}

struct Inner<A> {
    sink: Arc<dyn Dispatch<A>>,
    runtime: Handle,
    registry: EffectRegistry<A>,
    ordering: EffectOrdering,
    on_failure: FailurePolicy,
    warn_on_unknown_effect: bool,
    failures: Option<mpsc::UnboundedSender<EffectError>>,
    inflight: InflightTracker,
}

/// A command ready to run: label plus bound invocation.
struct Job<A> {
    label: String,
    call: EffectCall<A>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Action> Dispatcher<A> {
    pub fn builder<D: Dispatch<A>>(sink: D) -> DispatcherBuilder<A> {
        DispatcherBuilder::new(Arc::new(sink))
    }

    /// Forward an action straight to the sink.
    pub fn dispatch(&self, action: A) {
        self.inner.sink.dispatch(action);
    }

    /// Number of effect tasks still running.
    pub fn in_flight(&self) -> usize {
        self.inner.inflight.count()
    }

    /// Resolves once every spawned effect task has finished.
    ///
    /// Actions produced by those effects have been handed to the sink by
    /// then, but the host may not have reduced them yet.
    pub async fn idle(&self) {
        self.inner.inflight.wait_idle().await
    }

    pub fn ordering(&self) -> EffectOrdering {
        self.inner.ordering
    }

    /// Start every command in `slots` without waiting for any of them.
    pub(crate) fn spawn_commands(&self, slots: Vec<Option<Command<A>>>) {
        let jobs: Vec<Job<A>> = slots
            .into_iter()
            .enumerate()
            .filter_map(|(slot, command)| match command {
                Some(command) => self.prepare(command),
                None => {
                    tracing::trace!(slot, "Empty command slot skipped");
                    None
                }
            })
            .collect();

        if jobs.is_empty() {
            return;
        }

        match self.inner.ordering {
            EffectOrdering::Concurrent => {
                for job in jobs {
                    let guard = self.inner.inflight.enter();
                    let this = self.clone();
                    self.inner.runtime.spawn(async move {
                        this.execute(job).await;
                        drop(this);
                        drop(guard);
                    });
                }
            }
            EffectOrdering::Sequential => {
                let guard = self.inner.inflight.enter();
                let this = self.clone();
                self.inner.runtime.spawn(async move {
                    for job in jobs {
                        this.execute(job).await;
                    }
                    drop(this);
                    drop(guard);
                });
            }
        }
    }

    fn prepare(&self, command: Command<A>) -> Option<Job<A>> {
        let label = command.label().to_string();
        let call = match command.effect {
            Effect::Call(call) => call,
            Effect::Named { name, args } => match self.inner.registry.prepare(&name, args) {
                Some(call) => call,
                None => {
                    if self.inner.warn_on_unknown_effect {
                        tracing::warn!(
                            effect = %name,
                            "No effect registered under this name, command skipped"
                        );
                    } else {
                        tracing::debug!(effect = %name, "Unknown effect skipped");
                    }
                    return None;
                }
            },
        };
        Some(Job { label, call })
    }

    async fn execute(&self, job: Job<A>) {
        let Job { label, call } = job;

        // The effect runs on its own task so a panic surfaces as a JoinError
        // here instead of tearing down the supervising task.
        let result = self.inner.runtime.spawn(async move { call().await }).await;

        match result {
            Ok(Ok(Some(action))) if action.is_dispatchable() => {
                tracing::debug!(effect = %label, kind = ?action.kind(), "Effect produced action");
                self.inner.sink.dispatch(action);
            }
            Ok(Ok(Some(action))) => {
                tracing::debug!(effect = %label, ?action, "Effect result has no kind, discarded");
            }
            Ok(Ok(None)) => {
                tracing::trace!(effect = %label, "Effect completed without an action");
            }
            Ok(Err(source)) => self.report(EffectError::Failed { label, source }),
            Err(join_err) => self.report(EffectError::from_join(label, join_err)),
        }
    }

    fn report(&self, err: EffectError) {
        if self.inner.on_failure == FailurePolicy::Log {
            tracing::error!(effect = %err.label(), error = %err, "Effect failed");
        }
        if let Some(failures) = &self.inner.failures {
            let _ = failures.send(err);
        }
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder<A> {
    sink: Arc<dyn Dispatch<A>>,
    runtime: Option<Handle>,
    registry: EffectRegistry<A>,
    ordering: EffectOrdering,
    on_failure: FailurePolicy,
    warn_on_unknown_effect: bool,
    failures: Option<mpsc::UnboundedSender<EffectError>>,
}

impl<A: Action> DispatcherBuilder<A> {
    fn new(sink: Arc<dyn Dispatch<A>>) -> Self {
        let defaults = EffectsConfig::default();
        Self {
            sink,
            runtime: None,
            registry: EffectRegistry::new(),
            ordering: defaults.ordering,
            on_failure: defaults.on_failure,
            warn_on_unknown_effect: defaults.warn_on_unknown_effect,
            failures: None,
        }
    }

    /// Apply the `[effects]` section of the configuration.
    pub fn config(mut self, config: &EffectsConfig) -> Self {
        self.ordering = config.ordering;
        self.on_failure = config.on_failure;
        self.warn_on_unknown_effect = config.warn_on_unknown_effect;
        self
    }

    pub fn ordering(mut self, ordering: EffectOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    pub fn warn_on_unknown_effect(mut self, warn: bool) -> Self {
        self.warn_on_unknown_effect = warn;
        self
    }

    /// Effects available to [`Command::named`].
    pub fn registry(mut self, registry: EffectRegistry<A>) -> Self {
        self.registry = registry;
        self
    }

    /// Forward every effect failure to `failures`, whatever the policy.
    pub fn report_failures(mut self, failures: mpsc::UnboundedSender<EffectError>) -> Self {
        self.failures = Some(failures);
        self
    }

    /// Spawn effects on `runtime` instead of the ambient one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<Dispatcher<A>, DispatchError> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(DispatchError::NoRuntime)?,
        };

        tracing::debug!(
            ordering = ?self.ordering,
            on_failure = ?self.on_failure,
            named_effects = ?self.registry.names(),
            "Dispatcher ready"
        );

        Ok(Dispatcher {
            inner: Arc::new(Inner {
                sink: self.sink,
                runtime,
                registry: self.registry,
                ordering: self.ordering,
                on_failure: self.on_failure,
                warn_on_unknown_effect: self.warn_on_unknown_effect,
                failures: self.failures,
                inflight: InflightTracker::new(),
            }),
        })
    }
}
