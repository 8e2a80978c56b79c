//! Effects addressable by name.
//!
//! Reducers that only know an effect's name (for example when commands are
//! described in data) emit [`Command::named`](crate::command::Command::named);
//! the dispatcher resolves the name here when the command executes.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::command::{EffectCall, EffectFuture, IntoEffectResult};

type NamedEffect<A> = Arc<dyn Fn(Value) -> EffectFuture<A> + Send + Sync>;

pub struct EffectRegistry<A> {
    effects: HashMap<String, NamedEffect<A>>,
}

impl<A: 'static> EffectRegistry<A> {
    pub fn new() -> Self {
        Self {
            effects: HashMap::new(),
        }
    }

    /// Register an async effect. A later registration under the same name
    /// replaces the earlier one.
    pub fn register<F, Fut, R>(&mut self, name: impl Into<String>, effect: F) -> &mut Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoEffectResult<A>,
    {
        let effect: NamedEffect<A> = Arc::new(move |args: Value| -> EffectFuture<A> {
            let fut = effect(args);
            Box::pin(async move { fut.await.into_effect_result() })
        });
        self.effects.insert(name.into(), effect);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.effects.keys().cloned().collect();
        names.sort();
        names
    }

    /// Bind `args` to the effect registered as `name`, or `None` if nothing
    /// is registered. The effect itself is not called yet.
    pub(crate) fn prepare(&self, name: &str, args: Value) -> Option<EffectCall<A>> {
        let effect = Arc::clone(self.effects.get(name)?);
        Some(Box::new(move || effect(args)))
    }
}

impl<A: 'static> Default for EffectRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for EffectRegistry<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.effects.keys()).finish()
    }
}
