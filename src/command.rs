//! Deferred side-effect descriptors returned by reducers.
//!
//! A [`Command`] bundles an effect with the arguments it will be applied to.
//! Nothing runs when the command is built; the
//! [`Dispatcher`](crate::dispatch::Dispatcher) calls the effect on a tokio
//! task after the reducer has returned.

use std::borrow::Cow;
use std::fmt;
use std::future::Future;

use futures_core::future::BoxFuture;
use serde_json::Value;

use crate::mvi::Action;

/// What an effect resolves to once awaited.
pub type EffectResult<A> = Result<Option<A>, anyhow::Error>;

/// Type-erased, not yet started effect invocation.
pub type EffectFuture<A> = BoxFuture<'static, EffectResult<A>>;

/// Effect with its arguments bound, called on the task that drives it.
pub(crate) type EffectCall<A> = Box<dyn FnOnce() -> EffectFuture<A> + Send>;

/// Values an effect may produce.
///
/// `None` means "nothing to dispatch". Errors are reported through the
/// dispatcher's failure policy instead of being dispatched.
pub trait IntoEffectResult<A> {
    fn into_effect_result(self) -> EffectResult<A>;
}

impl<A> IntoEffectResult<A> for Option<A> {
    fn into_effect_result(self) -> EffectResult<A> {
        Ok(self)
    }
}

impl<A, E> IntoEffectResult<A> for Result<Option<A>, E>
where
    E: Into<anyhow::Error>,
{
    fn into_effect_result(self) -> EffectResult<A> {
        self.map_err(Into::into)
    }
}

pub(crate) enum Effect<A> {
    /// Effect and arguments captured at construction.
    Call(EffectCall<A>),
    /// Effect looked up in the dispatcher's registry when executed.
    Named { name: String, args: Value },
}

/// An effect plus the positional arguments to apply it to.
pub struct Command<A> {
    label: Cow<'static, str>,
    pub(crate) effect: Effect<A>,
}

impl<A: Action> Command<A> {
    /// Asynchronous effect: `effect(args)` is awaited on a spawned task.
    ///
    /// Multiple positional arguments are passed as a tuple.
    pub fn perform<F, Args, Fut, R>(effect: F, args: Args) -> Self
    where
        F: FnOnce(Args) -> Fut + Send + 'static,
        Args: Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoEffectResult<A>,
    {
        Self {
            label: Cow::Borrowed(std::any::type_name::<F>()),
            effect: Effect::Call(Box::new(move || -> EffectFuture<A> {
                Box::pin(async move { effect(args).await.into_effect_result() })
            })),
        }
    }

    /// Synchronous effect, wrapped so it is driven like an asynchronous one.
    ///
    /// `effect` is not called while the reducer or
    /// [`resolve`](crate::resolver::resolve) runs: it runs on the spawned
    /// task, after `resolve` has returned the next state.
    pub fn run<F, Args, R>(effect: F, args: Args) -> Self
    where
        F: FnOnce(Args) -> R + Send + 'static,
        Args: Send + 'static,
        R: IntoEffectResult<A>,
    {
        Self {
            label: Cow::Borrowed(std::any::type_name::<F>()),
            effect: Effect::Call(Box::new(move || -> EffectFuture<A> {
                Box::pin(async move { effect(args).into_effect_result() })
            })),
        }
    }

    /// Effect registered under `name` in the dispatcher's
    /// [`EffectRegistry`](crate::dispatch::EffectRegistry).
    ///
    /// Unknown names are skipped at execution time.
    pub fn named(name: impl Into<String>, args: Value) -> Self {
        let name = name.into();
        Self {
            label: Cow::Owned(name.clone()),
            effect: Effect::Named { name, args },
        }
    }
}

impl<A> Command<A> {
    /// Replace the label used in logs and failure reports.
    pub fn labeled(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<A> fmt::Debug for Command<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.effect {
            Effect::Call(_) => "call",
            Effect::Named { .. } => "named",
        };
        f.debug_struct("Command")
            .field("label", &self.label)
            .field("effect", &kind)
            .finish()
    }
}
