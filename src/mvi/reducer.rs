//! Reducer traits for command-returning state transitions.

use super::outcome::Outcome;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It must be
/// a pure function `(Option<State>, &Action) -> Outcome`; side effects are
/// described as commands and never run inside `reduce`.
///
/// `None` stands for a state that has not been initialized yet, either on
/// the first dispatch or for a slice missing from a composite state.
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: Option<S>, action: &A) -> Outcome<S, A>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(Option<S>, &A) -> Outcome<S, A> + Send + Sync,
{
    fn reduce(&self, state: Option<S>, action: &A) -> Outcome<S, A> {
        self(state, action)
    }
}

/// A reducer whose commands have already been resolved.
///
/// This is what the combinators produce and what a host pipeline installs
/// as its state-transition function.
pub trait StateReducer<S, A>: Send + Sync {
    fn reduce(&self, state: Option<S>, action: &A) -> Option<S>;
}

/// Pins a closure to the [`Reducer`] signature so its argument types are
/// inferred at the definition site.
pub fn from_fn<S, A, F>(f: F) -> F
where
    F: Fn(Option<S>, &A) -> Outcome<S, A> + Send + Sync,
{
    f
}
