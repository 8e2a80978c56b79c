//! The command resolver shared by both combinators.

use crate::dispatch::Dispatcher;
use crate::mvi::{Action, Outcome, Reducer};

/// Run `reducer` once and return its next state.
///
/// If the reducer attached commands, they are handed to `dispatcher` and
/// start running in the background; this function never waits for them.
/// A panicking reducer unwinds straight through to the caller.
pub fn resolve<S, A, R>(reducer: &R, state: Option<S>, action: &A, dispatcher: &Dispatcher<A>) -> S
where
    A: Action,
    R: Reducer<S, A> + ?Sized,
{
    match reducer.reduce(state, action) {
        Outcome::State(next) => next,
        Outcome::WithCommands(next, slots) => {
            tracing::trace!(
                kind = ?action.kind(),
                commands = slots.len(),
                "Reducer returned commands"
            );
            dispatcher.spawn_commands(slots);
            next
        }
    }
}
