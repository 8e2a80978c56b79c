//! Tagged reducer result: the next state, optionally with commands.

use std::fmt;

use crate::command::Command;

/// What a reducer returns.
///
/// The variant is an explicit tag, so a state that happens to be a sequence
/// is never mistaken for a state-with-commands pair.
pub enum Outcome<S, A> {
    /// Plain next state. Nothing is executed.
    State(S),
    /// Next state plus command slots. `None` slots are skipped.
    WithCommands(S, Vec<Option<Command<A>>>),
}

impl<S, A> Outcome<S, A> {
    pub fn state(state: S) -> Self {
        Outcome::State(state)
    }

    /// Next state with a single command.
    pub fn with_command(state: S, command: Command<A>) -> Self {
        Outcome::WithCommands(state, vec![Some(command)])
    }

    pub fn with_commands<I>(state: S, commands: I) -> Self
    where
        I: IntoIterator<Item = Command<A>>,
    {
        Outcome::WithCommands(state, commands.into_iter().map(Some).collect())
    }

    /// Append a command, turning a plain state into a tagged one.
    pub fn and(self, command: Command<A>) -> Self {
        self.and_slot(Some(command))
    }

    /// Append a possibly empty command slot.
    pub fn and_slot(self, slot: Option<Command<A>>) -> Self {
        match self {
            Outcome::State(state) => Outcome::WithCommands(state, vec![slot]),
            Outcome::WithCommands(state, mut slots) => {
                slots.push(slot);
                Outcome::WithCommands(state, slots)
            }
        }
    }

    pub fn next_state(&self) -> &S {
        match self {
            Outcome::State(state) | Outcome::WithCommands(state, _) => state,
        }
    }

    /// Number of command slots, empty ones included.
    pub fn slot_count(&self) -> usize {
        match self {
            Outcome::State(_) => 0,
            Outcome::WithCommands(_, slots) => slots.len(),
        }
    }

    pub fn into_parts(self) -> (S, Vec<Option<Command<A>>>) {
        match self {
            Outcome::State(state) => (state, Vec::new()),
            Outcome::WithCommands(state, slots) => (state, slots),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Outcome<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::State(state) => f.debug_tuple("State").field(state).finish(),
            Outcome::WithCommands(state, slots) => f
                .debug_tuple("WithCommands")
                .field(state)
                .field(slots)
                .finish(),
        }
    }
}
