//! Model-View-Intent primitives extended with deferred commands.
//!
//! A reducer stays a pure `(state, action) -> next` function, but may attach
//! commands to its result. The commands are executed by a
//! [`Dispatcher`](crate::dispatch::Dispatcher) after the reducer returns.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ Outcome ──→ State
//!    ↑                      │
//!    │                  Commands
//!    │                      ↓
//!    └──── Dispatch ◄── Effects (tokio tasks)
//! ```
//!
//! - **Action**: event routed by its kind
//! - **Reducer**: pure function producing an [`Outcome`]
//! - **Outcome**: next state, optionally tagged with commands

mod action;
mod outcome;
mod reducer;

pub use action::Action;
pub use outcome::Outcome;
pub use reducer::{from_fn, Reducer, StateReducer};
