//! Reducers that return commands.
//!
//! A reducer returns either a plain next state or the next state plus
//! [`Command`]s. The combinators resolve each reducer call, hand its
//! commands to a [`Dispatcher`] that runs them on tokio tasks, and return
//! the next state right away. When an effect resolves to an action, that
//! action is dispatched back into the pipeline.
//!
//! ```no_run
//! use cmdreduce::combine::{boxed, reduce_reducers};
//! use cmdreduce::dispatch::{self, Dispatcher};
//! use cmdreduce::mvi::{from_fn, Outcome};
//! use cmdreduce::store::Store;
//! use cmdreduce::Command;
//! use serde_json::{json, Value};
//!
//! async fn load(id: u64) -> Option<Value> {
//!     Some(json!({ "type": "loaded", "id": id }))
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, actions) = dispatch::channel();
//! let dispatcher = Dispatcher::builder(sink).build()?;
//!
//! let reducer = reduce_reducers(
//!     dispatcher,
//!     vec![boxed(from_fn(|state: Option<Value>, action: &Value| {
//!         let state = state.unwrap_or_else(|| json!({}));
//!         match action["type"].as_str() {
//!             Some("load") => Outcome::with_command(state, Command::perform(load, 7)),
//!             Some("loaded") => Outcome::state(json!({ "id": action["id"] })),
//!             _ => Outcome::state(state),
//!         }
//!     }))],
//! );
//!
//! let store = Store::new(reducer, None);
//! store.spawn_pump(actions);
//! store.dispatch(json!({ "type": "load" }));
//! # Ok(())
//! # }
//! ```

pub mod combine;
pub mod command;
pub mod config;
pub mod demo;
pub mod dispatch;
pub mod logging;
pub mod mvi;
pub mod resolver;
pub mod store;

pub use command::Command;
pub use dispatch::Dispatcher;
pub use mvi::{Action, Outcome, Reducer, StateReducer};
pub use resolver::resolve;
