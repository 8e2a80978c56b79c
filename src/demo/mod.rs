//! Recipes demo: a reducer that loads data through chained commands.
//!
//! `Fetch` schedules a delayed load, whose `Success` schedules a second
//! delayed load, whose `Done` finishes the flow.

pub mod api;
mod recipes;

pub use recipes::{Recipe, RecipeAction, RecipesReducer, RecipesState};

use tokio::task::JoinHandle;

use crate::combine::{boxed, reduce_reducers};
use crate::config::Config;
use crate::dispatch::{self, DispatchError, Dispatcher};
use crate::store::Store;

/// A running demo pipeline.
pub struct Demo {
    pub store: Store<RecipesState, RecipeAction>,
    pub dispatcher: Dispatcher<RecipeAction>,
    pump: JoinHandle<()>,
}

impl Demo {
    /// Wire channel, dispatcher, reducer and store. Must be called inside a
    /// tokio runtime.
    pub fn start(config: &Config) -> Result<Self, DispatchError> {
        let (sink, actions) = dispatch::channel();
        let dispatcher = Dispatcher::builder(sink).config(&config.effects).build()?;
        let reducer = reduce_reducers(
            dispatcher.clone(),
            vec![boxed(RecipesReducer::new(config.demo.clone()))],
        );
        let store = Store::new(reducer, Some(RecipesState::default()));
        let pump = store.spawn_pump(actions);

        Ok(Self {
            store,
            dispatcher,
            pump,
        })
    }

    /// Dispatch `Fetch` and report every state change until the follow-up
    /// batch has been reduced.
    pub async fn run(&self, mut on_change: impl FnMut(&RecipesState)) -> RecipesState {
        let mut changes = self.store.subscribe();
        self.store.dispatch(RecipeAction::Fetch);

        loop {
            let state = self.store.state().unwrap_or_default();
            on_change(&state);
            if state.done {
                return state;
            }
            if changes.changed().await.is_err() {
                return state;
            }
        }
    }
}

impl Drop for Demo {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
