use crate::dispatch::Dispatcher;
use crate::mvi::{Action, Reducer, StateReducer};
use crate::resolver::resolve;

use super::BoxReducer;

/// Applies reducers one after another to the same state.
///
/// Each reducer receives the state produced by the previous one. With no
/// reducers registered the input state is returned unchanged.
pub struct SequentialReducer<S, A> {
    dispatcher: Dispatcher<A>,
    reducers: Vec<BoxReducer<S, A>>,
}

/// Compose `reducers` left to right into one pipeline reducer.
pub fn reduce_reducers<S, A>(
    dispatcher: Dispatcher<A>,
    reducers: Vec<BoxReducer<S, A>>,
) -> SequentialReducer<S, A> {
    SequentialReducer {
        dispatcher,
        reducers,
    }
}

impl<S: 'static, A: Action> SequentialReducer<S, A> {
    pub fn new(dispatcher: Dispatcher<A>) -> Self {
        reduce_reducers(dispatcher, Vec::new())
    }

    /// Append a reducer to the end of the chain.
    pub fn with<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        self.reducers.push(Box::new(reducer));
        self
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A: Action> StateReducer<S, A> for SequentialReducer<S, A> {
    fn reduce(&self, state: Option<S>, action: &A) -> Option<S> {
        self.reducers.iter().fold(state, |acc, reducer| {
            Some(resolve(reducer.as_ref(), acc, action, &self.dispatcher))
        })
    }
}
