use std::hash::Hash;

use indexmap::IndexMap;

use crate::dispatch::Dispatcher;
use crate::mvi::{Action, Outcome, Reducer, StateReducer};
use crate::resolver::resolve;

use super::BoxReducer;

/// Applies each named reducer to the slice of state stored under its name.
///
/// The output map always has exactly the registered keys, in registration
/// order. Slices in the input that no reducer claims are dropped; claimed
/// slices missing from the input are reduced from `None`.
pub struct KeyedReducer<K, V, A> {
    dispatcher: Dispatcher<A>,
    reducers: IndexMap<K, BoxReducer<V, A>>,
}

/// Compose a map of slice reducers into one pipeline reducer.
pub fn combine_reducers<K, V, A>(
    dispatcher: Dispatcher<A>,
    reducers: IndexMap<K, BoxReducer<V, A>>,
) -> KeyedReducer<K, V, A> {
    KeyedReducer {
        dispatcher,
        reducers,
    }
}

impl<K, V, A> KeyedReducer<K, V, A>
where
    K: Hash + Eq,
    V: 'static,
    A: Action,
{
    pub fn new(dispatcher: Dispatcher<A>) -> Self {
        combine_reducers(dispatcher, IndexMap::new())
    }

    /// Register `reducer` for `key`. Re-registering a key replaces its
    /// reducer but keeps its original position.
    pub fn with<R>(mut self, key: K, reducer: R) -> Self
    where
        R: Reducer<V, A> + 'static,
    {
        self.reducers.insert(key, Box::new(reducer));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.reducers.keys()
    }

    fn reduce_slices(&self, state: Option<IndexMap<K, V>>, action: &A) -> IndexMap<K, V>
    where
        K: Clone,
    {
        let mut prev = state.unwrap_or_default();
        let mut next = IndexMap::with_capacity(self.reducers.len());
        for (key, reducer) in &self.reducers {
            let slice = prev.swap_remove(key);
            let reduced = resolve(reducer.as_ref(), slice, action, &self.dispatcher);
            next.insert(key.clone(), reduced);
        }
        if !prev.is_empty() {
            tracing::trace!(dropped = prev.len(), "Unclaimed state slices dropped");
        }
        next
    }
}

impl<K, V, A> StateReducer<IndexMap<K, V>, A> for KeyedReducer<K, V, A>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: 'static,
    A: Action,
{
    fn reduce(&self, state: Option<IndexMap<K, V>>, action: &A) -> Option<IndexMap<K, V>> {
        Some(self.reduce_slices(state, action))
    }
}

/// Lets a keyed reducer sit inside another combinator. Its own commands are
/// already running, so it reports a plain state.
impl<K, V, A> Reducer<IndexMap<K, V>, A> for KeyedReducer<K, V, A>
where
    K: Hash + Eq + Clone + Send + Sync,
    V: 'static,
    A: Action,
{
    fn reduce(&self, state: Option<IndexMap<K, V>>, action: &A) -> Outcome<IndexMap<K, V>, A> {
        Outcome::State(self.reduce_slices(state, action))
    }
}
