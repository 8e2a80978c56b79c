//! Combinators that compose command reducers into one pipeline reducer.
//!
//! - [`reduce_reducers`]: every reducer sees the whole state, in order.
//! - [`combine_reducers`]: every reducer owns one named slice of the state.
//!
//! Both resolve commands through [`resolve`](crate::resolver::resolve) and
//! return the next state synchronously.

mod keyed;
mod sequential;

pub use keyed::{combine_reducers, KeyedReducer};
pub use sequential::{reduce_reducers, SequentialReducer};

use crate::mvi::Reducer;

/// Boxed reducer, the element type of both combinators.
pub type BoxReducer<S, A> = Box<dyn Reducer<S, A>>;

/// Box a reducer for a combinator list or map.
pub fn boxed<S, A, R>(reducer: R) -> BoxReducer<S, A>
where
    R: Reducer<S, A> + 'static,
{
    Box::new(reducer)
}
