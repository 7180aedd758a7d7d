//! Reducers and their composition.
//!
//! A [`Reducer`] maps `(state, message)` to the next state. `None` state
//! means "not initialized yet": the reducer answers with its initial state
//! (applying the message on top if it handles it).

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::Result;

type ReduceFn = dyn Fn(Option<Value>, &Value) -> Result<Value> + Send + Sync;

#[derive(Clone)]
pub struct Reducer(Arc<ReduceFn>);

impl Reducer {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Option<Value>, &Value) -> Result<Value> + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn apply(&self, state: Option<Value>, message: &Value) -> Result<Value> {
		(self.0)(state, message)
	}

	/// The state this reducer starts from, obtained by reducing an empty message.
	pub fn initial_state(&self) -> Result<Value> {
		self.apply(None, &Value::Object(Map::new()))
	}
}

impl fmt::Debug for Reducer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Reducer(<fn>)")
	}
}

/// Chains reducers over one piece of state.
///
/// Absent entries are dropped. Each message is folded through the remaining
/// reducers in order, every reducer receiving the state produced by the one
/// before it. An empty chain returns its input (or `null` when uninitialized).
pub fn chain<I>(reducers: I) -> Reducer
where
	I: IntoIterator<Item = Option<Reducer>>,
{
	let reducers: Vec<Reducer> = reducers.into_iter().flatten().collect();
	Reducer::new(move |state, message| {
		let mut state = state;
		for reducer in &reducers {
			state = Some(reducer.apply(state, message)?);
		}
		Ok(state.unwrap_or(Value::Null))
	})
}

/// Combines per-slice reducers into one reducer over an object keyed by slice.
///
/// Each slice reducer sees only its own key of the previous state; keys
/// without a reducer are dropped from the result.
pub fn combine(slices: IndexMap<String, Reducer>) -> Reducer {
	Reducer::new(move |state, message| {
		let mut previous = match state {
			Some(Value::Object(map)) => map,
			_ => Map::new(),
		};
		let mut next = Map::new();
		for (slice, reducer) in &slices {
			let slice_state = previous.remove(slice.as_str());
			next.insert(slice.clone(), reducer.apply(slice_state, message)?);
		}
		Ok(Value::Object(next))
	})
}
