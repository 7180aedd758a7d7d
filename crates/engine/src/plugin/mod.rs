//! Adapter plugins.
//!
//! A plugin contributes an [`AdapterBundle`]: three tables keyed by action
//! `type`, one per [`AdapterKind`]. Bundles are merged into a
//! [`MergedRegistry`] with per-kind collision detection (see [`merge`]).
//!
//! Plugins are factories receiving [`Tools`] (the engine's helper surface)
//! and the instance configuration, so the same plugin can adapt to strict
//! or namespaced setups.

mod conflict;
mod default;
mod merge;

use std::fmt;
use std::sync::Arc;

pub use conflict::{Conflict, ConflictReport, find_conflicts};
pub use default::{DEFAULT_PLUGIN_NAME, DEFAULT_TYPE, default_plugin};
use indexmap::IndexMap;
pub use merge::{AdapterTable, KeyMapper, MergeOptions, MergedRegistry, merge};
use serde_json::Value;

use crate::definition::ActionDefinition;
use crate::error::Result;
use crate::instance::BreezeConfig;
use crate::path::Assignments;
use crate::reducer::Reducer;

/// The three adapter tables every bundle may populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
	Action,
	Reducer,
	InitialState,
}

impl AdapterKind {
	/// Every kind, in merge and report order.
	pub const ALL: [AdapterKind; 3] = [Self::Action, Self::Reducer, Self::InitialState];

	/// Plural label used in conflict summaries.
	pub fn plural(self) -> &'static str {
		match self {
			Self::Action => "actionAdapters",
			Self::Reducer => "reducerAdapters",
			Self::InitialState => "initialStateAdapters",
		}
	}
}

impl fmt::Display for AdapterKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Action => write!(f, "actionAdapter"),
			Self::Reducer => write!(f, "reducerAdapter"),
			Self::InitialState => write!(f, "initialStateAdapter"),
		}
	}
}

/// Generated function building a dispatchable message from call parameters.
#[derive(Clone)]
pub struct ActionCreator(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl ActionCreator {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Value) -> Value + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn create(&self, params: Value) -> Value {
		(self.0)(params)
	}
}

impl fmt::Debug for ActionCreator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ActionCreator(<fn>)")
	}
}

/// `(definition, action name, creator config) -> action creator`.
pub type ActionAdapter =
	Arc<dyn Fn(&ActionDefinition, &str, Option<&Value>) -> Result<ActionCreator> + Send + Sync>;

/// `(definition, action name, slice initial state) -> reducer`.
pub type ReducerAdapter =
	Arc<dyn Fn(&ActionDefinition, &str, &Value) -> Result<Reducer> + Send + Sync>;

/// `(definition, action name) -> path assignments for the slice initial state`.
pub type InitialStateAdapter =
	Arc<dyn Fn(&ActionDefinition, &str) -> Result<Assignments> + Send + Sync>;

/// A named set of adapters contributed by one plugin.
#[derive(Clone)]
pub struct AdapterBundle {
	name: String,
	actions: IndexMap<String, ActionAdapter>,
	reducers: IndexMap<String, ReducerAdapter>,
	initial_states: IndexMap<String, InitialStateAdapter>,
}

impl AdapterBundle {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			actions: IndexMap::new(),
			reducers: IndexMap::new(),
			initial_states: IndexMap::new(),
		}
	}

	pub fn action<F>(mut self, type_tag: impl Into<String>, adapter: F) -> Self
	where
		F: Fn(&ActionDefinition, &str, Option<&Value>) -> Result<ActionCreator>
			+ Send
			+ Sync
			+ 'static,
	{
		self.actions.insert(type_tag.into(), Arc::new(adapter));
		self
	}

	pub fn reducer<F>(mut self, type_tag: impl Into<String>, adapter: F) -> Self
	where
		F: Fn(&ActionDefinition, &str, &Value) -> Result<Reducer> + Send + Sync + 'static,
	{
		self.reducers.insert(type_tag.into(), Arc::new(adapter));
		self
	}

	pub fn initial_state<F>(mut self, type_tag: impl Into<String>, adapter: F) -> Self
	where
		F: Fn(&ActionDefinition, &str) -> Result<Assignments> + Send + Sync + 'static,
	{
		self.initial_states
			.insert(type_tag.into(), Arc::new(adapter));
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Registered keys of one kind, in registration order.
	pub fn keys(&self, kind: AdapterKind) -> Vec<&str> {
		match kind {
			AdapterKind::Action => self.actions.keys().map(String::as_str).collect(),
			AdapterKind::Reducer => self.reducers.keys().map(String::as_str).collect(),
			AdapterKind::InitialState => self.initial_states.keys().map(String::as_str).collect(),
		}
	}
}

impl fmt::Debug for AdapterBundle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdapterBundle")
			.field("name", &self.name)
			.field("actions", &self.keys(AdapterKind::Action))
			.field("reducers", &self.keys(AdapterKind::Reducer))
			.field("initial_states", &self.keys(AdapterKind::InitialState))
			.finish()
	}
}

/// A plugin factory: builds its bundle from the engine tools and instance config.
///
/// Implemented for every `Fn(&Tools, &BreezeConfig) -> AdapterBundle`.
pub trait Plugin {
	fn build(&self, tools: &Tools, config: &BreezeConfig) -> AdapterBundle;
}

impl<F> Plugin for F
where
	F: Fn(&Tools, &BreezeConfig) -> AdapterBundle,
{
	fn build(&self, tools: &Tools, config: &BreezeConfig) -> AdapterBundle {
		self(tools, config)
	}
}

/// Helpers handed to plugin factories.
///
/// Every method forwards to the engine function of the same name, so
/// plugins build adapters with exactly the behaviour the default plugin has.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tools;

impl Tools {
	pub fn create_action_type(&self, action_name: &str, suffix: &str, prefix: &str) -> String {
		crate::action_type::create_action_type(action_name, suffix, prefix)
	}

	pub fn set(&self, container: Value, path: &str, value: Value) -> Result<Value> {
		crate::path::set(container, path, value)
	}

	pub fn set_all(&self, container: Value, assignments: Assignments) -> Result<Value> {
		crate::path::set_all(container, assignments)
	}

	pub fn get<'a>(&self, value: &'a Value, path: &str) -> Option<&'a Value> {
		crate::path::get(value, path)
	}

	pub fn has(&self, value: &Value, path: &str) -> bool {
		crate::path::has(value, path)
	}

	pub fn chain<I>(&self, reducers: I) -> Reducer
	where
		I: IntoIterator<Item = Option<Reducer>>,
	{
		crate::reducer::chain(reducers)
	}

	pub fn merge(&self, bundles: &[AdapterBundle], options: &MergeOptions) -> Result<MergedRegistry> {
		merge(bundles, options)
	}

	pub fn find_conflicts(
		&self,
		bundles: &[AdapterBundle],
		kind: AdapterKind,
		map_key: &KeyMapper,
	) -> ConflictReport {
		find_conflicts(bundles, kind, map_key)
	}
}

#[cfg(test)]
mod tests;
