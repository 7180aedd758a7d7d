//! Action definitions and their canonical write-set.
//!
//! A definition names the adapter `type` that compiles it and declares which
//! parts of its slice it writes. Every accepted shape (result mapping,
//! message-dependent result function, `resultName`/`sourcePath` shorthand,
//! assignment lists) is normalized once, when the definition is built, into
//! a [`WriteSet`] of [`Assignment`]s. Nothing downstream branches on the
//! input shape.

mod load;
mod normalize;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Message path read when an assignment declares no source.
pub const DEFAULT_SOURCE: &str = "payload";

/// Computes a value from the dispatched message and the current value at the target.
pub type ValueFn = Arc<dyn Fn(&Value, Option<&Value>) -> Value + Send + Sync>;

/// Computes a target path from the dispatched message; `None` skips the write.
pub type PathFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Computes the whole write-set from the dispatched message.
pub type ResultFn = Arc<dyn Fn(&Value) -> Vec<Assignment> + Send + Sync>;

/// Where an assignment's value comes from when an action is applied.
#[derive(Clone)]
pub enum ValueSource {
	/// Always the same value.
	Constant(Value),
	/// Copied from the message at this path.
	FromPath(String),
	/// Computed from the message and the current value at the target.
	Computed(ValueFn),
}

impl fmt::Debug for ValueSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
			Self::FromPath(path) => f.debug_tuple("FromPath").field(path).finish(),
			Self::Computed(_) => f.write_str("Computed(<fn>)"),
		}
	}
}

/// Where an assignment writes inside the slice state.
#[derive(Clone)]
pub enum TargetPath {
	Static(String),
	Computed(PathFn),
}

impl TargetPath {
	/// Resolves the concrete path for `message`. Empty paths resolve to `None`.
	pub fn resolve(&self, message: &Value) -> Option<String> {
		let path = match self {
			Self::Static(path) => Some(path.clone()),
			Self::Computed(f) => f(message),
		};
		path.filter(|p| !p.is_empty())
	}
}

impl fmt::Debug for TargetPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(path) => f.debug_tuple("Static").field(path).finish(),
			Self::Computed(_) => f.write_str("Computed(<fn>)"),
		}
	}
}

/// One canonical write: target path, applied value source, and the two fallbacks.
///
/// `initial` is only read when the slice's initial state is computed;
/// `default` is only read when an action is applied and the message lacks
/// the source path. Either one, when absent, means `null`.
#[derive(Clone, Debug)]
pub struct Assignment {
	pub target: TargetPath,
	pub source: ValueSource,
	pub default: Option<Value>,
	pub initial: Option<Value>,
}

impl Assignment {
	/// Writes the message `payload` to `path`.
	pub fn to(path: impl Into<String>) -> Self {
		Self::with_target(TargetPath::Static(path.into()))
	}

	/// Writes the message `payload` to a path computed from the message.
	pub fn to_computed<F>(f: F) -> Self
	where
		F: Fn(&Value) -> Option<String> + Send + Sync + 'static,
	{
		Self::with_target(TargetPath::Computed(Arc::new(f)))
	}

	fn with_target(target: TargetPath) -> Self {
		Self {
			target,
			source: ValueSource::FromPath(DEFAULT_SOURCE.to_owned()),
			default: None,
			initial: None,
		}
	}

	pub fn from_path(mut self, path: impl Into<String>) -> Self {
		self.source = ValueSource::FromPath(path.into());
		self
	}

	pub fn constant(mut self, value: Value) -> Self {
		self.source = ValueSource::Constant(value);
		self
	}

	pub fn computed<F>(mut self, f: F) -> Self
	where
		F: Fn(&Value, Option<&Value>) -> Value + Send + Sync + 'static,
	{
		self.source = ValueSource::Computed(Arc::new(f));
		self
	}

	pub fn default(mut self, value: Value) -> Self {
		self.default = Some(value);
		self
	}

	pub fn initial(mut self, value: Value) -> Self {
		self.initial = Some(value);
		self
	}
}

/// The normalized set of writes an action performs.
#[derive(Clone)]
pub enum WriteSet {
	Static(Vec<Assignment>),
	/// Evaluated per call: with `{}` for the initial state, with the message otherwise.
	Dynamic(ResultFn),
}

impl WriteSet {
	/// Concrete assignments for one evaluation.
	pub fn assignments(&self, message: &Value) -> Vec<Assignment> {
		match self {
			Self::Static(assignments) => assignments.clone(),
			Self::Dynamic(f) => f(message),
		}
	}
}

impl fmt::Debug for WriteSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Static(assignments) => f.debug_tuple("Static").field(assignments).finish(),
			Self::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
		}
	}
}

/// Declarative description of one named action.
#[derive(Clone, Debug)]
pub struct ActionDefinition {
	type_tag: String,
	write_set: Option<WriteSet>,
	extra: Map<String, Value>,
}

impl ActionDefinition {
	/// A definition handled by the adapters registered under `type_tag`.
	pub fn new(type_tag: impl Into<String>) -> Self {
		Self {
			type_tag: type_tag.into(),
			write_set: None,
			extra: Map::new(),
		}
	}

	/// Builds a definition from its JSON form, normalizing every shorthand.
	pub fn from_value(action: &str, value: Value) -> crate::Result<Self> {
		normalize::normalize(action, value)
	}

	/// Appends a static assignment. Replaces a previously set result function.
	pub fn assign(mut self, assignment: Assignment) -> Self {
		match &mut self.write_set {
			Some(WriteSet::Static(assignments)) => assignments.push(assignment),
			_ => self.write_set = Some(WriteSet::Static(vec![assignment])),
		}
		self
	}

	/// Makes the write-set a function of the dispatched message.
	pub fn with_result_fn<F>(mut self, f: F) -> Self
	where
		F: Fn(&Value) -> Vec<Assignment> + Send + Sync + 'static,
	{
		self.write_set = Some(WriteSet::Dynamic(Arc::new(f)));
		self
	}

	/// Attaches a plugin-specific field.
	pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}

	/// The adapter key this definition is compiled by.
	pub fn type_tag(&self) -> &str {
		&self.type_tag
	}

	/// `None` when the definition declares no writes.
	pub fn write_set(&self) -> Option<&WriteSet> {
		self.write_set.as_ref()
	}

	/// Fields the engine does not interpret, left for plugins.
	pub fn extra(&self) -> &Map<String, Value> {
		&self.extra
	}
}

/// Action definitions grouped by slice, in declaration order.
#[derive(Clone, Debug, Default)]
pub struct ActionDefinitions {
	slices: IndexMap<String, IndexMap<String, ActionDefinition>>,
}

impl ActionDefinitions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds (or extends) a slice with the given actions.
	pub fn slice<I, K>(mut self, slice: impl Into<String>, actions: I) -> Self
	where
		I: IntoIterator<Item = (K, ActionDefinition)>,
		K: Into<String>,
	{
		let entry = self.slices.entry(slice.into()).or_default();
		entry.extend(actions.into_iter().map(|(name, def)| (name.into(), def)));
		self
	}

	pub fn insert(
		&mut self,
		slice: impl Into<String>,
		action: impl Into<String>,
		definition: ActionDefinition,
	) {
		self.slices
			.entry(slice.into())
			.or_default()
			.insert(action.into(), definition);
	}

	pub fn slices(&self) -> impl Iterator<Item = (&str, &IndexMap<String, ActionDefinition>)> {
		self.slices.iter().map(|(name, actions)| (name.as_str(), actions))
	}

	pub fn get_slice(&self, slice: &str) -> Option<&IndexMap<String, ActionDefinition>> {
		self.slices.get(slice)
	}

	/// Finds the first slice declaring `action`.
	pub fn find_action(&self, action: &str) -> Option<(&str, &ActionDefinition)> {
		self.slices.iter().find_map(|(slice, actions)| {
			actions.get(action).map(|def| (slice.as_str(), def))
		})
	}

	/// Iterates `(slice, action, definition)` in declaration order.
	pub fn actions(&self) -> impl Iterator<Item = (&str, &str, &ActionDefinition)> {
		self.slices.iter().flat_map(|(slice, actions)| {
			actions
				.iter()
				.map(move |(name, def)| (slice.as_str(), name.as_str(), def))
		})
	}

	pub fn len(&self) -> usize {
		self.slices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slices.is_empty()
	}
}
