//! Merging adapter bundles into one registry.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{
	ActionAdapter, AdapterBundle, AdapterKind, Conflict, InitialStateAdapter, ReducerAdapter,
	find_conflicts,
};
use crate::error::{Error, Result};

/// Renames adapter keys per plugin: `(key, plugin name, kind) -> mapped key`.
///
/// The same mapper is used for collision detection and for the merge itself,
/// so a mapper that namespaces colliding keys makes the merge succeed.
#[derive(Clone)]
pub struct KeyMapper(Arc<dyn Fn(&str, &str, AdapterKind) -> String + Send + Sync>);

impl KeyMapper {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&str, &str, AdapterKind) -> String + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	/// Keeps every key as registered.
	pub fn identity() -> Self {
		Self::new(|key, _, _| key.to_owned())
	}

	pub fn map(&self, key: &str, plugin: &str, kind: AdapterKind) -> String {
		(self.0)(key, plugin, kind)
	}
}

impl Default for KeyMapper {
	fn default() -> Self {
		Self::identity()
	}
}

impl fmt::Debug for KeyMapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("KeyMapper(<fn>)")
	}
}

/// Options for [`merge`].
#[derive(Debug, Clone)]
pub struct MergeOptions {
	/// Fail on collisions instead of letting the later bundle win.
	pub strict: bool,
	pub map_key: KeyMapper,
}

impl Default for MergeOptions {
	fn default() -> Self {
		Self {
			strict: true,
			map_key: KeyMapper::identity(),
		}
	}
}

/// Adapters of one kind, keyed by (mapped) action type.
#[derive(Clone)]
pub struct AdapterTable<A> {
	kind: AdapterKind,
	entries: IndexMap<String, A>,
}

impl<A> AdapterTable<A> {
	pub fn new(kind: AdapterKind) -> Self {
		Self {
			kind,
			entries: IndexMap::new(),
		}
	}

	/// Registers `adapter` under `type_tag`, returning the adapter it replaced.
	pub fn register(&mut self, type_tag: impl Into<String>, adapter: A) -> Option<A> {
		self.entries.insert(type_tag.into(), adapter)
	}

	pub fn get(&self, type_tag: &str) -> Option<&A> {
		self.entries.get(type_tag)
	}

	/// Looks up the adapter compiling `action`, whose declared type is `type_tag`.
	pub fn resolve(&self, type_tag: &str, action: &str) -> Result<&A> {
		self.entries
			.get(type_tag)
			.ok_or_else(|| Error::UnresolvedType {
				kind: self.kind,
				type_tag: type_tag.to_owned(),
				action: action.to_owned(),
			})
	}

	pub fn contains(&self, type_tag: &str) -> bool {
		self.entries.contains_key(type_tag)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn kind(&self) -> AdapterKind {
		self.kind
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<A> fmt::Debug for AdapterTable<A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AdapterTable")
			.field("kind", &self.kind)
			.field("keys", &self.entries.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// The merged adapter tables of every installed plugin.
#[derive(Clone, Debug)]
pub struct MergedRegistry {
	actions: AdapterTable<ActionAdapter>,
	reducers: AdapterTable<ReducerAdapter>,
	initial_states: AdapterTable<InitialStateAdapter>,
	collisions: Vec<Conflict>,
}

impl MergedRegistry {
	pub fn actions(&self) -> &AdapterTable<ActionAdapter> {
		&self.actions
	}

	pub fn reducers(&self) -> &AdapterTable<ReducerAdapter> {
		&self.reducers
	}

	pub fn initial_states(&self) -> &AdapterTable<InitialStateAdapter> {
		&self.initial_states
	}

	/// Collisions a non-strict merge resolved by letting the later bundle win.
	pub fn collisions(&self) -> &[Conflict] {
		&self.collisions
	}
}

/// Merges `bundles` in list order.
///
/// Collisions are detected per kind after key mapping. In strict mode any
/// collision fails the merge; otherwise it is logged, recorded in
/// [`MergedRegistry::collisions`], and the later bundle's adapter wins.
pub fn merge(bundles: &[AdapterBundle], options: &MergeOptions) -> Result<MergedRegistry> {
	let reports: Vec<_> = AdapterKind::ALL
		.into_iter()
		.map(|kind| find_conflicts(bundles, kind, &options.map_key))
		.filter(|report| !report.is_empty())
		.collect();

	if !reports.is_empty() {
		let kinds = reports
			.iter()
			.map(|report| report.kind.plural())
			.collect::<Vec<_>>()
			.join(", ");
		let detail = reports
			.iter()
			.map(ToString::to_string)
			.collect::<Vec<_>>()
			.join(". ");
		if options.strict {
			return Err(Error::AdapterConflict { kinds, detail });
		}
		tracing::warn!(%kinds, %detail, "conflicting adapters, duplicates will be overwritten");
	}

	let map_key = &options.map_key;
	let mut actions = AdapterTable::new(AdapterKind::Action);
	let mut reducers = AdapterTable::new(AdapterKind::Reducer);
	let mut initial_states = AdapterTable::new(AdapterKind::InitialState);
	for bundle in bundles {
		let plugin = bundle.name();
		for (key, adapter) in &bundle.actions {
			actions.register(map_key.map(key, plugin, AdapterKind::Action), adapter.clone());
		}
		for (key, adapter) in &bundle.reducers {
			reducers.register(map_key.map(key, plugin, AdapterKind::Reducer), adapter.clone());
		}
		for (key, adapter) in &bundle.initial_states {
			initial_states.register(
				map_key.map(key, plugin, AdapterKind::InitialState),
				adapter.clone(),
			);
		}
	}

	tracing::debug!(
		plugins = bundles.len(),
		actions = actions.len(),
		reducers = reducers.len(),
		initial_states = initial_states.len(),
		"merged adapter plugins"
	);

	Ok(MergedRegistry {
		actions,
		reducers,
		initial_states,
		collisions: reports
			.into_iter()
			.flat_map(|report| report.conflicts)
			.collect(),
	})
}
