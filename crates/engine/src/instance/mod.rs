//! Compiling definitions against the merged plugins.
//!
//! [`create_instance`] merges the plugins once; the returned [`Instance`]
//! then builds the root reducer ([`Instance::combine_reducers`]) and action
//! creators ([`Instance::get_action`]) on demand.

mod config;

pub use config::BreezeConfig;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::action_type::create_action_type;
use crate::definition::{ActionDefinition, ActionDefinitions};
use crate::error::{Error, Result};
use crate::path;
use crate::plugin::{
	ActionCreator, AdapterBundle, MergedRegistry, Plugin, Tools, default_plugin, merge,
};
use crate::reducer::{self, Reducer};

/// Compiled definitions plus the registry they resolve against.
#[derive(Debug)]
pub struct Instance {
	definitions: ActionDefinitions,
	registry: MergedRegistry,
	config: BreezeConfig,
}

/// Builds every plugin, merges them, and returns the instance.
///
/// With [`BreezeConfig::use_default_plugin`] the built-in plugin is merged
/// first, so user plugins registering `default` collide with it.
pub fn create_instance(
	definitions: ActionDefinitions,
	config: BreezeConfig,
	plugins: &[&dyn Plugin],
) -> Result<Instance> {
	let tools = Tools;
	let mut bundles: Vec<AdapterBundle> = Vec::with_capacity(plugins.len() + 1);
	if config.use_default_plugin {
		bundles.push(default_plugin(&tools, &config));
	}
	bundles.extend(plugins.iter().map(|plugin| plugin.build(&tools, &config)));

	let registry = merge(&bundles, &config.merge_options())?;
	tracing::debug!(
		plugins = ?bundles.iter().map(AdapterBundle::name).collect::<Vec<_>>(),
		slices = definitions.len(),
		"created instance"
	);

	Ok(Instance {
		definitions,
		registry,
		config,
	})
}

impl Instance {
	/// Builds the root reducer.
	///
	/// `custom` reducers are keyed by slice. A custom reducer for a defined
	/// slice runs after the generated ones, and its own initial state seeds
	/// the slice's initial state. Custom reducers for other keys are combined
	/// unchanged.
	///
	/// Each action's declared `type` is looked up verbatim, so with
	/// [`BreezeConfig::map_action_types`] set, definitions must name the
	/// mapped key.
	pub fn combine_reducers(&self, custom: IndexMap<String, Reducer>) -> Result<Reducer> {
		let mut slices = custom;
		for (slice, actions) in self.definitions.slices() {
			let custom = slices.get(slice).cloned();
			let seed = match &custom {
				Some(reducer) => reducer.initial_state()?,
				None => Value::Object(Map::new()),
			};
			let initial = self.slice_initial_state(actions, seed)?;

			let mut links = Vec::with_capacity(actions.len() + 1);
			for (action, definition) in actions {
				let adapter = self
					.registry
					.reducers()
					.resolve(definition.type_tag(), action)?;
				links.push(Some(adapter(definition, action.as_str(), &initial)?));
			}
			links.push(custom);

			tracing::debug!(slice, actions = actions.len(), "compiled slice reducer");
			slices.insert(slice.to_owned(), seeded(reducer::chain(links), initial));
		}
		Ok(reducer::combine(slices))
	}

	/// Folds every action's initial-state fragment into `seed`.
	fn slice_initial_state(
		&self,
		actions: &IndexMap<String, ActionDefinition>,
		seed: Value,
	) -> Result<Value> {
		actions.iter().try_fold(seed, |state, (action, definition)| {
			let adapter = self
				.registry
				.initial_states()
				.resolve(definition.type_tag(), action)?;
			path::set_all(state, adapter(definition, action.as_str())?)
		})
	}

	/// Returns the generated action creator for `action`.
	///
	/// Like [`Instance::combine_reducers`], resolves the declared `type`
	/// against the mapped adapter keys.
	pub fn get_action(&self, action: &str, creator_config: Option<&Value>) -> Result<ActionCreator> {
		let (_, definition) = self
			.definitions
			.find_action(action)
			.ok_or_else(|| Error::ActionNotFound {
				action: action.to_owned(),
			})?;
		let adapter = self
			.registry
			.actions()
			.resolve(definition.type_tag(), action)?;
		adapter(definition, action, creator_config)
	}

	/// `(slice, action, type string)` for every action, by naming convention.
	pub fn action_types(&self) -> Vec<(&str, &str, String)> {
		self.definitions
			.actions()
			.map(|(slice, action, _)| (slice, action, create_action_type(action, "", "")))
			.collect()
	}

	pub fn action_definitions(&self) -> &ActionDefinitions {
		&self.definitions
	}

	pub fn merged_plugin(&self) -> &MergedRegistry {
		&self.registry
	}

	pub fn config(&self) -> &BreezeConfig {
		&self.config
	}
}

/// Starts an uninitialized slice from its computed initial state.
fn seeded(chained: Reducer, initial: Value) -> Reducer {
	Reducer::new(move |state, message| {
		let state = state.unwrap_or_else(|| initial.clone());
		chained.apply(Some(state), message)
	})
}
