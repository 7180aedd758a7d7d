//! The built-in path-assignment plugin.
//!
//! Handles actions of type `default`:
//! - the action creator wraps its parameters as `{ type, payload }`
//! - the reducer applies the definition's write-set when the message type
//!   matches, and passes every other message through
//! - the initial state holds each target's `initial` value

use serde_json::{Value, json};

use super::{ActionCreator, AdapterBundle, Tools};
use crate::instance::BreezeConfig;
use crate::reducer::Reducer;
use crate::resolve::{applied_assignments, initial_assignments};

pub const DEFAULT_PLUGIN_NAME: &str = "breeze-plugin-default";

/// Action type handled by [`default_plugin`].
pub const DEFAULT_TYPE: &str = "default";

pub fn default_plugin(tools: &Tools, _config: &BreezeConfig) -> AdapterBundle {
	let tools = *tools;
	AdapterBundle::new(DEFAULT_PLUGIN_NAME)
		.action(DEFAULT_TYPE, move |_, action_name, _| {
			let action_type = tools.create_action_type(action_name, "", "");
			Ok(ActionCreator::new(move |params| {
				json!({ "type": action_type, "payload": params })
			}))
		})
		.reducer(DEFAULT_TYPE, move |definition, action_name, initial_state| {
			let definition = definition.clone();
			let action_name = action_name.to_owned();
			let action_type = tools.create_action_type(&action_name, "", "");
			let initial_state = initial_state.clone();
			Ok(Reducer::new(move |state, message| {
				let state = state.unwrap_or_else(|| initial_state.clone());
				if message.get("type").and_then(Value::as_str) != Some(action_type.as_str()) {
					return Ok(state);
				}
				let assignments = applied_assignments(&definition, &action_name, message, &state)?;
				tracing::trace!(action = %action_name, writes = assignments.len(), "applying action");
				tools.set_all(state, assignments)
			}))
		})
		.initial_state(DEFAULT_TYPE, |definition, action_name| {
			initial_assignments(definition, action_name)
		})
}
