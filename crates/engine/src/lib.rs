//! Declarative state-management engine.
//!
//! Action definitions name a slice, an action and a `type`; the engine
//! compiles them through adapter plugins into action creators and one
//! combined reducer over JSON state.
//!
//! # Modules
//!
//! - [`path`] - immutable dotted-path writes and reads over [`serde_json::Value`]
//! - [`definition`] - definition model, normalization and JSON/TOML loading
//! - [`resolve`] - write-set evaluation against a message
//! - [`reducer`] - reducer chaining and per-slice combination
//! - [`plugin`] - adapter bundles, collision detection, merging, the default plugin
//! - [`instance`] - [`create_instance`] and the compiled [`Instance`]
//!
//! # Example
//!
//! ```
//! use breeze_engine::{ActionDefinitions, BreezeConfig, create_instance};
//! use serde_json::json;
//!
//! let definitions = ActionDefinitions::from_value(json!({
//! 	"todos": {
//! 		"setFilter": { "type": "default", "result": { "filter": "payload" } },
//! 	},
//! }))?;
//! let instance = create_instance(definitions, BreezeConfig::default(), &[])?;
//!
//! let reducer = instance.combine_reducers(Default::default())?;
//! let set_filter = instance.get_action("setFilter", None)?;
//!
//! let state = reducer.initial_state()?;
//! let state = reducer.apply(Some(state), &set_filter.create(json!("done")))?;
//! assert_eq!(state, json!({ "todos": { "filter": "done" } }));
//! # Ok::<(), breeze_engine::Error>(())
//! ```

mod action_type;
pub mod definition;
mod error;
pub mod instance;
pub mod path;
pub mod plugin;
pub mod reducer;
pub mod resolve;

pub use action_type::create_action_type;
pub use definition::{ActionDefinition, ActionDefinitions, Assignment};
pub use error::{Error, Result};
pub use instance::{BreezeConfig, Instance, create_instance};
pub use plugin::{
	ActionCreator, AdapterBundle, AdapterKind, KeyMapper, MergeOptions, MergedRegistry, Plugin,
	Tools,
};
pub use reducer::{Reducer, chain, combine};
