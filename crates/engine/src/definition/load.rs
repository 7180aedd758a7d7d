//! Loading definitions from JSON and TOML documents.
//!
//! Documents have the shape `{ slice: { action: definition } }`. Slice and
//! action order follow the document, which fixes reducer chain order.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{ActionDefinition, ActionDefinitions};
use crate::error::Result;

#[derive(Deserialize)]
#[serde(transparent)]
struct RawDefinitions(IndexMap<String, IndexMap<String, Value>>);

impl ActionDefinitions {
	pub fn from_json_str(input: &str) -> Result<Self> {
		let raw: RawDefinitions = serde_json::from_str(input)?;
		Self::from_raw(raw)
	}

	pub fn from_toml_str(input: &str) -> Result<Self> {
		let raw: RawDefinitions = toml::from_str(input)?;
		Self::from_raw(raw)
	}

	pub fn from_value(value: Value) -> Result<Self> {
		let raw: RawDefinitions = serde_json::from_value(value)?;
		Self::from_raw(raw)
	}

	fn from_raw(RawDefinitions(raw): RawDefinitions) -> Result<Self> {
		let mut definitions = Self::new();
		for (slice, actions) in raw {
			let entry = definitions.slices.entry(slice).or_default();
			for (action, value) in actions {
				let definition = ActionDefinition::from_value(&action, value)?;
				entry.insert(action, definition);
			}
		}
		tracing::debug!(slices = definitions.len(), "loaded action definitions");
		Ok(definitions)
	}
}
