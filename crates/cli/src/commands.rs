//! Subcommand implementations.
//!
//! Every command renders its output to a string; `main` only prints it.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};
use breeze_engine::{ActionDefinitions, BreezeConfig, Instance, create_instance};
use indexmap::IndexMap;
use serde_json::Value;

use crate::cli::Command;

pub fn run(command: Command, config: BreezeConfig) -> anyhow::Result<String> {
	match command {
		Command::Init { definitions } => {
			let instance = load_instance(&definitions, config)?;
			render(&dispatch(&instance, Vec::new(), false)?)
		}
		Command::Dispatch {
			definitions,
			messages,
			trace,
		} => {
			let instance = load_instance(&definitions, config)?;
			let input = fs::read_to_string(&messages)
				.with_context(|| format!("failed to read messages from {}", messages.display()))?;
			render(&dispatch(&instance, parse_messages(&input)?, trace)?)
		}
		Command::Action {
			definitions,
			name,
			params,
		} => {
			let instance = load_instance(&definitions, config)?;
			render(&create_message(&instance, &name, params.as_deref())?)
		}
		Command::Types { definitions } => {
			let instance = load_instance(&definitions, config)?;
			Ok(list_types(&instance))
		}
	}
}

fn load_instance(path: &Path, config: BreezeConfig) -> anyhow::Result<Instance> {
	let input = fs::read_to_string(path)
		.with_context(|| format!("failed to read definitions from {}", path.display()))?;
	let definitions = parse_definitions(path, &input)?;
	Ok(create_instance(definitions, config, &[])?)
}

/// Parses definitions as TOML for `.toml` files and as JSON otherwise.
pub fn parse_definitions(path: &Path, input: &str) -> anyhow::Result<ActionDefinitions> {
	let is_toml = path
		.extension()
		.is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
	let definitions = if is_toml {
		ActionDefinitions::from_toml_str(input)
	} else {
		ActionDefinitions::from_json_str(input)
	};
	definitions.with_context(|| format!("failed to load definitions from {}", path.display()))
}

pub fn parse_messages(input: &str) -> anyhow::Result<Vec<Value>> {
	match serde_json::from_str::<Value>(input).context("messages are not valid JSON")? {
		Value::Array(messages) => Ok(messages),
		_ => bail!("messages must be a JSON array"),
	}
}

/// Folds `messages` through the root reducer, starting from the initial state.
///
/// Returns the final state, or with `trace` the state after each message.
pub fn dispatch(instance: &Instance, messages: Vec<Value>, trace: bool) -> anyhow::Result<Value> {
	let root = instance.combine_reducers(IndexMap::new())?;
	let mut state = root.initial_state()?;
	let mut trail = Vec::new();
	for (index, message) in messages.iter().enumerate() {
		state = root
			.apply(Some(state), message)
			.with_context(|| format!("message {index} could not be applied"))?;
		tracing::debug!(index, message_type = ?message.get("type"), "dispatched message");
		if trace {
			trail.push(state.clone());
		}
	}
	Ok(if trace { Value::Array(trail) } else { state })
}

pub fn create_message(instance: &Instance, name: &str, params: Option<&str>) -> anyhow::Result<Value> {
	let params = match params {
		Some(raw) => serde_json::from_str::<Value>(raw).context("--params is not valid JSON")?,
		None => Value::Null,
	};
	let creator = instance.get_action(name, None)?;
	Ok(creator.create(params))
}

/// One `slice.action<TAB>TYPE` line per action.
pub fn list_types(instance: &Instance) -> String {
	instance
		.action_types()
		.into_iter()
		.map(|(slice, action, action_type)| format!("{slice}.{action}\t{action_type}\n"))
		.collect()
}

fn render(value: &Value) -> anyhow::Result<String> {
	let mut out = serde_json::to_string_pretty(value)?;
	out.push('\n');
	Ok(out)
}
