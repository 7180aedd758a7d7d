//! Turns a definition's write-set into concrete path assignments.
//!
//! Two evaluations exist. [`initial_assignments`] runs once per slice, before
//! any message, and only looks at each assignment's `initial` value.
//! [`applied_assignments`] runs per matching message and only looks at the
//! source and `default`.
//!
//! Applied value precedence:
//! 1. a computed source, called with the message and the current value at the target
//! 2. a constant source
//! 3. `default`, when the message has no value at the source path
//! 4. the message value at the source path (`null` when missing and no default is set)
//!
//! A source path holding an explicit `null` counts as present.

use serde_json::{Map, Value};

use crate::definition::{ActionDefinition, Assignment, ValueSource, WriteSet};
use crate::error::{Error, Result};
use crate::path::{self, Assignments};

/// Initial values for every target of `definition`.
///
/// Message-dependent write-sets and computed targets are evaluated against an
/// empty message.
pub fn initial_assignments(definition: &ActionDefinition, action: &str) -> Result<Assignments> {
	let write_set = require_write_set(definition, action)?;
	let empty = Value::Object(Map::new());

	let mut out = Assignments::new();
	for assignment in write_set.assignments(&empty) {
		let Some(target) = assignment.target.resolve(&empty) else {
			continue;
		};
		out.insert(target, assignment.initial.unwrap_or(Value::Null));
	}
	Ok(out)
}

/// Values `definition` writes into `state` for `message`.
pub fn applied_assignments(
	definition: &ActionDefinition,
	action: &str,
	message: &Value,
	state: &Value,
) -> Result<Assignments> {
	let write_set = require_write_set(definition, action)?;

	let mut out = Assignments::new();
	for assignment in write_set.assignments(message) {
		let Some(target) = assignment.target.resolve(message) else {
			tracing::trace!(action, "computed target skipped");
			continue;
		};
		let value = applied_value(&assignment, message, path::get(state, &target));
		out.insert(target, value);
	}
	Ok(out)
}

/// Resolves one assignment's value for `message`.
pub fn applied_value(assignment: &Assignment, message: &Value, current: Option<&Value>) -> Value {
	match &assignment.source {
		ValueSource::Computed(f) => f(message, current),
		ValueSource::Constant(value) => value.clone(),
		ValueSource::FromPath(source) => match path::get(message, source) {
			Some(value) => value.clone(),
			None => assignment.default.clone().unwrap_or(Value::Null),
		},
	}
}

fn require_write_set<'a>(definition: &'a ActionDefinition, action: &str) -> Result<&'a WriteSet> {
	definition
		.write_set()
		.ok_or_else(|| Error::malformed(action, "declares no `result` or result shorthand"))
}
