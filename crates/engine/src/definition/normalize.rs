//! Normalization of JSON definitions into the canonical write-set.
//!
//! Accepted `result` shapes:
//! - mapping `{ target: "source.path" | { source, default, initial, value } }`
//! - list `[{ targetPath, sourcePath, defaultValue, initialValue, value, result }]`
//! - string `"list"` / `"entity"` combined with `resultName`
//! - absent, with top-level `resultName`/`targetPath`/`sourcePath`/`defaultValue`/
//!   `initialValue`/`value` describing a single write
//!
//! Shorthand fields next to a mapping or list `result` are rejected.
//!
//! Remaining fields are kept as plugin extras.

use serde_json::{Map, Value, json};

use super::{ActionDefinition, Assignment, DEFAULT_SOURCE, TargetPath, ValueSource, WriteSet};
use crate::error::{Error, Result};
use crate::path::kind_name;

/// Result shorthand whose initial value is an empty list.
const LIST_RESULT: &str = "list";

const SHORTHAND_KEYS: [&str; 6] = [
	"resultName",
	"targetPath",
	"sourcePath",
	"defaultValue",
	"initialValue",
	"value",
];

pub(super) fn normalize(action: &str, value: Value) -> Result<ActionDefinition> {
	let Value::Object(mut fields) = value else {
		return Err(Error::malformed(
			action,
			format!("expected an object, found {}", kind_name(&value)),
		));
	};

	let type_tag = match fields.remove("type") {
		Some(Value::String(tag)) => tag,
		Some(other) => {
			return Err(Error::malformed(
				action,
				format!("`type` must be a string, found {}", kind_name(&other)),
			));
		}
		None => return Err(Error::malformed(action, "missing `type`")),
	};

	let mut shorthand = Map::new();
	for key in SHORTHAND_KEYS {
		if let Some(value) = fields.remove(key) {
			shorthand.insert(key.to_owned(), value);
		}
	}

	let result = fields.remove("result");
	if matches!(result, Some(Value::Object(_) | Value::Array(_))) && !shorthand.is_empty() {
		let keys: Vec<&str> = shorthand.keys().map(String::as_str).collect();
		return Err(Error::malformed(
			action,
			format!(
				"declares both `result` and shorthand fields ({})",
				keys.join(", ")
			),
		));
	}

	let write_set = match result {
		Some(Value::Object(mapping)) => Some(
			mapping
				.into_iter()
				.map(|(target, spec)| mapping_entry(action, target, spec))
				.collect::<Result<Vec<_>>>()?,
		),
		Some(Value::Array(items)) => Some(
			items
				.into_iter()
				.map(|item| list_entry(action, item))
				.collect::<Result<Vec<_>>>()?,
		),
		Some(Value::String(kind)) => Some(vec![single(action, shorthand, Some(&kind))?]),
		Some(Value::Null) | None if shorthand.is_empty() => None,
		Some(Value::Null) | None => Some(vec![single(action, shorthand, None)?]),
		Some(other) => {
			return Err(Error::malformed(
				action,
				format!(
					"`result` must be a mapping, a list or a string, found {}",
					kind_name(&other)
				),
			));
		}
	};

	Ok(ActionDefinition {
		type_tag,
		write_set: write_set.map(WriteSet::Static),
		extra: fields,
	})
}

/// One `target: spec` entry of a result mapping.
fn mapping_entry(action: &str, target: String, spec: Value) -> Result<Assignment> {
	match spec {
		Value::String(path) => Ok(Assignment::to(target).from_path(path)),
		Value::Object(mut spec) => {
			let source = match (spec.remove("value"), spec.remove("source")) {
				(Some(value), _) => ValueSource::Constant(value),
				(None, Some(Value::String(path))) => ValueSource::FromPath(path),
				(None, None) => ValueSource::FromPath(DEFAULT_SOURCE.to_owned()),
				(None, Some(other)) => {
					return Err(Error::malformed(
						action,
						format!(
							"`source` of '{target}' must be a path string, found {}",
							kind_name(&other)
						),
					));
				}
			};
			Ok(Assignment {
				target: TargetPath::Static(target),
				source,
				default: spec.remove("default"),
				initial: spec.remove("initial"),
			})
		}
		other => Err(Error::malformed(
			action,
			format!(
				"value of '{target}' must be a source path or an object, found {}",
				kind_name(&other)
			),
		)),
	}
}

/// One element of the assignment-list form.
fn list_entry(action: &str, item: Value) -> Result<Assignment> {
	let Value::Object(mut item) = item else {
		return Err(Error::malformed(
			action,
			format!("result list entries must be objects, found {}", kind_name(&item)),
		));
	};
	let target = match item.remove("targetPath") {
		Some(Value::String(path)) => path,
		_ => {
			return Err(Error::malformed(
				action,
				"result list entries need a string `targetPath`",
			));
		}
	};
	let kind = item.remove("result");
	let is_list = kind.as_ref().and_then(Value::as_str) == Some(LIST_RESULT);
	let source = source_from(action, item.remove("value"), item.remove("sourcePath"))?;
	let initial = item
		.remove("initialValue")
		.or_else(|| is_list.then(|| json!([])));

	Ok(Assignment {
		target: TargetPath::Static(target),
		source,
		default: item.remove("defaultValue"),
		initial,
	})
}

/// The single implicit write described by top-level shorthand fields.
fn single(action: &str, mut shorthand: Map<String, Value>, kind: Option<&str>) -> Result<Assignment> {
	let target = match (shorthand.remove("targetPath"), shorthand.remove("resultName")) {
		(Some(Value::String(path)), _) | (None, Some(Value::String(path))) => path,
		(None, None) => action.to_owned(),
		(Some(other), _) | (None, Some(other)) => {
			return Err(Error::malformed(
				action,
				format!(
					"`targetPath`/`resultName` must be a string, found {}",
					kind_name(&other)
				),
			));
		}
	};
	let source = source_from(
		action,
		shorthand.remove("value"),
		shorthand.remove("sourcePath"),
	)?;
	let initial = shorthand
		.remove("initialValue")
		.or_else(|| (kind == Some(LIST_RESULT)).then(|| json!([])));

	Ok(Assignment {
		target: TargetPath::Static(target),
		source,
		default: shorthand.remove("defaultValue"),
		initial,
	})
}

fn source_from(action: &str, value: Option<Value>, path: Option<Value>) -> Result<ValueSource> {
	match (value, path) {
		(Some(value), _) => Ok(ValueSource::Constant(value)),
		(None, Some(Value::String(path))) => Ok(ValueSource::FromPath(path)),
		(None, None) => Ok(ValueSource::FromPath(DEFAULT_SOURCE.to_owned())),
		(None, Some(other)) => Err(Error::malformed(
			action,
			format!("`sourcePath` must be a string, found {}", kind_name(&other)),
		)),
	}
}
