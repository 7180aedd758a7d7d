//! Immutable path assignment over JSON state.
//!
//! State is owned [`Value`] data: [`set`] consumes the container and hands
//! back a new one in which only the ancestors of the written path were
//! rebuilt. Untouched siblings are moved across, never cloned, so their
//! allocations survive the write.
//!
//! Paths are delimiter-separated object keys (`.` by default). Writes never
//! interpret segments as array indices; reads through [`get`] do, so that a
//! message path such as `payload.items.0` can be copied into state.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Default path delimiter.
pub const DELIMITER: &str = ".";

/// Ordered set of path assignments, applied in insertion order.
pub type Assignments = Map<String, Value>;

/// Sets `value` at `path` inside `container` using the default delimiter.
///
/// An empty path replaces the whole container with `value`.
pub fn set(container: Value, path: &str, value: Value) -> Result<Value> {
	set_with(container, path, value, DELIMITER)
}

/// Sets `value` at `path` inside `container`, splitting on `delimiter`.
pub fn set_with(container: Value, path: &str, value: Value, delimiter: &str) -> Result<Value> {
	if path.is_empty() {
		return Ok(value);
	}
	let segments: Vec<&str> = path.split(delimiter).collect();
	set_segments(container, &segments, 0, value, path, delimiter)
}

/// Folds every assignment into `container` in order.
///
/// An empty mapping hands `container` back untouched.
pub fn set_all(container: Value, assignments: Assignments) -> Result<Value> {
	set_all_with(container, assignments, DELIMITER)
}

/// [`set_all`] with an explicit delimiter.
pub fn set_all_with(container: Value, assignments: Assignments, delimiter: &str) -> Result<Value> {
	assignments
		.into_iter()
		.try_fold(container, |acc, (path, value)| {
			set_with(acc, &path, value, delimiter)
		})
}

fn set_segments(
	container: Value,
	segments: &[&str],
	depth: usize,
	value: Value,
	path: &str,
	delimiter: &str,
) -> Result<Value> {
	let mut map = match container {
		Value::Object(map) => map,
		Value::Null if depth == 0 => Map::new(),
		other => {
			let segment = if depth == 0 {
				"(root)".to_owned()
			} else {
				segments[..depth].join(delimiter)
			};
			return Err(Error::InvalidPathTarget {
				path: path.to_owned(),
				segment,
				found: kind_name(&other),
			});
		}
	};

	let key = segments[depth];
	let next = if depth + 1 == segments.len() {
		value
	} else {
		// take() leaves a placeholder so the key keeps its position on reinsert
		let child = map
			.get_mut(key)
			.map(Value::take)
			.unwrap_or_else(|| Value::Object(Map::new()));
		set_segments(child, segments, depth + 1, value, path, delimiter)?
	};
	map.insert(key.to_owned(), next);
	Ok(Value::Object(map))
}

/// Reads the value at `path`, indexing arrays by numeric segments.
pub fn get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
	get_with(value, path, DELIMITER)
}

/// [`get`] with an explicit delimiter.
pub fn get_with<'a>(value: &'a Value, path: &str, delimiter: &str) -> Option<&'a Value> {
	if path.is_empty() {
		return Some(value);
	}
	path.split(delimiter)
		.try_fold(value, |current, segment| match current {
			Value::Object(map) => map.get(segment),
			Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
			_ => None,
		})
}

/// Returns true when `path` exists in `value`, even if it holds `null`.
pub fn has(value: &Value, path: &str) -> bool {
	get(value, path).is_some()
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

#[cfg(test)]
mod tests;
