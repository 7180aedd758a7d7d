use thiserror::Error;

use crate::plugin::AdapterKind;

/// Result alias used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while merging plugins, compiling definitions or reducing state.
///
/// None of these are recovered internally. They describe wiring or data-shape
/// mistakes on the caller's side, so retrying with the same input always
/// fails the same way.
#[derive(Debug, Error)]
pub enum Error {
	/// Two or more plugins register the same adapter key in strict mode.
	#[error("Conflicts in adapters: {kinds}. {detail}.")]
	AdapterConflict {
		/// Comma-separated conflicting adapter kinds (`actionAdapters, ...`).
		kinds: String,
		/// Per-kind conflict reports joined with `". "`.
		detail: String,
	},

	/// No adapter of `kind` is registered for a declared `type`.
	#[error(
		"unknown type '{type_tag}' of action '{action}': no {kind} is registered for it, most likely the plugin handling this type is not installed"
	)]
	UnresolvedType {
		kind: AdapterKind,
		type_tag: String,
		action: String,
	},

	/// `get_action` was asked for a name that no slice defines.
	#[error("action '{action}' has not been found")]
	ActionNotFound { action: String },

	/// A path segment holds something other than an object.
	#[error("cannot set path '{path}': segment '{segment}' holds {found}, not an object")]
	InvalidPathTarget {
		path: String,
		segment: String,
		found: &'static str,
	},

	/// A definition cannot be normalized into a write-set.
	#[error("malformed definition for action '{action}': {reason}")]
	MalformedDefinition { action: String, reason: String },

	#[error("invalid JSON definitions: {0}")]
	Json(#[from] serde_json::Error),

	#[error("invalid TOML definitions: {0}")]
	Toml(#[from] toml::de::Error),
}

impl Error {
	pub(crate) fn malformed(action: &str, reason: impl Into<String>) -> Self {
		Self::MalformedDefinition {
			action: action.to_owned(),
			reason: reason.into(),
		}
	}
}
