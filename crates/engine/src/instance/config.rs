use crate::plugin::{AdapterKind, KeyMapper, MergeOptions};

/// Instance configuration.
#[derive(Debug, Clone)]
pub struct BreezeConfig {
	/// Merge the built-in `default` plugin before user plugins.
	pub use_default_plugin: bool,
	/// Fail on adapter key collisions instead of letting the later plugin win.
	pub strict: bool,
	/// Renames adapter keys per plugin before detection and merge.
	///
	/// Definitions refer to adapters by the mapped key.
	pub map_action_types: KeyMapper,
}

impl Default for BreezeConfig {
	fn default() -> Self {
		Self {
			use_default_plugin: true,
			strict: true,
			map_action_types: KeyMapper::identity(),
		}
	}
}

impl BreezeConfig {
	pub fn with_default_plugin(mut self, enabled: bool) -> Self {
		self.use_default_plugin = enabled;
		self
	}

	pub fn with_strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	pub fn with_map_action_types<F>(mut self, f: F) -> Self
	where
		F: Fn(&str, &str, AdapterKind) -> String + Send + Sync + 'static,
	{
		self.map_action_types = KeyMapper::new(f);
		self
	}

	pub(crate) fn merge_options(&self) -> MergeOptions {
		MergeOptions {
			strict: self.strict,
			map_key: self.map_action_types.clone(),
		}
	}
}
