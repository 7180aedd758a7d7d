//! Collision detection between adapter bundles.

use std::fmt;

use indexmap::IndexMap;

use super::{AdapterBundle, AdapterKind, KeyMapper};

/// A mapped key registered by more than one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
	pub kind: AdapterKind,
	/// The key after mapping.
	pub key: String,
	/// Contributing bundle names, in bundle order.
	pub plugins: Vec<String>,
}

impl fmt::Display for Conflict {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} '{}' is defined in plugins: {}",
			self.kind,
			self.key,
			self.plugins.join(",")
		)
	}
}

/// Every collision found for one adapter kind.
///
/// Displays as the `"; "`-joined clauses, or as an empty string when there
/// are none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
	pub kind: AdapterKind,
	pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
	pub fn is_empty(&self) -> bool {
		self.conflicts.is_empty()
	}
}

impl fmt::Display for ConflictReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, conflict) in self.conflicts.iter().enumerate() {
			if i > 0 {
				f.write_str("; ")?;
			}
			write!(f, "{conflict}")?;
		}
		Ok(())
	}
}

/// Finds keys of `kind` that more than one bundle registers once mapped by `map_key`.
///
/// Keys are reported in the order they were first seen walking the bundles
/// in list order.
pub fn find_conflicts(
	bundles: &[AdapterBundle],
	kind: AdapterKind,
	map_key: &KeyMapper,
) -> ConflictReport {
	let mut owners: IndexMap<String, Vec<String>> = IndexMap::new();
	for bundle in bundles {
		for key in bundle.keys(kind) {
			owners
				.entry(map_key.map(key, bundle.name(), kind))
				.or_default()
				.push(bundle.name().to_owned());
		}
	}

	let conflicts = owners
		.into_iter()
		.filter(|(_, plugins)| plugins.len() > 1)
		.map(|(key, plugins)| Conflict { kind, key, plugins })
		.collect();
	ConflictReport { kind, conflicts }
}
