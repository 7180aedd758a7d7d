use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::definition::{ActionDefinition, Assignment};
use crate::error::Error;

fn bundle(name: &str, actions: &[&str], reducers: &[&str]) -> AdapterBundle {
	let mut bundle = AdapterBundle::new(name);
	for key in actions {
		bundle = bundle.action(*key, |_, _, _| Ok(ActionCreator::new(|params| params)));
	}
	for key in reducers {
		bundle = bundle.reducer(*key, |_, _, _| {
			Ok(Reducer::new(|state, _| Ok(state.unwrap_or(Value::Null))))
		});
	}
	bundle
}

/// Action adapter whose creator reports which bundle built it.
fn tagged(name: &'static str) -> AdapterBundle {
	AdapterBundle::new(name).action("shared", move |_, _, _| {
		Ok(ActionCreator::new(move |_| json!({ "from": name })))
	})
}

fn namespaced() -> KeyMapper {
	KeyMapper::new(|key, plugin, _| format!("{plugin}/{key}"))
}

#[test]
fn no_conflicts_between_disjoint_bundles() {
	let bundles = [bundle("a", &["one"], &["one"]), bundle("b", &["two"], &["two"])];
	for kind in AdapterKind::ALL {
		let report = find_conflicts(&bundles, kind, &KeyMapper::identity());
		assert!(report.is_empty());
		assert_eq!(report.to_string(), "");
	}
}

#[test]
fn conflicts_list_every_owner_in_bundle_order() {
	let bundles = [
		bundle("a", &["x", "y"], &[]),
		bundle("b", &["x"], &[]),
		bundle("c", &["y", "x"], &[]),
	];
	let report = find_conflicts(&bundles, AdapterKind::Action, &KeyMapper::identity());

	assert_eq!(
		report.conflicts,
		vec![
			Conflict {
				kind: AdapterKind::Action,
				key: "x".into(),
				plugins: vec!["a".into(), "b".into(), "c".into()],
			},
			Conflict {
				kind: AdapterKind::Action,
				key: "y".into(),
				plugins: vec!["a".into(), "c".into()],
			},
		]
	);
	assert_eq!(
		report.to_string(),
		"actionAdapter 'x' is defined in plugins: a,b,c; actionAdapter 'y' is defined in plugins: a,c"
	);
}

#[test]
fn conflicts_are_symmetric_in_emptiness() {
	let a = bundle("a", &["x"], &[]);
	let b = bundle("b", &["x"], &[]);
	let forward = find_conflicts(&[a.clone(), b.clone()], AdapterKind::Action, &KeyMapper::identity());
	let backward = find_conflicts(&[b, a], AdapterKind::Action, &KeyMapper::identity());
	assert_eq!(forward.is_empty(), backward.is_empty());
	assert_eq!(backward.conflicts[0].plugins, vec!["b", "a"]);
}

#[test]
fn conflicts_only_within_one_kind() {
	let bundles = [bundle("a", &["x"], &[]), bundle("b", &[], &["x"])];
	for kind in AdapterKind::ALL {
		assert!(find_conflicts(&bundles, kind, &KeyMapper::identity()).is_empty());
	}
}

#[test]
fn mapper_sees_key_plugin_and_kind() {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let record = Arc::clone(&seen);
	let mapper = KeyMapper::new(move |key, plugin, kind| {
		record
			.lock()
			.unwrap()
			.push(format!("{kind}:{plugin}:{key}"));
		key.to_owned()
	});

	let bundles = [bundle("a", &[], &["x"]), bundle("b", &[], &["y"])];
	find_conflicts(&bundles, AdapterKind::Reducer, &mapper);
	assert_eq!(
		*seen.lock().unwrap(),
		vec!["reducerAdapter:a:x", "reducerAdapter:b:y"]
	);
}

#[test]
fn mapper_can_resolve_conflicts() {
	let bundles = [bundle("a", &["x"], &[]), bundle("b", &["x"], &[])];
	assert!(find_conflicts(&bundles, AdapterKind::Action, &namespaced()).is_empty());
}

#[test]
fn strict_merge_reports_every_kind() {
	let bundles = [bundle("a", &["x"], &["r"]), bundle("b", &["x"], &["r"])];
	let err = merge(&bundles, &MergeOptions::default()).unwrap_err();

	assert!(matches!(err, Error::AdapterConflict { .. }));
	assert_eq!(
		err.to_string(),
		"Conflicts in adapters: actionAdapters, reducerAdapters. \
		 actionAdapter 'x' is defined in plugins: a,b. \
		 reducerAdapter 'r' is defined in plugins: a,b."
	);
}

#[test]
fn lenient_merge_lets_the_later_bundle_win() {
	let options = MergeOptions {
		strict: false,
		..MergeOptions::default()
	};
	let registry = merge(&[tagged("first"), tagged("second")], &options).unwrap();

	let definition = ActionDefinition::new("shared");
	let adapter = registry.actions().resolve("shared", "anything").unwrap();
	let creator = adapter(&definition, "anything", None).unwrap();
	assert_eq!(creator.create(Value::Null), json!({ "from": "second" }));

	assert_eq!(registry.collisions().len(), 1);
	assert_eq!(registry.collisions()[0].plugins, vec!["first", "second"]);
}

#[test]
fn merge_registers_mapped_keys() {
	let options = MergeOptions {
		strict: true,
		map_key: namespaced(),
	};
	let registry = merge(&[tagged("first"), tagged("second")], &options).unwrap();

	assert_eq!(
		registry.actions().keys().collect::<Vec<_>>(),
		vec!["first/shared", "second/shared"]
	);
	assert!(!registry.actions().contains("shared"));
	assert!(registry.collisions().is_empty());
}

#[rstest]
#[case(AdapterKind::Action, "actionAdapter")]
#[case(AdapterKind::Reducer, "reducerAdapter")]
#[case(AdapterKind::InitialState, "initialStateAdapter")]
fn unresolved_type_names_the_kind(#[case] kind: AdapterKind, #[case] label: &str) {
	let table: AdapterTable<()> = AdapterTable::new(kind);
	let err = table.resolve("custom", "doThing").unwrap_err();
	let message = err.to_string();
	assert!(message.contains("'custom'"), "{message}");
	assert!(message.contains("'doThing'"), "{message}");
	assert!(message.contains(label), "{message}");
}

#[test]
fn table_register_replaces() {
	let mut table = AdapterTable::new(AdapterKind::Action);
	assert_eq!(table.register("k", 1), None);
	assert_eq!(table.register("k", 2), Some(1));
	assert_eq!(table.get("k"), Some(&2));
	assert_eq!(table.len(), 1);
}

#[test]
fn default_plugin_action_wraps_params() {
	let bundle = default_plugin(&Tools, &BreezeConfig::default());
	let registry = merge(&[bundle], &MergeOptions::default()).unwrap();
	let definition = ActionDefinition::new(DEFAULT_TYPE).assign(Assignment::to("value"));
	let adapter = registry.actions().resolve(DEFAULT_TYPE, "setValue").unwrap();
	let creator = adapter(&definition, "setValue", None).unwrap();

	assert_eq!(
		creator.create(json!({ "id": 3 })),
		json!({ "type": "SET_VALUE", "payload": { "id": 3 } })
	);
}

#[test]
fn default_plugin_splits_digits_in_types() {
	let bundle = default_plugin(&Tools, &BreezeConfig::default());
	let registry = merge(&[bundle], &MergeOptions::default()).unwrap();
	let definition = ActionDefinition::new(DEFAULT_TYPE).assign(Assignment::to("page"));

	let adapter = registry.actions().resolve(DEFAULT_TYPE, "fetchPage2").unwrap();
	let message = adapter(&definition, "fetchPage2", None).unwrap().create(json!(2));
	assert_eq!(message, json!({ "type": "FETCH_PAGE_2", "payload": 2 }));

	let adapter = registry.reducers().resolve(DEFAULT_TYPE, "fetchPage2").unwrap();
	let reducer = adapter(&definition, "fetchPage2", &json!({ "page": null })).unwrap();
	assert_eq!(reducer.apply(None, &message).unwrap(), json!({ "page": 2 }));
}

#[test]
fn default_plugin_reducer_ignores_other_types() {
	let bundle = default_plugin(&Tools, &BreezeConfig::default());
	let registry = merge(&[bundle], &MergeOptions::default()).unwrap();
	let definition = ActionDefinition::new(DEFAULT_TYPE).assign(Assignment::to("value"));
	let initial = json!({ "value": 0 });
	let adapter = registry.reducers().resolve(DEFAULT_TYPE, "setValue").unwrap();
	let reducer = adapter(&definition, "setValue", &initial).unwrap();

	assert_eq!(reducer.initial_state().unwrap(), initial);
	assert_eq!(
		reducer
			.apply(Some(json!({ "value": 1 })), &json!({ "type": "OTHER", "payload": 9 }))
			.unwrap(),
		json!({ "value": 1 })
	);
	assert_eq!(
		reducer
			.apply(Some(json!({ "value": 1 })), &json!({ "type": "SET_VALUE", "payload": 9 }))
			.unwrap(),
		json!({ "value": 9 })
	);
}

#[test]
fn default_plugin_reducer_rejects_missing_write_set() {
	let bundle = default_plugin(&Tools, &BreezeConfig::default());
	let registry = merge(&[bundle], &MergeOptions::default()).unwrap();
	let definition = ActionDefinition::new(DEFAULT_TYPE);
	let adapter = registry.reducers().resolve(DEFAULT_TYPE, "noop").unwrap();
	let reducer = adapter(&definition, "noop", &json!({})).unwrap();

	let err = reducer
		.apply(None, &json!({ "type": "NOOP" }))
		.unwrap_err();
	assert!(matches!(err, Error::MalformedDefinition { ref action, .. } if action == "noop"));
}

#[test]
fn tools_forward_to_engine_functions() {
	let tools = Tools;
	assert_eq!(tools.create_action_type("loadAll", "success", "api"), "API_LOAD_ALL_SUCCESS");

	let state = tools.set(json!({}), "a.b", json!(1)).unwrap();
	assert_eq!(tools.get(&state, "a.b"), Some(&json!(1)));
	assert!(tools.has(&state, "a"));
	assert!(!tools.has(&state, "a.missing"));

	let mut writes = crate::path::Assignments::new();
	writes.insert("a.c".into(), json!(2));
	assert_eq!(tools.set_all(state, writes).unwrap(), json!({ "a": { "b": 1, "c": 2 } }));

	let bundles = [bundle("a", &["x"], &[]), bundle("b", &["x"], &[])];
	assert!(!tools.find_conflicts(&bundles, AdapterKind::Action, &KeyMapper::identity()).is_empty());
	assert!(tools.merge(&bundles, &MergeOptions::default()).is_err());
}

#[test]
fn closures_are_plugins() {
	let plugin = |_: &Tools, config: &BreezeConfig| {
		AdapterBundle::new(if config.strict { "strict" } else { "lenient" })
	};
	let config = BreezeConfig::default().with_strict(false);
	assert_eq!(plugin.build(&Tools, &config).name(), "lenient");
}
