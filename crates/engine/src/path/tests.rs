use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

use super::*;
use crate::error::Error;

fn str_ptr(value: &Value) -> *const u8 {
	value.as_str().expect("string value").as_ptr()
}

#[test]
fn sets_single_segment_keeping_siblings() {
	let out = set(json!({ "a": 1, "b": "keep" }), "a", json!(2)).unwrap();
	assert_eq!(out, json!({ "a": 2, "b": "keep" }));
}

#[test]
fn creates_missing_ancestors() {
	let out = set(json!({}), "deep.nested.field", json!(true)).unwrap();
	assert_eq!(out, json!({ "deep": { "nested": { "field": true } } }));
}

#[test]
fn refuses_to_descend_into_existing_null() {
	let err = set(json!({ "entity": null }), "entity.id", json!(7)).unwrap_err();
	assert!(matches!(
		err,
		Error::InvalidPathTarget { ref segment, found: "null", .. } if segment == "entity"
	));
}

#[test]
fn null_root_starts_empty() {
	let out = set(Value::Null, "entity.id", json!(7)).unwrap();
	assert_eq!(out, json!({ "entity": { "id": 7 } }));
}

/// Untouched branches are moved into the result, so their heap data is the
/// very same allocation as before the write.
#[test]
fn untouched_branches_keep_their_allocation() {
	let container = json!({
		"left": { "label": "untouched" },
		"right": { "count": 1, "tag": "sibling" },
	});
	let left_ptr = str_ptr(&container["left"]["label"]);
	let tag_ptr = str_ptr(&container["right"]["tag"]);

	let out = set(container, "right.count", json!(2)).unwrap();

	assert_eq!(out["right"]["count"], json!(2));
	assert_eq!(str_ptr(&out["left"]["label"]), left_ptr);
	assert_eq!(str_ptr(&out["right"]["tag"]), tag_ptr);
}

#[test]
fn rewritten_key_keeps_its_position() {
	let out = set(json!({ "a": {}, "b": 1, "c": 2 }), "a.x", json!(0)).unwrap();
	let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
	assert_eq!(keys, ["a", "b", "c"]);
}

#[test]
fn empty_path_replaces_container() {
	let out = set(json!({ "a": 1 }), "", json!([1, 2])).unwrap();
	assert_eq!(out, json!([1, 2]));
}

#[test]
fn empty_mapping_is_identity() {
	let container = json!({ "name": "same" });
	let ptr = str_ptr(&container["name"]);
	let out = set_all(container, Map::new()).unwrap();
	assert_eq!(str_ptr(&out["name"]), ptr);
}

#[test]
fn set_all_applies_in_order() {
	let mut assignments = Map::new();
	assignments.insert("a".into(), json!({ "b": 1 }));
	assignments.insert("a.c".into(), json!(2));
	let out = set_all(json!({}), assignments).unwrap();
	assert_eq!(out, json!({ "a": { "b": 1, "c": 2 } }));
}

#[test]
fn honours_custom_delimiter() {
	let out = set_with(json!({}), "a/b.c", json!(1), "/").unwrap();
	assert_eq!(out, json!({ "a": { "b.c": 1 } }));
	assert_eq!(get_with(&out, "a/b.c", "/"), Some(&json!(1)));
}

#[test]
fn refuses_to_descend_into_scalar() {
	let err = set(json!({ "a": { "b": 5 } }), "a.b.c", json!(1)).unwrap_err();
	match err {
		Error::InvalidPathTarget {
			path,
			segment,
			found,
		} => {
			assert_eq!(path, "a.b.c");
			assert_eq!(segment, "a.b");
			assert_eq!(found, "a number");
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[test]
fn refuses_to_descend_into_array() {
	let err = set(json!({ "list": [1, 2] }), "list.0", json!(3)).unwrap_err();
	assert!(
		matches!(err, Error::InvalidPathTarget { found: "an array", .. }),
		"array segments are not writable: {err}"
	);
}

#[test]
fn refuses_scalar_root() {
	let err = set(json!("text"), "a", json!(1)).unwrap_err();
	assert!(matches!(err, Error::InvalidPathTarget { ref segment, .. } if segment == "(root)"));
}

#[test]
fn get_reads_objects_and_array_indices() {
	let message = json!({ "payload": { "items": ["x", "y"], "empty": null } });
	assert_eq!(get(&message, "payload.items.1"), Some(&json!("y")));
	assert_eq!(get(&message, "payload.items.9"), None);
	assert_eq!(get(&message, "payload.missing"), None);
	assert_eq!(get(&message, ""), Some(&message));
}

#[test]
fn has_distinguishes_explicit_null_from_absence() {
	let message = json!({ "payload": { "empty": null } });
	assert!(has(&message, "payload.empty"));
	assert!(!has(&message, "payload.absent"));
}

fn arb_path() -> impl Strategy<Value = String> {
	prop::collection::vec("[c-h]{1,3}", 1..4).prop_map(|segments| segments.join("."))
}

proptest! {
	#[test]
	fn set_then_get_round_trips(path in arb_path(), n in any::<i64>()) {
		let container = json!({ "a": { "b": 1 }, "z": "sibling" });
		let out = set(container, &path, json!(n)).unwrap();
		prop_assert_eq!(get(&out, &path), Some(&json!(n)));
		prop_assert_eq!(&out["a"], &json!({ "b": 1 }));
		prop_assert_eq!(&out["z"], &json!("sibling"));
	}
}
