//! Action type naming convention.

use heck::ToShoutySnakeCase;

/// Builds the dispatched type string for an action name.
///
/// The name is converted to `UPPER_SNAKE_CASE`; a prefix is prepended as
/// `PREFIX_` and a suffix appended as `_SUFFIX`, both converted the same way.
/// Empty prefixes and suffixes are ignored. Digit runs form their own words,
/// so `fetchPage2` becomes `FETCH_PAGE_2`.
///
/// ```
/// use breeze_engine::create_action_type;
///
/// assert_eq!(create_action_type("someAction", "", ""), "SOME_ACTION");
/// assert_eq!(create_action_type("someAction", "success", ""), "SOME_ACTION_SUCCESS");
/// ```
pub fn create_action_type(action_name: &str, suffix: &str, prefix: &str) -> String {
	let mut out = String::new();
	if !prefix.is_empty() {
		out.push_str(&shouty_snake(prefix));
		out.push('_');
	}
	out.push_str(&shouty_snake(action_name));
	if !suffix.is_empty() {
		out.push('_');
		out.push_str(&shouty_snake(suffix));
	}
	out
}

fn shouty_snake(word: &str) -> String {
	split_digit_runs(word).to_shouty_snake_case()
}

/// Puts a word boundary between every letter and digit run.
fn split_digit_runs(word: &str) -> String {
	let mut out = String::with_capacity(word.len() + 4);
	let mut previous: Option<char> = None;
	for c in word.chars() {
		if let Some(p) = previous
			&& ((p.is_ascii_digit() && c.is_alphabetic())
				|| (p.is_alphabetic() && c.is_ascii_digit()))
		{
			out.push('_');
		}
		out.push(c);
		previous = Some(c);
	}
	out
}
