// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ability naming conventions.
//!
//! - [`ability_to_method`] maps an ability name onto the policy method that
//!   answers it (`delete-post` is answered by `deletePost`).
//! - [`RESOURCE_ABILITIES`] lists the abilities a resource registration
//!   expands into.
//! - [`resource_ability_map`] maps request handler names (`index`, `store`,
//!   ...) onto those abilities.

/// The `(ability, method)` pairs a resource registration expands into.
pub const RESOURCE_ABILITIES: &[(&str, &str)] = &[
	("viewAny", "viewAny"),
	("view", "view"),
	("create", "create"),
	("update", "update"),
	("delete", "delete"),
];

/// Request handler names mapped to the resource ability they require.
pub const RESOURCE_METHOD_ABILITIES: &[(&str, &str)] = &[
	("index", "viewAny"),
	("show", "view"),
	("create", "create"),
	("store", "create"),
	("edit", "update"),
	("update", "update"),
	("destroy", "delete"),
];

/// Request handlers that operate on the resource type rather than an instance.
pub const RESOURCE_METHODS_WITHOUT_MODELS: &[&str] = &["index", "create", "store"];

/// Returns the policy method name answering `ability`.
///
/// Names containing `-` are camel-cased; anything else is used as-is.
pub fn ability_to_method(ability: &str) -> String {
	if ability.contains('-') {
		camel_case(ability)
	} else {
		ability.to_string()
	}
}

fn camel_case(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for word in value
		.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
		.filter(|w| !w.is_empty())
	{
		let mut chars = word.chars();
		if let Some(first) = chars.next() {
			if out.is_empty() {
				out.extend(first.to_lowercase());
			} else {
				out.extend(first.to_uppercase());
			}
			out.push_str(chars.as_str());
		}
	}
	out
}

/// Looks up the ability a request handler requires.
pub fn resource_ability_map(method: &str) -> Option<&'static str> {
	RESOURCE_METHOD_ABILITIES
		.iter()
		.find(|(handler, _)| *handler == method)
		.map(|(_, ability)| *ability)
}

/// Maps a handler name onto its resource ability, or keeps it unchanged.
pub fn normalize_guessed_ability_name(method: &str) -> String {
	resource_ability_map(method)
		.map(str::to_string)
		.unwrap_or_else(|| method.to_string())
}

/// True when the handler does not take a subject instance.
pub fn is_method_without_model(method: &str) -> bool {
	RESOURCE_METHODS_WITHOUT_MODELS.contains(&method)
}
