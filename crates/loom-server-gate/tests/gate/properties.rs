// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Algebraic properties of gate decisions.

use std::collections::HashSet;
use std::sync::Arc;

use loom_server_gate::{AfterHook, Arguments, Callback, Container, Gate, Hook, Outcome, Response};
use proptest::prelude::*;

use super::support::User;

const ABILITIES: &[&str] = &["a", "b", "c", "d", "e", "f"];

/// A gate defining `allowed` as allowing abilities and the rest of
/// [`ABILITIES`] as denying ones.
fn gate_allowing(allowed: &HashSet<&'static str>) -> Gate<User> {
	let gate: Gate<User> = Gate::new(Arc::new(Container::new()), || None);
	for ability in ABILITIES {
		let allow = allowed.contains(ability);
		gate.define(ability, Callback::new(move |_user: &User, _args: &Arguments| allow))
			.unwrap();
	}
	gate.for_principal(User::new(1))
}

fn ability_subset() -> impl Strategy<Value = HashSet<&'static str>> {
	proptest::sample::subsequence(ABILITIES.to_vec(), 0..=ABILITIES.len())
		.prop_map(|abilities| abilities.into_iter().collect())
}

fn ability_list() -> impl Strategy<Value = Vec<&'static str>> {
	proptest::collection::vec(proptest::sample::select(ABILITIES.to_vec()), 0..6)
}

proptest! {
	#[test]
	fn allows_is_the_negation_of_denies(allowed in ability_subset(), ability in proptest::sample::select(ABILITIES.to_vec())) {
		let gate = gate_allowing(&allowed);
		prop_assert_eq!(gate.allows(ability, ()).unwrap(), !gate.denies(ability, ()).unwrap());
		prop_assert_eq!(gate.allows(ability, ()).unwrap(), allowed.contains(ability));
	}

	#[test]
	fn check_any_none_agree_with_individual_decisions(allowed in ability_subset(), abilities in ability_list()) {
		let gate = gate_allowing(&allowed);
		let each: Vec<bool> = abilities.iter().map(|a| gate.allows(a, ()).unwrap()).collect();

		prop_assert_eq!(gate.check(&abilities, ()).unwrap(), each.iter().all(|allowed| *allowed));
		prop_assert_eq!(gate.any(&abilities, ()).unwrap(), each.iter().any(|allowed| *allowed));
		prop_assert_eq!(gate.none(&abilities, ()).unwrap(), !gate.any(&abilities, ()).unwrap());
	}

	#[test]
	fn truthy_before_hook_allows_everything(ability in "[a-z][a-z.-]{0,12}") {
		let gate: Gate<User> = Gate::new(Arc::new(Container::new()), || None);
		gate.before(Hook::allow_guests(|_user: Option<&User>, _ability: &str, _args: &Arguments| true));

		prop_assert!(gate.allows(&ability, ()).unwrap());
		prop_assert!(gate.for_guest().allows(&ability, ()).unwrap());
	}

	#[test]
	fn unregistered_abilities_are_denied_without_error(ability in "[a-z][a-z.-]{0,12}") {
		let gate: Gate<User> = Gate::new(Arc::new(Container::new()), || Some(User::new(1)));
		prop_assert!(!gate.has([ability.as_str()]));
		prop_assert!(gate.denies(&ability, ()).unwrap());
		prop_assert!(gate.for_guest().denies(&ability, ()).unwrap());
	}

	#[test]
	fn after_hooks_never_downgrade_an_allow(answers in proptest::collection::vec(proptest::option::of(any::<bool>()), 0..5)) {
		let gate: Gate<User> = Gate::new(Arc::new(Container::new()), || Some(User::new(1)));
		gate.define("open", Callback::new(|_user: &User, _args: &Arguments| Response::allow_with("ok", None)))
			.unwrap();
		for answer in answers {
			gate.after(AfterHook::new(move |_user: &User, _ability: &str, _result: Option<&Outcome>, _args: &Arguments| {
				answer.map(|allowed| Response::new(allowed, Some("after".to_string()), None))
			}));
		}

		let response = gate.inspect("open", ()).unwrap();
		prop_assert!(response.allowed());
		prop_assert_eq!(response.message(), Some("ok"));
	}

	#[test]
	fn authorize_error_carries_the_denying_response(message in "[A-Za-z ]{1,24}", code in any::<u16>()) {
		let gate: Gate<User> = Gate::new(Arc::new(Container::new()), || Some(User::new(1)));
		let denial = Response::deny_with(message.clone(), Some(code.into()));
		let returned = denial.clone();
		gate.define("guarded", Callback::new(move |_user: &User, _args: &Arguments| returned.clone()))
			.unwrap();

		let err = gate.authorize("guarded", ()).unwrap_err();
		let carried = err.as_authorization().map(|e| e.response().clone());
		prop_assert_eq!(carried, Some(denial));
	}
}

#[test]
fn empty_ability_lists() {
	let gate = gate_allowing(&HashSet::new());
	let none: [&str; 0] = [];
	assert!(gate.check(none, ()).unwrap());
	assert!(!gate.any(none, ()).unwrap());
	assert!(gate.none(none, ()).unwrap());
}
