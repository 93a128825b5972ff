// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Global before/after hooks around real policies.

use std::sync::{Arc, Mutex};

use loom_server_gate::{AfterHook, Argument, Arguments, Callback, Hook, Outcome, Response};

use super::support::{gate, Post, User};

#[test]
fn admin_before_hook_bypasses_policies_and_unknown_abilities() {
	let gate = gate();
	gate.before(Hook::new(|user: &User, _ability: &str, _args: &Arguments| {
		user.admin.then_some(true)
	}));

	let admin = gate.for_principal(User::admin(1));
	assert!(admin
		.allows("update", Argument::model(Post::owned_by(2)))
		.unwrap());
	assert!(admin.allows("never-defined", ()).unwrap());
	assert!(gate
		.for_principal(User::new(3))
		.denies("update", Argument::model(Post::owned_by(2)))
		.unwrap());
}

#[test]
fn after_hooks_observe_every_decision() {
	let seen: Arc<Mutex<Vec<(String, Option<bool>)>>> = Arc::default();
	let gate = gate();
	let log = Arc::clone(&seen);
	gate.after(AfterHook::allow_guests(
		move |_user: Option<&User>, ability: &str, result: Option<&Outcome>, _args: &Arguments| {
			log.lock()
				.unwrap()
				.push((ability.to_string(), result.map(Outcome::is_allowed)));
		},
	));

	let owner = gate.for_principal(User::new(1));
	owner.allows("update", Argument::model(Post::owned_by(1))).unwrap();
	owner.allows("update", Argument::model(Post::owned_by(2))).unwrap();
	gate.for_guest().allows("nothing", ()).unwrap();

	assert_eq!(
		*seen.lock().unwrap(),
		vec![
			("update".to_string(), Some(true)),
			("update".to_string(), Some(false)),
			("nothing".to_string(), None),
		]
	);
}

#[test]
fn after_hooks_can_grant_but_never_revoke() {
	let gate = gate();
	gate.define("publish", Callback::new(|user: &User, _args: &Arguments| user.id == 1))
		.unwrap();
	gate.after(AfterHook::new(
		|user: &User, ability: &str, _result: Option<&Outcome>, _args: &Arguments| {
			(ability == "publish").then(|| Response::allow_with("editor override", None)).filter(|_| user.id == 2)
		},
	));
	gate.after(AfterHook::new(
		|_user: &User, _ability: &str, _result: Option<&Outcome>, _args: &Arguments| {
			Response::deny_with("revoked", None)
		},
	));

	let author = gate.for_principal(User::new(1)).inspect("publish", ()).unwrap();
	assert!(author.allowed());
	assert_eq!(author.message(), None);

	let editor = gate.for_principal(User::new(2)).inspect("publish", ()).unwrap();
	assert!(editor.allowed());
	assert_eq!(editor.message(), Some("editor override"));

	let reader = gate.for_principal(User::new(3)).inspect("publish", ()).unwrap();
	assert!(reader.denied());
	assert_eq!(reader.message(), Some("revoked"));
}

#[test]
fn guest_ineligible_hooks_are_skipped() {
	let gate = gate();
	gate.before(Hook::new(|_user: &User, _ability: &str, _args: &Arguments| true));

	assert!(gate
		.for_guest()
		.denies("update", Argument::model(Post::owned_by(1)))
		.unwrap());
	assert!(gate
		.for_principal(User::new(5))
		.allows("update", Argument::model(Post::owned_by(1)))
		.unwrap());
}
