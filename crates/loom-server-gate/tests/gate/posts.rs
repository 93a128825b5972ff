// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Post ownership scenario through the public gate API.

use loom_server_gate::{Argument, GateError, MethodRef, DEFAULT_DENIAL_MESSAGE};
use serde_json::json;

use super::support::{gate, Post, User, POST_CLASS, POST_POLICY};

#[test]
fn owner_may_update_their_post() {
	let gate = gate();
	let owner = gate.for_principal(User::new(1));

	let response = owner
		.authorize("update", Argument::model(Post::owned_by(1)))
		.unwrap();
	assert!(response.allowed());
}

#[test]
fn others_are_denied_with_the_policy_message() {
	let gate = gate();
	let other = gate.for_principal(User::new(2));

	let err = other
		.authorize("update", Argument::model(Post::owned_by(1)))
		.unwrap_err();
	let denial = match err {
		GateError::Authorization(denial) => denial,
		other => panic!("unexpected error: {other}"),
	};
	assert_eq!(denial.response().message(), Some("You do not own this post."));
	assert_eq!(denial.response().code(), Some(&json!(403)));
	assert_eq!(denial.to_string(), "You do not own this post.");
}

#[test]
fn policy_before_hook_denies_suspended_owner() {
	let gate = gate();
	let suspended = gate.for_principal(User::suspended(1));

	let response = suspended
		.inspect("update", Argument::model(Post::owned_by(1)))
		.unwrap();
	assert!(response.denied());
	assert_eq!(response.message(), Some("Your account is suspended."));
	assert_eq!(response.code(), Some(&json!(423)));
}

#[test]
fn guests_may_only_view_published_posts() {
	let gate = gate().for_guest();

	assert!(gate.allows("view", Argument::model(Post::published(1))).unwrap());
	assert!(gate.denies("view", Argument::model(Post::owned_by(1))).unwrap());
	assert!(gate.denies("update", Argument::model(Post::published(1))).unwrap());
}

#[test]
fn class_level_create_check() {
	let gate = gate();

	assert!(gate
		.for_principal(User::new(3))
		.allows("create", Argument::class(POST_CLASS))
		.unwrap());
	assert!(gate
		.for_guest()
		.denies("create", Argument::class(POST_CLASS))
		.unwrap());
}

#[test]
fn unmatched_policy_methods_deny_with_default_message() {
	let gate = gate();
	let err = gate
		.for_principal(User::new(1))
		.authorize("archive", Argument::model(Post::owned_by(1)))
		.unwrap_err();
	assert_eq!(err.to_string(), DEFAULT_DENIAL_MESSAGE);
}

#[test]
fn resource_registration_targets_policy_methods() {
	let gate = gate();
	gate.resource("posts", POST_POLICY, None).unwrap();

	assert!(gate.has(["posts.view", "posts.update", "posts.delete"]));
	let admin = gate.for_principal(User::admin(9));
	assert!(admin
		.allows("posts.delete", Argument::model(Post::owned_by(1)))
		.unwrap());
	assert!(gate
		.for_principal(User::new(9))
		.denies("posts.delete", Argument::model(Post::owned_by(1)))
		.unwrap());
}

#[test]
fn resource_abilities_reach_methods_missing_from_the_policy() {
	let gate = gate();
	gate.resource("posts", POST_POLICY, None).unwrap();

	// The policy has no `viewAny` method.
	let err = gate
		.for_principal(User::new(1))
		.allows("posts.viewAny", ())
		.unwrap_err();
	assert!(matches!(err, GateError::MissingMethod { ref method, .. } if method == "viewAny"));
	assert!(gate.for_guest().denies("posts.viewAny", ()).unwrap());
}

#[test]
fn method_references_follow_guest_eligibility() {
	let gate = gate();
	gate.define("posts.read", MethodRef::new(POST_POLICY, "view"))
		.unwrap();

	assert!(gate
		.for_guest()
		.allows("posts.read", Argument::model(Post::published(4)))
		.unwrap());
}

#[test]
fn explicit_binding_overrides_naming_convention() {
	let gate = gate();
	gate.policy(POST_CLASS, "app::auth::LockedPostPolicy");

	let err = gate
		.for_principal(User::new(1))
		.allows("update", Argument::model(Post::owned_by(1)))
		.unwrap_err();
	assert!(matches!(err, GateError::Resolution(_)));
}
