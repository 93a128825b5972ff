// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Concurrent evaluation and registration on a shared gate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use loom_server_gate::{Argument, Arguments, Callback, Gate, Hook};

use super::support::{gate, Post, User};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn gate_is_send_and_sync() {
	assert_send_sync::<Gate<User>>();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_checks_agree_with_sequential_ones() {
	let gate = gate();
	let mut handles = Vec::new();

	for id in 0..32u64 {
		let gate = gate.for_principal(User::new(id % 4));
		handles.push(tokio::task::spawn_blocking(move || {
			let own = gate
				.allows("update", Argument::model(Post::owned_by(id % 4)))
				.unwrap();
			let foreign = gate
				.allows("update", Argument::model(Post::owned_by(id % 4 + 1)))
				.unwrap();
			(own, foreign)
		}));
	}

	for handle in handles {
		assert_eq!(handle.await.unwrap(), (true, false));
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn registration_interleaves_with_evaluation() {
	let gate = gate();
	let reader = gate.for_principal(User::new(1));

	let writer = {
		let gate = gate.clone();
		tokio::task::spawn_blocking(move || {
			for n in 0..50 {
				gate.define(
					&format!("ability-{n}"),
					Callback::new(|_user: &User, _args: &Arguments| true),
				)
				.unwrap();
			}
		})
	};

	let checks = tokio::task::spawn_blocking(move || {
		for n in 0..50 {
			// Either not yet defined (denied) or defined (allowed); never an error.
			reader.allows(&format!("ability-{n}"), ()).unwrap();
		}
		reader
	});

	writer.await.unwrap();
	let reader = checks.await.unwrap();
	for n in 0..50 {
		assert!(reader.allows(&format!("ability-{n}"), ()).unwrap());
	}
}

#[test]
fn callbacks_may_reenter_the_gate() {
	let gate = gate();
	let calls = Arc::new(AtomicUsize::new(0));

	let inner = gate.clone();
	let counter = Arc::clone(&calls);
	gate.define(
		"moderate",
		Callback::new(move |user: &User, args: &Arguments| {
			counter.fetch_add(1, Ordering::SeqCst);
			let post = args.first().cloned().map(Arguments::from).unwrap_or_default();
			let user = Arc::new(user.clone());
			inner.for_principal(user).allows("delete", post)
		}),
	)
	.unwrap();

	// Registering from inside a hook must not deadlock either.
	let registrar = gate.clone();
	gate.before(Hook::new(move |_user: &User, ability: &str, _args: &Arguments| {
		if ability == "moderate" && !registrar.has(["moderated"]) {
			registrar
				.define("moderated", Callback::new(|_user: &User, _args: &Arguments| true))
				.map(|_| ())
		} else {
			Ok(())
		}
	}));

	let admin = gate.for_principal(User::admin(1));
	assert!(admin
		.allows("moderate", Argument::value("not a post"))
		.is_ok_and(|allowed| !allowed));
	assert!(admin
		.allows("moderate", Argument::model(Post::owned_by(2)))
		.unwrap());
	assert!(gate.has(["moderated"]));
	assert_eq!(calls.load(Ordering::SeqCst), 2);
}
