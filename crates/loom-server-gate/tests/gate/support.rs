// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::any::Any;
use std::sync::Arc;

use loom_server_gate::{
	Arguments, Callback, ClassName, Container, Gate, Hook, Model, Policy, Principal, Response,
};

pub const POST_CLASS: &str = "app::model::Post";
pub const POST_POLICY: &str = "app::model::Policy::PostPolicy";

#[derive(Debug, Clone)]
pub struct User {
	pub id: u64,
	pub admin: bool,
	pub suspended: bool,
}

impl User {
	pub fn new(id: u64) -> Arc<Self> {
		Arc::new(Self {
			id,
			admin: false,
			suspended: false,
		})
	}

	pub fn admin(id: u64) -> Arc<Self> {
		Arc::new(Self {
			id,
			admin: true,
			suspended: false,
		})
	}

	pub fn suspended(id: u64) -> Arc<Self> {
		Arc::new(Self {
			id,
			admin: false,
			suspended: true,
		})
	}
}

impl Principal for User {
	fn auth_identifier(&self) -> String {
		format!("user-{}", self.id)
	}
}

#[derive(Debug)]
pub struct Post {
	pub user_id: u64,
	pub published: bool,
}

impl Post {
	pub fn owned_by(user_id: u64) -> Self {
		Self {
			user_id,
			published: false,
		}
	}

	pub fn published(user_id: u64) -> Self {
		Self {
			user_id,
			published: true,
		}
	}
}

impl Model for Post {
	fn class_name(&self) -> ClassName {
		ClassName::new(POST_CLASS)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// The policy most tests are written against.
///
/// Suspended users are denied everything up front, owners may update and
/// delete, anyone (guests included) may view published posts.
pub fn post_policy() -> Policy<User> {
	Policy::new(POST_POLICY)
		.before(Hook::new(|user: &User, _ability: &str, _args: &Arguments| {
			user.suspended
				.then(|| Response::deny_with("Your account is suspended.", Some(423.into())))
		}))
		.method(
			"update",
			Callback::new(|user: &User, args: &Arguments| {
				match args.model::<Post>(0) {
					Some(post) if post.user_id == user.id => Response::allow(),
					_ => Response::deny_with("You do not own this post.", Some(403.into())),
				}
			}),
		)
		.method(
			"delete",
			Callback::new(|user: &User, args: &Arguments| {
				args.model::<Post>(0)
					.is_some_and(|post| post.user_id == user.id || user.admin)
			}),
		)
		.method(
			"view",
			Callback::allow_guests(|user: Option<&User>, args: &Arguments| {
				args.model::<Post>(0)
					.is_some_and(|post| post.published || user.is_some_and(|u| u.id == post.user_id))
			}),
		)
		.method(
			"create",
			Callback::new(|user: &User, _args: &Arguments| !user.suspended),
		)
}

pub fn container() -> Container<User> {
	let mut container = Container::new();
	container.instance(post_policy());
	container
}

/// An unbound gate over [`container`] that evaluates for guests.
pub fn gate() -> Gate<User> {
	Gate::new(Arc::new(container()), || None)
}
