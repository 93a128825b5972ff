// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy objects.
//!
//! A [`Policy`] groups the ability checks for one subject type. Abilities are
//! answered by named methods (`update`, `deletePost`, ...), an optional
//! `before` hook can answer every ability of the policy up front, and an
//! optional invoke handler answers method references that name no method.

use std::collections::HashMap;
use std::fmt;

use loom_gate_core::{Arguments, ClassName, GateError, Outcome, Principal, Result};

use crate::callback::{Callback, Hook};

/// Name reported for the invoke handler in errors and logs.
pub const INVOKE_METHOD: &str = "__invoke";

pub struct Policy<P: Principal> {
	class: ClassName,
	before: Option<Hook<P>>,
	methods: HashMap<String, Callback<P>>,
	invoke: Option<Callback<P>>,
}

impl<P: Principal> Policy<P> {
	pub fn new(class: impl Into<ClassName>) -> Self {
		Self {
			class: class.into(),
			before: None,
			methods: HashMap::new(),
			invoke: None,
		}
	}

	/// Sets the hook consulted before any method of this policy.
	pub fn before(mut self, hook: Hook<P>) -> Self {
		self.before = Some(hook);
		self
	}

	/// Adds (or replaces) a named method.
	pub fn method(mut self, name: impl Into<String>, callback: Callback<P>) -> Self {
		self.methods.insert(name.into(), callback);
		self
	}

	/// Sets the handler used when a method reference names no method.
	pub fn invoke(mut self, callback: Callback<P>) -> Self {
		self.invoke = Some(callback);
		self
	}

	pub fn class(&self) -> &ClassName {
		&self.class
	}

	pub fn has_method(&self, name: &str) -> bool {
		self.methods.contains_key(name)
	}

	pub fn has_before(&self) -> bool {
		self.before.is_some()
	}

	/// Sorted names of the methods this policy defines.
	pub fn methods(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	/// Looks up a method, or the invoke handler when `name` is `None`.
	pub(crate) fn target(&self, name: Option<&str>) -> Option<&Callback<P>> {
		match name {
			Some(name) => self.methods.get(name),
			None => self.invoke.as_ref(),
		}
	}

	/// True when `name` (or the invoke handler) exists and may run for `principal`.
	pub(crate) fn can_call(&self, name: Option<&str>, principal: Option<&P>) -> bool {
		if principal.is_some() {
			return true;
		}
		self.target(name)
			.map(|callback| callback.allows_guest())
			.unwrap_or(false)
	}

	/// Runs the `before` hook if one is defined and eligible.
	pub(crate) fn call_before(
		&self,
		principal: Option<&P>,
		ability: &str,
		arguments: &Arguments,
	) -> Result<Option<Outcome>> {
		match &self.before {
			Some(hook) if hook.can_be_called_with(principal) => hook.call(principal, ability, arguments),
			_ => Ok(None),
		}
	}

	/// Runs a method on behalf of a subject-bound check.
	///
	/// A leading class-name argument is dropped: it only selected this policy.
	/// Missing or guest-ineligible methods answer `None`.
	pub(crate) fn call_method(
		&self,
		method: &str,
		principal: Option<&P>,
		arguments: &Arguments,
	) -> Result<Option<Outcome>> {
		let arguments = arguments.without_leading_class();
		match self.methods.get(method) {
			Some(callback) if callback.can_be_called_with(principal) => {
				callback.call(principal, &arguments)
			}
			_ => Ok(None),
		}
	}

	/// Runs a method named by a method reference, with the full argument list.
	pub(crate) fn call_target(
		&self,
		name: Option<&str>,
		principal: Option<&P>,
		arguments: &Arguments,
	) -> Result<Option<Outcome>> {
		let callback = self.target(name).ok_or_else(|| GateError::MissingMethod {
			policy: self.class.clone(),
			method: name.unwrap_or(INVOKE_METHOD).to_string(),
		})?;
		callback.call(principal, arguments)
	}
}

impl<P: Principal> fmt::Debug for Policy<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Policy")
			.field("class", &self.class)
			.field("before", &self.before.is_some())
			.field("methods", &self.methods())
			.field("invoke", &self.invoke.is_some())
			.finish()
	}
}
