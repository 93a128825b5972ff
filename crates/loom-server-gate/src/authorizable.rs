// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Convenience entry points on principals and request handlers.

use std::sync::Arc;

use loom_gate_core::{
	is_method_without_model, normalize_guessed_ability_name, Arguments, Principal, Response,
	Result, RESOURCE_METHODS_WITHOUT_MODELS, RESOURCE_METHOD_ABILITIES,
};

use crate::gate::Gate;

/// Ability checks phrased from the principal's side.
pub trait Authorizable<P: Principal> {
	/// True when every ability is allowed for this principal.
	fn can<I, S, A>(&self, gate: &Gate<P>, abilities: I, arguments: A) -> Result<bool>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
		A: Into<Arguments>;

	fn cannot<I, S, A>(&self, gate: &Gate<P>, abilities: I, arguments: A) -> Result<bool>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
		A: Into<Arguments>,
	{
		Ok(!self.can(gate, abilities, arguments)?)
	}
}

impl<P: Principal> Authorizable<P> for Arc<P> {
	fn can<I, S, A>(&self, gate: &Gate<P>, abilities: I, arguments: A) -> Result<bool>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
		A: Into<Arguments>,
	{
		gate.for_principal(Arc::clone(self)).check(abilities, arguments)
	}
}

/// Authorization helpers for request handlers.
///
/// Implementors provide the gate bound to the current request; the provided
/// methods map handler names onto resource abilities and authorize them.
pub trait AuthorizesRequests<P: Principal> {
	fn gate(&self) -> &Gate<P>;

	/// Authorizes `ability` for the request's principal.
	fn authorize(&self, ability: &str, arguments: impl Into<Arguments>) -> Result<Response> {
		self.gate().authorize(ability, arguments)
	}

	/// Authorizes `ability` for `principal` instead of the request's principal.
	fn authorize_for_user(
		&self,
		principal: Arc<P>,
		ability: &str,
		arguments: impl Into<Arguments>,
	) -> Result<Response> {
		self.gate()
			.for_principal(principal)
			.authorize(ability, arguments)
	}

	/// Authorizes the resource ability behind a handler name (`show` → `view`).
	fn authorize_resource(&self, handler: &str, arguments: impl Into<Arguments>) -> Result<Response> {
		let ability = normalize_guessed_ability_name(handler);
		self.authorize(&ability, arguments)
	}

	fn resource_ability_map(&self) -> &'static [(&'static str, &'static str)] {
		RESOURCE_METHOD_ABILITIES
	}

	fn resource_methods_without_models(&self) -> &'static [&'static str] {
		RESOURCE_METHODS_WITHOUT_MODELS
	}

	/// True when `handler` acts on the resource type rather than an instance.
	fn is_method_without_model(&self, handler: &str) -> bool {
		is_method_without_model(handler)
	}
}
