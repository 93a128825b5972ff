// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The authorization gate.
//!
//! A [`Gate`] answers "may this principal perform this ability with these
//! arguments?". Every check runs through the same stages:
//!
//! 1. global before hooks, in registration order; the first opinion wins
//! 2. callback resolution: a policy method for the subject in first
//!    position, a method reference, a plain ability callback, or nothing
//! 3. global after hooks, folded over the result
//! 4. normalization into a [`Response`]
//!
//! Registration state is shared by every gate derived from the same root
//! (see [`Gate::for_principal`]) and may change while checks are running.
//! Each check works on a snapshot taken at its start.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use loom_gate_core::{
	ability_to_method, principal_label, Argument, Arguments, ClassName, GateError, Outcome,
	Principal, Response, Result,
};
use tracing::{debug, instrument};

use crate::callback::{AfterHook, Callback, Hook};
use crate::container::PolicyContainer;
use crate::interceptor::InterceptorChain;
use crate::policy::Policy;
use crate::registry::{AbilityRegistry, MethodRef, Target};
use crate::resolver::{
	NamingConvention, PolicyBindings, PolicyNameGuesser, PolicyResolver, Subject,
};

/// Supplies the principal a gate evaluates for. `None` means guest.
pub type PrincipalSupplier<P> = Arc<dyn Fn() -> Option<Arc<P>> + Send + Sync>;

struct GateState<P: Principal> {
	abilities: AbilityRegistry<P>,
	bindings: Arc<PolicyBindings>,
	before: Arc<Vec<Hook<P>>>,
	after: Arc<Vec<AfterHook<P>>>,
	guesser: PolicyNameGuesser,
}

impl<P: Principal> GateState<P> {
	fn new(naming: NamingConvention) -> Self {
		Self {
			abilities: AbilityRegistry::default(),
			bindings: Arc::new(PolicyBindings::default()),
			before: Arc::new(Vec::new()),
			after: Arc::new(Vec::new()),
			guesser: naming.into_guesser(),
		}
	}
}

/// Everything one evaluation needs, copied out of the shared state.
struct Snapshot<P: Principal> {
	interceptors: InterceptorChain<P>,
	target: Option<Target<P>>,
	resolver: PolicyResolver<P>,
}

/// The callable chosen for an ability.
enum AuthCallback<P: Principal> {
	/// A method on the policy resolved for the first argument.
	Policy { policy: Arc<Policy<P>>, method: String },
	/// A policy method named by a registered method reference.
	Reference { policy: Arc<Policy<P>>, target: MethodRef },
	Ability(Callback<P>),
	Noop,
}

impl<P: Principal> AuthCallback<P> {
	fn invoke(&self, principal: Option<&P>, ability: &str, arguments: &Arguments) -> Result<Option<Outcome>> {
		match self {
			AuthCallback::Policy { policy, method } => {
				if let Some(outcome) = policy.call_before(principal, ability, arguments)? {
					debug!(ability, policy = %policy.class(), "policy before hook decided");
					return Ok(Some(outcome));
				}
				policy.call_method(method, principal, arguments)
			}
			AuthCallback::Reference { policy, target } => {
				if let Some(outcome) = policy.call_before(principal, ability, arguments)? {
					debug!(ability, policy = %policy.class(), "policy before hook decided");
					return Ok(Some(outcome));
				}
				policy.call_target(target.method(), principal, arguments)
			}
			AuthCallback::Ability(callback) => callback.call(principal, arguments),
			AuthCallback::Noop => Ok(None),
		}
	}
}

/// Authorization gate over principals of type `P`.
pub struct Gate<P: Principal> {
	state: Arc<RwLock<GateState<P>>>,
	container: Arc<dyn PolicyContainer<P>>,
	principal: PrincipalSupplier<P>,
	log_decisions: bool,
}

impl<P: Principal> Clone for Gate<P> {
	fn clone(&self) -> Self {
		Self {
			state: Arc::clone(&self.state),
			container: Arc::clone(&self.container),
			principal: Arc::clone(&self.principal),
			log_decisions: self.log_decisions,
		}
	}
}

impl<P: Principal> fmt::Debug for Gate<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.read();
		f.debug_struct("Gate")
			.field("abilities", &state.abilities.len())
			.field("policies", &state.bindings.len())
			.field("before", &state.before.len())
			.field("after", &state.after.len())
			.field("log_decisions", &self.log_decisions)
			.finish_non_exhaustive()
	}
}

impl<P: Principal> Gate<P> {
	/// Creates a gate that builds policies through `container` and evaluates
	/// for whatever principal `principal` yields at check time.
	pub fn new<F>(container: Arc<dyn PolicyContainer<P>>, principal: F) -> Self
	where
		F: Fn() -> Option<Arc<P>> + Send + Sync + 'static,
	{
		Self {
			state: Arc::new(RwLock::new(GateState::new(NamingConvention::default()))),
			container,
			principal: Arc::new(principal),
			log_decisions: false,
		}
	}

	/// Replaces the naming strategy in the shared state, so every gate bound
	/// from this one sees it too.
	pub(crate) fn with_naming(self, naming: NamingConvention) -> Self {
		self.write().guesser = naming.into_guesser();
		self
	}

	/// Emits a debug event for every decision made through [`Gate::inspect`].
	pub fn with_decision_logging(mut self, enabled: bool) -> Self {
		self.log_decisions = enabled;
		self
	}

	fn read(&self) -> RwLockReadGuard<'_, GateState<P>> {
		self.state.read().unwrap_or_else(PoisonError::into_inner)
	}

	fn write(&self) -> RwLockWriteGuard<'_, GateState<P>> {
		self.state.write().unwrap_or_else(PoisonError::into_inner)
	}

	// Registration

	/// Defines an ability. Redefining a name replaces its target.
	pub fn define(&self, ability: &str, target: impl Into<Target<P>>) -> Result<&Self> {
		self.write().abilities.define(ability, target.into())?;
		debug!(ability, "ability defined");
		Ok(self)
	}

	/// Defines `name.<ability>` method references on `class`.
	///
	/// Without `abilities` the conventional `viewAny`, `view`, `create`,
	/// `update` and `delete` abilities are defined.
	pub fn resource(
		&self,
		name: &str,
		class: impl Into<ClassName>,
		abilities: Option<&[(&str, &str)]>,
	) -> Result<&Self> {
		let class = class.into();
		let defined = self.write().abilities.resource(name, &class, abilities)?;
		debug!(resource = name, policy = %class, count = defined.len(), "resource abilities defined");
		Ok(self)
	}

	/// Binds `policy` to `subject`.
	pub fn policy(&self, subject: impl Into<ClassName>, policy: impl Into<ClassName>) -> &Self {
		let (subject, policy) = (subject.into(), policy.into());
		debug!(subject = %subject, policy = %policy, "policy bound");
		let mut state = self.write();
		Arc::make_mut(&mut state.bindings).bind(subject, policy);
		self
	}

	/// Appends a global before hook.
	pub fn before(&self, hook: Hook<P>) -> &Self {
		let mut state = self.write();
		Arc::make_mut(&mut state.before).push(hook);
		self
	}

	/// Appends a global after hook.
	pub fn after(&self, hook: AfterHook<P>) -> &Self {
		let mut state = self.write();
		Arc::make_mut(&mut state.after).push(hook);
		self
	}

	/// Replaces the policy naming strategy with a custom guesser.
	pub fn guess_policy_names_using<F>(&self, guesser: F) -> &Self
	where
		F: Fn(&ClassName) -> Vec<ClassName> + Send + Sync + 'static,
	{
		self.write().guesser = Arc::new(guesser);
		self
	}

	// Queries

	/// True when every named ability is defined.
	pub fn has<I, S>(&self, abilities: I) -> bool
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let state = self.read();
		abilities
			.into_iter()
			.all(|ability| state.abilities.contains(ability.as_ref()))
	}

	/// Sorted names of the defined abilities.
	pub fn abilities(&self) -> Vec<String> {
		self.read().abilities.names()
	}

	/// Policy bindings in declaration order.
	pub fn policies(&self) -> Vec<(ClassName, ClassName)> {
		self.read().bindings.to_vec()
	}

	/// Resolves the policy responsible for `subject`, a model or class name.
	pub fn policy_for(&self, subject: impl Into<Argument>) -> Result<Option<Arc<Policy<P>>>> {
		match Subject::from_argument(&subject.into()) {
			Some(subject) => self.resolver().policy_for(&subject),
			None => Ok(None),
		}
	}

	/// The principal this gate currently evaluates for.
	pub fn principal(&self) -> Option<Arc<P>> {
		(self.principal)()
	}

	// Evaluation

	pub fn allows(&self, ability: &str, arguments: impl Into<Arguments>) -> Result<bool> {
		Ok(self.inspect(ability, arguments)?.allowed())
	}

	pub fn denies(&self, ability: &str, arguments: impl Into<Arguments>) -> Result<bool> {
		Ok(!self.allows(ability, arguments)?)
	}

	/// True when every ability is allowed. Stops at the first denial.
	pub fn check<I, S>(&self, abilities: I, arguments: impl Into<Arguments>) -> Result<bool>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let arguments = arguments.into();
		for ability in abilities {
			if !self.allows(ability.as_ref(), arguments.clone())? {
				return Ok(false);
			}
		}
		Ok(true)
	}

	/// True when at least one ability is allowed. Stops at the first allow.
	pub fn any<I, S>(&self, abilities: I, arguments: impl Into<Arguments>) -> Result<bool>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let arguments = arguments.into();
		for ability in abilities {
			if self.allows(ability.as_ref(), arguments.clone())? {
				return Ok(true);
			}
		}
		Ok(false)
	}

	/// True when no ability is allowed.
	pub fn none<I, S>(&self, abilities: I, arguments: impl Into<Arguments>) -> Result<bool>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Ok(!self.any(abilities, arguments)?)
	}

	/// Returns the allowing response, or [`GateError::Authorization`] carrying
	/// the denying one.
	pub fn authorize(&self, ability: &str, arguments: impl Into<Arguments>) -> Result<Response> {
		Ok(self.inspect(ability, arguments)?.authorize()?)
	}

	/// Evaluates `ability` into a [`Response`].
	///
	/// Denials raised as [`GateError::Authorization`] anywhere in the chain are
	/// returned as their response. Other errors propagate.
	#[instrument(level = "debug", skip_all, fields(ability = ability))]
	pub fn inspect(&self, ability: &str, arguments: impl Into<Arguments>) -> Result<Response> {
		let response = match self.raw(ability, arguments) {
			Ok(outcome) => Outcome::normalize(outcome),
			Err(GateError::Authorization(err)) => err.into_response(),
			Err(err) => return Err(err),
		};
		if self.log_decisions {
			debug!(
				ability,
				allowed = response.allowed(),
				code = ?response.code(),
				"authorization decision"
			);
		}
		Ok(response)
	}

	/// Evaluates `ability` without normalizing the result.
	#[instrument(level = "debug", skip_all, fields(ability = ability, principal = tracing::field::Empty))]
	pub fn raw(&self, ability: &str, arguments: impl Into<Arguments>) -> Result<Option<Outcome>> {
		let arguments = arguments.into();
		let principal = (self.principal)();
		let principal = principal.as_deref();
		tracing::Span::current().record("principal", principal_label(principal).as_str());

		let snapshot = self.snapshot(ability);
		let mut result = snapshot
			.interceptors
			.run_before(principal, ability, &arguments)?;

		if result.is_none() {
			let callback = self.resolve_auth_callback(&snapshot, principal, ability, &arguments)?;
			result = match callback.invoke(principal, ability, &arguments) {
				Err(GateError::Authorization(err)) => Some(Outcome::Response(err.into_response())),
				other => other?,
			};
		} else {
			debug!(ability, "before hook short-circuited");
		}

		snapshot
			.interceptors
			.run_after(principal, ability, &arguments, result)
	}

	/// Returns a gate sharing all registrations that evaluates for `principal`.
	pub fn for_principal(&self, principal: Arc<P>) -> Gate<P> {
		self.with_supplier(Arc::new(move || Some(Arc::clone(&principal))))
	}

	/// Returns a gate sharing all registrations that evaluates for a guest.
	pub fn for_guest(&self) -> Gate<P> {
		self.with_supplier(Arc::new(|| None))
	}

	fn with_supplier(&self, principal: PrincipalSupplier<P>) -> Gate<P> {
		Gate {
			state: Arc::clone(&self.state),
			container: Arc::clone(&self.container),
			principal,
			log_decisions: self.log_decisions,
		}
	}

	fn resolver(&self) -> PolicyResolver<P> {
		let state = self.read();
		PolicyResolver::new(
			Arc::clone(&state.bindings),
			Arc::clone(&state.guesser),
			Arc::clone(&self.container),
		)
	}

	fn snapshot(&self, ability: &str) -> Snapshot<P> {
		let state = self.read();
		Snapshot {
			interceptors: InterceptorChain::new(Arc::clone(&state.before), Arc::clone(&state.after)),
			target: state.abilities.get(ability).cloned(),
			resolver: PolicyResolver::new(
				Arc::clone(&state.bindings),
				Arc::clone(&state.guesser),
				Arc::clone(&self.container),
			),
		}
	}

	fn resolve_auth_callback(
		&self,
		snapshot: &Snapshot<P>,
		principal: Option<&P>,
		ability: &str,
		arguments: &Arguments,
	) -> Result<AuthCallback<P>> {
		if let Some(subject) = arguments.first().and_then(Subject::from_argument) {
			if let Some(policy) = snapshot.resolver.policy_for(&subject)? {
				let method = ability_to_method(ability);
				if policy.has_method(&method) {
					debug!(ability, policy = %policy.class(), method = %method, "using policy method");
					return Ok(AuthCallback::Policy { policy, method });
				}
			}
		}

		match &snapshot.target {
			Some(Target::Method(target)) => {
				// An unresolvable class makes the reference ineligible for guests.
				let policy = match self.container.make(target.class()) {
					Ok(policy) => Some(policy),
					Err(err) if principal.is_none() => {
						debug!(ability, policy = %target.class(), error = %err, "method reference unavailable to guest");
						None
					}
					Err(err) => return Err(err.into()),
				};
				if let Some(policy) = policy.filter(|policy| policy.can_call(target.method(), principal)) {
					return Ok(AuthCallback::Reference {
						policy,
						target: target.clone(),
					});
				}
			}
			Some(Target::Callback(callback)) if callback.can_be_called_with(principal) => {
				return Ok(AuthCallback::Ability(callback.clone()));
			}
			_ => {}
		}

		debug!(ability, "no eligible callback, denying");
		Ok(AuthCallback::Noop)
	}
}
