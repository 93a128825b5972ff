// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy discovery for subjects.
//!
//! Given a subject (a model instance or a bare class name) the resolver finds
//! the policy responsible for it. The first strategy that succeeds wins:
//!
//! 1. **Explicit binding**: a policy bound to the exact subject class.
//! 2. **Naming guess**: candidate policy classes produced by the naming
//!    strategy, the first one the container knows about.
//! 3. **Supertype binding**: the first binding, in declaration order, whose
//!    subject class the subject extends or implements.
//!
//! Finding nothing is not an error: the gate then falls back to plain
//! ability callbacks.

use std::fmt;
use std::sync::Arc;

use loom_gate_core::{Argument, ClassName, Principal, Result, PATH_SEPARATOR};
use tracing::{debug, instrument};

use crate::container::PolicyContainer;
use crate::policy::Policy;

/// Default policy namespace segment.
pub const DEFAULT_POLICY_NAMESPACE: &str = "Policy";

/// Default policy class suffix.
pub const DEFAULT_POLICY_SUFFIX: &str = "Policy";

/// Produces candidate policy class names for a subject class.
pub type PolicyNameGuesser = Arc<dyn Fn(&ClassName) -> Vec<ClassName> + Send + Sync>;

/// Subject-to-policy bindings in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyBindings {
	entries: Vec<(ClassName, ClassName)>,
}

impl PolicyBindings {
	/// Binds `policy` to `subject`. Rebinding keeps the original position.
	pub fn bind(&mut self, subject: ClassName, policy: ClassName) {
		match self.entries.iter_mut().find(|(bound, _)| *bound == subject) {
			Some(entry) => entry.1 = policy,
			None => self.entries.push((subject, policy)),
		}
	}

	pub fn get(&self, subject: &ClassName) -> Option<&ClassName> {
		self.entries
			.iter()
			.find(|(bound, _)| bound == subject)
			.map(|(_, policy)| policy)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&ClassName, &ClassName)> {
		self.entries.iter().map(|(subject, policy)| (subject, policy))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn to_vec(&self) -> Vec<(ClassName, ClassName)> {
		self.entries.clone()
	}
}

/// Convention mapping `a::b::Post` to `a::b::<namespace>::Post<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
	pub namespace: String,
	pub suffix: String,
}

impl Default for NamingConvention {
	fn default() -> Self {
		Self {
			namespace: DEFAULT_POLICY_NAMESPACE.to_string(),
			suffix: DEFAULT_POLICY_SUFFIX.to_string(),
		}
	}
}

impl NamingConvention {
	pub fn new(namespace: impl Into<String>, suffix: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			suffix: suffix.into(),
		}
	}

	pub fn guess(&self, class: &ClassName) -> Vec<ClassName> {
		let policy = format!("{}{}", class.simple_name(), self.suffix);
		let guessed = match class.namespace() {
			Some(parent) => [parent, self.namespace.as_str(), policy.as_str()].join(PATH_SEPARATOR),
			None => [self.namespace.as_str(), policy.as_str()].join(PATH_SEPARATOR),
		};
		vec![ClassName::new(guessed)]
	}

	/// Wraps the convention as a guesser.
	pub fn into_guesser(self) -> PolicyNameGuesser {
		Arc::new(move |class: &ClassName| self.guess(class))
	}
}

/// Subject of a policy lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
	pub class: ClassName,
	/// Supertypes declared by the instance itself, if any.
	pub supertypes: Vec<ClassName>,
}

impl Subject {
	pub fn from_class(class: impl Into<ClassName>) -> Self {
		Self {
			class: class.into(),
			supertypes: Vec::new(),
		}
	}

	/// The subject an argument refers to. Plain values have none.
	pub fn from_argument(argument: &Argument) -> Option<Self> {
		match argument {
			Argument::Model(model) => Some(Self {
				class: model.class_name(),
				supertypes: model.supertypes(),
			}),
			Argument::Class(class) => Some(Self::from_class(class.clone())),
			Argument::Value(_) => None,
		}
	}
}

/// A point-in-time view of the registered policy configuration.
pub struct PolicyResolver<P: Principal> {
	bindings: Arc<PolicyBindings>,
	guesser: PolicyNameGuesser,
	container: Arc<dyn PolicyContainer<P>>,
}

impl<P: Principal> PolicyResolver<P> {
	pub fn new(
		bindings: Arc<PolicyBindings>,
		guesser: PolicyNameGuesser,
		container: Arc<dyn PolicyContainer<P>>,
	) -> Self {
		Self {
			bindings,
			guesser,
			container,
		}
	}

	/// Finds the policy for `subject`. Container failures propagate.
	#[instrument(level = "debug", skip(self), fields(subject = %subject.class))]
	pub fn policy_for(&self, subject: &Subject) -> Result<Option<Arc<Policy<P>>>> {
		if let Some(policy) = self.bindings.get(&subject.class) {
			debug!(policy = %policy, "policy bound to subject class");
			return Ok(Some(self.container.make(policy)?));
		}

		for guessed in (self.guesser)(&subject.class) {
			if self.container.has(&guessed) {
				debug!(policy = %guessed, "policy found by naming guess");
				return Ok(Some(self.container.make(&guessed)?));
			}
		}

		for (expected, policy) in self.bindings.iter() {
			if self.extends(subject, expected) {
				debug!(policy = %policy, supertype = %expected, "policy bound to subject supertype");
				return Ok(Some(self.container.make(policy)?));
			}
		}

		Ok(None)
	}

	fn extends(&self, subject: &Subject, expected: &ClassName) -> bool {
		if subject.class == *expected {
			return false;
		}
		subject.supertypes.contains(expected)
			|| self.container.is_subclass_of(&subject.class, expected)
	}
}

impl<P: Principal> fmt::Debug for PolicyResolver<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PolicyResolver")
			.field("bindings", &self.bindings)
			.finish_non_exhaustive()
	}
}
