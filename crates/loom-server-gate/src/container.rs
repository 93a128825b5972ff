// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Construction of policy instances.
//!
//! The gate never builds policies itself. It asks a [`PolicyContainer`] to
//! `make` an instance for a policy class each time one is needed, to report
//! whether a guessed policy class exists, and to answer subtype questions
//! about subject classes. [`Container`] is the in-process implementation used
//! by the server; hosts with their own object graph implement the trait.

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::sync::Arc;

use loom_gate_core::{ClassName, Principal, ResolutionError};

use crate::policy::Policy;

/// Builds policy instances and knows the subject class hierarchy.
pub trait PolicyContainer<P: Principal>: Send + Sync {
	/// Builds (or fetches) the policy registered under `class`.
	fn make(&self, class: &ClassName) -> Result<Arc<Policy<P>>, ResolutionError>;

	/// True when `class` can be built by [`PolicyContainer::make`].
	fn has(&self, class: &ClassName) -> bool;

	/// True when `class` strictly extends or implements `parent`.
	fn is_subclass_of(&self, _class: &ClassName, _parent: &ClassName) -> bool {
		false
	}
}

type Factory<P> =
	Arc<dyn Fn() -> Result<Policy<P>, Box<dyn StdError + Send + Sync>> + Send + Sync>;

enum Binding<P: Principal> {
	Factory(Factory<P>),
	Shared(Arc<Policy<P>>),
}

/// Registry of policy factories plus declared class hierarchy.
pub struct Container<P: Principal> {
	bindings: HashMap<ClassName, Binding<P>>,
	parents: HashMap<ClassName, Vec<ClassName>>,
}

impl<P: Principal> Default for Container<P> {
	fn default() -> Self {
		Self::new()
	}
}

impl<P: Principal> Container<P> {
	pub fn new() -> Self {
		Self {
			bindings: HashMap::new(),
			parents: HashMap::new(),
		}
	}

	/// Registers a factory run on every `make`.
	pub fn bind<F>(&mut self, class: impl Into<ClassName>, factory: F) -> &mut Self
	where
		F: Fn() -> Result<Policy<P>, Box<dyn StdError + Send + Sync>> + Send + Sync + 'static,
	{
		self.bindings
			.insert(class.into(), Binding::Factory(Arc::new(factory)));
		self
	}

	/// Registers a single shared instance under its own class name.
	pub fn instance(&mut self, policy: Policy<P>) -> &mut Self {
		self.bindings
			.insert(policy.class().clone(), Binding::Shared(Arc::new(policy)));
		self
	}

	/// Declares that `class` extends or implements `parent`.
	pub fn extends(&mut self, class: impl Into<ClassName>, parent: impl Into<ClassName>) -> &mut Self {
		let parents = self.parents.entry(class.into()).or_default();
		let parent = parent.into();
		if !parents.contains(&parent) {
			parents.push(parent);
		}
		self
	}
}

impl<P: Principal> PolicyContainer<P> for Container<P> {
	fn make(&self, class: &ClassName) -> Result<Arc<Policy<P>>, ResolutionError> {
		match self.bindings.get(class) {
			Some(Binding::Shared(policy)) => Ok(Arc::clone(policy)),
			Some(Binding::Factory(factory)) => factory()
				.map(Arc::new)
				.map_err(|source| ResolutionError::Construction {
					class: class.clone(),
					source,
				}),
			None => Err(ResolutionError::NotFound(class.clone())),
		}
	}

	fn has(&self, class: &ClassName) -> bool {
		self.bindings.contains_key(class)
	}

	fn is_subclass_of(&self, class: &ClassName, parent: &ClassName) -> bool {
		let mut seen = HashSet::new();
		let mut queue: VecDeque<&ClassName> = self
			.parents
			.get(class)
			.map(|direct| direct.iter().collect())
			.unwrap_or_default();

		while let Some(candidate) = queue.pop_front() {
			if candidate == parent {
				return true;
			}
			if !seen.insert(candidate) {
				continue;
			}
			if let Some(next) = self.parents.get(candidate) {
				queue.extend(next.iter());
			}
		}
		false
	}
}
