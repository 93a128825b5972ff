// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ability registrations.

use std::collections::HashMap;
use std::fmt;

use loom_gate_core::{is_identifier, ClassName, GateError, Principal, Result, RESOURCE_ABILITIES};

use crate::callback::Callback;

/// Reference to a policy method, resolved through the container at check time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodRef {
	class: ClassName,
	method: Option<String>,
}

impl MethodRef {
	/// Refers to `method` on the policy registered as `class`.
	pub fn new(class: impl Into<ClassName>, method: impl Into<String>) -> Self {
		Self {
			class: class.into(),
			method: Some(method.into()),
		}
	}

	/// Refers to the invoke handler of the policy registered as `class`.
	pub fn invokable(class: impl Into<ClassName>) -> Self {
		Self {
			class: class.into(),
			method: None,
		}
	}

	pub fn class(&self) -> &ClassName {
		&self.class
	}

	pub fn method(&self) -> Option<&str> {
		self.method.as_deref()
	}

	fn validate(&self, ability: &str) -> Result<()> {
		if !self.class.is_well_formed() {
			return Err(GateError::invalid_registration(
				ability,
				format!("`{}` is not a valid class name", self.class),
			));
		}
		if let Some(method) = &self.method {
			if !is_identifier(method) {
				return Err(GateError::invalid_registration(
					ability,
					format!("`{method}` is not a valid method name"),
				));
			}
		}
		Ok(())
	}
}

impl fmt::Display for MethodRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.method {
			Some(method) => write!(f, "{}@{}", self.class, method),
			None => write!(f, "{}", self.class),
		}
	}
}

/// What an ability resolves to.
pub enum Target<P: Principal> {
	Callback(Callback<P>),
	Method(MethodRef),
}

impl<P: Principal> Clone for Target<P> {
	fn clone(&self) -> Self {
		match self {
			Target::Callback(callback) => Target::Callback(callback.clone()),
			Target::Method(method) => Target::Method(method.clone()),
		}
	}
}

impl<P: Principal> fmt::Debug for Target<P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Target::Callback(callback) => f.debug_tuple("Callback").field(callback).finish(),
			Target::Method(method) => f.debug_tuple("Method").field(method).finish(),
		}
	}
}

impl<P: Principal> From<Callback<P>> for Target<P> {
	fn from(callback: Callback<P>) -> Self {
		Target::Callback(callback)
	}
}

impl<P: Principal> From<MethodRef> for Target<P> {
	fn from(method: MethodRef) -> Self {
		Target::Method(method)
	}
}

/// Named abilities. Redefining a name replaces the previous target.
pub struct AbilityRegistry<P: Principal> {
	abilities: HashMap<String, Target<P>>,
}

impl<P: Principal> Default for AbilityRegistry<P> {
	fn default() -> Self {
		Self {
			abilities: HashMap::new(),
		}
	}
}

impl<P: Principal> AbilityRegistry<P> {
	pub fn define(&mut self, ability: &str, target: Target<P>) -> Result<()> {
		if ability.trim().is_empty() {
			return Err(GateError::invalid_registration(ability, "ability name is empty"));
		}
		if let Target::Method(method) = &target {
			method.validate(ability)?;
		}
		self.abilities.insert(ability.to_string(), target);
		Ok(())
	}

	/// Defines `name.<ability>` for each `(ability, method)` pair on `class`.
	///
	/// Without an override map the five conventional resource abilities are
	/// defined. Pairs are validated up front so a bad map registers nothing.
	pub fn resource(
		&mut self,
		name: &str,
		class: &ClassName,
		abilities: Option<&[(&str, &str)]>,
	) -> Result<Vec<String>> {
		let abilities = abilities.unwrap_or(RESOURCE_ABILITIES);
		let mut planned = Vec::with_capacity(abilities.len());
		for (ability, method) in abilities {
			let full_name = format!("{name}.{ability}");
			let target = MethodRef::new(class.clone(), *method);
			target.validate(&full_name)?;
			planned.push((full_name, target));
		}

		let mut defined = Vec::with_capacity(planned.len());
		for (full_name, target) in planned {
			self.define(&full_name, Target::Method(target))?;
			defined.push(full_name);
		}
		Ok(defined)
	}

	pub fn get(&self, ability: &str) -> Option<&Target<P>> {
		self.abilities.get(ability)
	}

	pub fn contains(&self, ability: &str) -> bool {
		self.abilities.contains_key(ability)
	}

	/// Sorted snapshot of the registered names.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.abilities.keys().cloned().collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.abilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.abilities.is_empty()
	}
}
