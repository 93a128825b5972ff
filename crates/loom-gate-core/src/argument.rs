// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Arguments passed alongside an ability check.
//!
//! An ability is checked against an ordered list of [`Argument`]s. The first
//! argument drives policy discovery:
//!
//! - [`Argument::Model`] is a typed subject instance (a post, a team, ...);
//! - [`Argument::Class`] names a subject type without an instance, for
//!   class-level checks such as "may this user create posts at all";
//! - [`Argument::Value`] is anything else and never selects a policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Fully qualified name of a subject or policy type, e.g. `app::model::Post`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassName(String);

/// Separator between the path segments of a [`ClassName`].
pub const PATH_SEPARATOR: &str = "::";

impl ClassName {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The last path segment (`Post` for `app::model::Post`).
	pub fn simple_name(&self) -> &str {
		match self.0.rfind(PATH_SEPARATOR) {
			Some(idx) => &self.0[idx + PATH_SEPARATOR.len()..],
			None => &self.0,
		}
	}

	/// Everything before the last path segment, if any.
	pub fn namespace(&self) -> Option<&str> {
		self.0.rfind(PATH_SEPARATOR).map(|idx| &self.0[..idx])
	}

	/// True when every path segment is a non-empty identifier.
	pub fn is_well_formed(&self) -> bool {
		!self.0.is_empty() && self.0.split(PATH_SEPARATOR).all(is_identifier)
	}
}

/// True for a non-empty identifier made of letters, digits and underscores.
pub fn is_identifier(segment: &str) -> bool {
	let mut chars = segment.chars();
	match chars.next() {
		Some(c) if c.is_alphabetic() || c == '_' => {}
		_ => return false,
	}
	chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl fmt::Display for ClassName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ClassName {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for ClassName {
	fn from(name: String) -> Self {
		Self(name)
	}
}

/// A subject instance that policies can be bound to.
pub trait Model: Any + Send + Sync + fmt::Debug {
	/// The concrete class of this instance.
	fn class_name(&self) -> ClassName;

	/// Classes and interfaces this instance's class extends or implements.
	///
	/// Used when no policy is bound to the exact class.
	fn supertypes(&self) -> Vec<ClassName> {
		Vec::new()
	}

	fn as_any(&self) -> &dyn Any;
}

/// A single argument of an ability check.
#[derive(Debug, Clone)]
pub enum Argument {
	Model(Arc<dyn Model>),
	Class(ClassName),
	Value(Value),
}

impl Argument {
	pub fn model<M: Model>(model: M) -> Self {
		Argument::Model(Arc::new(model))
	}

	pub fn class(name: impl Into<ClassName>) -> Self {
		Argument::Class(name.into())
	}

	pub fn value(value: impl Into<Value>) -> Self {
		Argument::Value(value.into())
	}

	/// Downcasts a model argument to its concrete type.
	pub fn downcast<M: Model>(&self) -> Option<&M> {
		match self {
			Argument::Model(model) => model.as_any().downcast_ref::<M>(),
			_ => None,
		}
	}

	pub fn as_class(&self) -> Option<&ClassName> {
		match self {
			Argument::Class(name) => Some(name),
			_ => None,
		}
	}

	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Argument::Value(value) => Some(value),
			_ => None,
		}
	}

	/// Class name this argument refers to, for models and class names.
	pub fn subject_class(&self) -> Option<ClassName> {
		match self {
			Argument::Model(model) => Some(model.class_name()),
			Argument::Class(name) => Some(name.clone()),
			Argument::Value(_) => None,
		}
	}
}

impl From<Arc<dyn Model>> for Argument {
	fn from(model: Arc<dyn Model>) -> Self {
		Argument::Model(model)
	}
}

impl From<ClassName> for Argument {
	fn from(name: ClassName) -> Self {
		Argument::Class(name)
	}
}

impl From<Value> for Argument {
	fn from(value: Value) -> Self {
		Argument::Value(value)
	}
}

/// Ordered arguments of an ability check.
#[derive(Debug, Clone, Default)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(mut self, argument: impl Into<Argument>) -> Self {
		self.0.push(argument.into());
		self
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn first(&self) -> Option<&Argument> {
		self.0.first()
	}

	pub fn get(&self, index: usize) -> Option<&Argument> {
		self.0.get(index)
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
		self.0.iter()
	}

	/// Downcasts the argument at `index` to a concrete model type.
	pub fn model<M: Model>(&self, index: usize) -> Option<&M> {
		self.get(index).and_then(Argument::downcast::<M>)
	}

	/// Drops a leading class-name argument.
	///
	/// A class name in first position only selects the policy; the policy
	/// method itself never sees it.
	pub fn without_leading_class(&self) -> Arguments {
		match self.0.split_first() {
			Some((Argument::Class(_), rest)) => Arguments(rest.to_vec()),
			_ => self.clone(),
		}
	}
}

impl From<()> for Arguments {
	fn from(_: ()) -> Self {
		Self::new()
	}
}

impl From<Vec<Argument>> for Arguments {
	fn from(arguments: Vec<Argument>) -> Self {
		Self(arguments)
	}
}

impl From<Argument> for Arguments {
	fn from(argument: Argument) -> Self {
		Self(vec![argument])
	}
}

impl From<Arc<dyn Model>> for Arguments {
	fn from(model: Arc<dyn Model>) -> Self {
		Self(vec![Argument::Model(model)])
	}
}

impl From<ClassName> for Arguments {
	fn from(name: ClassName) -> Self {
		Self(vec![Argument::Class(name)])
	}
}

impl From<Value> for Arguments {
	fn from(value: Value) -> Self {
		Self(vec![Argument::Value(value)])
	}
}

impl FromIterator<Argument> for Arguments {
	fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a Arguments {
	type Item = &'a Argument;
	type IntoIter = std::slice::Iter<'a, Argument>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
