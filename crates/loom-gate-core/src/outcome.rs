// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw results of ability callbacks and hooks.
//!
//! Callbacks may answer with a full [`Response`], a plain `bool`, or nothing
//! at all. "Nothing" (`None`) means *no opinion*: a before hook that returns
//! `None` lets evaluation continue, and an ability that returns `None` is
//! denied once normalized.

use crate::error::{GateError, Result};
use crate::response::Response;

/// A non-empty raw result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	Response(Response),
	Bool(bool),
}

impl Outcome {
	/// True for an allowing response or `true`.
	pub fn is_allowed(&self) -> bool {
		match self {
			Outcome::Response(response) => response.allowed(),
			Outcome::Bool(allowed) => *allowed,
		}
	}

	/// Normalizes into a [`Response`]; `None` is a bare denial.
	pub fn normalize(outcome: Option<Outcome>) -> Response {
		match outcome {
			Some(Outcome::Response(response)) => response,
			Some(Outcome::Bool(allowed)) => Response::from(allowed),
			None => Response::deny(),
		}
	}
}

impl From<bool> for Outcome {
	fn from(allowed: bool) -> Self {
		Outcome::Bool(allowed)
	}
}

impl From<Response> for Outcome {
	fn from(response: Response) -> Self {
		Outcome::Response(response)
	}
}

/// Conversion of callback return values into a raw result.
///
/// Implemented for the shapes callbacks naturally return, so closures can be
/// written as `|user, post| user.id == post.owner_id`.
pub trait IntoOutcome {
	fn into_outcome(self) -> Result<Option<Outcome>>;
}

impl IntoOutcome for Outcome {
	fn into_outcome(self) -> Result<Option<Outcome>> {
		Ok(Some(self))
	}
}

impl IntoOutcome for bool {
	fn into_outcome(self) -> Result<Option<Outcome>> {
		Ok(Some(Outcome::Bool(self)))
	}
}

impl IntoOutcome for Response {
	fn into_outcome(self) -> Result<Option<Outcome>> {
		Ok(Some(Outcome::Response(self)))
	}
}

impl IntoOutcome for () {
	fn into_outcome(self) -> Result<Option<Outcome>> {
		Ok(None)
	}
}

impl<T: IntoOutcome> IntoOutcome for Option<T> {
	fn into_outcome(self) -> Result<Option<Outcome>> {
		match self {
			Some(value) => value.into_outcome(),
			None => Ok(None),
		}
	}
}

impl<T: IntoOutcome, E: Into<GateError>> IntoOutcome for std::result::Result<T, E> {
	fn into_outcome(self) -> Result<Option<Outcome>> {
		self.map_err(Into::into)?.into_outcome()
	}
}
