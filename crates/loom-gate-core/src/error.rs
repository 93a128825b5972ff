// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::argument::ClassName;
use crate::response::Response;

/// Message used when a denial carries no message of its own.
pub const DEFAULT_DENIAL_MESSAGE: &str = "This action is unauthorized.";

/// Result type alias for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Top-level error type for gate operations.
///
/// Only [`GateError::Authorization`] is recovered by the gate itself (it is
/// turned back into its [`Response`] by `inspect`). Every other variant
/// propagates to the caller unchanged.
#[derive(Error, Debug)]
pub enum GateError {
	#[error("invalid registration for ability `{ability}`: {reason}")]
	InvalidRegistration { ability: String, reason: String },

	#[error(transparent)]
	Authorization(#[from] AuthorizationError),

	#[error(transparent)]
	Resolution(#[from] ResolutionError),

	#[error("policy `{policy}` does not define method `{method}`")]
	MissingMethod { policy: ClassName, method: String },

	#[error(transparent)]
	Callback(Box<dyn StdError + Send + Sync>),
}

impl GateError {
	/// Wraps an arbitrary failure raised inside an ability, policy or hook.
	pub fn callback<E>(err: E) -> Self
	where
		E: Into<Box<dyn StdError + Send + Sync>>,
	{
		GateError::Callback(err.into())
	}

	pub fn invalid_registration(ability: impl Into<String>, reason: impl Into<String>) -> Self {
		GateError::InvalidRegistration {
			ability: ability.into(),
			reason: reason.into(),
		}
	}

	/// Returns the carried response if this is an authorization denial.
	pub fn as_authorization(&self) -> Option<&AuthorizationError> {
		match self {
			GateError::Authorization(err) => Some(err),
			_ => None,
		}
	}
}

/// A denial raised as an error.
///
/// Carries the denying [`Response`] so callers can render its message and
/// code without re-deriving them.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationError {
	response: Response,
}

impl AuthorizationError {
	pub fn new(response: Response) -> Self {
		Self { response }
	}

	/// Builds an error from a bare message, as policies do when they bail out early.
	pub fn denied(message: impl Into<String>) -> Self {
		Self::new(Response::deny_with(message, None))
	}

	pub fn response(&self) -> &Response {
		&self.response
	}

	pub fn into_response(self) -> Response {
		self.response
	}
}

impl fmt::Display for AuthorizationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.response.message().unwrap_or(DEFAULT_DENIAL_MESSAGE))
	}
}

impl StdError for AuthorizationError {}

/// Errors raised by a policy container when building a policy instance.
#[derive(Error, Debug)]
pub enum ResolutionError {
	#[error("no policy registered for class `{0}`")]
	NotFound(ClassName),

	#[error("failed to construct policy `{class}`: {source}")]
	Construction {
		class: ClassName,
		#[source]
		source: Box<dyn StdError + Send + Sync>,
	},
}
