// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization decisions.
//!
//! A [`Response`] is the normalized verdict produced by the gate: allowed or
//! denied, with an optional human-readable message and an optional
//! machine-readable code. It is the only artifact of an authorization check
//! that is meant to leave the process (for example, rendered into an HTTP
//! error body), so it serializes as `{ "allowed", "message", "code" }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::AuthorizationError;

/// An immutable allow/deny verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
	allowed: bool,
	message: Option<String>,
	code: Option<Value>,
}

impl Response {
	/// Creates a response with every field given explicitly.
	pub fn new(allowed: bool, message: Option<String>, code: Option<Value>) -> Self {
		Self {
			allowed,
			message,
			code,
		}
	}

	/// An allowing response with no message or code.
	pub fn allow() -> Self {
		Self::new(true, None, None)
	}

	/// A denying response with no message or code.
	pub fn deny() -> Self {
		Self::new(false, None, None)
	}

	/// An allowing response carrying a message and an optional code.
	pub fn allow_with(message: impl Into<String>, code: Option<Value>) -> Self {
		Self::new(true, Some(message.into()), code)
	}

	/// A denying response carrying a message and an optional code.
	pub fn deny_with(message: impl Into<String>, code: Option<Value>) -> Self {
		Self::new(false, Some(message.into()), code)
	}

	/// Returns a copy of this response with the given message.
	pub fn with_message(self, message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			..self
		}
	}

	/// Returns a copy of this response with the given code.
	pub fn with_code(self, code: impl Into<Value>) -> Self {
		Self {
			code: Some(code.into()),
			..self
		}
	}

	pub fn allowed(&self) -> bool {
		self.allowed
	}

	pub fn denied(&self) -> bool {
		!self.allowed
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	pub fn code(&self) -> Option<&Value> {
		self.code.as_ref()
	}

	/// Converts a denial into an [`AuthorizationError`] carrying this response.
	///
	/// Allowed responses are returned unchanged.
	pub fn authorize(self) -> Result<Self, AuthorizationError> {
		if self.denied() {
			return Err(AuthorizationError::new(self));
		}
		Ok(self)
	}

	/// Structured form suitable for embedding in a response body.
	pub fn to_structured(&self) -> Value {
		serde_json::json!({
			"allowed": self.allowed,
			"message": self.message,
			"code": self.code,
		})
	}
}

impl fmt::Display for Response {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.message.as_deref().unwrap_or(""))
	}
}

impl From<bool> for Response {
	fn from(allowed: bool) -> Self {
		Self::new(allowed, None, None)
	}
}
