// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The acting identity of an authorization check.

use std::fmt;

/// An authenticated identity the gate evaluates abilities for.
///
/// The gate only reads [`Principal::auth_identifier`] (for log fields). The
/// password hook exists for the authentication collaborators that produce
/// principals and is never consulted during evaluation.
pub trait Principal: Send + Sync + fmt::Debug + 'static {
	/// Stable identifier of this principal.
	fn auth_identifier(&self) -> String;

	/// Hashed password or secret, if the principal has one.
	fn auth_password(&self) -> Option<&str> {
		None
	}
}

/// Log-friendly identifier for an optional principal.
pub fn principal_label<P: Principal>(principal: Option<&P>) -> String {
	principal
		.map(|p| p.auth_identifier())
		.unwrap_or_else(|| "guest".to_string())
}
