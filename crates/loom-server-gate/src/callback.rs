// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Callables registered with the gate and their guest eligibility.
//!
//! Some rules must run for unauthenticated requests ("is this post public?").
//! Every callable therefore carries an explicit flag chosen when it is
//! registered:
//!
//! - [`Guarded::new`]-style constructors require a principal. When the gate
//!   evaluates for a guest, such callables are skipped (hooks) or fall through
//!   to the default denial (abilities and policy methods).
//! - `allow_guests` constructors are invoked with `None` as the principal.

use std::fmt;
use std::sync::Arc;

use loom_gate_core::{Arguments, IntoOutcome, Outcome, Principal, Result};

/// Signature of abilities and policy methods.
pub type AbilityFn<P> = dyn Fn(Option<&P>, &Arguments) -> Result<Option<Outcome>> + Send + Sync;

/// Signature of before hooks (global and per-policy).
pub type BeforeFn<P> =
	dyn Fn(Option<&P>, &str, &Arguments) -> Result<Option<Outcome>> + Send + Sync;

/// Signature of after hooks. The third argument is the running result.
pub type AfterFn<P> =
	dyn Fn(Option<&P>, &str, Option<&Outcome>, &Arguments) -> Result<Option<Outcome>> + Send + Sync;

/// A callable paired with its guest eligibility.
pub struct Guarded<F: ?Sized> {
	callback: Arc<F>,
	guests: bool,
}

/// An ability callback or policy method.
pub type Callback<P> = Guarded<AbilityFn<P>>;

/// A before hook.
pub type Hook<P> = Guarded<BeforeFn<P>>;

/// An after hook.
pub type AfterHook<P> = Guarded<AfterFn<P>>;

impl<F: ?Sized> Guarded<F> {
	/// True when the callable may run without a principal.
	pub fn allows_guest(&self) -> bool {
		self.guests
	}

	/// True when a principal is present or the callable accepts guests.
	pub fn can_be_called_with<P>(&self, principal: Option<&P>) -> bool {
		principal.is_some() || self.guests
	}
}

impl<F: ?Sized> Clone for Guarded<F> {
	fn clone(&self) -> Self {
		Self {
			callback: Arc::clone(&self.callback),
			guests: self.guests,
		}
	}
}

impl<F: ?Sized> fmt::Debug for Guarded<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Guarded")
			.field("guests", &self.guests)
			.finish_non_exhaustive()
	}
}

impl<P: Principal> Guarded<AbilityFn<P>> {
	/// An ability that requires an authenticated principal.
	pub fn new<F, R>(callback: F) -> Self
	where
		F: Fn(&P, &Arguments) -> R + Send + Sync + 'static,
		R: IntoOutcome,
	{
		Self {
			callback: Arc::new(move |principal: Option<&P>, arguments: &Arguments| {
				match principal {
					Some(principal) => callback(principal, arguments).into_outcome(),
					None => Ok(None),
				}
			}),
			guests: false,
		}
	}

	/// An ability that also runs for guests.
	pub fn allow_guests<F, R>(callback: F) -> Self
	where
		F: Fn(Option<&P>, &Arguments) -> R + Send + Sync + 'static,
		R: IntoOutcome,
	{
		Self {
			callback: Arc::new(move |principal: Option<&P>, arguments: &Arguments| {
				callback(principal, arguments).into_outcome()
			}),
			guests: true,
		}
	}

	pub(crate) fn call(&self, principal: Option<&P>, arguments: &Arguments) -> Result<Option<Outcome>> {
		(self.callback)(principal, arguments)
	}
}

impl<P: Principal> Guarded<BeforeFn<P>> {
	/// A before hook that requires an authenticated principal.
	pub fn new<F, R>(callback: F) -> Self
	where
		F: Fn(&P, &str, &Arguments) -> R + Send + Sync + 'static,
		R: IntoOutcome,
	{
		Self {
			callback: Arc::new(
				move |principal: Option<&P>, ability: &str, arguments: &Arguments| match principal {
					Some(principal) => callback(principal, ability, arguments).into_outcome(),
					None => Ok(None),
				},
			),
			guests: false,
		}
	}

	/// A before hook that also runs for guests.
	pub fn allow_guests<F, R>(callback: F) -> Self
	where
		F: Fn(Option<&P>, &str, &Arguments) -> R + Send + Sync + 'static,
		R: IntoOutcome,
	{
		Self {
			callback: Arc::new(
				move |principal: Option<&P>, ability: &str, arguments: &Arguments| {
					callback(principal, ability, arguments).into_outcome()
				},
			),
			guests: true,
		}
	}

	pub(crate) fn call(
		&self,
		principal: Option<&P>,
		ability: &str,
		arguments: &Arguments,
	) -> Result<Option<Outcome>> {
		(self.callback)(principal, ability, arguments)
	}
}

impl<P: Principal> Guarded<AfterFn<P>> {
	/// An after hook that requires an authenticated principal.
	pub fn new<F, R>(callback: F) -> Self
	where
		F: Fn(&P, &str, Option<&Outcome>, &Arguments) -> R + Send + Sync + 'static,
		R: IntoOutcome,
	{
		Self {
			callback: Arc::new(
				move |principal: Option<&P>,
				      ability: &str,
				      result: Option<&Outcome>,
				      arguments: &Arguments| match principal {
					Some(principal) => callback(principal, ability, result, arguments).into_outcome(),
					None => Ok(None),
				},
			),
			guests: false,
		}
	}

	/// An after hook that also runs for guests.
	pub fn allow_guests<F, R>(callback: F) -> Self
	where
		F: Fn(Option<&P>, &str, Option<&Outcome>, &Arguments) -> R + Send + Sync + 'static,
		R: IntoOutcome,
	{
		Self {
			callback: Arc::new(
				move |principal: Option<&P>,
				      ability: &str,
				      result: Option<&Outcome>,
				      arguments: &Arguments| {
					callback(principal, ability, result, arguments).into_outcome()
				},
			),
			guests: true,
		}
	}

	pub(crate) fn call(
		&self,
		principal: Option<&P>,
		ability: &str,
		result: Option<&Outcome>,
		arguments: &Arguments,
	) -> Result<Option<Outcome>> {
		(self.callback)(principal, ability, result, arguments)
	}
}
