// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Before and after hooks run around every ability check.

use std::sync::Arc;

use loom_gate_core::{Arguments, Outcome, Principal, Result};
use tracing::{debug, trace};

use crate::callback::{AfterHook, Hook};

/// Snapshot of the registered hooks, in registration order.
pub struct InterceptorChain<P: Principal> {
	before: Arc<Vec<Hook<P>>>,
	after: Arc<Vec<AfterHook<P>>>,
}

impl<P: Principal> Clone for InterceptorChain<P> {
	fn clone(&self) -> Self {
		Self {
			before: Arc::clone(&self.before),
			after: Arc::clone(&self.after),
		}
	}
}

impl<P: Principal> InterceptorChain<P> {
	pub fn new(before: Arc<Vec<Hook<P>>>, after: Arc<Vec<AfterHook<P>>>) -> Self {
		Self { before, after }
	}

	/// Runs before hooks until one has an opinion.
	pub fn run_before(
		&self,
		principal: Option<&P>,
		ability: &str,
		arguments: &Arguments,
	) -> Result<Option<Outcome>> {
		for (index, hook) in self.before.iter().enumerate() {
			if !hook.can_be_called_with(principal) {
				trace!(ability, index, "skipping before hook that requires a principal");
				continue;
			}
			if let Some(outcome) = hook.call(principal, ability, arguments)? {
				debug!(ability, index, allowed = outcome.is_allowed(), "before hook decided");
				return Ok(Some(outcome));
			}
		}
		Ok(None)
	}

	/// Runs every eligible after hook and folds their answers into `result`.
	///
	/// An allowing result is final. Otherwise a hook's non-`None` answer
	/// replaces the running result and `None` leaves it alone.
	pub fn run_after(
		&self,
		principal: Option<&P>,
		ability: &str,
		arguments: &Arguments,
		result: Option<Outcome>,
	) -> Result<Option<Outcome>> {
		let mut result = result;
		for (index, hook) in self.after.iter().enumerate() {
			if !hook.can_be_called_with(principal) {
				trace!(ability, index, "skipping after hook that requires a principal");
				continue;
			}
			let answer = hook.call(principal, ability, result.as_ref(), arguments)?;
			let allowed = result.as_ref().is_some_and(Outcome::is_allowed);
			if !allowed {
				if let Some(answer) = answer {
					result = Some(answer);
				}
			}
		}
		Ok(result)
	}
}
