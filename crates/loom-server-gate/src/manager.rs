// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server-wide gate built from configuration.

use std::ops::Deref;
use std::sync::Arc;

use loom_gate_core::Principal;
use tracing::info;

use crate::config::GateConfig;
use crate::container::PolicyContainer;
use crate::gate::Gate;

/// Owns the root [`Gate`] of a server.
///
/// Construction applies the configured naming convention, registers the
/// configured policy bindings in order and enables decision logging when
/// asked to. Derefs to the gate for registration and checks.
pub struct GateManager<P: Principal> {
	gate: Gate<P>,
	config: GateConfig,
}

impl<P: Principal> GateManager<P> {
	pub fn new<F>(config: GateConfig, container: Arc<dyn PolicyContainer<P>>, principal: F) -> Self
	where
		F: Fn() -> Option<Arc<P>> + Send + Sync + 'static,
	{
		let gate = Gate::new(container, principal)
			.with_naming(config.naming_convention())
			.with_decision_logging(config.log_decisions);

		for binding in &config.policies {
			gate.policy(binding.subject.as_str(), binding.policy.as_str());
		}

		info!(
			policies = config.policies.len(),
			namespace = %config.naming.namespace,
			suffix = %config.naming.suffix,
			log_decisions = config.log_decisions,
			"gate manager resolved"
		);

		Self { gate, config }
	}

	pub fn gate(&self) -> &Gate<P> {
		&self.gate
	}

	pub fn config(&self) -> &GateConfig {
		&self.config
	}
}

impl<P: Principal> Deref for GateManager<P> {
	type Target = Gate<P>;

	fn deref(&self) -> &Self::Target {
		&self.gate
	}
}

impl<P: Principal> Clone for GateManager<P> {
	fn clone(&self) -> Self {
		Self {
			gate: self.gate.clone(),
			config: self.config.clone(),
		}
	}
}
