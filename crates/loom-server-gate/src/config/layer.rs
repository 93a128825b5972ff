// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial gate configuration, merged across sources.

use serde::Deserialize;

use crate::resolver::{DEFAULT_POLICY_NAMESPACE, DEFAULT_POLICY_SUFFIX};

/// A subject class and the policy class that governs it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyBindingConfig {
	pub subject: String,
	pub policy: String,
}

/// Policy naming convention (runtime, fully resolved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
	pub namespace: String,
	pub suffix: String,
}

impl Default for NamingConfig {
	fn default() -> Self {
		Self {
			namespace: DEFAULT_POLICY_NAMESPACE.to_string(),
			suffix: DEFAULT_POLICY_SUFFIX.to_string(),
		}
	}
}

/// Policy naming convention layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamingConfigLayer {
	#[serde(default)]
	pub namespace: Option<String>,
	#[serde(default)]
	pub suffix: Option<String>,
}

impl NamingConfigLayer {
	pub fn merge(&mut self, other: NamingConfigLayer) {
		if other.namespace.is_some() {
			self.namespace = other.namespace;
		}
		if other.suffix.is_some() {
			self.suffix = other.suffix;
		}
	}

	pub fn finalize(self) -> NamingConfig {
		NamingConfig {
			namespace: self
				.namespace
				.unwrap_or_else(|| DEFAULT_POLICY_NAMESPACE.to_string()),
			suffix: self
				.suffix
				.unwrap_or_else(|| DEFAULT_POLICY_SUFFIX.to_string()),
		}
	}
}

/// Gate configuration layer (partial, for merging).
///
/// Deserialized from the `[gate]` table of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GateConfigLayer {
	#[serde(default)]
	pub policies: Option<Vec<PolicyBindingConfig>>,
	#[serde(default)]
	pub naming: Option<NamingConfigLayer>,
	#[serde(default)]
	pub log_decisions: Option<bool>,
}

impl GateConfigLayer {
	/// Merges `other` over `self`. A later policy list replaces an earlier one.
	pub fn merge(&mut self, other: GateConfigLayer) {
		if other.policies.is_some() {
			self.policies = other.policies;
		}
		if let Some(naming) = other.naming {
			self.naming.get_or_insert_with(Default::default).merge(naming);
		}
		if other.log_decisions.is_some() {
			self.log_decisions = other.log_decisions;
		}
	}
}

/// Root of the config file. Only the `[gate]` table is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ConfigFile {
	#[serde(default)]
	pub gate: Option<GateConfigLayer>,
}
