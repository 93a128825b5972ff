// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered gate configuration.
//!
//! Sources are merged in precedence order (highest wins):
//! 1. Environment variables (`LOOM_SERVER_GATE_*`)
//! 2. The `[gate]` table of the config file (`/etc/loom/server.toml`)
//! 3. Built-in defaults
//!
//! ```toml
//! [gate]
//! log_decisions = true
//!
//! [gate.naming]
//! namespace = "Policy"
//! suffix = "Policy"
//!
//! [[gate.policies]]
//! subject = "app::model::Post"
//! policy = "app::policy::PostPolicy"
//! ```

pub mod error;
pub mod layer;
pub mod sources;

use std::collections::HashSet;
use std::path::PathBuf;

use loom_gate_core::{is_identifier, ClassName};
use tracing::{debug, info};

pub use error::ConfigError;
pub use layer::{GateConfigLayer, NamingConfig, NamingConfigLayer, PolicyBindingConfig};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use crate::resolver::NamingConvention;

/// Fully resolved gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateConfig {
	/// Policy bindings, registered in this order.
	pub policies: Vec<PolicyBindingConfig>,
	pub naming: NamingConfig,
	pub log_decisions: bool,
}

impl GateConfig {
	pub fn naming_convention(&self) -> NamingConvention {
		NamingConvention::new(self.naming.namespace.clone(), self.naming.suffix.clone())
	}
}

/// Load configuration from all sources with standard precedence.
pub fn load_config() -> Result<GateConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<GateConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<GateConfig, ConfigError> {
	load_from(vec![Box::new(EnvSource)])
}

fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<GateConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = GateConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize a merged layer into resolved config.
pub fn finalize(layer: GateConfigLayer) -> Result<GateConfig, ConfigError> {
	let config = GateConfig {
		policies: layer.policies.unwrap_or_default(),
		naming: layer.naming.unwrap_or_default().finalize(),
		log_decisions: layer.log_decisions.unwrap_or(false),
	};

	validate_config(&config)?;

	info!(
		policies = config.policies.len(),
		namespace = %config.naming.namespace,
		suffix = %config.naming.suffix,
		log_decisions = config.log_decisions,
		"Gate configuration loaded"
	);

	Ok(config)
}

fn validate_config(config: &GateConfig) -> Result<(), ConfigError> {
	if !is_identifier(&config.naming.namespace) {
		return Err(ConfigError::Validation(format!(
			"policy namespace '{}' is not a valid path segment",
			config.naming.namespace
		)));
	}
	if !is_identifier(&config.naming.suffix) {
		return Err(ConfigError::Validation(format!(
			"policy suffix '{}' is not a valid identifier",
			config.naming.suffix
		)));
	}

	let mut subjects = HashSet::new();
	for binding in &config.policies {
		for class in [&binding.subject, &binding.policy] {
			if !ClassName::new(class.as_str()).is_well_formed() {
				return Err(ConfigError::Validation(format!(
					"'{class}' is not a valid class name"
				)));
			}
		}
		if !subjects.insert(binding.subject.as_str()) {
			return Err(ConfigError::Validation(format!(
				"subject '{}' is bound to more than one policy",
				binding.subject
			)));
		}
	}

	Ok(())
}
