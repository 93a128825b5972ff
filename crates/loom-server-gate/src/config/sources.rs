// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use super::error::ConfigError;
use super::layer::{ConfigFile, GateConfigLayer, NamingConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<GateConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<GateConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(GateConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/loom/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<GateConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(GateConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})?;

		trace!("parsed gate config layer from TOML");
		Ok(file.gate.unwrap_or_default())
	}
}

/// Environment variable source.
///
/// Convention: LOOM_SERVER_GATE_<FIELD>. Policy bindings are file-only.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<GateConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(GateConfigLayer {
			policies: None,
			naming: Some(NamingConfigLayer {
				namespace: env_var("LOOM_SERVER_GATE_POLICY_NAMESPACE"),
				suffix: env_var("LOOM_SERVER_GATE_POLICY_SUFFIX"),
			}),
			log_decisions: env_bool("LOOM_SERVER_GATE_LOG_DECISIONS")?,
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>, ConfigError> {
	match env_var(name) {
		Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(Some(true)),
		Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(Some(false)),
		Some(v) => Err(ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid bool value '{v}'"),
		}),
		None => Ok(None),
	}
}
