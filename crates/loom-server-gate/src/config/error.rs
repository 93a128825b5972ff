// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading gate configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// I/O error reading the config file
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// An environment variable held an unusable value
	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	/// Validation error
	#[error("validation error: {0}")]
	Validation(String),
}
