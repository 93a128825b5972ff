// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loading gate configuration from a file and building a manager from it.

use std::sync::Arc;

use loom_server_gate::config::ConfigError;
use loom_server_gate::{
	load_config_with_file, Argument, Arguments, Callback, ClassName, Container, GateManager,
	Policy,
};
use tempfile::TempDir;

use super::support::{container, Post, User, POST_CLASS};

fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("server.toml");
	std::fs::write(&path, contents).unwrap();
	(dir, path)
}

#[test]
fn missing_file_yields_defaults() {
	let dir = tempfile::tempdir().unwrap();
	let config = load_config_with_file(dir.path().join("absent.toml")).unwrap();

	assert!(config.policies.is_empty());
	assert_eq!(config.naming.namespace, "Policy");
	assert_eq!(config.naming.suffix, "Policy");
}

#[test]
fn file_bindings_are_registered_by_the_manager() {
	let (_dir, path) = write_config(
		r#"
[gate]
log_decisions = true

[[gate.policies]]
subject = "app::model::Post"
policy = "app::auth::ReadOnlyPostPolicy"

[[gate.policies]]
subject = "app::model::Comment"
policy = "app::auth::CommentPolicy"
"#,
	);
	let config = load_config_with_file(&path).unwrap();
	assert!(config.log_decisions);
	assert_eq!(config.policies.len(), 2);

	let mut container = container();
	container.instance(
		Policy::new("app::auth::ReadOnlyPostPolicy")
			.method("view", Callback::new(|_user: &User, _args: &Arguments| true))
			.method("update", Callback::new(|_user: &User, _args: &Arguments| false)),
	);
	let manager = GateManager::new(config, Arc::new(container), || Some(User::new(1)));

	assert_eq!(
		manager.policies()[0],
		(
			ClassName::new(POST_CLASS),
			ClassName::new("app::auth::ReadOnlyPostPolicy")
		)
	);
	assert!(manager.allows("view", Argument::model(Post::owned_by(1))).unwrap());
	assert!(manager.denies("update", Argument::model(Post::owned_by(1))).unwrap());
}

#[test]
fn naming_section_changes_policy_discovery() {
	let (_dir, path) = write_config(
		r#"
[gate.naming]
namespace = "rules"
suffix = "Rules"
"#,
	);
	let config = load_config_with_file(&path).unwrap();

	let mut container: Container<User> = Container::new();
	container.instance(
		Policy::new("app::model::rules::PostRules")
			.method("view", Callback::new(|_user: &User, _args: &Arguments| true)),
	);
	let manager = GateManager::new(config, Arc::new(container), || Some(User::new(1)));

	assert!(manager.allows("view", Argument::class(POST_CLASS)).unwrap());
}

#[test]
fn duplicate_subjects_fail_validation() {
	let (_dir, path) = write_config(
		r#"
[[gate.policies]]
subject = "app::model::Post"
policy = "app::auth::PostPolicy"

[[gate.policies]]
subject = "app::model::Post"
policy = "app::auth::OtherPostPolicy"
"#,
	);
	let err = load_config_with_file(&path).unwrap_err();
	assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn malformed_toml_is_reported_with_its_path() {
	let (_dir, path) = write_config("[gate\n");
	let err = load_config_with_file(&path).unwrap_err();
	match err {
		ConfigError::TomlParse { path: reported, .. } => assert_eq!(reported, path),
		other => panic!("unexpected error: {other}"),
	}
}
