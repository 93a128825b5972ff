// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom authorization gate.
//!
//! This crate provides the vocabulary shared by the gate engine
//! (`loom-server-gate`) and the code that registers abilities and policies:
//!
//! - [`Response`]: the immutable allow/deny verdict with message and code
//! - [`Outcome`] / [`IntoOutcome`]: raw callback results before normalization
//! - [`Arguments`] / [`Argument`] / [`Model`]: what an ability is checked against
//! - [`Principal`]: the acting identity (absent for guests)
//! - [`GateError`]: the error taxonomy of registration and evaluation
//!
//! # Example
//!
//! ```
//! use loom_gate_core::{Response, Outcome};
//!
//! let denied = Response::deny_with("You do not own this post.", Some(403.into()));
//! let err = denied.clone().authorize().unwrap_err();
//! assert_eq!(err.response(), &denied);
//!
//! assert!(Outcome::normalize(None).denied());
//! ```

pub mod ability;
pub mod argument;
pub mod error;
pub mod outcome;
pub mod principal;
pub mod response;

pub use ability::{
	ability_to_method, is_method_without_model, normalize_guessed_ability_name,
	resource_ability_map, RESOURCE_ABILITIES, RESOURCE_METHODS_WITHOUT_MODELS,
	RESOURCE_METHOD_ABILITIES,
};
pub use argument::{is_identifier, Argument, Arguments, ClassName, Model, PATH_SEPARATOR};
pub use error::{AuthorizationError, GateError, ResolutionError, Result, DEFAULT_DENIAL_MESSAGE};
pub use outcome::{IntoOutcome, Outcome};
pub use principal::{principal_label, Principal};
pub use response::Response;
