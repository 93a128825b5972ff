// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization gate for Loom server.
//!
//! The gate decides whether a principal (or a guest) may perform a named
//! ability against a list of arguments.
//!
//! # Architecture
//!
//! - `registry` - ability definitions (callbacks and policy method references)
//! - `policy` - per-subject policy objects with an optional `before` hook
//! - `container` - construction of policy instances and the class hierarchy
//! - `resolver` - policy discovery (binding, naming convention, supertypes)
//! - `interceptor` - global before/after hooks
//! - `gate` - the evaluation engine and principal-scoped gates
//! - `manager` - the server-wide gate built from configuration
//! - `config` - layered configuration (defaults, TOML, environment)
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use std::sync::Arc;
//!
//! use loom_server_gate::{Argument, Arguments, Callback, ClassName, Container, Gate, Model, Policy, Principal};
//!
//! #[derive(Debug)]
//! struct User { id: u64 }
//!
//! impl Principal for User {
//!     fn auth_identifier(&self) -> String { self.id.to_string() }
//! }
//!
//! #[derive(Debug)]
//! struct Post { owner_id: u64 }
//!
//! impl Model for Post {
//!     fn class_name(&self) -> ClassName { ClassName::new("app::model::Post") }
//!     fn as_any(&self) -> &dyn Any { self }
//! }
//!
//! let mut container = Container::new();
//! container.instance(Policy::new("app::model::Policy::PostPolicy").method(
//!     "update",
//!     Callback::new(|user: &User, args: &Arguments| {
//!         args.model::<Post>(0).is_some_and(|post| post.owner_id == user.id)
//!     }),
//! ));
//!
//! let gate: Gate<User> = Gate::new(Arc::new(container), || None);
//! let alice = gate.for_principal(Arc::new(User { id: 1 }));
//!
//! assert!(alice.allows("update", Argument::model(Post { owner_id: 1 })).unwrap());
//! assert!(alice.denies("update", Argument::model(Post { owner_id: 2 })).unwrap());
//! ```

pub mod authorizable;
pub mod callback;
pub mod config;
pub mod container;
pub mod gate;
pub mod interceptor;
pub mod manager;
pub mod policy;
pub mod registry;
pub mod resolver;

pub use authorizable::{Authorizable, AuthorizesRequests};
pub use callback::{AbilityFn, AfterFn, AfterHook, BeforeFn, Callback, Guarded, Hook};
pub use config::{load_config, load_config_with_file, ConfigError, GateConfig};
pub use container::{Container, PolicyContainer};
pub use gate::{Gate, PrincipalSupplier};
pub use interceptor::InterceptorChain;
pub use manager::GateManager;
pub use policy::{Policy, INVOKE_METHOD};
pub use registry::{AbilityRegistry, MethodRef, Target};
pub use resolver::{NamingConvention, PolicyBindings, PolicyNameGuesser, PolicyResolver, Subject};

// Re-export core types for convenience
pub use loom_gate_core::*;
