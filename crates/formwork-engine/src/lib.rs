//! The formwork form engine.
//!
//! # Crate Architecture
//!
//! This crate is the engine layer — the single owner of form state:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SDK Layer                               │
//! │  (stable, safe for plugins and integrations to depend on)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  formwork-types : Name, PathKey, FieldEntry, ErrorCode      │
//! │  formwork-hook  : Hook, HookKind, HookMap                   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  formwork-engine : PathStore, Engine, Validator,  ◄── HERE  │
//! │                    FormPlugin / FormApi / ItemApi           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Overview
//!
//! An [`Engine`] owns a value tree and an error tree, both addressed by
//! [`Name`] paths, and announces every mutation on per-path and
//! form-wide hooks. The rendering integration subscribes to those hooks
//! and drives mutation through [`Engine::set_fields`] and friends; it is
//! the sole authority for firing announcements.
//!
//! Third-party behavior enters only through [`Engine::register_plugins`].
//! Each plugin receives a [`FormApi`] — a fixed, narrow view that can
//! listen to announcements and request changes, but can neither fire
//! announcements nor reach the engine's internals. See the
//! [`plugin`] module docs for the directional contract.
//!
//! Everything is synchronous: a mutating call returns after every
//! listener it triggered has run. Reentrancy is allowed and unguarded —
//! a listener may mutate the engine that is dispatching it.
//!
//! # Example
//!
//! ```
//! use formwork_engine::{Engine, Rule};
//! use formwork_types::{FieldEntry, Name};
//! use serde_json::json;
//!
//! let engine = Engine::new();
//!
//! // Rendering-integration side: subscribe a field and mutate.
//! let hooks = engine.hooks_for(&Name::from("user.name"));
//! hooks.force_update.on(|_| { /* re-render the field */ });
//! engine.set_fields(vec![FieldEntry::new("user.name", json!("Ann"))]);
//!
//! // Validation: first applicable rule wins.
//! engine.validator().define_rule("required", Rule::new("required", |v| !v.is_null()));
//! assert!(engine.validate_field(&Name::from("user.name"), "required").is_pass());
//! ```

mod engine;
pub mod plugin;
mod store;
mod validator;

pub use engine::{Engine, FieldHooks, GlobalHooks};
pub use plugin::{ChangeHook, FormApi, FormPlugin, ItemApi, LifecycleHook, PluginError};
pub use store::PathStore;
pub use validator::{Predicate, Rule, Validator, Verdict};

// Re-export from the SDK layer for convenience
pub use formwork_hook::{Hook, HookKind, HookMap, Interceptor};
pub use formwork_types::{FieldEntry, Name, PathKey, Segment};

// Re-export testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for the engine layer.
    //!
    //! Provides [`FnPlugin`] for wiring closure-based plugins in tests.
    pub use crate::plugin::testing::FnPlugin;
}
