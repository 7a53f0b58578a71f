//! Event hooks for the formwork form engine.
//!
//! # Crate Architecture
//!
//! This crate is the event layer of the workspace, between the
//! foundational types and the engine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SDK Layer                               │
//! │  (stable, safe for plugins and integrations to depend on)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  formwork-types : Name, PathKey, FieldEntry, ErrorCode      │
//! │  formwork-hook  : Hook, HookKind, HookMap        ◄── HERE   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  formwork-engine : PathStore, Engine, Validator, plugins    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Overview
//!
//! A [`Hook`] is one event's registry: persistent listeners (fired in
//! registration order), a one-shot stack (fired in reverse order and
//! self-removing), and an interceptor chain that transforms the payload
//! before any listener sees it. A [`HookMap`] lazily creates hooks per
//! canonical path key, which is what lets `"a"` and `["a"]` subscribe to
//! the same event.
//!
//! Dispatch is fully synchronous and reentrancy-safe: no internal lock
//! is held while listener code runs, so listeners may mutate the very
//! hook that is firing them.
//!
//! # Direction
//!
//! [`HookKind`] classifies every event as an *announcement* (the owning
//! integration fires, plugins listen) or a *request* (plugins fire, the
//! integration listens). The engine's plugin boundary is built on never
//! handing both directions of one hook to the same party.
//!
//! # Example
//!
//! ```
//! use formwork_hook::{HookKind, HookMap, Interceptor};
//! use formwork_types::Name;
//! use serde_json::json;
//!
//! let map = HookMap::new(HookKind::OnChange);
//! let hook = map.for_name(&Name::from("user.name"));
//!
//! hook.intercept(Interceptor::transform(|v| json!({ "value": v })));
//! hook.on(|payload| {
//!     assert_eq!(payload["value"], json!("Ann"));
//! });
//!
//! map.for_name(&Name::from("user.name")).call(json!("Ann"));
//! ```

mod error;
pub mod hook;
mod kind;
mod map;

pub use error::HookError;
pub use hook::{Hook, Interceptor, Listener, Transform};
pub use kind::HookKind;
pub use map::HookMap;

// Re-export testing utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    //! Test utilities for the hook layer.
    //!
    //! Provides [`Recorder`] for asserting on dispatched payloads.
    pub use crate::hook::testing::Recorder;
}
