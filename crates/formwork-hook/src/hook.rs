//! Hook — one event's listener and interceptor registry.
//!
//! A [`Hook`] carries three ordered collections:
//!
//! - persistent listeners, fired in registration order on every call
//! - one-shot listeners, a stack fired in reverse-registration order and
//!   removed as they fire
//! - interceptors, payload-transform steps run before any listener
//!
//! Splitting persistent and one-shot registration lets a caller wait once
//! for a specific event (say, a field mounting) without leaking a
//! long-lived subscription, while reactive bindings stay persistent.
//!
//! # Reentrancy
//!
//! Dispatch never holds an internal lock across listener code: the
//! persistent list is snapshotted before invoking, and one-shots are
//! popped one at a time. A listener may therefore re-enter the same hook
//! (`on`, `once`, even `call`) freely. Listeners added during a call do
//! not see the in-flight dispatch — except one-shots, which are drained
//! until the stack is empty, including any pushed mid-call.
//!
//! # Failure
//!
//! Nothing is caught. A panicking listener unwinds out of [`Hook::call`]
//! and the rest of that dispatch cycle is skipped.

use crate::HookKind;
use formwork_types::ListenerId;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Boxed listener invoked with the dispatched payload.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Boxed payload transform applied by an interceptor.
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A payload-transform step run ahead of listener dispatch.
///
/// The transform is optional. An interceptor *without* a transform does
/// not pass the payload through — it collapses it to `Value::Null` for
/// the rest of the chain. Callers that want pass-through must say so:
/// `Interceptor::transform(|v| v)`.
#[derive(Clone)]
pub struct Interceptor {
    before_call: Option<Transform>,
}

// NOTE: no `Default` — a defaulted interceptor would silently null every
// payload on the hook it lands on. Empty interceptors must be explicit.

impl Interceptor {
    /// Creates an interceptor that maps the payload through `f`.
    #[must_use]
    pub fn transform(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            before_call: Some(Arc::new(f)),
        }
    }

    /// Creates an interceptor with no transform.
    ///
    /// During dispatch this step replaces the payload with `Value::Null`;
    /// it does not pass it through.
    #[must_use]
    pub fn empty() -> Self {
        Self { before_call: None }
    }

    /// Returns `true` if this interceptor carries a transform.
    #[must_use]
    pub fn has_transform(&self) -> bool {
        self.before_call.is_some()
    }
}

impl std::fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("has_transform", &self.has_transform())
            .finish()
    }
}

struct HookInner {
    kind: HookKind,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    once: Mutex<Vec<Listener>>,
    interceptors: Mutex<Vec<Interceptor>>,
}

/// One event's registry and dispatcher.
///
/// `Hook` is a cheap-clone handle; clones share the same registry.
/// Hooks are created once (global events) or lazily per canonical path
/// key (see [`HookMap`](crate::HookMap)) and live for their owner's
/// whole lifetime.
///
/// # Example
///
/// ```
/// use formwork_hook::{Hook, HookKind, Interceptor};
/// use serde_json::json;
/// use std::sync::{Arc, Mutex};
///
/// let hook = Hook::new(HookKind::OnChange);
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = seen.clone();
/// hook.on(move |payload| sink.lock().unwrap().push(payload.clone()));
/// hook.intercept(Interceptor::transform(|v| json!({ "wrapped": v })));
///
/// hook.call(json!(1));
/// assert_eq!(seen.lock().unwrap().as_slice(), &[json!({ "wrapped": 1 })]);
/// ```
#[derive(Clone)]
pub struct Hook {
    inner: Arc<HookInner>,
}

impl Hook {
    /// Creates an empty hook for `kind`.
    #[must_use]
    pub fn new(kind: HookKind) -> Self {
        Self {
            inner: Arc::new(HookInner {
                kind,
                listeners: Mutex::new(Vec::new()),
                once: Mutex::new(Vec::new()),
                interceptors: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Returns this hook's event kind.
    #[must_use]
    pub fn kind(&self) -> HookKind {
        self.inner.kind
    }

    /// Registers a persistent listener; returns the removal handle.
    ///
    /// No dedup is performed — registering the same closure twice fires
    /// it twice, under two distinct handles.
    pub fn on(&self, listener: impl Fn(&Value) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId::new();
        self.inner.listeners.lock().push((id.clone(), Arc::new(listener)));
        id
    }

    /// Registers a one-shot listener.
    ///
    /// One-shots fire in reverse registration order and cannot be
    /// removed; they remove themselves by firing.
    pub fn once(&self, listener: impl Fn(&Value) + Send + Sync + 'static) {
        self.inner.once.lock().push(Arc::new(listener));
    }

    /// Removes a persistent listener by handle.
    ///
    /// Returns `true` if the handle was registered here. One-shot
    /// listeners are not reachable through `off`.
    pub fn off(&self, id: &ListenerId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(registered, _)| registered != id);
        listeners.len() < before
    }

    /// Appends an interceptor to the transform chain.
    pub fn intercept(&self, interceptor: Interceptor) {
        self.inner.interceptors.lock().push(interceptor);
    }

    /// Dispatches `payload` through this hook.
    ///
    /// Order: the interceptor chain runs left to right, each step's
    /// output feeding the next step's input; then every persistent
    /// listener fires in registration order with the final payload; then
    /// one-shots pop and fire LIFO until the stack is empty.
    pub fn call(&self, payload: Value) {
        let interceptors: Vec<Interceptor> = self.inner.interceptors.lock().clone();
        let mut payload = payload;
        for interceptor in &interceptors {
            payload = match &interceptor.before_call {
                Some(transform) => transform(payload),
                None => {
                    tracing::warn!(kind = %self.inner.kind, "interceptor has no transform, payload nulled");
                    Value::Null
                }
            };
        }

        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        tracing::trace!(
            kind = %self.inner.kind,
            listeners = listeners.len(),
            "dispatch"
        );
        for listener in listeners {
            listener(&payload);
        }

        // Drain the one-shot stack, including entries pushed mid-call.
        loop {
            let Some(listener) = self.inner.once.lock().pop() else {
                break;
            };
            listener(&payload);
        }
    }

    /// Returns the number of persistent listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Returns `true` if neither listeners nor one-shots are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.listeners.lock().is_empty() && self.inner.once.lock().is_empty()
    }

    /// Returns `true` if both handles refer to the same registry.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("kind", &self.inner.kind)
            .field("listeners", &self.inner.listeners.lock().len())
            .field("once", &self.inner.once.lock().len())
            .field("interceptors", &self.inner.interceptors.lock().len())
            .finish()
    }
}

/// Test utilities for the hook layer.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;

    /// Records every payload it is invoked with.
    ///
    /// Hand its [`listener`](Recorder::listener) closure to `on`/`once`
    /// and assert on [`payloads`](Recorder::payloads) afterwards.
    #[derive(Clone, Default)]
    pub struct Recorder {
        seen: Arc<Mutex<Vec<Value>>>,
    }

    impl Recorder {
        /// Creates an empty recorder.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Returns a listener closure feeding this recorder.
        pub fn listener(&self) -> impl Fn(&Value) + Clone + Send + Sync + 'static {
            let seen = self.seen.clone();
            move |payload| seen.lock().push(payload.clone())
        }

        /// Returns how many times the listener fired.
        #[must_use]
        pub fn count(&self) -> usize {
            self.seen.lock().len()
        }

        /// Returns the recorded payloads in firing order.
        #[must_use]
        pub fn payloads(&self) -> Vec<Value> {
            self.seen.lock().clone()
        }
    }
}
