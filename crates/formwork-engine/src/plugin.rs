//! The plugin boundary — restricted, directional views over the engine.
//!
//! Plugins never touch the engine directly. At registration each plugin
//! receives a [`FormApi`]: a fixed, narrow interface whose fields close
//! over the engine without exposing it. The narrowing is directional —
//! for any one hook a plugin holds either the listening side or the
//! firing side, never both:
//!
//! - announcements (`onChange`, `didMount`, ...) come as [`ChangeHook`]
//!   or [`LifecycleHook`]: `on`/`once` (and `intercept` for changes),
//!   no `call`, no `off`
//! - requests (`setState`, `setSchema`, ...) are plain fire methods:
//!   they `call` the underlying hook, and no listening surface for it
//!   exists anywhere on the plugin view
//!
//! The owning integration stays the single authority for announcing
//! "this changed"; plugins can only request changes or react to
//! announcements. A plugin can therefore never close a feedback loop by
//! both firing and observing the same hook.

use crate::Engine;
use formwork_hook::{Hook, Interceptor};
use formwork_types::{ErrorCode, FieldEntry, ListenerId, Name};
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced while registering plugins.
#[derive(Debug, Clone, Error)]
pub enum PluginError {
    /// A plugin's `apply` failed.
    #[error("plugin setup failed [{plugin}]: {message}")]
    Setup {
        /// Name of the failing plugin.
        plugin: String,
        /// What went wrong.
        message: String,
    },
}

impl PluginError {
    /// Convenience constructor for a setup failure.
    #[must_use]
    pub fn setup(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Setup {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for PluginError {
    fn code(&self) -> &'static str {
        match self {
            Self::Setup { .. } => "PLUGIN_SETUP_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Fixing the plugin's preconditions and re-registering succeeds.
        true
    }
}

/// A third-party unit of behavior.
///
/// `apply` is invoked exactly once at registration with a fresh
/// [`FormApi`] scoped to the registering engine. Everything the plugin
/// will ever do flows through subscriptions and requests set up here.
///
/// # Example
///
/// ```
/// use formwork_engine::{Engine, FormApi, FormPlugin, PluginError};
/// use serde_json::json;
///
/// struct Uppercase;
///
/// impl FormPlugin for Uppercase {
///     fn name(&self) -> &str {
///         "uppercase"
///     }
///
///     fn apply(&self, api: &FormApi) -> Result<(), PluginError> {
///         let item = api.item("user.name");
///         api.item("user.name").on_change().on(move |payload| {
///             if let Some(s) = payload.as_str() {
///                 item.set_value(json!(s.to_uppercase()));
///             }
///         });
///         Ok(())
///     }
/// }
///
/// let engine = Engine::new();
/// engine.register_plugins(&[Box::new(Uppercase)]).expect("plugin registers");
/// ```
pub trait FormPlugin: Send + Sync {
    /// Unique name, used in errors and logs.
    fn name(&self) -> &str;

    /// Wires this plugin up against the given engine view.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError`] when the plugin cannot set itself up;
    /// registration of the remaining plugins is aborted.
    fn apply(&self, api: &FormApi) -> Result<(), PluginError>;
}

/// Listening side of a lifecycle hook: subscribe, but never fire and
/// never unsubscribe other parties.
#[derive(Clone)]
pub struct LifecycleHook {
    hook: Hook,
}

impl LifecycleHook {
    fn new(hook: Hook) -> Self {
        Self { hook }
    }

    /// Registers a persistent listener.
    pub fn on(&self, listener: impl Fn(&Value) + Send + Sync + 'static) -> ListenerId {
        self.hook.on(listener)
    }

    /// Registers a one-shot listener.
    pub fn once(&self, listener: impl Fn(&Value) + Send + Sync + 'static) {
        self.hook.once(listener);
    }
}

/// Listening side of a change hook: like [`LifecycleHook`], plus payload
/// interception.
#[derive(Clone)]
pub struct ChangeHook {
    hook: Hook,
}

impl ChangeHook {
    fn new(hook: Hook) -> Self {
        Self { hook }
    }

    /// Registers a persistent listener.
    pub fn on(&self, listener: impl Fn(&Value) + Send + Sync + 'static) -> ListenerId {
        self.hook.on(listener)
    }

    /// Registers a one-shot listener.
    pub fn once(&self, listener: impl Fn(&Value) + Send + Sync + 'static) {
        self.hook.once(listener);
    }

    /// Appends a payload transform ahead of listener dispatch.
    pub fn intercept(&self, interceptor: Interceptor) {
        self.hook.intercept(interceptor);
    }
}

/// Restricted view over one field.
///
/// Obtained through [`FormApi::item`]. Listening surfaces carry no
/// `call`; request surfaces carry no `on`.
pub struct ItemApi {
    engine: Engine,
    name: Name,
}

impl ItemApi {
    fn new(engine: Engine, name: Name) -> Self {
        Self { engine, name }
    }

    /// This field's change announcements (listen/intercept only).
    #[must_use]
    pub fn on_change(&self) -> ChangeHook {
        ChangeHook::new(self.engine.hooks_for(&self.name).on_change)
    }

    /// This field's mount announcement (listen only).
    #[must_use]
    pub fn did_mount(&self) -> LifecycleHook {
        LifecycleHook::new(self.engine.hooks_for(&self.name).did_mount)
    }

    /// This field's unmount announcement (listen only).
    #[must_use]
    pub fn will_unmount(&self) -> LifecycleHook {
        LifecycleHook::new(self.engine.hooks_for(&self.name).will_unmount)
    }

    /// Requests a component-state replacement for this field.
    pub fn set_state(&self, state: Value) {
        self.engine.hooks_for(&self.name).set_state.call(state);
    }

    /// Requests an item-state replacement for this field.
    pub fn set_item_state(&self, state: Value) {
        self.engine.hooks_for(&self.name).set_item_state.call(state);
    }

    /// Requests a schema replacement for this field.
    pub fn set_schema(&self, schema: Value) {
        self.engine.hooks_for(&self.name).set_schema.call(schema);
    }

    /// Writes this field's value (sugar for a one-entry bulk write).
    pub fn set_value(&self, value: Value) {
        self.engine
            .set_fields(vec![FieldEntry::new(self.name.clone(), value)]);
    }
}

/// The view handed to [`FormPlugin::apply`].
///
/// Value mutation is passed through — plugins are trusted to *request*
/// value changes — while every hook surface is one-directional per the
/// module contract above.
pub struct FormApi {
    engine: Engine,
}

impl FormApi {
    pub(crate) fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Writes entries in list order (pass-through to the engine).
    pub fn set_fields(&self, entries: Vec<FieldEntry>) {
        self.engine.set_fields(entries);
    }

    /// Snapshot of the whole value tree.
    #[must_use]
    pub fn get_fields_value(&self) -> Value {
        self.engine.get_fields_value()
    }

    /// Form-wide change announcements (listen/intercept only).
    #[must_use]
    pub fn on_change(&self) -> ChangeHook {
        ChangeHook::new(self.engine.global_hooks().on_change.clone())
    }

    /// Form-wide per-item change announcements (listen/intercept only).
    #[must_use]
    pub fn item_on_change(&self) -> ChangeHook {
        ChangeHook::new(self.engine.global_hooks().item_on_change.clone())
    }

    /// The form's mount announcement (listen only).
    #[must_use]
    pub fn did_mount(&self) -> LifecycleHook {
        LifecycleHook::new(self.engine.global_hooks().did_mount.clone())
    }

    /// The form's unmount announcement (listen only).
    #[must_use]
    pub fn will_unmount(&self) -> LifecycleHook {
        LifecycleHook::new(self.engine.global_hooks().will_unmount.clone())
    }

    /// Per-item mount announcements (listen only).
    #[must_use]
    pub fn on_item_did_mount(&self) -> LifecycleHook {
        LifecycleHook::new(self.engine.global_hooks().item_did_mount.clone())
    }

    /// Per-item unmount announcements (listen only).
    #[must_use]
    pub fn on_item_will_unmount(&self) -> LifecycleHook {
        LifecycleHook::new(self.engine.global_hooks().item_will_unmount.clone())
    }

    /// Returns the restricted view over one field.
    #[must_use]
    pub fn item(&self, name: impl Into<Name>) -> ItemApi {
        ItemApi::new(self.engine.clone(), name.into())
    }

    /// Requests component-state replacements, one per entry.
    pub fn set_state(&self, states: Vec<FieldEntry>) {
        for FieldEntry { name, value } in states {
            self.engine.hooks_for(&name).set_state.call(value);
        }
    }

    /// Requests item-state replacements, one per entry.
    pub fn set_item_state(&self, states: Vec<FieldEntry>) {
        for FieldEntry { name, value } in states {
            self.engine.hooks_for(&name).set_item_state.call(value);
        }
    }

    /// Requests schema replacements, one per entry.
    pub fn set_schema(&self, schemas: Vec<FieldEntry>) {
        for FieldEntry { name, value } in schemas {
            self.engine.hooks_for(&name).set_schema.call(value);
        }
    }
}

/// Test utilities for the plugin boundary.
#[cfg(any(test, feature = "test-utils"))]
pub mod testing {
    use super::*;

    /// A plugin defined by a closure, for wiring test behavior without
    /// a named type.
    pub struct FnPlugin {
        name: String,
        setup: Box<dyn Fn(&FormApi) -> Result<(), PluginError> + Send + Sync>,
    }

    impl FnPlugin {
        /// Creates a plugin running `setup` at registration.
        pub fn new(
            name: impl Into<String>,
            setup: impl Fn(&FormApi) -> Result<(), PluginError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                name: name.into(),
                setup: Box::new(setup),
            }
        }

        /// Creates a plugin whose registration always fails.
        pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
            let name = name.into();
            let message = message.into();
            let plugin = name.clone();
            Self::new(name, move |_| Err(PluginError::setup(plugin.clone(), message.clone())))
        }
    }

    impl FormPlugin for FnPlugin {
        fn name(&self) -> &str {
            &self.name
        }

        fn apply(&self, api: &FormApi) -> Result<(), PluginError> {
            (self.setup)(api)
        }
    }
}
