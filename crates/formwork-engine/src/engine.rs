//! The form engine — sole owner of form state.
//!
//! An [`Engine`] composes two [`PathStore`]s (values and errors), a fixed
//! set of form-wide hooks, eight path-keyed hook maps, and a
//! [`Validator`]. Mutating operations write to a store and then fire the
//! matching notification hook; everything else in the system reacts
//! through those hooks.
//!
//! The engine renders nothing and catches nothing: a panicking listener
//! unwinds out of the mutating call, and the remainder of that one
//! dispatch is skipped.

use crate::plugin::{FormApi, FormPlugin, PluginError};
use crate::{PathStore, Validator, Verdict};
use formwork_hook::{Hook, HookKind, HookMap};
use formwork_types::{FieldEntry, Name, PathKey};
use serde_json::{Map, Value};
use std::sync::Arc;

/// The form-wide hooks, created once per engine.
///
/// The owning integration fires these; plugins only listen (through
/// their restricted views).
pub struct GlobalHooks {
    /// The whole form finished mounting.
    pub did_mount: Hook,
    /// Some field value changed.
    pub on_change: Hook,
    /// The whole form is about to unmount.
    pub will_unmount: Hook,
    /// Whole-form re-render request.
    pub force_update: Hook,
    /// A single item changed, reported form-wide.
    pub item_on_change: Hook,
    /// A single item finished mounting.
    pub item_did_mount: Hook,
    /// A single item is about to unmount.
    pub item_will_unmount: Hook,
}

impl GlobalHooks {
    fn new() -> Self {
        Self {
            did_mount: Hook::new(HookKind::DidMount),
            on_change: Hook::new(HookKind::OnChange),
            will_unmount: Hook::new(HookKind::WillUnmount),
            force_update: Hook::new(HookKind::ForceUpdate),
            item_on_change: Hook::new(HookKind::ItemOnChange),
            item_did_mount: Hook::new(HookKind::ItemDidMount),
            item_will_unmount: Hook::new(HookKind::ItemWillUnmount),
        }
    }
}

/// The per-path hooks for one field, bundled for the rendering
/// integration's lifecycle wiring.
///
/// This is the integration surface: it hands out full hooks, `call`
/// included. Plugin code never sees it — plugins get the restricted
/// views on [`FormApi`](crate::FormApi) and [`ItemApi`](crate::ItemApi)
/// instead.
pub struct FieldHooks {
    /// This field's value changed.
    pub on_change: Hook,
    /// Request to replace this field's component state.
    pub set_state: Hook,
    /// Request to replace this field's item-level state.
    pub set_item_state: Hook,
    /// Request to replace this field's schema.
    pub set_schema: Hook,
    /// This field finished mounting.
    pub did_mount: Hook,
    /// This field is about to unmount.
    pub will_unmount: Hook,
    /// Re-render request for this field.
    pub force_update: Hook,
    /// This field was validated.
    pub validate: Hook,
}

struct EngineInner {
    values: PathStore,
    errors: PathStore,
    hooks: GlobalHooks,
    on_change: HookMap,
    set_state: HookMap,
    set_item_state: HookMap,
    set_schema: HookMap,
    did_mount: HookMap,
    will_unmount: HookMap,
    force_update: HookMap,
    validate: HookMap,
    validator: Validator,
}

/// The framework-agnostic form engine.
///
/// `Engine` is a cheap-clone handle; clones share the same form. State
/// is owned exclusively here — integrations and plugins mutate only
/// through the operations below, and every mutation is announced on the
/// matching hook.
///
/// # Example
///
/// ```
/// use formwork_engine::Engine;
/// use formwork_types::{FieldEntry, Name};
/// use serde_json::json;
///
/// let engine = Engine::new();
/// engine.set_fields(vec![FieldEntry::new("user.name", json!("Ann"))]);
/// assert_eq!(engine.get_field_value(&Name::from("user.name")), Some(json!("Ann")));
/// ```
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

impl Engine {
    /// Creates an engine with empty value and error trees.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EngineInner {
                values: PathStore::new(),
                errors: PathStore::new(),
                hooks: GlobalHooks::new(),
                on_change: HookMap::new(HookKind::OnChange),
                set_state: HookMap::new(HookKind::SetState),
                set_item_state: HookMap::new(HookKind::SetItemState),
                set_schema: HookMap::new(HookKind::SetSchema),
                did_mount: HookMap::new(HookKind::DidMount),
                will_unmount: HookMap::new(HookKind::WillUnmount),
                force_update: HookMap::new(HookKind::ForceUpdate),
                validate: HookMap::new(HookKind::Validate),
                validator: Validator::new(),
            }),
        }
    }

    /// Writes each entry in list order, firing that path's re-render
    /// hook after each write.
    ///
    /// Later entries for the same path win. Each write/notify pair is
    /// independent — there is no batching and no atomicity across
    /// entries, and a listener may itself mutate the engine mid-call.
    pub fn set_fields(&self, entries: Vec<FieldEntry>) {
        for FieldEntry { name, value } in entries {
            tracing::debug!(path = %PathKey::from_name(&name), "set field");
            self.inner.values.set(&name, value);
            self.inner.force_update.for_name(&name).call(Value::Null);
        }
    }

    /// Replaces the entire value tree and fires the *global* re-render
    /// hook once.
    ///
    /// A bulk replace touches the whole form, so this deliberately
    /// skips per-path diffing in favor of one coarse notification.
    pub fn set_fields_value(&self, values: Map<String, Value>) {
        tracing::debug!(fields = values.len(), "replace value tree");
        self.inner.values.replace(Value::Object(values));
        self.inner.hooks.force_update.call(Value::Null);
    }

    /// Reads one field's value. A stored null reads as absent.
    #[must_use]
    pub fn get_field_value(&self, name: &Name) -> Option<Value> {
        self.inner.values.get(name).filter(|v| !v.is_null())
    }

    /// Returns a snapshot of the whole value tree.
    #[must_use]
    pub fn get_fields_value(&self) -> Value {
        self.inner.values.snapshot()
    }

    /// Clears the value tree and fires the global re-render hook.
    pub fn reset_fields(&self) {
        tracing::debug!("reset fields");
        self.inner.values.clear();
        self.inner.hooks.force_update.call(Value::Null);
    }

    /// Writes each entry into the error tree in list order, firing that
    /// path's re-render hook after each write.
    pub fn set_errors(&self, entries: Vec<FieldEntry>) {
        for FieldEntry { name, value } in entries {
            tracing::debug!(path = %PathKey::from_name(&name), "set error");
            self.inner.errors.set(&name, value);
            self.inner.force_update.for_name(&name).call(Value::Null);
        }
    }

    /// Reads one field's error. A cleared (null) slot reads as absent.
    #[must_use]
    pub fn get_field_error(&self, name: &Name) -> Option<Value> {
        self.inner.errors.get(name).filter(|v| !v.is_null())
    }

    /// Invokes each plugin's `apply` exactly once with a fresh
    /// [`FormApi`] bound to this engine.
    ///
    /// This is the only integration point for third-party behavior; the
    /// first failing plugin aborts registration.
    ///
    /// # Errors
    ///
    /// Returns the [`PluginError`] of the first plugin whose `apply`
    /// fails.
    pub fn register_plugins(&self, plugins: &[Box<dyn FormPlugin>]) -> Result<(), PluginError> {
        for plugin in plugins {
            tracing::debug!(plugin = plugin.name(), "register plugin");
            plugin.apply(&FormApi::new(self.clone()))?;
        }
        Ok(())
    }

    /// Evaluates a pipe-delimited rule string against the value at
    /// `name`, records the outcome in the error tree (message on fail,
    /// cleared on pass), and fires the path's `validate` hook with the
    /// verdict.
    ///
    /// First applicable rule wins — see [`Validator::evaluate`].
    pub fn validate_field(&self, name: &Name, rule_str: &str) -> Verdict {
        let tree = self.inner.values.snapshot();
        let verdict = self.inner.validator.evaluate(&tree, name, rule_str);

        match &verdict {
            Verdict::Fail { message } => self.set_errors(vec![FieldEntry::new(
                name.clone(),
                Value::String(message.clone()),
            )]),
            Verdict::Pass => self.set_errors(vec![FieldEntry::absent(name.clone())]),
            Verdict::NotEvaluated => {}
        }

        let payload = serde_json::to_value(&verdict).unwrap_or(Value::Null);
        self.inner.validate.for_name(name).call(payload);
        verdict
    }

    /// Returns the rule registry backing [`validate_field`](Self::validate_field).
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.inner.validator
    }

    /// Returns the form-wide hooks.
    #[must_use]
    pub fn global_hooks(&self) -> &GlobalHooks {
        &self.inner.hooks
    }

    /// Bundles the per-path hooks for `name`, creating them on first
    /// access.
    ///
    /// Integration surface only — these are full hooks, `call`
    /// included. Plugins go through [`FormApi`]/
    /// [`ItemApi`](crate::ItemApi).
    #[must_use]
    pub fn hooks_for(&self, name: &Name) -> FieldHooks {
        FieldHooks {
            on_change: self.inner.on_change.for_name(name),
            set_state: self.inner.set_state.for_name(name),
            set_item_state: self.inner.set_item_state.for_name(name),
            set_schema: self.inner.set_schema.for_name(name),
            did_mount: self.inner.did_mount.for_name(name),
            will_unmount: self.inner.will_unmount.for_name(name),
            force_update: self.inner.force_update.for_name(name),
            validate: self.inner.validate.for_name(name),
        }
    }

    /// Returns `true` if both handles refer to the same form.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("fields", &self.inner.force_update.len())
            .finish()
    }
}
