//! End-to-end contract tests for the engine.
//!
//! Exercises the full stack the way a rendering integration and its
//! plugins would: per-path subscriptions, bulk mutation, validation,
//! and the plugin boundary, all through the public API.

use formwork_engine::{Engine, FormApi, FormPlugin, Interceptor, PluginError, Rule, Verdict};
use formwork_hook::testing::Recorder;
use formwork_types::{FieldEntry, Name, Segment};
use serde_json::{json, Map, Value};

// =============================================================================
// Path equivalence
// =============================================================================

mod path_equivalence {
    use super::*;

    #[test]
    fn string_and_list_spellings_reach_one_hook() {
        let engine = Engine::new();
        let by_string = engine.hooks_for(&Name::from("a"));
        let by_list = engine.hooks_for(&Name::path([Segment::key("a")]));
        assert!(by_string.on_change.ptr_eq(&by_list.on_change));
    }

    #[test]
    fn write_list_read_string() {
        let engine = Engine::new();
        let updates = Recorder::new();
        engine
            .hooks_for(&Name::from("user.name"))
            .force_update
            .on(updates.listener());

        engine.set_fields(vec![FieldEntry::new(
            Name::path([Segment::key("user"), Segment::key("name")]),
            json!("Ann"),
        )]);

        assert_eq!(engine.get_field_value(&Name::from("user.name")), Some(json!("Ann")));
        assert_eq!(updates.count(), 1, "subscription by the other spelling fires");
    }
}

// =============================================================================
// Dispatch ordering
// =============================================================================

mod ordering {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn persistent_in_registration_order_once_in_reverse() {
        let engine = Engine::new();
        let hook = engine.hooks_for(&Name::from("a")).on_change;
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for tag in ["L1", "L2"] {
            let order = order.clone();
            hook.on(move |_| order.lock().push(tag));
        }
        for tag in ["O1", "O2"] {
            let order = order.clone();
            hook.once(move |_| order.lock().push(tag));
        }

        hook.call(Value::Null);
        assert_eq!(order.lock().as_slice(), &["L1", "L2", "O2", "O1"]);

        hook.call(Value::Null);
        assert_eq!(
            order.lock().as_slice(),
            &["L1", "L2", "O2", "O1", "L1", "L2"],
            "one-shots fired exactly once"
        );
    }

    #[test]
    fn interceptors_compose_left_to_right() {
        let engine = Engine::new();
        let hook = engine.hooks_for(&Name::from("a")).on_change;
        let seen = Recorder::new();
        hook.on(seen.listener());

        hook.intercept(Interceptor::transform(|v| json!({ "first": v })));
        hook.intercept(Interceptor::transform(|v| json!({ "second": v })));

        hook.call(json!("payload"));
        assert_eq!(
            seen.payloads(),
            vec![json!({ "second": { "first": "payload" } })]
        );
    }
}

// =============================================================================
// Bulk mutation
// =============================================================================

mod mutation {
    use super::*;

    #[test]
    fn set_fields_notifies_per_path_only() {
        let engine = Engine::new();
        let path = Recorder::new();
        let global = Recorder::new();
        engine.hooks_for(&Name::from("a")).force_update.on(path.listener());
        engine.global_hooks().force_update.on(global.listener());

        engine.set_fields(vec![FieldEntry::new("a", json!(1))]);

        assert_eq!(path.count(), 1);
        assert_eq!(global.count(), 0);
    }

    #[test]
    fn set_fields_value_notifies_global_only() {
        let engine = Engine::new();
        let path = Recorder::new();
        let global = Recorder::new();
        engine.hooks_for(&Name::from("x")).force_update.on(path.listener());
        engine.global_hooks().force_update.on(global.listener());

        let mut values = Map::new();
        values.insert("x".into(), json!(1));
        engine.set_fields_value(values);

        assert_eq!(engine.get_fields_value(), json!({ "x": 1 }));
        assert_eq!(global.count(), 1);
        assert_eq!(path.count(), 0, "bulk replace skips per-path diffing");
    }

    #[test]
    fn unmount_clears_stale_value() {
        let engine = Engine::new();
        engine.set_fields(vec![FieldEntry::new("gone", json!("stale"))]);

        // On field unmount the integration writes the absent marker.
        engine.set_fields(vec![FieldEntry::absent("gone")]);

        assert_eq!(engine.get_field_value(&Name::from("gone")), None);
    }

    #[test]
    fn listener_driven_mutation_cascades() {
        let engine = Engine::new();

        // A derived field kept in sync by a listener, as a rendering
        // integration would wire it.
        let derived = engine.clone();
        engine.hooks_for(&Name::from("price")).force_update.on(move |_| {
            let price = derived
                .get_field_value(&Name::from("price"))
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            // Guard: only write when out of sync, since this write
            // re-enters dispatch for another path.
            let total = derived.get_field_value(&Name::from("total"));
            let expected = json!(price * 2.0);
            if total.as_ref() != Some(&expected) {
                derived.set_fields(vec![FieldEntry::new("total", expected)]);
            }
        });

        engine.set_fields(vec![FieldEntry::new("price", json!(10.0))]);
        assert_eq!(engine.get_field_value(&Name::from("total")), Some(json!(20.0)));
    }
}

// =============================================================================
// Validation
// =============================================================================

mod validation {
    use super::*;

    fn engine_with_rules() -> Engine {
        let engine = Engine::new();
        engine
            .validator()
            .define_rule("required", Rule::new("required", |v| !v.is_null()));
        engine
            .validator()
            .define_rule("notEmpty", Rule::new("empty", |v| v.as_str() != Some("")));
        engine
    }

    #[test]
    fn first_applicable_rule_wins() {
        let engine = engine_with_rules();

        // Null fails both rules; only the first message is recorded.
        let verdict = engine.validate_field(&Name::from("a"), "required|notEmpty");
        assert_eq!(verdict, Verdict::Fail { message: "required".into() });
        assert_eq!(engine.get_field_error(&Name::from("a")), Some(json!("required")));
    }

    #[test]
    fn validation_outcome_reaches_subscribers() {
        let engine = engine_with_rules();
        let verdicts = Recorder::new();
        let updates = Recorder::new();
        engine.hooks_for(&Name::from("a")).validate.on(verdicts.listener());
        engine.hooks_for(&Name::from("a")).force_update.on(updates.listener());

        engine.validate_field(&Name::from("a"), "required");

        assert_eq!(
            verdicts.payloads(),
            vec![json!({ "verdict": "fail", "message": "required" })]
        );
        assert_eq!(updates.count(), 1, "recording the error re-renders the field");
    }

    #[test]
    fn fix_then_revalidate_clears_error() {
        let engine = engine_with_rules();

        engine.validate_field(&Name::from("a"), "required|notEmpty");
        assert!(engine.get_field_error(&Name::from("a")).is_some());

        engine.set_fields(vec![FieldEntry::new("a", json!("filled"))]);
        let verdict = engine.validate_field(&Name::from("a"), "required|notEmpty");
        assert!(verdict.is_pass());
        assert_eq!(engine.get_field_error(&Name::from("a")), None);
    }
}

// =============================================================================
// Plugin boundary
// =============================================================================

mod plugins {
    use super::*;

    /// Mirrors a field's changes into uppercase, the way a third-party
    /// formatting plugin would.
    struct UppercaseMirror;

    impl FormPlugin for UppercaseMirror {
        fn name(&self) -> &str {
            "uppercase-mirror"
        }

        fn apply(&self, api: &FormApi) -> Result<(), PluginError> {
            let item = api.item("display");
            api.item("raw").on_change().on(move |payload| {
                if let Some(s) = payload.as_str() {
                    item.set_value(json!(s.to_uppercase()));
                }
            });
            Ok(())
        }
    }

    #[test]
    fn plugin_reacts_to_announcements_with_value_requests() {
        let engine = Engine::new();
        engine
            .register_plugins(&[Box::new(UppercaseMirror)])
            .expect("plugin registers");

        // The integration announces a change on the raw field.
        engine.hooks_for(&Name::from("raw")).on_change.call(json!("ann"));

        assert_eq!(
            engine.get_field_value(&Name::from("display")),
            Some(json!("ANN"))
        );
    }

    /// Pushes schema and state for fields it manages at registration.
    struct SchemaSeeder;

    impl FormPlugin for SchemaSeeder {
        fn name(&self) -> &str {
            "schema-seeder"
        }

        fn apply(&self, api: &FormApi) -> Result<(), PluginError> {
            api.set_schema(vec![FieldEntry::new("a", json!({ "widget": "input" }))]);
            api.item("a").set_state(json!({ "disabled": false }));
            Ok(())
        }
    }

    #[test]
    fn plugin_requests_are_observed_by_integration() {
        let engine = Engine::new();
        let schemas = Recorder::new();
        let states = Recorder::new();
        engine.hooks_for(&Name::from("a")).set_schema.on(schemas.listener());
        engine.hooks_for(&Name::from("a")).set_state.on(states.listener());

        engine
            .register_plugins(&[Box::new(SchemaSeeder)])
            .expect("plugin registers");

        assert_eq!(schemas.payloads(), vec![json!({ "widget": "input" })]);
        assert_eq!(states.payloads(), vec![json!({ "disabled": false })]);
    }

    #[test]
    fn each_plugin_gets_a_fresh_api() {
        let engine = Engine::new();
        let plugins: Vec<Box<dyn FormPlugin>> =
            vec![Box::new(SchemaSeeder), Box::new(UppercaseMirror)];
        engine.register_plugins(&plugins).expect("both register");

        // Both wired against the same form.
        engine.hooks_for(&Name::from("raw")).on_change.call(json!("x"));
        assert_eq!(engine.get_field_value(&Name::from("display")), Some(json!("X")));
    }
}
