//! Nested value tree with path get/set.
//!
//! The store is pure state: writing creates intermediate containers as
//! needed and never notifies anyone. Event dispatch belongs to the
//! engine wrapping it.

use formwork_types::{Name, Segment};
use parking_lot::RwLock;
use serde_json::{Map, Value};

/// A nested JSON tree addressed by [`Name`].
///
/// Key segments address object entries, index segments address array
/// elements; missing intermediates are created on write (objects for
/// keys, arrays for indices, null-padded). Reads coerce segments to
/// whatever container they meet — a numeric key indexes an array, an
/// index becomes a string key on an object — so every spelling that
/// canonicalizes alike also reads alike.
pub struct PathStore {
    root: RwLock<Value>,
}

impl PathStore {
    /// Creates an empty store (an empty object at the root).
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RwLock::new(Value::Object(Map::new())),
        }
    }

    /// Reads the value at `name`.
    ///
    /// Returns `None` when any segment is missing along the way.
    /// A stored null is returned as `Some(Value::Null)`; callers that
    /// treat null as absence filter it themselves.
    #[must_use]
    pub fn get(&self, name: &Name) -> Option<Value> {
        get_at(&self.root.read(), &name.segments()).cloned()
    }

    /// Writes `value` at `name`, creating intermediates as needed.
    ///
    /// A non-container sitting where the path needs to descend is
    /// replaced.
    pub fn set(&self, name: &Name, value: Value) {
        set_at(&mut self.root.write(), &name.segments(), value);
    }

    /// Swaps the whole root for `tree`.
    pub fn replace(&self, tree: Value) {
        *self.root.write() = tree;
    }

    /// Resets the root to an empty object.
    pub fn clear(&self) {
        *self.root.write() = Value::Object(Map::new());
    }

    /// Returns a clone of the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.root.read().clone()
    }
}

impl Default for PathStore {
    fn default() -> Self {
        Self::new()
    }
}

fn get_at<'a>(node: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(node);
    };
    let child = match (first, node) {
        (Segment::Key(k), Value::Object(map)) => map.get(k),
        (Segment::Key(k), Value::Array(items)) => {
            k.parse::<usize>().ok().and_then(|i| items.get(i))
        }
        (Segment::Index(i), Value::Array(items)) => items.get(*i),
        (Segment::Index(i), Value::Object(map)) => map.get(&i.to_string()),
        _ => None,
    }?;
    get_at(child, rest)
}

fn set_at(node: &mut Value, segments: &[Segment], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    // Numeric keys behave as indices where an array already exists or
    // gets created; an existing object keeps its shape and takes the
    // segment as a string key. A node that cannot take the segment is
    // replaced first.
    let needs_fresh = match (first, &*node) {
        (Segment::Key(k), Value::Array(_)) => k.parse::<usize>().is_err(),
        (_, Value::Object(_) | Value::Array(_)) => false,
        _ => true,
    };
    if needs_fresh {
        *node = fresh_container(first);
    }

    match (first, node) {
        (Segment::Key(k), Value::Object(map)) => {
            set_at(map.entry(k.clone()).or_insert(Value::Null), rest, value);
        }
        (Segment::Key(k), Value::Array(items)) => {
            if let Ok(i) = k.parse::<usize>() {
                set_index(items, i, rest, value);
            }
        }
        (Segment::Index(i), Value::Array(items)) => set_index(items, *i, rest, value),
        (Segment::Index(i), Value::Object(map)) => {
            set_at(map.entry(i.to_string()).or_insert(Value::Null), rest, value);
        }
        _ => {}
    }
}

fn set_index(items: &mut Vec<Value>, index: usize, rest: &[Segment], value: Value) {
    while items.len() <= index {
        items.push(Value::Null);
    }
    set_at(&mut items[index], rest, value);
}

/// Container created for a missing intermediate: arrays for indices and
/// numeric keys, objects otherwise.
fn fresh_container(segment: &Segment) -> Value {
    let numeric = matches!(segment, Segment::Index(_))
        || segment.as_key().is_some_and(|k| k.parse::<usize>().is_ok());
    if numeric {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Basic get/set ────────────────────────────────────────

    #[test]
    fn set_then_get_leaf() {
        let store = PathStore::new();
        store.set(&Name::from("a"), json!(1));
        assert_eq!(store.get(&Name::from("a")), Some(json!(1)));
    }

    #[test]
    fn get_missing_is_none() {
        let store = PathStore::new();
        assert_eq!(store.get(&Name::from("a")), None);
        assert_eq!(store.get(&Name::from("a.b.c")), None);
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let store = PathStore::new();
        store.set(&Name::from("user.name"), json!("Ann"));
        assert_eq!(store.snapshot(), json!({ "user": { "name": "Ann" } }));
    }

    #[test]
    fn set_creates_intermediate_arrays() {
        let store = PathStore::new();
        store.set(&Name::from("items[1].sku"), json!("x-1"));
        assert_eq!(store.snapshot(), json!({ "items": [null, { "sku": "x-1" }] }));
    }

    #[test]
    fn set_overwrites_leaf() {
        let store = PathStore::new();
        store.set(&Name::from("a"), json!(1));
        store.set(&Name::from("a"), json!(2));
        assert_eq!(store.get(&Name::from("a")), Some(json!(2)));
    }

    #[test]
    fn set_replaces_non_container_intermediate() {
        let store = PathStore::new();
        store.set(&Name::from("a"), json!("scalar"));
        store.set(&Name::from("a.b"), json!(1));
        assert_eq!(store.snapshot(), json!({ "a": { "b": 1 } }));
    }

    #[test]
    fn stored_null_reads_back_as_some_null() {
        let store = PathStore::new();
        store.set(&Name::from("a"), Value::Null);
        assert_eq!(store.get(&Name::from("a")), Some(Value::Null));
    }

    // ── Segment coercion ─────────────────────────────────────

    #[test]
    fn numeric_key_reads_array() {
        let store = PathStore::new();
        store.set(&Name::from("items[0]"), json!("first"));
        assert_eq!(store.get(&Name::from("items.0")), Some(json!("first")));
    }

    #[test]
    fn index_reads_object_by_string_key() {
        let store = PathStore::new();
        store.replace(json!({ "rows": { "0": "zero" } }));
        let name = Name::path([Segment::key("rows"), Segment::index(0)]);
        assert_eq!(store.get(&name), Some(json!("zero")));
    }

    #[test]
    fn numeric_key_writes_into_existing_array() {
        let store = PathStore::new();
        store.set(&Name::from("items[0]"), json!("a"));
        store.set(&Name::from("items.1"), json!("b"));
        assert_eq!(store.snapshot(), json!({ "items": ["a", "b"] }));
    }

    #[test]
    fn index_writes_into_existing_object() {
        let store = PathStore::new();
        store.replace(json!({ "rows": { "named": true } }));
        store.set(&Name::path([Segment::key("rows"), Segment::index(0)]), json!("zero"));
        assert_eq!(store.snapshot(), json!({ "rows": { "named": true, "0": "zero" } }));
    }

    #[test]
    fn fresh_numeric_key_creates_array() {
        let store = PathStore::new();
        store.set(&Name::from("rows.0.value"), json!(7));
        assert_eq!(store.snapshot(), json!({ "rows": [{ "value": 7 }] }));
    }

    #[test]
    fn non_numeric_key_replaces_array() {
        let store = PathStore::new();
        store.set(&Name::from("a[0]"), json!(1));
        store.set(&Name::from("a.named"), json!(2));
        assert_eq!(store.snapshot(), json!({ "a": { "named": 2 } }));
    }

    // ── Whole-tree operations ────────────────────────────────

    #[test]
    fn replace_swaps_root() {
        let store = PathStore::new();
        store.set(&Name::from("a"), json!(1));
        store.replace(json!({ "x": 1 }));
        assert_eq!(store.snapshot(), json!({ "x": 1 }));
        assert_eq!(store.get(&Name::from("a")), None);
    }

    #[test]
    fn clear_resets_to_empty_object() {
        let store = PathStore::new();
        store.set(&Name::from("a.b"), json!(1));
        store.clear();
        assert_eq!(store.snapshot(), json!({}));
    }

    #[test]
    fn snapshot_is_detached() {
        let store = PathStore::new();
        store.set(&Name::from("a"), json!(1));
        let snap = store.snapshot();
        store.set(&Name::from("a"), json!(2));
        assert_eq!(snap, json!({ "a": 1 }));
    }
}
