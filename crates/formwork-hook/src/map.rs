//! Path-keyed hook registry.

use crate::{Hook, HookKind};
use formwork_types::{Name, PathKey};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Lazily-populated registry of [`Hook`]s indexed by canonical path key.
///
/// Every lookup canonicalizes through [`PathKey::from_name`], so any
/// spelling of a path reaches the same hook. The map only ever grows:
/// hooks are created on first access and never evicted, which is cheap
/// for short-lived forms but worth knowing about for long-lived ones
/// that generate many dynamic paths.
///
/// # Example
///
/// ```
/// use formwork_hook::{HookKind, HookMap};
/// use formwork_types::{Name, Segment};
///
/// let map = HookMap::new(HookKind::ForceUpdate);
/// let by_string = map.for_name(&Name::from("a"));
/// let by_list = map.for_name(&Name::path([Segment::key("a")]));
/// assert!(by_string.ptr_eq(&by_list));
/// ```
pub struct HookMap {
    kind: HookKind,
    hooks: Mutex<HashMap<PathKey, Hook>>,
}

impl HookMap {
    /// Creates an empty map whose hooks all carry `kind`.
    #[must_use]
    pub fn new(kind: HookKind) -> Self {
        Self {
            kind,
            hooks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the event kind of this map's hooks.
    #[must_use]
    pub fn kind(&self) -> HookKind {
        self.kind
    }

    /// Returns the hook for `name`, creating it on first access.
    pub fn for_name(&self, name: &Name) -> Hook {
        let key = PathKey::from_name(name);
        let mut hooks = self.hooks.lock();
        if !hooks.contains_key(&key) {
            tracing::trace!(kind = %self.kind, path = %key, "hook created");
        }
        hooks.entry(key).or_insert_with(|| Hook::new(self.kind)).clone()
    }

    /// Returns the hook for `name` if one was already created.
    ///
    /// Same canonicalization as [`for_name`](Self::for_name), but never
    /// constructs.
    #[must_use]
    pub fn get(&self, name: &Name) -> Option<Hook> {
        self.hooks.lock().get(&PathKey::from_name(name)).cloned()
    }

    /// Returns how many hooks exist.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.lock().len()
    }

    /// Returns `true` if no hook was created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_types::Segment;

    // ── Canonical equivalence ────────────────────────────────

    #[test]
    fn spellings_share_one_hook() {
        let map = HookMap::new(HookKind::OnChange);

        let by_string = map.for_name(&Name::from("user.name"));
        let by_list = map.for_name(&Name::path([Segment::key("user"), Segment::key("name")]));

        assert!(by_string.ptr_eq(&by_list));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn index_spellings_share_one_hook() {
        let map = HookMap::new(HookKind::ForceUpdate);

        let bare = map.for_name(&Name::index(0));
        let bracket = map.for_name(&Name::from("[0]"));
        let numeric_key = map.for_name(&Name::from("0"));

        assert!(bare.ptr_eq(&bracket));
        assert!(bare.ptr_eq(&numeric_key));
    }

    #[test]
    fn distinct_paths_get_distinct_hooks() {
        let map = HookMap::new(HookKind::OnChange);
        let a = map.for_name(&Name::from("a"));
        let b = map.for_name(&Name::from("b"));
        assert!(!a.ptr_eq(&b));
        assert_eq!(map.len(), 2);
    }

    // ── Lazy construction ────────────────────────────────────

    #[test]
    fn get_never_constructs() {
        let map = HookMap::new(HookKind::OnChange);
        assert!(map.get(&Name::from("a")).is_none());
        assert!(map.is_empty());

        let created = map.for_name(&Name::from("a"));
        let fetched = map.get(&Name::from("a")).expect("hook exists after for_name");
        assert!(created.ptr_eq(&fetched));
    }

    #[test]
    fn get_canonicalizes_too() {
        let map = HookMap::new(HookKind::OnChange);
        map.for_name(&Name::from("a.b"));
        let fetched = map
            .get(&Name::path([Segment::key("a"), Segment::key("b")]))
            .expect("alternate spelling reaches the same entry");
        assert_eq!(fetched.kind(), HookKind::OnChange);
    }

    #[test]
    fn map_only_grows() {
        let map = HookMap::new(HookKind::OnChange);
        for i in 0..10 {
            map.for_name(&Name::index(i));
        }
        assert_eq!(map.len(), 10);
        // Repeated access creates nothing new.
        for i in 0..10 {
            map.for_name(&Name::index(i));
        }
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn hooks_carry_the_map_kind() {
        let map = HookMap::new(HookKind::Validate);
        assert_eq!(map.kind(), HookKind::Validate);
        assert_eq!(map.for_name(&Name::from("a")).kind(), HookKind::Validate);
    }

    // ── Registrations survive lookup ─────────────────────────

    #[test]
    fn listeners_survive_relookup() {
        let map = HookMap::new(HookKind::OnChange);
        let recorder = crate::hook::testing::Recorder::new();

        map.for_name(&Name::from("a")).on(recorder.listener());
        map.for_name(&Name::from("a")).call(serde_json::Value::Null);

        assert_eq!(recorder.count(), 1);
    }
}
