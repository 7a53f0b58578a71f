//! Identifier types.
//!
//! Listener registrations are identified by UUID so a handle can be
//! passed around, stored, and later used to unsubscribe without any
//! notion of closure identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Handle returned when a persistent listener is registered on a hook.
///
/// The handle is the sole way to remove that listener again. One-shot
/// listeners never get a handle; they remove themselves by firing.
///
/// # Example
///
/// ```
/// use formwork_types::ListenerId;
///
/// let a = ListenerId::new();
/// let b = ListenerId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    /// Creates a fresh random handle.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

// NOTE: no `Default` — a "default listener handle" would silently refer
// to nothing; handles only come from registration.

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lsn:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniqueness() {
        assert_ne!(ListenerId::new(), ListenerId::new());
    }

    #[test]
    fn display_prefix() {
        let id = ListenerId::new();
        let shown = format!("{id}");
        assert!(shown.starts_with("lsn:"));
        assert!(shown.contains(&id.uuid().to_string()));
    }

    #[test]
    fn serde_roundtrip() {
        let id = ListenerId::new();
        let json = serde_json::to_string(&id).expect("serialize id");
        let restored: ListenerId = serde_json::from_str(&json).expect("deserialize id");
        assert_eq!(restored, id);
    }
}
