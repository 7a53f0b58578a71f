//! Bulk-mutation entries.

use crate::Name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `{name, value}` element of a bulk write.
///
/// Bulk operations apply entries in list order; when two entries in the
/// same call address the same path, the later one wins.
///
/// `Value::Null` doubles as the absent marker: writing it clears the
/// field (the rendering integration does exactly that when a field
/// unmounts), and reads treat a stored null as "no value".
///
/// # Example
///
/// ```
/// use formwork_types::FieldEntry;
/// use serde_json::json;
///
/// let write = FieldEntry::new("user.name", json!("Ann"));
/// let clear = FieldEntry::absent("user.name");
/// assert_eq!(write.name, clear.name);
/// assert!(clear.value.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// The addressed path.
    pub name: Name,
    /// The value to write. Defaults to null when omitted on the wire.
    #[serde(default)]
    pub value: Value,
}

impl FieldEntry {
    /// Creates an entry writing `value` at `name`.
    #[must_use]
    pub fn new(name: impl Into<Name>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates an entry that clears the field at `name`.
    #[must_use]
    pub fn absent(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
        }
    }
}
