//! Foundational types for the formwork form engine.
//!
//! # Crate Architecture
//!
//! This crate is the bottom of the workspace's layering — the types every
//! other crate speaks:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SDK Layer                               │
//! │  (stable, safe for plugins and integrations to depend on)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  formwork-types : Name, PathKey, FieldEntry, ErrorCode ◄── HERE
//! │  formwork-hook  : Hook, HookKind, HookMap                   │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Engine Layer                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  formwork-engine : PathStore, Engine, Validator, plugins    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Path Addressing
//!
//! Fields live in a nested value tree and are addressed by [`Name`] — a
//! string (`"user.name"`, `"items[0].sku"`), a bare index, or an explicit
//! [`Segment`] list. All spellings of one location canonicalize to the
//! same [`PathKey`], and every keyed registry in the workspace indexes by
//! that key, so representation never affects which hook or value you
//! reach.
//!
//! # Example
//!
//! ```
//! use formwork_types::{FieldEntry, Name, PathKey, Segment};
//! use serde_json::json;
//!
//! let by_string = Name::from("user.name");
//! let by_list = Name::path([Segment::key("user"), Segment::key("name")]);
//! assert_eq!(PathKey::from_name(&by_string), PathKey::from_name(&by_list));
//!
//! let entry = FieldEntry::new(by_list, json!("Ann"));
//! assert_eq!(entry.value, json!("Ann"));
//! ```

mod error;
mod field;
mod id;
mod name;

pub use error::{assert_error_code, ErrorCode};
pub use field::FieldEntry;
pub use id::ListenerId;
pub use name::{parse_path, Name, PathKey, Segment, KEY_SEPARATOR};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_is_representation_independent() {
        let spellings = [
            Name::from("items[0].sku"),
            Name::path([Segment::key("items"), Segment::index(0), Segment::key("sku")]),
            Name::path([Segment::key("items"), Segment::key("0"), Segment::key("sku")]),
        ];
        let keys: Vec<PathKey> = spellings.iter().map(PathKey::from_name).collect();
        assert!(keys.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn entry_addresses_by_any_spelling() {
        let entry = FieldEntry::absent(Name::index(3));
        assert_eq!(PathKey::from_name(&entry.name).as_str(), "3");
    }
}
