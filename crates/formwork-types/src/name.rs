//! Field names and canonical path keys.
//!
//! A [`Name`] addresses one location inside a nested value tree. It can be
//! written three ways — a string, a bare index, or an explicit segment
//! list — and every spelling of the same location resolves to the same
//! [`PathKey`]:
//!
//! ```text
//! "user.name"                          ─┐
//! ["user", "name"]                      ├─→ PathKey("user.name")
//! Name::path([key("user"), key("name")])┘
//!
//! "items[0].sku"  ─→  PathKey("items.0.sku")
//! ```
//!
//! [`PathKey::from_name`] is the single choke point every keyed lookup
//! passes through; nothing else in the workspace derives a key from a
//! name. That is what makes representation equivalence hold everywhere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when flattening segments into a [`PathKey`].
///
/// A key that itself contains the separator is not distinguished from the
/// nested spelling of the same characters (`"a.b"` as one key collides
/// with `["a", "b"]`). Flat joins cannot avoid this; form schemas do not
/// use dotted keys in practice.
pub const KEY_SEPARATOR: char = '.';

/// One step in a path: an object key or an array index.
///
/// The serde representation is untagged — a JSON string deserializes to
/// [`Segment::Key`], a JSON number to [`Segment::Index`] — matching the
/// mixed `string | number` lists accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// An array index.
    Index(usize),
    /// An object key. Stored literally: a key created through
    /// [`Segment::key`] is never re-parsed, so `key("a.b")` stays a
    /// single segment.
    Key(String),
}

impl Segment {
    /// Creates a key segment.
    #[must_use]
    pub fn key(k: impl Into<String>) -> Self {
        Self::Key(k.into())
    }

    /// Creates an index segment.
    #[must_use]
    pub fn index(i: usize) -> Self {
        Self::Index(i)
    }

    /// Returns the key if this is a [`Segment::Key`].
    #[must_use]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(k) => Some(k),
            Self::Index(_) => None,
        }
    }

    /// Returns the index if this is a [`Segment::Index`].
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            Self::Key(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => f.write_str(k),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(k: &str) -> Self {
        Self::Key(k.to_string())
    }
}

impl From<String> for Segment {
    fn from(k: String) -> Self {
        Self::Key(k)
    }
}

impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// A field name: string, index, or ordered segment list.
///
/// String names are parsed into segments on demand — `"a.b[0]"` addresses
/// the same location as `Name::path([key("a"), key("b"), index(0)])`.
/// Explicit segment lists are taken literally and never re-parsed.
///
/// # Example
///
/// ```
/// use formwork_types::{Name, PathKey, Segment};
///
/// let dotted = Name::from("user.name");
/// let listed = Name::path([Segment::key("user"), Segment::key("name")]);
/// assert_eq!(PathKey::from_name(&dotted), PathKey::from_name(&listed));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Name {
    /// A bare array index.
    Index(usize),
    /// A string path, parsed with dot/bracket syntax.
    Key(String),
    /// An explicit segment list, taken literally.
    Path(Vec<Segment>),
}

impl Name {
    /// Creates a string name.
    #[must_use]
    pub fn key(k: impl Into<String>) -> Self {
        Self::Key(k.into())
    }

    /// Creates an index name.
    #[must_use]
    pub fn index(i: usize) -> Self {
        Self::Index(i)
    }

    /// Creates a name from explicit segments.
    #[must_use]
    pub fn path(segments: impl IntoIterator<Item = Segment>) -> Self {
        Self::Path(segments.into_iter().collect())
    }

    /// Flattens this name into its segment sequence.
    ///
    /// String names go through [`parse_path`]; index and list names are
    /// returned as-is.
    #[must_use]
    pub fn segments(&self) -> Vec<Segment> {
        match self {
            Self::Index(i) => vec![Segment::Index(*i)],
            Self::Key(k) => parse_path(k),
            Self::Path(segments) => segments.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PathKey::from_name(self))
    }
}

impl From<&str> for Name {
    fn from(k: &str) -> Self {
        Self::Key(k.to_string())
    }
}

impl From<String> for Name {
    fn from(k: String) -> Self {
        Self::Key(k)
    }
}

impl From<usize> for Name {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

impl From<Vec<Segment>> for Name {
    fn from(segments: Vec<Segment>) -> Self {
        Self::Path(segments)
    }
}

/// The canonical string form of a [`Name`].
///
/// Produced by flattening the name's segments and joining them with
/// [`KEY_SEPARATOR`]. Every path-keyed registry in the workspace indexes
/// by `PathKey`, which is what guarantees that `"a"` and `["a"]` land on
/// the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathKey(String);

impl PathKey {
    /// Canonicalizes a name.
    ///
    /// # Example
    ///
    /// ```
    /// use formwork_types::{Name, PathKey};
    ///
    /// assert_eq!(PathKey::from_name(&Name::from("items[2].sku")).as_str(), "items.2.sku");
    /// assert_eq!(PathKey::from_name(&Name::index(2)).as_str(), "2");
    /// ```
    #[must_use]
    pub fn from_name(name: &Name) -> Self {
        let parts: Vec<String> = name.segments().iter().map(ToString::to_string).collect();
        Self(parts.join(&KEY_SEPARATOR.to_string()))
    }

    /// Returns the canonical string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Name> for PathKey {
    fn from(name: &Name) -> Self {
        Self::from_name(name)
    }
}

/// Parses a dot/bracket path string into segments.
///
/// Supported syntax, by example:
///
/// ```text
/// "a.b.c"      → [Key(a), Key(b), Key(c)]
/// "a[0].b"     → [Key(a), Index(0), Key(b)]
/// "[3]"        → [Index(3)]
/// "a['x.y']"   → [Key(a), Key(x.y)]      (quoted bracket keys stay whole)
/// "0"          → [Key(0)]                (bare numeric parts stay keys;
///                                         containers coerce on access)
/// ""           → []
/// ```
///
/// Empty parts (`"a..b"`) are skipped. An unterminated bracket swallows
/// the remainder as a key.
#[must_use]
pub fn parse_path(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = input;

    while !rest.is_empty() {
        if let Some(bracketed) = rest.strip_prefix('[') {
            let Some(end) = bracketed.find(']') else {
                segments.push(Segment::key(bracketed));
                break;
            };
            let inner = &bracketed[..end];
            segments.push(bracket_segment(inner));
            rest = bracketed[end + 1..].strip_prefix('.').unwrap_or(&bracketed[end + 1..]);
        } else {
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            let (part, tail) = rest.split_at(end);
            if !part.is_empty() {
                segments.push(Segment::key(part));
            }
            rest = tail.strip_prefix('.').unwrap_or(tail);
        }
    }

    segments
}

/// Interprets the inside of a bracket pair: quoted → literal key,
/// numeric → index, anything else → key.
fn bracket_segment(inner: &str) -> Segment {
    let unquoted = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
    if let Some(quoted) = unquoted {
        return Segment::key(quoted);
    }
    match inner.parse::<usize>() {
        Ok(i) => Segment::index(i),
        Err(_) => Segment::key(inner),
    }
}
