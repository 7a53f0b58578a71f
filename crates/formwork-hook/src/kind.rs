//! Hook kinds — every event name the engine dispatches.
//!
//! Kinds are split by direction: *announcements* are fired by the owning
//! integration to report something that already happened, *requests* are
//! fired by plugin code asking the integration to do something. A single
//! hook never flows both ways.

use crate::HookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every event name carried by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookKind {
    // ── Form lifecycle ───────────────────────────────────────
    /// The whole form finished mounting.
    DidMount,
    /// Some field value changed.
    OnChange,
    /// The whole form is about to unmount.
    WillUnmount,
    /// Re-render request for the form or one field.
    ForceUpdate,

    // ── Item lifecycle (global fan-in) ───────────────────────
    /// A single item changed, reported on the form-wide channel.
    ItemOnChange,
    /// A single item finished mounting.
    ItemDidMount,
    /// A single item is about to unmount.
    ItemWillUnmount,

    // ── Per-field state requests ─────────────────────────────
    /// Request to replace a field's component state.
    SetState,
    /// Request to replace a field's item-level state.
    SetItemState,
    /// Request to replace a field's schema.
    SetSchema,

    // ── Validation ───────────────────────────────────────────
    /// A field was validated; payload carries the verdict.
    Validate,
}

impl HookKind {
    /// Returns `true` if this kind is announced by the owning
    /// integration (plugins may listen, never fire).
    #[must_use]
    pub fn is_announcement(&self) -> bool {
        matches!(
            self,
            Self::DidMount
                | Self::OnChange
                | Self::WillUnmount
                | Self::ForceUpdate
                | Self::ItemOnChange
                | Self::ItemDidMount
                | Self::ItemWillUnmount
                | Self::Validate
        )
    }

    /// Returns `true` if this kind is requested by plugin code (the
    /// integration listens, plugins fire).
    #[must_use]
    pub fn is_request(&self) -> bool {
        !self.is_announcement()
    }

    /// Returns the wire name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DidMount => "didMount",
            Self::OnChange => "onChange",
            Self::WillUnmount => "willUnmount",
            Self::ForceUpdate => "forceUpdate",
            Self::ItemOnChange => "itemOnChange",
            Self::ItemDidMount => "itemDidMount",
            Self::ItemWillUnmount => "itemWillUnmount",
            Self::SetState => "setState",
            Self::SetItemState => "setItemState",
            Self::SetSchema => "setSchema",
            Self::Validate => "validate",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookKind {
    type Err = HookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "didMount" => Ok(Self::DidMount),
            "onChange" => Ok(Self::OnChange),
            "willUnmount" => Ok(Self::WillUnmount),
            "forceUpdate" => Ok(Self::ForceUpdate),
            "itemOnChange" => Ok(Self::ItemOnChange),
            "itemDidMount" => Ok(Self::ItemDidMount),
            "itemWillUnmount" => Ok(Self::ItemWillUnmount),
            "setState" => Ok(Self::SetState),
            "setItemState" => Ok(Self::SetItemState),
            "setSchema" => Ok(Self::SetSchema),
            "validate" => Ok(Self::Validate),
            other => Err(HookError::UnknownKind(other.to_string())),
        }
    }
}
