//! Error types for the hook layer.

use formwork_types::ErrorCode;
use thiserror::Error;

/// Errors that can occur in the hook layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// Unknown hook kind string.
    #[error("unknown hook kind: {0}")]
    UnknownKind(String),
}

impl ErrorCode for HookError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownKind(_) => "HOOK_UNKNOWN_KIND",
        }
    }

    fn is_recoverable(&self) -> bool {
        // A name that failed to parse will not parse on retry.
        false
    }
}
