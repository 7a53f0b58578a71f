//! Unified error interface.
//!
//! Every error type in the workspace implements [`ErrorCode`] so callers
//! can branch on a stable machine-readable code instead of matching
//! display strings.
//!
//! # Example
//!
//! ```
//! use formwork_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum SetupError {
//!     MissingRule(String),
//! }
//!
//! impl ErrorCode for SetupError {
//!     fn code(&self) -> &'static str {
//!         "PLUGIN_MISSING_RULE"
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         // Registering the rule and retrying succeeds.
//!         true
//!     }
//! }
//!
//! let err = SetupError::MissingRule("required".into());
//! assert_eq!(err.code(), "PLUGIN_MISSING_RULE");
//! ```

/// Machine-readable error classification.
///
/// Codes are `UPPER_SNAKE_CASE`, prefixed by domain (`PLUGIN_`, `HOOK_`),
/// and stable once published — changing a code is a breaking change.
/// `is_recoverable` tells a caller whether retrying (or a corrective
/// action) can succeed, or whether the condition is permanent.
pub trait ErrorCode {
    /// Returns the stable machine-readable code.
    fn code(&self) -> &'static str;

    /// Returns whether retry or corrective action can succeed.
    fn is_recoverable(&self) -> bool;
}

/// Asserts that an error's code follows workspace conventions: non-empty,
/// `UPPER_SNAKE_CASE`, and carrying the expected domain prefix.
///
/// # Panics
///
/// Panics with a descriptive message when any check fails. Intended for
/// tests covering every variant of an error enum.
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Checks `UPPER_SNAKE_CASE`: uppercase ASCII, digits, single interior
/// underscores.
fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }
    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
