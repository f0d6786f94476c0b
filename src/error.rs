//! Error handling for the navigation guard.
//!
//! The guard never surfaces an error to the end user: the only visible
//! outcomes are "navigation proceeded" and "confirmation prompt shown".
//! [`GuardError`] exists so internal paths can use `?` and so the public
//! wrappers have something concrete to log before they fail open.
//!
//! | Variant | Raised when | Treated as |
//! |---------|-------------|------------|
//! | [`RegistryUnavailable`](GuardError::RegistryUnavailable) | no dirty-state global installed | no protection |
//! | [`HistoryUnavailable`](GuardError::HistoryUnavailable) | no history global installed | navigation not replayed |
//! | [`InvalidFormId`](GuardError::InvalidFormId) | empty form id | ignored |
//! | [`UnknownForm`](GuardError::UnknownForm) | mark dirty/clean on an unregistered form | ignored |
//! | [`Storage`](GuardError::Storage) | the session store failed | flag reads as unset |
//!
//! # Examples
//!
//! ```
//! use gpui_navigation_guard::error::GuardError;
//!
//! let err = GuardError::UnknownForm { form_id: "booking-guest".into() };
//! assert_eq!(err.to_string(), "Form not registered: booking-guest");
//! assert!(err.is_misuse());
//! ```

use crate::warn_log;
use std::fmt;

/// Internal failure inside the guard.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    /// The dirty-state registry global has not been installed.
    RegistryUnavailable,

    /// The history global has not been installed.
    HistoryUnavailable,

    /// A form id was empty.
    InvalidFormId,

    /// The form id is not currently registered.
    UnknownForm { form_id: String },

    /// The session storage seam reported a failure.
    Storage { message: String },
}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::RegistryUnavailable => {
                write!(f, "Dirty-state registry is not installed")
            }
            GuardError::HistoryUnavailable => {
                write!(f, "History backend is not installed")
            }
            GuardError::InvalidFormId => write!(f, "Form id must not be empty"),
            GuardError::UnknownForm { form_id } => {
                write!(f, "Form not registered: {}", form_id)
            }
            GuardError::Storage { message } => {
                write!(f, "Session storage failed: {}", message)
            }
        }
    }
}

impl std::error::Error for GuardError {}

impl GuardError {
    /// Create a storage error from any displayable cause.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether this error comes from caller misuse rather than a missing
    /// or failing collaborator.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            GuardError::InvalidFormId | GuardError::UnknownForm { .. }
        )
    }
}

/// Result alias used by the guard's internal paths.
pub type GuardResult<T> = Result<T, GuardError>;

/// Log an internal failure and fall back to `fallback`.
///
/// This is the single fail-open point: every public operation that can fail
/// internally routes its error through here instead of returning it.
pub(crate) fn fail_open<T>(result: GuardResult<T>, operation: &str, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn_log!("{} failed, continuing unguarded: {}", operation, err);
            fallback
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
