//! Logging facade for the navigation guard.
//!
//! Every decision the guard makes (bypass, intercept, stay, leave, fail-open)
//! is reported through the macros below. They forward to the
//! [`log`](https://docs.rs/log) crate or to [`tracing`](https://docs.rs/tracing)
//! depending on the enabled feature. Enable at most one backend.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Level guidance used throughout the crate:
//!
//! - `trace_log!`: every incoming navigation event and its outcome.
//! - `debug_log!`: registry mutations and bypass decisions.
//! - `info_log!`: modal shown, stay/leave resolutions.
//! - `warn_log!`: misuse and fail-open paths (missing globals, bad form ids).
//! - `error_log!`: host seams that reported a failure (session storage).
//!
//! ```ignore
//! use gpui_navigation_guard::{debug_log, warn_log};
//!
//! debug_log!("Form '{}' marked dirty", form_id);
//! warn_log!("Registry not installed; allowing navigation to '{}'", path);
//! ```

/// Forward a record to the enabled backend at the given level.
///
/// Not part of the public API; use the level-specific macros.
#[doc(hidden)]
#[macro_export]
macro_rules! __guard_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: "navigation_guard", $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: "navigation_guard", $($arg)*);
    };
}

/// Emit a **trace**-level record under the `navigation_guard` target.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        $crate::__guard_log!(trace, $($arg)*)
    };
}

/// Emit a **debug**-level record under the `navigation_guard` target.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::__guard_log!(debug, $($arg)*)
    };
}

/// Emit an **info**-level record under the `navigation_guard` target.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::__guard_log!(info, $($arg)*)
    };
}

/// Emit a **warn**-level record under the `navigation_guard` target.
///
/// Used on every fail-open path so a silently allowed navigation still
/// leaves a trace.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::__guard_log!(warn, $($arg)*)
    };
}

/// Emit an **error**-level record under the `navigation_guard` target.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::__guard_log!(error, $($arg)*)
    };
}
