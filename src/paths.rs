//! Segment-based path rules used by bypass decisions and context labels.
//!
//! All comparisons work on `/`-separated segments, never raw string
//! prefixes, so `/booking` matches `/booking/step2` but not `/bookings`.
//! Query strings and fragments are ignored. A `:param` segment in a prefix
//! matches any single segment.
//!
//! # Examples
//!
//! ```
//! use gpui_navigation_guard::paths::{path_matches_prefix, shared_flow_prefix};
//!
//! assert!(path_matches_prefix("/booking/step2?room=4", "/booking"));
//! assert!(path_matches_prefix("/admin/amenities/7/edit", "/admin/amenities/:id"));
//! assert!(!path_matches_prefix("/bookings", "/booking"));
//!
//! let flows: &[&str] = &["/booking", "/admin"];
//! assert_eq!(shared_flow_prefix("/booking/step2", "/booking/payment", flows), Some("/booking"));
//! assert_eq!(shared_flow_prefix("/booking/step2", "/admin", flows), None);
//! ```

/// Route prefixes whose sub-pages form one internal flow. Moving between
/// two pages under the same prefix is never treated as leaving.
pub const DEFAULT_FLOW_PREFIXES: &[&str] = &["/booking", "/admin"];

/// Sign-out endpoints. Navigating to one of these always bypasses the guard.
pub const DEFAULT_LOGOUT_PATHS: &[&str] = &["/logout", "/signout", "/sign-out", "/auth/logout"];

/// Prefixes that refine a dirty-form context to [`Admin`](crate::NavigationContext::Admin).
pub const ADMIN_PREFIXES: &[&str] = &["/admin", "/cashier", "/dashboard"];

/// Prefixes that refine a dirty-form context to [`Profile`](crate::NavigationContext::Profile).
pub const PROFILE_PREFIXES: &[&str] = &["/profile", "/account"];

/// Strip the query string and fragment from a path.
pub fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Split a path into segments, dropping empty ones and any query/fragment.
///
/// ```
/// use gpui_navigation_guard::paths::split_path;
///
/// assert_eq!(split_path("/booking/step2/"), vec!["booking", "step2"]);
/// assert_eq!(split_path("/?tab=1"), Vec::<&str>::new());
/// ```
pub fn split_path(path: &str) -> Vec<&str> {
    strip_query(path)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Check if `path` equals or lies under `prefix`, segment by segment.
///
/// An empty prefix (`""` or `"/"`) matches only the root path.
pub fn path_matches_prefix(path: &str, prefix: &str) -> bool {
    let path_segs = split_path(path);
    let prefix_segs = split_path(prefix);

    if prefix_segs.is_empty() {
        return path_segs.is_empty();
    }
    if path_segs.len() < prefix_segs.len() {
        return false;
    }

    path_segs
        .iter()
        .zip(prefix_segs.iter())
        .all(|(seg, pattern)| pattern.starts_with(':') || seg == pattern)
}

/// Return the first prefix in `prefixes` that `path` lies under.
pub fn first_matching_prefix<'a, S: AsRef<str>>(path: &str, prefixes: &'a [S]) -> Option<&'a str> {
    prefixes
        .iter()
        .map(AsRef::as_ref)
        .find(|prefix| path_matches_prefix(path, prefix))
}

/// Check if `path` lies under any of `prefixes`.
pub fn matches_any<S: AsRef<str>>(path: &str, prefixes: &[S]) -> bool {
    first_matching_prefix(path, prefixes).is_some()
}

/// Check if `path` is one of the configured sign-out endpoints.
pub fn is_logout_path<S: AsRef<str>>(path: &str, logout_paths: &[S]) -> bool {
    matches_any(path, logout_paths)
}

/// Find the flow prefix that both `current` and `target` lie under, if any.
pub fn shared_flow_prefix<'a, S: AsRef<str>>(
    current: &str,
    target: &str,
    flow_prefixes: &'a [S],
) -> Option<&'a str> {
    flow_prefixes
        .iter()
        .map(AsRef::as_ref)
        .find(|prefix| path_matches_prefix(current, prefix) && path_matches_prefix(target, prefix))
}
