//! Test utilities for guard integration tests
//!
//! Provides fixtures and assertion helpers shared by the scenario tests.

#![allow(dead_code)]

use gpui::App;
use gpui_navigation_guard::*;

/// Route test logging through `env_logger`. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Install the guard globals with an in-memory history positioned at `path`.
pub fn init_at(cx: &mut App, path: &str) {
    init_logging();
    let mut history = MemoryHistory::new();
    history.push(path.to_string());
    init_guard_with(cx, GuardOptions::new().history(history));
}

/// Mount an interceptor tracking `form_id` and mark the form dirty.
pub fn dirty_form_guard(cx: &mut App, form_id: &str) -> NavigationInterceptor {
    let mut guard = NavigationInterceptor::new(InterceptorConfig::new().track_form(form_id), cx);
    guard.mark_form_dirty(cx);
    guard
}

/// Simulate the platform moving one entry back and firing popstate.
pub fn press_back(guard: &mut NavigationInterceptor, cx: &mut App) -> EventOutcome {
    let _ = cx.update_history(|history| history.go(-1));
    guard.handle_event(
        NavigationEvent::PopState {
            direction: TraversalDirection::Back,
        },
        cx,
    )
}

/// Assert the modal is up with exactly one held navigation from `vector`.
pub fn assert_prompting(guard: &NavigationInterceptor, vector: NavigationVector) {
    assert!(guard.show_modal(), "Modal should be shown");
    assert_eq!(
        guard.pending().map(PendingNavigation::vector),
        Some(vector),
        "Pending navigation should come from {:?}",
        vector
    );
}

/// Assert the modal is closed and nothing is held.
pub fn assert_idle(guard: &NavigationInterceptor) {
    assert!(!guard.show_modal(), "Modal should be hidden");
    assert!(guard.pending().is_none(), "No navigation should be held");
}
