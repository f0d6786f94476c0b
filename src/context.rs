//! App-wide guard state for GPUI.
//!
//! The guard keeps three pieces of shared state as GPUI globals:
//!
//! - [`GlobalDirtyState`]: the [`DirtyStateStore`] every guarded view reads;
//! - [`GlobalSessionOverride`]: the "don't ask again" flag;
//! - [`GlobalHistory`]: the [`HistoryBackend`] navigations are replayed on.
//!
//! Install them once with [`init_guard`] (or [`init_guard_with`] to plug in
//! host implementations), then use [`DirtyState`] from forms and wizards and
//! a [`NavigationInterceptor`](crate::NavigationInterceptor) per guarded view.
//!
//! ```ignore
//! use gpui_navigation_guard::{init_guard, DirtyState};
//!
//! init_guard(cx);
//! DirtyState::register_form(cx, "amenity-edit");
//! DirtyState::update_form_state(cx, "amenity-edit", true);
//! assert!(DirtyState::should_prevent_navigation(cx));
//! ```
//!
//! Every call here fails open: if a global is missing the call logs a
//! warning and behaves as if nothing needs protecting.

use crate::error::{fail_open, GuardError, GuardResult};
use crate::history::{HistoryBackend, MemoryHistory};
use crate::registry::{
    BookingUpdate, DirtyStateRegistry, DirtyStateStore, NavigationContext, PaymentUpdate,
};
use crate::session::{SessionOverride, SessionStorage};
use crate::{debug_log, info_log};
use gpui::{App, BorrowAppContext, Global};

// ============================================================================
// Globals
// ============================================================================

/// Global holding the app's [`DirtyStateStore`].
pub struct GlobalDirtyState {
    store: Box<dyn DirtyStateStore>,
}

impl Global for GlobalDirtyState {}

/// Global holding the session override flag.
pub struct GlobalSessionOverride {
    flag: SessionOverride,
}

impl Global for GlobalSessionOverride {}

/// Global holding the app's [`HistoryBackend`].
pub struct GlobalHistory {
    backend: Box<dyn HistoryBackend>,
}

impl Global for GlobalHistory {}

// ============================================================================
// init_guard
// ============================================================================

/// Host implementations to install with [`init_guard_with`].
///
/// Anything left unset falls back to the in-memory default.
#[derive(Default)]
pub struct GuardOptions {
    store: Option<Box<dyn DirtyStateStore>>,
    session: Option<SessionOverride>,
    history: Option<Box<dyn HistoryBackend>>,
}

impl GuardOptions {
    /// Options that install only defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom dirty-state store.
    #[must_use]
    pub fn store(mut self, store: impl DirtyStateStore) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Back the session override with a host store.
    #[must_use]
    pub fn session_storage(mut self, storage: impl SessionStorage) -> Self {
        self.session = Some(SessionOverride::with_storage(storage));
        self
    }

    /// Use a host history backend.
    #[must_use]
    pub fn history(mut self, history: impl HistoryBackend) -> Self {
        self.history = Some(Box::new(history));
        self
    }
}

/// Install the guard globals with in-memory defaults.
pub fn init_guard(cx: &mut App) {
    init_guard_with(cx, GuardOptions::new());
}

/// Install the guard globals, using host implementations where provided.
///
/// Calling this again replaces all three globals.
pub fn init_guard_with(cx: &mut App, options: GuardOptions) {
    let store = options
        .store
        .unwrap_or_else(|| Box::new(DirtyStateRegistry::new()));
    let flag = options.session.unwrap_or_default();
    let backend = options
        .history
        .unwrap_or_else(|| Box::new(MemoryHistory::new()));

    info_log!(
        "Navigation guard installed at '{}'",
        backend.current_path()
    );
    cx.set_global(GlobalDirtyState { store });
    cx.set_global(GlobalSessionOverride { flag });
    cx.set_global(GlobalHistory { backend });
}

// ============================================================================
// UseNavigationGuard trait
// ============================================================================

/// Access to the guard globals from an app context.
///
/// The `update_*` methods return [`GuardError`] when the global is missing
/// instead of panicking.
pub trait UseNavigationGuard {
    /// The installed dirty-state store, if any.
    fn dirty_state(&self) -> Option<&dyn DirtyStateStore>;

    /// Mutate the dirty-state store.
    fn update_dirty_state<R, F>(&mut self, f: F) -> GuardResult<R>
    where
        F: FnOnce(&mut dyn DirtyStateStore) -> R;

    /// The installed history backend, if any.
    fn history(&self) -> Option<&dyn HistoryBackend>;

    /// Mutate the history backend.
    fn update_history<R, F>(&mut self, f: F) -> GuardResult<R>
    where
        F: FnOnce(&mut dyn HistoryBackend) -> R;

    /// Whether the user turned prompting off for this session.
    fn session_override_set(&self) -> bool;

    /// Turn prompting off for this session.
    fn set_session_override(&mut self);
}

impl UseNavigationGuard for App {
    fn dirty_state(&self) -> Option<&dyn DirtyStateStore> {
        self.try_global::<GlobalDirtyState>()
            .map(|global| global.store.as_ref())
    }

    fn update_dirty_state<R, F>(&mut self, f: F) -> GuardResult<R>
    where
        F: FnOnce(&mut dyn DirtyStateStore) -> R,
    {
        if !self.has_global::<GlobalDirtyState>() {
            return Err(GuardError::RegistryUnavailable);
        }
        Ok(self.update_global::<GlobalDirtyState, _>(|global, _| f(global.store.as_mut())))
    }

    fn history(&self) -> Option<&dyn HistoryBackend> {
        self.try_global::<GlobalHistory>()
            .map(|global| global.backend.as_ref())
    }

    fn update_history<R, F>(&mut self, f: F) -> GuardResult<R>
    where
        F: FnOnce(&mut dyn HistoryBackend) -> R,
    {
        if !self.has_global::<GlobalHistory>() {
            return Err(GuardError::HistoryUnavailable);
        }
        Ok(self.update_global::<GlobalHistory, _>(|global, _| f(global.backend.as_mut())))
    }

    fn session_override_set(&self) -> bool {
        self.try_global::<GlobalSessionOverride>()
            .is_some_and(|global| global.flag.is_set())
    }

    fn set_session_override(&mut self) {
        if self.has_global::<GlobalSessionOverride>() {
            self.update_global::<GlobalSessionOverride, _>(|global, _| global.flag.set());
        } else {
            self.set_global(GlobalSessionOverride {
                flag: SessionOverride::new(),
            });
            self.update_global::<GlobalSessionOverride, _>(|global, _| global.flag.set());
        }
    }
}

/// Current history path, or `/` when no history is installed.
pub fn current_path(cx: &App) -> String {
    cx.history()
        .map_or_else(|| "/".to_string(), HistoryBackend::current_path)
}

// ============================================================================
// DirtyState
// ============================================================================

/// Static API over the installed [`DirtyStateStore`].
///
/// Forms call these from their mount/edit/unmount handlers; wizards and
/// payment flows call the progress updaters. None of them panic or return
/// errors.
pub struct DirtyState;

impl DirtyState {
    /// Register a clean form.
    pub fn register_form(cx: &mut App, form_id: &str) {
        let result = cx
            .update_dirty_state(|store| store.register_form(form_id))
            .and_then(|inner| inner);
        fail_open(result, "register_form", ());
    }

    /// Remove a form's entry (on unmount).
    pub fn unregister_form(cx: &mut App, form_id: &str) {
        let removed = fail_open(
            cx.update_dirty_state(|store| store.unregister_form(form_id)),
            "unregister_form",
            false,
        );
        if removed {
            cx.refresh_windows();
        }
    }

    /// Set a form's dirty flag.
    pub fn update_form_state(cx: &mut App, form_id: &str, dirty: bool) {
        let result = cx
            .update_dirty_state(|store| store.update_form_state(form_id, dirty))
            .and_then(|inner| inner);
        if fail_open(result, "update_form_state", false) {
            cx.refresh_windows();
        }
    }

    /// Whether `form_id` is registered.
    pub fn is_registered(cx: &App, form_id: &str) -> bool {
        cx.dirty_state()
            .is_some_and(|store| store.is_registered(form_id))
    }

    /// Merge booking progress.
    pub fn update_booking_state(cx: &mut App, update: BookingUpdate) {
        let changed = fail_open(
            cx.update_dirty_state(|store| store.update_booking_state(update)),
            "update_booking_state",
            false,
        );
        if changed {
            cx.refresh_windows();
        }
    }

    /// Merge payment progress.
    pub fn update_payment_state(cx: &mut App, update: PaymentUpdate) {
        let changed = fail_open(
            cx.update_dirty_state(|store| store.update_payment_state(update)),
            "update_payment_state",
            false,
        );
        if changed {
            cx.refresh_windows();
        }
    }

    /// The live aggregate predicate. `false` when no store is installed.
    pub fn should_prevent_navigation(cx: &App) -> bool {
        let result = cx
            .dirty_state()
            .map(DirtyStateStore::should_prevent_navigation)
            .ok_or(GuardError::RegistryUnavailable);
        fail_open(result, "should_prevent_navigation", false)
    }

    /// Context label for the current path.
    pub fn navigation_context(cx: &App) -> NavigationContext {
        let path = current_path(cx);
        cx.dirty_state()
            .map_or(NavigationContext::Default, |store| {
                store.navigation_context(&path)
            })
    }

    /// Drop all unsaved-work signals. Call after a confirmed leave, a
    /// logout, or a successful final submit.
    pub fn clear_all_states(cx: &mut App) {
        debug_log!("Clearing all dirty state");
        fail_open(
            cx.update_dirty_state(|store| store.clear_all_states()),
            "clear_all_states",
            (),
        );
        cx.refresh_windows();
    }
}

// ============================================================================
// Tests
// ============================================================================
