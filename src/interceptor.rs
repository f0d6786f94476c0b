//! Navigation interceptor.
//!
//! One [`NavigationInterceptor`] belongs to each guarded view. It receives
//! events from all five navigation vectors, decides whether the user must
//! confirm, and if so holds the intended navigation as a single replay
//! closure until the user answers the confirmation modal.
//!
//! # Protocol
//!
//! Every vector goes through the same gate, in this order:
//!
//! 1. A confirmed navigation is being replayed → pass through.
//! 2. The modal is already shown → drop the event (first attempt wins).
//! 3. A bypass rule holds, or nothing needs protecting → allow natively.
//! 4. Otherwise neutralize the native effect, capture the replay, show the
//!    modal and call the `on_navigation_attempt` hook.
//!
//! Unload is the exception at step 4: the platform allows no custom UI
//! there, so the interceptor returns a warning string instead of showing
//! the modal. Unload also skips step 2: it never holds a navigation, so it
//! still warns while the modal is open.
//!
//! A Leave whose replay does not change the path (a custom action that
//! stays put, or a back replay at the start of history) ends the replay
//! at once, so the guard is armed again for the next dirty edit.
//!
//! Bypass rules, any of which skips prompting:
//!
//! - the session override is set;
//! - the target is a sign-out endpoint;
//! - the guarded path lies under a configured bypass path;
//! - the guarded path and the target share an internal-flow prefix.
//!
//! All checks read the app globals at the moment of the event.
//!
//! # Example
//!
//! ```ignore
//! use gpui_navigation_guard::{InterceptorConfig, NavigationInterceptor};
//!
//! let mut guard = NavigationInterceptor::new(
//!     InterceptorConfig::new().track_form("amenity-edit"),
//!     cx,
//! );
//! guard.mark_form_dirty(cx);
//!
//! guard.navigate("/admin-home", cx);  // modal shown, nothing navigated
//! assert!(guard.show_modal());
//!
//! guard.handle_leave(false, cx);      // state cleared, then navigated
//! ```

use crate::context::{current_path, DirtyState, UseNavigationGuard};
use crate::error::{fail_open, GuardError, GuardResult};
use crate::history::HistoryBackend;
use crate::modal::{ModalDecision, ModalProps};
use crate::paths::{
    is_logout_path, matches_any, shared_flow_prefix, DEFAULT_FLOW_PREFIXES, DEFAULT_LOGOUT_PATHS,
};
use crate::registry::NavigationContext;
use crate::vector::{
    AuxButtonTracker, EventOutcome, NavigationEvent, NavigationVector, RouterAction, SwipeConfig,
    SwipeTracker, TraversalDirection,
};
use crate::{debug_log, info_log, trace_log, warn_log};
use gpui::App;

/// Most entries a replayed traversal skips: the sentinel plus the guarded
/// view's own entry.
const MAX_TRAVERSE_STEPS: usize = 2;

// ============================================================================
// Configuration
// ============================================================================

/// Override for the aggregate predicate. Called on every event.
pub type PreventPredicateFn = Box<dyn Fn(&App) -> bool>;

/// Side effect run whenever a navigation is intercepted.
pub type NavigationAttemptFn = Box<dyn Fn(NavigationVector, &mut App)>;

/// Action run on Leave instead of the vector's replay (e.g. sign-out).
pub type CustomActionFn = Box<dyn Fn(&mut App)>;

type ReplayFn = Box<dyn FnOnce(&mut App)>;

/// Configuration for a [`NavigationInterceptor`].
///
/// # Example
///
/// ```
/// use gpui_navigation_guard::{InterceptorConfig, NavigationContext};
///
/// let config = InterceptorConfig::new()
///     .track_form("guest-details")
///     .bypass_path("/booking/confirmation")
///     .context(NavigationContext::Booking)
///     .custom_message("Your booking is not finished.");
/// assert_eq!(config.tracked_form_id(), Some("guest-details"));
/// ```
pub struct InterceptorConfig {
    track_forms: bool,
    form_id: Option<String>,
    custom_message: Option<String>,
    bypass_paths: Vec<String>,
    flow_prefixes: Vec<String>,
    logout_paths: Vec<String>,
    should_prevent: Option<PreventPredicateFn>,
    on_navigation_attempt: Option<NavigationAttemptFn>,
    custom_action: Option<CustomActionFn>,
    context: Option<NavigationContext>,
    message: Option<String>,
    swipe: SwipeConfig,
}

impl InterceptorConfig {
    /// Defaults: no form tracking, default flow prefixes and sign-out paths.
    pub fn new() -> Self {
        Self {
            track_forms: false,
            form_id: None,
            custom_message: None,
            bypass_paths: Vec::new(),
            flow_prefixes: DEFAULT_FLOW_PREFIXES.iter().map(|p| p.to_string()).collect(),
            logout_paths: DEFAULT_LOGOUT_PATHS.iter().map(|p| p.to_string()).collect(),
            should_prevent: None,
            on_navigation_attempt: None,
            custom_action: None,
            context: None,
            message: None,
            swipe: SwipeConfig::new(),
        }
    }

    /// Register `form_id` on construction and unregister it on unmount.
    #[must_use]
    pub fn track_form(mut self, form_id: impl Into<String>) -> Self {
        self.track_forms = true;
        self.form_id = Some(form_id.into());
        self
    }

    /// Set the form id without registering it (the form registers itself).
    #[must_use]
    pub fn form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    /// Toggle registration of the form id on construction/unmount.
    #[must_use]
    pub fn track_forms(mut self, track_forms: bool) -> Self {
        self.track_forms = track_forms;
        self
    }

    /// Text handed to the platform's unload prompt.
    #[must_use]
    pub fn custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    /// Skip prompting while the guarded path lies under `path`.
    #[must_use]
    pub fn bypass_path(mut self, path: impl Into<String>) -> Self {
        self.bypass_paths.push(path.into());
        self
    }

    /// Replace the bypass path list.
    #[must_use]
    pub fn bypass_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bypass_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the internal-flow prefixes.
    #[must_use]
    pub fn flow_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flow_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the sign-out endpoints.
    #[must_use]
    pub fn logout_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logout_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Use `predicate` instead of the registry's aggregate predicate.
    #[must_use]
    pub fn should_prevent<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&App) -> bool + 'static,
    {
        self.should_prevent = Some(Box::new(predicate));
        self
    }

    /// Run `hook` whenever a navigation is intercepted.
    #[must_use]
    pub fn on_navigation_attempt<F>(mut self, hook: F) -> Self
    where
        F: Fn(NavigationVector, &mut App) + 'static,
    {
        self.on_navigation_attempt = Some(Box::new(hook));
        self
    }

    /// Run `action` on Leave instead of replaying the navigation.
    #[must_use]
    pub fn custom_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut App) + 'static,
    {
        self.custom_action = Some(Box::new(action));
        self
    }

    /// Fix the modal context instead of deriving it from the registry.
    #[must_use]
    pub fn context(mut self, context: NavigationContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Fix the modal body text.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Swipe recognition thresholds.
    #[must_use]
    pub fn swipe(mut self, swipe: SwipeConfig) -> Self {
        self.swipe = swipe;
        self
    }

    /// The configured form id.
    pub fn tracked_form_id(&self) -> Option<&str> {
        self.form_id.as_deref()
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InterceptorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorConfig")
            .field("track_forms", &self.track_forms)
            .field("form_id", &self.form_id)
            .field("bypass_paths", &self.bypass_paths)
            .field("flow_prefixes", &self.flow_prefixes)
            .field("context", &self.context)
            .field("has_predicate", &self.should_prevent.is_some())
            .field("has_custom_action", &self.custom_action.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PendingNavigation
// ============================================================================

/// The navigation held while the modal is shown.
pub struct PendingNavigation {
    vector: NavigationVector,
    target: Option<String>,
    replay: ReplayFn,
}

impl PendingNavigation {
    /// Vector that produced this navigation.
    pub fn vector(&self) -> NavigationVector {
        self.vector
    }

    /// Destination, when known.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl std::fmt::Debug for PendingNavigation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingNavigation")
            .field("vector", &self.vector)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Result of the shared gate every vector passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    /// A confirmed navigation is replaying.
    Navigating,
    /// The modal is already open.
    Prompting,
    /// Nothing to protect, or a bypass rule holds.
    Allowed,
    /// Confirmation required.
    Intercept,
}

// ============================================================================
// NavigationInterceptor
// ============================================================================

/// Per-view navigation guard.
pub struct NavigationInterceptor {
    config: InterceptorConfig,
    show_modal: bool,
    pending: Option<PendingNavigation>,
    navigating: bool,
    guarded_path: String,
    swipe: SwipeTracker,
    aux_buttons: AuxButtonTracker,
}

impl NavigationInterceptor {
    /// Mount an interceptor on the current path. Registers the configured
    /// form when form tracking is on.
    pub fn new(config: InterceptorConfig, cx: &mut App) -> Self {
        if config.track_forms {
            if let Some(form_id) = config.form_id.as_deref() {
                DirtyState::register_form(cx, form_id);
            }
        }
        let guarded_path = current_path(cx);
        debug_log!("Interceptor mounted on '{}'", guarded_path);

        let mut interceptor = Self {
            config,
            show_modal: false,
            pending: None,
            navigating: false,
            guarded_path,
            swipe: SwipeTracker::new(),
            aux_buttons: AuxButtonTracker::new(),
        };
        interceptor.sync_protection(cx);
        interceptor
    }

    /// Tear down: drop any pending navigation and unregister the tracked form.
    pub fn unmount(&mut self, cx: &mut App) {
        self.pending = None;
        self.show_modal = false;
        self.navigating = false;
        if self.config.track_forms {
            if let Some(form_id) = self.config.form_id.as_deref() {
                DirtyState::unregister_form(cx, form_id);
            }
        }
        debug_log!("Interceptor unmounted from '{}'", self.guarded_path);
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    /// Whether the confirmation modal is shown.
    pub fn show_modal(&self) -> bool {
        self.show_modal
    }

    /// The held navigation, if the modal is shown.
    pub fn pending(&self) -> Option<&PendingNavigation> {
        self.pending.as_ref()
    }

    /// Whether a confirmed navigation is replaying.
    pub fn is_navigating(&self) -> bool {
        self.navigating
    }

    /// Path this interceptor guards.
    pub fn guarded_path(&self) -> &str {
        &self.guarded_path
    }

    /// Configuration in use.
    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    /// The live aggregate predicate (or the configured override).
    pub fn should_prevent_navigation(&self, cx: &App) -> bool {
        match &self.config.should_prevent {
            Some(predicate) => predicate(cx),
            None => DirtyState::should_prevent_navigation(cx),
        }
    }

    /// Whether prompting is skipped for a navigation towards `target`.
    pub fn should_bypass(&self, target: Option<&str>, cx: &App) -> bool {
        if cx.session_override_set() {
            trace_log!("Bypass: session override set");
            return true;
        }
        if let Some(target) = target {
            if is_logout_path(target, &self.config.logout_paths) {
                debug_log!("Bypass: '{}' is a sign-out endpoint", target);
                return true;
            }
        }
        if matches_any(&self.guarded_path, &self.config.bypass_paths) {
            debug_log!("Bypass: '{}' is a bypass path", self.guarded_path);
            return true;
        }
        if let Some(target) = target {
            if let Some(prefix) =
                shared_flow_prefix(&self.guarded_path, target, &self.config.flow_prefixes)
            {
                debug_log!(
                    "Bypass: '{}' -> '{}' stays inside flow '{}'",
                    self.guarded_path,
                    target,
                    prefix
                );
                return true;
            }
        }
        false
    }

    /// Whether leaving right now would prompt.
    pub fn is_protected(&self, cx: &App) -> bool {
        !self.should_bypass(None, cx) && self.should_prevent_navigation(cx)
    }

    /// Context label for the modal.
    pub fn context(&self, cx: &App) -> NavigationContext {
        self.config
            .context
            .unwrap_or_else(|| DirtyState::navigation_context(cx))
    }

    /// Body text for the modal.
    pub fn message(&self, cx: &App) -> String {
        self.config
            .message
            .clone()
            .unwrap_or_else(|| self.context(cx).default_message().to_string())
    }

    /// Text for the platform unload prompt.
    pub fn unload_message(&self, cx: &App) -> String {
        self.config
            .custom_message
            .clone()
            .unwrap_or_else(|| self.message(cx))
    }

    /// Props for the host's confirmation dialog.
    pub fn modal_props(&self, cx: &App) -> ModalProps {
        let context = self.context(cx);
        ModalProps {
            show: self.show_modal,
            context,
            title: context.default_title().to_string(),
            message: self.message(cx),
        }
    }

    // ------------------------------------------------------------------------
    // Form helpers
    // ------------------------------------------------------------------------

    /// Mark the configured form dirty. Ignored if it is not registered.
    pub fn mark_form_dirty(&mut self, cx: &mut App) {
        self.set_form_dirty(true, cx);
    }

    /// Mark the configured form clean. Ignored if it is not registered.
    pub fn mark_form_clean(&mut self, cx: &mut App) {
        self.set_form_dirty(false, cx);
    }

    fn set_form_dirty(&mut self, dirty: bool, cx: &mut App) {
        let Some(form_id) = self.config.form_id.as_deref() else {
            debug_log!("No form id configured; ignoring dirty={}", dirty);
            return;
        };
        if !fail_open(ensure_registered(cx, form_id), "Marking form", false) {
            return;
        }
        DirtyState::update_form_state(cx, form_id, dirty);
        self.sync_protection(cx);
    }

    // ------------------------------------------------------------------------
    // Sentinel management
    // ------------------------------------------------------------------------

    /// Bring the history sentinel in line with the protection state.
    ///
    /// Call after anything that may change protection (the form helpers do
    /// it themselves) and once per render. While protected, exactly one
    /// sentinel sits under the cursor; when protection lapses the cursor
    /// steps back off it so the next back press leaves at once.
    ///
    /// A history cannot drop forward entries, so the stepped-off sentinel
    /// stays ahead of the cursor until the next push or re-arm truncates it.
    pub fn sync_protection(&mut self, cx: &mut App) {
        let path = current_path(cx);
        if self.navigating {
            if path != self.guarded_path {
                debug_log!("Replayed navigation reached '{}'", path);
                self.navigating = false;
                self.guarded_path = path;
            }
            return;
        }
        if self.show_modal {
            return;
        }
        self.guarded_path = path;

        let protected = self.is_protected(cx);
        let on_sentinel = cx.history().is_some_and(HistoryBackend::is_sentinel);
        let guarded = self.guarded_path.clone();
        if protected && !on_sentinel {
            let armed = cx.update_history(|history| history.push_sentinel(guarded));
            fail_open(armed, "Arming history sentinel", ());
        } else if !protected && on_sentinel {
            let disarmed = cx.update_history(|history| history.go(-1));
            fail_open(disarmed, "Disarming history sentinel", false);
        }
    }

    // ------------------------------------------------------------------------
    // Router methods (programmatic vector)
    // ------------------------------------------------------------------------

    /// Navigate to `path`, asking first if needed.
    pub fn navigate(&mut self, path: impl Into<String>, cx: &mut App) -> EventOutcome {
        self.handle_event(
            NavigationEvent::Programmatic(RouterAction::Navigate(path.into())),
            cx,
        )
    }

    /// Replace the current entry with `path`, asking first if needed.
    pub fn replace(&mut self, path: impl Into<String>, cx: &mut App) -> EventOutcome {
        self.handle_event(
            NavigationEvent::Programmatic(RouterAction::Replace(path.into())),
            cx,
        )
    }

    /// Go back, asking first if needed.
    pub fn back(&mut self, cx: &mut App) -> EventOutcome {
        self.handle_event(NavigationEvent::Programmatic(RouterAction::Back), cx)
    }

    // ------------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------------

    /// Feed one host event through the guard.
    pub fn handle_event(&mut self, event: NavigationEvent, cx: &mut App) -> EventOutcome {
        trace_log!("Navigation event on '{}': {:?}", self.guarded_path, event);
        let outcome = match event {
            NavigationEvent::PopState { direction } => self.on_pop_state(direction, cx),
            NavigationEvent::MouseDown { button, control } => {
                self.aux_buttons.press(button, control);
                match self.gate(None, cx) {
                    Gate::Prompting | Gate::Intercept => EventOutcome::Suppress,
                    Gate::Navigating | Gate::Allowed => EventOutcome::Allow,
                }
            }
            NavigationEvent::MouseUp { button, control } => {
                if self.aux_buttons.release(button, control) {
                    self.on_traversal(NavigationVector::MouseButton, button, cx)
                } else {
                    EventOutcome::Allow
                }
            }
            NavigationEvent::TouchStart { x, y } => {
                self.swipe.begin(x, y);
                EventOutcome::Allow
            }
            NavigationEvent::TouchEnd { x, y } => {
                if self.swipe.finish(x, y, &self.config.swipe) {
                    self.on_traversal(NavigationVector::TouchSwipe, TraversalDirection::Back, cx)
                } else {
                    EventOutcome::Allow
                }
            }
            NavigationEvent::TouchCancel => {
                self.swipe.cancel();
                EventOutcome::Allow
            }
            NavigationEvent::BeforeUnload => self.on_before_unload(cx),
            NavigationEvent::Programmatic(action) => self.on_programmatic(action, cx),
        };
        trace_log!("Navigation event outcome: {:?}", outcome);
        outcome
    }

    fn gate(&self, target: Option<&str>, cx: &App) -> Gate {
        if self.navigating {
            Gate::Navigating
        } else if self.show_modal {
            Gate::Prompting
        } else if self.should_bypass(target, cx) || !self.should_prevent_navigation(cx) {
            Gate::Allowed
        } else {
            Gate::Intercept
        }
    }

    fn on_pop_state(&mut self, direction: TraversalDirection, cx: &mut App) -> EventOutcome {
        match self.gate(None, cx) {
            Gate::Navigating | Gate::Allowed => EventOutcome::Allow,
            Gate::Prompting => {
                debug_log!("History {:?} dropped: already prompting", direction);
                EventOutcome::Ignored
            }
            Gate::Intercept => {
                // The platform has already moved; put the guarded view back.
                let guarded = self.guarded_path.clone();
                let neutralized = cx.update_history(|history| match direction {
                    TraversalDirection::Back => history.push_sentinel(guarded),
                    TraversalDirection::Forward => {
                        history.go(-1);
                    }
                });
                fail_open(neutralized, "Neutralizing history traversal", ());
                let replay = self.traversal_replay(direction);
                self.intercept(NavigationVector::History, None, Some(replay), cx)
            }
        }
    }

    fn on_traversal(
        &mut self,
        vector: NavigationVector,
        direction: TraversalDirection,
        cx: &mut App,
    ) -> EventOutcome {
        match self.gate(None, cx) {
            Gate::Navigating | Gate::Allowed => EventOutcome::Allow,
            // Keep the platform from navigating underneath the open modal.
            Gate::Prompting => EventOutcome::Suppress,
            Gate::Intercept => {
                let replay = self.traversal_replay(direction);
                self.intercept(vector, None, Some(replay), cx)
            }
        }
    }

    fn on_before_unload(&mut self, cx: &mut App) -> EventOutcome {
        if self.navigating
            || self.should_bypass(None, cx)
            || !self.should_prevent_navigation(cx)
        {
            return EventOutcome::Allow;
        }
        self.intercept(NavigationVector::BeforeUnload, None, None, cx)
    }

    fn on_programmatic(&mut self, action: RouterAction, cx: &mut App) -> EventOutcome {
        let target = action.target().map(str::to_string);
        match self.gate(target.as_deref(), cx) {
            Gate::Prompting => {
                debug_log!("Router call {:?} dropped: already prompting", action);
                EventOutcome::Ignored
            }
            Gate::Navigating => {
                perform_router_action(&action, &self.guarded_path, cx);
                EventOutcome::Allow
            }
            Gate::Allowed => {
                perform_router_action(&action, &self.guarded_path, cx);
                self.guarded_path = current_path(cx);
                EventOutcome::Allow
            }
            Gate::Intercept => {
                let guarded = self.guarded_path.clone();
                let replay: ReplayFn =
                    Box::new(move |cx| perform_router_action(&action, &guarded, cx));
                self.intercept(NavigationVector::Programmatic, target, Some(replay), cx)
            }
        }
    }

    fn traversal_replay(&self, direction: TraversalDirection) -> ReplayFn {
        let guarded = self.guarded_path.clone();
        Box::new(move |cx| {
            let moved = cx.update_history(|history| traverse_away(history, direction, &guarded));
            fail_open(moved, "Replaying history traversal", ());
        })
    }

    /// Hold `replay` behind the modal, or fall back to the platform warning
    /// for vectors that cannot show one.
    fn intercept(
        &mut self,
        vector: NavigationVector,
        target: Option<String>,
        replay: Option<ReplayFn>,
        cx: &mut App,
    ) -> EventOutcome {
        match replay {
            Some(replay) if vector.capability().shows_modal => {
                self.capture(vector, target, replay, cx);
                EventOutcome::Intercepted
            }
            _ => {
                info_log!("{:?} of '{}' needs confirmation", vector, self.guarded_path);
                if let Some(hook) = &self.config.on_navigation_attempt {
                    hook(vector, cx);
                }
                EventOutcome::Warn(self.unload_message(cx))
            }
        }
    }

    fn capture(
        &mut self,
        vector: NavigationVector,
        target: Option<String>,
        replay: ReplayFn,
        cx: &mut App,
    ) {
        info_log!(
            "Intercepted {:?} navigation from '{}' (target: {:?})",
            vector,
            self.guarded_path,
            target
        );
        self.pending = Some(PendingNavigation {
            vector,
            target,
            replay,
        });
        self.show_modal = true;
        if let Some(hook) = &self.config.on_navigation_attempt {
            hook(vector, cx);
        }
        cx.refresh_windows();
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Apply the modal's answer.
    pub fn resolve(&mut self, decision: ModalDecision, cx: &mut App) {
        match decision {
            ModalDecision::Stay { dont_ask_again } => self.handle_stay(dont_ask_again, cx),
            ModalDecision::Leave { dont_ask_again } => self.handle_leave(dont_ask_again, cx),
        }
    }

    /// Cancel the held navigation. It is dropped and never replayed.
    pub fn handle_stay(&mut self, dont_ask_again: bool, cx: &mut App) {
        if let Some(pending) = self.pending.take() {
            info_log!(
                "Stayed on '{}'; dropped {:?} navigation",
                self.guarded_path,
                pending.vector
            );
        }
        self.show_modal = false;
        if dont_ask_again {
            cx.set_session_override();
        }
        cx.refresh_windows();
    }

    /// Confirm the held navigation: clear all dirty state, then replay it
    /// (or run the custom action) exactly once.
    pub fn handle_leave(&mut self, dont_ask_again: bool, cx: &mut App) {
        self.show_modal = false;
        let Some(pending) = self.pending.take() else {
            warn_log!("Leave on '{}' with nothing pending", self.guarded_path);
            return;
        };
        info_log!(
            "Leaving '{}' via {:?} navigation",
            self.guarded_path,
            pending.vector
        );
        self.navigating = true;
        if dont_ask_again {
            cx.set_session_override();
        }
        DirtyState::clear_all_states(cx);
        let before = current_path(cx);
        match &self.config.custom_action {
            Some(action) => action(cx),
            None => (pending.replay)(cx),
        }
        if current_path(cx) == before {
            debug_log!("Leave stayed on '{}'; guard re-armed", before);
            self.navigating = false;
            self.sync_protection(cx);
        }
    }
}

impl std::fmt::Debug for NavigationInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationInterceptor")
            .field("guarded_path", &self.guarded_path)
            .field("show_modal", &self.show_modal)
            .field("pending", &self.pending)
            .field("navigating", &self.navigating)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Replay helpers
// ============================================================================

/// `Ok` when `form_id` is registered with the installed store.
fn ensure_registered(cx: &App, form_id: &str) -> GuardResult<bool> {
    if DirtyState::is_registered(cx, form_id) {
        Ok(true)
    } else {
        Err(GuardError::UnknownForm {
            form_id: form_id.to_string(),
        })
    }
}

/// Step through history in `direction` until the cursor leaves `guarded`,
/// skipping the sentinel and the guarded view's own entry.
fn traverse_away(history: &mut dyn HistoryBackend, direction: TraversalDirection, guarded: &str) {
    let step = match direction {
        TraversalDirection::Back => -1,
        TraversalDirection::Forward => 1,
    };
    for _ in 0..MAX_TRAVERSE_STEPS {
        if !history.go(step) || history.current_path() != guarded {
            break;
        }
    }
}

/// Run a router call against the installed history.
fn perform_router_action(action: &RouterAction, guarded: &str, cx: &mut App) {
    let result = cx.update_history(|history| match action {
        // A sentinel stands in for the guarded entry, so a push from it
        // takes its slot.
        RouterAction::Navigate(path) => {
            if history.is_sentinel() {
                history.replace(path.clone());
            } else {
                history.push(path.clone());
            }
        }
        RouterAction::Replace(path) => {
            if history.is_sentinel() {
                history.go(-1);
            }
            history.replace(path.clone());
        }
        RouterAction::Back => traverse_away(history, TraversalDirection::Back, guarded),
    });
    fail_open(result, "Router call", ());
    cx.refresh_windows();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{init_guard_with, GuardOptions};
    use crate::history::MemoryHistory;
    use crate::registry::{BookingUpdate, DirtyStateRegistry, DirtyStateStore, PaymentUpdate};
    use gpui::TestAppContext;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn setup(cx: &mut App, start: &str) {
        let mut history = MemoryHistory::new();
        history.push(start.to_string());
        init_guard_with(cx, GuardOptions::new().history(history));
    }

    fn path(cx: &App) -> String {
        current_path(cx)
    }

    #[gpui::test]
    fn test_navigate_when_clean_goes_straight_through(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms");
            let mut guard = NavigationInterceptor::new(InterceptorConfig::new(), cx);

            assert_eq!(guard.navigate("/rooms/12", cx), EventOutcome::Allow);
            assert!(!guard.show_modal());
            assert_eq!(path(cx), "/rooms/12");
            assert_eq!(guard.guarded_path(), "/rooms/12");
        });
    }

    #[gpui::test]
    fn test_dirty_form_navigate_then_leave(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);
            assert!(guard.is_protected(cx));

            assert_eq!(guard.navigate("/other", cx), EventOutcome::Intercepted);
            assert!(guard.show_modal());
            assert_eq!(guard.pending().and_then(PendingNavigation::target), Some("/other"));
            assert_eq!(path(cx), "/rooms/new");

            guard.handle_leave(false, cx);
            assert!(!guard.show_modal());
            assert!(guard.pending().is_none());
            assert_eq!(path(cx), "/other");
            assert!(!DirtyState::is_registered(cx, "A"));
            assert!(!DirtyState::should_prevent_navigation(cx));

            // The sentinel slot was reused: one step back is the form again.
            let back = cx.update_history(|history| {
                history.go(-1);
                history.current_path()
            });
            assert_eq!(back, Ok("/rooms/new".to_string()));
        });
    }

    #[gpui::test]
    fn test_stay_never_replays(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/profile");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("profile"), cx);
            guard.mark_form_dirty(cx);

            guard.navigate("/rooms", cx);
            guard.handle_stay(false, cx);
            assert!(!guard.show_modal());
            assert!(guard.pending().is_none());
            assert_eq!(path(cx), "/profile");
            assert!(DirtyState::should_prevent_navigation(cx));

            // A later leave has nothing to replay.
            guard.handle_leave(false, cx);
            assert_eq!(path(cx), "/profile");
            assert!(!guard.is_navigating());
        });
    }

    #[gpui::test]
    fn test_first_attempt_wins(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/admin/rooms");
            let attempts = Rc::new(Cell::new(0));
            let counter = attempts.clone();
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new()
                    .track_form("room")
                    .on_navigation_attempt(move |_, _| counter.set(counter.get() + 1)),
                cx,
            );
            guard.mark_form_dirty(cx);

            assert_eq!(guard.navigate("/rooms", cx), EventOutcome::Intercepted);
            assert_eq!(guard.navigate("/profile", cx), EventOutcome::Ignored);
            assert_eq!(guard.back(cx), EventOutcome::Ignored);
            assert_eq!(attempts.get(), 1);
            assert_eq!(guard.pending().and_then(PendingNavigation::target), Some("/rooms"));

            guard.handle_leave(false, cx);
            assert_eq!(path(cx), "/rooms");
        });
    }

    #[gpui::test]
    fn test_internal_flow_bypass(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/booking/step2");
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new()
                    .track_form("A")
                    .bypass_path("/booking/payment"),
                cx,
            );
            guard.mark_form_dirty(cx);

            assert_eq!(guard.navigate("/booking/payment", cx), EventOutcome::Allow);
            assert!(!guard.show_modal());
            assert_eq!(path(cx), "/booking/payment");
            // Still dirty: the flow move is not a leave.
            assert!(DirtyState::should_prevent_navigation(cx));
        });
    }

    #[gpui::test]
    fn test_bypass_path_on_current_page(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/booking/confirmation");
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new()
                    .track_form("A")
                    .bypass_path("/booking/confirmation"),
                cx,
            );
            guard.mark_form_dirty(cx);
            assert!(!guard.is_protected(cx));
            assert_eq!(guard.navigate("/", cx), EventOutcome::Allow);
        });
    }

    #[gpui::test]
    fn test_logout_bypass(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/cashier");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("till"), cx);
            guard.mark_form_dirty(cx);
            assert_eq!(guard.navigate("/logout", cx), EventOutcome::Allow);
            assert_eq!(path(cx), "/logout");
        });
    }

    #[gpui::test]
    fn test_session_override_disables_all_vectors(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);
            cx.set_session_override();

            let events = vec![
                NavigationEvent::PopState {
                    direction: TraversalDirection::Back,
                },
                NavigationEvent::MouseDown {
                    button: TraversalDirection::Back,
                    control: 1,
                },
                NavigationEvent::MouseUp {
                    button: TraversalDirection::Back,
                    control: 1,
                },
                NavigationEvent::TouchStart { x: 2.0, y: 100.0 },
                NavigationEvent::TouchEnd { x: 200.0, y: 110.0 },
                NavigationEvent::BeforeUnload,
            ];
            for event in events {
                assert_eq!(guard.handle_event(event, cx), EventOutcome::Allow);
                assert!(!guard.show_modal());
            }
            assert_eq!(guard.navigate("/rooms", cx), EventOutcome::Allow);
            assert!(!guard.show_modal());
        });
    }

    #[gpui::test]
    fn test_dont_ask_again_on_stay(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);

            guard.navigate("/rooms", cx);
            guard.resolve(
                ModalDecision::Stay {
                    dont_ask_again: true,
                },
                cx,
            );
            assert!(cx.session_override_set());
            assert_eq!(path(cx), "/rooms/new");

            assert_eq!(guard.navigate("/rooms", cx), EventOutcome::Allow);
            assert_eq!(path(cx), "/rooms");
        });
    }

    #[gpui::test]
    fn test_clear_happens_before_custom_action(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/admin/amenities");
            let seen_dirty = Rc::new(RefCell::new(Vec::new()));
            let log = seen_dirty.clone();
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new()
                    .track_form("amenity")
                    .custom_action(move |cx| {
                        log.borrow_mut()
                            .push(DirtyState::should_prevent_navigation(cx));
                    }),
                cx,
            );
            guard.mark_form_dirty(cx);
            DirtyState::update_payment_state(cx, PaymentUpdate::new().active(true));

            guard.navigate("/", cx);
            guard.handle_leave(false, cx);

            assert_eq!(*seen_dirty.borrow(), vec![false]);
            // The custom action replaced the replay.
            assert_eq!(path(cx), "/admin/amenities");
        });
    }

    #[gpui::test]
    fn test_override_predicate_is_read_live(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/booking/step1");
            let flag = Rc::new(Cell::new(false));
            let live = flag.clone();
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new().should_prevent(move |_| live.get()),
                cx,
            );

            assert_eq!(guard.navigate("/rooms", cx), EventOutcome::Allow);
            flag.set(true);
            assert_eq!(guard.back(cx), EventOutcome::Intercepted);
        });
    }

    #[gpui::test]
    fn test_booking_with_data_protects(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/booking/step3");
            let mut guard = NavigationInterceptor::new(InterceptorConfig::new(), cx);
            DirtyState::update_booking_state(
                cx,
                BookingUpdate::new().active(true).step(3).has_data(true),
            );
            assert_eq!(guard.navigate("/", cx), EventOutcome::Intercepted);
            assert_eq!(guard.context(cx), NavigationContext::Booking);
            let props = guard.modal_props(cx);
            assert!(props.show);
            assert_eq!(props.title, "Booking not finished");
        });
    }

    #[gpui::test]
    fn test_before_unload_warns_without_modal(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new()
                    .track_form("A")
                    .custom_message("Changes will be lost"),
                cx,
            );
            assert_eq!(
                guard.handle_event(NavigationEvent::BeforeUnload, cx),
                EventOutcome::Allow
            );

            guard.mark_form_dirty(cx);
            assert_eq!(
                guard.handle_event(NavigationEvent::BeforeUnload, cx),
                EventOutcome::Warn("Changes will be lost".to_string())
            );
            assert!(!guard.show_modal());
            assert!(guard.pending().is_none());
        });
    }

    #[gpui::test]
    fn test_mark_dirty_ignored_for_unregistered_form(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().form_id("ghost"), cx);
            guard.mark_form_dirty(cx);
            assert!(!DirtyState::is_registered(cx, "ghost"));
            assert!(!guard.is_protected(cx));
        });
    }

    #[gpui::test]
    fn test_unmount_unregisters_form(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("B"), cx);
            guard.mark_form_dirty(cx);
            assert!(DirtyState::should_prevent_navigation(cx));

            guard.unmount(cx);
            assert!(!DirtyState::should_prevent_navigation(cx));
        });
    }

    #[gpui::test]
    fn test_sentinel_follows_protection(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            assert_eq!(cx.history().map(HistoryBackend::is_sentinel), Some(false));

            guard.mark_form_dirty(cx);
            assert_eq!(cx.history().map(HistoryBackend::is_sentinel), Some(true));
            // Syncing again does not stack sentinels.
            guard.sync_protection(cx);
            assert_eq!(cx.history().map(HistoryBackend::can_go_back), Some(true));

            guard.mark_form_clean(cx);
            assert_eq!(cx.history().map(HistoryBackend::is_sentinel), Some(false));
            assert_eq!(path(cx), "/rooms/new");
        });
    }

    #[gpui::test]
    fn test_double_back_press_keeps_one_pending(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);
            let back = NavigationEvent::PopState {
                direction: TraversalDirection::Back,
            };

            let _ = cx.update_history(|history| history.go(-1));
            assert_eq!(guard.handle_event(back.clone(), cx), EventOutcome::Intercepted);
            assert_eq!(cx.history().map(HistoryBackend::is_sentinel), Some(true));

            let _ = cx.update_history(|history| history.go(-1));
            assert_eq!(guard.handle_event(back, cx), EventOutcome::Ignored);
            assert_eq!(
                guard.pending().map(PendingNavigation::vector),
                Some(NavigationVector::History)
            );

            guard.handle_leave(false, cx);
            assert_eq!(path(cx), "/");
        });
    }

    #[gpui::test]
    fn test_forward_traversal_is_neutralized_and_replayed(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);
            let _ = cx.update_history(|history| history.push("/rooms/7".to_string()));

            let forward = NavigationEvent::PopState {
                direction: TraversalDirection::Forward,
            };
            assert_eq!(guard.handle_event(forward, cx), EventOutcome::Intercepted);
            assert_eq!(path(cx), "/rooms/new");

            guard.handle_leave(false, cx);
            assert_eq!(path(cx), "/rooms/7");
        });
    }

    #[gpui::test]
    fn test_aux_mouse_button_back(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);

            let down = NavigationEvent::MouseDown {
                button: TraversalDirection::Back,
                control: 9,
            };
            let up = NavigationEvent::MouseUp {
                button: TraversalDirection::Back,
                control: 9,
            };
            assert_eq!(guard.handle_event(down, cx), EventOutcome::Suppress);
            assert!(!guard.show_modal());
            assert_eq!(guard.handle_event(up, cx), EventOutcome::Intercepted);
            assert_eq!(
                guard.pending().map(PendingNavigation::vector),
                Some(NavigationVector::MouseButton)
            );

            guard.resolve(ModalDecision::leave(), cx);
            assert_eq!(path(cx), "/");
        });
    }

    #[gpui::test]
    fn test_unpaired_mouse_release_is_allowed(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);

            guard.handle_event(
                NavigationEvent::MouseDown {
                    button: TraversalDirection::Back,
                    control: 1,
                },
                cx,
            );
            let outcome = guard.handle_event(
                NavigationEvent::MouseUp {
                    button: TraversalDirection::Back,
                    control: 2,
                },
                cx,
            );
            assert_eq!(outcome, EventOutcome::Allow);
            assert!(!guard.show_modal());
        });
    }

    #[gpui::test]
    fn test_edge_swipe_then_stay(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/profile");
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("me"), cx);
            guard.mark_form_dirty(cx);

            // Mid-screen swipe is not a gesture.
            guard.handle_event(NavigationEvent::TouchStart { x: 200.0, y: 300.0 }, cx);
            assert_eq!(
                guard.handle_event(NavigationEvent::TouchEnd { x: 400.0, y: 300.0 }, cx),
                EventOutcome::Allow
            );

            guard.handle_event(NavigationEvent::TouchStart { x: 3.0, y: 300.0 }, cx);
            assert_eq!(
                guard.handle_event(NavigationEvent::TouchEnd { x: 150.0, y: 310.0 }, cx),
                EventOutcome::Intercepted
            );
            assert_eq!(guard.context(cx), NavigationContext::Profile);

            guard.resolve(ModalDecision::stay(), cx);
            assert_eq!(path(cx), "/profile");
            assert!(DirtyState::should_prevent_navigation(cx));
        });
    }

    #[gpui::test]
    fn test_leave_that_stays_put_rearms_guard(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/cashier/till");
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new().track_form("till").custom_action(|_| {}),
                cx,
            );
            guard.mark_form_dirty(cx);
            assert_eq!(guard.navigate("/reports", cx), EventOutcome::Intercepted);

            guard.handle_leave(false, cx);
            assert!(!guard.is_navigating());
            assert_eq!(path(cx), "/cashier/till");

            DirtyState::register_form(cx, "till");
            guard.mark_form_dirty(cx);
            assert_eq!(cx.history().map(HistoryBackend::is_sentinel), Some(true));
            assert_eq!(guard.navigate("/reports", cx), EventOutcome::Intercepted);
            assert_eq!(path(cx), "/cashier/till");
        });
    }

    #[gpui::test]
    fn test_back_at_history_start_rearms_guard(cx: &mut TestAppContext) {
        cx.update(|cx| {
            init_guard_with(
                cx,
                GuardOptions::new().history(MemoryHistory::starting_at("/rooms/new")),
            );
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);
            assert_eq!(guard.back(cx), EventOutcome::Intercepted);

            guard.handle_leave(false, cx);
            assert!(!guard.is_navigating());
            assert_eq!(path(cx), "/rooms/new");

            DirtyState::register_form(cx, "A");
            guard.mark_form_dirty(cx);
            assert_eq!(guard.back(cx), EventOutcome::Intercepted);
            assert!(guard.show_modal());
        });
    }

    #[gpui::test]
    fn test_default_replay_runs_after_clear(cx: &mut TestAppContext) {
        type Journal = Rc<RefCell<Vec<String>>>;

        struct RecordingStore {
            inner: DirtyStateRegistry,
            journal: Journal,
        }

        impl DirtyStateStore for RecordingStore {
            fn register_form(&mut self, form_id: &str) -> GuardResult<()> {
                self.inner.register_form(form_id)
            }

            fn unregister_form(&mut self, form_id: &str) -> bool {
                self.inner.unregister_form(form_id)
            }

            fn update_form_state(&mut self, form_id: &str, dirty: bool) -> GuardResult<bool> {
                self.inner.update_form_state(form_id, dirty)
            }

            fn is_registered(&self, form_id: &str) -> bool {
                self.inner.is_registered(form_id)
            }

            fn update_booking_state(&mut self, update: BookingUpdate) -> bool {
                self.inner.update_booking_state(update)
            }

            fn update_payment_state(&mut self, update: PaymentUpdate) -> bool {
                self.inner.update_payment_state(update)
            }

            fn should_prevent_navigation(&self) -> bool {
                self.inner.should_prevent_navigation()
            }

            fn navigation_context(&self, current_path: &str) -> NavigationContext {
                self.inner.navigation_context(current_path)
            }

            fn clear_all_states(&mut self) {
                self.journal.borrow_mut().push("clear".to_string());
                self.inner.clear_all_states();
            }
        }

        struct RecordingHistory {
            inner: MemoryHistory,
            journal: Journal,
        }

        impl HistoryBackend for RecordingHistory {
            fn current_path(&self) -> String {
                self.inner.current_path()
            }

            fn push(&mut self, path: String) {
                self.journal.borrow_mut().push(format!("push {}", path));
                self.inner.push(path);
            }

            fn replace(&mut self, path: String) {
                self.journal.borrow_mut().push(format!("replace {}", path));
                self.inner.replace(path);
            }

            fn go(&mut self, delta: isize) -> bool {
                self.journal.borrow_mut().push(format!("go {}", delta));
                self.inner.go(delta)
            }

            fn push_sentinel(&mut self, path: String) {
                self.inner.push_sentinel(path);
            }

            fn is_sentinel(&self) -> bool {
                self.inner.is_sentinel()
            }

            fn can_go_back(&self) -> bool {
                self.inner.can_go_back()
            }

            fn can_go_forward(&self) -> bool {
                self.inner.can_go_forward()
            }
        }

        cx.update(|cx| {
            let journal: Journal = Rc::new(RefCell::new(Vec::new()));
            init_guard_with(
                cx,
                GuardOptions::new()
                    .store(RecordingStore {
                        inner: DirtyStateRegistry::new(),
                        journal: journal.clone(),
                    })
                    .history(RecordingHistory {
                        inner: MemoryHistory::starting_at("/rooms/new"),
                        journal: journal.clone(),
                    }),
            );
            let mut guard =
                NavigationInterceptor::new(InterceptorConfig::new().track_form("A"), cx);
            guard.mark_form_dirty(cx);
            guard.navigate("/other", cx);
            journal.borrow_mut().clear();

            guard.handle_leave(false, cx);
            assert_eq!(
                *journal.borrow(),
                vec!["clear".to_string(), "replace /other".to_string()]
            );
            assert_eq!(path(cx), "/other");
        });
    }

    #[gpui::test]
    fn test_unregistered_form_is_reported(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            assert_eq!(
                ensure_registered(cx, "ghost"),
                Err(GuardError::UnknownForm {
                    form_id: "ghost".to_string()
                })
            );
            DirtyState::register_form(cx, "ghost");
            assert_eq!(ensure_registered(cx, "ghost"), Ok(true));
        });
    }

    #[gpui::test]
    fn test_unload_hook_reports_vector(cx: &mut TestAppContext) {
        cx.update(|cx| {
            setup(cx, "/rooms/new");
            let seen = Rc::new(RefCell::new(Vec::new()));
            let log = seen.clone();
            let mut guard = NavigationInterceptor::new(
                InterceptorConfig::new()
                    .track_form("A")
                    .on_navigation_attempt(move |vector, _| log.borrow_mut().push(vector)),
                cx,
            );
            guard.mark_form_dirty(cx);

            let outcome = guard.handle_event(NavigationEvent::BeforeUnload, cx);
            assert!(matches!(outcome, EventOutcome::Warn(_)));
            assert_eq!(guard.navigate("/", cx), EventOutcome::Intercepted);
            // Unload still warns while the modal is open, without a second pending.
            let outcome = guard.handle_event(NavigationEvent::BeforeUnload, cx);
            assert!(matches!(outcome, EventOutcome::Warn(_)));
            assert_eq!(
                guard.pending().map(PendingNavigation::vector),
                Some(NavigationVector::Programmatic)
            );
            assert_eq!(
                *seen.borrow(),
                vec![
                    NavigationVector::BeforeUnload,
                    NavigationVector::Programmatic,
                    NavigationVector::BeforeUnload
                ]
            );
        });
    }

    #[test]
    fn test_traverse_away_skips_sentinel_and_own_entry() {
        let mut history = MemoryHistory::new();
        history.push("/rooms".to_string());
        history.push("/rooms/new".to_string());
        history.push_sentinel("/rooms/new".to_string());

        traverse_away(&mut history, TraversalDirection::Back, "/rooms/new");
        assert_eq!(history.current_path(), "/rooms");

        // Without a sentinel only one step is taken.
        let mut history = MemoryHistory::new();
        history.push("/rooms/new".to_string());
        traverse_away(&mut history, TraversalDirection::Back, "/rooms/new");
        assert_eq!(history.current_path(), "/");
    }
}
