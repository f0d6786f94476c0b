//! # GPUI Navigation Guard
//!
//! Keeps users from losing unsaved work by asking before they navigate away.
//!
//! ## Features
//!
//! - App-wide dirty-state registry for forms, the booking wizard and payments
//! - One interceptor per view covering history traversal, auxiliary mouse
//!   buttons, edge swipes, window unload and in-app router calls
//! - Context-aware confirmation text (payment, booking, admin, profile)
//! - Session-scoped "don't ask again"
//! - Internal-flow and sign-out bypass rules
//!
//! ## Quick Start
//!
//! ```ignore
//! use gpui::*;
//! use gpui_navigation_guard::*;
//!
//! fn main() {
//!     Application::new().run(|cx: &mut App| {
//!         init_guard(cx);
//!
//!         let mut guard = NavigationInterceptor::new(
//!             InterceptorConfig::new().track_form("room-edit"),
//!             cx,
//!         );
//!         guard.mark_form_dirty(cx);
//!
//!         // Captured: the modal is shown instead of navigating.
//!         guard.navigate("/rooms", cx);
//!
//!         // The dialog reports back.
//!         guard.resolve(ModalDecision::leave(), cx);
//!     });
//! }
//! ```
//!
//! ## Host integration
//!
//! The guard draws nothing and owns no platform handles. Hosts:
//!
//! - install a [`HistoryBackend`] and optionally a [`SessionStorage`] through
//!   [`init_guard_with`];
//! - translate platform input into [`NavigationEvent`]s and honour the
//!   returned [`EventOutcome`];
//! - render a confirmation dialog from [`ModalProps`] and report a
//!   [`ModalDecision`].
//!
//! ## Logging
//!
//! Enable the `log` (default) or `tracing` feature to get diagnostics under
//! the `navigation_guard` target.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;

pub mod context;
pub mod error;
pub mod history;
pub mod interceptor;
pub mod modal;
pub mod paths;
pub mod registry;
pub mod session;
pub mod vector;

pub use context::{
    current_path, init_guard, init_guard_with, DirtyState, GlobalDirtyState, GlobalHistory,
    GlobalSessionOverride, GuardOptions, UseNavigationGuard,
};
pub use error::{GuardError, GuardResult};
pub use history::{HistoryBackend, HistoryEntry, MemoryHistory};
pub use interceptor::{
    CustomActionFn, InterceptorConfig, NavigationAttemptFn, NavigationInterceptor,
    PendingNavigation, PreventPredicateFn,
};
pub use modal::{ModalDecision, ModalProps};
pub use registry::{
    BookingProgress, BookingUpdate, DirtyStateRegistry, DirtyStateStore, NavigationContext,
    PaymentProgress, PaymentUpdate,
};
pub use session::{MemorySessionStorage, SessionOverride, SessionStorage, SESSION_OVERRIDE_KEY};
pub use vector::{
    AuxButtonTracker, ControlId, EventOutcome, NavigationEvent, NavigationVector, RouterAction,
    SwipeConfig, SwipeTracker, TraversalDirection, VectorCapability,
};
