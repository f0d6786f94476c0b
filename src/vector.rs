//! Navigation vectors and the events hosts feed into the guard.
//!
//! Five physically different triggers can take the user away from a view.
//! They differ in how much control the host has over them:
//!
//! | Vector | Cancel natively | Shows modal | Replayable |
//! |--------|-----------------|-------------|------------|
//! | [`History`](NavigationVector::History) | no | yes | yes |
//! | [`MouseButton`](NavigationVector::MouseButton) | yes, when paired | yes | yes |
//! | [`TouchSwipe`](NavigationVector::TouchSwipe) | no (inferred) | yes | yes |
//! | [`BeforeUnload`](NavigationVector::BeforeUnload) | no custom UI | no | no |
//! | [`Programmatic`](NavigationVector::Programmatic) | fully | yes | yes |
//!
//! Hosts translate raw input into [`NavigationEvent`] values and hand them to
//! [`NavigationInterceptor::handle_event`](crate::NavigationInterceptor::handle_event),
//! which answers with an [`EventOutcome`] telling the host what to do with
//! the native default.

use gpui::{MouseButton, NavigationDirection};

// ============================================================================
// Vectors
// ============================================================================

/// One of the five triggers that can move the user away from a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationVector {
    /// Session history traversal (back/forward buttons, keyboard shortcuts).
    History,
    /// Auxiliary mouse buttons (side back/forward).
    MouseButton,
    /// Edge swipe gesture on a touch surface.
    TouchSwipe,
    /// Window/tab close or reload.
    BeforeUnload,
    /// In-app navigation through the interceptor's router methods.
    Programmatic,
}

/// What the host can do about a vector natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorCapability {
    /// The native effect can be prevented before it happens.
    pub can_prevent_natively: bool,
    /// A confirmation modal is shown for this vector.
    pub shows_modal: bool,
    /// The intended navigation can be replayed after Leave.
    pub replayable: bool,
}

impl NavigationVector {
    /// Capability table for this vector.
    pub const fn capability(self) -> VectorCapability {
        match self {
            Self::History | Self::TouchSwipe => VectorCapability {
                can_prevent_natively: false,
                shows_modal: true,
                replayable: true,
            },
            Self::MouseButton | Self::Programmatic => VectorCapability {
                can_prevent_natively: true,
                shows_modal: true,
                replayable: true,
            },
            Self::BeforeUnload => VectorCapability {
                can_prevent_natively: false,
                shows_modal: false,
                replayable: false,
            },
        }
    }
}

/// Direction of a history traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalDirection {
    Back,
    Forward,
}

impl From<NavigationDirection> for TraversalDirection {
    fn from(direction: NavigationDirection) -> Self {
        match direction {
            NavigationDirection::Back => Self::Back,
            NavigationDirection::Forward => Self::Forward,
        }
    }
}

/// Map a GPUI mouse button to a traversal direction, if it is one of the
/// auxiliary navigation buttons.
pub fn aux_button(button: MouseButton) -> Option<TraversalDirection> {
    match button {
        MouseButton::Navigate(NavigationDirection::Back) => Some(TraversalDirection::Back),
        MouseButton::Navigate(NavigationDirection::Forward) => Some(TraversalDirection::Forward),
        _ => None,
    }
}

/// Router call requested through the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterAction {
    /// Push a new entry for the path.
    Navigate(String),
    /// Replace the current entry with the path.
    Replace(String),
    /// Go back one page.
    Back,
}

impl RouterAction {
    /// Destination path, when known up front.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Navigate(path) | Self::Replace(path) => Some(path),
            Self::Back => None,
        }
    }
}

/// Identifier of the control a pointer event landed on.
pub type ControlId = u64;

/// Raw navigation input, translated by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// The host's history moved (the browser `popstate`).
    PopState { direction: TraversalDirection },
    /// An auxiliary mouse button went down over `control`.
    MouseDown {
        button: TraversalDirection,
        control: ControlId,
    },
    /// An auxiliary mouse button was released over `control`.
    MouseUp {
        button: TraversalDirection,
        control: ControlId,
    },
    /// A touch began at `(x, y)` in logical pixels.
    TouchStart { x: f32, y: f32 },
    /// The touch ended at `(x, y)`.
    TouchEnd { x: f32, y: f32 },
    /// The touch was cancelled by the platform.
    TouchCancel,
    /// The window is about to close or reload.
    BeforeUnload,
    /// An in-app router call.
    Programmatic(RouterAction),
}

impl NavigationEvent {
    /// The vector this event belongs to.
    pub fn vector(&self) -> NavigationVector {
        match self {
            Self::PopState { .. } => NavigationVector::History,
            Self::MouseDown { .. } | Self::MouseUp { .. } => NavigationVector::MouseButton,
            Self::TouchStart { .. } | Self::TouchEnd { .. } | Self::TouchCancel => {
                NavigationVector::TouchSwipe
            }
            Self::BeforeUnload => NavigationVector::BeforeUnload,
            Self::Programmatic(_) => NavigationVector::Programmatic,
        }
    }

    /// Translate a GPUI mouse-down. `None` for non-navigation buttons.
    pub fn from_mouse_down(button: MouseButton, control: ControlId) -> Option<Self> {
        aux_button(button).map(|button| Self::MouseDown { button, control })
    }

    /// Translate a GPUI mouse-up. `None` for non-navigation buttons.
    pub fn from_mouse_up(button: MouseButton, control: ControlId) -> Option<Self> {
        aux_button(button).map(|button| Self::MouseUp { button, control })
    }
}

/// What the host should do with the native default of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Let the native effect happen. For programmatic calls the router was
    /// already invoked.
    Allow,
    /// The navigation was captured and the modal is now shown.
    Intercepted,
    /// Prevent the native default; nothing was captured (yet).
    Suppress,
    /// Return this text from the unload handler so the platform shows its
    /// own confirmation.
    Warn(String),
    /// A prompt is already open; the event was dropped.
    Ignored,
}

impl EventOutcome {
    /// Whether the host must call its `preventDefault` equivalent.
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Intercepted | Self::Suppress)
    }
}

// ============================================================================
// Swipe classification
// ============================================================================

/// Thresholds for recognising an edge-swipe back gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// How close to the left edge the touch must start, in logical pixels.
    pub edge_margin: f32,
    /// Minimum rightward travel, in logical pixels.
    pub min_distance: f32,
}

impl SwipeConfig {
    pub const DEFAULT_EDGE_MARGIN: f32 = 30.0;
    pub const DEFAULT_MIN_DISTANCE: f32 = 80.0;

    /// Config with the default thresholds.
    pub fn new() -> Self {
        Self {
            edge_margin: Self::DEFAULT_EDGE_MARGIN,
            min_distance: Self::DEFAULT_MIN_DISTANCE,
        }
    }

    #[must_use]
    pub fn edge_margin(mut self, edge_margin: f32) -> Self {
        self.edge_margin = edge_margin;
        self
    }

    #[must_use]
    pub fn min_distance(mut self, min_distance: f32) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Whether a touch from `start` to `end` is a back gesture.
    pub fn is_back_gesture(&self, start: (f32, f32), end: (f32, f32)) -> bool {
        let dx = end.0 - start.0;
        let dy = end.1 - start.1;
        start.0 <= self.edge_margin && dx > self.min_distance && dx.abs() > dy.abs()
    }
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Remembers where the current touch started.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touch start.
    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish the touch and classify it. A touch without a recorded start
    /// is never a gesture.
    pub fn finish(&mut self, x: f32, y: f32, config: &SwipeConfig) -> bool {
        self.start
            .take()
            .is_some_and(|start| config.is_back_gesture(start, (x, y)))
    }

    /// Forget the current touch.
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

// ============================================================================
// Aux button pairing
// ============================================================================

/// Pairs an auxiliary button press with its release.
///
/// The platform only lets the default be suppressed reliably when both
/// halves land on the same control, so an unpaired release never fires the
/// vector.
#[derive(Debug, Clone, Default)]
pub struct AuxButtonTracker {
    pressed: Option<(TraversalDirection, ControlId)>,
}

impl AuxButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press.
    pub fn press(&mut self, button: TraversalDirection, control: ControlId) {
        self.pressed = Some((button, control));
    }

    /// Record a release. Returns `true` when it completes a press of the
    /// same button on the same control.
    pub fn release(&mut self, button: TraversalDirection, control: ControlId) -> bool {
        self.pressed.take() == Some((button, control))
    }
}
