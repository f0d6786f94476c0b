//! Contract with the confirmation modal.
//!
//! The guard does not render anything. A host dialog reads [`ModalProps`]
//! from [`NavigationInterceptor::modal_props`](crate::NavigationInterceptor::modal_props)
//! each frame and reports the user's choice back as a [`ModalDecision`]
//! through [`NavigationInterceptor::resolve`](crate::NavigationInterceptor::resolve).

use crate::registry::NavigationContext;

/// Everything a confirmation dialog needs to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalProps {
    /// Whether the dialog is visible.
    pub show: bool,
    /// What the unsaved work is.
    pub context: NavigationContext,
    /// Heading text.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// The user's answer to the confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalDecision {
    /// Cancel the navigation and keep editing.
    Stay { dont_ask_again: bool },
    /// Discard unsaved work and continue the navigation.
    Leave { dont_ask_again: bool },
}

impl ModalDecision {
    /// `Stay` without touching the session override.
    pub const fn stay() -> Self {
        Self::Stay {
            dont_ask_again: false,
        }
    }

    /// `Leave` without touching the session override.
    pub const fn leave() -> Self {
        Self::Leave {
            dont_ask_again: false,
        }
    }

    /// Whether the user asked not to be prompted again this session.
    pub const fn dont_ask_again(self) -> bool {
        match self {
            Self::Stay { dont_ask_again } | Self::Leave { dont_ask_again } => dont_ask_again,
        }
    }

    pub const fn is_leave(self) -> bool {
        matches!(self, Self::Leave { .. })
    }
}
