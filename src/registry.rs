//! Dirty-state registry.
//!
//! One registry lives for the whole app session and is shared by every
//! guarded view. It records three kinds of unsaved work:
//!
//! - per-form dirty flags, keyed by a caller-assigned form id;
//! - booking wizard progress ([`BookingProgress`]);
//! - payment progress ([`PaymentProgress`]).
//!
//! [`DirtyStateStore::should_prevent_navigation`] folds all three into the
//! aggregate predicate the interceptor consults on every navigation event.
//! It is computed from the current contents on each call and never cached.
//!
//! The store is a trait so an app (or a test) can install its own
//! implementation with [`init_guard_with`](crate::init_guard_with).
//! [`DirtyStateRegistry`] is the default.
//!
//! # Example
//!
//! ```
//! use gpui_navigation_guard::{BookingUpdate, DirtyStateRegistry, DirtyStateStore, NavigationContext};
//!
//! let mut registry = DirtyStateRegistry::new();
//! registry.register_form("guest-details").unwrap();
//! assert!(!registry.should_prevent_navigation());
//!
//! registry.update_form_state("guest-details", true).unwrap();
//! assert!(registry.should_prevent_navigation());
//! assert_eq!(registry.navigation_context("/profile/edit"), NavigationContext::Profile);
//!
//! registry.update_booking_state(BookingUpdate::new().active(true).step(2).has_data(true));
//! assert_eq!(registry.navigation_context("/profile/edit"), NavigationContext::Booking);
//!
//! registry.clear_all_states();
//! assert!(!registry.should_prevent_navigation());
//! ```

use crate::error::{GuardError, GuardResult};
use crate::paths::{matches_any, ADMIN_PREFIXES, PROFILE_PREFIXES};
use crate::{debug_log, trace_log};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// NavigationContext
// ============================================================================

/// What kind of unsaved work a confirmation prompt is about.
///
/// Drives the default title and message shown by the confirmation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NavigationContext {
    /// A payment is in flight.
    Payment,
    /// The booking wizard has entered data.
    Booking,
    /// A dirty form on an admin or cashier page.
    Admin,
    /// A dirty form on a profile page.
    Profile,
    /// Any other dirty form.
    Form,
    /// Nothing specific.
    #[default]
    Default,
}

impl NavigationContext {
    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payment => "payment",
            Self::Booking => "booking",
            Self::Admin => "admin",
            Self::Profile => "profile",
            Self::Form => "form",
            Self::Default => "default",
        }
    }

    /// Default modal title.
    pub fn default_title(self) -> &'static str {
        match self {
            Self::Payment => "Payment in progress",
            Self::Booking => "Booking not finished",
            Self::Admin | Self::Form => "Unsaved changes",
            Self::Profile => "Unsaved profile changes",
            Self::Default => "Leave this page?",
        }
    }

    /// Default modal body.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Payment => {
                "A payment is being processed. Leaving now may interrupt it and your booking may not be confirmed."
            }
            Self::Booking => {
                "You have an unfinished booking. If you leave, the details you entered will be lost."
            }
            Self::Admin => "You have unsaved changes in this form. Leave without saving?",
            Self::Profile => "Your profile changes have not been saved. Leave without saving?",
            Self::Form => "You have unsaved changes. Are you sure you want to leave this page?",
            Self::Default => "Are you sure you want to leave this page?",
        }
    }
}

impl fmt::Display for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Progress records
// ============================================================================

/// Progress of the multi-step booking wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingProgress {
    /// Whether the wizard is open.
    pub is_active: bool,
    /// Current step, starting at 1. `0` when inactive.
    pub step: u32,
    /// Whether any wizard field holds data. Computed by the caller.
    pub has_data: bool,
}

/// Progress of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentProgress {
    /// Whether a payment is in flight.
    pub is_active: bool,
    /// Opaque payment reference, if one has been issued.
    pub reference: Option<String>,
}

/// Partial update for [`BookingProgress`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingUpdate {
    pub is_active: Option<bool>,
    pub step: Option<u32>,
    pub has_data: Option<bool>,
}

impl BookingUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    #[must_use]
    pub fn has_data(mut self, has_data: bool) -> Self {
        self.has_data = Some(has_data);
        self
    }
}

/// Partial update for [`PaymentProgress`]. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentUpdate {
    pub is_active: Option<bool>,
    /// `Some(None)` clears the reference.
    pub reference: Option<Option<String>>,
}

impl PaymentUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(Some(reference.into()));
        self
    }

    #[must_use]
    pub fn clear_reference(mut self) -> Self {
        self.reference = Some(None);
        self
    }
}

/// Assign `value` into `slot` when present and different. Returns whether
/// anything changed.
fn merge_field<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

// ============================================================================
// DirtyStateStore trait
// ============================================================================

/// Shared store of unsaved-work signals.
///
/// Mutators report whether anything actually changed so callers can skip
/// redundant refreshes.
pub trait DirtyStateStore: 'static {
    /// Add a clean entry for `form_id`. Re-registering resets the entry.
    fn register_form(&mut self, form_id: &str) -> GuardResult<()>;

    /// Remove the entry for `form_id`. Returns whether it existed.
    fn unregister_form(&mut self, form_id: &str) -> bool;

    /// Upsert the dirty flag for `form_id`. Returns whether it changed.
    fn update_form_state(&mut self, form_id: &str, dirty: bool) -> GuardResult<bool>;

    /// Whether `form_id` has an entry.
    fn is_registered(&self, form_id: &str) -> bool;

    /// Shallow-merge booking progress. Returns whether it changed.
    fn update_booking_state(&mut self, update: BookingUpdate) -> bool;

    /// Shallow-merge payment progress. Returns whether it changed.
    fn update_payment_state(&mut self, update: PaymentUpdate) -> bool;

    /// The aggregate predicate: any dirty form, an active booking with data,
    /// or an active payment.
    fn should_prevent_navigation(&self) -> bool;

    /// Classify the unsaved work for the prompt. `current_path` refines a
    /// dirty-form context into admin or profile.
    fn navigation_context(&self, current_path: &str) -> NavigationContext;

    /// Drop every form entry and reset booking and payment to inactive.
    fn clear_all_states(&mut self);
}

// ============================================================================
// DirtyStateRegistry
// ============================================================================

/// Default [`DirtyStateStore`] implementation.
#[derive(Debug, Clone, Default)]
pub struct DirtyStateRegistry {
    forms: HashMap<String, bool>,
    booking: BookingProgress,
    payment: PaymentProgress,
    revision: u64,
}

impl DirtyStateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dirty flag of `form_id`, if registered.
    pub fn is_form_dirty(&self, form_id: &str) -> Option<bool> {
        self.forms.get(form_id).copied()
    }

    /// Ids of all dirty forms, sorted.
    pub fn dirty_forms(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .forms
            .iter()
            .filter(|(_, dirty)| **dirty)
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered forms.
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Current booking progress.
    pub fn booking(&self) -> &BookingProgress {
        &self.booking
    }

    /// Current payment progress.
    pub fn payment(&self) -> &PaymentProgress {
        &self.payment
    }

    /// Counter bumped on every effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Enter the booking wizard at `step`.
    pub fn start_booking(&mut self, step: u32) -> bool {
        self.update_booking_state(BookingUpdate::new().active(true).step(step))
    }

    /// Leave the booking wizard after it completed.
    pub fn complete_booking(&mut self) -> bool {
        self.update_booking_state(BookingUpdate::new().active(false).step(0).has_data(false))
    }

    /// Mark a payment as in flight.
    pub fn start_payment(&mut self, reference: Option<String>) -> bool {
        let update = PaymentUpdate {
            is_active: Some(true),
            reference: Some(reference),
        };
        self.update_payment_state(update)
    }

    /// Mark the payment as finished.
    pub fn complete_payment(&mut self) -> bool {
        self.update_payment_state(PaymentUpdate::new().active(false).clear_reference())
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

fn validate_form_id(form_id: &str) -> GuardResult<()> {
    if form_id.trim().is_empty() {
        Err(GuardError::InvalidFormId)
    } else {
        Ok(())
    }
}

impl DirtyStateStore for DirtyStateRegistry {
    fn register_form(&mut self, form_id: &str) -> GuardResult<()> {
        validate_form_id(form_id)?;
        debug_log!("Registering form '{}'", form_id);
        self.forms.insert(form_id.to_string(), false);
        self.bump();
        Ok(())
    }

    fn unregister_form(&mut self, form_id: &str) -> bool {
        let removed = self.forms.remove(form_id).is_some();
        if removed {
            debug_log!("Unregistered form '{}'", form_id);
            self.bump();
        }
        removed
    }

    fn update_form_state(&mut self, form_id: &str, dirty: bool) -> GuardResult<bool> {
        validate_form_id(form_id)?;
        if self.forms.get(form_id) == Some(&dirty) {
            trace_log!("Form '{}' already dirty={}", form_id, dirty);
            return Ok(false);
        }
        debug_log!("Form '{}' dirty={}", form_id, dirty);
        self.forms.insert(form_id.to_string(), dirty);
        self.bump();
        Ok(true)
    }

    fn is_registered(&self, form_id: &str) -> bool {
        self.forms.contains_key(form_id)
    }

    fn update_booking_state(&mut self, update: BookingUpdate) -> bool {
        // Non-short-circuiting `|` so every field is merged.
        let changed = merge_field(&mut self.booking.is_active, update.is_active)
            | merge_field(&mut self.booking.step, update.step)
            | merge_field(&mut self.booking.has_data, update.has_data);
        if changed {
            debug_log!("Booking progress now {:?}", self.booking);
            self.bump();
        }
        changed
    }

    fn update_payment_state(&mut self, update: PaymentUpdate) -> bool {
        let changed = merge_field(&mut self.payment.is_active, update.is_active)
            | merge_field(&mut self.payment.reference, update.reference);
        if changed {
            debug_log!("Payment progress now {:?}", self.payment);
            self.bump();
        }
        changed
    }

    fn should_prevent_navigation(&self) -> bool {
        self.forms.values().any(|dirty| *dirty)
            || (self.booking.is_active && self.booking.has_data)
            || self.payment.is_active
    }

    fn navigation_context(&self, current_path: &str) -> NavigationContext {
        if self.payment.is_active {
            NavigationContext::Payment
        } else if self.booking.is_active && self.booking.has_data {
            NavigationContext::Booking
        } else if self.forms.values().any(|dirty| *dirty) {
            if matches_any(current_path, ADMIN_PREFIXES) {
                NavigationContext::Admin
            } else if matches_any(current_path, PROFILE_PREFIXES) {
                NavigationContext::Profile
            } else {
                NavigationContext::Form
            }
        } else {
            NavigationContext::Default
        }
    }

    fn clear_all_states(&mut self) {
        debug_log!(
            "Clearing dirty state ({} forms, booking active: {}, payment active: {})",
            self.forms.len(),
            self.booking.is_active,
            self.payment.is_active
        );
        self.forms.clear();
        self.booking = BookingProgress::default();
        self.payment = PaymentProgress::default();
        self.bump();
    }
}

// ============================================================================
// Tests
// ============================================================================
