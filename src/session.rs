//! Session-scoped "don't ask again" override.
//!
//! When the user ticks "don't ask again" in the confirmation modal, the
//! guard stops prompting for every view until the session ends. The flag is
//! a single string value under [`SESSION_OVERRIDE_KEY`] in a
//! [`SessionStorage`], mirroring a browser's `sessionStorage`: it dies with
//! the tab and is never written anywhere durable.
//!
//! Storage can fail (a browser throws on quota or in private mode), so each
//! seam method returns a [`GuardResult`]. [`SessionOverride`] logs those
//! failures and reads the flag as unset.

use crate::error::{fail_open, GuardError, GuardResult};
use crate::{error_log, info_log};
use std::collections::HashMap;

/// Storage key of the override flag.
pub const SESSION_OVERRIDE_KEY: &str = "navigation-guard.dont-ask-again";

const SET_VALUE: &str = "true";

/// Host seam for a session-scoped key/value store.
pub trait SessionStorage: 'static {
    /// Read `key`.
    fn get_item(&self, key: &str) -> GuardResult<Option<String>>;

    /// Write `key`.
    fn set_item(&mut self, key: &str, value: &str) -> GuardResult<()>;

    /// Delete `key`.
    fn remove_item(&mut self, key: &str) -> GuardResult<()>;
}

/// In-memory [`SessionStorage`]. Lives as long as the app does.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    items: HashMap<String, String>,
}

impl MemorySessionStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> GuardResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> GuardResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> GuardResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// The "never ask again this session" flag.
pub struct SessionOverride {
    storage: Box<dyn SessionStorage>,
}

impl SessionOverride {
    /// Back the flag with an in-memory store.
    pub fn new() -> Self {
        Self::with_storage(MemorySessionStorage::new())
    }

    /// Back the flag with a host-provided store.
    pub fn with_storage(storage: impl SessionStorage) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Whether prompting is disabled for the rest of the session.
    ///
    /// A storage failure reads as unset.
    pub fn is_set(&self) -> bool {
        let read = self
            .storage
            .get_item(SESSION_OVERRIDE_KEY)
            .map(|value| value.as_deref() == Some(SET_VALUE));
        fail_open(read, "Reading session override", false)
    }

    /// Disable prompting for the rest of the session.
    pub fn set(&mut self) {
        match self.storage.set_item(SESSION_OVERRIDE_KEY, SET_VALUE) {
            Ok(()) => {
                info_log!("Navigation prompts disabled for this session");
            }
            Err(err) => log_storage_error("set", &err),
        }
    }

    /// Re-enable prompting.
    pub fn clear(&mut self) {
        if let Err(err) = self.storage.remove_item(SESSION_OVERRIDE_KEY) {
            log_storage_error("clear", &err);
        }
    }
}

impl Default for SessionOverride {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOverride")
            .field("is_set", &self.is_set())
            .finish_non_exhaustive()
    }
}

fn log_storage_error(operation: &str, err: &GuardError) {
    error_log!("Could not {} session override: {}", operation, err);
}
