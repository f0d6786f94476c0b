//! Session history model.
//!
//! The guard never talks to a platform history API directly. It goes through
//! [`HistoryBackend`], which a host implements over whatever it has (a
//! browser `History` object, a desktop navigator). [`MemoryHistory`] is the
//! in-process implementation: an entry stack plus a cursor, with support for
//! *sentinel* entries.
//!
//! A sentinel is an entry that carries the guarded view's own path. While
//! protection is active one sentinel sits on top of the real entry, so a
//! back press only moves from the sentinel onto the identical real entry.
//! Nothing visible changes, and the guard gets a chance to ask first.
//!
//! ```text
//!   [ /rooms, /booking/step2, /booking/step2* ]      * = sentinel
//!                                     ^ cursor
//! ```

use crate::trace_log;

/// Host seam for the session history stack.
///
/// Entries ahead of the cursor can only be dropped by a push, as with a
/// browser history. When protection lapses the guard steps back off its
/// sentinel, which then lingers as a forward entry carrying the same path
/// until the next push or re-arm truncates it. A forward press in between
/// lands on that copy and shows no change.
pub trait HistoryBackend: 'static {
    /// Path of the entry under the cursor.
    fn current_path(&self) -> String;

    /// Push a new entry, dropping any forward entries.
    fn push(&mut self, path: String);

    /// Replace the entry under the cursor.
    fn replace(&mut self, path: String);

    /// Move the cursor by `delta` entries. Returns `false` if the cursor
    /// could not move at all.
    fn go(&mut self, delta: isize) -> bool;

    /// Push a sentinel entry for `path`.
    fn push_sentinel(&mut self, path: String);

    /// Whether the entry under the cursor is a sentinel.
    fn is_sentinel(&self) -> bool;

    /// Whether there is an entry behind the cursor.
    fn can_go_back(&self) -> bool;

    /// Whether there is an entry ahead of the cursor.
    fn can_go_forward(&self) -> bool;
}

/// One entry in [`MemoryHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Path of the entry.
    pub path: String,
    /// Whether the entry was pushed as a sentinel.
    pub sentinel: bool,
}

impl HistoryEntry {
    fn page(path: String) -> Self {
        Self {
            path,
            sentinel: false,
        }
    }
}

/// In-memory session history.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl MemoryHistory {
    /// Create a history with a single root entry (`/`).
    pub fn new() -> Self {
        Self::starting_at("/")
    }

    /// Create a history with a single entry at `path`.
    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry::page(path.into())],
            cursor: 0,
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Index of the entry under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of sentinel entries anywhere in the stack.
    pub fn sentinel_count(&self) -> usize {
        self.entries.iter().filter(|e| e.sentinel).count()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor += 1;
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryBackend for MemoryHistory {
    fn current_path(&self) -> String {
        self.entries[self.cursor].path.clone()
    }

    fn push(&mut self, path: String) {
        trace_log!("history push '{}'", path);
        self.push_entry(HistoryEntry::page(path));
    }

    fn replace(&mut self, path: String) {
        trace_log!("history replace '{}'", path);
        self.entries[self.cursor] = HistoryEntry::page(path);
    }

    fn go(&mut self, delta: isize) -> bool {
        let last = self.entries.len() - 1;
        let target = self.cursor.saturating_add_signed(delta).min(last);
        trace_log!("history go({}) {} -> {}", delta, self.cursor, target);
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    fn push_sentinel(&mut self, path: String) {
        trace_log!("history push sentinel '{}'", path);
        self.push_entry(HistoryEntry {
            path,
            sentinel: true,
        });
    }

    fn is_sentinel(&self) -> bool {
        self.entries[self.cursor].sentinel
    }

    fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    fn can_go_forward(&self) -> bool {
        self.cursor < self.entries.len() - 1
    }
}
