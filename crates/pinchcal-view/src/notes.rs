#![forbid(unsafe_code)]

//! In-memory per-day notes. Last write wins; nothing survives the process.

use std::collections::BTreeMap;

use crate::calendar::DateKey;

/// Free text keyed by day.
#[derive(Debug, Clone, Default)]
pub struct NotesStore {
    notes: BTreeMap<DateKey, String>,
}

impl NotesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text for `date`, or `""` if none was saved.
    #[must_use]
    pub fn get(&self, date: DateKey) -> &str {
        self.notes.get(&date).map_or("", String::as_str)
    }

    /// Store `text` for `date`. Empty text removes the entry.
    pub fn save(&mut self, date: DateKey, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.notes.remove(&date);
        } else {
            self.notes.insert(date, text);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Days with notes, in date order.
    pub fn dates(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.notes.keys().copied()
    }
}
