//! In-memory warp map: an ordered sequence of entries
//!
//! Order matters. Lookups by name resolve to the first entry in document
//! order, so a newer binding for an existing name is inserted in front of
//! the one it shadows rather than replacing it.

use crate::entry::Entry;
use serde::Serialize;
use std::path::Path;

/// Result of inserting a binding into the map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InsertOutcome {
    /// Name was unbound; the entry was appended
    Appended { entry: Entry },
    /// Name was bound elsewhere; the entry now shadows `shadowed`
    Shadowed { entry: Entry, shadowed: Entry },
    /// The first binding for the name already points at this path
    Unchanged { entry: Entry },
}

impl InsertOutcome {
    pub fn entry(&self) -> &Entry {
        match self {
            InsertOutcome::Appended { entry }
            | InsertOutcome::Shadowed { entry, .. }
            | InsertOutcome::Unchanged { entry } => entry,
        }
    }

    pub fn modified(&self) -> bool {
        !matches!(self, InsertOutcome::Unchanged { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarpMap {
    entries: Vec<Entry>,
}

impl WarpMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries bound to `name`, in store order
    pub fn find_by_name(&self, name: &str) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.name == name).collect()
    }

    /// The binding that navigation resolves `name` to
    pub fn find_first_by_name(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// All entries pointing at `path`, in store order
    pub fn find_by_path(&self, path: &Path) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.points_to(path)).collect()
    }

    /// Insert `entry`, shadowing any existing binding for its name.
    ///
    /// The caller is responsible for canonicalizing `entry.path` first;
    /// comparison against the existing binding is literal.
    pub fn insert(&mut self, entry: Entry) -> InsertOutcome {
        let existing = self.entries.iter().position(|e| e.name == entry.name);

        match existing {
            None => {
                self.entries.push(entry.clone());
                InsertOutcome::Appended { entry }
            }
            Some(idx) if self.entries[idx].path == entry.path => InsertOutcome::Unchanged {
                entry: self.entries[idx].clone(),
            },
            Some(idx) => {
                let shadowed = self.entries[idx].clone();
                self.entries.insert(idx, entry.clone());
                InsertOutcome::Shadowed { entry, shadowed }
            }
        }
    }

    /// Remove every entry matching `pred` in one pass, returning them in
    /// their former order.
    pub fn remove_where<F>(&mut self, mut pred: F) -> Vec<Entry>
    where
        F: FnMut(&Entry) -> bool,
    {
        let (removed, kept): (Vec<Entry>, Vec<Entry>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| pred(e));
        self.entries = kept;
        removed
    }

    pub fn remove_name(&mut self, name: &str) -> Vec<Entry> {
        self.remove_where(|e| e.name == name)
    }

    pub fn remove_path(&mut self, path: &Path) -> Vec<Entry> {
        self.remove_where(|e| e.points_to(path))
    }

    /// Entries whose directory no longer exists
    pub fn dangling(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| !e.is_live()).collect()
    }

    pub fn prune_dangling(&mut self) -> Vec<Entry> {
        self.remove_where(|e| !e.is_live())
    }

    /// Distinct names in first-occurrence order
    pub fn names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.name.as_str()))
            .map(|e| e.name.as_str())
            .collect()
    }
}
