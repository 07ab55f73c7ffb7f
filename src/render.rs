//! Human and JSON rendering of command outcomes

use crate::dispatch::Outcome;
use crate::entry::Entry;
use crate::error::WarpError;
use crate::ops::RemovalOutcome;
use crate::warp_map::InsertOutcome;
use serde_json::{json, Value as JsonValue};

/// Two-column `name  path` table, names padded to the widest one
pub fn table(entries: &[Entry]) -> String {
    let width = entries.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| format!("{:<width$}  {}\n", e.name, e.path.display(), width = width))
        .collect()
}

fn removal_text(action: &str, outcome: &RemovalOutcome) -> String {
    let (lead, entries) = match outcome {
        RemovalOutcome::Removed(e) if e.is_empty() => {
            return format!("{}: nothing to remove\n", action)
        }
        RemovalOutcome::Removed(e) => (format!("{}: removed {}", action, e.len()), e),
        RemovalOutcome::WouldRemove(e) => (format!("{} (what if): would remove {}", action, e.len()), e),
        RemovalOutcome::Declined(e) => (format!("{}: declined, kept {}", action, e.len()), e),
    };
    format!("{}\n{}", lead, table(entries))
}

/// Text printed to stdout for a successful command
pub fn human(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Navigated(entry) => format!("{}\n", entry.path.display()),
        Outcome::Created(InsertOutcome::Appended { entry }) => {
            format!("created {} -> {}\n", entry.name, entry.path.display())
        }
        Outcome::Created(InsertOutcome::Shadowed { entry, shadowed }) => format!(
            "created {} -> {} (shadows {})\n",
            entry.name,
            entry.path.display(),
            shadowed.path.display()
        ),
        Outcome::Created(InsertOutcome::Unchanged { entry }) => format!(
            "unchanged: {} already points to {}\n",
            entry.name,
            entry.path.display()
        ),
        Outcome::Removed(r) => removal_text("remove", r),
        Outcome::Repaired(r) => removal_text("repair", r),
        Outcome::Listed(entries) => table(entries),
        Outcome::Help(text) => text.clone(),
    }
}

/// JSON value printed to stdout for a successful command
pub fn to_json(outcome: &Outcome) -> JsonValue {
    match outcome {
        Outcome::Navigated(entry) => json!(entry),
        Outcome::Created(c) => json!(c),
        Outcome::Removed(r) | Outcome::Repaired(r) => json!(r),
        Outcome::Listed(entries) => json!(entries),
        Outcome::Help(text) => json!({ "usage": text }),
    }
}

/// JSON error object printed to stderr
pub fn error_json(err: &WarpError) -> JsonValue {
    json!({ "error": err.kind(), "message": err.to_string() })
}
