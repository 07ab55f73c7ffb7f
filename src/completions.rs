//! Tab completion for the `wd` command line
//!
//! Suggestions come from the sub-command alias table and from warp names
//! returned by a listing; nothing here reads the store directly.

use crate::dispatch::{SubCommand, ALIASES};
use crate::entry::Entry;
use serde::{Deserialize, Serialize};
use std::fs;

/// A suggestion returned by the completion engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The completion text
    pub name: String,
    pub description: Option<String>,
    pub icon: SuggestionIcon,
    /// Priority (higher = shown first)
    pub priority: i32,
    /// Whether to insert a space after completion. Only folder candidates
    /// leave it off, and they always end in `/`, which is what the shell
    /// wrappers key on since `wd --complete` prints bare names.
    pub insert_space: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionIcon {
    Subcommand,
    Warp,
    Folder,
}

/// Completion engine over a snapshot of warp entries
pub struct WarpCompleter {
    /// Distinct names with the path each currently resolves to
    warps: Vec<(String, String)>,
}

impl WarpCompleter {
    /// Build from a full listing; shadowed duplicates are suggested once
    pub fn new(entries: &[Entry]) -> Self {
        let mut warps: Vec<(String, String)> = Vec::new();
        for e in entries {
            if !warps.iter().any(|(n, _)| *n == e.name) {
                warps.push((e.name.clone(), e.path.display().to_string()));
            }
        }
        Self { warps }
    }

    /// Suggestions for `line` with the cursor at byte offset `cursor`.
    /// The first word of `line` is the command itself (`wd`).
    pub fn complete(&self, line: &str, cursor: usize) -> Vec<Suggestion> {
        let mut end = cursor.min(line.len());
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        let line_to_cursor = &line[..end];
        let parts: Vec<&str> = line_to_cursor.split_whitespace().collect();
        let is_completing_word = !line_to_cursor.is_empty() && !line_to_cursor.ends_with(' ');

        // Words after the command, and the prefix being typed
        let args: &[&str] = parts.get(1..).unwrap_or(&[]);
        let (done, prefix) = if is_completing_word && !args.is_empty() {
            (&args[..args.len() - 1], args[args.len() - 1])
        } else if is_completing_word {
            // Still typing the command name itself
            return vec![];
        } else {
            (args, "")
        };

        let mut suggestions = match done {
            [] => {
                let mut s = self.complete_subcommands(prefix);
                s.extend(self.complete_warps(prefix));
                s
            }
            [first] => match SubCommand::parse(first) {
                Some(SubCommand::Remove) | Some(SubCommand::Show) | Some(SubCommand::List) => {
                    self.complete_warps(prefix)
                }
                _ => vec![],
            },
            [first, _name] => match SubCommand::parse(first) {
                Some(SubCommand::Create) => self.complete_folders(prefix),
                _ => vec![],
            },
            _ => vec![],
        };

        suggestions.sort_by(|a, b| b.priority.cmp(&a.priority));
        suggestions
    }

    fn complete_subcommands(&self, prefix: &str) -> Vec<Suggestion> {
        let prefix = prefix.to_lowercase();
        ALIASES
            .iter()
            .filter(|(alias, _)| alias.starts_with(&prefix))
            .map(|(alias, cmd)| Suggestion {
                name: alias.to_string(),
                description: Some(cmd.description().to_string()),
                icon: SuggestionIcon::Subcommand,
                priority: 90,
                insert_space: true,
            })
            .collect()
    }

    fn complete_warps(&self, prefix: &str) -> Vec<Suggestion> {
        self.warps
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, path)| Suggestion {
                name: name.clone(),
                description: Some(path.clone()),
                icon: SuggestionIcon::Warp,
                priority: 80,
                insert_space: true,
            })
            .collect()
    }

    /// Directory paths only
    fn complete_folders(&self, prefix: &str) -> Vec<Suggestion> {
        let mut suggestions = vec![];
        let (dir, file_prefix) = match prefix.rfind('/') {
            Some(idx) => (&prefix[..=idx], &prefix[idx + 1..]),
            None => ("./", prefix),
        };

        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                if !name.starts_with(file_prefix) || !entry.path().is_dir() {
                    continue;
                }
                let full_path = if dir == "./" && !prefix.starts_with("./") {
                    name
                } else {
                    format!("{}{}", dir, name)
                };

                suggestions.push(Suggestion {
                    name: format!("{}/", full_path),
                    description: None,
                    icon: SuggestionIcon::Folder,
                    priority: 50,
                    insert_space: false,
                });
            }
        }

        suggestions.sort_by(|a, b| a.name.cmp(&b.name));
        suggestions
    }
}
