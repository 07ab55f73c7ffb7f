//! warpdir - named directory bookmarks ("warp points")
//!
//! Modules:
//! - entry: the (name, path) value type
//! - warp_map: ordered in-memory map with shadowing insert, removal and pruning
//! - query: name/path filtering
//! - store: JSON/YAML persistence preserving unrelated document keys
//! - config: map location and confirmation policy
//! - cwd: current-directory providers (in-memory tracker, shell hand-off)
//! - ops: load → mutate → save operations (create, remove, get, repair, resolve)
//! - dispatch: `wd <subcommand-or-name> [name] [path]` grammar
//! - render: table and JSON output
//! - completions: tab completion over sub-commands and warp names
//! - shell_hooks: shell wrapper functions for `cd` hand-off and completion
//! - structured_log: stderr logging

pub mod structured_log;

pub mod config;
pub mod entry;
pub mod error;
pub mod warp_map;
pub mod query;
pub mod store;
pub mod cwd;
pub mod ops;
pub mod dispatch;
pub mod render;
pub mod completions;
pub mod shell_hooks;

// Re-export key types for convenience
pub use config::{ConfirmPolicy, DocumentFormat, WarpConfig};

pub use entry::Entry;

pub use error::{Result, WarpError};

pub use warp_map::{InsertOutcome, WarpMap};

pub use query::WarpQuery;

pub use store::WarpStore;

pub use cwd::{CurrentDirectory, CwdTracker, ShellDirectory};

pub use ops::{AlwaysConfirm, Confirmer, RemovalOutcome, Warp};

pub use dispatch::{dispatch, Command, NamedArgs, Outcome, SubCommand};

pub use completions::{Suggestion, WarpCompleter};

pub use shell_hooks::{ShellHooks, ShellType};
