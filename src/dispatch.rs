//! Compact command grammar: `wd <subcommand-or-name> [name] [path]`
//!
//! The first positional token is looked up in a closed alias table. If it
//! is not a sub-command it is taken as a warp name to navigate to. Named
//! arguments (`--name`, `--path`) win over the positional slot they
//! correspond to.

use crate::cwd::CurrentDirectory;
use crate::entry::Entry;
use crate::error::{Result, WarpError};
use crate::ops::{RemovalOutcome, Warp};
use crate::query::WarpQuery;
use crate::warp_map::InsertOutcome;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubCommand {
    Create,
    Remove,
    List,
    Show,
    Repair,
    Help,
}

/// Every accepted token and the sub-command it selects
pub const ALIASES: &[(&str, SubCommand)] = &[
    ("add", SubCommand::Create),
    ("new", SubCommand::Create),
    ("create", SubCommand::Create),
    ("rm", SubCommand::Remove),
    ("del", SubCommand::Remove),
    ("remove", SubCommand::Remove),
    ("ls", SubCommand::List),
    ("list", SubCommand::List),
    ("show", SubCommand::Show),
    ("clean", SubCommand::Repair),
    ("repair", SubCommand::Repair),
    ("help", SubCommand::Help),
];

impl SubCommand {
    /// Case-insensitive alias lookup
    pub fn parse(token: &str) -> Option<Self> {
        let lower = token.to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, cmd)| *cmd)
    }

    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        ALIASES
            .iter()
            .filter(move |(_, cmd)| *cmd == self)
            .map(|(alias, _)| *alias)
    }

    pub fn description(self) -> &'static str {
        match self {
            SubCommand::Create => "bind a name to a directory (default: current)",
            SubCommand::Remove => "remove a name, or every name for the current directory",
            SubCommand::List => "list warp points, optionally filtered by name and path",
            SubCommand::Show => "show a warp point, or the names for the current directory",
            SubCommand::Repair => "remove warp points whose directory is gone",
            SubCommand::Help => "show this message",
        }
    }

    fn usage(self) -> &'static str {
        match self {
            SubCommand::Create => "add <name> [path]",
            SubCommand::Remove => "rm [name]",
            SubCommand::List => "ls [name] [path]",
            SubCommand::Show => "show [name]",
            SubCommand::Repair => "clean",
            SubCommand::Help => "help",
        }
    }

    const ALL: [SubCommand; 6] = [
        SubCommand::Create,
        SubCommand::Remove,
        SubCommand::List,
        SubCommand::Show,
        SubCommand::Repair,
        SubCommand::Help,
    ];
}

/// Short usage text built from the alias table
pub fn usage() -> String {
    let mut out = String::from("usage: wd <name>               jump to a warp point\n");
    for cmd in SubCommand::ALL {
        let aliases: Vec<_> = cmd.aliases().collect();
        out.push_str(&format!(
            "       wd {:<20} {} [{}]\n",
            cmd.usage(),
            cmd.description(),
            aliases.join(", ")
        ));
    }
    out
}

/// Arguments passed by name rather than position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedArgs {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    /// Report what a remove or repair would do without writing
    pub what_if: bool,
}

/// A fully resolved invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Navigate { name: String },
    Create { name: String, path: PathBuf },
    Remove { name: Option<String>, what_if: bool },
    List { query: WarpQuery },
    Show { name: Option<String> },
    Repair { what_if: bool },
    Help,
}

/// What an executed command produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Navigated(Entry),
    Created(InsertOutcome),
    Removed(RemovalOutcome),
    Listed(Vec<Entry>),
    Repaired(RemovalOutcome),
    Help(String),
}

/// Bind positionals, in order, to the parameters not already supplied by
/// name. A positional left over once every parameter is bound is an error.
fn bind<'a, const N: usize>(
    cmd: &str,
    named: [bool; N],
    positional: &'a [String],
) -> Result<[Option<&'a String>; N]> {
    let mut rest = positional.iter();
    let mut bound = [None; N];
    for (slot, by_name) in bound.iter_mut().zip(named) {
        if !by_name {
            *slot = rest.next();
        }
    }

    let extra: Vec<&str> = rest.map(String::as_str).collect();
    if !extra.is_empty() {
        return Err(WarpError::Usage(format!(
            "unexpected argument for '{}': {}",
            cmd,
            extra.join(" ")
        )));
    }
    Ok(bound)
}

/// Map raw tokens and named arguments onto exactly one command
pub fn resolve(tokens: &[String], named: &NamedArgs) -> Result<Command> {
    let has_name = named.name.is_some();
    let name_or = |bound: Option<&String>| named.name.clone().or_else(|| bound.cloned());

    let Some((first, rest)) = tokens.split_first() else {
        return Ok(match &named.name {
            Some(name) => Command::Navigate { name: name.clone() },
            None => Command::Help,
        });
    };

    let Some(sub) = SubCommand::parse(first) else {
        // The unknown token is itself the positional name
        let [name] = bind("navigate", [has_name], tokens)?;
        let name = name_or(name).unwrap_or_else(|| first.clone());
        return Ok(Command::Navigate { name });
    };

    match sub {
        SubCommand::Create => {
            let [name, path] = bind(first, [has_name, named.path.is_some()], rest)?;
            let name = name_or(name)
                .ok_or_else(|| WarpError::Usage(format!("'{}' needs a warp name", first)))?;
            let path = named
                .path
                .clone()
                .or_else(|| path.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."));
            Ok(Command::Create { name, path })
        }
        SubCommand::Remove => {
            let [name] = bind(first, [has_name], rest)?;
            Ok(Command::Remove {
                name: name_or(name),
                what_if: named.what_if,
            })
        }
        SubCommand::List => {
            let [name, path] = bind(first, [has_name, named.path.is_some()], rest)?;
            Ok(Command::List {
                query: WarpQuery {
                    name: name_or(name),
                    path: named.path.clone().or_else(|| path.map(PathBuf::from)),
                },
            })
        }
        SubCommand::Show => {
            let [name] = bind(first, [has_name], rest)?;
            Ok(Command::Show {
                name: name_or(name),
            })
        }
        SubCommand::Repair => {
            bind(first, [], rest)?;
            Ok(Command::Repair {
                what_if: named.what_if,
            })
        }
        SubCommand::Help => Ok(Command::Help),
    }
}

/// Run one resolved command against `warp`
pub fn execute<D: CurrentDirectory>(command: Command, warp: &mut Warp<D>) -> Result<Outcome> {
    match command {
        Command::Navigate { name } => warp.resolve(&name).map(Outcome::Navigated),
        Command::Create { name, path } => warp.create(&name, &path).map(Outcome::Created),
        Command::Remove { name, what_if } => {
            warp.remove(name.as_deref(), what_if).map(Outcome::Removed)
        }
        Command::List { query } => warp.get(&query).map(Outcome::Listed),
        Command::Show { name: Some(name) } => {
            warp.get(&WarpQuery::by_name(name)).map(Outcome::Listed)
        }
        Command::Show { name: None } => warp.names_for_current_directory().map(Outcome::Listed),
        Command::Repair { what_if } => warp.repair(what_if).map(Outcome::Repaired),
        Command::Help => Ok(Outcome::Help(usage())),
    }
}

/// Resolve and execute in one step
pub fn dispatch<D: CurrentDirectory>(
    tokens: &[String],
    named: &NamedArgs,
    warp: &mut Warp<D>,
) -> Result<Outcome> {
    let command = resolve(tokens, named)?;
    crate::slog_debug!("DISPATCH", "resolved", serde_json::json!(format!("{:?}", command)));
    execute(command, warp)
}
