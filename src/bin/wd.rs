/*!
 * wd - warp to bookmarked directories
 *
 * `wd <name>` jumps to a warp point, `wd add <name> [path]` creates one.
 * Run `wd help` for the full sub-command list, and `wd --init <shell>` to
 * get the shell function that performs the actual `cd`.
 */

use anyhow::{anyhow, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use warpdir::config::{ConfirmPolicy, WarpConfig};
use warpdir::cwd::{ShellDirectory, ENV_CD_FILE};
use warpdir::dispatch::{dispatch, NamedArgs, Outcome};
use warpdir::query::WarpQuery;
use warpdir::render;
use warpdir::structured_log::{init_logger, LogConfig};
use warpdir::{Entry, ShellHooks, ShellType, Warp, WarpCompleter, WarpError};

#[derive(Parser)]
#[command(name = "wd")]
#[command(about = "Warp to bookmarked directories", long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Sub-command (add, rm, ls, show, clean, help) or a warp name to jump to,
    /// followed by its positional arguments
    args: Vec<String>,

    /// Warp name; overrides the positional name
    #[arg(short, long)]
    name: Option<String>,

    /// Directory; overrides the positional path
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Show what remove/repair would delete without writing anything
    #[arg(long)]
    what_if: bool,

    /// Apply remove/repair without asking
    #[arg(short = 'y', long, conflicts_with = "confirm")]
    yes: bool,

    /// Ask before remove/repair writes anything
    #[arg(long)]
    confirm: bool,

    /// Emit JSON instead of human-readable output
    #[arg(long)]
    json: bool,

    /// Warp map file (default: $WD_CONFIG, then the user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the shell integration script (bash, zsh, fish, powershell)
    #[arg(long, value_name = "SHELL", conflicts_with = "complete")]
    init: Option<String>,

    /// Print completion candidates for a partial command line
    #[arg(long, value_name = "LINE")]
    complete: Option<String>,
}

fn main() {
    init_logger(LogConfig::from_lookup(|key| std::env::var(key).ok()));
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        let code = match e.downcast_ref::<WarpError>() {
            Some(err) if json => {
                eprintln!("{}", render::error_json(err));
                exit_code(err)
            }
            Some(err) => {
                eprintln!("Error: {}", err);
                exit_code(err)
            }
            None => {
                eprintln!("Error: {:#}", e);
                2
            }
        };
        std::process::exit(code);
    }
}

fn exit_code(err: &WarpError) -> i32 {
    if err.is_recoverable() {
        1
    } else {
        2
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(shell) = &cli.init {
        return print_init(shell);
    }

    let confirm_override = if cli.yes {
        Some(ConfirmPolicy::Auto)
    } else if cli.confirm {
        Some(ConfirmPolicy::Prompt)
    } else {
        None
    };
    let config = WarpConfig::resolve(cli.config.clone(), confirm_override, |key| {
        std::env::var(key).ok()
    });

    let cd_file = std::env::var_os(ENV_CD_FILE)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let mut warp = Warp::new(config, ShellDirectory::new(cd_file)).with_confirmer(prompt_stdin);

    if let Some(line) = &cli.complete {
        return print_completions(&warp, line);
    }

    let named = NamedArgs {
        name: cli.name.clone(),
        path: cli.path.clone(),
        what_if: cli.what_if,
    };
    let outcome = dispatch(&cli.args, &named, &mut warp)?;

    // The shell wrapper does the cd; nothing else to print
    if matches!(outcome, Outcome::Navigated(_)) && warp.directory().hands_off() && !cli.json {
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    if cli.json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(&render::to_json(&outcome))?)?;
    } else {
        write!(stdout, "{}", render::human(&outcome))?;
    }
    Ok(())
}

fn print_init(shell: &str) -> Result<()> {
    let shell_type = ShellType::detect(shell)
        .ok_or_else(|| anyhow!("unsupported shell '{}' (bash, zsh, fish, powershell)", shell))?;
    let bin = std::env::current_exe()
        .ok()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "wd".to_string());

    print!("{}", ShellHooks::new(shell_type, bin).get_init_script());
    Ok(())
}

fn print_completions(warp: &Warp<ShellDirectory>, line: &str) -> Result<()> {
    // A broken map should not spam the prompt; offer sub-commands only
    let entries = warp.get(&WarpQuery::all()).unwrap_or_default();
    let completer = WarpCompleter::new(&entries);

    // One bare candidate per line; a trailing '/' tells the wrapper not to
    // append a space
    let mut stdout = io::stdout().lock();
    for suggestion in completer.complete(line, line.len()) {
        writeln!(stdout, "{}", suggestion.name)?;
    }
    Ok(())
}

/// Ask on stderr, read the answer from stdin
fn prompt_stdin(action: &str, entries: &[Entry]) -> bool {
    let mut stderr = io::stderr();
    let _ = write!(stderr, "{}: about to remove\n{}", action, render::table(entries));
    let _ = write!(stderr, "Proceed? [y/N] ");
    let _ = stderr.flush();

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
