//! Current-directory providers
//!
//! The core never touches the process working directory itself. It asks a
//! `CurrentDirectory` where the user is and tells it where to go.
//! - `CwdTracker`: in-memory tracker, for embedding and tests
//! - `ShellDirectory`: reads the process cwd and hands a navigation target
//!   back to the calling shell through a "cd file"

use crate::error::{Result, WarpError};
use std::path::{Path, PathBuf};

/// Environment variable naming the file a navigation target is written to
pub const ENV_CD_FILE: &str = "WD_CD_FILE";

pub trait CurrentDirectory {
    /// Where the user currently is
    fn current(&self) -> Result<PathBuf>;

    /// Move to `path`, returning the location actually reached
    fn change_to(&mut self, path: &Path) -> Result<PathBuf>;

    /// Resolve `path` against the current directory if it is relative
    fn absolutize(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.current()?.join(path))
        }
    }
}

/// Canonical form of an existing directory, or `None` if there isn't one
pub fn existing_dir(path: &Path) -> Option<PathBuf> {
    if !path.is_dir() {
        return None;
    }
    path.canonicalize().ok()
}

/// Directory context tracker held entirely in memory
#[derive(Debug, Clone)]
pub struct CwdTracker {
    cwd: PathBuf,
}

impl CwdTracker {
    /// Start at `initial`, or the process cwd when not given
    pub fn new(initial: Option<PathBuf>) -> Self {
        let cwd = initial
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("/"));

        let cwd = cwd.canonicalize().unwrap_or(cwd);
        Self { cwd }
    }

    pub fn get_cwd(&self) -> &Path {
        &self.cwd
    }
}

impl CurrentDirectory for CwdTracker {
    fn current(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn change_to(&mut self, path: &Path) -> Result<PathBuf> {
        let target = self.absolutize(path)?;
        let resolved =
            existing_dir(&target).ok_or_else(|| WarpError::PathNotFound(target.clone()))?;
        self.cwd = resolved.clone();
        Ok(resolved)
    }
}

/// Provider backed by the real process and its parent shell.
///
/// A child process cannot change its parent's directory, so a successful
/// `change_to` records the target in `cd_file` for the shell wrapper to
/// `cd` into after the process exits.
#[derive(Debug, Clone)]
pub struct ShellDirectory {
    cd_file: Option<PathBuf>,
    reached: Option<PathBuf>,
}

impl ShellDirectory {
    pub fn new(cd_file: Option<PathBuf>) -> Self {
        Self {
            cd_file,
            reached: None,
        }
    }

    /// Whether a shell wrapper is listening for the navigation target
    pub fn hands_off(&self) -> bool {
        self.cd_file.is_some()
    }

    pub fn reached(&self) -> Option<&Path> {
        self.reached.as_deref()
    }
}

impl CurrentDirectory for ShellDirectory {
    fn current(&self) -> Result<PathBuf> {
        if let Some(reached) = &self.reached {
            return Ok(reached.clone());
        }
        std::env::current_dir().map_err(|e| WarpError::io(".", e))
    }

    fn change_to(&mut self, path: &Path) -> Result<PathBuf> {
        let target = self.absolutize(path)?;
        let resolved =
            existing_dir(&target).ok_or_else(|| WarpError::PathNotFound(target.clone()))?;

        if let Some(cd_file) = &self.cd_file {
            std::fs::write(cd_file, resolved.display().to_string())
                .map_err(|e| WarpError::io(cd_file, e))?;
        }

        self.reached = Some(resolved.clone());
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cwd_tracker_basic() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tracker = CwdTracker::new(Some(temp_dir.path().to_path_buf()));

        assert_eq!(tracker.get_cwd(), temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_change_to_relative_child() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join("child")).unwrap();
        let mut tracker = CwdTracker::new(Some(temp_dir.path().to_path_buf()));

        let reached = tracker.change_to(Path::new("child")).unwrap();
        assert!(reached.ends_with("child"));
        assert_eq!(tracker.current().unwrap(), reached);
    }

    #[test]
    fn test_change_to_missing_dir_keeps_cwd() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut tracker = CwdTracker::new(Some(temp_dir.path().to_path_buf()));
        let before = tracker.current().unwrap();

        let result = tracker.change_to(Path::new("nowhere"));
        assert!(matches!(result, Err(WarpError::PathNotFound(_))));
        assert_eq!(tracker.current().unwrap(), before);
    }

    #[test]
    fn test_shell_directory_writes_cd_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let cd_file = temp_dir.path().join("cd");
        let mut shell = ShellDirectory::new(Some(cd_file.clone()));
        assert!(shell.hands_off());

        let reached = shell.change_to(temp_dir.path()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&cd_file).unwrap(),
            reached.display().to_string()
        );
        assert_eq!(shell.reached(), Some(reached.as_path()));
    }
}
