//! A single warp point: a name bound to a directory

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Whether the bound directory still exists
    pub fn is_live(&self) -> bool {
        self.path.is_dir()
    }

    pub fn points_to(&self, path: &Path) -> bool {
        self.path == path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_liveness() {
        let dir = tempfile::tempdir().unwrap();
        let entry = Entry::new("tmp", dir.path());
        assert!(entry.is_live());
        assert!(entry.points_to(dir.path()));

        let gone = Entry::new("gone", dir.path().join("missing"));
        assert!(!gone.is_live());
    }
}
