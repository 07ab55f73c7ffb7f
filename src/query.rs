//! Read-only filtering over a warp map

use crate::entry::Entry;
use crate::warp_map::WarpMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name and/or path filter. An absent field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarpQuery {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
}

impl WarpQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            path: None,
        }
    }

    pub fn by_path(path: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            path: Some(path.into()),
        }
    }

    /// Entries satisfying both predicates, in store order
    pub fn apply<'a>(&self, map: &'a WarpMap) -> Vec<&'a Entry> {
        let target = self.path.as_deref().map(match_target);

        match (self.name.as_deref(), target.as_deref()) {
            (Some(name), Some(path)) => map
                .find_by_name(name)
                .into_iter()
                .filter(|e| e.points_to(path))
                .collect(),
            (Some(name), None) => map.find_by_name(name),
            (None, Some(path)) => map.find_by_path(path),
            (None, None) => map.entries().iter().collect(),
        }
    }
}

/// Path to compare stored entries against.
///
/// Existing directories are canonicalized so `.` or a symlinked path match
/// the stored absolute form; anything else is compared literally.
pub fn match_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
    } else {
        path.to_path_buf()
    }
}
