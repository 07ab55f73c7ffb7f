//! Error kinds surfaced by warp map operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WarpError>;

#[derive(Debug, Error)]
pub enum WarpError {
    /// A name (or current-directory) lookup matched nothing
    #[error("no warp point matches '{0}'")]
    NoSuchEntry(String),

    /// A create target is not an existing directory
    #[error("directory not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The warp point exists but its directory has since disappeared
    #[error("warp point '{name}' points to {}, which no longer exists (run `wd repair` to prune it)", .path.display())]
    PathGone { name: String, path: PathBuf },

    /// The persisted document exists but does not parse
    #[error("warp map at {} is corrupt: {reason}", .path.display())]
    MapCorrupt { path: PathBuf, reason: String },

    /// The map could not be serialized, e.g. a path that is not valid UTF-8
    #[error("cannot write warp map to {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("warp name must not be empty")]
    InvalidName,

    /// The invocation could not be mapped onto an operation
    #[error("{0}")]
    Usage(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WarpError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WarpError::Io {
            path: path.into(),
            source,
        }
    }

    /// Expected, user-recoverable conditions as opposed to broken state
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WarpError::NoSuchEntry(_)
                | WarpError::PathNotFound(_)
                | WarpError::PathGone { .. }
                | WarpError::Encode { .. }
                | WarpError::InvalidName
                | WarpError::Usage(_)
        )
    }

    /// Stable short identifier used in JSON error output
    pub fn kind(&self) -> &'static str {
        match self {
            WarpError::NoSuchEntry(_) => "no_such_entry",
            WarpError::PathNotFound(_) => "path_not_found",
            WarpError::PathGone { .. } => "path_gone",
            WarpError::MapCorrupt { .. } => "map_corrupt",
            WarpError::Encode { .. } => "encode",
            WarpError::InvalidName => "invalid_name",
            WarpError::Usage(_) => "usage",
            WarpError::Io { .. } => "io",
        }
    }
}
