//! Configuration for locating and handling the warp map
//!
//! Nothing here is read implicitly by the store: callers build a
//! `WarpConfig` (usually via `WarpConfig::resolve`) and hand it over.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the warp map location
pub const ENV_MAP_PATH: &str = "WD_CONFIG";
/// Environment variable selecting the confirmation policy
pub const ENV_CONFIRM: &str = "WD_CONFIRM";

const APP_DIR: &str = "warpdir";
const MAP_FILE: &str = "warps.json";

/// Default location of the warp map: `<config_dir>/warpdir/warps.json`
pub fn default_map_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(MAP_FILE)
}

/// Whether destructive operations (remove, repair) ask before writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmPolicy {
    /// Apply without asking
    #[default]
    Auto,
    /// Ask the confirmer and abort on decline
    Prompt,
}

impl ConfirmPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" | "yes" | "1" | "true" => Some(ConfirmPolicy::Auto),
            "prompt" | "ask" | "confirm" => Some(ConfirmPolicy::Prompt),
            _ => None,
        }
    }
}

/// On-disk encoding of the warp map document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarpConfig {
    pub map_path: PathBuf,
    pub confirm: ConfirmPolicy,
    pub format: DocumentFormat,
}

impl WarpConfig {
    pub fn new(map_path: impl Into<PathBuf>) -> Self {
        let map_path = map_path.into();
        let format = DocumentFormat::from_path(&map_path);
        Self {
            map_path,
            confirm: ConfirmPolicy::default(),
            format,
        }
    }

    pub fn with_confirm(mut self, confirm: ConfirmPolicy) -> Self {
        self.confirm = confirm;
        self
    }

    /// Resolve settings by precedence: explicit override, then the value
    /// looked up through `env`, then the computed default.
    ///
    /// `env` is injected so resolution stays testable without touching the
    /// process environment.
    pub fn resolve<F>(
        map_override: Option<PathBuf>,
        confirm_override: Option<ConfirmPolicy>,
        env: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let map_path = map_override
            .or_else(|| {
                env(ENV_MAP_PATH)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(default_map_path);

        let confirm = confirm_override
            .or_else(|| env(ENV_CONFIRM).and_then(|v| ConfirmPolicy::parse(&v)))
            .unwrap_or_default();

        Self::new(map_path).with_confirm(confirm)
    }
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self::new(default_map_path())
    }
}
