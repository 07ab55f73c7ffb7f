//! Structured logging to stderr
//!
//! stdout carries command results, so every log line goes to stderr (and
//! optionally a file). Lines are either JSON objects or a terse text form:
//!
//!   {"timestamp":"2026-01-10T12:34:56Z","level":"info","component":"OPS","event":"create","data":{"name":"src"}}
//!   [OPS] create: {"name":"src"}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

pub const ENV_LOG_LEVEL: &str = "WD_LOG";
pub const ENV_LOG_FORMAT: &str = "WD_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "WD_LOG_FILE";

lazy_static::lazy_static! {
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    static ref LOG_CONFIG: Mutex<LogConfig> = Mutex::new(LogConfig::default());
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "trace" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: String,
    pub component: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl LogEntry {
    fn render(&self, json: bool) -> String {
        if json {
            return serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self));
        }

        if self.data.is_null() {
            format!("[{}] {}", self.component, self.event)
        } else {
            format!("[{}] {}: {}", self.component, self.event, self.data)
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub json_output: bool,
    pub file_path: Option<PathBuf>,
    pub min_level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json_output: false,
            file_path: None,
            min_level: LogLevel::Warn,
        }
    }
}

impl LogConfig {
    /// Build from `WD_LOG`, `WD_LOG_FORMAT` and `WD_LOG_FILE` as looked up
    /// through `env`. Unparseable values keep the defaults.
    pub fn from_lookup<F>(env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            json_output: env(ENV_LOG_FORMAT)
                .map(|f| f.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.json_output),
            file_path: env(ENV_LOG_FILE)
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            min_level: env(ENV_LOG_LEVEL)
                .and_then(|l| LogLevel::parse(&l))
                .unwrap_or(defaults.min_level),
        }
    }
}

/// Initialize the structured logger
pub fn init_logger(config: LogConfig) {
    if let Some(path) = &config.file_path {
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            if let Ok(mut log_file) = LOG_FILE.lock() {
                *log_file = Some(file);
            }
        }
    }

    if let Ok(mut cfg) = LOG_CONFIG.lock() {
        *cfg = config;
    }
}

/// Log an event with structured data
pub fn log_event(level: LogLevel, component: &str, event: &str, data: serde_json::Value) {
    let config = match LOG_CONFIG.lock() {
        Ok(guard) => (*guard).clone(),
        Err(_) => LogConfig::default(),
    };

    if level < config.min_level {
        return;
    }

    let entry = LogEntry {
        timestamp: Utc::now(),
        level: level.as_str().to_string(),
        component: component.to_string(),
        event: event.to_string(),
        data,
    };
    let output = entry.render(config.json_output);

    eprintln!("{}", output);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(ref mut file) = *log_file {
            let _ = writeln!(file, "{}", output);
        }
    }
}

#[macro_export]
macro_rules! slog_debug {
    ($component:expr, $event:expr, $data:expr) => {
        $crate::structured_log::log_event(
            $crate::structured_log::LogLevel::Debug,
            $component,
            $event,
            $data,
        )
    };
}

#[macro_export]
macro_rules! slog_info {
    ($component:expr, $event:expr, $data:expr) => {
        $crate::structured_log::log_event(
            $crate::structured_log::LogLevel::Info,
            $component,
            $event,
            $data,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_entry_serialization() {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level: "info".to_string(),
            component: "STORE".to_string(),
            event: "save".to_string(),
            data: serde_json::json!({"entries": 2}),
        };

        let json = entry.render(true);
        assert!(json.contains("\"level\":\"info\""));
        assert!(json.contains("\"component\":\"STORE\""));

        assert_eq!(entry.render(false), "[STORE] save: {\"entries\":2}");

        let bare = LogEntry {
            data: serde_json::Value::Null,
            ..entry
        };
        assert_eq!(bare.render(false), "[STORE] save");
    }

    #[test]
    fn test_level_ordering_and_parse() {
        assert!(LogLevel::Debug < LogLevel::Warn);
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::Error.as_str(), "error");
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::from_lookup(|key| match key {
            ENV_LOG_LEVEL => Some("debug".to_string()),
            ENV_LOG_FORMAT => Some("json".to_string()),
            _ => None,
        });
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.json_output);
        assert!(config.file_path.is_none());

        let defaults = LogConfig::from_lookup(|_| None);
        assert_eq!(defaults.min_level, LogLevel::Warn);
        assert!(!defaults.json_output);
    }
}
