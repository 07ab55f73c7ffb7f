//! Persistence for the warp map
//!
//! The document is a root object holding a `warps` array of `{name, path}`
//! records. Any other top-level keys belong to someone else and survive a
//! load/save round trip untouched.

use crate::config::{DocumentFormat, WarpConfig};
use crate::entry::Entry;
use crate::error::{Result, WarpError};
use crate::warp_map::WarpMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct WarpDocument {
    #[serde(default)]
    warps: Vec<Entry>,
    #[serde(flatten)]
    extra: Map<String, JsonValue>,
}

impl WarpDocument {
    fn decode(content: &str, format: DocumentFormat) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: WarpDocument = match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string())?,
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string())?,
        };
        if let Some(idx) = doc.warps.iter().position(|e| e.name.is_empty()) {
            return Err(format!("entry {} has an empty name", idx));
        }
        Ok(doc)
    }

    fn encode(&self, format: DocumentFormat) -> std::result::Result<String, String> {
        match format {
            DocumentFormat::Json => serde_json::to_string_pretty(self)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::to_string(self).map_err(|e| e.to_string()),
        }
    }
}

/// File-backed warp map store
pub struct WarpStore {
    config: WarpConfig,
}

impl WarpStore {
    pub fn new(config: WarpConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.map_path
    }

    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Read the document if present. An absent document is an empty map
    /// and is not created.
    pub fn load(&self) -> Result<WarpMap> {
        match self.read_document()? {
            Some(doc) => {
                crate::slog_debug!(
                    "STORE",
                    "load",
                    json!({
                        "path": self.path().display().to_string(),
                        "entries": doc.warps.len()
                    })
                );
                Ok(WarpMap::from_entries(doc.warps))
            }
            None => {
                crate::slog_debug!(
                    "STORE",
                    "load_absent",
                    json!({ "path": self.path().display().to_string() })
                );
                Ok(WarpMap::new())
            }
        }
    }

    /// Write `map` to the document, creating it and its parent directory if
    /// needed. The existing document is re-read so unrelated keys survive.
    pub fn save(&self, map: &WarpMap) -> Result<()> {
        let extra = self
            .read_document()?
            .map(|doc| doc.extra)
            .unwrap_or_default();

        let doc = WarpDocument {
            warps: map.entries().to_vec(),
            extra,
        };
        let content = doc
            .encode(self.config.format)
            .map_err(|reason| WarpError::Encode {
                path: self.path().to_path_buf(),
                reason,
            })?;

        self.write_atomic(&content)?;

        crate::slog_debug!(
            "STORE",
            "save",
            json!({ "path": self.path().display().to_string(), "entries": map.len() })
        );
        Ok(())
    }

    fn read_document(&self) -> Result<Option<WarpDocument>> {
        let path = self.path();
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WarpError::io(path, e)),
        };

        WarpDocument::decode(&content, self.config.format)
            .map(Some)
            .map_err(|reason| self.corrupt(reason))
    }

    /// Write to a sibling temp file then rename over the target, so a failed
    /// write never leaves a half-written map behind.
    fn write_atomic(&self, content: &str) -> Result<()> {
        let path = self.path();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&parent).map_err(|e| WarpError::io(&parent, e))?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&parent).map_err(|e| WarpError::io(&parent, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| WarpError::io(tmp.path(), e))?;
        tmp.persist(path).map_err(|e| WarpError::io(path, e.error))?;

        Ok(())
    }

    fn corrupt(&self, reason: String) -> WarpError {
        crate::slog_debug!(
            "STORE",
            "corrupt",
            json!({ "path": self.path().display().to_string(), "reason": &reason })
        );
        WarpError::MapCorrupt {
            path: self.path().to_path_buf(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, file: &str) -> WarpStore {
        WarpStore::new(WarpConfig::new(dir.path().join(file)))
    }

    #[test]
    fn test_load_absent_is_empty_and_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.json");

        let map = store.load().unwrap();
        assert!(map.is_empty());
        assert!(!store.exists());
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "nested/warps.json");

        let map = WarpMap::from_entries(vec![
            Entry::new("b", "/b"),
            Entry::new("a", "/a2"),
            Entry::new("a", "/a1"),
        ]);
        store.save(&map).unwrap();

        assert_eq!(store.load().unwrap(), map);
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.json");
        std::fs::write(
            store.path(),
            r#"{"theme": {"color": "blue"}, "warps": [{"name": "a", "path": "/a"}]}"#,
        )
        .unwrap();

        let mut map = store.load().unwrap();
        map.insert(Entry::new("b", "/b"));
        store.save(&map).unwrap();

        let raw: JsonValue =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["theme"]["color"], "blue");
        assert_eq!(raw["warps"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_document_is_reported_and_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.json");
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(WarpError::MapCorrupt { .. })));
        assert!(matches!(
            store.save(&WarpMap::new()),
            Err(WarpError::MapCorrupt { .. })
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[cfg(unix)]
    #[test]
    fn test_unencodable_path_is_not_corruption() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.json");
        let raw = std::ffi::OsStr::from_bytes(b"/tmp/bad-\xff");
        let map = WarpMap::from_entries(vec![Entry::new("bad", raw)]);

        let err = store.save(&map).unwrap_err();
        assert!(matches!(err, WarpError::Encode { .. }));
        assert!(!store.exists());
    }

    #[test]
    fn test_empty_name_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.json");
        std::fs::write(store.path(), r#"{"warps": [{"name": "", "path": "/x"}]}"#).unwrap();

        assert!(matches!(store.load(), Err(WarpError::MapCorrupt { .. })));
    }

    #[test]
    fn test_yaml_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.yaml");
        std::fs::write(
            store.path(),
            "owner: me\nwarps:\n  - name: a\n    path: /a\n",
        )
        .unwrap();

        let mut map = store.load().unwrap();
        assert_eq!(map.len(), 1);
        map.insert(Entry::new("a", "/elsewhere"));
        store.save(&map).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("owner: me"));
        assert_eq!(
            store.load().unwrap().find_first_by_name("a").unwrap().path,
            Path::new("/elsewhere")
        );
    }

    #[test]
    fn test_blank_file_is_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, "warps.json");
        std::fs::write(store.path(), "\n").unwrap();

        assert!(store.load().unwrap().is_empty());
    }
}
