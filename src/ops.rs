//! Warp operations: one load → (mutate → save) transaction per call
//!
//! Every operation opens the store fresh. Mutating operations validate
//! everything before the first write and only save when the map actually
//! changed, so a failed or no-op call leaves the document untouched.

use crate::config::{ConfirmPolicy, WarpConfig};
use crate::cwd::{existing_dir, CurrentDirectory};
use crate::entry::Entry;
use crate::error::{Result, WarpError};
use crate::query::{match_target, WarpQuery};
use crate::store::WarpStore;
use crate::warp_map::InsertOutcome;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// Decides whether a pending removal goes ahead
pub trait Confirmer {
    fn confirm(&mut self, action: &str, entries: &[Entry]) -> bool;
}

impl<F> Confirmer for F
where
    F: FnMut(&str, &[Entry]) -> bool,
{
    fn confirm(&mut self, action: &str, entries: &[Entry]) -> bool {
        self(action, entries)
    }
}

/// Confirmer that approves everything
pub struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&mut self, _action: &str, _entries: &[Entry]) -> bool {
        true
    }
}

/// Result of a remove or repair call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "entries", rename_all = "snake_case")]
pub enum RemovalOutcome {
    /// Entries were removed and the map saved
    Removed(Vec<Entry>),
    /// Preview only; these would have been removed
    WouldRemove(Vec<Entry>),
    /// The confirmer refused; nothing was written
    Declined(Vec<Entry>),
}

impl RemovalOutcome {
    pub fn entries(&self) -> &[Entry] {
        match self {
            RemovalOutcome::Removed(e)
            | RemovalOutcome::WouldRemove(e)
            | RemovalOutcome::Declined(e) => e,
        }
    }

    pub fn count(&self) -> usize {
        self.entries().len()
    }
}

/// Warp map operations bound to a store and a current-directory provider
pub struct Warp<D> {
    store: WarpStore,
    dir: D,
    policy: ConfirmPolicy,
    confirmer: Box<dyn Confirmer>,
}

impl<D: CurrentDirectory> Warp<D> {
    pub fn new(config: WarpConfig, dir: D) -> Self {
        let policy = config.confirm;
        Self {
            store: WarpStore::new(config),
            dir,
            policy,
            confirmer: Box::new(AlwaysConfirm),
        }
    }

    /// Confirmer consulted when the policy is `Prompt`
    pub fn with_confirmer(mut self, confirmer: impl Confirmer + 'static) -> Self {
        self.confirmer = Box::new(confirmer);
        self
    }

    pub fn directory(&self) -> &D {
        &self.dir
    }

    /// Bind `name` to the directory at `path`.
    ///
    /// `InsertOutcome::Unchanged` is the no-op case: the name already
    /// resolves to this directory and nothing is written.
    pub fn create(&mut self, name: &str, path: &Path) -> Result<InsertOutcome> {
        if name.is_empty() {
            return Err(WarpError::InvalidName);
        }

        let target = self.dir.absolutize(path)?;
        let canonical =
            existing_dir(&target).ok_or_else(|| WarpError::PathNotFound(path.to_path_buf()))?;

        let mut map = self.store.load()?;
        let outcome = map.insert(Entry::new(name, canonical));

        if outcome.modified() {
            self.store.save(&map)?;
            crate::slog_info!("OPS", "create", json!(outcome));
        } else {
            crate::slog_debug!("OPS", "create_noop", json!({ "name": name }));
        }

        Ok(outcome)
    }

    /// Remove every binding for `name`, or every binding pointing at the
    /// current directory when no name is given.
    pub fn remove(&mut self, name: Option<&str>, what_if: bool) -> Result<RemovalOutcome> {
        let mut map = self.store.load()?;

        let (removed, target) = match name {
            Some(n) => (map.remove_name(n), n.to_string()),
            None => {
                let here = match_target(&self.dir.current()?);
                let label = here.display().to_string();
                (map.remove_path(&here), label)
            }
        };

        if removed.is_empty() {
            return Err(WarpError::NoSuchEntry(target));
        }

        self.gate("remove", removed, what_if, |store| store.save(&map))
    }

    /// Entries matching `query`; an absent store is simply empty
    pub fn get(&self, query: &WarpQuery) -> Result<Vec<Entry>> {
        let map = self.store.load()?;

        let query = match &query.path {
            Some(p) => WarpQuery {
                name: query.name.clone(),
                path: Some(self.dir.absolutize(p)?),
            },
            None => query.clone(),
        };

        Ok(query.apply(&map).into_iter().cloned().collect())
    }

    /// Bindings that point at where the user is now
    pub fn names_for_current_directory(&self) -> Result<Vec<Entry>> {
        let here = self.dir.current()?;
        self.get(&WarpQuery::by_path(here))
    }

    /// Drop every binding whose directory no longer exists
    pub fn repair(&mut self, what_if: bool) -> Result<RemovalOutcome> {
        let mut map = self.store.load()?;
        let dangling = map.prune_dangling();

        if dangling.is_empty() {
            crate::slog_debug!("OPS", "repair_clean", json!({ "entries": map.len() }));
            return Ok(RemovalOutcome::Removed(dangling));
        }

        self.gate("repair", dangling, what_if, |store| store.save(&map))
    }

    /// Look up `name` and move the current-directory provider there
    pub fn resolve(&mut self, name: &str) -> Result<Entry> {
        let map = self.store.load()?;
        let entry = map
            .find_first_by_name(name)
            .cloned()
            .ok_or_else(|| WarpError::NoSuchEntry(name.to_string()))?;

        if !entry.is_live() {
            return Err(WarpError::PathGone {
                name: entry.name,
                path: entry.path,
            });
        }

        self.dir.change_to(&entry.path)?;
        crate::slog_debug!("OPS", "navigate", json!(entry));
        Ok(entry)
    }

    /// Preview, confirm, then commit a computed removal
    fn gate<F>(
        &mut self,
        action: &str,
        entries: Vec<Entry>,
        what_if: bool,
        commit: F,
    ) -> Result<RemovalOutcome>
    where
        F: FnOnce(&WarpStore) -> Result<()>,
    {
        if what_if {
            return Ok(RemovalOutcome::WouldRemove(entries));
        }

        if self.policy == ConfirmPolicy::Prompt && !self.confirmer.confirm(action, &entries) {
            crate::slog_info!("OPS", "declined", json!({ "action": action }));
            return Ok(RemovalOutcome::Declined(entries));
        }

        commit(&self.store)?;
        crate::slog_info!(
            "OPS",
            action,
            json!({ "removed": entries.len(), "entries": &entries })
        );
        Ok(RemovalOutcome::Removed(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cwd::CwdTracker;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        base: PathBuf,
        map_path: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let base = root.path().canonicalize().unwrap();
            let map_path = base.join("cfg").join("warps.json");
            Self {
                _root: root,
                base,
                map_path,
            }
        }

        fn dir(&self, name: &str) -> PathBuf {
            let p = self.base.join(name);
            std::fs::create_dir_all(&p).unwrap();
            p
        }

        fn warp(&self) -> Warp<CwdTracker> {
            self.warp_at(&self.base)
        }

        fn warp_at(&self, cwd: &Path) -> Warp<CwdTracker> {
            Warp::new(
                WarpConfig::new(&self.map_path),
                CwdTracker::new(Some(cwd.to_path_buf())),
            )
        }

        fn raw(&self) -> Option<String> {
            std::fs::read_to_string(&self.map_path).ok()
        }
    }

    #[test]
    fn test_override_ordering() {
        let fx = Fixture::new();
        let p1 = fx.dir("p1");
        let p2 = fx.dir("p2");
        let mut warp = fx.warp();

        warp.create("n", &p1).unwrap();
        let outcome = warp.create("n", &p2).unwrap();
        assert!(matches!(outcome, InsertOutcome::Shadowed { .. }));

        let all = warp.get(&WarpQuery::by_name("n")).unwrap();
        assert_eq!(all, vec![Entry::new("n", &p2), Entry::new("n", &p1)]);
    }

    #[test]
    fn test_idempotent_create_does_not_write() {
        let fx = Fixture::new();
        let p = fx.dir("p");
        let mut warp = fx.warp();

        warp.create("n", &p).unwrap();
        let before = fx.raw();
        let again = warp.create("n", &p).unwrap();

        assert!(matches!(again, InsertOutcome::Unchanged { .. }));
        assert_eq!(fx.raw(), before);
        assert_eq!(warp.get(&WarpQuery::all()).unwrap().len(), 1);
    }

    #[test]
    fn test_create_relative_path_uses_current_directory() {
        let fx = Fixture::new();
        let here = fx.dir("here");
        let mut warp = fx.warp_at(&here);

        let outcome = warp.create("dot", Path::new(".")).unwrap();
        assert_eq!(outcome.entry().path, here);
    }

    #[test]
    fn test_create_missing_dir_touches_nothing() {
        let fx = Fixture::new();
        let mut warp = fx.warp();

        let result = warp.create("trendy", &fx.base.join("missing"));
        assert!(matches!(result, Err(WarpError::PathNotFound(_))));
        assert!(fx.raw().is_none());
        assert!(warp.get(&WarpQuery::by_name("trendy")).unwrap().is_empty());
    }

    #[test]
    fn test_create_empty_name_rejected() {
        let fx = Fixture::new();
        let mut warp = fx.warp();
        assert!(matches!(
            warp.create("", &fx.base),
            Err(WarpError::InvalidName)
        ));
        assert!(fx.raw().is_none());
    }

    #[test]
    fn test_remove_by_name_takes_all_bindings() {
        let fx = Fixture::new();
        let (a, b) = (fx.dir("a"), fx.dir("b"));
        let mut warp = fx.warp();
        warp.create("x", &a).unwrap();
        warp.create("x", &b).unwrap();
        warp.create("y", &a).unwrap();

        let outcome = warp.remove(Some("x"), false).unwrap();
        assert_eq!(outcome.count(), 2);
        assert_eq!(
            warp.get(&WarpQuery::all()).unwrap(),
            vec![Entry::new("y", &a)]
        );
    }

    #[test]
    fn test_remove_by_current_directory_round_trip() {
        let fx = Fixture::new();
        let here = fx.dir("here");
        let other = fx.dir("other");
        let mut warp = fx.warp_at(&here);
        warp.create("h1", Path::new(".")).unwrap();
        warp.create("h2", &here).unwrap();
        warp.create("o", &other).unwrap();

        let outcome = warp.remove(None, false).unwrap();
        assert_eq!(outcome.count(), 2);
        assert!(warp.names_for_current_directory().unwrap().is_empty());

        let before = fx.raw();
        assert!(matches!(
            warp.remove(None, false),
            Err(WarpError::NoSuchEntry(_))
        ));
        assert_eq!(fx.raw(), before);
    }

    #[test]
    fn test_remove_what_if_does_not_write() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        let mut warp = fx.warp();
        warp.create("x", &a).unwrap();
        let before = fx.raw();

        let outcome = warp.remove(Some("x"), true).unwrap();
        assert_eq!(outcome, RemovalOutcome::WouldRemove(vec![Entry::new("x", &a)]));
        assert_eq!(fx.raw(), before);
    }

    #[test]
    fn test_prompt_policy_consults_confirmer() {
        let fx = Fixture::new();
        let a = fx.dir("a");
        let asked = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&asked);

        let mut warp = Warp::new(
            WarpConfig::new(&fx.map_path).with_confirm(ConfirmPolicy::Prompt),
            CwdTracker::new(Some(fx.base.clone())),
        )
        .with_confirmer(move |action: &str, entries: &[Entry]| {
            log.borrow_mut().push((action.to_string(), entries.len()));
            false
        });

        warp.create("x", &a).unwrap();
        let before = fx.raw();
        let outcome = warp.remove(Some("x"), false).unwrap();

        assert!(matches!(outcome, RemovalOutcome::Declined(_)));
        assert_eq!(fx.raw(), before);
        assert_eq!(asked.borrow().as_slice(), &[("remove".to_string(), 1)]);
    }

    #[test]
    fn test_repair_exactness() {
        let fx = Fixture::new();
        let live = fx.dir("live");
        let doomed = fx.dir("doomed");
        let mut warp = fx.warp();
        warp.create("live", &live).unwrap();
        warp.create("alias", &live).unwrap();
        warp.create("doomed", &doomed).unwrap();
        std::fs::remove_dir(&doomed).unwrap();

        let outcome = warp.repair(false).unwrap();
        assert_eq!(outcome, RemovalOutcome::Removed(vec![Entry::new("doomed", &doomed)]));

        let remaining = warp.get(&WarpQuery::all()).unwrap();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|e| e.is_live()));
    }

    #[test]
    fn test_repair_clean_map_does_not_write() {
        let fx = Fixture::new();
        let mut warp = fx.warp();

        let outcome = warp.repair(false).unwrap();
        assert_eq!(outcome.count(), 0);
        assert!(fx.raw().is_none());
    }

    #[test]
    fn test_resolve_moves_directory() {
        let fx = Fixture::new();
        let project = fx.dir("projects/SuperAwesomeProject");
        let mut warp = fx.warp();

        let created = warp.create("awesome", &project).unwrap();
        assert!(matches!(created, InsertOutcome::Appended { .. }));

        let entry = warp.resolve("awesome").unwrap();
        assert_eq!(entry, Entry::new("awesome", &project));
        assert_eq!(warp.directory().get_cwd(), project.as_path());

        assert!(!warp.create("awesome", &project).unwrap().modified());
        assert_eq!(warp.get(&WarpQuery::by_name("awesome")).unwrap().len(), 1);
    }

    #[test]
    fn test_resolve_errors_are_distinct() {
        let fx = Fixture::new();
        let gone = fx.dir("gone");
        let mut warp = fx.warp();
        warp.create("gone", &gone).unwrap();
        std::fs::remove_dir(&gone).unwrap();

        assert!(matches!(
            warp.resolve("never"),
            Err(WarpError::NoSuchEntry(_))
        ));
        assert!(matches!(
            warp.resolve("gone"),
            Err(WarpError::PathGone { .. })
        ));
    }

    #[test]
    fn test_get_absent_store_is_empty() {
        let fx = Fixture::new();
        let warp = fx.warp();
        assert!(warp.get(&WarpQuery::all()).unwrap().is_empty());
        assert!(fx.raw().is_none());
    }
}
