use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{debug, info, warn};
use watchlist_models::{FilterState, WatchlistEntry};

/// Version tag written next to every persisted snapshot.
pub const SCHEMA_VERSION: u32 = 0;

/// Everything the store persists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub entries: Vec<WatchlistEntry>,
    #[serde(default)]
    pub filters: FilterState,
}

/// On-disk envelope: the snapshot plus its schema version
#[derive(Debug, Serialize, Deserialize)]
struct PersistedState {
    state: StoreSnapshot,
    version: u32,
}

/// Load/save hooks the store is built with
pub trait SnapshotBackend: Send {
    /// Previously saved snapshot, or `None` when nothing usable exists
    fn load(&self) -> Result<Option<StoreSnapshot>>;
    fn save(&self, snapshot: &StoreSnapshot) -> Result<()>;
}

/// JSON file holding the versioned snapshot
pub struct FileBackend {
    path: PathBuf,
    /// Set when the existing file could be neither read nor backed up;
    /// saving would destroy it, so writes are refused.
    write_locked: AtomicBool,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_locked: AtomicBool::new(false),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep an unreadable file around for inspection instead of overwriting it
    fn back_up(&self, reason: &str) {
        let backup_path = self.path.with_extension("json.bak");
        match std::fs::copy(&self.path, &backup_path) {
            Ok(_) => info!(
                "Stored watchlist unusable ({}). Backed up to {:?} and starting empty.",
                reason, backup_path
            ),
            Err(e) => {
                warn!(
                    "Stored watchlist unusable ({}) and backup failed: {}. Starting empty; the file will not be overwritten.",
                    reason, e
                );
                self.write_locked.store(true, Ordering::SeqCst);
            }
        }
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        if !self.path.exists() {
            debug!("No stored watchlist at {:?}, starting empty", self.path);
            return Ok(None);
        }

        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.write_locked.store(true, Ordering::SeqCst);
                return Err(anyhow!(
                    "could not read {:?} ({}); it will not be overwritten",
                    self.path, e
                ));
            }
        };
        // Invalid UTF-8 surfaces here as a parse error too
        let persisted: PersistedState = match serde_json::from_slice(&content) {
            Ok(persisted) => persisted,
            Err(e) => {
                self.back_up(&e.to_string());
                return Ok(None);
            }
        };

        if persisted.version != SCHEMA_VERSION {
            self.back_up(&format!(
                "schema version {} but expected {}",
                persisted.version, SCHEMA_VERSION
            ));
            return Ok(None);
        }

        info!(
            "Loaded watchlist: {} entries from {:?}",
            persisted.state.entries.len(),
            self.path
        );
        Ok(Some(persisted.state))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if self.write_locked.load(Ordering::SeqCst) {
            return Err(anyhow!(
                "refusing to overwrite unreadable watchlist at {:?}",
                self.path
            ));
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let envelope = PersistedState {
            state: snapshot.clone(),
            version: SCHEMA_VERSION,
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!("Saved watchlist: {} entries", snapshot.entries.len());
        Ok(())
    }
}

/// Snapshot kept in memory only; writes can be made to fail on demand
#[derive(Default)]
pub struct MemoryBackend {
    saved: Mutex<Option<StoreSnapshot>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Last snapshot successfully saved
    pub fn saved(&self) -> Option<StoreSnapshot> {
        self.saved.lock().ok()?.clone()
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        Ok(self.saved())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("storage quota exceeded"));
        }
        *self.saved.lock().map_err(|_| anyhow!("memory backend lock poisoned"))? = Some(snapshot.clone());
        Ok(())
    }
}

impl<B: SnapshotBackend + Sync> SnapshotBackend for std::sync::Arc<B> {
    fn load(&self) -> Result<Option<StoreSnapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlist_models::{Rating, WatchStatus};

    fn snapshot() -> StoreSnapshot {
        let entry = |id: &str, name: &str| WatchlistEntry {
            id: id.to_string(),
            name: name.to_string(),
            year: "2022-2024".to_string(),
            category: "OTT Series".to_string(),
            status: WatchStatus::CurrentlyWatching,
            rating: Rating::new(7).unwrap(),
            remarks: "season 2 pending".to_string(),
            platform: "Netflix".to_string(),
            image_url: Some("https://img/x.png".to_string()),
        };
        StoreSnapshot {
            entries: vec![entry("b", "Beta"), entry("a", "Alpha")],
            filters: FilterState {
                category: Some("OTT Series".to_string()),
                status: None,
                rating: Rating::new(7),
                search_term: "ph".to_string(),
            },
        }
    }

    #[test]
    fn test_file_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("watchlist-storage.json"));

        assert_eq!(backend.load().unwrap(), None);
        backend.save(&snapshot()).unwrap();
        let loaded = backend.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot());
        assert_eq!(loaded.entries[0].id, "b");
    }

    #[test]
    fn test_file_envelope_carries_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist-storage.json");
        FileBackend::new(&path).save(&StoreSnapshot::default()).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 0);
        assert!(raw["state"]["entries"].as_array().unwrap().is_empty());
        assert_eq!(raw["state"]["filters"]["searchTerm"], "");
    }

    #[test]
    fn test_unknown_version_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist-storage.json");
        std::fs::write(&path, r#"{"state":{"entries":[],"filters":{}},"version":3}"#).unwrap();

        assert_eq!(FileBackend::new(&path).load().unwrap(), None);
        assert!(dir.path().join("watchlist-storage.json.bak").exists());
    }

    #[test]
    fn test_corrupt_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist-storage.json");
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(FileBackend::new(&path).load().unwrap(), None);
        assert!(dir.path().join("watchlist-storage.json.bak").exists());
    }

    #[test]
    fn test_non_utf8_file_is_backed_up_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist-storage.json");
        let mut raw = br#"{"state":{"entries":[{"id":"keep","name":"Caf"#.to_vec();
        raw.push(0xE9);
        raw.extend_from_slice(br#"","year":"2020","category":"Anime","status":"Watched","rating":"8"}],"filters":{}},"version":0}"#);
        std::fs::write(&path, &raw).unwrap();

        let mut store = crate::store::EntryStore::open(FileBackend::new(&path));
        assert!(store.is_empty());
        let backup = dir.path().join("watchlist-storage.json.bak");
        assert_eq!(std::fs::read(&backup).unwrap(), raw);

        store.add_entry(watchlist_models::EntryDraft {
            name: "Dune".to_string(),
            year: "2021".to_string(),
            category: "Hollywood Movies".to_string(),
            status: WatchStatus::ToWatch,
            rating: Rating::new(9).unwrap(),
            remarks: String::new(),
            platform: String::new(),
            image_url: None,
        });
        assert_eq!(std::fs::read(&backup).unwrap(), raw);
    }

    #[test]
    fn test_unreadable_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be: exists but cannot be read
        let path = dir.path().join("watchlist-storage.json");
        std::fs::create_dir(&path).unwrap();

        let backend = FileBackend::new(&path);
        assert!(backend.load().is_err());
        assert!(backend.save(&snapshot()).is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn test_memory_backend_failures() {
        let backend = MemoryBackend::new();
        backend.save(&snapshot()).unwrap();
        backend.set_fail_writes(true);
        assert!(backend.save(&StoreSnapshot::default()).is_err());
        assert_eq!(backend.load().unwrap(), Some(snapshot()));
    }
}
