use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use watchlist_models::{EntryDraft, FilterState, WatchlistEntry};
use crate::backend::{SnapshotBackend, StoreSnapshot};

/// Owner of the watchlist entries and the active filter set.
///
/// State lives in an immutable snapshot that every mutation replaces
/// wholesale, then persists through the injected backend. Persistence is
/// best-effort: a failed save is logged, remembered in
/// [`last_persist_error`](Self::last_persist_error), and the in-memory state
/// keeps the change.
pub struct EntryStore {
    state: Arc<StoreSnapshot>,
    backend: Box<dyn SnapshotBackend>,
    last_persist_error: Option<String>,
}

impl EntryStore {
    /// Rehydrate from the backend, or start empty with match-all filters.
    pub fn open(backend: impl SnapshotBackend + 'static) -> Self {
        let state = match backend.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => StoreSnapshot::default(),
            Err(e) => {
                warn!("Failed to load stored watchlist: {}. Starting empty.", e);
                StoreSnapshot::default()
            }
        };
        Self {
            state: Arc::new(state),
            backend: Box::new(backend),
            last_persist_error: None,
        }
    }

    /// Shared read-only view of the current state
    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        Arc::clone(&self.state)
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.state.entries
    }

    pub fn filters(&self) -> &FilterState {
        &self.state.filters
    }

    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WatchlistEntry> {
        self.state.entries.iter().find(|e| e.id == id)
    }

    /// Full id of the single entry whose id starts with `prefix`.
    ///
    /// An exact match always wins; an ambiguous or unknown prefix yields `None`.
    pub fn resolve_id(&self, prefix: &str) -> Option<String> {
        if prefix.is_empty() {
            return None;
        }
        if let Some(entry) = self.get(prefix) {
            return Some(entry.id.clone());
        }
        let mut candidates = self.state.entries.iter().filter(|e| e.id.starts_with(prefix));
        match (candidates.next(), candidates.next()) {
            (Some(only), None) => Some(only.id.clone()),
            _ => None,
        }
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Append a new entry with a freshly generated id and return that id.
    pub fn add_entry(&mut self, draft: EntryDraft) -> String {
        let id = self.fresh_id();
        let entry = draft.into_entry(id.clone());
        info!(id = %id, name = %entry.name, "Adding entry");

        let mut next = (*self.state).clone();
        next.entries.push(entry);
        self.commit(next);
        id
    }

    /// Replace the entry with matching id. Unknown ids are ignored.
    pub fn update_entry(&mut self, id: &str, entry: WatchlistEntry) {
        let Some(position) = self.state.entries.iter().position(|e| e.id == id) else {
            debug!(id, "Update for unknown entry ignored");
            return;
        };
        if entry.id != id {
            // The replacement must keep the id it is stored under
            warn!(id, replacement_id = %entry.id, "Update carries a different id; keeping the original");
        }
        info!(id, name = %entry.name, "Updating entry");

        let mut next = (*self.state).clone();
        next.entries[position] = WatchlistEntry {
            id: id.to_string(),
            ..entry
        };
        self.commit(next);
    }

    /// Remove the entry with matching id. Unknown ids are ignored.
    pub fn delete_entry(&mut self, id: &str) {
        if self.get(id).is_none() {
            debug!(id, "Delete for unknown entry ignored");
            return;
        }
        info!(id, "Deleting entry");

        let mut next = (*self.state).clone();
        next.entries.retain(|e| e.id != id);
        self.commit(next);
    }

    /// Replace the whole filter set.
    pub fn set_filters(&mut self, filters: FilterState) {
        debug!(?filters, "Setting filters");
        let mut next = (*self.state).clone();
        next.filters = filters;
        self.commit(next);
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self, next: StoreSnapshot) {
        self.state = Arc::new(next);
        match self.backend.save(&self.state) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                warn!("Failed to persist watchlist, continuing in memory: {}", e);
                self.last_persist_error = Some(e.to_string());
            }
        }
    }
}
