pub mod config;
pub mod entry;
pub mod filter;
pub mod list;
pub mod prompts;
pub mod upload;

use crate::output::Output;
use crate::upload_ui::is_interactive;
use color_eyre::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use watchlist_config::{Config, PathManager};
use watchlist_core::{EntryStore, FileBackend};
use watchlist_upload::{HttpObjectStore, ObjectStore, UploadClient};

/// Locations and handles shared by every command
pub struct AppContext {
    paths: PathManager,
    data_file: PathBuf,
    interactive: bool,
    object_store: Option<Arc<dyn ObjectStore>>,
}

impl AppContext {
    pub fn new(data_file: Option<PathBuf>) -> Self {
        Self::with_paths(PathManager::default(), data_file, is_interactive())
    }

    pub fn with_paths(paths: PathManager, data_file: Option<PathBuf>, interactive: bool) -> Self {
        let data_file = data_file.unwrap_or_else(|| paths.store_file());
        Self {
            paths,
            data_file,
            interactive,
            object_store: None,
        }
    }

    /// Upload through this store instead of the configured bucket
    #[cfg(test)]
    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.object_store = Some(store);
        self
    }

    /// Whether prompts may be shown
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn config_file(&self) -> PathBuf {
        self.paths.config_file()
    }

    pub fn open_store(&self) -> EntryStore {
        EntryStore::open(FileBackend::new(&self.data_file))
    }

    pub fn load_config(&self) -> Result<Config> {
        let config_file = self.config_file();
        Config::load_or_default(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))
    }

    /// Upload client for the configured bucket; fails when storage is not set up.
    pub fn upload_client(&self, config: &Config) -> Result<UploadClient> {
        if let Some(store) = &self.object_store {
            return Ok(UploadClient::new(Arc::clone(store)));
        }
        config.validate().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
        let store: Arc<dyn ObjectStore> = Arc::new(HttpObjectStore::from_config(&config.storage));
        Ok(UploadClient::new(store))
    }
}

/// Surface a failed save; the change is still live for this run.
pub fn report_persistence(store: &EntryStore, ctx: &AppContext, output: &Output) {
    if let Some(err) = store.last_persist_error() {
        output.warn(format!(
            "Could not save watchlist to {} ({}). The change was not persisted.",
            ctx.data_file().display(),
            err
        ));
    }
}
