use anyhow::Result;
use std::path::{Path, PathBuf};

/// Fixed key the watchlist snapshot is persisted under.
pub const STORAGE_KEY: &str = "watchlist-storage";

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("WATCHLIST_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("watchlist");
        let data_dir = dirs::data_dir()
            .map(|d| d.join("watchlist"))
            .unwrap_or_else(|| config_dir.join("data"));

        Ok(Self { config_dir, data_dir })
    }

    pub fn from_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.join("data"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// File backing the persisted entries and filters
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", STORAGE_KEY))
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // An explicit base path wins (containers, tests, portable installs)
        if std::env::var_os("WATCHLIST_BASE_PATH").is_some() {
            return Self::from_base(&container_base_path());
        }
        Self::new().unwrap_or_else(|_| Self::from_base(&container_base_path()))
    }
}
