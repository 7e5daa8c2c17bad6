use serde::{Deserialize, Serialize};
use std::path::Path;

/// Public endpoint of the Firebase-Storage-compatible REST API.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

/// Folder poster images are uploaded into.
pub const POSTER_FOLDER: &str = "movie-images";

/// Folder for standalone uploads when none is given.
pub const DEFAULT_UPLOAD_FOLDER: &str = "uploads";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Connection parameters of the remote object store holding poster images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Sent as `key=` on every request when the bucket requires one
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default)]
    pub accept: AcceptedTypes,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AcceptedTypes {
    #[default]
    Image,
    Any,
}

fn default_endpoint() -> String {
    DEFAULT_STORAGE_ENDPOINT.to_string()
}

fn default_folder() -> String {
    DEFAULT_UPLOAD_FOLDER.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            endpoint: default_endpoint(),
            api_key: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            accept: AcceptedTypes::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Checks the remote store parameters needed before any upload.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.storage.bucket.trim().is_empty() || self.storage.bucket == "YOUR_BUCKET" {
            return Err(anyhow::anyhow!(
                "storage.bucket is not configured (run 'watchlist config storage --bucket <name>')"
            ));
        }
        if !self.storage.endpoint.starts_with("http://") && !self.storage.endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!("storage.endpoint must be an http(s) URL: {}", self.storage.endpoint));
        }
        if self.upload.folder.trim().is_empty() {
            return Err(anyhow::anyhow!("upload.folder cannot be empty"));
        }
        Ok(())
    }

    pub fn is_storage_configured(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            storage: StorageConfig {
                bucket: "moviemania.appspot.com".to_string(),
                endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
                api_key: Some("key-123".to_string()),
            },
            upload: UploadConfig {
                folder: "posters".to_string(),
                accept: AcceptedTypes::Any,
            },
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.storage.bucket, "moviemania.appspot.com");
        assert_eq!(loaded.storage.api_key.as_deref(), Some("key-123"));
        assert_eq!(loaded.upload.folder, "posters");
        assert_eq!(loaded.upload.accept, AcceptedTypes::Any);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[storage]\nbucket = \"b\"\n").unwrap();
        assert_eq!(config.storage.endpoint, DEFAULT_STORAGE_ENDPOINT);
        assert_eq!(config.upload.folder, DEFAULT_UPLOAD_FOLDER);
        assert_eq!(config.upload.accept, AcceptedTypes::Image);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_err());
        assert!(!config.is_storage_configured());

        config.storage.bucket = "YOUR_BUCKET".to_string();
        assert!(config.validate().is_err());

        config.storage.bucket = "real-bucket".to_string();
        assert!(config.validate().is_ok());

        config.storage.endpoint = "ftp://nope".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert!(config.storage.bucket.is_empty());
    }
}
