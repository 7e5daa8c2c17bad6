pub mod config;
pub mod paths;

pub use config::{AcceptedTypes, Config, StorageConfig, UploadConfig, DEFAULT_STORAGE_ENDPOINT, DEFAULT_UPLOAD_FOLDER, POSTER_FOLDER};
pub use paths::{PathManager, container_base_path, STORAGE_KEY};
