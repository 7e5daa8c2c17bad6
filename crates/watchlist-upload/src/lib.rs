pub mod client;
pub mod error;
pub mod file;
pub mod http;
pub mod memory;
pub mod naming;
pub mod progress;
pub mod state;
pub mod store;

pub use client::{UploadAttempt, UploadClient, UploadEvent, DEFAULT_FOLDER};
pub use error::UploadError;
pub use file::{validate, SelectedFile, IMAGE_CONTENT_TYPES, MAX_FILE_SIZE};
pub use http::HttpObjectStore;
pub use memory::MemoryObjectStore;
pub use naming::{object_key, sanitize_file_name};
pub use progress::ProgressSink;
pub use state::UploadState;
pub use store::{ObjectStore, StoredObject};
pub use watchlist_config::AcceptedTypes;
