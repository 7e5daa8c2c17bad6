use std::path::Path;
use tracing::debug;
use watchlist_config::AcceptedTypes;
use crate::error::UploadError;

/// Upper bound on an uploaded file, inclusive.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Declared types accepted when only images are allowed
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// A file picked for upload, held in memory with its declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk; the declared type comes from its extension.
    ///
    /// Files over [`MAX_FILE_SIZE`] are rejected from their metadata and
    /// never read.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let size = std::fs::metadata(path)?.len();
        if size > MAX_FILE_SIZE {
            debug!(path = %path.display(), size, "Selected file too large, not reading it");
            return Err(UploadError::TooLarge { size });
        }
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self {
            content_type: declared_type(path).to_string(),
            name,
            data,
        })
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Content type a file picker would declare for this path
pub fn declared_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "txt" | "text" | "md" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Size and type checks, run before any network activity.
pub fn validate(file: &SelectedFile, accept: AcceptedTypes) -> Result<(), UploadError> {
    debug!(name = %file.name, size = file.size(), content_type = %file.content_type, "Validating selected file");

    if file.size() > MAX_FILE_SIZE {
        return Err(UploadError::TooLarge { size: file.size() });
    }

    if accept == AcceptedTypes::Image && !IMAGE_CONTENT_TYPES.contains(&file.content_type.as_str()) {
        return Err(UploadError::UnsupportedType {
            content_type: file.content_type.clone(),
        });
    }

    Ok(())
}
