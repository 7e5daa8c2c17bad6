use thiserror::Error;

/// Everything that can end an upload attempt without a URL.
///
/// Messages are written for direct display next to the upload widget.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File size must be less than 5MB (got {size} bytes)")]
    TooLarge { size: u64 },

    #[error("Only JPG, PNG, GIF, and WebP images are allowed (got {content_type})")]
    UnsupportedType { content_type: String },

    #[error("Failed to upload file. Please try again.")]
    Transfer(String),

    #[error("Failed to get download URL. Please try again.")]
    Resolve(String),

    #[error("Could not read selected file: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Rejected before any network activity
    pub fn is_validation(&self) -> bool {
        matches!(self, UploadError::TooLarge { .. } | UploadError::UnsupportedType { .. })
    }

    /// Underlying cause, for logs; the display text stays user-facing.
    pub fn detail(&self) -> String {
        match self {
            UploadError::Transfer(cause) | UploadError::Resolve(cause) => cause.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UploadError::Transfer("connection reset".to_string());
        assert_eq!(err.to_string(), "Failed to upload file. Please try again.");
        assert_eq!(err.detail(), "connection reset");

        let err = UploadError::Resolve("404".to_string());
        assert_eq!(err.to_string(), "Failed to get download URL. Please try again.");
    }

    #[test]
    fn test_validation_classification() {
        assert!(UploadError::TooLarge { size: 1 }.is_validation());
        assert!(UploadError::UnsupportedType { content_type: "text/plain".into() }.is_validation());
        assert!(!UploadError::Transfer(String::new()).is_validation());
        assert!(!UploadError::Resolve(String::new()).is_validation());
    }
}
