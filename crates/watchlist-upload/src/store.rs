use async_trait::async_trait;
use crate::progress::ProgressSink;

/// An object written to the remote store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// Access token issued with the upload response, if the provider sends one
    pub download_token: Option<String>,
}

/// Remote bucket addressed by key.
///
/// Implementations report upload progress through the sink; the caller owns
/// error classification (a failed `put_object` is a transfer failure, a
/// failed `download_url` a resolution failure).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn store_name(&self) -> &str;

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
        progress: ProgressSink,
    ) -> anyhow::Result<StoredObject>;

    /// Publicly fetchable URL for an uploaded object
    async fn download_url(&self, object: &StoredObject) -> anyhow::Result<String>;
}
