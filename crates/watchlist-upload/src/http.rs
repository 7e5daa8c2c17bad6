use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{Body, Client};
use serde::Deserialize;
use tracing::{debug, warn};
use watchlist_config::StorageConfig;
use crate::progress::ProgressSink;
use crate::store::{ObjectStore, StoredObject};

/// Request body is streamed in pieces this size; one progress event per piece.
const CHUNK_SIZE: usize = 64 * 1024;

/// Object metadata as returned by the storage REST API
#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    name: String,
    #[serde(default)]
    bucket: Option<String>,
    #[serde(rename = "downloadTokens", default)]
    download_tokens: Option<String>,
}

/// Client for a Firebase-Storage-style bucket over HTTPS
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    bucket: String,
    api_key: Option<String>,
}

pub fn create_storage_client() -> Client {
    Client::builder()
        .user_agent(concat!("watchlist/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>, bucket: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: create_storage_client(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            api_key,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.endpoint.clone(), config.bucket.clone(), config.api_key.clone())
    }

    fn bucket_url(&self) -> String {
        format!("{}/v0/b/{}/o", self.endpoint, urlencoding::encode(&self.bucket))
    }

    /// Media upload endpoint for `key`
    pub fn upload_url(&self, key: &str) -> String {
        let mut url = format!("{}?uploadType=media&name={}", self.bucket_url(), urlencoding::encode(key));
        if let Some(api_key) = &self.api_key {
            url.push_str(&format!("&key={}", urlencoding::encode(api_key)));
        }
        url
    }

    /// Metadata endpoint for `key`; the whole key is one encoded path segment
    pub fn metadata_url(&self, key: &str) -> String {
        let mut url = format!("{}/{}", self.bucket_url(), urlencoding::encode(key));
        if let Some(api_key) = &self.api_key {
            url.push_str(&format!("?key={}", urlencoding::encode(api_key)));
        }
        url
    }

    /// Public download URL carrying an access token
    pub fn public_url(&self, key: &str, token: &str) -> String {
        format!(
            "{}/{}?alt=media&token={}",
            self.bucket_url(),
            urlencoding::encode(key),
            urlencoding::encode(token)
        )
    }

    async fn fetch_metadata(&self, key: &str) -> Result<ObjectMetadata> {
        let response = self.client.get(self.metadata_url(key)).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Metadata request for {} failed with status {}: {}", key, status, body));
        }
        Ok(response.json::<ObjectMetadata>().await?)
    }
}

/// Providers may issue several comma-separated tokens; any one works.
fn first_token(tokens: Option<&str>) -> Option<String> {
    tokens?
        .split(',')
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn store_name(&self) -> &str {
        "http"
    }

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        data: Vec<u8>,
        progress: ProgressSink,
    ) -> Result<StoredObject> {
        let total = data.len();
        let chunks: Vec<Vec<u8>> = data.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
        let mut sent = 0u64;
        let body_progress = progress.clone();
        let body = futures::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            body_progress.report_bytes(sent);
            Ok::<_, std::io::Error>(chunk)
        }));

        debug!(key, bucket = %self.bucket, bytes = total, "Uploading object");
        let response = self
            .client
            .post(self.upload_url(key))
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, total)
            .body(Body::wrap_stream(body))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Upload of {} failed with status {}: {}", key, status, body));
        }

        let metadata: ObjectMetadata = response.json().await?;
        if metadata.bucket.as_deref().map_or(false, |b| b != self.bucket) {
            warn!(expected = %self.bucket, got = ?metadata.bucket, "Upload landed in an unexpected bucket");
        }

        Ok(StoredObject {
            key: metadata.name,
            download_token: first_token(metadata.download_tokens.as_deref()),
        })
    }

    async fn download_url(&self, object: &StoredObject) -> Result<String> {
        let token = match &object.download_token {
            Some(token) => token.clone(),
            None => {
                debug!(key = %object.key, "No token in upload response, fetching metadata");
                let metadata = self.fetch_metadata(&object.key).await?;
                first_token(metadata.download_tokens.as_deref())
                    .ok_or_else(|| anyhow!("No download token issued for {}", object.key))?
            }
        };
        Ok(self.public_url(&object.key, &token))
    }
}
