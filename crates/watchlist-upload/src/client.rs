use std::sync::Arc;
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info};
use watchlist_config::AcceptedTypes;
use crate::error::UploadError;
use crate::file::{validate, SelectedFile};
use crate::naming::object_key;
use crate::progress::ProgressSink;
use crate::store::ObjectStore;

/// Folder used when the caller does not name one
pub const DEFAULT_FOLDER: &str = watchlist_config::DEFAULT_UPLOAD_FOLDER;

/// Notification from a running upload attempt.
///
/// An attempt emits zero or more `Progress` events with non-decreasing
/// percentages, then exactly one of `Completed` or `Failed`, then nothing.
#[derive(Debug)]
pub enum UploadEvent {
    Progress(f64),
    Completed(String),
    Failed(UploadError),
}

impl UploadEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, UploadEvent::Progress(_))
    }
}

/// Validates files and streams them into an object store
#[derive(Clone)]
pub struct UploadClient {
    store: Arc<dyn ObjectStore>,
    accept: AcceptedTypes,
}

impl UploadClient {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            accept: AcceptedTypes::Image,
        }
    }

    pub fn with_accept(mut self, accept: AcceptedTypes) -> Self {
        self.accept = accept;
        self
    }

    pub fn accept(&self) -> AcceptedTypes {
        self.accept
    }

    /// Begin one upload attempt.
    ///
    /// Validation failures are returned here, before any network activity.
    /// Otherwise the transfer runs on a spawned task and the returned
    /// attempt yields its events. There is no cancel: dropping the attempt
    /// only stops listening.
    pub fn start(&self, file: SelectedFile, folder: &str) -> Result<UploadAttempt, UploadError> {
        validate(&file, self.accept)?;

        let key = object_key(folder, Utc::now().timestamp_millis(), &file.name);
        let (tx, rx) = mpsc::unbounded_channel();
        let store = Arc::clone(&self.store);
        let task_key = key.clone();

        info!(
            store = store.store_name(),
            key = %key,
            size = file.size(),
            content_type = %file.content_type,
            "Starting upload"
        );

        tokio::spawn(async move {
            let sink = ProgressSink::new(tx.clone(), file.size());
            sink.report_bytes(0);
            let terminal = match transfer(store.as_ref(), &task_key, file, &sink).await {
                Ok(url) => {
                    info!(key = %task_key, "Upload completed");
                    UploadEvent::Completed(url)
                }
                Err(e) => {
                    error!(key = %task_key, error = %e.detail(), "{}", e);
                    UploadEvent::Failed(e)
                }
            };
            let _ = tx.send(terminal);
        });

        Ok(UploadAttempt { key, events: rx, done: false })
    }
}

async fn transfer(
    store: &dyn ObjectStore,
    key: &str,
    file: SelectedFile,
    sink: &ProgressSink,
) -> Result<String, UploadError> {
    let object = store
        .put_object(key, &file.content_type, file.data, sink.clone())
        .await
        .map_err(|e| UploadError::Transfer(format!("{:#}", e)))?;
    sink.complete();

    store
        .download_url(&object)
        .await
        .map_err(|e| UploadError::Resolve(format!("{:#}", e)))
}

/// Handle on a running upload
pub struct UploadAttempt {
    key: String,
    events: mpsc::UnboundedReceiver<UploadEvent>,
    done: bool,
}

impl UploadAttempt {
    /// Object key the file is being written to
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Next event, or `None` once the terminal event has been delivered.
    pub async fn next_event(&mut self) -> Option<UploadEvent> {
        if self.done {
            return None;
        }
        let event = match self.events.recv().await {
            Some(event) => event,
            // Task died without a verdict
            None => UploadEvent::Failed(UploadError::Transfer(
                "upload task ended without a result".to_string(),
            )),
        };
        if event.is_terminal() {
            self.done = true;
        }
        Some(event)
    }

    /// Drive the attempt to its terminal result, forwarding progress.
    pub async fn finish<F>(mut self, mut on_progress: F) -> Result<String, UploadError>
    where
        F: FnMut(f64),
    {
        while let Some(event) = self.next_event().await {
            match event {
                UploadEvent::Progress(p) => on_progress(p),
                UploadEvent::Completed(url) => return Ok(url),
                UploadEvent::Failed(e) => return Err(e),
            }
        }
        Err(UploadError::Transfer("upload attempt already finished".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryObjectStore;

    const MIB: usize = 1024 * 1024;

    fn client(store: &Arc<MemoryObjectStore>) -> UploadClient {
        UploadClient::new(store.clone() as Arc<dyn ObjectStore>)
    }

    #[tokio::test]
    async fn test_oversized_file_never_reaches_store() {
        let store = Arc::new(MemoryObjectStore::new());
        let file = SelectedFile::new("huge.jpg", "image/jpeg", vec![0; 6 * MIB]);

        let err = client(&store).start(file, DEFAULT_FOLDER).err().unwrap();
        assert!(matches!(err, UploadError::TooLarge { .. }));
        assert_eq!(store.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_text_file_rejected_under_image_filter() {
        let store = Arc::new(MemoryObjectStore::new());
        let file = SelectedFile::new("notes.txt", "text/plain", b"hi".to_vec());

        let err = client(&store).start(file, DEFAULT_FOLDER).err().unwrap();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
        assert_eq!(store.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_any_filter_accepts_text() {
        let store = Arc::new(MemoryObjectStore::new());
        let file = SelectedFile::new("notes.txt", "text/plain", b"hi".to_vec());

        let attempt = client(&store)
            .with_accept(AcceptedTypes::Any)
            .start(file, "docs")
            .unwrap();
        assert!(attempt.key().starts_with("docs/"));
        assert!(attempt.finish(|_| {}).await.is_ok());
    }

    #[tokio::test]
    async fn test_jpeg_upload_progress_and_single_completion() {
        let store = Arc::new(MemoryObjectStore::new());
        let file = SelectedFile::new("dune poster.jpg", "image/jpeg", vec![7; 2 * MIB]);

        let mut attempt = client(&store).start(file, "movie-images").unwrap();
        assert!(attempt.key().starts_with("movie-images/"));
        assert!(attempt.key().ends_with("_dune_poster.jpg"));

        let mut progress = Vec::new();
        let mut completions = Vec::new();
        while let Some(event) = attempt.next_event().await {
            match event {
                UploadEvent::Progress(p) => {
                    assert!(completions.is_empty(), "progress after terminal event");
                    progress.push(p);
                }
                UploadEvent::Completed(url) => completions.push(url),
                UploadEvent::Failed(e) => panic!("unexpected failure: {}", e),
            }
        }

        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0], format!("memory://{}", attempt.key()));
        assert!(progress.len() > 2);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.first().copied(), Some(0.0));
        assert_eq!(progress.last().copied(), Some(100.0));
        assert!(progress.iter().all(|p| (0.0..=100.0).contains(p)));
        assert_eq!(store.object(attempt.key()).map(|o| o.len()), Some(2 * MIB));
    }

    #[tokio::test]
    async fn test_transfer_failure_is_reported_once() {
        let store = Arc::new(MemoryObjectStore::new().failing_transfers());
        let file = SelectedFile::new("a.png", "image/png", vec![1; 1024]);

        let err = client(&store).start(file, DEFAULT_FOLDER).unwrap().finish(|_| {}).await.unwrap_err();
        assert!(matches!(err, UploadError::Transfer(_)));
    }

    #[tokio::test]
    async fn test_resolution_failure_is_distinct() {
        let store = Arc::new(MemoryObjectStore::new().failing_resolution());
        let file = SelectedFile::new("a.gif", "image/gif", vec![1; 1024]);

        let err = client(&store).start(file, DEFAULT_FOLDER).unwrap().finish(|_| {}).await.unwrap_err();
        assert!(matches!(err, UploadError::Resolve(_)));
        // The bytes did land before the URL lookup failed
        assert_eq!(store.put_calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_after_failure_is_a_fresh_attempt() {
        let store = Arc::new(MemoryObjectStore::new().failing_transfers());
        let file = SelectedFile::new("a.webp", "image/webp", vec![1; 10]);
        let upload = client(&store);

        assert!(upload.start(file.clone(), DEFAULT_FOLDER).unwrap().finish(|_| {}).await.is_err());
        store.set_fail_transfers(false);
        let url = upload.start(file, DEFAULT_FOLDER).unwrap().finish(|_| {}).await.unwrap();
        assert!(url.starts_with("memory://uploads/"));
    }
}
