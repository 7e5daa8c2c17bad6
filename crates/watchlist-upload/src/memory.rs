use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use anyhow::anyhow;
use async_trait::async_trait;
use tracing::debug;
use crate::progress::ProgressSink;
use crate::store::{ObjectStore, StoredObject};

const CHUNK_SIZE: usize = 256 * 1024;

/// Object store kept in process memory.
///
/// Used for offline sessions and tests; URLs take the form `memory://<key>`.
/// Failures can be switched on to exercise the error paths.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    put_calls: AtomicUsize,
    fail_transfers: AtomicBool,
    fail_resolution: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_transfers(self) -> Self {
        self.set_fail_transfers(true);
        self
    }

    pub fn failing_resolution(self) -> Self {
        self.fail_resolution.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_fail_transfers(&self, fail: bool) {
        self.fail_transfers.store(fail, Ordering::SeqCst);
    }

    /// Number of `put_object` calls seen, successful or not
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn put_object(
        &self,
        key: &str,
        _content_type: &str,
        data: Vec<u8>,
        progress: ProgressSink,
    ) -> anyhow::Result<StoredObject> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        let mut sent = 0u64;
        for chunk in data.chunks(CHUNK_SIZE) {
            if self.fail_transfers.load(Ordering::SeqCst) {
                return Err(anyhow!("simulated network failure after {} bytes", sent));
            }
            sent += chunk.len() as u64;
            progress.report_bytes(sent);
            tokio::task::yield_now().await;
        }
        if self.fail_transfers.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated network failure"));
        }

        debug!(key, bytes = sent, "Stored object in memory");
        self.objects
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?
            .insert(key.to_string(), data);

        Ok(StoredObject {
            key: key.to_string(),
            download_token: None,
        })
    }

    async fn download_url(&self, object: &StoredObject) -> anyhow::Result<String> {
        if self.fail_resolution.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated metadata lookup failure for {}", object.key));
        }
        Ok(format!("memory://{}", object.key))
    }
}
