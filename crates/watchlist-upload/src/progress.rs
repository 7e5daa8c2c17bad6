use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use crate::client::UploadEvent;

/// Turns byte counts from a transfer into percentage events.
///
/// Percentages never go backwards and stay within 0..=100, no matter how
/// many clones report or in what order.
#[derive(Clone)]
pub struct ProgressSink {
    tx: UnboundedSender<UploadEvent>,
    total: u64,
    sent: Arc<Mutex<Option<u64>>>,
}

impl ProgressSink {
    pub fn new(tx: UnboundedSender<UploadEvent>, total: u64) -> Self {
        Self {
            tx,
            total,
            sent: Arc::new(Mutex::new(None)),
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Record that `bytes` of the body have been handed to the transport.
    pub fn report_bytes(&self, bytes: u64) {
        let bytes = bytes.min(self.total);
        let Ok(mut last) = self.sent.lock() else {
            return;
        };
        if last.map_or(false, |prev| bytes <= prev) {
            return;
        }
        *last = Some(bytes);
        // Receiver gone means nobody is watching; the transfer carries on
        let _ = self.tx.send(UploadEvent::Progress(percent(bytes, self.total)));
    }

    pub fn complete(&self) {
        self.report_bytes(self.total);
    }
}

fn percent(bytes: u64, total: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (bytes as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}
