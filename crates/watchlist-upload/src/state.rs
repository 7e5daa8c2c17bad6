use crate::client::UploadEvent;

/// Where one upload attempt stands, for display.
///
/// `Completed` and `Failed` are terminal for the attempt; picking another
/// file starts over from `Idle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Validating,
    Uploading { progress: f64 },
    Completed { url: String },
    Failed { message: String },
}

impl UploadState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadState::Completed { .. } | UploadState::Failed { .. })
    }

    pub fn reset(&mut self) {
        *self = UploadState::Idle;
    }

    pub fn begin_validation(&mut self) {
        *self = UploadState::Validating;
    }

    /// Validation rejected the file; no transfer will happen.
    pub fn reject(&mut self, message: impl Into<String>) {
        *self = UploadState::Failed { message: message.into() };
    }

    /// Fold an event into the state. Events arriving after a terminal
    /// state are ignored.
    pub fn apply(&mut self, event: &UploadEvent) {
        if self.is_terminal() {
            return;
        }
        *self = match event {
            UploadEvent::Progress(p) => {
                let previous = match self {
                    UploadState::Uploading { progress } => *progress,
                    _ => 0.0,
                };
                UploadState::Uploading { progress: p.max(previous).clamp(0.0, 100.0) }
            }
            UploadEvent::Completed(url) => UploadState::Completed { url: url.clone() },
            UploadEvent::Failed(e) => UploadState::Failed { message: e.to_string() },
        };
    }
}
