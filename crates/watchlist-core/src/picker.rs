use std::path::Path;
use tracing::debug;
use watchlist_config::POSTER_FOLDER;
use watchlist_upload::{SelectedFile, UploadClient, UploadError, UploadEvent, UploadState};

/// Poster image slot of the entry form.
///
/// Holds a local preview of the file just picked and the durable URL of the
/// last completed upload. The preview wins for display while it exists; a
/// completed upload discards it. Only the durable URL is ever handed to the
/// form.
#[derive(Debug, Default)]
pub struct ImagePicker {
    preview_url: Option<String>,
    image_url: Option<String>,
    state: UploadState,
}

impl ImagePicker {
    pub fn new(initial_url: Option<String>) -> Self {
        Self {
            preview_url: None,
            image_url: initial_url,
            state: UploadState::Idle,
        }
    }

    /// URL to show right now: preview first, then the uploaded image
    pub fn display_url(&self) -> Option<&str> {
        self.preview_url.as_deref().or(self.image_url.as_deref())
    }

    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// Durable URL; set only by a completed upload (or the initial entry)
    pub fn uploaded_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Take a new file: replaces any previous preview and restarts the
    /// upload state.
    ///
    /// The preview is set as soon as the file is found, before it is read
    /// or validated, and stays until a completed upload or another pick
    /// replaces it. A rejected file therefore still shows what was picked.
    pub fn select(&mut self, path: &Path) -> Result<SelectedFile, UploadError> {
        self.state.reset();
        let absolute = std::fs::canonicalize(path)?;
        self.preview_url = Some(format!("file://{}", absolute.display()));
        debug!(preview = ?self.preview_url, "Selected image");
        SelectedFile::from_path(path)
    }

    /// Upload finished: the remote URL becomes authoritative.
    pub fn complete(&mut self, url: String) {
        self.preview_url = None;
        self.image_url = Some(url);
    }

    /// Select `path` and upload it as a poster, reporting progress.
    ///
    /// On failure the previous durable URL stays in place; the preview is
    /// kept so the user still sees what they picked.
    pub async fn pick_and_upload<F>(
        &mut self,
        client: &UploadClient,
        path: &Path,
        on_progress: F,
    ) -> Result<String, UploadError>
    where
        F: FnMut(f64),
    {
        let file = match self.select(path) {
            Ok(file) => file,
            Err(e) => {
                self.state.reject(e.to_string());
                return Err(e);
            }
        };
        self.upload_selected(client, file, on_progress).await
    }

    /// Upload a file previously returned by [`select`](Self::select).
    pub async fn upload_selected<F>(
        &mut self,
        client: &UploadClient,
        file: SelectedFile,
        mut on_progress: F,
    ) -> Result<String, UploadError>
    where
        F: FnMut(f64),
    {
        self.state.begin_validation();
        let mut attempt = match client.start(file, POSTER_FOLDER) {
            Ok(attempt) => attempt,
            Err(e) => {
                self.state.reject(e.to_string());
                return Err(e);
            }
        };

        while let Some(event) = attempt.next_event().await {
            self.state.apply(&event);
            match event {
                UploadEvent::Progress(p) => on_progress(p),
                UploadEvent::Completed(url) => {
                    self.complete(url.clone());
                    return Ok(url);
                }
                UploadEvent::Failed(e) => return Err(e),
            }
        }
        Err(UploadError::Transfer("upload attempt ended without a result".to_string()))
    }
}
