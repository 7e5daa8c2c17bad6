use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Progress display for one upload attempt.
///
/// Draws a bar on a terminal; otherwise emits a structured log line at
/// every quarter so unattended runs still show movement.
pub struct UploadProgressUi {
    bar: Option<ProgressBar>,
    label: String,
    last_logged_quarter: Option<u8>,
}

impl UploadProgressUi {
    pub fn new(label: &str, quiet: bool) -> Self {
        let bar = (is_interactive() && !quiet).then(|| {
            let pb = ProgressBar::new(100);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            pb.set_message(format!("Uploading {}", label));
            pb
        });
        Self {
            bar,
            label: label.to_string(),
            last_logged_quarter: None,
        }
    }

    pub fn update(&mut self, percent: f64) {
        let rounded = percent.round().clamp(0.0, 100.0) as u64;
        match &self.bar {
            Some(bar) => bar.set_position(rounded),
            None => {
                let quarter = (rounded / 25) as u8;
                if self.last_logged_quarter.map_or(true, |q| quarter > q) {
                    self.last_logged_quarter = Some(quarter);
                    tracing::info!(
                        operation = "upload",
                        file = %self.label,
                        percent = rounded,
                        "Upload progress"
                    );
                }
            }
        }
    }

    pub fn finish(&self, msg: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(msg.to_string());
        }
    }

    pub fn abandon(&self, msg: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(msg.to_string());
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
