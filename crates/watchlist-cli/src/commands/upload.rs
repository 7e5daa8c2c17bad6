use super::AppContext;
use crate::output::Output;
use crate::upload_ui::UploadProgressUi;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::path::Path;
use watchlist_config::AcceptedTypes;
use watchlist_upload::SelectedFile;

/// Upload one file and print where it can be downloaded from.
pub async fn run_upload(
    ctx: &AppContext,
    path: &Path,
    folder: Option<String>,
    accept: Option<AcceptedTypes>,
    output: &Output,
) -> Result<()> {
    let config = ctx.load_config()?;
    let folder = folder
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| config.upload.folder.clone());
    let accept = accept.unwrap_or(config.upload.accept);

    let client = ctx.upload_client(&config)?.with_accept(accept);
    let file = SelectedFile::from_path(path).map_err(|e| eyre!("{}", e))?;

    let attempt = client.start(file, &folder).map_err(|e| eyre!("{}", e))?;
    let key = attempt.key().to_string();

    let mut ui = UploadProgressUi::new(&key, output.is_quiet() || !output.is_human());
    match attempt.finish(|p| ui.update(p)).await {
        Ok(url) => {
            ui.finish("Done");
            if output.is_human() {
                output.success("Upload complete");
                output.render(&url);
            } else {
                output.json(&json!({ "type": "uploaded", "key": key, "url": url }));
            }
            Ok(())
        }
        Err(e) => {
            ui.abandon("Failed");
            Err(eyre!("{}", e))
        }
    }
}
