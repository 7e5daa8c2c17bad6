use super::{prompts, report_persistence, AppContext};
use crate::output::Output;
use crate::upload_ui::UploadProgressUi;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::path::{Path, PathBuf};
use watchlist_core::{EntryForm, EntryStore, FormFields, Submitted};

pub async fn run_add(
    ctx: &AppContext,
    fields: FormFields,
    image: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut store = ctx.open_store();
    let mut form = EntryForm::create();
    form.fields = fields;

    fill_form(&mut form, false, ctx.is_interactive())?;
    // Bad status or rating must fail before anything is uploaded
    form.draft().map_err(|e| eyre!("{}", e))?;
    if let Some(path) = image {
        attach_poster(ctx, &mut form, &path, output).await?;
    }
    submit(form, &mut store, ctx, output)
}

pub async fn run_edit(
    ctx: &AppContext,
    id: &str,
    fields: FormFields,
    image: Option<PathBuf>,
    interactive: bool,
    output: &Output,
) -> Result<()> {
    let mut store = ctx.open_store();
    let Some(entry) = store.resolve_id(id).and_then(|full| store.get(&full).cloned()) else {
        output.warn(format!("No entry matches '{}'; nothing changed", id));
        return Ok(());
    };

    let mut form = EntryForm::edit(&entry);
    form.fields = form.fields.clone().merge(fields);

    if interactive {
        fill_form(&mut form, true, ctx.is_interactive())?;
    }
    form.draft().map_err(|e| eyre!("{}", e))?;
    if let Some(path) = image {
        attach_poster(ctx, &mut form, &path, output).await?;
    }
    submit(form, &mut store, ctx, output)
}

pub fn run_delete(ctx: &AppContext, id: &str, output: &Output) -> Result<()> {
    let mut store = ctx.open_store();
    let Some(full_id) = store.resolve_id(id) else {
        output.warn(format!("No entry matches '{}'; nothing deleted", id));
        return Ok(());
    };
    let name = store.get(&full_id).map(|e| e.name.clone()).unwrap_or_default();

    store.delete_entry(&full_id);
    report_persistence(&store, ctx, output);

    if output.is_human() {
        output.success(format!("Deleted '{}'", name));
    } else {
        output.json(&json!({ "type": "deleted", "id": full_id, "name": name }));
    }
    Ok(())
}

/// Prompt for whatever the form still needs.
///
/// With `prompt_all` every field is asked for, current values offered as
/// defaults. Otherwise only blank required fields (plus the optional ones
/// nobody supplied) are asked for, and only if anything required is missing.
fn fill_form(form: &mut EntryForm, prompt_all: bool, interactive: bool) -> Result<()> {
    let missing = form.fields.missing_required();
    if !prompt_all && missing.is_empty() {
        return Ok(());
    }
    if !interactive {
        if missing.is_empty() {
            return Err(eyre!("--interactive needs a terminal"));
        }
        return Err(eyre!(
            "Missing required field(s): {} (pass them as flags, e.g. --{})",
            missing.join(", "),
            missing.first().copied().unwrap_or("name")
        ));
    }

    println!("{}", form.title());
    let fields = &mut form.fields;
    let ask = |value: &Option<String>| prompt_all || value.as_deref().map_or(true, |v| v.trim().is_empty());

    if ask(&fields.name) {
        fields.name = Some(prompts::prompt_string("Movie/Series Name", fields.name.as_deref(), false)?);
    }
    if ask(&fields.year) {
        fields.year = Some(prompts::prompt_string("Release Year (e.g. 2022-2024)", fields.year.as_deref(), false)?);
    }
    if ask(&fields.category) {
        fields.category = Some(prompts::prompt_category(fields.category.as_deref())?);
    }
    if ask(&fields.status) {
        fields.status = Some(prompts::prompt_status(fields.status.as_deref())?);
    }
    if ask(&fields.rating) {
        fields.rating = Some(prompts::prompt_rating(fields.rating.as_deref())?);
    }
    if prompt_all || fields.remarks.is_none() {
        fields.remarks = Some(prompts::prompt_string("Remarks", fields.remarks.as_deref(), true)?);
    }
    if prompt_all || fields.platform.is_none() {
        fields.platform = Some(prompts::prompt_string("Streaming Platform", fields.platform.as_deref(), true)?);
    }
    Ok(())
}

/// Upload a poster through the form's picker.
///
/// Upload problems are reported and the entry is saved with whatever image
/// it already had.
async fn attach_poster(ctx: &AppContext, form: &mut EntryForm, path: &Path, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    let client = match ctx.upload_client(&config) {
        Ok(client) => client,
        Err(e) => {
            output.error(format!("Cannot upload poster: {}", e));
            output.warn("Saving the entry without a new image");
            return Ok(());
        }
    };

    let picker = form.picker_mut();
    let selected = picker.select(path);
    if let Some(url) = picker.display_url() {
        output.info(format!("Image preview: {}", url));
    }
    let file = match selected {
        Ok(file) => file,
        Err(e) => {
            output.error(format!("Cannot use {}: {}", path.display(), e));
            output.warn("Saving the entry without a new image");
            return Ok(());
        }
    };

    let label = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let mut ui = UploadProgressUi::new(&label, output.is_quiet() || !output.is_human());
    match picker.upload_selected(&client, file, |p| ui.update(p)).await {
        Ok(_) => {
            ui.finish("Uploaded");
            output.success("Poster uploaded");
        }
        Err(e) => {
            ui.abandon("Failed");
            tracing::warn!(error = %e.detail(), "Poster upload failed");
            output.error(e.to_string());
            output.warn("Saving the entry without a new image");
        }
    }
    match picker.uploaded_url() {
        Some(url) => output.info(format!("Image: {}", url)),
        None => output.info("Image: none"),
    }
    Ok(())
}

fn submit(form: EntryForm, store: &mut EntryStore, ctx: &AppContext, output: &Output) -> Result<()> {
    let submitted = form.submit(store).map_err(|e| eyre!("{}", e))?;
    report_persistence(store, ctx, output);

    let entry = store
        .get(submitted.id())
        .ok_or_else(|| eyre!("Entry {} vanished after submit", submitted.id()))?;

    let (verb, kind) = match submitted {
        Submitted::Created(_) => ("Added", "created"),
        Submitted::Updated(_) => ("Updated", "updated"),
    };
    if output.is_human() {
        output.success(format!("{} '{}' ({})", verb, entry.name, entry.id));
    } else {
        output.json(&json!({ "type": kind, "entry": entry }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::sync::Arc;
    use watchlist_config::PathManager;
    use watchlist_models::{Rating, WatchStatus};
    use watchlist_upload::{MemoryObjectStore, ObjectStore};

    fn context(dir: &Path) -> AppContext {
        AppContext::with_paths(PathManager::from_base(dir), None, false)
    }

    fn output() -> Output {
        Output::new(OutputFormat::Json, true)
    }

    fn dune() -> FormFields {
        FormFields {
            name: Some("Dune".to_string()),
            year: Some("2021".to_string()),
            category: Some("Hollywood Movies".to_string()),
            status: Some("To Watch".to_string()),
            rating: Some("9".to_string()),
            remarks: None,
            platform: Some("HBO Max".to_string()),
        }
    }

    fn poster(dir: &Path) -> PathBuf {
        let path = dir.join("dune.png");
        std::fs::write(&path, vec![7u8; 2048]).unwrap();
        path
    }

    #[tokio::test]
    async fn test_add_without_terminal_lists_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let fields = FormFields {
            name: Some("Dune".to_string()),
            ..FormFields::default()
        };

        let err = run_add(&ctx, fields, None, &output()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("year"));
        assert!(message.contains("rating"));
        assert!(ctx.open_store().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_rating_fails_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new());
        let ctx = context(dir.path()).with_object_store(store.clone() as Arc<dyn ObjectStore>);
        let fields = FormFields {
            rating: Some("11".to_string()),
            ..dune()
        };

        let err = run_add(&ctx, fields, Some(poster(dir.path())), &output()).await.unwrap_err();
        assert!(err.to_string().contains("invalid rating"));
        assert_eq!(store.put_calls(), 0);
        assert!(ctx.open_store().is_empty());

        let fields = FormFields {
            status: Some("Paused".to_string()),
            ..dune()
        };
        assert!(run_add(&ctx, fields, Some(poster(dir.path())), &output()).await.is_err());
        assert_eq!(store.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_add_with_poster_stores_uploaded_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new());
        let ctx = context(dir.path()).with_object_store(store.clone() as Arc<dyn ObjectStore>);

        run_add(&ctx, dune(), Some(poster(dir.path())), &output()).await.unwrap();

        let saved = ctx.open_store();
        let entry = &saved.entries()[0];
        assert_eq!(store.put_calls(), 1);
        let url = entry.image_url.as_deref().unwrap();
        assert!(url.starts_with("memory://movie-images/"));
        assert!(url.ends_with("_dune.png"));
    }

    #[tokio::test]
    async fn test_failed_poster_upload_still_saves_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryObjectStore::new().failing_transfers());
        let ctx = context(dir.path()).with_object_store(store as Arc<dyn ObjectStore>);

        run_add(&ctx, dune(), Some(poster(dir.path())), &output()).await.unwrap();

        let saved = ctx.open_store();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.entries()[0].image_url, None);
    }

    #[tokio::test]
    async fn test_edit_by_prefix_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        run_add(&ctx, dune(), None, &output()).await.unwrap();
        let id = ctx.open_store().entries()[0].id.clone();

        let changes = FormFields {
            status: Some("Watched".to_string()),
            rating: Some("10".to_string()),
            ..FormFields::default()
        };
        run_edit(&ctx, &id[..8], changes, None, false, &output()).await.unwrap();

        let saved = ctx.open_store();
        let entry = saved.get(&id).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(entry.status, WatchStatus::Watched);
        assert_eq!(entry.rating, Rating::new(10).unwrap());
        assert_eq!(entry.name, "Dune");
        assert_eq!(entry.platform, "HBO Max");
    }

    #[tokio::test]
    async fn test_edit_unknown_id_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        run_add(&ctx, dune(), None, &output()).await.unwrap();
        let before = ctx.open_store().entries().to_vec();

        run_edit(&ctx, "no-such-id", dune(), None, false, &output()).await.unwrap();
        assert_eq!(ctx.open_store().entries(), before.as_slice());
    }

    #[tokio::test]
    async fn test_delete_by_prefix_and_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        run_add(&ctx, dune(), None, &output()).await.unwrap();
        let id = ctx.open_store().entries()[0].id.clone();

        run_delete(&ctx, "no-such-id", &output()).unwrap();
        assert_eq!(ctx.open_store().len(), 1);

        run_delete(&ctx, &id[..8], &output()).unwrap();
        assert!(ctx.open_store().is_empty());
    }
}
