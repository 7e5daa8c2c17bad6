use super::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_config::{AcceptedTypes, Config};

pub fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config_file = ctx.config_file();
    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Defaults are in effect. Run 'watchlist config storage --bucket <name>' to set up uploads.");
    }
    let config = ctx.load_config()?;
    let api_key = config.storage.api_key.as_deref().unwrap_or_default();
    let api_key_display = if full { api_key.to_string() } else { mask_string(api_key) };

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "data_file": ctx.data_file().display().to_string(),
            "storage": {
                "bucket": &config.storage.bucket,
                "endpoint": &config.storage.endpoint,
                "api_key": api_key_display,
                "configured": config.is_storage_configured(),
            },
            "upload": {
                "folder": &config.upload.folder,
                "accept": config.upload.accept,
            },
        }));
        return Ok(());
    }

    let mut files = Table::new();
    files.set_header(vec![
        Cell::new("Files").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    files.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display().to_string())]);
    files.add_row(vec![Cell::new("Watchlist Data"), Cell::new(ctx.data_file().display().to_string())]);
    output.render(styled(files));

    let mut storage = Table::new();
    storage.set_header(vec![
        Cell::new("Storage").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    storage.add_row(vec![
        Cell::new("Configured"),
        Cell::new(if config.is_storage_configured() { "✓".green().to_string() } else { "✗".red().to_string() }),
    ]);
    storage.add_row(vec![
        Cell::new("Bucket"),
        Cell::new(if config.storage.bucket.is_empty() { "<not set>" } else { config.storage.bucket.as_str() }),
    ]);
    storage.add_row(vec![Cell::new("Endpoint"), Cell::new(&config.storage.endpoint)]);
    storage.add_row(vec![Cell::new("API Key"), Cell::new(api_key_display)]);
    output.render(styled(storage));

    let mut upload = Table::new();
    upload.set_header(vec![
        Cell::new("Uploads").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    upload.add_row(vec![Cell::new("Default Folder"), Cell::new(&config.upload.folder)]);
    upload.add_row(vec![Cell::new("Accepted Types"), Cell::new(accept_label(config.upload.accept))]);
    output.render(styled(upload));

    Ok(())
}

pub fn configure_storage(
    ctx: &AppContext,
    bucket: Option<String>,
    endpoint: Option<String>,
    api_key: Option<String>,
    output: &Output,
) -> Result<()> {
    if bucket.is_none() && endpoint.is_none() && api_key.is_none() {
        return Err(eyre!("Nothing to change: pass --bucket, --endpoint or --api-key"));
    }
    let mut config = ctx.load_config()?;

    if let Some(bucket) = bucket {
        config.storage.bucket = bucket.trim().to_string();
    }
    if let Some(endpoint) = endpoint {
        let endpoint = endpoint.trim().trim_end_matches('/').to_string();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(eyre!("Endpoint must start with http:// or https://"));
        }
        config.storage.endpoint = endpoint;
    }
    if let Some(api_key) = api_key {
        let api_key = api_key.trim().to_string();
        config.storage.api_key = (!api_key.is_empty()).then_some(api_key);
    }

    save(ctx, &config, output)?;
    if !config.is_storage_configured() {
        output.warn("Storage is still incomplete; uploads will fail until a bucket is set");
    }
    Ok(())
}

pub fn configure_upload(
    ctx: &AppContext,
    folder: Option<String>,
    accept: Option<AcceptedTypes>,
    output: &Output,
) -> Result<()> {
    if folder.is_none() && accept.is_none() {
        return Err(eyre!("Nothing to change: pass --folder or --accept"));
    }
    let mut config = ctx.load_config()?;

    if let Some(folder) = folder {
        let folder = folder.trim().trim_matches('/').to_string();
        if folder.is_empty() {
            return Err(eyre!("Upload folder cannot be empty"));
        }
        config.upload.folder = folder;
    }
    if let Some(accept) = accept {
        config.upload.accept = accept;
    }

    save(ctx, &config, output)
}

fn save(ctx: &AppContext, config: &Config, output: &Output) -> Result<()> {
    let config_file = ctx.config_file();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    tracing::info!(path = %config_file.display(), "Configuration saved");
    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn styled(mut table: Table) -> Table {
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn accept_label(accept: AcceptedTypes) -> &'static str {
    match accept {
        AcceptedTypes::Image => "images (JPG, PNG, GIF, WebP)",
        AcceptedTypes::Any => "any",
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    match (s.get(..2), s.get(s.len() - 2..)) {
        (Some(head), Some(tail)) => format!("{}***{}", head, tail),
        _ => "*".repeat(s.chars().count()),
    }
}
