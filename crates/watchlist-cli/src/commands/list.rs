use super::filter::filter_summary;
use super::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_core::visible_entries;
use watchlist_models::{WatchStatus, WatchlistEntry};

const SHORT_ID_LEN: usize = 8;

pub fn run_list(ctx: &AppContext, output: &Output) -> Result<()> {
    let store = ctx.open_store();
    let filters = store.filters().clone();
    let visible = visible_entries(store.entries(), &filters);
    tracing::debug!(total = store.len(), visible = visible.len(), "Listing entries");

    if !output.is_human() {
        output.json(&json!({
            "total": store.len(),
            "filters": filters,
            "entries": visible,
        }));
        return Ok(());
    }

    if store.is_empty() {
        output.info("Your watchlist is empty. Add something with 'watchlist add'.");
        return Ok(());
    }

    if visible.is_empty() {
        output.info("No entries match the current filters.");
    } else {
        output.render(entries_table(&visible));
    }

    output.render(format!(
        "Showing {} of {} entries",
        visible.len().to_string().bold(),
        store.len()
    ));
    if !filters.is_match_all() {
        output.render(format!("Filters: {}", filter_summary(&filters).dimmed()));
    }
    Ok(())
}

fn entries_table(entries: &[&WatchlistEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(
        ["Name", "Year", "Category", "Status", "Rating", "Platform", "ID"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    for entry in entries {
        let mut name = entry.name.clone();
        if entry.image_url.is_some() {
            name.push_str(" 🖼");
        }
        table.add_row(vec![
            Cell::new(name),
            Cell::new(&entry.year),
            Cell::new(&entry.category),
            Cell::new(entry.status.label()).fg(status_color(entry.status)),
            Cell::new(format!("{}/10", entry.rating)),
            Cell::new(if entry.platform.is_empty() { "-" } else { entry.platform.as_str() }),
            Cell::new(short_id(&entry.id)).fg(Color::DarkGrey),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn status_color(status: WatchStatus) -> Color {
    match status {
        WatchStatus::Watched => Color::Green,
        WatchStatus::CurrentlyWatching => Color::Yellow,
        WatchStatus::ToWatch => Color::Cyan,
    }
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
