use super::{report_persistence, AppContext};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchlist_models::{FilterField, FilterState};

/// Replace the keys given as flags; the others keep their value.
pub fn run_filter(
    ctx: &AppContext,
    search: Option<String>,
    category: Option<String>,
    status: Option<String>,
    rating: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut store = ctx.open_store();

    let changes = [
        (FilterField::SearchTerm, search),
        (FilterField::Category, category),
        (FilterField::Status, status),
        (FilterField::Rating, rating),
    ];

    // Every flag is checked before anything is saved
    let mut next = store.filters().clone();
    let mut changed = false;
    for (field, value) in changes {
        let Some(value) = value else { continue };
        next = next
            .with(field, &value)
            .map_err(|e| eyre!("Invalid {} filter: {}", field, e))?;
        changed = true;
    }

    if changed {
        store.set_filters(next);
        report_persistence(&store, ctx, output);
    }

    let filters = store.filters();
    if output.is_human() {
        if changed {
            output.success("Filters updated");
        }
        output.render(format!("Filters: {}", filter_summary(filters)));
    } else {
        output.json(&json!({ "type": "filters", "filters": filters }));
    }
    Ok(())
}

/// One-line description of the active filters
pub fn filter_summary(filters: &FilterState) -> String {
    if filters.is_match_all() {
        return "none (showing everything)".to_string();
    }
    let mut parts = Vec::new();
    if !filters.search_term.is_empty() {
        parts.push(format!("name contains \"{}\"", filters.search_term));
    }
    if let Some(category) = &filters.category {
        parts.push(format!("category = {}", category));
    }
    if let Some(status) = filters.status {
        parts.push(format!("status = {}", status));
    }
    if let Some(rating) = filters.rating {
        parts.push(format!("rating = {}", rating));
    }
    parts.join(", ")
}
