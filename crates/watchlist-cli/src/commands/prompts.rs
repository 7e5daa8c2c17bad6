use color_eyre::Result;
use dialoguer::{Input, Select};
use watchlist_models::{is_suggested, Rating, WatchStatus, CATEGORY_SUGGESTIONS};

const OTHER_CATEGORY: &str = "Other...";

/// Prompt for a string value with optional default
pub fn prompt_string(prompt: &str, default: Option<&str>, allow_empty: bool) -> Result<String> {
    let mut input_builder = Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty);

    if let Some(default_value) = default.filter(|d| !d.is_empty()) {
        input_builder = input_builder.default(default_value.to_string());
    }

    input_builder
        .interact_text()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read input: {}", e))
}

/// Pick a suggested category or type a custom one
pub fn prompt_category(default: Option<&str>) -> Result<String> {
    let mut items: Vec<&str> = CATEGORY_SUGGESTIONS.to_vec();
    items.push(OTHER_CATEGORY);

    // A custom category preselects "Other..." and becomes the text default
    let preselected = match default.map(str::trim).filter(|d| !d.is_empty()) {
        None => 0,
        Some(d) if !is_suggested(d) => items.len() - 1,
        Some(d) => CATEGORY_SUGGESTIONS
            .iter()
            .position(|c| c.eq_ignore_ascii_case(d))
            .unwrap_or(0),
    };

    let choice = Select::new()
        .with_prompt("Category")
        .items(&items)
        .default(preselected)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read selection: {}", e))?;

    if items[choice] == OTHER_CATEGORY {
        prompt_string("Category", default, false)
    } else {
        Ok(items[choice].to_string())
    }
}

pub fn prompt_status(default: Option<&str>) -> Result<String> {
    let labels: Vec<&str> = WatchStatus::ALL.iter().map(|s| s.label()).collect();
    let preselected = default
        .and_then(|d| d.parse::<WatchStatus>().ok())
        .and_then(|s| WatchStatus::ALL.iter().position(|x| *x == s))
        .unwrap_or(0);

    let choice = Select::new()
        .with_prompt("Status")
        .items(&labels)
        .default(preselected)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read selection: {}", e))?;
    Ok(labels[choice].to_string())
}

pub fn prompt_rating(default: Option<&str>) -> Result<String> {
    let ratings: Vec<String> = Rating::descending().map(|r| r.to_string()).collect();
    let preselected = default
        .and_then(|d| ratings.iter().position(|r| r == d.trim()))
        .unwrap_or(0);

    let choice = Select::new()
        .with_prompt("Rating")
        .items(&ratings)
        .default(preselected)
        .interact()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to read selection: {}", e))?;
    Ok(ratings[choice].clone())
}
