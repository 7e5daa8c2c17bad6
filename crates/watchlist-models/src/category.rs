/// Categories offered as suggestions when entering or filtering titles.
///
/// The category field is free text; these are hints, never a constraint.
pub const CATEGORY_SUGGESTIONS: &[&str] = &[
    "Anime",
    "Marvel",
    "OTT Series",
    "Bollywood Movies",
    "South Movies",
    "Telugu Movies",
    "Hollywood Movies",
    "Hollywood Series",
];

/// Case-insensitive check against the suggestion list.
pub fn is_suggested(category: &str) -> bool {
    CATEGORY_SUGGESTIONS
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_suggested() {
        assert!(is_suggested("Anime"));
        assert!(is_suggested("hollywood movies"));
        assert!(!is_suggested("Documentaries"));
    }
}
