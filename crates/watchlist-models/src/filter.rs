use serde::{Deserialize, Serialize};
use std::fmt;
use crate::entry::WatchlistEntry;
use crate::rating::{ParseRatingError, Rating};
use crate::status::{ParseStatusError, WatchStatus};

/// The single, global set of predicates narrowing the visible entries.
///
/// An unset predicate matches everything. All set predicates must hold
/// (conjunction), so evaluation order never changes the result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<WatchStatus>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub search_term: String,
}

/// One key of the filter set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    SearchTerm,
    Category,
    Status,
    Rating,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterValueError {
    #[error(transparent)]
    Status(#[from] ParseStatusError),
    #[error(transparent)]
    Rating(#[from] ParseRatingError),
}

impl FilterState {
    pub fn is_match_all(&self) -> bool {
        self.category.is_none()
            && self.status.is_none()
            && self.rating.is_none()
            && self.search_term.is_empty()
    }

    /// Copy of this filter set with exactly one key replaced.
    ///
    /// An empty value resets the key to match-all. Category and search
    /// values are kept verbatim, so a category of `" "` is a real (if
    /// unlikely) category. Status and rating tolerate surrounding blanks.
    pub fn with(&self, field: FilterField, value: &str) -> Result<Self, FilterValueError> {
        let mut next = self.clone();
        let blank = value.trim().is_empty();
        match field {
            FilterField::SearchTerm => next.search_term = value.to_string(),
            FilterField::Category => {
                next.category = (!value.is_empty()).then(|| value.to_string());
            }
            FilterField::Status => {
                next.status = if blank { None } else { Some(value.parse()?) };
            }
            FilterField::Rating => {
                next.rating = if blank { None } else { Some(value.parse()?) };
            }
        }
        Ok(next)
    }

    pub fn matches_search(&self, entry: &WatchlistEntry) -> bool {
        self.search_term.is_empty()
            || entry
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
    }

    pub fn matches_category(&self, entry: &WatchlistEntry) -> bool {
        self.category.as_deref().map_or(true, |c| entry.category == c)
    }

    pub fn matches_status(&self, entry: &WatchlistEntry) -> bool {
        self.status.map_or(true, |s| entry.status == s)
    }

    pub fn matches_rating(&self, entry: &WatchlistEntry) -> bool {
        self.rating.map_or(true, |r| entry.rating == r)
    }

    pub fn matches(&self, entry: &WatchlistEntry) -> bool {
        self.matches_search(entry)
            && self.matches_category(entry)
            && self.matches_status(entry)
            && self.matches_rating(entry)
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterField::SearchTerm => "search",
            FilterField::Category => "category",
            FilterField::Status => "status",
            FilterField::Rating => "rating",
        };
        f.write_str(name)
    }
}
