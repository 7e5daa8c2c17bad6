use watchlist_models::{FilterState, WatchlistEntry};

/// Entries passing every active predicate, in stored order.
pub fn visible_entries<'a>(entries: &'a [WatchlistEntry], filters: &FilterState) -> Vec<&'a WatchlistEntry> {
    entries.iter().filter(|e| filters.matches(e)).collect()
}
