pub mod category;
pub mod entry;
pub mod filter;
pub mod rating;
pub mod status;

pub use category::{is_suggested, CATEGORY_SUGGESTIONS};
pub use entry::{EntryDraft, WatchlistEntry};
pub use filter::{FilterField, FilterState, FilterValueError};
pub use rating::{ParseRatingError, Rating};
pub use status::{ParseStatusError, WatchStatus};
