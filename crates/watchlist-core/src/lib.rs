pub mod backend;
pub mod form;
pub mod picker;
pub mod store;
pub mod view;

pub use backend::{FileBackend, MemoryBackend, SnapshotBackend, StoreSnapshot, SCHEMA_VERSION};
pub use form::{EntryForm, FormError, FormFields, Submitted};
pub use picker::ImagePicker;
pub use store::EntryStore;
pub use view::visible_entries;
