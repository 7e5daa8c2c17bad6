use thiserror::Error;
use tracing::debug;
use watchlist_models::{EntryDraft, ParseRatingError, ParseStatusError, WatchlistEntry};
use crate::picker::ImagePicker;
use crate::store::EntryStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidStatus(#[from] ParseStatusError),
    #[error(transparent)]
    InvalidRating(#[from] ParseRatingError),
}

/// Raw field values as entered, before typing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: Option<String>,
    pub year: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub rating: Option<String>,
    pub remarks: Option<String>,
    pub platform: Option<String>,
}

impl FormFields {
    pub fn from_entry(entry: &WatchlistEntry) -> Self {
        Self {
            name: Some(entry.name.clone()),
            year: Some(entry.year.clone()),
            category: Some(entry.category.clone()),
            status: Some(entry.status.to_string()),
            rating: Some(entry.rating.to_string()),
            remarks: Some(entry.remarks.clone()),
            platform: Some(entry.platform.clone()),
        }
    }

    /// Overlay every value set in `other` onto these fields.
    pub fn merge(self, other: FormFields) -> Self {
        Self {
            name: other.name.or(self.name),
            year: other.year.or(self.year),
            category: other.category.or(self.category),
            status: other.status.or(self.status),
            rating: other.rating.or(self.rating),
            remarks: other.remarks.or(self.remarks),
            platform: other.platform.or(self.platform),
        }
    }

    /// Required fields still blank, in form order
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("year", &self.year),
            ("category", &self.category),
            ("status", &self.status),
            ("rating", &self.rating),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(label, _)| label)
        .collect()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn required(value: &Option<String>, label: &'static str) -> Result<String, FormError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(FormError::MissingField(label)),
    }
}

/// What a submission did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(String),
    Updated(String),
}

impl Submitted {
    pub fn id(&self) -> &str {
        match self {
            Submitted::Created(id) | Submitted::Updated(id) => id,
        }
    }
}

/// Create/edit dialog for one entry
pub struct EntryForm {
    target: Option<WatchlistEntry>,
    pub fields: FormFields,
    picker: ImagePicker,
}

impl EntryForm {
    pub fn create() -> Self {
        Self {
            target: None,
            fields: FormFields::default(),
            picker: ImagePicker::new(None),
        }
    }

    /// Form pre-populated from an existing entry
    pub fn edit(entry: &WatchlistEntry) -> Self {
        Self {
            target: Some(entry.clone()),
            fields: FormFields::from_entry(entry),
            picker: ImagePicker::new(entry.image_url.clone()),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_edit() { "Edit Entry" } else { "Add New Entry" }
    }

    pub fn picker(&self) -> &ImagePicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut ImagePicker {
        &mut self.picker
    }

    /// Typed record from the current values plus the picker's durable URL
    pub fn draft(&self) -> Result<EntryDraft, FormError> {
        let f = &self.fields;
        Ok(EntryDraft {
            name: required(&f.name, "name")?,
            year: required(&f.year, "year")?,
            category: required(&f.category, "category")?,
            status: required(&f.status, "status")?.parse()?,
            rating: required(&f.rating, "rating")?.parse()?,
            remarks: f.remarks.clone().unwrap_or_default(),
            platform: f.platform.clone().unwrap_or_default(),
            image_url: self.picker.uploaded_url().map(str::to_string),
        })
    }

    /// Dispatch to the store and close the form.
    pub fn submit(self, store: &mut EntryStore) -> Result<Submitted, FormError> {
        let draft = self.draft()?;
        match self.target {
            Some(entry) => {
                debug!(id = %entry.id, "Submitting edit");
                store.update_entry(&entry.id, draft.into_entry(entry.id.clone()));
                Ok(Submitted::Updated(entry.id))
            }
            None => {
                debug!("Submitting new entry");
                Ok(Submitted::Created(store.add_entry(draft)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use watchlist_models::{Rating, WatchStatus};

    fn draft_named(name: &str) -> EntryDraft {
        EntryDraft {
            name: name.to_string(),
            year: "2016".to_string(),
            category: "Hollywood Movies".to_string(),
            status: WatchStatus::ToWatch,
            rating: Rating::new(9).unwrap(),
            remarks: String::new(),
            platform: String::new(),
            image_url: None,
        }
    }

    fn dune_fields() -> FormFields {
        FormFields {
            name: Some("Dune".to_string()),
            year: Some("2021".to_string()),
            category: Some("Hollywood Movies".to_string()),
            status: Some("To Watch".to_string()),
            rating: Some("8".to_string()),
            remarks: None,
            platform: None,
        }
    }

    #[test]
    fn test_create_adds_entry() {
        let mut store = EntryStore::open(MemoryBackend::new());
        let mut form = EntryForm::create();
        assert_eq!(form.title(), "Add New Entry");
        form.fields = dune_fields();

        let submitted = form.submit(&mut store).unwrap();
        assert!(matches!(submitted, Submitted::Created(_)));
        let entry = store.get(submitted.id()).unwrap();
        assert_eq!(entry.status, WatchStatus::ToWatch);
        assert_eq!(entry.rating, Rating::new(8).unwrap());
        assert_eq!(entry.remarks, "");
        assert_eq!(entry.image_url, None);
    }

    #[test]
    fn test_edit_updates_in_place() {
        let mut store = EntryStore::open(MemoryBackend::new());
        let mut form = EntryForm::create();
        form.fields = dune_fields();
        let id = form.submit(&mut store).unwrap().id().to_string();
        let other = store.add_entry(draft_named("Arrival"));

        let mut form = EntryForm::edit(store.get(&id).unwrap());
        assert_eq!(form.title(), "Edit Entry");
        assert_eq!(form.fields.name.as_deref(), Some("Dune"));
        form.fields.status = Some("Watched".to_string());

        assert_eq!(form.submit(&mut store).unwrap(), Submitted::Updated(id.clone()));
        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[0].id, id);
        assert_eq!(store.entries()[0].status, WatchStatus::Watched);
        assert_eq!(store.entries()[1].id, other);
    }

    #[test]
    fn test_edit_keeps_existing_image_and_picks_up_new_one() {
        let mut store = EntryStore::open(MemoryBackend::new());
        let mut draft = draft_named("Dune");
        draft.image_url = Some("https://old.png".to_string());
        let id = store.add_entry(draft);

        let form = EntryForm::edit(store.get(&id).unwrap());
        form.submit(&mut store).unwrap();
        assert_eq!(store.get(&id).unwrap().image_url.as_deref(), Some("https://old.png"));

        let mut form = EntryForm::edit(store.get(&id).unwrap());
        form.picker_mut().complete("https://new.png".to_string());
        form.submit(&mut store).unwrap();
        assert_eq!(store.get(&id).unwrap().image_url.as_deref(), Some("https://new.png"));
    }

    #[test]
    fn test_missing_required_fields() {
        let mut store = EntryStore::open(MemoryBackend::new());
        let mut form = EntryForm::create();
        form.fields = FormFields {
            name: Some("   ".to_string()),
            ..dune_fields()
        };
        assert_eq!(form.fields.missing_required(), vec!["name"]);
        assert_eq!(form.submit(&mut store).unwrap_err(), FormError::MissingField("name"));
        assert!(store.is_empty());

        assert_eq!(
            FormFields::default().missing_required(),
            vec!["name", "year", "category", "status", "rating"]
        );
    }

    #[test]
    fn test_invalid_typed_values() {
        let mut form = EntryForm::create();
        form.fields = FormFields { rating: Some("11".to_string()), ..dune_fields() };
        assert!(matches!(form.draft(), Err(FormError::InvalidRating(_))));

        form.fields = FormFields { status: Some("Paused".to_string()), ..dune_fields() };
        assert!(matches!(form.draft(), Err(FormError::InvalidStatus(_))));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = dune_fields();
        let merged = base.merge(FormFields {
            platform: Some("Prime".to_string()),
            name: Some("Dune: Part One".to_string()),
            ..FormFields::default()
        });
        assert_eq!(merged.name.as_deref(), Some("Dune: Part One"));
        assert_eq!(merged.platform.as_deref(), Some("Prime"));
        assert_eq!(merged.year.as_deref(), Some("2021"));
    }
}
