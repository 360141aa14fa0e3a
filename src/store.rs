//! The authoritative bookmark document and every operation that mutates it.
//!
//! Each mutation builds a fresh [`Document`] from a copy of the current one,
//! writes it to storage, and only then swaps it in. Readers holding an
//! `Arc<Document>` from before the mutation keep seeing the old value.

use std::sync::Arc;

use thiserror::Error;

use crate::document::{normalize_url, Category, CategoryId, Document, Website, WebsiteId};
use crate::storage::{Storage, StorageError, STORAGE_KEY};
use crate::util::strip_control_chars;

// ============================================================================
// Error Types
// ============================================================================

/// User input rejected before touching the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    #[error("A category with this name already exists")]
    DuplicateCategoryName(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to save bookmarks: {0}")]
    Storage(#[from] StorageError),
}

// ============================================================================
// Operation Inputs
// ============================================================================

/// Direction for the up/down website controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Editable website fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebsiteFields {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl WebsiteFields {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Pre-fill from an existing website (edit dialogs).
    pub fn from_website(website: &Website) -> Self {
        Self {
            name: website.name.clone(),
            url: website.url.clone(),
            description: website.description.clone().unwrap_or_default(),
        }
    }

    /// Sanitized `(name, normalized url, description)`, or `None` when name or
    /// url is blank.
    fn clean(&self) -> Option<(String, String, Option<String>)> {
        let name = strip_control_chars(&self.name).trim().to_string();
        let url = strip_control_chars(&self.url).trim().to_string();
        if name.is_empty() || url.is_empty() {
            return None;
        }
        let description = strip_control_chars(&self.description).trim().to_string();
        let description = (!description.is_empty()).then_some(description);
        Some((name, normalize_url(&url), description))
    }
}

/// Handle returned by [`DocumentStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&Document)>;

// ============================================================================
// Document Store
// ============================================================================

pub struct DocumentStore<S: Storage = Box<dyn Storage>> {
    storage: S,
    document: Arc<Document>,
    /// Bumped on every committed mutation.
    revision: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: Storage> DocumentStore<S> {
    /// Load the persisted document, seeding and persisting defaults when
    /// nothing usable is stored. Never fails: read and parse errors are logged
    /// and treated as "no data".
    pub fn load(storage: S) -> Self {
        match read_document(&storage) {
            Ok(Some(document)) => {
                tracing::info!(
                    categories = document.len(),
                    websites = document.website_count(),
                    "Loaded bookmarks"
                );
                return Self::with_document(storage, document);
            }
            Ok(None) => tracing::info!("No saved bookmarks, seeding defaults"),
            Err(e) => tracing::warn!(error = %e, "Saved bookmarks unreadable, seeding defaults"),
        }

        let store = Self::with_document(storage, Document::seed());
        if let Err(e) = write_document(&store.storage, &store.document) {
            tracing::error!(error = %e, "Failed to persist default bookmarks");
        }
        store
    }

    fn with_document(storage: S, document: Document) -> Self {
        Self {
            storage,
            document: Arc::new(document),
            revision: 0,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current document snapshot.
    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Register an observer called with the new document after every commit.
    pub fn subscribe(&mut self, observer: impl FnMut(&Document) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Persist `next`, then swap it in and notify observers.
    ///
    /// On a storage error the in-memory document is left untouched.
    fn commit(&mut self, next: Document, op: &'static str) -> Result<(), StoreError> {
        if let Err(e) = write_document(&self.storage, &next) {
            tracing::error!(op, error = %e, "Failed to persist bookmarks");
            return Err(e.into());
        }
        self.document = Arc::new(next);
        self.revision += 1;
        for (_, observer) in &mut self.observers {
            observer(&self.document);
        }
        tracing::debug!(op, revision = self.revision, "Committed bookmarks");
        Ok(())
    }

    fn draft(&self) -> Document {
        Document::clone(&self.document)
    }

    // ========================================================================
    // Category Operations
    // ========================================================================

    /// Append a new, empty category.
    pub fn add_category(&mut self, name: &str) -> Result<CategoryId, StoreError> {
        let clean = strip_control_chars(name);
        let clean = clean.trim();
        if clean.is_empty() {
            return Err(ValidationError::EmptyCategoryName.into());
        }
        if self.document.find_by_name(clean, None).is_some() {
            return Err(ValidationError::DuplicateCategoryName(clean.to_string()).into());
        }

        let id = CategoryId::generate();
        let mut next = self.draft();
        next.categories_mut().push(Category::new(id.clone(), clean));
        self.commit(next, "add_category")?;
        Ok(id)
    }

    /// Rename in place. Blank names and unknown ids are ignored.
    pub fn rename_category(&mut self, id: &CategoryId, new_name: &str) -> Result<bool, StoreError> {
        let clean = strip_control_chars(new_name);
        let clean = clean.trim();
        if clean.is_empty() {
            return Ok(false);
        }
        match self.document.category(id) {
            None => return Ok(false),
            Some(category) if category.name == clean => return Ok(false),
            Some(_) => {}
        }
        if self.document.find_by_name(clean, Some(id)).is_some() {
            return Err(ValidationError::DuplicateCategoryName(clean.to_string()).into());
        }

        let mut next = self.draft();
        if let Some(category) = next.category_mut(id) {
            category.name = clean.to_string();
        }
        self.commit(next, "rename_category")?;
        Ok(true)
    }

    /// Delete a category together with all of its websites.
    pub fn remove_category(&mut self, id: &CategoryId) -> Result<bool, StoreError> {
        let Some(index) = self.document.category_index(id) else {
            return Ok(false);
        };
        let mut next = self.draft();
        next.categories_mut().remove(index);
        self.commit(next, "remove_category")?;
        Ok(true)
    }

    /// Move `moved` to the position currently held by `target`.
    pub fn reorder_categories(
        &mut self,
        moved: &CategoryId,
        target: &CategoryId,
    ) -> Result<bool, StoreError> {
        if moved == target {
            return Ok(false);
        }
        let (Some(from), Some(to)) = (
            self.document.category_index(moved),
            self.document.category_index(target),
        ) else {
            return Ok(false);
        };
        let mut next = self.draft();
        move_within(next.categories_mut(), from, to);
        self.commit(next, "reorder_categories")?;
        Ok(true)
    }

    // ========================================================================
    // Website Operations
    // ========================================================================

    /// Append a website to `category_id`.
    ///
    /// Returns `None` without touching the document when name, url or the
    /// category id is blank, or the category does not exist.
    pub fn add_website(
        &mut self,
        category_id: &CategoryId,
        fields: &WebsiteFields,
    ) -> Result<Option<WebsiteId>, StoreError> {
        if category_id.is_blank() || self.document.category(category_id).is_none() {
            return Ok(None);
        }
        let Some((name, url, description)) = fields.clean() else {
            return Ok(None);
        };

        let id = WebsiteId::generate();
        let mut next = self.draft();
        if let Some(category) = next.category_mut(category_id) {
            category.websites.push(Website {
                id: id.clone(),
                name,
                url,
                description,
            });
        }
        self.commit(next, "add_website")?;
        Ok(Some(id))
    }

    /// Update a website in place, keeping its position.
    pub fn edit_website(
        &mut self,
        category_id: &CategoryId,
        website_id: &WebsiteId,
        fields: &WebsiteFields,
    ) -> Result<bool, StoreError> {
        let Some((name, url, description)) = fields.clean() else {
            return Ok(false);
        };
        let Some(current) = self
            .document
            .category(category_id)
            .and_then(|c| c.website(website_id))
        else {
            return Ok(false);
        };
        if current.name == name && current.url == url && current.description == description {
            return Ok(false);
        }

        let mut next = self.draft();
        if let Some(site) = next
            .category_mut(category_id)
            .and_then(|c| c.websites.iter_mut().find(|w| &w.id == website_id))
        {
            site.name = name;
            site.url = url;
            site.description = description;
        }
        self.commit(next, "edit_website")?;
        Ok(true)
    }

    pub fn remove_website(
        &mut self,
        category_id: &CategoryId,
        website_id: &WebsiteId,
    ) -> Result<bool, StoreError> {
        let Some(index) = self
            .document
            .category(category_id)
            .and_then(|c| c.website_index(website_id))
        else {
            return Ok(false);
        };
        let mut next = self.draft();
        if let Some(category) = next.category_mut(category_id) {
            category.websites.remove(index);
        }
        self.commit(next, "remove_website")?;
        Ok(true)
    }

    /// Swap a website with its neighbour. No-op at either end of the list.
    pub fn move_website(
        &mut self,
        category_id: &CategoryId,
        website_id: &WebsiteId,
        direction: Direction,
    ) -> Result<bool, StoreError> {
        let Some(category) = self.document.category(category_id) else {
            return Ok(false);
        };
        let Some(index) = category.website_index(website_id) else {
            return Ok(false);
        };
        let other = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < category.websites.len() => index + 1,
            _ => return Ok(false),
        };

        let mut next = self.draft();
        if let Some(category) = next.category_mut(category_id) {
            category.websites.swap(index, other);
        }
        self.commit(next, "move_website")?;
        Ok(true)
    }

    /// Move a website to the position currently held by `target` in the same
    /// category.
    pub fn reposition_website(
        &mut self,
        category_id: &CategoryId,
        website_id: &WebsiteId,
        target: &WebsiteId,
    ) -> Result<bool, StoreError> {
        if website_id == target {
            return Ok(false);
        }
        let Some(category) = self.document.category(category_id) else {
            return Ok(false);
        };
        let (Some(from), Some(to)) = (
            category.website_index(website_id),
            category.website_index(target),
        ) else {
            return Ok(false);
        };

        let mut next = self.draft();
        if let Some(category) = next.category_mut(category_id) {
            move_within(&mut category.websites, from, to);
        }
        self.commit(next, "reposition_website")?;
        Ok(true)
    }

    /// Move a website into another category, before `anchor` if given and
    /// present in the target, otherwise at the end.
    pub fn move_website_across(
        &mut self,
        website_id: &WebsiteId,
        source: &CategoryId,
        target: &CategoryId,
        anchor: Option<&WebsiteId>,
    ) -> Result<bool, StoreError> {
        if source == target {
            return Ok(false);
        }
        let Some(target_category) = self.document.category(target) else {
            return Ok(false);
        };
        let Some(from) = self
            .document
            .category(source)
            .and_then(|c| c.website_index(website_id))
        else {
            return Ok(false);
        };
        let insert_at = anchor.and_then(|a| target_category.website_index(a));

        let mut next = self.draft();
        let Some(website) = next
            .category_mut(source)
            .map(|c| c.websites.remove(from))
        else {
            return Ok(false);
        };
        if let Some(category) = next.category_mut(target) {
            match insert_at {
                Some(index) => category.websites.insert(index, website),
                None => category.websites.push(website),
            }
        }
        self.commit(next, "move_website_across")?;
        Ok(true)
    }

    // ========================================================================
    // Whole-document Operations
    // ========================================================================

    /// Replace everything with the built-in seed document.
    pub fn reset_to_defaults(&mut self) -> Result<(), StoreError> {
        self.commit(Document::seed(), "reset_to_defaults")
    }

    /// Replace everything with `document` (used by imports).
    pub fn replace(&mut self, document: Document) -> Result<(), StoreError> {
        self.commit(document, "replace")
    }
}

/// Read and parse the stored document. `Ok(None)` for a missing key or an
/// empty array.
fn read_document<S: Storage>(storage: &S) -> Result<Option<Document>, StorageError> {
    let Some(raw) = storage.get(STORAGE_KEY)? else {
        return Ok(None);
    };
    let document: Document = serde_json::from_str(&raw)?;
    Ok((!document.is_empty()).then_some(document))
}

fn write_document<S: Storage>(storage: &S, document: &Document) -> Result<(), StorageError> {
    let json = serde_json::to_string(document)?;
    storage.set(STORAGE_KEY, &json)
}

/// Remove the element at `from` and reinsert it at index `to`.
fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}
