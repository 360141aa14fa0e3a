//! Import and export of the bookmark document as a JSON file.
//!
//! Imports are validated before anything is replaced, and the current
//! document is backed up under a timestamped storage key first.

use crate::document::Document;
use crate::storage::{Storage, StorageError, STORAGE_KEY};
use crate::store::{DocumentStore, StoreError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Largest file accepted by [`read_document_file`].
const MAX_IMPORT_SIZE: u64 = 10 * 1_048_576;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is not a valid bookmark document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import file too large: {0} bytes")]
    TooLarge(u64),

    #[error("Import file contains no categories")]
    Empty,

    #[error("Import file has a blank or repeated id: {0:?}")]
    BadId(String),

    #[error("Import file has a category without a name")]
    BlankName,

    #[error("Import file has more than one category named {0:?}")]
    DuplicateName(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read and validate a document file for import.
pub fn read_document_file(path: &Path) -> Result<Document, TransferError> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_IMPORT_SIZE {
        return Err(TransferError::TooLarge(size));
    }
    let content = std::fs::read_to_string(path)?;
    let document: Document = serde_json::from_str(&content)?;
    validate(&document)?;
    Ok(document)
}

/// Reject empty documents, ids that are blank or used twice, and category
/// names that are blank or repeat ignoring case.
pub fn validate(document: &Document) -> Result<(), TransferError> {
    if document.is_empty() {
        return Err(TransferError::Empty);
    }
    let mut category_ids = HashSet::new();
    let mut category_names = HashSet::new();
    let mut website_ids = HashSet::new();
    for category in document.categories() {
        if category.id.is_blank() || !category_ids.insert(category.id.as_str()) {
            return Err(TransferError::BadId(category.id.to_string()));
        }
        let name = category.name.trim();
        if name.is_empty() {
            return Err(TransferError::BlankName);
        }
        if !category_names.insert(name.to_lowercase()) {
            return Err(TransferError::DuplicateName(category.name.clone()));
        }
        for website in &category.websites {
            if website.id.is_blank() || !website_ids.insert(website.id.as_str()) {
                return Err(TransferError::BadId(website.id.to_string()));
            }
        }
    }
    Ok(())
}

/// Storage key for a backup taken at `at`, to the millisecond.
pub fn backup_key(at: DateTime<Utc>) -> String {
    format!("{}.backup.{}", STORAGE_KEY, at.format("%Y%m%d_%H%M%S_%3f"))
}

/// First backup key for `at` that is not already taken in `storage`.
fn unused_backup_key<S: Storage>(storage: &S, at: DateTime<Utc>) -> Result<String, StorageError> {
    let base = backup_key(at);
    if storage.get(&base)?.is_none() {
        return Ok(base);
    }
    let mut n = 2u32;
    loop {
        let key = format!("{base}-{n}");
        if storage.get(&key)?.is_none() {
            return Ok(key);
        }
        n += 1;
    }
}

/// Back up the stored document, then replace it with `document`.
///
/// Returns the backup key, or `None` when nothing was stored yet.
pub fn import_document<S: Storage>(
    store: &mut DocumentStore<S>,
    document: Document,
) -> Result<Option<String>, TransferError> {
    validate(&document)?;

    let backup = match store.storage().get(STORAGE_KEY)? {
        Some(current) => {
            let key = unused_backup_key(store.storage(), Utc::now())?;
            store.storage().set(&key, &current)?;
            tracing::info!(key = %key, "Backed up bookmarks before import");
            Some(key)
        }
        None => None,
    };

    let categories = document.len();
    store.replace(document)?;
    tracing::info!(categories, "Imported bookmarks");
    Ok(backup)
}

/// Write `document` to `path` as pretty-printed JSON.
pub fn export_document(document: &Document, path: &Path) -> Result<(), TransferError> {
    let json = serde_json::to_string_pretty(document)?;
    crate::storage::atomic_write(path, json.as_bytes())?;
    tracing::info!(path = %path.display(), categories = document.len(), "Exported bookmarks");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Category, CategoryId};
    use crate::storage::{FileStorage, MemoryStorage};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn small_document() -> Document {
        Document::new(vec![Category::new(CategoryId::new("tools"), "Tools")])
    }

    #[test]
    fn test_backup_key_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
            + chrono::Duration::milliseconds(42);
        assert_eq!(
            backup_key(at),
            "websync-categories.backup.20240309_140507_042"
        );
    }

    #[test]
    fn test_backup_key_skips_taken_keys() {
        let storage = MemoryStorage::new();
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let first = unused_backup_key(&storage, at).unwrap();
        assert_eq!(first, backup_key(at));

        storage.set(&first, "[]").unwrap();
        let second = unused_backup_key(&storage, at).unwrap();
        assert_eq!(second, format!("{first}-2"));

        storage.set(&second, "[]").unwrap();
        assert_eq!(unused_backup_key(&storage, at).unwrap(), format!("{first}-3"));
    }

    #[test]
    fn test_repeated_imports_keep_every_backup() {
        let storage = MemoryStorage::new();
        let mut store = DocumentStore::load(storage.clone());

        let first = import_document(&mut store, small_document()).unwrap().unwrap();
        let second = import_document(&mut store, Document::seed()).unwrap().unwrap();
        assert_ne!(first, second);

        let saved: Document =
            serde_json::from_str(&storage.get(&first).unwrap().unwrap()).unwrap();
        assert_eq!(saved, Document::seed());
        let saved: Document =
            serde_json::from_str(&storage.get(&second).unwrap().unwrap()).unwrap();
        assert_eq!(saved, small_document());
    }

    #[test]
    fn test_validate_rejects_repeated_names_ignoring_case() {
        let twice = Document::new(vec![
            Category::new(CategoryId::new("a"), "News"),
            Category::new(CategoryId::new("b"), " news "),
        ]);
        assert!(matches!(
            validate(&twice),
            Err(TransferError::DuplicateName(name)) if name == " news "
        ));

        let mut store = DocumentStore::load(MemoryStorage::new());
        assert!(matches!(
            import_document(&mut store, twice),
            Err(TransferError::DuplicateName(_))
        ));
        assert_eq!(**store.document(), Document::seed());
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let blank = Document::new(vec![
            Category::new(CategoryId::new("a"), "News"),
            Category::new(CategoryId::new("b"), "   "),
        ]);
        assert!(matches!(validate(&blank), Err(TransferError::BlankName)));
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicate_ids() {
        assert!(matches!(
            validate(&Document::default()),
            Err(TransferError::Empty)
        ));

        let twice = Document::new(vec![
            Category::new(CategoryId::new("a"), "One"),
            Category::new(CategoryId::new("a"), "Two"),
        ]);
        assert!(matches!(validate(&twice), Err(TransferError::BadId(id)) if id == "a"));

        let blank = Document::new(vec![Category::new(CategoryId::new(" "), "One")]);
        assert!(matches!(validate(&blank), Err(TransferError::BadId(_))));

        assert!(validate(&Document::seed()).is_ok());
    }

    #[test]
    fn test_import_backs_up_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::open(dir.path()).unwrap();
        let mut store = DocumentStore::load(storage.clone());

        let backup = import_document(&mut store, small_document()).unwrap();
        let backup = backup.expect("seeded document should be backed up");
        assert!(backup.starts_with("websync-categories.backup."));

        let saved: Document =
            serde_json::from_str(&storage.get(&backup).unwrap().unwrap()).unwrap();
        assert_eq!(saved, Document::seed());
        assert_eq!(**store.document(), small_document());

        let reloaded = DocumentStore::load(storage);
        assert_eq!(**reloaded.document(), small_document());
    }

    #[test]
    fn test_import_rejects_invalid_without_touching_store() {
        let mut store = DocumentStore::load(MemoryStorage::new());
        let result = import_document(&mut store, Document::default());
        assert!(matches!(result, Err(TransferError::Empty)));
        assert_eq!(**store.document(), Document::seed());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_export_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        export_document(&Document::seed(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {"), "expected pretty JSON");
        assert_eq!(read_document_file(&path).unwrap(), Document::seed());
    }

    #[test]
    fn test_read_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_document_file(&path),
            Err(TransferError::Json(_))
        ));
        assert!(matches!(
            read_document_file(&dir.path().join("missing.json")),
            Err(TransferError::Io(_))
        ));
    }
}
