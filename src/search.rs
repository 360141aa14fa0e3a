//! Local bookmark filter.

use std::sync::Arc;

use crate::document::{Category, Document};

/// Derive the filtered view of `document` for `query`.
///
/// A blank query returns the same `Arc`. Otherwise a category whose name
/// contains the query keeps all of its websites; any other category keeps only
/// the websites whose name, url or description contains it, and is dropped when
/// none do. Matching is case-insensitive. Surrounding whitespace only
/// matters for the blank check; otherwise it is part of the query.
pub fn filter(document: &Arc<Document>, query: &str) -> Arc<Document> {
    if query.trim().is_empty() {
        return Arc::clone(document);
    }
    let needle = query.to_lowercase();

    let categories = document
        .categories()
        .iter()
        .filter_map(|category| {
            if category.name.to_lowercase().contains(&needle) {
                return Some(category.clone());
            }
            let websites: Vec<_> = category
                .websites
                .iter()
                .filter(|w| w.matches(&needle))
                .cloned()
                .collect();
            (!websites.is_empty()).then(|| Category {
                id: category.id.clone(),
                name: category.name.clone(),
                websites,
            })
        })
        .collect();

    Arc::new(Document::new(categories))
}
