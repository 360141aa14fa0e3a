//! Property tests for store operations and the filter.

use proptest::prelude::*;
use std::sync::Arc;
use websync::document::{normalize_url, Category, CategoryId, Document, Website, WebsiteId};
use websync::search;
use websync::storage::MemoryStorage;
use websync::store::{Direction, DocumentStore, WebsiteFields};

/// Documents with unique ids: `c<i>` for categories, `w<i>_<j>` for websites.
fn arb_document() -> impl Strategy<Value = Document> {
    let site = ("[a-z]{1,8}", "[a-z]{1,8}\\.(com|org|io)", proptest::option::of("[a-z ]{0,12}"));
    let category = ("[A-Za-z]{1,10}", proptest::collection::vec(site, 0..6));
    proptest::collection::vec(category, 1..6).prop_map(|categories| {
        Document::new(
            categories
                .into_iter()
                .enumerate()
                .map(|(i, (name, sites))| Category {
                    id: CategoryId::new(format!("c{i}")),
                    name,
                    websites: sites
                        .into_iter()
                        .enumerate()
                        .map(|(j, (name, url, description))| Website {
                            id: WebsiteId::new(format!("w{i}_{j}")),
                            name,
                            url: format!("https://{url}"),
                            description,
                        })
                        .collect(),
                })
                .collect(),
        )
    })
}

fn store_with(document: &Document) -> DocumentStore<MemoryStorage> {
    let mut store = DocumentStore::load(MemoryStorage::new());
    store.replace(document.clone()).unwrap();
    store
}

fn website_ids(category: &Category) -> Vec<String> {
    category.websites.iter().map(|w| w.id.to_string()).collect()
}

proptest! {
    #[test]
    fn add_category_appends_one_empty_category(name in "[A-Za-z0-9 ]{0,20}") {
        let mut store = DocumentStore::load(MemoryStorage::new());
        let before = store.document().len();
        let fresh = store.document().find_by_name(&name, None).is_none();

        match store.add_category(&name) {
            Ok(id) => {
                prop_assert!(fresh && !name.trim().is_empty());
                prop_assert_eq!(store.document().len(), before + 1);
                let last = store.document().categories().last().unwrap();
                prop_assert_eq!(&last.id, &id);
                prop_assert_eq!(last.name.as_str(), name.trim());
                prop_assert!(last.websites.is_empty());
            }
            Err(_) => {
                prop_assert!(!fresh || name.trim().is_empty());
                prop_assert_eq!(store.document().len(), before);
            }
        }
    }

    #[test]
    fn cross_category_move_preserves_relative_order(
        document in arb_document(),
        pick in any::<proptest::sample::Index>(),
        target in any::<proptest::sample::Index>(),
        anchor in any::<proptest::sample::Index>(),
        use_anchor in any::<bool>(),
    ) {
        let categories = document.categories();
        let sources: Vec<&Category> = categories.iter().filter(|c| !c.websites.is_empty()).collect();
        prop_assume!(!sources.is_empty() && categories.len() > 1);

        let source = *pick.get(&sources);
        let moved = pick.get(&source.websites).id.clone();
        let others: Vec<&Category> = categories.iter().filter(|c| c.id != source.id).collect();
        let target = *target.get(&others);
        let anchor_id = (use_anchor && !target.websites.is_empty())
            .then(|| anchor.get(&target.websites).id.clone());

        let mut store = store_with(&document);
        let changed = store
            .move_website_across(&moved, &source.id, &target.id, anchor_id.as_ref())
            .unwrap();
        prop_assert!(changed);

        let after = store.document();
        let new_source = after.category(&source.id).unwrap();
        let new_target = after.category(&target.id).unwrap();

        // Source keeps the others in order
        let expected_source: Vec<String> = website_ids(source)
            .into_iter()
            .filter(|id| id != moved.as_str())
            .collect();
        prop_assert_eq!(website_ids(new_source), expected_source);

        // Target keeps its own in order with the moved one inserted
        let target_without: Vec<String> = website_ids(new_target)
            .into_iter()
            .filter(|id| id != moved.as_str())
            .collect();
        prop_assert_eq!(target_without, website_ids(target));
        prop_assert_eq!(new_target.websites.len(), target.websites.len() + 1);

        let position = new_target.websites.iter().position(|w| w.id == moved).unwrap();
        match &anchor_id {
            Some(a) => prop_assert_eq!(&new_target.websites[position + 1].id, a),
            None => prop_assert_eq!(position, target.websites.len()),
        }
        prop_assert_eq!(after.website_count(), document.website_count());
    }

    #[test]
    fn move_up_then_down_is_identity(document in arb_document(), pick in any::<proptest::sample::Index>()) {
        let with_room: Vec<&Category> = document
            .categories()
            .iter()
            .filter(|c| c.websites.len() > 1)
            .collect();
        prop_assume!(!with_room.is_empty());
        let category = *pick.get(&with_room);
        // Any website but the first can move up
        let index = 1 + pick.index(category.websites.len() - 1);
        let site = category.websites[index].id.clone();

        let mut store = store_with(&document);
        prop_assert!(store.move_website(&category.id, &site, Direction::Up).unwrap());
        prop_assert!(store.move_website(&category.id, &site, Direction::Down).unwrap());
        prop_assert_eq!(&**store.document(), &document);
    }

    #[test]
    fn filter_keeps_only_matches_in_order(document in arb_document(), query in "[a-z]{0,3}") {
        let source = Arc::new(document);
        let view = search::filter(&source, &query);
        let needle = query.to_lowercase();

        if needle.is_empty() {
            prop_assert!(Arc::ptr_eq(&view, &source));
            return Ok(());
        }

        let mut last_index = None;
        for category in view.categories() {
            let index = source.categories().iter().position(|c| c.id == category.id).unwrap();
            prop_assert!(last_index.map_or(true, |l| index > l));
            last_index = Some(index);

            let original = &source.categories()[index];
            if original.name.to_lowercase().contains(&needle) {
                prop_assert_eq!(category, original);
            } else {
                prop_assert!(!category.websites.is_empty());
                for site in &category.websites {
                    let haystack = format!(
                        "{} {} {}",
                        site.name,
                        site.url,
                        site.description.as_deref().unwrap_or("")
                    )
                    .to_lowercase();
                    prop_assert!(haystack.contains(&needle));
                }
            }
        }
    }

    #[test]
    fn store_survives_reload(document in arb_document(), extra in "[A-Za-z]{1,10}", url in "[a-z]{1,10}\\.dev") {
        let storage = MemoryStorage::new();
        let mut store = DocumentStore::load(storage.clone());
        store.replace(document).unwrap();
        let first = store.document().categories()[0].id.clone();
        store
            .add_website(&first, &WebsiteFields::new(extra.clone(), url))
            .unwrap();
        let _ = store.add_category(&extra);

        let reloaded = DocumentStore::load(storage);
        prop_assert_eq!(&**reloaded.document(), &**store.document());
    }

    #[test]
    fn normalize_url_is_idempotent(raw in "\\s{0,2}(https?://)?[a-z]{1,10}\\.[a-z]{2,3}\\s{0,2}") {
        let once = normalize_url(&raw);
        prop_assert!(once.starts_with("http://") || once.starts_with("https://"));
        prop_assert_eq!(normalize_url(&once), once.clone());
        prop_assert_eq!(once.trim(), once.as_str());
    }
}
