//! Drag-to-reorder gesture as an explicit state machine.
//!
//! The front end feeds it "start dragging X", "dropped on Y" and "released
//! elsewhere". Turning a drop into a document change is the pure [`resolve`]
//! step, so every drag outcome can be tested without a pointer or a terminal.

use crate::document::{CategoryId, WebsiteId};
use crate::storage::Storage;
use crate::store::{DocumentStore, StoreError};

/// What, if anything, is being dragged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Category(CategoryId),
    Website {
        website: WebsiteId,
        source: CategoryId,
    },
}

/// Where a drag was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Category(CategoryId),
    Website {
        website: WebsiteId,
        category: CategoryId,
    },
}

/// The document change a drop resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reorder {
    Categories {
        moved: CategoryId,
        target: CategoryId,
    },
    WithinCategory {
        category: CategoryId,
        website: WebsiteId,
        target: WebsiteId,
    },
    AcrossCategories {
        website: WebsiteId,
        source: CategoryId,
        target: CategoryId,
        anchor: Option<WebsiteId>,
    },
}

/// Map a drag state and a drop target to a reorder, if the pair means one.
pub fn resolve(state: &DragState, target: &DropTarget) -> Option<Reorder> {
    match (state, target) {
        (DragState::Category(moved), DropTarget::Category(target)) if moved != target => {
            Some(Reorder::Categories {
                moved: moved.clone(),
                target: target.clone(),
            })
        }
        (DragState::Website { website, source }, DropTarget::Category(target))
            if source != target =>
        {
            Some(Reorder::AcrossCategories {
                website: website.clone(),
                source: source.clone(),
                target: target.clone(),
                anchor: None,
            })
        }
        (
            DragState::Website { website, source },
            DropTarget::Website {
                website: anchor,
                category,
            },
        ) if website != anchor => {
            if source == category {
                Some(Reorder::WithinCategory {
                    category: source.clone(),
                    website: website.clone(),
                    target: anchor.clone(),
                })
            } else {
                Some(Reorder::AcrossCategories {
                    website: website.clone(),
                    source: source.clone(),
                    target: category.clone(),
                    anchor: Some(anchor.clone()),
                })
            }
        }
        _ => None,
    }
}

impl Reorder {
    /// Apply through the store. Returns whether the document changed.
    pub fn apply<S: Storage>(&self, store: &mut DocumentStore<S>) -> Result<bool, StoreError> {
        match self {
            Reorder::Categories { moved, target } => store.reorder_categories(moved, target),
            Reorder::WithinCategory {
                category,
                website,
                target,
            } => store.reposition_website(category, website, target),
            Reorder::AcrossCategories {
                website,
                source,
                target,
                anchor,
            } => store.move_website_across(website, source, target, anchor.as_ref()),
        }
    }
}

/// Holds the current [`DragState`] between gesture events.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    pub fn start_category(&mut self, id: CategoryId) {
        self.state = DragState::Category(id);
    }

    pub fn start_website(&mut self, website: WebsiteId, source: CategoryId) {
        self.state = DragState::Website { website, source };
    }

    /// Finish the gesture on `target`. Always returns to idle, even when the
    /// store rejects the change.
    pub fn drop_on<S: Storage>(
        &mut self,
        target: &DropTarget,
        store: &mut DocumentStore<S>,
    ) -> Result<bool, StoreError> {
        let state = std::mem::take(&mut self.state);
        match resolve(&state, target) {
            Some(reorder) => {
                tracing::debug!(?reorder, "Drop resolved");
                reorder.apply(store)
            }
            None => Ok(false),
        }
    }

    /// Release outside any target.
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }
}
