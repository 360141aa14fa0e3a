use crate::document::{Category, CategoryId, Document, Website, WebsiteId};
use crate::drag::{DragController, DragState, DropTarget};
use crate::keybindings::{Context, KeybindingRegistry};
use crate::links::{self, LinkOpener};
use crate::preferences::PreferenceManager;
use crate::search;
use crate::store::{Direction, DocumentStore, WebsiteFields};
use crate::theme::{ColorPalette, ThemeVariant};
use crate::util::{MAX_FIELD_LENGTH, MAX_QUERY_LENGTH};
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

pub const EMPTY_FILTER_MESSAGE: &str = "No categories or websites match your search.";
pub const EMPTY_DOCUMENT_MESSAGE: &str =
    "No categories yet. Press A to add one, or R to restore the defaults.";
pub const EMPTY_CATEGORY_MESSAGE: &str = "No websites in this category yet.";

// ============================================================================
// Modes and Focus
// ============================================================================

/// Which header input, if any, receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    WebSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Categories,
    Websites,
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub text: Cow<'static, str>,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

// ============================================================================
// Dialogs
// ============================================================================

/// Add (no target) or rename (target set) a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryForm {
    pub target: Option<CategoryId>,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebsiteField {
    Name,
    Url,
    Description,
}

impl WebsiteField {
    pub const ALL: [WebsiteField; 3] = [Self::Name, Self::Url, Self::Description];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Url => "URL",
            Self::Description => "Description (optional)",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Name => Self::Url,
            Self::Url => Self::Description,
            Self::Description => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Url => Self::Name,
            Self::Description => Self::Url,
        }
    }
}

/// Add (no website) or edit (website set) a website in `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebsiteForm {
    pub category: CategoryId,
    pub website: Option<WebsiteId>,
    pub fields: WebsiteFields,
    pub active: WebsiteField,
}

impl WebsiteForm {
    pub fn value(&self, field: WebsiteField) -> &str {
        match field {
            WebsiteField::Name => &self.fields.name,
            WebsiteField::Url => &self.fields.url,
            WebsiteField::Description => &self.fields.description,
        }
    }

    fn active_value_mut(&mut self) -> &mut String {
        match self.active {
            WebsiteField::Name => &mut self.fields.name,
            WebsiteField::Url => &mut self.fields.url,
            WebsiteField::Description => &mut self.fields.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Category(CategoryForm),
    Website(WebsiteForm),
}

impl Dialog {
    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Category(CategoryForm { target: None, .. }) => "Add New Category",
            Dialog::Category(CategoryForm { target: Some(_), .. }) => "Rename Category",
            Dialog::Website(WebsiteForm { website: None, .. }) => "Add New Website",
            Dialog::Website(WebsiteForm { website: Some(_), .. }) => "Edit Website",
        }
    }

    fn active_value_mut(&mut self) -> &mut String {
        match self {
            Dialog::Category(form) => &mut form.name,
            Dialog::Website(form) => form.active_value_mut(),
        }
    }
}

/// Pending confirmation for destructive operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteCategory {
        id: CategoryId,
        name: String,
        websites: usize,
    },
    DeleteWebsite {
        category: CategoryId,
        website: WebsiteId,
        name: String,
    },
    ResetDefaults,
}

impl ConfirmAction {
    pub fn prompt(&self) -> String {
        match self {
            Self::DeleteCategory { name, websites, .. } => format!(
                "Delete category \"{}\" and its {} website(s)?",
                name, websites
            ),
            Self::DeleteWebsite { name, .. } => format!("Delete website \"{}\"?", name),
            Self::ResetDefaults => {
                "Replace all bookmarks with the default categories?".to_string()
            }
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state for the terminal front end.
pub struct App {
    pub store: DocumentStore,
    pub prefs: PreferenceManager,
    pub keybindings: KeybindingRegistry,
    opener: Box<dyn LinkOpener>,

    // Theme
    pub theme_variant: ThemeVariant,
    pub palette: ColorPalette,

    /// Filtered view of the store's document; what the panels render.
    pub view: Arc<Document>,
    /// Store revision `view` was computed from.
    view_revision: u64,

    // Header inputs
    pub mode: InputMode,
    pub filter_input: String,
    pub web_search_input: String,

    // Selection, as indices into `view`
    pub focus: Focus,
    pub selected_category: usize,
    pub selected_website: usize,

    pub drag: DragController,
    pub dialog: Option<Dialog>,
    pub pending_confirm: Option<ConfirmAction>,
    pub notice: Option<Notice>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Dirty flag to skip unnecessary frame renders.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        store: DocumentStore,
        prefs: PreferenceManager,
        keybindings: KeybindingRegistry,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        let theme_variant = prefs.theme();
        let view = Arc::clone(store.document());
        let view_revision = store.revision();
        Self {
            store,
            prefs,
            keybindings,
            opener,
            theme_variant,
            palette: theme_variant.palette(),
            view,
            view_revision,
            mode: InputMode::Normal,
            filter_input: String::new(),
            web_search_input: String::new(),
            focus: Focus::Categories,
            selected_category: 0,
            selected_website: 0,
            drag: DragController::new(),
            dialog: None,
            pending_confirm: None,
            notice: None,
            show_help: false,
            help_scroll_offset: 0,
            needs_redraw: true,
        }
    }

    // ========================================================================
    // Theme
    // ========================================================================

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.palette = variant.palette();
        self.needs_redraw = true;
    }

    /// Switch to the next theme and remember the choice.
    pub fn cycle_theme(&mut self) {
        let next = self.theme_variant.next();
        self.set_theme(next);
        match self.prefs.set_theme(self.store.storage(), next) {
            Ok(()) => self.set_status(format!("Theme: {}", next.name())),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist theme");
                self.notify_error(format!("Theme: {} (not saved: {})", next.name(), e));
            }
        }
    }

    // ========================================================================
    // Derived View
    // ========================================================================

    /// Recompute the filtered view if the document or the filter changed.
    ///
    /// Selections follow the previously selected ids where they still exist.
    pub fn refresh_view(&mut self) {
        let keep_category = self.selected_category().map(|c| c.id.clone());
        let keep_website = self.selected_website().map(|w| w.id.clone());

        self.view = search::filter(self.store.document(), &self.filter_input);
        self.view_revision = self.store.revision();

        if let Some(index) = keep_category.and_then(|id| {
            self.view.categories().iter().position(|c| c.id == id)
        }) {
            self.selected_category = index;
        }
        if let Some(index) = keep_website.and_then(|id| {
            self.selected_category()
                .and_then(|c| c.websites.iter().position(|w| w.id == id))
        }) {
            self.selected_website = index;
        }
        self.clamp_selections();
        self.needs_redraw = true;
    }

    /// Refresh only if the store has committed since the last refresh.
    pub fn sync_view(&mut self) {
        if self.view_revision != self.store.revision() {
            self.refresh_view();
        }
    }

    pub fn clamp_selections(&mut self) {
        let categories = self.view.len();
        self.selected_category = self.selected_category.min(categories.saturating_sub(1));
        let websites = self.selected_category().map_or(0, |c| c.websites.len());
        self.selected_website = self.selected_website.min(websites.saturating_sub(1));
        if websites == 0 && self.focus == Focus::Websites && !self.drag.is_dragging() {
            self.focus = Focus::Categories;
        }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.view.categories().get(self.selected_category)
    }

    pub fn selected_website(&self) -> Option<&Website> {
        self.selected_category()?.websites.get(self.selected_website)
    }

    /// Message to show when a panel has nothing to list.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.view.is_empty() {
            if self.filter_input.trim().is_empty() {
                Some(EMPTY_DOCUMENT_MESSAGE)
            } else {
                Some(EMPTY_FILTER_MESSAGE)
            }
        } else if self.selected_category().is_some_and(|c| c.websites.is_empty()) {
            Some(EMPTY_CATEGORY_MESSAGE)
        } else {
            None
        }
    }

    /// Keybinding context for the current mode and focus.
    pub fn key_context(&self) -> Context {
        if self.mode != InputMode::Normal {
            Context::Input
        } else if self.drag.is_dragging() {
            Context::Dragging
        } else {
            match self.focus {
                Focus::Categories => Context::Categories,
                Focus::Websites => Context::Websites,
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn nav_up(&mut self) {
        match self.focus {
            Focus::Categories => {
                if self.selected_category > 0 {
                    self.selected_category -= 1;
                    self.selected_website = 0;
                }
            }
            Focus::Websites => {
                self.selected_website = self.selected_website.saturating_sub(1);
            }
        }
    }

    pub fn nav_down(&mut self) {
        match self.focus {
            Focus::Categories => {
                if self.selected_category + 1 < self.view.len() {
                    self.selected_category += 1;
                    self.selected_website = 0;
                }
            }
            Focus::Websites => {
                let len = self.selected_category().map_or(0, |c| c.websites.len());
                if self.selected_website + 1 < len {
                    self.selected_website += 1;
                }
            }
        }
    }

    /// Toggle between the panels. The websites panel is only reachable when
    /// it has something to select, except while dragging (to pick an anchor).
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Categories => {
                let has_sites = self.selected_category().is_some_and(|c| !c.websites.is_empty());
                if has_sites || self.drag.is_dragging() {
                    Focus::Websites
                } else {
                    Focus::Categories
                }
            }
            Focus::Websites => Focus::Categories,
        };
    }

    /// Enter on a category shows its websites; on a website opens it.
    pub fn open_selected(&mut self) {
        match self.focus {
            Focus::Categories => self.cycle_focus(),
            Focus::Websites => {
                if let Some(site) = self.selected_website().cloned() {
                    self.open_url(&site.url, &site.name);
                }
            }
        }
    }

    /// Esc in normal mode: clear an active filter.
    pub fn back(&mut self) {
        if self.focus == Focus::Websites {
            self.focus = Focus::Categories;
        } else if !self.filter_input.is_empty() {
            self.filter_input.clear();
            self.refresh_view();
        }
    }

    fn open_url(&mut self, url: &str, label: &str) {
        match self.opener.open(url) {
            Ok(()) => self.set_status(format!("Opening {}...", label)),
            Err(e) => {
                tracing::warn!(url, error = %e, "Failed to open link");
                self.notify_error(e.to_string());
            }
        }
    }

    // ========================================================================
    // Header Inputs
    // ========================================================================

    pub fn enter_filter(&mut self) {
        self.mode = InputMode::Filter;
    }

    pub fn enter_web_search(&mut self) {
        self.mode = InputMode::WebSearch;
    }

    /// Leave the active input. Leaving the filter keeps its text applied.
    pub fn leave_input(&mut self) {
        self.mode = InputMode::Normal;
    }

    /// Append a typed character to the active input.
    pub fn input_push(&mut self, c: char) {
        let input = match self.mode {
            InputMode::Normal => return,
            InputMode::Filter => &mut self.filter_input,
            InputMode::WebSearch => &mut self.web_search_input,
        };
        if input.chars().count() >= MAX_QUERY_LENGTH {
            self.set_status(format!("Input at max length ({} chars)", MAX_QUERY_LENGTH));
            return;
        }
        input.push(c);
        if self.mode == InputMode::Filter {
            self.refresh_view();
        }
    }

    pub fn input_pop(&mut self) {
        match self.mode {
            InputMode::Normal => {}
            InputMode::Filter => {
                if self.filter_input.pop().is_some() {
                    self.refresh_view();
                }
            }
            InputMode::WebSearch => {
                self.web_search_input.pop();
            }
        }
    }

    /// Enter in an input: run the web search, or just close the filter.
    pub fn submit_input(&mut self) {
        match self.mode {
            InputMode::Normal => {}
            InputMode::Filter => self.leave_input(),
            InputMode::WebSearch => self.submit_web_search(),
        }
    }

    /// Open the web search for the typed query and clear the input.
    ///
    /// A blank query does nothing and keeps the input open.
    pub fn submit_web_search(&mut self) {
        let Some(url) = links::web_search_url(&self.web_search_input) else {
            return;
        };
        let query = std::mem::take(&mut self.web_search_input);
        self.mode = InputMode::Normal;
        self.open_url(&url, &format!("search for \"{}\"", query.trim()));
    }

    // ========================================================================
    // Dialogs
    // ========================================================================

    pub fn begin_add_category(&mut self) {
        self.dialog = Some(Dialog::Category(CategoryForm {
            target: None,
            name: String::new(),
        }));
    }

    pub fn begin_rename_category(&mut self) {
        if let Some(category) = self.selected_category() {
            self.dialog = Some(Dialog::Category(CategoryForm {
                target: Some(category.id.clone()),
                name: category.name.clone(),
            }));
        }
    }

    /// Add a website to the selected category.
    pub fn begin_add_website(&mut self) {
        match self.selected_category() {
            Some(category) => {
                self.dialog = Some(Dialog::Website(WebsiteForm {
                    category: category.id.clone(),
                    website: None,
                    fields: WebsiteFields::default(),
                    active: WebsiteField::Name,
                }));
            }
            None => self.notify_error("Select a category first"),
        }
    }

    pub fn begin_edit_website(&mut self) {
        let (Some(category), Some(site)) = (self.selected_category(), self.selected_website())
        else {
            return;
        };
        self.dialog = Some(Dialog::Website(WebsiteForm {
            category: category.id.clone(),
            website: Some(site.id.clone()),
            fields: WebsiteFields::from_website(site),
            active: WebsiteField::Name,
        }));
    }

    /// `e`: rename in the categories panel, edit in the websites panel.
    pub fn begin_edit(&mut self) {
        match self.focus {
            Focus::Categories => self.begin_rename_category(),
            Focus::Websites => self.begin_edit_website(),
        }
    }

    pub fn dialog_push(&mut self, c: char) {
        if let Some(dialog) = &mut self.dialog {
            let value = dialog.active_value_mut();
            if value.chars().count() < MAX_FIELD_LENGTH {
                value.push(c);
            }
        }
    }

    pub fn dialog_pop(&mut self) {
        if let Some(dialog) = &mut self.dialog {
            dialog.active_value_mut().pop();
        }
    }

    pub fn dialog_next_field(&mut self) {
        if let Some(Dialog::Website(form)) = &mut self.dialog {
            form.active = form.active.next();
        }
    }

    pub fn dialog_prev_field(&mut self) {
        if let Some(Dialog::Website(form)) = &mut self.dialog {
            form.active = form.active.prev();
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    /// Apply the open dialog. Validation errors keep it open.
    pub fn submit_dialog(&mut self) {
        let Some(dialog) = self.dialog.take() else {
            return;
        };
        let keep_open = match &dialog {
            Dialog::Category(form) => match &form.target {
                None => !self.add_category(&form.name),
                Some(id) => !self.rename_category(id, &form.name),
            },
            Dialog::Website(form) => match &form.website {
                None => !self.add_website(&form.category, &form.fields),
                Some(id) => !self.edit_website(&form.category, id, &form.fields),
            },
        };
        if keep_open {
            self.dialog = Some(dialog);
        }
    }

    // ========================================================================
    // Document Operations
    // ========================================================================

    /// Returns whether the dialog may close.
    fn add_category(&mut self, name: &str) -> bool {
        match self.store.add_category(name) {
            Ok(id) => {
                self.sync_view();
                if let Some(index) = self.view.category_index(&id) {
                    self.selected_category = index;
                    self.selected_website = 0;
                    self.focus = Focus::Categories;
                }
                self.notify_success(format!("Category \"{}\" added successfully", name.trim()));
                true
            }
            Err(e) => {
                self.notify_error(e.to_string());
                false
            }
        }
    }

    fn rename_category(&mut self, id: &CategoryId, name: &str) -> bool {
        match self.store.rename_category(id, name) {
            Ok(changed) => {
                if changed {
                    self.sync_view();
                    self.set_status("Category renamed");
                }
                true
            }
            Err(e) => {
                self.notify_error(e.to_string());
                false
            }
        }
    }

    /// Blank name or url keeps the dialog open without a message, like an
    /// unsubmittable form.
    fn add_website(&mut self, category: &CategoryId, fields: &WebsiteFields) -> bool {
        match self.store.add_website(category, fields) {
            Ok(Some(id)) => {
                self.sync_view();
                self.select_website(category, &id);
                self.set_status(format!("Added {}", fields.name.trim()));
                true
            }
            Ok(None) => {
                self.set_status("Name and URL are required");
                false
            }
            Err(e) => {
                self.notify_error(e.to_string());
                false
            }
        }
    }

    fn edit_website(
        &mut self,
        category: &CategoryId,
        website: &WebsiteId,
        fields: &WebsiteFields,
    ) -> bool {
        if fields.name.trim().is_empty() || fields.url.trim().is_empty() {
            self.set_status("Name and URL are required");
            return false;
        }
        match self.store.edit_website(category, website, fields) {
            Ok(changed) => {
                if changed {
                    self.sync_view();
                    self.set_status("Website updated");
                }
                true
            }
            Err(e) => {
                self.notify_error(e.to_string());
                false
            }
        }
    }

    /// Delete the focused item, asking first when configured to.
    pub fn request_delete(&mut self) {
        let action = match self.focus {
            Focus::Categories => self.selected_category().map(|c| ConfirmAction::DeleteCategory {
                id: c.id.clone(),
                name: c.name.clone(),
                websites: c.websites.len(),
            }),
            Focus::Websites => self
                .selected_category()
                .zip(self.selected_website())
                .map(|(c, w)| ConfirmAction::DeleteWebsite {
                    category: c.id.clone(),
                    website: w.id.clone(),
                    name: w.name.clone(),
                }),
        };
        if let Some(action) = action {
            self.request(action);
        }
    }

    pub fn request_reset(&mut self) {
        self.request(ConfirmAction::ResetDefaults);
    }

    fn request(&mut self, action: ConfirmAction) {
        if self.prefs.confirm_destructive() {
            self.pending_confirm = Some(action);
        } else {
            self.perform(action);
        }
    }

    pub fn confirm(&mut self) {
        if let Some(action) = self.pending_confirm.take() {
            self.perform(action);
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.pending_confirm = None;
    }

    fn perform(&mut self, action: ConfirmAction) {
        let result = match &action {
            ConfirmAction::DeleteCategory { id, .. } => self.store.remove_category(id),
            ConfirmAction::DeleteWebsite {
                category, website, ..
            } => self.store.remove_website(category, website),
            ConfirmAction::ResetDefaults => self.store.reset_to_defaults().map(|()| true),
        };
        match result {
            Ok(changed) => {
                self.sync_view();
                match action {
                    ConfirmAction::DeleteCategory { name, .. } if changed => {
                        self.set_status(format!("Deleted category \"{}\"", name));
                    }
                    ConfirmAction::DeleteWebsite { name, .. } if changed => {
                        self.set_status(format!("Deleted {}", name));
                    }
                    ConfirmAction::ResetDefaults => {
                        self.selected_category = 0;
                        self.selected_website = 0;
                        self.focus = Focus::Categories;
                        self.notify_success("Categories reset to defaults successfully");
                    }
                    _ => {}
                }
            }
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    /// Up/down controls for the selected website.
    pub fn move_selected_website(&mut self, direction: Direction) {
        let (Some(category), Some(site)) = (
            self.selected_category().map(|c| c.id.clone()),
            self.selected_website().map(|w| w.id.clone()),
        ) else {
            return;
        };
        match self.store.move_website(&category, &site, direction) {
            Ok(true) => {
                self.sync_view();
                self.select_website(&category, &site);
            }
            Ok(false) => {}
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    fn select_website(&mut self, category: &CategoryId, website: &WebsiteId) {
        if let Some(ci) = self.view.category_index(category) {
            self.selected_category = ci;
            if let Some(wi) = self.view.categories()[ci].website_index(website) {
                self.selected_website = wi;
                self.focus = Focus::Websites;
            }
        }
    }

    // ========================================================================
    // Keyboard Drag
    // ========================================================================

    /// Grab the focused item.
    pub fn grab(&mut self) {
        match self.focus {
            Focus::Categories => {
                if let Some(category) = self.selected_category() {
                    let (id, name) = (category.id.clone(), category.name.clone());
                    self.drag.start_category(id);
                    self.set_status(format!("Moving \"{}\": pick a spot, m to drop", name));
                }
            }
            Focus::Websites => {
                if let (Some(category), Some(site)) =
                    (self.selected_category(), self.selected_website())
                {
                    let (source, id, name) =
                        (category.id.clone(), site.id.clone(), site.name.clone());
                    self.drag.start_website(id, source);
                    self.set_status(format!("Moving \"{}\": pick a spot, m to drop", name));
                }
            }
        }
    }

    /// Where the grabbed item would land if dropped now.
    pub fn drop_target(&self) -> Option<DropTarget> {
        match self.focus {
            Focus::Categories => self
                .selected_category()
                .map(|c| DropTarget::Category(c.id.clone())),
            Focus::Websites => match (self.selected_category(), self.selected_website()) {
                (Some(c), Some(w)) => Some(DropTarget::Website {
                    website: w.id.clone(),
                    category: c.id.clone(),
                }),
                (Some(c), None) => Some(DropTarget::Category(c.id.clone())),
                _ => None,
            },
        }
    }

    /// Drop the grabbed item on the focused item.
    pub fn drop_here(&mut self) {
        let moved = self.drag.state().clone();
        let Some(target) = self.drop_target() else {
            self.drag.end();
            return;
        };
        match self.drag.drop_on(&target, &mut self.store) {
            Ok(true) => {
                self.sync_view();
                match moved {
                    DragState::Category(id) => {
                        if let Some(index) = self.view.category_index(&id) {
                            self.selected_category = index;
                        }
                    }
                    DragState::Website { website, .. } => {
                        let category = match &target {
                            DropTarget::Category(c) => c,
                            DropTarget::Website { category, .. } => category,
                        };
                        self.select_website(category, &website);
                    }
                    DragState::Idle => {}
                }
                self.set_status("Moved");
            }
            Ok(false) => self.set_status("Nothing to move"),
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    pub fn cancel_drag(&mut self) {
        if self.drag.is_dragging() {
            self.drag.end();
            self.set_status("Move cancelled");
        }
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Neutral status message (expires after 3 seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.notify(msg, NoticeKind::Info);
    }

    pub fn notify_success(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.notify(msg, NoticeKind::Success);
    }

    pub fn notify_error(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.notify(msg, NoticeKind::Error);
    }

    fn notify(&mut self, msg: impl Into<Cow<'static, str>>, kind: NoticeKind) {
        self.notice = Some(Notice {
            text: msg.into(),
            kind,
            shown_at: Instant::now(),
        });
        self.needs_redraw = true;
    }

    /// Drop the notice once it is older than [`NOTICE_TTL`].
    /// Returns true if a notice was cleared.
    pub fn clear_expired_notice(&mut self) -> bool {
        if let Some(notice) = &self.notice {
            if notice.shown_at.elapsed() >= NOTICE_TTL {
                self.notice = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::links::RecordingOpener;
    use crate::storage::{MemoryStorage, Storage, THEME_KEY};
    use pretty_assertions::assert_eq;

    fn test_app_with(config: &Config) -> (App, RecordingOpener, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = DocumentStore::load(Box::new(storage.clone()) as Box<dyn Storage>);
        let prefs = PreferenceManager::load(config, &storage);
        let opener = RecordingOpener::new();
        let app = App::new(
            store,
            prefs,
            KeybindingRegistry::new(),
            Box::new(opener.clone()),
        );
        (app, opener, storage)
    }

    fn test_app() -> (App, RecordingOpener) {
        let (app, opener, _) = test_app_with(&Config::default());
        (app, opener)
    }

    fn category_names(app: &App) -> Vec<String> {
        app.view.categories().iter().map(|c| c.name.clone()).collect()
    }

    fn type_into_dialog(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dialog_push(c);
        }
    }

    #[test]
    fn test_new_app_shows_seed() {
        let (app, _) = test_app();
        assert_eq!(app.view.len(), 5);
        assert_eq!(app.selected_category().unwrap().name, "AI");
        assert_eq!(app.empty_message(), None);
    }

    #[test]
    fn test_navigation_clamps() {
        let (mut app, _) = test_app();
        app.nav_up();
        assert_eq!(app.selected_category, 0);
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.selected_category, 4);

        app.cycle_focus();
        assert_eq!(app.focus, Focus::Websites);
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.selected_website().unwrap().name, "LinkedIn");
    }

    #[test]
    fn test_filter_typing_updates_view() {
        let (mut app, _) = test_app();
        app.enter_filter();
        for c in "music".chars() {
            app.input_push(c);
        }
        assert_eq!(category_names(&app), ["Songs"]);
        assert_eq!(app.view.categories()[0].websites.len(), 3);

        for c in "zzz".chars() {
            app.input_push(c);
        }
        assert!(app.view.is_empty());
        assert_eq!(app.empty_message(), Some(EMPTY_FILTER_MESSAGE));

        app.input_pop();
        app.input_pop();
        app.input_pop();
        assert_eq!(category_names(&app), ["Songs"]);
    }

    #[test]
    fn test_back_clears_filter() {
        let (mut app, _) = test_app();
        app.enter_filter();
        app.input_push('x');
        app.leave_input();
        assert_eq!(app.filter_input, "x");
        app.back();
        assert!(app.filter_input.is_empty());
        assert_eq!(app.view.len(), 5);
    }

    #[test]
    fn test_web_search_opens_and_clears() {
        let (mut app, opener) = test_app();
        app.enter_web_search();
        for c in "rust tui".chars() {
            app.input_push(c);
        }
        // Typing in the web search does not filter
        assert_eq!(app.view.len(), 5);
        app.submit_input();
        assert_eq!(
            opener.opened(),
            vec!["https://www.google.com/search?q=rust%20tui".to_string()]
        );
        assert!(app.web_search_input.is_empty());
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[test]
    fn test_blank_web_search_does_nothing() {
        let (mut app, opener) = test_app();
        app.enter_web_search();
        app.input_push(' ');
        app.submit_input();
        assert!(opener.opened().is_empty());
        assert_eq!(app.mode, InputMode::WebSearch);
    }

    #[test]
    fn test_open_selected_website() {
        let (mut app, opener) = test_app();
        app.open_selected();
        assert_eq!(app.focus, Focus::Websites);
        app.nav_down();
        app.open_selected();
        assert_eq!(opener.opened(), vec!["https://claude.ai".to_string()]);
    }

    #[test]
    fn test_add_category_dialog_success() {
        let (mut app, _) = test_app();
        app.begin_add_category();
        type_into_dialog(&mut app, " Dev Tools ");
        app.submit_dialog();

        assert!(app.dialog.is_none());
        assert_eq!(app.view.len(), 6);
        assert_eq!(app.selected_category().unwrap().name, "Dev Tools");
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "Category \"Dev Tools\" added successfully");
    }

    #[test]
    fn test_add_category_dialog_errors_keep_it_open() {
        let (mut app, _) = test_app();
        app.begin_add_category();
        app.submit_dialog();
        assert!(app.dialog.is_some());
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.text, "Category name cannot be empty");

        type_into_dialog(&mut app, "news");
        app.submit_dialog();
        assert!(app.dialog.is_some());
        assert_eq!(
            app.notice.as_ref().unwrap().text,
            "A category with this name already exists"
        );
        assert_eq!(app.view.len(), 5);
    }

    #[test]
    fn test_rename_category_dialog() {
        let (mut app, _) = test_app();
        app.begin_edit();
        match &app.dialog {
            Some(Dialog::Category(form)) => assert_eq!(form.name, "AI"),
            other => panic!("unexpected dialog {other:?}"),
        }
        app.dialog_pop();
        app.dialog_pop();
        type_into_dialog(&mut app, "Assistants");
        app.submit_dialog();
        assert!(app.dialog.is_none());
        assert_eq!(category_names(&app)[0], "Assistants");
    }

    #[test]
    fn test_rename_onto_existing_name_keeps_dialog_open() {
        let (mut app, _) = test_app();
        app.begin_edit();
        app.dialog_pop();
        app.dialog_pop();
        type_into_dialog(&mut app, "NEWS");
        app.submit_dialog();

        assert!(app.dialog.is_some());
        assert_eq!(app.notice.as_ref().unwrap().kind, NoticeKind::Error);
        assert_eq!(category_names(&app)[0], "AI");
    }

    #[test]
    fn test_add_website_dialog_cycles_fields() {
        let (mut app, _) = test_app();
        app.nav_down(); // News
        app.begin_add_website();
        type_into_dialog(&mut app, "Hacker News");
        app.dialog_next_field();
        type_into_dialog(&mut app, "news.ycombinator.com");
        app.dialog_next_field();
        type_into_dialog(&mut app, "  ");
        app.submit_dialog();

        assert!(app.dialog.is_none());
        let site = app.selected_website().unwrap();
        assert_eq!(site.name, "Hacker News");
        assert_eq!(site.url, "https://news.ycombinator.com");
        assert_eq!(site.description, None);
        assert_eq!(app.focus, Focus::Websites);
    }

    #[test]
    fn test_add_website_requires_name_and_url() {
        let (mut app, _) = test_app();
        app.begin_add_website();
        type_into_dialog(&mut app, "Only a name");
        app.submit_dialog();
        assert!(app.dialog.is_some());
        assert_eq!(app.store.document().website_count(), 20);
    }

    #[test]
    fn test_edit_website_dialog() {
        let (mut app, _) = test_app();
        app.cycle_focus();
        app.begin_edit();
        let Some(Dialog::Website(form)) = &app.dialog else {
            panic!("expected website dialog");
        };
        assert_eq!(form.fields.url, "https://chat.openai.com");
        app.dialog_next_field();
        app.dialog_next_field();
        app.dialog_prev_field();
        // Url field active: replace it
        for _ in 0.."https://chat.openai.com".len() {
            app.dialog_pop();
        }
        type_into_dialog(&mut app, "chatgpt.com");
        app.submit_dialog();
        assert_eq!(app.selected_website().unwrap().url, "https://chatgpt.com");
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let (mut app, _) = test_app();
        app.request_delete();
        assert!(matches!(
            app.pending_confirm,
            Some(ConfirmAction::DeleteCategory { websites: 4, .. })
        ));
        app.cancel_confirm();
        assert_eq!(app.view.len(), 5);

        app.request_delete();
        app.confirm();
        assert_eq!(category_names(&app), ["News", "Movies", "Songs", "Social Media"]);
    }

    #[test]
    fn test_delete_without_confirmation() {
        let config = Config {
            confirm_destructive: false,
            ..Config::default()
        };
        let (mut app, _, _) = test_app_with(&config);
        app.cycle_focus();
        app.request_delete();
        assert!(app.pending_confirm.is_none());
        assert_eq!(app.selected_category().unwrap().websites.len(), 3);
        assert_eq!(app.selected_website().unwrap().name, "Claude");
    }

    #[test]
    fn test_reset_defaults_notifies() {
        let (mut app, _) = test_app();
        app.request_delete();
        app.confirm();
        app.request_reset();
        app.confirm();
        assert_eq!(**app.store.document(), Document::seed());
        assert_eq!(app.view.len(), 5);
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "Categories reset to defaults successfully");
    }

    #[test]
    fn test_move_website_keeps_selection() {
        let (mut app, _) = test_app();
        app.cycle_focus();
        app.nav_down();
        app.move_selected_website(Direction::Up);
        assert_eq!(app.selected_website().unwrap().name, "Claude");
        assert_eq!(app.selected_website, 0);
        // Already at the top
        app.move_selected_website(Direction::Up);
        assert_eq!(app.selected_website, 0);
    }

    #[test]
    fn test_keyboard_drag_category() {
        let (mut app, _) = test_app();
        app.grab();
        assert_eq!(app.key_context(), Context::Dragging);
        app.nav_down();
        app.nav_down();
        app.drop_here();
        assert!(!app.drag.is_dragging());
        assert_eq!(
            category_names(&app),
            ["News", "Movies", "AI", "Songs", "Social Media"]
        );
        assert_eq!(app.selected_category().unwrap().name, "AI");
    }

    #[test]
    fn test_keyboard_drag_website_across_categories() {
        let (mut app, _) = test_app();
        app.cycle_focus();
        app.grab(); // ChatGPT
        app.cycle_focus(); // back to categories
        app.nav_down(); // News
        app.drop_here();

        let news = app.view.category(&CategoryId::new("news-category")).unwrap();
        assert_eq!(news.websites.last().unwrap().name, "ChatGPT");
        assert_eq!(app.selected_website().unwrap().name, "ChatGPT");
        assert_eq!(app.view.categories()[0].websites.len(), 3);
    }

    #[test]
    fn test_cancel_drag_leaves_document() {
        let (mut app, _) = test_app();
        app.grab();
        app.nav_down();
        app.cancel_drag();
        assert!(!app.drag.is_dragging());
        assert_eq!(app.store.revision(), 0);
    }

    #[test]
    fn test_cycle_theme_persists() {
        let (mut app, _, storage) = test_app_with(&Config::default());
        app.cycle_theme();
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.palette, ThemeVariant::Light.palette());
        assert_eq!(storage.get(THEME_KEY).unwrap().as_deref(), Some("\"light\""));
    }

    #[test]
    fn test_empty_document_message() {
        let config = Config {
            confirm_destructive: false,
            ..Config::default()
        };
        let (mut app, _, _) = test_app_with(&config);
        for _ in 0..5 {
            app.request_delete();
        }
        assert!(app.view.is_empty());
        assert_eq!(app.empty_message(), Some(EMPTY_DOCUMENT_MESSAGE));
        assert_eq!(app.selected_category(), None);
    }

    #[test]
    fn test_empty_category_message() {
        let (mut app, _) = test_app();
        app.begin_add_category();
        type_into_dialog(&mut app, "Empty");
        app.submit_dialog();
        assert_eq!(app.empty_message(), Some(EMPTY_CATEGORY_MESSAGE));
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Categories);
    }

    #[tokio::test]
    async fn test_notice_expires_after_ttl() {
        tokio::time::pause();
        let (mut app, _) = test_app();
        app.set_status("hello");
        assert!(!app.clear_expired_notice());

        tokio::time::advance(Duration::from_millis(2999)).await;
        assert!(!app.clear_expired_notice());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(app.clear_expired_notice());
        assert!(app.notice.is_none());
    }
}
