//! Keybinding registry: maps key events to actions, with config overrides.
//!
//! Bindings are looked up per [`Context`] first and then in `Global`, so a
//! key like `a` can mean "add category" in the categories panel and "add
//! website" in the websites panel.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Back,
    Open,
    Submit,
    EnterFilter,
    EnterWebSearch,
    AddCategory,
    AddWebsite,
    Edit,
    Delete,
    MoveUp,
    MoveDown,
    Grab,
    Drop,
    CancelDrag,
    ResetDefaults,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::CycleFocus => "Switch panel",
            Self::Back => "Go back / clear filter",
            Self::Open => "Open website / show category",
            Self::Submit => "Submit input",
            Self::EnterFilter => "Filter bookmarks",
            Self::EnterWebSearch => "Search the web",
            Self::AddCategory => "Add category",
            Self::AddWebsite => "Add website",
            Self::Edit => "Rename category / edit website",
            Self::Delete => "Delete selected item",
            Self::MoveUp => "Move website up",
            Self::MoveDown => "Move website down",
            Self::Grab => "Grab item to reorder",
            Self::Drop => "Drop grabbed item here",
            Self::CancelDrag => "Cancel reorder",
            Self::ResetDefaults => "Reset to default bookmarks",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Categories,
    Websites,
    /// A single-line header input (filter or web search) has focus.
    Input,
    /// An item is grabbed and waiting for a drop target.
    Dragging,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Categories => "Categories",
            Self::Websites => "Websites",
            Self::Input => "Input",
            Self::Dragging => "Reordering",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Accepts single characters ("q", "/"), named keys ("Enter", "Esc", "Tab",
/// arrows, "Backspace", "Space"), "Ctrl+<char>" and "F1" to "F12".
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => return Some(KeySpec::plain(KeyCode::Enter)),
        "esc" | "escape" => return Some(KeySpec::plain(KeyCode::Esc)),
        "tab" => return Some(KeySpec::plain(KeyCode::Tab)),
        "up" => return Some(KeySpec::plain(KeyCode::Up)),
        "down" => return Some(KeySpec::plain(KeyCode::Down)),
        "left" => return Some(KeySpec::plain(KeyCode::Left)),
        "right" => return Some(KeySpec::plain(KeyCode::Right)),
        "backspace" => return Some(KeySpec::plain(KeyCode::Backspace)),
        "space" => return Some(KeySpec::ch(' ')),
        _ => {}
    }

    if let Some(n) = s.strip_prefix(|c: char| c == 'F' || c == 'f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then_some(KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings with default bindings and config overrides.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::*;

        // === Global ===
        self.bind(Global, KeySpec::ch('q'), Action::Quit);
        self.bind(Global, KeySpec::ctrl('c'), Action::Quit);
        self.bind(Global, KeySpec::ch('j'), Action::NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Global, KeySpec::ch('k'), Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::CycleFocus);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);
        self.bind(Global, KeySpec::plain(KeyCode::Enter), Action::Open);
        self.bind(Global, KeySpec::ch('/'), Action::EnterFilter);
        self.bind(Global, KeySpec::ch('g'), Action::EnterWebSearch);
        self.bind(Global, KeySpec::ch('A'), Action::AddCategory);
        self.bind(Global, KeySpec::ch('w'), Action::AddWebsite);
        self.bind(Global, KeySpec::ch('m'), Action::Grab);
        self.bind(Global, KeySpec::ch('R'), Action::ResetDefaults);
        self.bind(Global, KeySpec::ch('T'), Action::CycleTheme);
        self.bind(Global, KeySpec::ch('?'), Action::ShowHelp);

        // === Categories panel ===
        self.bind(Categories, KeySpec::ch('a'), Action::AddCategory);
        self.bind(Categories, KeySpec::ch('e'), Action::Edit);
        self.bind(Categories, KeySpec::ch('d'), Action::Delete);

        // === Websites panel ===
        self.bind(Websites, KeySpec::ch('a'), Action::AddWebsite);
        self.bind(Websites, KeySpec::ch('e'), Action::Edit);
        self.bind(Websites, KeySpec::ch('d'), Action::Delete);
        self.bind(Websites, KeySpec::ch('o'), Action::Open);
        self.bind(Websites, KeySpec::ch('K'), Action::MoveUp);
        self.bind(Websites, KeySpec::ch('J'), Action::MoveDown);

        // === Header inputs ===
        self.bind(Input, KeySpec::plain(KeyCode::Enter), Action::Submit);
        self.bind(Input, KeySpec::plain(KeyCode::Esc), Action::Back);

        // === Dragging ===
        self.bind(Dragging, KeySpec::ch('m'), Action::Drop);
        self.bind(Dragging, KeySpec::plain(KeyCode::Enter), Action::Drop);
        self.bind(Dragging, KeySpec::plain(KeyCode::Esc), Action::CancelDrag);
    }

    /// Apply user overrides from the config `keybindings` table.
    ///
    /// Keys are action names ("quit", "web_search"), values are key strings
    /// ("Ctrl+q", "F5"). The new key replaces the old one in every context the
    /// action was bound in. Returns warnings for entries that were skipped.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    ///
    /// The Input context never falls back: typed characters belong to the
    /// input, not to global shortcuts.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Terminals report `K` as Char('K') + SHIFT; the case is already in the char
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        match context {
            Context::Global | Context::Input => None,
            _ => self.lookup.get(&(Context::Global, key)).copied(),
        }
    }

    /// Display key for the first binding of `action` in `context` or Global.
    pub fn key_hint(&self, action: Action, context: Context) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *a == action && (*c == context || *c == Context::Global))
            .map(|(_, key, _)| format_key(key))
    }

    /// All bindings for the help screen: (context, key, action, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "cycle_focus" | "focus" => Some(Action::CycleFocus),
        "back" => Some(Action::Back),
        "open" => Some(Action::Open),
        "submit" => Some(Action::Submit),
        "filter" | "enter_filter" => Some(Action::EnterFilter),
        "web_search" | "enter_web_search" => Some(Action::EnterWebSearch),
        "add_category" => Some(Action::AddCategory),
        "add_website" => Some(Action::AddWebsite),
        "edit" | "rename" => Some(Action::Edit),
        "delete" => Some(Action::Delete),
        "move_up" => Some(Action::MoveUp),
        "move_down" => Some(Action::MoveDown),
        "grab" => Some(Action::Grab),
        "drop" => Some(Action::Drop),
        "cancel_drag" => Some(Action::CancelDrag),
        "reset" | "reset_defaults" => Some(Action::ResetDefaults),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "help" | "show_help" => Some(Action::ShowHelp),
        _ => None,
    }
}
