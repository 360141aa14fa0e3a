//! Input handling for the TUI.
//!
//! Overlays capture keys first (help, confirmation, dialogs), then the
//! header inputs, then the panels through the keybinding registry.

use crate::app::{App, Focus, InputMode};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::store::Direction;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    if app.show_help {
        return handle_help_input(app, code);
    }

    if app.pending_confirm.is_some() {
        return handle_confirm_input(app, code);
    }

    if app.dialog.is_some() {
        return handle_dialog_input(app, code, modifiers);
    }

    if app.mode != InputMode::Normal {
        return handle_header_input(app, code, modifiers);
    }

    if app.drag.is_dragging() {
        return handle_drag_input(app, code, modifiers);
    }

    handle_browse_input(app, code, modifiers)
}

/// Help overlay: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Confirmation overlay: y/Y confirms, n/N/Esc cancels, other keys are ignored.
fn handle_confirm_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_confirm(),
        _ => {}
    }
    Action::Continue
}

/// Add/edit forms capture every key.
fn handle_dialog_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match code {
        KeyCode::Esc => app.cancel_dialog(),
        KeyCode::Enter => app.submit_dialog(),
        KeyCode::Tab | KeyCode::Down => app.dialog_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.dialog_prev_field(),
        KeyCode::Backspace => app.dialog_pop(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => app.dialog_push(c),
        _ => {}
    }
    Action::Continue
}

/// Filter and web search inputs.
fn handle_header_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app.keybindings.action_for_key(code, modifiers, KbContext::Input) {
        Some(KbAction::Submit) => app.submit_input(),
        Some(KbAction::Back) => app.leave_input(),
        _ => match code {
            KeyCode::Backspace => app.input_pop(),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit;
            }
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => app.input_push(c),
            _ => {}
        },
    }
    Action::Continue
}

/// While an item is grabbed only navigation, drop and cancel apply.
fn handle_drag_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app.keybindings.action_for_key(code, modifiers, KbContext::Dragging) {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::Drop) => app.drop_here(),
        Some(KbAction::CancelDrag) => app.cancel_drag(),
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::CycleFocus) => app.cycle_focus(),
        Some(KbAction::ShowHelp) => app.show_help = true,
        _ => {}
    }
    Action::Continue
}

fn handle_browse_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    let context = app.key_context();
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Action::Continue;
    };

    match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::CycleFocus => app.cycle_focus(),
        KbAction::Back => app.back(),
        KbAction::Open => app.open_selected(),
        KbAction::EnterFilter => app.enter_filter(),
        KbAction::EnterWebSearch => app.enter_web_search(),
        KbAction::AddCategory => app.begin_add_category(),
        KbAction::AddWebsite => app.begin_add_website(),
        KbAction::Edit => app.begin_edit(),
        KbAction::Delete => app.request_delete(),
        KbAction::MoveUp if app.focus == Focus::Websites => {
            app.move_selected_website(Direction::Up)
        }
        KbAction::MoveDown if app.focus == Focus::Websites => {
            app.move_selected_website(Direction::Down)
        }
        KbAction::Grab => app.grab(),
        KbAction::ResetDefaults => app.request_reset(),
        KbAction::CycleTheme => app.cycle_theme(),
        KbAction::ShowHelp => app.show_help = true,
        KbAction::MoveUp
        | KbAction::MoveDown
        | KbAction::Submit
        | KbAction::Drop
        | KbAction::CancelDrag => {}
    }
    Action::Continue
}
