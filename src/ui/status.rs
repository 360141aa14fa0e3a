use crate::app::{App, InputMode, NoticeKind};
use crate::keybindings::{Action, Context};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

const BROWSE_HINTS: [(Action, &str); 9] = [
    (Action::EnterFilter, "filter"),
    (Action::EnterWebSearch, "web search"),
    (Action::AddCategory, "add category"),
    (Action::AddWebsite, "add website"),
    (Action::Edit, "edit"),
    (Action::Delete, "delete"),
    (Action::Grab, "move"),
    (Action::ShowHelp, "help"),
    (Action::Quit, "quit"),
];

const DRAG_HINTS: [(Action, &str); 4] = [
    (Action::NavDown, "pick target"),
    (Action::CycleFocus, "switch panel"),
    (Action::Drop, "drop"),
    (Action::CancelDrag, "cancel"),
];

/// `[key]label` pairs for every action bound in `context`, skipping unbound ones.
fn bracketed(app: &App, context: Context, hints: &[(Action, &str)]) -> String {
    hints
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_hint(*action, context)
                .map(|key| format!("[{key}]{label}"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Key hints for the current mode, built from the live bindings.
fn hints(app: &App) -> String {
    let context = app.key_context();
    let key = |action| app.keybindings.key_hint(action, context).unwrap_or_default();
    match app.mode {
        InputMode::Filter => format!("Type to filter | {} done", key(Action::Back)),
        InputMode::WebSearch => format!(
            "Type a query | {} search | {} cancel",
            key(Action::Submit),
            key(Action::Back)
        ),
        InputMode::Normal if app.drag.is_dragging() => {
            bracketed(app, context, &DRAG_HINTS)
        }
        InputMode::Normal => bracketed(app, context, &BROWSE_HINTS),
    }
}

/// Render the status bar: the current notice, or key hints for the mode.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let palette = &app.palette;

    let (text, style): (Cow<'_, str>, _) = match &app.notice {
        Some(notice) => {
            let style = match notice.kind {
                NoticeKind::Info => palette.status_bar,
                NoticeKind::Success => palette.notice_success,
                NoticeKind::Error => palette.notice_error,
            };
            (Cow::Borrowed(notice.text.as_ref()), style)
        }
        None => (Cow::Owned(hints(app)), palette.status_bar),
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}
