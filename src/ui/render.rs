//! Render functions for the TUI.
//!
//! Lays out the header, the two panels and the status bar, then draws
//! whichever overlay is active on top.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{categories, dialogs, header, help, status, websites};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    header::render(f, app, chunks[0]);
    render_main_panels(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    } else if let Some(confirm) = &app.pending_confirm {
        dialogs::render_confirm(f, app, confirm);
    } else if let Some(dialog) = &app.dialog {
        dialogs::render_form(f, app, dialog);
    }
}

/// Categories on the left, websites of the highlighted category on the right.
fn render_main_panels(f: &mut Frame, app: &App, area: Rect) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    categories::render(f, app, main_chunks[0]);
    websites::render(f, app, main_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{EMPTY_DOCUMENT_MESSAGE, EMPTY_FILTER_MESSAGE};
    use crate::config::Config;
    use crate::keybindings::KeybindingRegistry;
    use crate::links::RecordingOpener;
    use crate::preferences::PreferenceManager;
    use crate::storage::{MemoryStorage, Storage};
    use crate::store::DocumentStore;
    use ratatui::{backend::TestBackend, Terminal};

    fn app_with(storage: MemoryStorage) -> App {
        let prefs = PreferenceManager::load(&Config::default(), &storage);
        let store = DocumentStore::load(Box::new(storage) as Box<dyn Storage>);
        App::new(
            store,
            prefs,
            KeybindingRegistry::new(),
            Box::new(RecordingOpener::new()),
        )
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_seed_layout() {
        let app = app_with(MemoryStorage::new());
        let screen = draw(&app, 100, 30);
        assert!(screen.contains("Search the web"));
        assert!(screen.contains("Filter bookmarks"));
        assert!(screen.contains("Social Media"));
        assert!(screen.contains("ChatGPT"));
        assert!(screen.contains("https://chat.openai.com"));
    }

    #[test]
    fn test_renders_empty_filter_message() {
        let mut app = app_with(MemoryStorage::new());
        app.filter_input = "zzzz".to_string();
        app.refresh_view();
        let screen = draw(&app, 100, 30);
        assert!(screen.contains(EMPTY_FILTER_MESSAGE));
    }

    #[test]
    fn test_renders_empty_document_message() {
        let mut app = app_with(MemoryStorage::new());
        let ids: Vec<_> = app.store.document().categories().iter().map(|c| c.id.clone()).collect();
        for id in ids {
            app.store.remove_category(&id).unwrap();
        }
        app.refresh_view();
        let screen = draw(&app, 100, 30);
        assert!(screen.contains(&EMPTY_DOCUMENT_MESSAGE[..20]));
    }

    #[test]
    fn test_small_terminal_message() {
        let app = app_with(MemoryStorage::new());
        let screen = draw(&app, 40, 8);
        assert!(screen.contains("Terminal too small"));
    }

    #[test]
    fn test_confirm_overlay_drawn() {
        let mut app = app_with(MemoryStorage::new());
        app.request_reset();
        let screen = draw(&app, 100, 30);
        assert!(screen.contains("Confirm"));
        assert!(screen.contains("(y) Confirm"));
    }
}
