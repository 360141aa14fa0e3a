//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, termination signals and a periodic tick.
//! Every handler runs to completion before the next event is read.

use crate::app::App;
use anyhow::{Context as _, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::input::handle_input;
use super::render::render;

/// Notice expiry is checked this often.
const TICK: Duration = Duration::from_millis(250);

/// Result of handling a key press event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep reading events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Raw-mode alternate screen, restored on drop (including early returns).
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "Failed to disable raw mode");
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            tracing::warn!(error = %e, "Failed to leave alternate screen");
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Runs the TUI until the user quits or a termination signal arrives.
///
/// A panic hook leaves raw mode before the default hook prints, so a panic
/// message is readable.
pub async fn run(app: &mut App) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut session = TerminalSession::start().context("Failed to set up terminal")?;
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        if app.needs_redraw {
            session.terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        #[cfg(unix)]
        let (sigterm_fut, sigint_fut) = (sigterm.recv(), sigint.recv());
        #[cfg(not(unix))]
        let (sigterm_fut, sigint_fut) = (
            std::future::pending::<Option<()>>(),
            std::future::pending::<Option<()>>(),
        );

        let action = tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down");
                Action::Quit
            }
            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down");
                Action::Quit
            }
            event = events.next() => on_terminal_event(app, event),
            _ = tick.tick() => {
                if app.clear_expired_notice() {
                    app.needs_redraw = true;
                }
                Action::Continue
            }
        };

        if action == Action::Quit {
            break;
        }
    }

    drop(session);
    Ok(())
}

fn on_terminal_event(app: &mut App, event: Option<io::Result<Event>>) -> Action {
    match event {
        Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
            app.needs_redraw = true;
            handle_input(app, key.code, key.modifiers)
        }
        Some(Ok(Event::Resize(..))) => {
            app.needs_redraw = true;
            Action::Continue
        }
        Some(Ok(_)) => Action::Continue,
        Some(Err(e)) => {
            tracing::error!(error = %e, "Terminal event stream failed");
            Action::Quit
        }
        None => Action::Quit,
    }
}
