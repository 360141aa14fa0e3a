//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Layout and overlay dispatch
//! - `header` - Web search and filter inputs
//! - `categories` - Category list widget
//! - `websites` - Website list widget
//! - `dialogs` - Add/edit forms and the confirmation overlay
//! - `help` - Keybinding overlay
//! - `status` - Status bar widget

mod categories;
mod dialogs;
mod header;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;
mod websites;

pub use loop_runner::{run, Action};

use ratatui::layout::Rect;

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
