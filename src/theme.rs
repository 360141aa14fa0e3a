//! Theme system for the TUI.
//!
//! `ThemeVariant` selects between Dark and Light palettes; `ColorPalette`
//! maps each visual role of the bookmark screens to a ratatui `Style`.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    /// Value written to storage.
    pub fn as_key(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark -> Light -> Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    // -- Categories panel --
    pub category_normal: Style,
    pub category_selected: Style,
    pub category_badge: Style,
    /// Item currently grabbed for a keyboard drag.
    pub drag_source: Style,
    /// Item the grabbed one would be dropped on.
    pub drop_target: Style,

    // -- Websites panel --
    pub website_name: Style,
    pub website_url: Style,
    pub website_description: Style,
    pub website_selected: Style,
    pub empty_state: Style,

    // -- Header inputs --
    pub input_label: Style,
    pub input_active: Style,
    pub input_placeholder: Style,

    // -- Dialogs --
    pub dialog_border: Style,
    pub dialog_field_active: Style,
    pub dialog_danger: Style,
    pub help_key: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub notice_success: Style,
    pub notice_error: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            category_normal: Style::default(),
            category_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            category_badge: Style::default().fg(Color::Cyan),
            drag_source: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            drop_target: Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            website_name: Style::default().add_modifier(Modifier::BOLD),
            website_url: Style::default().fg(Color::Cyan),
            website_description: Style::default().fg(Color::Gray),
            website_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            empty_state: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            input_label: Style::default().fg(Color::Gray),
            input_active: Style::default().fg(Color::Yellow),
            input_placeholder: Style::default().fg(Color::DarkGray),

            dialog_border: Style::default().fg(Color::Cyan),
            dialog_field_active: Style::default().fg(Color::Yellow),
            dialog_danger: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Cyan),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            notice_success: Style::default().bg(Color::Green).fg(Color::Black),
            notice_error: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            category_normal: Style::default().fg(Color::Black),
            category_selected: Style::default().bg(Color::Blue).fg(Color::White),
            category_badge: Style::default().fg(Color::Blue),
            drag_source: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            drop_target: Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            website_name: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            website_url: Style::default().fg(Color::Blue),
            website_description: Style::default().fg(Color::DarkGray),
            website_selected: Style::default().bg(Color::Blue).fg(Color::White),
            empty_state: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            input_label: Style::default().fg(Color::DarkGray),
            input_active: Style::default().fg(Color::Magenta),
            input_placeholder: Style::default().fg(Color::Gray),

            dialog_border: Style::default().fg(Color::Blue),
            dialog_field_active: Style::default().fg(Color::Magenta),
            dialog_danger: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            help_key: Style::default().fg(Color::Blue),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            notice_success: Style::default().bg(Color::Green).fg(Color::Black),
            notice_error: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}
