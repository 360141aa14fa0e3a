use crate::app::{App, InputMode};
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the two header inputs: web search on the left, filter on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 4 || area.height < 3 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_input(
        f,
        app,
        chunks[0],
        InputField {
            title: "Search the web",
            hint: app.keybindings.key_hint(Action::EnterWebSearch, Context::Global),
            value: &app.web_search_input,
            placeholder: "Search Google...",
            active: app.mode == InputMode::WebSearch,
        },
    );
    render_input(
        f,
        app,
        chunks[1],
        InputField {
            title: "Filter bookmarks",
            hint: app.keybindings.key_hint(Action::EnterFilter, Context::Global),
            value: &app.filter_input,
            placeholder: "Filter categories and websites...",
            active: app.mode == InputMode::Filter,
        },
    );
}

struct InputField<'a> {
    title: &'static str,
    hint: Option<String>,
    value: &'a str,
    placeholder: &'static str,
    active: bool,
}

fn render_input(f: &mut Frame, app: &App, area: Rect, field: InputField<'_>) {
    let palette = &app.palette;

    let title = match &field.hint {
        Some(key) => format!(" {} ({}) ", field.title, key),
        None => format!(" {} ", field.title),
    };

    let border_style = if field.active {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };

    let line = if field.value.is_empty() && !field.active {
        Line::from(Span::styled(field.placeholder, palette.input_placeholder))
    } else {
        let style = if field.active {
            palette.input_active
        } else {
            palette.input_label
        };
        let cursor = if field.active { "_" } else { "" };
        // Keep the tail visible when the text outgrows the box
        let inner = area.width.saturating_sub(3) as usize;
        let visible = tail_to_width(field.value, inner);
        Line::from(vec![
            Span::styled("> ", palette.input_label),
            Span::styled(format!("{}{}", visible, cursor), style),
        ])
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(title, palette.input_label)),
    );
    f.render_widget(paragraph, area);
}

/// Longest suffix of `s` that fits in `max_width` columns (minus the cursor).
fn tail_to_width(s: &str, max_width: usize) -> &str {
    let budget = max_width.saturating_sub(2);
    let mut width = 0;
    let mut start = s.len();
    for (i, c) in s.char_indices().rev() {
        width += unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width > budget {
            break;
        }
        start = i;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_to_width() {
        assert_eq!(tail_to_width("hello", 20), "hello");
        assert_eq!(tail_to_width("hello world", 7), "world");
        assert_eq!(tail_to_width("", 7), "");
        assert_eq!(tail_to_width("日本語", 6), "本語");
        assert_eq!(tail_to_width("日本語", 5), "語");
    }
}
