//! Help overlay listing every key binding, grouped by where it applies.
//!
//! Bindings come from the registry, so config overrides show up here.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::centered;

const SECTIONS: [Context; 5] = [
    Context::Global,
    Context::Categories,
    Context::Websites,
    Context::Input,
    Context::Dragging,
];

/// One line of the help table.
#[derive(Debug, Clone, PartialEq, Eq)]
enum HelpLine {
    Section(&'static str),
    Binding { key: String, description: &'static str },
    Gap,
}

fn help_lines(app: &App) -> Vec<HelpLine> {
    let bindings = app.keybindings.all_bindings();
    let mut lines = Vec::new();
    for section in SECTIONS {
        let mut entries = bindings
            .iter()
            .filter(|(ctx, ..)| *ctx == section)
            .peekable();
        if entries.peek().is_none() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(HelpLine::Gap);
        }
        lines.push(HelpLine::Section(section.label()));
        lines.extend(entries.map(|(_, key, _, description)| HelpLine::Binding {
            key: key.clone(),
            description: *description,
        }));
    }
    lines
}

/// First row to show and whether more rows follow, for `total` rows in
/// `height` visible rows at the requested `offset`.
fn scroll_window(total: usize, height: usize, offset: usize) -> (usize, bool) {
    let max_start = total.saturating_sub(height);
    let start = offset.min(max_start);
    (start, start < max_start)
}

pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    let overlay = centered(area.width / 5 * 4, area.height / 5 * 4, area);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let lines = help_lines(app);
    // Borders, header row and its margin
    let height = overlay.height.saturating_sub(4) as usize;
    let (start, more_below) = scroll_window(lines.len(), height, app.help_scroll_offset);

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let rows: Vec<Row> = lines
        .into_iter()
        .skip(start)
        .take(height)
        .map(|line| match line {
            HelpLine::Section(label) => Row::new(vec![Line::from(Span::styled(label, heading))]),
            HelpLine::Binding { key, description } => Row::new(vec![
                Line::from(Span::styled(format!("  {key}"), app.palette.help_key)),
                Line::from(description),
            ]),
            HelpLine::Gap => Row::new(vec![Line::from("")]),
        })
        .collect();

    let title = if start > 0 || more_below {
        " Help (j/k scroll) "
    } else {
        " Help (? to close) "
    };

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(20)])
        .header(
            Row::new(vec!["Key", "Action"])
                .style(heading.add_modifier(Modifier::UNDERLINED))
                .bottom_margin(1),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border_focused)
                .title(title),
        );
    f.render_widget(table, overlay);

    if more_below {
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.bottom().saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        let hint = Span::styled(" more below: j ", app.palette.input_placeholder);
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}
