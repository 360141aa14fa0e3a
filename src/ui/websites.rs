use crate::app::{App, Focus};
use crate::drag::DragState;
use crate::links::favicon_url;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the websites of the highlighted category.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let is_focused = app.focus == Focus::Websites;
    let category = app.selected_category();

    let title = match category {
        Some(c) => format!("{} ({})", c.name, c.websites.len()),
        None => "Websites".to_string(),
    };
    let border_style = if is_focused {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(category) = category.filter(|c| !c.websites.is_empty()) else {
        if let Some(message) = app.empty_message() {
            let paragraph = Paragraph::new(Span::styled(message, palette.empty_state))
                .wrap(Wrap { trim: true });
            f.render_widget(paragraph, inner);
        }
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let dragging = app.drag.is_dragging();
    let grabbed = match app.drag.state() {
        DragState::Website { website, .. } => Some(website),
        _ => None,
    };
    let width = inner.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = category
        .websites
        .iter()
        .enumerate()
        .map(|(i, site)| {
            let selected = is_focused && i == app.selected_website;
            let name_style = if grabbed == Some(&site.id) {
                palette.drag_source
            } else if selected && dragging {
                palette.drop_target
            } else if selected {
                palette.website_selected
            } else {
                palette.website_name
            };
            let marker = if grabbed == Some(&site.id) {
                "= "
            } else if selected {
                "> "
            } else {
                "  "
            };

            let mut lines = vec![
                Line::from(vec![
                    Span::styled(marker, name_style),
                    Span::styled(truncate_to_width(&site.name, width), name_style),
                ]),
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(truncate_to_width(&site.url, width), palette.website_url),
                ]),
            ];
            if let Some(description) = &site.description {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        truncate_to_width(description, width),
                        palette.website_description,
                    ),
                ]));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).highlight_style(Style::default());
    let selected = is_focused.then_some(app.selected_website);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, chunks[0], &mut state);

    let site = category
        .websites
        .get(app.selected_website)
        .filter(|_| is_focused)
        .or(category.websites.first());
    if let Some(site) = site {
        let icon = format!("Icon: {}", favicon_url(&site.url));
        let footer = Paragraph::new(Span::styled(
            truncate_to_width(&icon, chunks[1].width as usize).into_owned(),
            palette.input_placeholder,
        ));
        f.render_widget(footer, chunks[1]);
    }
}
