use crate::app::{App, Focus};
use crate::drag::DragState;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the category list with website count badges.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let is_focused = app.focus == Focus::Categories;
    let dragging = app.drag.is_dragging();
    let grabbed = match app.drag.state() {
        DragState::Category(id) => Some(id),
        _ => None,
    };
    // Room for borders, the marker and the badge
    let name_width = area.width.saturating_sub(10) as usize;

    let items: Vec<ListItem> = app
        .view
        .categories()
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let selected = i == app.selected_category;
            let style = if grabbed == Some(&category.id) {
                palette.drag_source
            } else if selected && dragging && is_focused {
                palette.drop_target
            } else if selected {
                palette.category_selected
            } else {
                palette.category_normal
            };
            let marker = if grabbed == Some(&category.id) {
                "= "
            } else if selected {
                "> "
            } else {
                "  "
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(truncate_to_width(&category.name, name_width), style),
                Span::styled(format!(" [{}]", category.websites.len()), palette.category_badge),
            ]))
        })
        .collect();

    let border_style = if is_focused {
        palette.panel_border_focused
    } else {
        palette.panel_border
    };

    let title = format!("Categories ({})", app.view.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .highlight_style(Style::default());

    let selected = (!app.view.is_empty()).then_some(app.selected_category);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, area, &mut state);
}
