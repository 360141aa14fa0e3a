//! Overlays: add/edit forms and the confirmation prompt.

use crate::app::{App, ConfirmAction, Dialog, WebsiteField};
use ratatui::{
    layout::Alignment,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::centered;

/// Render a confirmation dialog overlay centered on screen.
pub fn render_confirm(f: &mut Frame, app: &App, confirm: &ConfirmAction) {
    let overlay = centered(56, 7, f.area());
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let text = vec![
        Line::from(""),
        Line::from(confirm.prompt()),
        Line::from(""),
        Line::from(Span::styled(
            "(y) Confirm  (n/Esc) Cancel",
            app.palette.input_label,
        )),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.dialog_danger)
                .title(" Confirm "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}

/// Render the add/edit form for categories and websites.
pub fn render_form(f: &mut Frame, app: &App, dialog: &Dialog) {
    let palette = &app.palette;

    let mut lines = vec![Line::from("")];
    match dialog {
        Dialog::Category(form) => {
            lines.push(Line::from(Span::styled("Category name", palette.input_label)));
            lines.push(Line::from(Span::styled(
                format!("> {}_", form.name),
                palette.dialog_field_active,
            )));
        }
        Dialog::Website(form) => {
            for field in WebsiteField::ALL {
                let active = field == form.active;
                let value_style = if active {
                    palette.dialog_field_active
                } else {
                    palette.website_name
                };
                let cursor = if active { "_" } else { "" };
                lines.push(Line::from(Span::styled(field.label(), palette.input_label)));
                lines.push(Line::from(Span::styled(
                    format!("> {}{}", form.value(field), cursor),
                    value_style,
                )));
            }
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        match dialog {
            Dialog::Category(_) => "(Enter) Save  (Esc) Cancel",
            Dialog::Website(_) => "(Tab) Next field  (Enter) Save  (Esc) Cancel",
        },
        palette.input_label,
    )));

    let height = lines.len() as u16 + 2;
    let overlay = centered(60, height, f.area());
    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.dialog_border)
                .title(format!(" {} ", dialog.title())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, overlay);
}
