use crate::app::AppState;
use crate::ui::{
    layout::create_modal_area,
    styles::{error_style, modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn field_lines<'a>(label: &'a str, value: &'a str, editing: bool) -> [Line<'a>; 2] {
    let label = if editing {
        Line::raw(format!("{} (editing)", label))
    } else {
        Line::raw(label)
    };
    let value = Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if editing {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ]);
    [label, value]
}

/// Render the input form for adding items
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let modal_area = create_modal_area(area, 13);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let mut lines = vec![Line::raw("")];
        lines.extend(field_lines("Item name:", &form.name, form.editing_field == 0));
        lines.push(Line::raw(""));
        lines.extend(field_lines("Days until empty:", &form.days, form.editing_field == 1));
        lines.push(Line::raw(""));

        match &form.error {
            Some(error) => lines.push(Line::from(Span::styled(format!("⚠ {}", error), error_style()))),
            None => lines.push(Line::raw("")),
        }
        lines.push(Line::raw(""));
        lines.push(Line::raw("Tab to switch fields  ·  Enter to add  ·  Esc to cancel"));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(" Add Item ", modal_title_style()))
                    .style(modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}
