use crate::app::AppState;
use crate::domain::UiMode;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn render_popup(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let height = lines.len() as u16 + 2;
    let modal_area = create_modal_area(area, height);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(format!(" {} ", title), modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}

/// Render the clear-all confirmation
pub fn render_confirm_clear_modal(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("  Are you sure you want to clear all finished items?"),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [n]", modal_title_style()),
            Span::raw(" Cancel  "),
            Span::styled("[y]", modal_title_style()),
            Span::raw(" Clear All"),
        ]),
    ];
    render_popup(f, area, "Clear Shopping List", lines);
}

/// Render the display name prompt (first run or rename)
pub fn render_name_modal(f: &mut Frame, app: &AppState, area: Rect) {
    let (title, intro) = if app.ui_mode == UiMode::Onboarding {
        ("Welcome to Pantry", "  What should we call you?")
    } else {
        ("Change Name", "  Enter a new display name.")
    };

    let mut lines = vec![
        Line::raw(""),
        Line::raw(intro),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  > "),
            Span::styled(app.name_input.clone(), modal_title_style()),
            Span::styled("█", modal_title_style()), // Cursor
        ]),
        Line::raw(""),
    ];
    if app.ui_mode == UiMode::Onboarding {
        lines.push(Line::raw("  Enter to continue"));
    } else {
        lines.push(Line::raw("  Enter to save  ·  Esc to cancel"));
    }
    render_popup(f, area, title, lines);
}

/// Render the about popup
pub fn render_about_modal(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::raw(""),
        Line::raw("  Pantry keeps track of what is running low at home."),
        Line::raw(""),
        Line::raw("  Add an item with how many days it should last. Items"),
        Line::raw("  that are finished, by hand or because their time ran"),
        Line::raw("  out, move to the shopping list."),
        Line::raw(""),
        Line::raw("  Urgency: 3 days or less is high, up to 7 is medium,"),
        Line::raw("  anything longer is low."),
        Line::raw(""),
        Line::from(vec![Span::styled("  [Esc]", modal_title_style()), Span::raw(" Close")]),
    ];
    render_popup(f, area, "About Pantry", lines);
}
