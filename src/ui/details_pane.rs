use crate::app::AppState;
use crate::domain::{days_left_label, format_date, is_last_day};
use crate::ui::styles::{border_style, default_style, gauge_style, title_style, urgency_style, warning_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Render the details pane for the selected item
pub fn render_details_pane(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Details ", title_style()));

    let Some(item) = app.selected_item() else {
        f.render_widget(Paragraph::new("No item selected").block(block), area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut lines = vec![
        Line::from(vec![Span::styled("Name:     ", title_style()), Span::raw(item.name.clone())]),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Added:    ", title_style()),
            Span::raw(format_date(item.added_date)),
        ]),
        Line::from(vec![
            Span::styled("Finishes: ", title_style()),
            Span::raw(format_date(item.finish_date)),
        ]),
        Line::from(vec![
            Span::styled("Urgency:  ", title_style()),
            Span::styled(format!(" {} ", item.urgency_level.to_tag()), urgency_style(item.urgency_level)),
        ]),
        Line::from(vec![
            Span::styled("Left:     ", title_style()),
            Span::raw(days_left_label(&item, now)),
        ]),
    ];
    if is_last_day(&item, now) {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Last day! Time to restock.", warning_style())));
    }

    let paragraph = Paragraph::new(lines).style(default_style()).wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[0]);

    let progress = item.progress(now);
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(progress)
        .label(format!("{:.0}% remaining", progress * 100.0));
    f.render_widget(gauge, chunks[1]);
}
