use crate::app::AppState;
use crate::domain::{days_left_label, is_last_day, item_glyph, Item};
use crate::ui::styles::{border_style, default_style, selected_style, title_style, urgency_style, warning_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the current items list
pub fn render_list_pane(f: &mut Frame, app: &AppState, area: Rect, now: DateTime<Local>) {
    let items = app.visible_items();

    let mut title = format!(" Current Items · by {} ", app.sort.label());
    if !app.filter.is_empty() {
        title.push_str(&format!("· \"{}\" ", app.filter));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(title, title_style()));

    if items.is_empty() {
        let message = if app.filter.is_empty() {
            "Nothing tracked yet. Press 'a' to add an item."
        } else {
            "No items match the filter."
        };
        f.render_widget(Paragraph::new(message).style(default_style()).block(block), area);
        return;
    }

    let rows: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(create_item_line(item, app.use_emoji, now)))
        .collect();

    let list = List::new(rows).block(block).highlight_style(selected_style());
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut state);
}

/// Format: 🥛 Milk  [2d left]  last day!
fn create_item_line(item: &Item, use_emoji: bool, now: DateTime<Local>) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("{} ", item_glyph(&item.name, use_emoji))),
        Span::raw(item.name.clone()),
        Span::raw("  ".to_string()),
        Span::styled(format!(" {} ", days_left_label(item, now)), urgency_style(item.urgency_level)),
    ];

    if is_last_day(item, now) {
        spans.push(Span::styled("  last day!".to_string(), warning_style()));
    }

    Line::from(spans)
}
