use crate::app::AppState;
use crate::config::MAX_SHOPPING_COLUMNS;
use crate::domain::{grid_rows, item_glyph, shopping_items};
use crate::ui::styles::{border_style, default_style, done_style, selected_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const CELL_HEIGHT: u16 = 3;

/// Render the shopping list as a fixed-column grid
pub fn render_shopping_pane(f: &mut Frame, app: &AppState, area: Rect) {
    let snapshot = app.tracker.snapshot();
    let items = shopping_items(snapshot.items());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(format!(" Shopping List ({}) ", items.len()), title_style()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if items.is_empty() {
        let empty = Paragraph::new("Your shopping list is empty.").style(default_style());
        f.render_widget(empty, inner);
        return;
    }

    let columns = app.config.shopping_columns.clamp(1, MAX_SHOPPING_COLUMNS);
    let ratio_den = u32::try_from(columns).unwrap_or(1);
    let rows = grid_rows(&items, columns);

    // Scroll so the selected row stays on screen
    let visible_rows = (inner.height / CELL_HEIGHT).max(1) as usize;
    let selected_row = app.selected_index / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CELL_HEIGHT); visible_rows])
        .split(inner);

    for (offset, row) in rows.iter().skip(first_row).take(visible_rows).enumerate() {
        let cell_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, ratio_den); columns])
            .split(row_areas[offset]);

        for (col, item) in row.iter().enumerate() {
            let index = (first_row + offset) * columns + col;
            let style = if index == app.selected_index {
                selected_style()
            } else {
                done_style()
            };
            let cell = Paragraph::new(Line::from(vec![
                Span::raw(format!("{} ", item_glyph(&item.name, app.use_emoji))),
                Span::raw(item.name.clone()),
            ]))
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(border_style()));
            f.render_widget(cell, cell_areas[col]);
        }
    }
}
