use crate::app::{AppState, StatusKind};
use crate::domain::{UiMode, View};
use crate::ui::styles::{active_tab_style, border_style, default_style, error_style, hint_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// Render the view tabs with the greeting as the block title
pub fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (current, shopping) = app.counts();
    let titles = vec![
        Line::raw(format!("{} ({})", View::Current.title(), current)),
        Line::raw(format!("{} ({})", View::Shopping.title(), shopping)),
    ];

    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .style(default_style())
        .highlight_style(active_tab_style())
        .divider("│")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(format!(" 🧺 {} ", app.profile.greeting()), title_style())),
        );

    f.render_widget(tabs, area);
}

/// Render the bottom status line: last feedback or persistence error
pub fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    let line = match &app.status {
        _ if app.ui_mode == UiMode::Filtering => Line::from(vec![
            Span::styled(" Filter: ", title_style()),
            Span::raw(app.filter.clone()),
            Span::styled("█", title_style()),
            Span::styled("   Enter keep · Esc clear", hint_style()),
        ]),
        Some(status) => {
            let style = match status.kind {
                StatusKind::Info => default_style(),
                StatusKind::Error => error_style(),
            };
            Line::from(Span::styled(format!(" {}", status.text), style))
        }
        None => Line::from(Span::styled(" Ready", hint_style())),
    };
    f.render_widget(Paragraph::new(line), area);
}
