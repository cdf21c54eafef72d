use crate::domain::View;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar for the active view
pub fn render_keybindings(f: &mut Frame, area: Rect, view: View) {
    let mut hints = vec![Span::raw(" Tab/1/2 view   ")];
    match view {
        View::Current => hints.extend([
            Span::raw("↑/↓ select   "),
            Span::raw("a add   "),
            Span::raw("f/Enter finished   "),
            Span::raw("x delete   "),
            Span::raw("s sort   "),
            Span::raw("/ filter   "),
        ]),
        View::Shopping => hints.extend([
            Span::raw("←/↑/↓/→ select   "),
            Span::raw("x remove   "),
            Span::raw("C clear all   "),
        ]),
    }
    hints.extend([Span::raw("N name   "), Span::raw("? about   "), Span::raw("q quit")]);

    let paragraph = Paragraph::new(Line::from(hints)).style(hint_style());
    f.render_widget(paragraph, area);
}
