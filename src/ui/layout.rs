use crate::domain::View;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub header_area: Rect,
    pub list_area: Rect,
    /// Only the current-items view has a details pane
    pub details_area: Option<Rect>,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Header: tabs and greeting (3 rows)
/// - Main area: List (65%) | Details (35%) on the current view, full-width grid on the shopping view
/// - Bottom: status line (1 row)
pub fn create_layout(area: Rect, view: View) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let (list_area, details_area) = match view {
        View::Current => {
            let horizontal_split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(65), // List pane
                    Constraint::Percentage(35), // Details pane
                ])
                .split(main_chunks[2]);
            (horizontal_split[0], Some(horizontal_split[1]))
        }
        View::Shopping => (main_chunks[2], None),
    };

    MainLayout {
        keybindings_area: main_chunks[0],
        header_area: main_chunks[1],
        list_area,
        details_area,
        status_area: main_chunks[3],
    }
}

/// Create centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(height),
            Constraint::Percentage(25),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_layout() {
        let area = Rect::new(0, 0, 100, 50);
        let layout = create_layout(area, View::Current);

        assert!(layout.list_area.height > 0);
        assert!(layout.details_area.is_some());
        assert_eq!(layout.keybindings_area.height, 1);
        assert_eq!(layout.header_area.height, 3);
        assert_eq!(layout.status_area.height, 1);

        let shopping = create_layout(area, View::Shopping);
        assert!(shopping.details_area.is_none());
        assert_eq!(shopping.list_area.width, area.width);
    }

    #[test]
    fn test_create_modal_area() {
        let area = Rect::new(0, 0, 100, 50);
        let modal = create_modal_area(area, 9);

        assert!(modal.width < area.width);
        assert!(modal.height < area.height);
        assert_eq!(modal.height, 9);
    }
}
