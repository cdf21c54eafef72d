pub mod details_pane;
pub mod header;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod shopping_pane;
pub mod styles;

use crate::app::AppState;
use crate::domain::{UiMode, View};
use chrono::Local;
use details_pane::render_details_pane;
use header::{render_header, render_status};
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::{render_about_modal, render_confirm_clear_modal, render_name_modal};
use ratatui::Frame;
use shopping_pane::render_shopping_pane;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let now = Local::now();
    let layout = create_layout(size, app.view);

    render_keybindings(f, layout.keybindings_area, app.view);
    render_header(f, app, layout.header_area);

    match app.view {
        View::Current => render_list_pane(f, app, layout.list_area, now),
        View::Shopping => render_shopping_pane(f, app, layout.list_area),
    }
    if let Some(details_area) = layout.details_area {
        render_details_pane(f, app, details_area, now);
    }

    render_status(f, app, layout.status_area);

    // Popups
    match app.ui_mode {
        UiMode::AddingItem => render_input_form(f, app, size),
        UiMode::Onboarding | UiMode::EditingName => render_name_modal(f, app, size),
        UiMode::ConfirmClear => render_confirm_clear_modal(f, size),
        UiMode::About => render_about_modal(f, size),
        UiMode::Normal | UiMode::Filtering => {}
    }
}
