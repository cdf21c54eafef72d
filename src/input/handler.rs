use crate::app::AppState;
use crate::domain::{Confirmation, UiMode, View};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns `true` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::Onboarding | UiMode::EditingName => handle_name_mode(app, key),
        UiMode::AddingItem => handle_input_form_mode(app, key),
        UiMode::Filtering => handle_filter_mode(app, key),
        UiMode::ConfirmClear => handle_confirm_clear_mode(app, key),
        UiMode::About => handle_about_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Left | KeyCode::Char('h') => app.move_selection_left(),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection_right(),

        // Tabs
        KeyCode::Tab | KeyCode::BackTab => app.switch_view(app.view.toggled()),
        KeyCode::Char('1') => app.switch_view(View::Current),
        KeyCode::Char('2') => app.switch_view(View::Shopping),

        // Add item
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_item(),

        // Mark finished
        KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Enter => app.mark_selected_finished(),

        // Delete
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),

        // Clear the shopping list
        KeyCode::Char('C') => {
            if app.view == View::Shopping {
                app.request_clear_finished();
            }
        }

        KeyCode::Char('s') | KeyCode::Char('S') => {
            if app.view == View::Current {
                app.cycle_sort();
            }
        }

        KeyCode::Char('/') => app.start_filter(),

        // Esc drops an active filter
        KeyCode::Esc => {
            if !app.filter.is_empty() {
                app.cancel_filter();
            }
        }

        KeyCode::Char('N') => app.start_edit_name(),
        KeyCode::Char('?') => app.toggle_about(),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys in the add-item form
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(Local::now()),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.input_form_toggle_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while typing a display name (onboarding or rename)
fn handle_name_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_name(),
        KeyCode::Esc => app.cancel_name(),
        KeyCode::Backspace => app.name_backspace(),
        KeyCode::Char(c) => app.name_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys while typing a filter
fn handle_filter_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.finish_filter(),
        KeyCode::Esc => app.cancel_filter(),
        KeyCode::Backspace => app.filter_backspace(),
        KeyCode::Char(c) => app.filter_add_char(c),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in the clear-all confirmation
fn handle_confirm_clear_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.resolve_clear(Confirmation::Confirmed),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.resolve_clear(Confirmation::Cancelled),
        _ => {}
    }
    Ok(false)
}

fn handle_about_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => app.toggle_about(),
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{create_test_app, create_test_app_with};
    use crate::persistence::MemoryStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_handle_navigation() {
        let mut app = create_test_app();
        assert_eq!(app.selected_index, 0);

        handle_key(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_index, 1);

        handle_key(&mut app, key(KeyCode::Up)).unwrap();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_handle_quit() {
        let mut app = create_test_app();
        let should_quit = handle_key(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(should_quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.start_add_item();
        assert!(handle_key(&mut app, ctrl_c).unwrap());
    }

    #[test]
    fn test_handle_add_item() {
        let mut app = create_test_app();
        let initial_count = app.visible_items().len();

        // Press 'a' to open form
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::AddingItem);
        assert!(app.input_form.is_some());

        // 'q' is just a letter inside the form
        type_text(&mut app, "Yoghurt");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "4");

        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.visible_items().len(), initial_count + 1);
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert!(app.input_form.is_none());
    }

    #[test]
    fn test_handle_add_item_rejects_bad_days() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('a'))).unwrap();
        type_text(&mut app, "Oats");
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "5abc");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::AddingItem);
        assert!(app.input_form.as_ref().unwrap().error.is_some());

        // Fix it and retry
        for _ in 0..3 {
            handle_key(&mut app, key(KeyCode::Backspace)).unwrap();
        }
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_finish_and_delete() {
        let mut app = create_test_app();

        handle_key(&mut app, key(KeyCode::Char('f'))).unwrap();
        assert_eq!(app.counts(), (2, 1));

        handle_key(&mut app, key(KeyCode::Delete)).unwrap();
        assert_eq!(app.counts(), (1, 1));

        handle_key(&mut app, key(KeyCode::Char('2'))).unwrap();
        assert_eq!(app.view, View::Shopping);
        handle_key(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.counts(), (1, 0));
    }

    #[test]
    fn test_handle_clear_confirmation() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();
        handle_key(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.view, View::Shopping);

        handle_key(&mut app, key(KeyCode::Char('C'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::ConfirmClear);
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.counts(), (2, 1));

        handle_key(&mut app, key(KeyCode::Char('C'))).unwrap();
        handle_key(&mut app, key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.counts(), (2, 0));
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_handle_filter() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('/'))).unwrap();
        type_text(&mut app, "ice");
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        let names: Vec<String> = app.visible_items().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Rice"]);

        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.visible_items().len(), 3);
    }

    #[test]
    fn test_handle_onboarding() {
        let mut app = create_test_app_with(Arc::new(MemoryStore::new()), false);

        // Letters go to the prompt, not to the normal-mode bindings
        type_text(&mut app, "quinn");
        assert_eq!(app.ui_mode, UiMode::Onboarding);
        handle_key(&mut app, key(KeyCode::Enter)).unwrap();

        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.profile.greeting(), "Hi, quinn!");
    }

    #[test]
    fn test_handle_about_toggle() {
        let mut app = create_test_app();
        handle_key(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.ui_mode, UiMode::About);
        handle_key(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.ui_mode, UiMode::Normal);
    }
}
