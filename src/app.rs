use crate::config::{Config, MAX_SHOPPING_COLUMNS};
use crate::domain::{current_items, shopping_items, Confirmation, Item, LifecycleEvent, SortKey, Tracker, UiMode, View};
use crate::error::PersistenceError;
use crate::persistence::{PersistenceGateway, UserProfile};
use crate::reminders::{NotificationScheduler, Notifier, ReminderQueue};
use crate::ticker;
use chrono::{DateTime, Local};
use std::sync::mpsc::Receiver;
use std::time::Instant;
use tracing::{error, info, warn};

/// Input form state for adding items
#[derive(Debug, Clone, Default)]
pub struct InputFormState {
    pub name: String,
    pub days: String,
    pub editing_field: usize, // 0 = name, 1 = days
    /// Why the last submit was rejected
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One-line feedback shown at the bottom of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Main application state
pub struct AppState {
    pub tracker: Tracker,
    gateway: PersistenceGateway,
    pub reminders: ReminderQueue,
    notifier: Box<dyn Notifier>,
    events: Receiver<LifecycleEvent>,
    pub config: Config,
    pub profile: UserProfile,
    pub view: View,
    pub ui_mode: UiMode,
    pub selected_index: usize,
    pub sort: SortKey,
    pub filter: String,
    pub input_form: Option<InputFormState>,
    pub name_input: String,
    pub status: Option<StatusMessage>,
    pub use_emoji: bool,
    /// Ring the terminal bell on the next frame
    pub bell: bool,
    last_sweep: Option<Instant>,
    saved_version: u64,
    reminders_dirty: bool,
}

impl AppState {
    pub fn new(
        tracker: Tracker,
        gateway: PersistenceGateway,
        reminders: ReminderQueue,
        notifier: Box<dyn Notifier>,
        config: Config,
        profile: UserProfile,
    ) -> Self {
        let events = tracker.subscribe();
        let saved_version = tracker.version();
        let ui_mode = if profile.is_onboarded() {
            UiMode::Normal
        } else {
            UiMode::Onboarding
        };

        Self {
            tracker,
            gateway,
            reminders,
            notifier,
            events,
            sort: config.default_sort,
            use_emoji: config.use_emoji,
            config,
            profile,
            view: View::Current,
            ui_mode,
            selected_index: 0,
            filter: String::new(),
            input_form: None,
            name_input: String::new(),
            status: None,
            bell: false,
            last_sweep: None,
            saved_version,
            reminders_dirty: false,
        }
    }

    /// Items in the active view, in display order
    pub fn visible_items(&self) -> Vec<Item> {
        let snapshot = self.tracker.snapshot();
        match self.view {
            View::Current => current_items(snapshot.items(), &self.filter, self.sort)
                .into_iter()
                .cloned()
                .collect(),
            View::Shopping => shopping_items(snapshot.items()).into_iter().cloned().collect(),
        }
    }

    /// Get the currently selected item
    pub fn selected_item(&self) -> Option<Item> {
        self.visible_items().into_iter().nth(self.selected_index)
    }

    /// Count of (current, shopping) items, ignoring the filter
    pub fn counts(&self) -> (usize, usize) {
        let snapshot = self.tracker.snapshot();
        let shopping = snapshot.items().iter().filter(|i| i.finished).count();
        (snapshot.len() - shopping, shopping)
    }

    fn row_step(&self) -> usize {
        match self.view {
            View::Current => 1,
            View::Shopping => self.config.shopping_columns.clamp(1, MAX_SHOPPING_COLUMNS),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible_items().len();
        let next = self.selected_index as isize + delta;
        if next >= 0 && (next as usize) < len {
            self.selected_index = next as usize;
        }
    }

    /// Move selection up (one grid row on the shopping list)
    pub fn move_selection_up(&mut self) {
        self.move_selection(-(self.row_step() as isize));
    }

    /// Move selection down (one grid row on the shopping list)
    pub fn move_selection_down(&mut self) {
        self.move_selection(self.row_step() as isize);
    }

    pub fn move_selection_left(&mut self) {
        if self.view == View::Shopping {
            self.move_selection(-1);
        }
    }

    pub fn move_selection_right(&mut self) {
        if self.view == View::Shopping {
            self.move_selection(1);
        }
    }

    /// Keep the selection inside the visible list after it shrinks
    fn clamp_selection(&mut self) {
        let len = self.visible_items().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    pub fn switch_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.selected_index = 0;
        }
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.selected_index = 0;
        self.status = Some(StatusMessage::info(format!("Sorted by {}", self.sort.label())));
    }

    pub fn start_filter(&mut self) {
        self.switch_view(View::Current);
        self.ui_mode = UiMode::Filtering;
    }

    pub fn filter_add_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected_index = 0;
    }

    pub fn filter_backspace(&mut self) {
        self.filter.pop();
        self.selected_index = 0;
    }

    /// Keep the typed filter and go back to the list
    pub fn finish_filter(&mut self) {
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
    }

    /// Drop the filter entirely
    pub fn cancel_filter(&mut self) {
        self.filter.clear();
        self.ui_mode = UiMode::Normal;
        self.selected_index = 0;
    }

    /// Open the add-item form
    pub fn start_add_item(&mut self) {
        self.switch_view(View::Current);
        self.input_form = Some(InputFormState::default());
        self.ui_mode = UiMode::AddingItem;
    }

    /// Toggle between name and days fields
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            form.editing_field = (form.editing_field + 1) % 2;
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => form.name.push(c),
                _ => form.days.push(c),
            }
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => form.name.pop(),
                _ => form.days.pop(),
            };
        }
    }

    /// Submit the add-item form. Invalid input keeps the form open with the reason.
    pub fn submit_input_form(&mut self, now: DateTime<Local>) {
        let (name, days) = match &self.input_form {
            Some(form) => (form.name.clone(), form.days.clone()),
            None => return,
        };

        match self.tracker.add(&name, &days, now) {
            Ok(added) => {
                for reminder in added.reminders {
                    self.reminders.schedule(reminder);
                    self.reminders_dirty = true;
                }
                self.input_form = None;
                self.ui_mode = UiMode::Normal;
                if let Some(pos) = self.visible_items().iter().position(|i| i.id == added.item.id) {
                    self.selected_index = pos;
                }
            }
            Err(e) => {
                warn!(error = %e, "rejected new item");
                if let Some(form) = &mut self.input_form {
                    form.error = Some(e.to_string());
                    // Jump to the field that needs fixing
                    form.editing_field = if name.trim().is_empty() { 0 } else { 1 };
                }
            }
        }
    }

    /// Cancel input form
    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Move the selected current item to the shopping list
    pub fn mark_selected_finished(&mut self) {
        if self.view != View::Current {
            return;
        }
        if let Some(item) = self.selected_item() {
            self.tracker.mark_finished(&item.id);
            self.clamp_selection();
        }
    }

    /// Delete the selected item from whichever view is showing
    pub fn delete_selected(&mut self) {
        if let Some(item) = self.selected_item() {
            self.tracker.delete(&item.id);
            self.clamp_selection();
        }
    }

    /// Ask before emptying the shopping list
    pub fn request_clear_finished(&mut self) {
        if self.tracker.snapshot().has_finished() {
            self.ui_mode = UiMode::ConfirmClear;
        } else {
            self.status = Some(StatusMessage::info("Shopping list is already empty"));
        }
    }

    pub fn resolve_clear(&mut self, confirmation: Confirmation) {
        self.ui_mode = UiMode::Normal;
        if confirmation == Confirmation::Cancelled {
            self.status = Some(StatusMessage::info("Nothing was cleared"));
            return;
        }
        self.tracker.clear_finished(confirmation);
        self.clamp_selection();
    }

    pub fn start_edit_name(&mut self) {
        self.name_input = self.profile.display_name.clone().unwrap_or_default();
        self.ui_mode = UiMode::EditingName;
    }

    pub fn name_add_char(&mut self, c: char) {
        self.name_input.push(c);
    }

    pub fn name_backspace(&mut self) {
        self.name_input.pop();
    }

    /// Store the typed display name
    pub fn submit_name(&mut self) {
        match UserProfile::named(&self.name_input) {
            Ok(profile) => {
                self.profile = profile;
                self.name_input.clear();
                self.ui_mode = UiMode::Normal;
                info!("display name updated");
                match self.gateway.save_profile(&self.profile) {
                    Ok(()) => self.status = Some(StatusMessage::info(self.profile.greeting())),
                    Err(e) => self.report_persistence_error(&e),
                }
            }
            Err(e) => self.status = Some(StatusMessage::error(e.to_string())),
        }
    }

    /// Leave the name prompt; onboarding cannot be skipped
    pub fn cancel_name(&mut self) {
        if self.ui_mode == UiMode::EditingName {
            self.name_input.clear();
            self.ui_mode = UiMode::Normal;
        }
    }

    pub fn toggle_about(&mut self) {
        self.ui_mode = match self.ui_mode {
            UiMode::About => UiMode::Normal,
            _ => UiMode::About,
        };
    }

    /// Periodic work: expiry sweep, due reminders, feedback, autosave
    pub fn tick(&mut self, now: DateTime<Local>) {
        let sweep_due = self
            .last_sweep
            .map_or(true, |last| ticker::is_due(last, self.config.sweep_interval(), Instant::now()));
        if sweep_due {
            self.sweep(now);
        }

        if self.reminders.deliver_due(now, self.notifier.as_ref()) > 0 {
            self.reminders_dirty = true;
        }

        self.drain_events();
        self.persist();
    }

    /// Run the expiry sweep right away
    pub fn sweep(&mut self, now: DateTime<Local>) {
        self.tracker.sweep(now);
        self.last_sweep = Some(Instant::now());
    }

    /// Turn lifecycle events into user feedback
    pub fn drain_events(&mut self) {
        let events: Vec<LifecycleEvent> = self.events.try_iter().collect();
        for event in events {
            let text = match event {
                LifecycleEvent::Added { name, .. } => format!("Added {}", name),
                LifecycleEvent::Finished { name, automatic: false, .. } => {
                    self.bell = true;
                    format!("{} moved to the shopping list", name)
                }
                LifecycleEvent::Finished { name, automatic: true, .. } => {
                    format!("{} ran out and moved to the shopping list", name)
                }
                LifecycleEvent::Deleted { name, .. } => {
                    self.bell = true;
                    format!("Removed {}", name)
                }
                LifecycleEvent::Cleared { count } => {
                    format!("Cleared {} item{} from the shopping list", count, if count == 1 { "" } else { "s" })
                }
            };
            self.status = Some(StatusMessage::info(text));
        }
        self.clamp_selection();
    }

    /// Take the pending bell request
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Whether something changed since the last save attempt
    pub fn needs_save(&self) -> bool {
        self.tracker.version() != self.saved_version || self.reminders_dirty
    }

    /// Mirror the current snapshot (and reminders) to the store.
    ///
    /// Each change gets exactly one attempt; a failure is shown once and the
    /// next change triggers a fresh full save.
    pub fn persist(&mut self) {
        let version = self.tracker.version();
        if version != self.saved_version {
            self.saved_version = version;
            let snapshot = self.tracker.snapshot();
            if let Err(e) = self.gateway.save(snapshot.items()) {
                self.report_persistence_error(&e);
            }
        }

        if self.reminders_dirty {
            self.reminders_dirty = false;
            if let Err(e) = self.gateway.save_reminders(self.reminders.pending()) {
                self.report_persistence_error(&e);
            }
        }
    }

    fn report_persistence_error(&mut self, e: &PersistenceError) {
        error!(key = e.key(), error = %e, "save failed");
        self.status = Some(StatusMessage::error(format!("Not saved: {}", e)));
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::persistence::{KeyValueStore, MemoryStore};
    use crate::reminders::ReminderSettings;
    use chrono::Duration;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    pub(crate) struct RecordingNotifier {
        pub sent: Rc<RefCell<Vec<String>>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, _body: &str) {
            self.sent.borrow_mut().push(title.to_string());
        }
    }

    pub(crate) fn create_test_app_with(store: Arc<MemoryStore>, onboarded: bool) -> AppState {
        let gateway = PersistenceGateway::new(Arc::clone(&store));
        let profile = if onboarded {
            UserProfile::named("Alex").unwrap()
        } else {
            UserProfile::default()
        };
        AppState::new(
            Tracker::new(Vec::new(), ReminderSettings::default()),
            gateway,
            ReminderQueue::default(),
            Box::new(RecordingNotifier::default()),
            Config::default(),
            profile,
        )
    }

    pub(crate) fn create_test_app() -> AppState {
        let mut app = create_test_app_with(Arc::new(MemoryStore::new()), true);
        let now = Local::now();
        app.tracker.add("Rice", "10", now).unwrap();
        app.tracker.add("Milk", "2", now).unwrap();
        app.tracker.add("Apples", "5", now).unwrap();
        app
    }

    fn names(items: &[Item]) -> Vec<String> {
        items.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn test_app_state_new() {
        let app = create_test_app();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.view, View::Current);
        assert_eq!(app.sort, SortKey::Urgency);
        assert_eq!(names(&app.visible_items()), vec!["Milk", "Apples", "Rice"]);
    }

    #[test]
    fn test_first_run_starts_onboarding() {
        let app = create_test_app_with(Arc::new(MemoryStore::new()), false);
        assert_eq!(app.ui_mode, UiMode::Onboarding);
    }

    #[test]
    fn test_move_selection() {
        let mut app = create_test_app();

        app.move_selection_down();
        assert_eq!(app.selected_index, 1);

        app.move_selection_up();
        assert_eq!(app.selected_index, 0);

        // Can't go below 0
        app.move_selection_up();
        assert_eq!(app.selected_index, 0);

        app.move_selection_down();
        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_shopping_grid_navigation() {
        let mut app = create_test_app();
        for item in app.visible_items() {
            app.tracker.mark_finished(&item.id);
        }
        app.switch_view(View::Shopping);

        app.move_selection_right();
        assert_eq!(app.selected_index, 1);
        app.move_selection_left();
        app.move_selection_down();
        assert_eq!(app.selected_index, 2); // two columns per row
        app.move_selection_down();
        assert_eq!(app.selected_index, 2);
    }

    #[test]
    fn test_submit_valid_form() {
        let store = Arc::new(MemoryStore::new());
        let mut app = create_test_app_with(Arc::clone(&store), true);

        app.start_add_item();
        for c in "Cheese".chars() {
            app.input_form_add_char(c);
        }
        app.input_form_toggle_field();
        app.input_form_add_char('6');
        app.submit_input_form(Local::now());

        assert!(app.input_form.is_none());
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(names(&app.visible_items()), vec!["Cheese"]);
        assert_eq!(app.reminders.pending().len(), 2);

        app.tick(Local::now());
        assert!(store.get("groceryItems").unwrap().unwrap().contains("Cheese"));
        assert!(store.get("reminders").unwrap().is_some());
        assert_eq!(app.status, Some(StatusMessage::info("Added Cheese")));
    }

    #[test]
    fn test_submit_invalid_form_keeps_it_open() {
        let mut app = create_test_app();
        let before = app.tracker.snapshot();

        app.start_add_item();
        app.input_form_add_char('X');
        app.input_form_toggle_field();
        app.input_form_add_char('0');
        app.submit_input_form(Local::now());

        assert_eq!(app.ui_mode, UiMode::AddingItem);
        let form = app.input_form.as_ref().unwrap();
        assert!(form.error.as_ref().unwrap().contains("at least 1"));
        assert_eq!(form.editing_field, 1);
        assert_eq!(*app.tracker.snapshot(), *before);

        app.cancel_input_form();
        assert!(app.input_form.is_none());
    }

    #[test]
    fn test_mark_selected_finished_moves_to_shopping() {
        let mut app = create_test_app();
        app.mark_selected_finished();
        app.drain_events();

        assert_eq!(names(&app.visible_items()), vec!["Apples", "Rice"]);
        assert!(app.take_bell());
        assert!(!app.take_bell());

        app.switch_view(View::Shopping);
        assert_eq!(names(&app.visible_items()), vec!["Milk"]);
        assert_eq!(app.counts(), (2, 1));
    }

    #[test]
    fn test_delete_selected_clamps_selection() {
        let mut app = create_test_app();
        app.move_selection_down();
        app.move_selection_down();
        app.delete_selected();

        assert_eq!(names(&app.visible_items()), vec!["Milk", "Apples"]);
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut app = create_test_app();
        app.request_clear_finished();
        assert_eq!(app.ui_mode, UiMode::Normal); // nothing to clear yet

        app.mark_selected_finished();
        app.request_clear_finished();
        assert_eq!(app.ui_mode, UiMode::ConfirmClear);

        app.resolve_clear(Confirmation::Cancelled);
        assert_eq!(app.counts(), (2, 1));

        app.request_clear_finished();
        app.resolve_clear(Confirmation::Confirmed);
        assert_eq!(app.counts(), (2, 0));
        assert_eq!(app.ui_mode, UiMode::Normal);
    }

    #[test]
    fn test_filter_and_sort() {
        let mut app = create_test_app();
        app.start_filter();
        app.filter_add_char('P');
        assert_eq!(names(&app.visible_items()), vec!["Apples"]);
        app.finish_filter();
        assert_eq!(app.filter, "P");

        app.cancel_filter();
        app.cycle_sort();
        assert_eq!(app.sort, SortKey::Name);
        assert_eq!(names(&app.visible_items()), vec!["Apples", "Milk", "Rice"]);
    }

    #[test]
    fn test_tick_sweeps_expired_items() {
        let mut app = create_test_app();
        app.tick(Local::now() + Duration::days(3));

        // Milk (2 days) ran out, the rest are still current
        assert_eq!(app.counts(), (2, 1));
        let status = app.status.clone().unwrap();
        assert_eq!(status.text, "Milk ran out and moved to the shopping list");
        assert!(!app.needs_save());
    }

    #[test]
    fn test_tick_delivers_due_reminders() {
        let store = Arc::new(MemoryStore::new());
        let notifier = RecordingNotifier::default();
        let sent = Rc::clone(&notifier.sent);
        let mut app = AppState::new(
            Tracker::new(Vec::new(), ReminderSettings::default()),
            PersistenceGateway::new(Arc::clone(&store)),
            ReminderQueue::default(),
            Box::new(notifier),
            Config::default(),
            UserProfile::named("Alex").unwrap(),
        );

        let now = Local::now();
        let added = app.tracker.add("Bread", "4", now).unwrap();
        for reminder in added.reminders {
            app.reminders.schedule(reminder);
        }

        let fire_times: Vec<_> = app.reminders.pending().iter().map(|r| r.fire_at).collect();
        assert_eq!(fire_times.len(), 2);

        app.tick(fire_times[0] + Duration::hours(1));
        assert_eq!(sent.borrow().len(), 1);
        app.tick(fire_times[1] + Duration::hours(1));
        assert_eq!(sent.borrow().len(), 2);
        assert!(app.reminders.is_empty());
    }

    #[test]
    fn test_tick_drops_reminders_missed_while_closed() {
        let store = Arc::new(MemoryStore::new());
        let notifier = RecordingNotifier::default();
        let sent = Rc::clone(&notifier.sent);
        let mut app = AppState::new(
            Tracker::new(Vec::new(), ReminderSettings::default()),
            PersistenceGateway::new(Arc::clone(&store)),
            ReminderQueue::default(),
            Box::new(notifier),
            Config::default(),
            UserProfile::named("Alex").unwrap(),
        );

        let now = Local::now();
        let added = app.tracker.add("Bread", "4", now).unwrap();
        for reminder in added.reminders {
            app.reminders.schedule(reminder);
        }

        app.tick(now + Duration::days(10));
        assert!(sent.borrow().is_empty());
        assert!(app.reminders.is_empty());
        assert!(store.get("reminders").unwrap().is_some());
    }

    #[test]
    fn test_save_failure_keeps_state_and_reports_once() {
        let store = Arc::new(MemoryStore::new());
        let mut app = create_test_app_with(Arc::clone(&store), true);
        store.set_read_only(true);

        app.tracker.add("Eggs", "3", Local::now()).unwrap();
        app.tick(Local::now());

        assert_eq!(app.counts(), (1, 0));
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(!app.needs_save()); // not retried in a loop

        // The next change saves everything once the store recovers
        store.set_read_only(false);
        app.tracker.add("Tea", "9", Local::now()).unwrap();
        app.persist();
        let raw = store.get("groceryItems").unwrap().unwrap();
        assert!(raw.contains("Eggs") && raw.contains("Tea"));
    }

    #[test]
    fn test_submit_name() {
        let store = Arc::new(MemoryStore::new());
        let mut app = create_test_app_with(Arc::clone(&store), false);

        app.submit_name();
        assert_eq!(app.ui_mode, UiMode::Onboarding);
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));

        // Onboarding cannot be escaped
        app.cancel_name();
        assert_eq!(app.ui_mode, UiMode::Onboarding);

        for c in "Robin".chars() {
            app.name_add_char(c);
        }
        app.submit_name();
        assert_eq!(app.ui_mode, UiMode::Normal);
        assert_eq!(app.profile.display_name.as_deref(), Some("Robin"));
        assert_eq!(store.get("userName").unwrap().as_deref(), Some("\"Robin\""));
    }
}
