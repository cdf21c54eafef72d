use super::store::KeyValueStore;
use crate::domain::{Item, ItemId, Urgency};
use crate::error::{PersistenceError, ValidationError};
use crate::reminders::Reminder;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Key holding the serialized item collection
pub const ITEMS_KEY: &str = "groceryItems";
/// Key holding the user's display name
pub const USER_NAME_KEY: &str = "userName";
/// Key holding reminders that have not fired yet
pub const REMINDERS_KEY: &str = "reminders";

/// The single user's profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    /// `None` until onboarding has run
    pub display_name: Option<String>,
}

impl UserProfile {
    pub fn named(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyDisplayName);
        }
        Ok(Self {
            display_name: Some(trimmed.to_string()),
        })
    }

    pub fn is_onboarded(&self) -> bool {
        self.display_name.is_some()
    }

    pub fn greeting(&self) -> String {
        match &self.display_name {
            Some(name) => format!("Hi, {}!", name),
            None => "Welcome!".to_string(),
        }
    }
}

/// Item record as found on disk.
///
/// Records written before urgency was stored lack `urgencyLevel`; it is
/// derived from the planned offset, never from the time left.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredItem {
    id: ItemId,
    name: String,
    added_date: DateTime<Local>,
    finish_date: DateTime<Local>,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    urgency_level: Option<Urgency>,
}

impl From<StoredItem> for Item {
    fn from(stored: StoredItem) -> Self {
        let mut item = Item {
            id: stored.id,
            name: stored.name,
            added_date: stored.added_date,
            finish_date: stored.finish_date,
            finished: stored.finished,
            urgency_level: Urgency::Low,
        };
        item.urgency_level = stored
            .urgency_level
            .unwrap_or_else(|| Urgency::from_offset(item.planned_days()));
        item
    }
}

/// Durable mirror of the item collection and the profile
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceGateway {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Read everything once at startup. Missing records come back empty.
    pub fn load(&self) -> Result<(Vec<Item>, UserProfile), PersistenceError> {
        let items: Vec<Item> = self
            .read_json::<Vec<StoredItem>>(ITEMS_KEY)?
            .unwrap_or_default()
            .into_iter()
            .map(Item::from)
            .collect();

        let display_name = self
            .read_json::<String>(USER_NAME_KEY)?
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        debug!(items = items.len(), onboarded = display_name.is_some(), "loaded pantry");
        Ok((items, UserProfile { display_name }))
    }

    /// Overwrite the stored collection
    pub fn save(&self, items: &[Item]) -> Result<(), PersistenceError> {
        self.write_json(ITEMS_KEY, &items)
    }

    /// Overwrite the stored display name
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), PersistenceError> {
        match &profile.display_name {
            Some(name) => self.write_json(USER_NAME_KEY, name),
            None => {
                warn!("refusing to store an empty profile");
                Ok(())
            }
        }
    }

    pub fn load_reminders(&self) -> Result<Vec<Reminder>, PersistenceError> {
        Ok(self.read_json(REMINDERS_KEY)?.unwrap_or_default())
    }

    pub fn save_reminders(&self, reminders: &[Reminder]) -> Result<(), PersistenceError> {
        self.write_json(REMINDERS_KEY, &reminders)
    }

    fn read_json<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| PersistenceError::Decode {
                key: key.to_string(),
                source,
            })
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(value).map_err(|source| PersistenceError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tracker;
    use crate::persistence::store::{FileStore, MemoryStore};
    use crate::reminders::ReminderSettings;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 14, 18, 30, 0).single().unwrap()
    }

    fn sample_items() -> Vec<Item> {
        let tracker = Tracker::new(Vec::new(), ReminderSettings::default());
        let milk = tracker.add("Milk", "2", t0()).unwrap().item;
        tracker.add("Apples", "6", t0() + Duration::milliseconds(1234)).unwrap();
        tracker.add("Rice", "30", t0() + Duration::hours(5)).unwrap();
        tracker.mark_finished(&milk.id);
        tracker.snapshot().items().to_vec()
    }

    #[test]
    fn test_first_run_loads_empty() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let (items, profile) = gateway.load().unwrap();
        assert!(items.is_empty());
        assert_eq!(profile, UserProfile::default());
        assert!(!profile.is_onboarded());
        assert!(gateway.load_reminders().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let gateway = PersistenceGateway::new(FileStore::new(temp_dir.path()));
        let items = sample_items();

        gateway.save(&items).unwrap();
        gateway.save_profile(&UserProfile::named("Sam").unwrap()).unwrap();

        let (loaded, profile) = gateway.load().unwrap();
        assert_eq!(loaded, items);
        assert_eq!(profile.display_name.as_deref(), Some("Sam"));
    }

    #[test]
    fn test_stored_format_uses_camel_case_field_names() {
        let store = Arc::new(MemoryStore::new());
        let gateway = PersistenceGateway::new(Arc::clone(&store));
        gateway.save(&sample_items()).unwrap();

        let raw = store.get(ITEMS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["name"], "Milk");
        assert_eq!(first["finished"], true);
        assert_eq!(first["urgencyLevel"], "high");
        assert!(first["addedDate"].is_string());
        assert!(first["finishDate"].is_string());
    }

    #[test]
    fn test_legacy_record_without_urgency_uses_planned_offset() {
        let store = MemoryStore::new();
        store
            .set(
                ITEMS_KEY,
                r#"[
                    {"id": "1718000000000", "name": "Coffee", "addedDate": "2024-06-01T08:00:00.000Z",
                     "finishDate": "2024-06-11T08:00:00.000Z", "finished": false},
                    {"id": "1718000000001", "name": "Eggs", "addedDate": "2024-06-01T08:00:00.000Z",
                     "finishDate": "2024-06-03T08:00:00.000Z"}
                ]"#,
            )
            .unwrap();
        let gateway = PersistenceGateway::new(store);

        let (items, _) = gateway.load().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id.as_str(), "1718000000000");
        assert_eq!(items[0].urgency_level, Urgency::Low);
        assert_eq!(items[1].urgency_level, Urgency::High);
        assert!(!items[1].finished);
    }

    #[test]
    fn test_corrupt_items_are_a_decode_error() {
        let store = MemoryStore::new();
        store.set(ITEMS_KEY, "{not json").unwrap();
        let gateway = PersistenceGateway::new(store);

        let err = gateway.load().unwrap_err();
        assert!(matches!(err, PersistenceError::Decode { .. }));
        assert_eq!(err.key(), ITEMS_KEY);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let gateway = PersistenceGateway::new(Arc::clone(&store));
        store.set_read_only(true);

        let err = gateway.save(&sample_items()).unwrap_err();
        assert!(matches!(err, PersistenceError::Write { .. }));

        // Next save after the store recovers reconciles the record
        store.set_read_only(false);
        let items = sample_items();
        gateway.save(&items).unwrap();
        assert_eq!(gateway.load().unwrap().0, items);
    }

    #[test]
    fn test_profile_validation_and_greeting() {
        assert_eq!(UserProfile::named("   "), Err(ValidationError::EmptyDisplayName));
        let profile = UserProfile::named("  Lee ").unwrap();
        assert_eq!(profile.greeting(), "Hi, Lee!");
        assert_eq!(UserProfile::default().greeting(), "Welcome!");
    }

    #[test]
    fn test_reminders_roundtrip() {
        let gateway = PersistenceGateway::new(MemoryStore::new());
        let items = sample_items();
        let reminders = crate::reminders::plan_reminders(&items[2], t0(), ReminderSettings::default());
        gateway.save_reminders(&reminders).unwrap();
        assert_eq!(gateway.load_reminders().unwrap(), reminders);
    }
}
