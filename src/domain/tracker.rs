//! Item lifecycle: the canonical collection and every transition on it.
//!
//! `Snapshot` operations are pure and hand back a new snapshot (or `None`
//! when nothing changes). `Tracker` owns the current snapshot and installs
//! new ones with a compare-and-swap on the version, so a sweep racing a
//! user action can never drop either update.

use super::enums::Confirmation;
use super::item::{parse_day_offset, Item, ItemId};
use crate::error::ValidationError;
use crate::reminders::{plan_reminders, Reminder, ReminderSettings};
use chrono::{DateTime, Local};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Something that happened to the collection, for feedback layers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Added { id: ItemId, name: String },
    Finished { id: ItemId, name: String, automatic: bool },
    Deleted { id: ItemId, name: String },
    Cleared { count: usize },
}

/// Immutable view of the item collection at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    items: Vec<Item>,
}

impl Snapshot {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }

    /// Whether any item sits on the shopping list
    pub fn has_finished(&self) -> bool {
        self.items.iter().any(|item| item.finished)
    }

    /// Validate input and append a new item
    pub fn add(&self, name: &str, days: &str, now: DateTime<Local>) -> Result<(Snapshot, Item), ValidationError> {
        let days = parse_day_offset(days)?;
        let item = Item::new(self.fresh_id(), name, days, now)?;

        let mut items = self.items.clone();
        items.push(item.clone());
        Ok((Snapshot { items }, item))
    }

    fn fresh_id(&self) -> ItemId {
        loop {
            let id = ItemId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Flag an item finished. `None` if it is unknown or already finished.
    pub fn mark_finished(&self, id: &ItemId) -> Option<(Snapshot, Item)> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        let mut items = self.items.clone();
        if !items[index].mark_finished() {
            return None;
        }
        let finished = items[index].clone();
        Some((Snapshot { items }, finished))
    }

    /// Remove an item. `None` if it is unknown.
    pub fn delete(&self, id: &ItemId) -> Option<(Snapshot, Item)> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        let mut items = self.items.clone();
        let removed = items.remove(index);
        Some((Snapshot { items }, removed))
    }

    /// Drop every finished item, only once the user has confirmed
    pub fn clear_finished(&self, confirmation: Confirmation) -> Option<(Snapshot, usize)> {
        if confirmation != Confirmation::Confirmed || !self.has_finished() {
            return None;
        }
        let items: Vec<Item> = self.items.iter().filter(|item| !item.finished).cloned().collect();
        let removed = self.items.len() - items.len();
        Some((Snapshot { items }, removed))
    }

    /// Finish every active item whose finish date is before `now`
    pub fn expire(&self, now: DateTime<Local>) -> Option<(Snapshot, Vec<Item>)> {
        let mut items = self.items.clone();
        let mut expired = Vec::new();
        for item in items.iter_mut() {
            if !item.finished && item.is_expired(now) && item.mark_finished() {
                expired.push(item.clone());
            }
        }
        if expired.is_empty() {
            return None;
        }
        Some((Snapshot { items }, expired))
    }
}

/// An item that was just added, plus the reminders it wants scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub item: Item,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug)]
struct Versioned {
    version: u64,
    snapshot: Arc<Snapshot>,
}

/// Owner of the current snapshot
pub struct Tracker {
    current: Mutex<Versioned>,
    subscribers: Mutex<Vec<Sender<LifecycleEvent>>>,
    reminder_settings: ReminderSettings,
}

impl Tracker {
    pub fn new(items: Vec<Item>, reminder_settings: ReminderSettings) -> Self {
        Self {
            current: Mutex::new(Versioned {
                version: 0,
                snapshot: Arc::new(Snapshot::new(items)),
            }),
            subscribers: Mutex::new(Vec::new()),
            reminder_settings,
        }
    }

    fn lock_current(&self) -> MutexGuard<'_, Versioned> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot; cheap to clone and never changes underneath the caller
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.lock_current().snapshot)
    }

    /// Bumped once per installed snapshot
    pub fn version(&self) -> u64 {
        self.lock_current().version
    }

    /// Receive every lifecycle event from now on
    pub fn subscribe(&self) -> Receiver<LifecycleEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn publish(&self, events: Vec<LifecycleEvent>) {
        if events.is_empty() {
            return;
        }
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        // Drop subscribers whose receiver is gone
        subscribers.retain(|tx| events.iter().all(|event| tx.send(event.clone()).is_ok()));
    }

    /// Compute a new snapshot from the current one and swap it in.
    ///
    /// If another update landed while `f` ran, `f` is re-run against the newer snapshot.
    fn apply<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: Fn(&Snapshot) -> Result<(Snapshot, T), E>,
    {
        loop {
            let (base_version, base) = {
                let current = self.lock_current();
                (current.version, Arc::clone(&current.snapshot))
            };

            let (next, output) = f(&base)?;

            let mut current = self.lock_current();
            if current.version == base_version {
                current.version += 1;
                current.snapshot = Arc::new(next);
                return Ok(output);
            }
            debug!(base_version, current_version = current.version, "snapshot changed underneath update, retrying");
        }
    }

    /// Add an item from raw form input
    pub fn add(&self, name: &str, days: &str, now: DateTime<Local>) -> Result<Added, ValidationError> {
        let item = self.apply(|snapshot| snapshot.add(name, days, now))?;

        info!(id = %item.id, name = %item.name, urgency = item.urgency_level.to_tag(), "item added");
        self.publish(vec![LifecycleEvent::Added {
            id: item.id.clone(),
            name: item.name.clone(),
        }]);

        let reminders = plan_reminders(&item, now, self.reminder_settings);
        Ok(Added { item, reminders })
    }

    /// Move an item to the shopping list. Returns false when nothing changed.
    pub fn mark_finished(&self, id: &ItemId) -> bool {
        let Ok(item) = self.apply(|snapshot| snapshot.mark_finished(id).ok_or(Unchanged)) else {
            return false;
        };

        info!(id = %item.id, name = %item.name, "item finished");
        self.publish(vec![LifecycleEvent::Finished {
            id: item.id,
            name: item.name,
            automatic: false,
        }]);
        true
    }

    /// Remove an item for good. Returns false when the id is unknown.
    pub fn delete(&self, id: &ItemId) -> bool {
        let Ok(item) = self.apply(|snapshot| snapshot.delete(id).ok_or(Unchanged)) else {
            return false;
        };

        info!(id = %item.id, name = %item.name, "item deleted");
        self.publish(vec![LifecycleEvent::Deleted {
            id: item.id,
            name: item.name,
        }]);
        true
    }

    /// Empty the shopping list. Returns how many items were removed.
    pub fn clear_finished(&self, confirmation: Confirmation) -> usize {
        let Ok(count) = self.apply(|snapshot| snapshot.clear_finished(confirmation).ok_or(Unchanged)) else {
            return 0;
        };

        info!(count, "shopping list cleared");
        self.publish(vec![LifecycleEvent::Cleared { count }]);
        count
    }

    /// Finish every item past its finish date. Returns the ids that flipped.
    pub fn sweep(&self, now: DateTime<Local>) -> Vec<ItemId> {
        let Ok(expired) = self.apply(|snapshot| snapshot.expire(now).ok_or(Unchanged)) else {
            return Vec::new();
        };

        info!(count = expired.len(), "expired items moved to shopping list");
        let ids = expired.iter().map(|item| item.id.clone()).collect();
        self.publish(
            expired
                .into_iter()
                .map(|item| LifecycleEvent::Finished {
                    id: item.id,
                    name: item.name,
                    automatic: true,
                })
                .collect(),
        );
        ids
    }
}

/// Marker for an update that turned out to be a no-op
struct Unchanged;
