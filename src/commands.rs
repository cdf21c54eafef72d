use crate::domain::{
    current_items, days_left_label, format_date, item_glyph, shopping_items, Confirmation, ItemId, SortKey, Tracker,
};
use crate::persistence::{PersistenceGateway, UserProfile};
use crate::reminders::{NotificationScheduler, ReminderQueue, ReminderSettings};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use std::io::Write;
use tracing::{debug, info};

/// Pantry state loaded for a single command-line invocation
pub struct Session {
    gateway: PersistenceGateway,
    pub tracker: Tracker,
    pub reminders: ReminderQueue,
    pub profile: UserProfile,
    /// Items the startup sweep moved to the shopping list
    pub expired: usize,
    use_emoji: bool,
    loaded_version: u64,
    reminders_dirty: bool,
}

impl Session {
    /// Load the collection and run the expiry sweep against `now`
    pub fn open(
        gateway: PersistenceGateway,
        settings: ReminderSettings,
        use_emoji: bool,
        now: DateTime<Local>,
    ) -> Result<Self> {
        let (items, profile) = gateway.load().context("Failed to load pantry")?;
        let reminders = ReminderQueue::new(gateway.load_reminders().context("Failed to load reminders")?);
        let tracker = Tracker::new(items, settings);
        let loaded_version = tracker.version();
        let expired = tracker.sweep(now).len();

        Ok(Self {
            gateway,
            tracker,
            reminders,
            profile,
            expired,
            use_emoji,
            loaded_version,
            reminders_dirty: false,
        })
    }

    /// Whether the invocation changed anything that must be written back
    pub fn is_dirty(&self) -> bool {
        self.tracker.version() != self.loaded_version || self.reminders_dirty
    }

    /// Write back whatever changed
    pub fn close(self) -> Result<()> {
        if !self.is_dirty() {
            debug!("nothing changed, skipping save");
            return Ok(());
        }
        if self.tracker.version() != self.loaded_version {
            self.gateway
                .save(self.tracker.snapshot().items())
                .context("Failed to save pantry")?;
        }
        if self.reminders_dirty {
            self.gateway
                .save_reminders(self.reminders.pending())
                .context("Failed to save reminders")?;
        }
        Ok(())
    }

    /// Find the item whose id starts with `prefix`
    /// Find the single item whose id starts with `prefix`, if any
    fn resolve(&self, prefix: &str) -> Result<Option<ItemId>> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            bail!("Item id cannot be empty");
        }

        let snapshot = self.tracker.snapshot();
        let mut matches = snapshot.items().iter().filter(|i| i.id.as_str().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Ok(Some(item.id.clone())),
            (None, _) => Ok(None),
            (Some(_), Some(_)) => bail!("Id {} matches more than one item; type more of it", prefix),
        }
    }
}

/// Add an item and schedule its reminders
pub fn add(session: &mut Session, name: &str, days: &str, now: DateTime<Local>, out: &mut impl Write) -> Result<()> {
    let added = session.tracker.add(name, days, now)?;
    for reminder in added.reminders {
        session.reminders.schedule(reminder);
        session.reminders_dirty = true;
    }

    let item = added.item;
    writeln!(
        out,
        "Added {} {} ({}, {} urgency, finishes {})",
        item_glyph(&item.name, session.use_emoji),
        item.name,
        item.id,
        item.urgency_level.to_tag(),
        format_date(item.finish_date)
    )?;
    Ok(())
}

/// Print current items
pub fn list(
    session: &Session,
    sort: SortKey,
    filter: Option<&str>,
    now: DateTime<Local>,
    out: &mut impl Write,
) -> Result<()> {
    let snapshot = session.tracker.snapshot();
    let items = current_items(snapshot.items(), filter.unwrap_or(""), sort);

    if items.is_empty() {
        writeln!(out, "No current items.")?;
        return Ok(());
    }

    for item in items {
        writeln!(
            out,
            "{}  {} {:<24} {:>9}  {:<6}  {}",
            item.id,
            item_glyph(&item.name, session.use_emoji),
            item.name,
            days_left_label(item, now),
            item.urgency_level.to_tag(),
            format_date(item.finish_date)
        )?;
    }

    if let Some(next) = session.reminders.next_due() {
        writeln!(out, "\nNext reminder: {} ({})", next.title, format_date(next.fire_at))?;
    }
    Ok(())
}

/// Print the shopping list
pub fn shopping(session: &Session, out: &mut impl Write) -> Result<()> {
    let snapshot = session.tracker.snapshot();
    let items = shopping_items(snapshot.items());

    if items.is_empty() {
        writeln!(out, "Your shopping list is empty.")?;
        return Ok(());
    }

    for item in items {
        writeln!(out, "{}  {} {}", item.id, item_glyph(&item.name, session.use_emoji), item.name)?;
    }
    Ok(())
}

pub fn finish(session: &mut Session, id: &str, out: &mut impl Write) -> Result<()> {
    let Some(id) = session.resolve(id)? else {
        writeln!(out, "No item with id {}", id.trim())?;
        return Ok(());
    };
    if session.tracker.mark_finished(&id) {
        writeln!(out, "Moved {} to the shopping list", id)?;
    } else {
        writeln!(out, "{} is already on the shopping list", id)?;
    }
    Ok(())
}

pub fn delete(session: &mut Session, id: &str, out: &mut impl Write) -> Result<()> {
    let Some(id) = session.resolve(id)? else {
        writeln!(out, "No item with id {}", id.trim())?;
        return Ok(());
    };
    session.tracker.delete(&id);
    writeln!(out, "Removed {}", id)?;
    Ok(())
}

/// Empty the shopping list once the user has confirmed
pub fn clear(session: &mut Session, confirmation: Confirmation, out: &mut impl Write) -> Result<()> {
    if confirmation == Confirmation::Cancelled {
        writeln!(out, "Nothing was cleared")?;
        return Ok(());
    }

    let count = session.tracker.clear_finished(confirmation);
    writeln!(out, "Cleared {} item{} from the shopping list", count, if count == 1 { "" } else { "s" })?;
    Ok(())
}

/// Report what the startup sweep did
pub fn sweep(session: &Session, out: &mut impl Write) -> Result<()> {
    match session.expired {
        0 => writeln!(out, "Nothing has run out")?,
        1 => writeln!(out, "1 item ran out and moved to the shopping list")?,
        n => writeln!(out, "{} items ran out and moved to the shopping list", n)?,
    }
    Ok(())
}

/// Show or change the display name
pub fn name(session: &mut Session, new_name: Option<&str>, out: &mut impl Write) -> Result<()> {
    let Some(new_name) = new_name else {
        match &session.profile.display_name {
            Some(_) => writeln!(out, "{}", session.profile.greeting())?,
            None => writeln!(out, "No name set yet. Run `pantry name <name>` to set one.")?,
        }
        return Ok(());
    };

    let profile = UserProfile::named(new_name)?;
    session
        .gateway
        .save_profile(&profile)
        .context("Failed to save display name")?;
    info!("display name updated");
    session.profile = profile;
    writeln!(out, "{}", session.profile.greeting())?;
    Ok(())
}
