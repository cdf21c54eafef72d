use crate::domain::Item;
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Overdue reminders older than this are dropped instead of delivered
pub const STALE_AFTER_HOURS: i64 = 24;

/// A one-shot local alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Local>,
}

/// When reminders go off relative to an item's finish date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSettings {
    /// Local hour of day both reminders fire at
    pub hour: u32,
    /// Days before the finish date for the early warning
    pub lead_days: i64,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            hour: 9,
            lead_days: 2,
        }
    }
}

/// Anything that can accept reminders for later delivery
pub trait NotificationScheduler {
    fn schedule(&mut self, reminder: Reminder);
}

/// Delivers a reminder to the user right now
pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

/// Work out the reminders for a freshly added item.
///
/// Instants that are not in the future relative to `now` are dropped.
pub fn plan_reminders(item: &Item, now: DateTime<Local>, settings: ReminderSettings) -> Vec<Reminder> {
    let mut reminders = Vec::new();

    // An offset too large for the calendar simply has no early reminder
    let early = Duration::try_days(settings.lead_days)
        .and_then(|lead| item.finish_date.checked_sub_signed(lead))
        .and_then(|date| at_hour(date, settings.hour));
    if let Some(fire_at) = early.filter(|t| *t > now) {
        reminders.push(Reminder {
            title: format!("⏰ {} days left!", settings.lead_days),
            body: format!("{} will finish in {} days.", item.name, settings.lead_days),
            fire_at,
        });
    }

    let due = at_hour(item.finish_date, settings.hour);
    if let Some(fire_at) = due.filter(|t| *t > now) {
        reminders.push(Reminder {
            title: "✅ Item finished!".to_string(),
            body: format!("{} is scheduled to finish today.", item.name),
            fire_at,
        });
    }

    debug!(item = %item.id, planned = reminders.len(), "planned reminders");
    reminders
}

/// Same calendar day as `date`, at `hour`:00 local time
fn at_hour(date: DateTime<Local>, hour: u32) -> Option<DateTime<Local>> {
    date.date_naive()
        .and_hms_opt(hour, 0, 0)?
        .and_local_timezone(Local)
        .earliest()
}

/// Pending reminders, kept in fire order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderQueue {
    pending: Vec<Reminder>,
}

impl ReminderQueue {
    pub fn new(mut pending: Vec<Reminder>) -> Self {
        pending.sort_by_key(|r| r.fire_at);
        Self { pending }
    }

    pub fn pending(&self) -> &[Reminder] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Next reminder due to fire
    pub fn next_due(&self) -> Option<&Reminder> {
        self.pending.first()
    }

    /// Hand every reminder due at `now` to the notifier and drop it from the queue.
    ///
    /// Reminders more than `STALE_AFTER_HOURS` overdue are discarded silently.
    /// Returns how many reminders left the queue.
    pub fn deliver_due(&mut self, now: DateTime<Local>, notifier: &dyn Notifier) -> usize {
        let split = self.pending.partition_point(|r| r.fire_at <= now);
        let due: Vec<Reminder> = self.pending.drain(..split).collect();
        let cutoff = now.checked_sub_signed(Duration::hours(STALE_AFTER_HOURS));

        let mut stale = 0;
        for reminder in &due {
            if cutoff.is_some_and(|cutoff| reminder.fire_at < cutoff) {
                stale += 1;
                continue;
            }
            notifier.notify(&reminder.title, &reminder.body);
        }
        if stale > 0 {
            info!(stale, "dropped overdue reminders");
        }
        due.len()
    }
}

impl NotificationScheduler for ReminderQueue {
    fn schedule(&mut self, reminder: Reminder) {
        let pos = self.pending.partition_point(|r| r.fire_at <= reminder.fire_at);
        self.pending.insert(pos, reminder);
    }
}
