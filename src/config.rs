use crate::domain::item::MAX_DAY_OFFSET;
use crate::domain::SortKey;
use crate::persistence::config_file;
use crate::reminders::ReminderSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Widest shopping grid the UI will lay out
pub const MAX_SHOPPING_COLUMNS: usize = 8;

/// User settings stored in config.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// How often the running app moves expired items to the shopping list
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Local hour reminders fire at
    #[serde(default = "default_reminder_hour")]
    pub reminder_hour: u32,

    /// Days before the finish date for the early reminder
    #[serde(default = "default_reminder_lead_days")]
    pub reminder_lead_days: i64,

    #[serde(default = "default_sort")]
    pub default_sort: SortKey,

    /// Columns in the shopping list grid
    #[serde(default = "default_shopping_columns")]
    pub shopping_columns: usize,

    #[serde(default = "default_true")]
    pub use_emoji: bool,

    #[serde(default = "default_true")]
    pub desktop_notifications: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_reminder_hour() -> u32 {
    9
}

fn default_reminder_lead_days() -> i64 {
    2
}

fn default_sort() -> SortKey {
    SortKey::Urgency
}

fn default_shopping_columns() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            reminder_hour: default_reminder_hour(),
            reminder_lead_days: default_reminder_lead_days(),
            default_sort: default_sort(),
            shopping_columns: default_shopping_columns(),
            use_emoji: true,
            desktop_notifications: true,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config.json from the data directory, then apply PANTRY_* overrides
    pub fn load(dir: &Path) -> Result<Self> {
        let path = config_file(dir);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid config: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config.sanitized())
    }

    /// Override fields from environment-style lookups; unparsable values are ignored
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secs) = lookup("PANTRY_SWEEP_INTERVAL").and_then(|v| v.parse().ok()) {
            self.sweep_interval_secs = secs;
        }
        if let Some(hour) = lookup("PANTRY_REMINDER_HOUR").and_then(|v| v.parse().ok()) {
            self.reminder_hour = hour;
        }
        if let Some(days) = lookup("PANTRY_REMINDER_LEAD_DAYS").and_then(|v| v.parse().ok()) {
            self.reminder_lead_days = days;
        }
        if let Some(sort) = lookup("PANTRY_DEFAULT_SORT").and_then(|v| SortKey::from_tag(&v)) {
            self.default_sort = sort;
        }
        if let Some(columns) = lookup("PANTRY_SHOPPING_COLUMNS").and_then(|v| v.parse().ok()) {
            self.shopping_columns = columns;
        }
        if let Some(flag) = lookup("PANTRY_USE_EMOJI").and_then(|v| v.parse().ok()) {
            self.use_emoji = flag;
        }
        if let Some(flag) = lookup("PANTRY_NOTIFICATIONS").and_then(|v| v.parse().ok()) {
            self.desktop_notifications = flag;
        }
        if let Some(level) = lookup("PANTRY_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            self.log_level = level;
        }
    }

    /// Pull out-of-range values back to their defaults
    fn sanitized(mut self) -> Self {
        if self.sweep_interval_secs == 0 {
            self.sweep_interval_secs = default_sweep_interval();
        }
        if self.reminder_hour > 23 {
            self.reminder_hour = default_reminder_hour();
        }
        if !(1..=MAX_DAY_OFFSET).contains(&self.reminder_lead_days) {
            self.reminder_lead_days = default_reminder_lead_days();
        }
        if !(1..=MAX_SHOPPING_COLUMNS).contains(&self.shopping_columns) {
            self.shopping_columns = default_shopping_columns();
        }
        self
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn reminder_settings(&self) -> ReminderSettings {
        ReminderSettings {
            hour: self.reminder_hour,
            lead_days: self.reminder_lead_days,
        }
    }
}
