use super::enums::Urgency;
use crate::error::ValidationError;
use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Milliseconds in one day
const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Largest accepted "days until empty" (one hundred years)
pub const MAX_DAY_OFFSET: i64 = 36_500;

/// Opaque item identity.
///
/// New ids are time-ordered UUIDs; ids written by older data files
/// (e.g. millisecond timestamps) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Fresh time-based id
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked grocery item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    /// Trimmed, never empty
    pub name: String,
    pub added_date: DateTime<Local>,
    /// `added_date` plus the planned whole-day offset
    pub finish_date: DateTime<Local>,
    /// Only ever goes from false to true
    pub finished: bool,
    /// Planned urgency, frozen at creation
    pub urgency_level: Urgency,
}

impl Item {
    /// Create a validated item planned to run out `days` days after `now`
    pub fn new(id: ItemId, name: &str, days: i64, now: DateTime<Local>) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        let days = check_day_offset(days)?;

        Ok(Self {
            id,
            name,
            added_date: now,
            finish_date: now + Duration::days(days),
            finished: false,
            urgency_level: Urgency::from_offset(days),
        })
    }

    /// Mark as finished, returns whether anything changed
    pub fn mark_finished(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        true
    }

    /// Planned lifetime in whole days (rounded up)
    pub fn planned_days(&self) -> i64 {
        ceil_days(self.finish_date.signed_duration_since(self.added_date))
    }

    /// Days until the planned finish date, rounded up. Zero or negative means overdue.
    pub fn remaining_days(&self, now: DateTime<Local>) -> i64 {
        ceil_days(self.finish_date.signed_duration_since(now))
    }

    /// Whether the planned finish date has passed
    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        self.finish_date < now
    }

    /// Share of the planned lifetime still left (0.0 to 1.0)
    pub fn progress(&self, now: DateTime<Local>) -> f64 {
        let total = self.planned_days();
        if total <= 0 {
            return 0.0;
        }
        let ratio = self.remaining_days(now) as f64 / total as f64;
        ratio.clamp(0.0, 1.0)
    }
}

/// Trim and check an item name
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Parse the "days until empty" text field
pub fn parse_day_offset(input: &str) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    let days: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidDays(trimmed.to_string()))?;
    check_day_offset(days)
}

fn check_day_offset(days: i64) -> Result<i64, ValidationError> {
    if days <= 0 {
        return Err(ValidationError::NonPositiveDays(days));
    }
    if days > MAX_DAY_OFFSET {
        return Err(ValidationError::TooManyDays {
            got: days,
            max: MAX_DAY_OFFSET,
        });
    }
    Ok(days)
}

/// Round a duration up to whole days
fn ceil_days(duration: Duration) -> i64 {
    let ms = duration.num_milliseconds();
    let whole = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) > 0 {
        whole + 1
    } else {
        whole
    }
}
