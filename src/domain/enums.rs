use serde::{Deserialize, Serialize};

/// How soon an item was expected to run out, fixed when the item is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Highest day offset still classed as high urgency
    pub const HIGH_MAX_DAYS: i64 = 3;
    /// Highest day offset still classed as medium urgency
    pub const MEDIUM_MAX_DAYS: i64 = 7;

    /// Classify a planned "days until empty" offset
    pub fn from_offset(days: i64) -> Self {
        if days <= Self::HIGH_MAX_DAYS {
            Self::High
        } else if days <= Self::MEDIUM_MAX_DAYS {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn to_tag(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Sort rank, most urgent first
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

/// Ordering applied to the Current Items view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// High → medium → low, then by name
    Urgency,
    /// Lexical by name
    Name,
    /// Oldest first
    #[serde(alias = "added")]
    #[value(alias = "added")]
    Date,
}

impl SortKey {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "urgency" => Some(Self::Urgency),
            "name" => Some(Self::Name),
            "date" | "added" => Some(Self::Date),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::Name => "name",
            Self::Date => "date",
        }
    }

    /// Next key in the cycle used by the sort toggle
    pub fn next(&self) -> Self {
        match self {
            Self::Urgency => Self::Name,
            Self::Name => Self::Date,
            Self::Date => Self::Urgency,
        }
    }
}

/// Answer to the destructive-action prompt guarding bulk clears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Cancelled,
}

/// Which list the UI is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Current,
    Shopping,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Current => "Current Items",
            View::Shopping => "Shopping List",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            View::Current => 0,
            View::Shopping => 1,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            View::Current => View::Shopping,
            View::Shopping => View::Current,
        }
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    Onboarding,  // First run, asking for a display name
    AddingItem,
    Filtering,
    ConfirmClear,
    EditingName,
    About,
}
