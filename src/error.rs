use thiserror::Error;

/// Rejected input when adding an item. The collection is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item name cannot be empty")]
    EmptyName,
    #[error("days until empty must be a whole number (got {0:?})")]
    InvalidDays(String),
    #[error("days until empty must be at least 1 (got {0})")]
    NonPositiveDays(i64),
    #[error("days until empty cannot exceed {max} (got {got})")]
    TooManyDays { got: i64, max: i64 },
    #[error("display name cannot be empty")]
    EmptyDisplayName,
}

/// Failure talking to the durable store.
///
/// Never fatal: the in-memory collection stays as it is and the next
/// successful save brings the store back in line.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not read `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored `{key}` is not valid: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    /// Key of the record the failed operation touched
    pub fn key(&self) -> &str {
        match self {
            Self::Read { key, .. }
            | Self::Write { key, .. }
            | Self::Decode { key, .. }
            | Self::Encode { key, .. } => key,
        }
    }
}
